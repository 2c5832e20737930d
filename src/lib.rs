//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-sample-cache`, `bridge-desktop`, `core-runtime`).
//! Host applications can depend on `sample-cache-workspace` and enable the
//! documented features without needing to wire each crate individually.

pub use bridge_traits;
pub use core_runtime;
pub use core_sample_cache;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;
