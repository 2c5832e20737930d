//! Two-phase eviction.
//!
//! Phase 1 frees idle samples in scan order. Phase 2, used only during
//! admission, frees active samples whose priority is strictly lower than the
//! requester's. Handles of active victims are returned so the caller can stop
//! their playback once the cache lock is released.

use super::config::EvictionCommit;
use super::entry::SampleHandle;
use super::store::CacheStore;
use crate::request::AudioPriority;
use tracing::{debug, error};

/// Result of one eviction request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionOutcome {
    /// Samples actually removed.
    pub evicted: usize,
    /// Bytes actually removed.
    pub freed_bytes: u64,
    /// Bytes held by every candidate found, removed or not.
    pub candidate_bytes: u64,
    /// Whether the candidates covered the request.
    pub satisfied: bool,
    /// Removed samples that were still referenced.
    pub stopped: Vec<SampleHandle>,
}

#[derive(Debug, Default)]
struct Plan {
    victims: Vec<String>,
    bytes: u64,
}

impl Plan {
    fn push(&mut self, identifier: &str, bytes: u64) {
        self.victims.push(identifier.to_string());
        self.bytes += bytes;
    }
}

#[derive(Debug, Default)]
struct Applied {
    evicted: usize,
    freed_bytes: u64,
    stopped: Vec<SampleHandle>,
}

/// Eviction driver for one store operation.
#[derive(Debug, Clone, Copy)]
pub struct Evictor {
    commit: EvictionCommit,
}

impl Evictor {
    pub fn new(commit: EvictionCommit) -> Self {
        Self { commit }
    }

    /// Free idle samples until at least `required` bytes are freed.
    /// `required == 0` frees every idle sample.
    pub fn free_idle(&self, store: &mut CacheStore, required: u64) -> EvictionOutcome {
        let plan = plan_idle(store, required);
        let candidate_bytes = plan.bytes;
        let satisfied = required == 0 || candidate_bytes >= required;
        let applied = apply(store, plan);

        EvictionOutcome {
            evicted: applied.evicted,
            freed_bytes: applied.freed_bytes,
            candidate_bytes,
            satisfied,
            stopped: applied.stopped,
        }
    }

    /// Free at least `required` bytes for a sample requested at `priority`.
    pub fn free_for_admission(
        &self,
        store: &mut CacheStore,
        required: u64,
        priority: AudioPriority,
    ) -> EvictionOutcome {
        if required == 0 {
            return EvictionOutcome {
                satisfied: true,
                ..Default::default()
            };
        }

        match self.commit {
            EvictionCommit::PerPhase => {
                let idle = self.free_idle(store, required);
                if idle.satisfied {
                    return idle;
                }

                let active = plan_lower_priority(store, required - idle.freed_bytes, priority);
                let candidate_bytes = idle.freed_bytes + active.bytes;
                if candidate_bytes < required {
                    return EvictionOutcome {
                        candidate_bytes,
                        satisfied: false,
                        ..idle
                    };
                }

                let applied = apply(store, active);
                EvictionOutcome {
                    evicted: idle.evicted + applied.evicted,
                    freed_bytes: idle.freed_bytes + applied.freed_bytes,
                    candidate_bytes,
                    satisfied: true,
                    stopped: applied.stopped,
                }
            }
            EvictionCommit::AllOrNothing => {
                let idle = plan_idle(store, required);
                let active = if idle.bytes < required {
                    plan_lower_priority(store, required - idle.bytes, priority)
                } else {
                    Plan::default()
                };

                let candidate_bytes = idle.bytes + active.bytes;
                if candidate_bytes < required {
                    return EvictionOutcome {
                        candidate_bytes,
                        ..Default::default()
                    };
                }

                let idle = apply(store, idle);
                let active = apply(store, active);
                EvictionOutcome {
                    evicted: idle.evicted + active.evicted,
                    freed_bytes: idle.freed_bytes + active.freed_bytes,
                    candidate_bytes,
                    satisfied: true,
                    stopped: active.stopped,
                }
            }
        }
    }
}

/// Remove planned victims, keeping the handles of any still referenced.
fn apply(store: &mut CacheStore, plan: Plan) -> Applied {
    let mut applied = Applied::default();

    for identifier in plan.victims {
        match store.remove(&identifier) {
            Ok(entry) => {
                applied.evicted += 1;
                applied.freed_bytes += entry.byte_size();
                debug!(identifier = %identifier, bytes = entry.byte_size(), "Evicted sample");

                if !entry.is_idle() {
                    debug!(
                        identifier = %identifier,
                        references = entry.reference_count(),
                        "Evicted sample is still playing"
                    );
                    applied.stopped.push(entry.handle().clone());
                }
            }
            Err(e) => error!(identifier = %identifier, error = %e, "Planned eviction vanished"),
        }
    }

    applied
}

fn plan_idle(store: &CacheStore, required: u64) -> Plan {
    let mut plan = Plan::default();
    for (identifier, entry) in store.iter() {
        if required != 0 && plan.bytes >= required {
            break;
        }
        if entry.is_idle() {
            plan.push(identifier, entry.byte_size());
        }
    }
    plan
}

fn plan_lower_priority(store: &CacheStore, required: u64, priority: AudioPriority) -> Plan {
    let mut plan = Plan::default();
    for (identifier, entry) in store.iter() {
        if plan.bytes >= required {
            break;
        }
        if !entry.is_idle() && entry.priority() < priority {
            plan.push(identifier, entry.byte_size());
        }
    }
    plan
}
