//! # Sound Requests
//!
//! Structured open requests. A sound event plays up to three segments in
//! order (attack, main sound, decay); the request carries which one is next,
//! the event priority and whether the sound is positioned in 3D space.

use serde::{Deserialize, Serialize};

/// Ordinal importance of a sound event.
///
/// Used only to decide which active samples may be evicted to make room for a
/// more important one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AudioPriority {
    /// Also used for samples opened by identifier alone.
    #[default]
    Lowest,
    Low,
    Normal,
    High,
    Critical,
}

/// Which segment of a sound event plays next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayPortion {
    #[default]
    Attack,
    Sound,
    Decay,
    /// Every segment has played; nothing left to open.
    Done,
}

impl PlayPortion {
    /// The portion that follows this one.
    pub fn next(self) -> Self {
        match self {
            PlayPortion::Attack => PlayPortion::Sound,
            PlayPortion::Sound => PlayPortion::Decay,
            PlayPortion::Decay | PlayPortion::Done => PlayPortion::Done,
        }
    }
}

/// Request to open one segment of a sound event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundRequest {
    /// File played before the main sound (may be empty).
    #[serde(default)]
    pub attack: String,
    /// Main sound file.
    pub sound: String,
    /// File played after the main sound (may be empty).
    #[serde(default)]
    pub decay: String,
    /// Segment to open next.
    #[serde(default)]
    pub portion: PlayPortion,
    #[serde(default)]
    pub priority: AudioPriority,
    /// Positional sounds are mixed in 3D and must be mono.
    #[serde(default)]
    pub positional: bool,
}

impl SoundRequest {
    /// Request for the main sound only, starting at [`PlayPortion::Sound`].
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            portion: PlayPortion::Sound,
            ..Default::default()
        }
    }

    /// Set the attack segment and start from it.
    pub fn with_attack(mut self, attack: impl Into<String>) -> Self {
        self.attack = attack.into();
        self.portion = PlayPortion::Attack;
        self
    }

    /// Set the decay segment.
    pub fn with_decay(mut self, decay: impl Into<String>) -> Self {
        self.decay = decay.into();
        self
    }

    pub fn with_priority(mut self, priority: AudioPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_positional(mut self, positional: bool) -> Self {
        self.positional = positional;
        self
    }

    pub fn at_portion(mut self, portion: PlayPortion) -> Self {
        self.portion = portion;
        self
    }

    /// Identifier selected by the current portion, `None` once done.
    pub fn current_identifier(&self) -> Option<&str> {
        match self.portion {
            PlayPortion::Attack => Some(&self.attack),
            PlayPortion::Sound => Some(&self.sound),
            PlayPortion::Decay => Some(&self.decay),
            PlayPortion::Done => None,
        }
    }

    /// Move to the next portion, returning it.
    pub fn advance(&mut self) -> PlayPortion {
        self.portion = self.portion.next();
        self.portion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(AudioPriority::Lowest < AudioPriority::Low);
        assert!(AudioPriority::Normal < AudioPriority::High);
        assert!(AudioPriority::High < AudioPriority::Critical);
        assert_eq!(AudioPriority::default(), AudioPriority::Lowest);
    }

    #[test]
    fn test_portion_selects_segment() {
        let mut request = SoundRequest::new("loop.wav")
            .with_attack("start.wav")
            .with_decay("end.wav");

        assert_eq!(request.current_identifier(), Some("start.wav"));
        assert_eq!(request.advance(), PlayPortion::Sound);
        assert_eq!(request.current_identifier(), Some("loop.wav"));
        assert_eq!(request.advance(), PlayPortion::Decay);
        assert_eq!(request.current_identifier(), Some("end.wav"));
        assert_eq!(request.advance(), PlayPortion::Done);
        assert_eq!(request.current_identifier(), None);
        assert_eq!(request.advance(), PlayPortion::Done);
    }

    #[test]
    fn test_missing_segments_are_empty() {
        let request = SoundRequest::new("gun.wav").at_portion(PlayPortion::Decay);
        assert_eq!(request.current_identifier(), Some(""));
    }

    #[test]
    fn test_request_from_json() {
        let request: SoundRequest = serde_json::from_str(
            r#"{ "sound": "tank_move.wav", "priority": "high", "positional": true, "portion": "sound" }"#,
        )
        .unwrap();

        assert_eq!(request.current_identifier(), Some("tank_move.wav"));
        assert_eq!(request.priority, AudioPriority::High);
        assert!(request.positional);
    }
}
