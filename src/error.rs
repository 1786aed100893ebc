// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types shared across the crate.

use thiserror::Error;

use crate::music::Pitch;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by generation, rendering and output.
///
/// Every variant is recoverable: callers report it and abandon the
/// current step, the process keeps running.
#[derive(Debug, Error)]
pub enum Error {
    /// Mood name is not in the registry
    #[error("unknown mood '{name}' (available: {})", available.join(", "))]
    UnknownMood { name: String, available: Vec<String> },

    /// A pitch produced no usable next-candidate set
    #[error("pitch {pitch} has no valid transitions in mood '{mood}'")]
    DegenerateTransition { mood: String, pitch: Pitch },

    /// No real-time output device could be opened
    #[error("no MIDI output device available: {0}")]
    NoOutputDevice(String),

    /// Requested melody length was zero
    #[error("melody length must be at least 1 (got {0})")]
    InvalidLength(usize),

    /// A mood profile violates its invariants
    #[error("invalid mood profile: {0}")]
    InvalidProfile(String),

    /// Configuration file could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// The output transport rejected a message
    #[error("MIDI output error: {0}")]
    Output(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for conditions that only affect real-time playback
    pub fn is_playback_only(&self) -> bool {
        matches!(self, Error::NoOutputDevice(_) | Error::Output(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mood_lists_available() {
        let err = Error::UnknownMood {
            name: "grumpy".to_string(),
            available: vec!["happy".to_string(), "sad".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("grumpy"));
        assert!(msg.contains("happy, sad"));
    }

    #[test]
    fn test_playback_only_classification() {
        assert!(Error::NoOutputDevice("none".into()).is_playback_only());
        assert!(!Error::InvalidLength(0).is_playback_only());
        assert!(!Error::DegenerateTransition {
            mood: "happy".into(),
            pitch: 60
        }
        .is_playback_only());
    }
}
