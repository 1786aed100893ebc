// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities.
//!
//! Pitch and scale definitions plus the harmony intervals moods stack
//! on top of each melody note.

pub mod scale;

use serde::{Deserialize, Serialize};

pub use scale::{Note, Pitch, Scale, ScaleType, MAX_PITCH};

/// Fixed interval stacked on every melody note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Harmony {
    /// Melody only
    #[default]
    Solo,
    /// +4 semitones
    MajorThird,
    /// +3 semitones
    MinorThird,
}

impl Harmony {
    /// Semitones above the melody pitch, if any
    pub fn interval(self) -> Option<u8> {
        match self {
            Harmony::Solo => None,
            Harmony::MajorThird => Some(4),
            Harmony::MinorThird => Some(3),
        }
    }

    /// Pitches sounding together for one melody note.
    ///
    /// The melody pitch always comes first. A harmony pitch that would
    /// leave the MIDI range is dropped.
    pub fn expand(self, pitch: Pitch) -> Vec<Pitch> {
        let mut chord = vec![pitch];
        if let Some(upper) = self
            .interval()
            .and_then(|i| pitch.checked_add(i))
            .filter(|&p| p <= MAX_PITCH)
        {
            if !chord.contains(&upper) {
                chord.push(upper);
            }
        }
        chord
    }

    /// Parse from config text
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "solo" | "none" => Some(Harmony::Solo),
            "major_third" | "major" => Some(Harmony::MajorThird),
            "minor_third" | "minor" => Some(Harmony::MinorThird),
            _ => None,
        }
    }
}
