// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitches, note names and the ordered scales moods draw from.
//!
//! A [`Scale`] here is a concrete palette of MIDI pitches, not an abstract
//! pitch-class set: position in the scale drives neighbor transitions, so
//! order is preserved exactly as declared.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// MIDI note number (0-127, middle C = 60)
pub type Pitch = u8;

/// Highest valid MIDI pitch
pub const MAX_PITCH: Pitch = 127;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Note {
    /// Pitch class (0-11)
    pub fn pitch_class(self) -> u8 {
        match self {
            Note::C => 0,
            Note::Cs => 1,
            Note::D => 2,
            Note::Ds => 3,
            Note::E => 4,
            Note::F => 5,
            Note::Fs => 6,
            Note::G => 7,
            Note::Gs => 8,
            Note::A => 9,
            Note::As => 10,
            Note::B => 11,
        }
    }

    /// Parse note from string (e.g., "C", "C#", "Db", "F#")
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" | "BS" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }

    /// MIDI pitch of this note in the given octave (C4 = 60)
    pub fn in_octave(self, octave: i8) -> Option<Pitch> {
        let midi = (octave as i16 + 1) * 12 + self.pitch_class() as i16;
        if (0..=MAX_PITCH as i16).contains(&midi) {
            Some(midi as Pitch)
        } else {
            None
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Scale types usable when a mood is declared by key instead of pitch list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    NaturalMinor,
    HarmonicMinor,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    WholeTone,
    Chromatic,
}

impl ScaleType {
    /// Semitones from root
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            ScaleType::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleType::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleType::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleType::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::MajorPentatonic => &[0, 2, 4, 7, 9],
            ScaleType::MinorPentatonic => &[0, 3, 5, 7, 10],
            ScaleType::Blues => &[0, 3, 5, 6, 7, 10],
            ScaleType::WholeTone => &[0, 2, 4, 6, 8, 10],
            ScaleType::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }

    /// Parse scale type from string
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" | "ionian" => Some(ScaleType::Major),
            "dorian" => Some(ScaleType::Dorian),
            "phrygian" => Some(ScaleType::Phrygian),
            "lydian" => Some(ScaleType::Lydian),
            "mixolydian" => Some(ScaleType::Mixolydian),
            "minor" | "naturalminor" | "aeolian" => Some(ScaleType::NaturalMinor),
            "harmonicminor" => Some(ScaleType::HarmonicMinor),
            "majorpentatonic" | "pentatonicmajor" => Some(ScaleType::MajorPentatonic),
            "minorpentatonic" | "pentatonicminor" | "pentatonic" => {
                Some(ScaleType::MinorPentatonic)
            }
            "blues" => Some(ScaleType::Blues),
            "wholetone" => Some(ScaleType::WholeTone),
            "chromatic" => Some(ScaleType::Chromatic),
            _ => None,
        }
    }
}

/// Ordered, deduplicated, non-empty set of pitches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    pitches: Vec<Pitch>,
}

impl Scale {
    /// Build a scale from an explicit pitch list.
    ///
    /// Duplicates are dropped keeping the first occurrence. Fails on an
    /// empty list or a pitch above 127.
    pub fn new(pitches: impl IntoIterator<Item = Pitch>) -> Result<Self> {
        let mut unique: Vec<Pitch> = Vec::new();
        for pitch in pitches {
            if pitch > MAX_PITCH {
                return Err(Error::InvalidProfile(format!(
                    "pitch {} is outside the MIDI range",
                    pitch
                )));
            }
            if !unique.contains(&pitch) {
                unique.push(pitch);
            }
        }

        if unique.is_empty() {
            return Err(Error::InvalidProfile("scale has no pitches".to_string()));
        }

        Ok(Self { pitches: unique })
    }

    /// Build an ascending scale from a root, type and starting octave.
    ///
    /// With `close_octave` the root an octave up is appended, matching
    /// the eight-note palettes the built-in moods use.
    pub fn from_key(root: Note, scale_type: ScaleType, octave: i8, close_octave: bool) -> Result<Self> {
        let base = root.in_octave(octave).ok_or_else(|| {
            Error::InvalidProfile(format!("{}{} is outside the MIDI range", root, octave))
        })?;

        let mut pitches: Vec<Pitch> = scale_type
            .intervals()
            .iter()
            .filter_map(|&i| base.checked_add(i))
            .filter(|&p| p <= MAX_PITCH)
            .collect();

        if close_octave {
            if let Some(top) = base.checked_add(12).filter(|&p| p <= MAX_PITCH) {
                pitches.push(top);
            }
        }

        Self::new(pitches)
    }

    /// Parse a key such as ("A", "minor") at the given octave
    pub fn parse(root: &str, scale_type: &str, octave: i8, close_octave: bool) -> Result<Self> {
        let note = Note::from_str(root)
            .ok_or_else(|| Error::InvalidProfile(format!("unknown root note '{}'", root)))?;
        let kind = ScaleType::from_str(scale_type)
            .ok_or_else(|| Error::InvalidProfile(format!("unknown scale type '{}'", scale_type)))?;
        Self::from_key(note, kind, octave, close_octave)
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn contains(&self, pitch: Pitch) -> bool {
        self.pitches.contains(&pitch)
    }

    /// Index of a pitch within the scale
    pub fn position(&self, pitch: Pitch) -> Option<usize> {
        self.pitches.iter().position(|&p| p == pitch)
    }

    /// Previous, same and next scale members around `pitch`, clamped at
    /// the ends. `None` when the pitch is not part of the scale.
    pub fn neighbors(&self, pitch: Pitch) -> Option<Vec<Pitch>> {
        let i = self.position(pitch)?;
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(self.len() - 1);
        Some(self.pitches[lo..=hi].to_vec())
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.pitches.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
