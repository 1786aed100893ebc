// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generative engine for mood-driven melodies.
//!
//! This module provides the Markov transition strategies, the duration
//! policies and the melody generator that drives them.

pub mod melody;
pub mod rhythm;
pub mod transition;

use serde::{Deserialize, Serialize};

use crate::music::Pitch;

pub use melody::MelodyGenerator;
pub use rhythm::{DurationPolicy, Fixed, Pattern, QuarterOrEighth};
pub use transition::{
    Candidates, ScaleNeighbor, TransitionStrategy, TransitionTable, UniformScale, WeightedGraph,
};

/// One note of a generated melody
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI note number (0-127)
    pub pitch: Pitch,
    /// Duration in beats (quarter note = 1.0)
    pub duration_beats: f64,
    /// Base velocity before rendering jitter (1-127)
    pub velocity: u8,
    /// Offset from the start of the melody in beats
    pub start_beats: f64,
}

impl NoteEvent {
    /// Create a new note event
    pub fn new(pitch: Pitch, duration_beats: f64, velocity: u8, start_beats: f64) -> Self {
        Self {
            pitch,
            duration_beats,
            velocity,
            start_beats,
        }
    }

    /// Beat position where this note ends
    pub fn end_beats(&self) -> f64 {
        self.start_beats + self.duration_beats
    }
}
