// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note duration policies.
//!
//! Durations are expressed in beats (quarter note = 1.0). The renderer
//! turns beats into milliseconds and ticks using the mood's tempo.

use std::fmt;

use rand::{Rng, RngCore};

/// Quarter note in beats
pub const QUARTER: f64 = 1.0;
/// Eighth note in beats
pub const EIGHTH: f64 = 0.5;

/// Chooses the duration of each generated note
pub trait DurationPolicy: Send + Sync + fmt::Debug {
    /// Duration in beats of the note at position `index`
    fn duration(&self, index: usize, rng: &mut dyn RngCore) -> f64;

    fn name(&self) -> &'static str;
}

/// Same duration for every note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(pub f64);

impl Default for Fixed {
    fn default() -> Self {
        Fixed(QUARTER)
    }
}

impl DurationPolicy for Fixed {
    fn duration(&self, _index: usize, _rng: &mut dyn RngCore) -> f64 {
        self.0
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Coin flip between a quarter and an eighth note
#[derive(Debug, Clone, Copy, Default)]
pub struct QuarterOrEighth;

impl DurationPolicy for QuarterOrEighth {
    fn duration(&self, _index: usize, rng: &mut dyn RngCore) -> f64 {
        if rng.gen_bool(0.5) {
            QUARTER
        } else {
            EIGHTH
        }
    }

    fn name(&self) -> &'static str {
        "quarter_or_eighth"
    }
}

/// Repeating rhythm indexed by note position
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    beats: Vec<f64>,
}

impl Pattern {
    /// Build a cyclic pattern. Non-positive entries are removed; an
    /// empty result falls back to a single quarter note.
    pub fn new(beats: impl IntoIterator<Item = f64>) -> Self {
        let mut beats: Vec<f64> = beats
            .into_iter()
            .filter(|b| b.is_finite() && *b > 0.0)
            .collect();
        if beats.is_empty() {
            beats.push(QUARTER);
        }
        Self { beats }
    }

    pub fn beats(&self) -> &[f64] {
        &self.beats
    }
}

impl DurationPolicy for Pattern {
    fn duration(&self, index: usize, _rng: &mut dyn RngCore) -> f64 {
        self.beats[index % self.beats.len()]
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}
