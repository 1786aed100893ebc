// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Markov transition strategies.
//!
//! Every strategy answers the same question: given the current pitch and
//! the mood's scale, which pitches may come next and how likely is each?
//! Moods pick a strategy, and the weighted graph can delegate to any
//! other strategy for pitches it has no entry for.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::music::{Pitch, Scale};

/// Explicit weighted transition graph: pitch -> [(next, weight)]
pub type TransitionTable = BTreeMap<Pitch, Vec<(Pitch, f64)>>;

/// Candidate next pitches with unnormalized weights
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidates {
    entries: Vec<(Pitch, f64)>,
}

impl Candidates {
    /// Build from weighted pairs. Weights that are not finite and
    /// positive are discarded.
    pub fn weighted(entries: impl IntoIterator<Item = (Pitch, f64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|&(_, w)| w.is_finite() && w > 0.0)
                .collect(),
        }
    }

    /// Equal weight for every pitch
    pub fn uniform(pitches: &[Pitch]) -> Self {
        Self::weighted(pitches.iter().map(|&p| (p, 1.0)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Candidate pitches in declared order
    pub fn pitches(&self) -> impl Iterator<Item = Pitch> + '_ {
        self.entries.iter().map(|&(p, _)| p)
    }

    pub fn contains(&self, pitch: Pitch) -> bool {
        self.entries.iter().any(|&(p, _)| p == pitch)
    }

    /// Sum of raw weights
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    /// Weights normalized into a probability distribution
    pub fn probabilities(&self) -> Vec<(Pitch, f64)> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Vec::new();
        }
        self.entries.iter().map(|&(p, w)| (p, w / total)).collect()
    }

    /// Draw one pitch according to the weights.
    ///
    /// Uses a single uniform draw walked over the cumulative weights, so
    /// a zero-valued generator always yields the first candidate.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Pitch> {
        let (&(first, _), rest) = self.entries.split_first()?;
        if rest.is_empty() {
            return Some(first);
        }

        let mut roll = rng.gen::<f64>() * self.total_weight();
        for &(pitch, weight) in &self.entries {
            roll -= weight;
            if roll <= 0.0 {
                return Some(pitch);
            }
        }

        // Rounding residue lands on the last candidate
        self.entries.last().map(|&(p, _)| p)
    }
}

/// Strategy for producing next-pitch candidates
pub trait TransitionStrategy: Send + Sync + fmt::Debug {
    /// Candidates reachable from `pitch` within `scale`
    fn next_candidates(&self, pitch: Pitch, scale: &Scale) -> Candidates;

    /// Short identifier used in logs and listings
    fn name(&self) -> &'static str;

    /// Explicit table backing this strategy, if it has one
    fn table(&self) -> Option<&TransitionTable> {
        None
    }
}

/// Whole scale, equal weights
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformScale;

impl TransitionStrategy for UniformScale {
    fn next_candidates(&self, _pitch: Pitch, scale: &Scale) -> Candidates {
        Candidates::uniform(scale.pitches())
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

/// Stepwise motion: previous, same or next scale member
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleNeighbor;

impl TransitionStrategy for ScaleNeighbor {
    fn next_candidates(&self, pitch: Pitch, scale: &Scale) -> Candidates {
        match scale.neighbors(pitch) {
            Some(neighbors) => Candidates::uniform(&neighbors),
            None => UniformScale.next_candidates(pitch, scale),
        }
    }

    fn name(&self) -> &'static str {
        "neighbor"
    }
}

/// Hand-authored weighted graph with a fallback for missing pitches
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    table: TransitionTable,
    fallback: Arc<dyn TransitionStrategy>,
}

impl WeightedGraph {
    /// Graph falling back to the uniform scale
    pub fn new(table: TransitionTable) -> Self {
        Self {
            table,
            fallback: Arc::new(UniformScale),
        }
    }

    /// Use another strategy for pitches absent from the table
    pub fn with_fallback(mut self, fallback: Arc<dyn TransitionStrategy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> &dyn TransitionStrategy {
        self.fallback.as_ref()
    }
}

impl TransitionStrategy for WeightedGraph {
    fn next_candidates(&self, pitch: Pitch, scale: &Scale) -> Candidates {
        match self.table.get(&pitch) {
            // A present but empty entry is malformed and stays empty
            Some(entries) => Candidates::weighted(entries.iter().copied()),
            None => self.fallback.next_candidates(pitch, scale),
        }
    }

    fn name(&self) -> &'static str {
        "weighted"
    }

    fn table(&self) -> Option<&TransitionTable> {
        Some(&self.table)
    }
}

/// Strategy draw as used by the generator: sample one next pitch
pub fn next_pitch(
    strategy: &dyn TransitionStrategy,
    pitch: Pitch,
    scale: &Scale,
    rng: &mut dyn RngCore,
) -> Option<Pitch> {
    strategy.next_candidates(pitch, scale).sample(rng)
}
