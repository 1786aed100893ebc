// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Melody generator driving a Markov walk over a mood's scale.
//!
//! The walk starts on a uniformly drawn scale pitch. Every step emits the
//! current pitch with a duration from the mood's rhythm policy, then
//! samples the next pitch from the mood's transition strategy.

use rand::{Rng, RngCore};
use tracing::{debug, trace};

use super::transition::next_pitch;
use super::NoteEvent;
use crate::error::{Error, Result};
use crate::mood::{MoodProfile, MoodRegistry};

/// Generates melodies for the moods of a registry
#[derive(Debug, Clone, Copy)]
pub struct MelodyGenerator<'a> {
    registry: &'a MoodRegistry,
}

impl<'a> MelodyGenerator<'a> {
    /// Create a generator reading from `registry`
    pub fn new(registry: &'a MoodRegistry) -> Self {
        Self { registry }
    }

    /// Generate `length` notes for the named mood
    pub fn generate<R: RngCore>(
        &self,
        mood: &str,
        length: usize,
        rng: &mut R,
    ) -> Result<Vec<NoteEvent>> {
        let profile = self.registry.lookup(mood)?;
        generate_for_profile(profile, length, rng)
    }
}

/// Generate `length` notes for an already resolved profile
pub fn generate_for_profile(
    profile: &MoodProfile,
    length: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<NoteEvent>> {
    if length == 0 {
        return Err(Error::InvalidLength(length));
    }

    let scale = profile.scale();
    let pitches = scale.pitches();
    let mut pitch = pitches[rng.gen_range(0..pitches.len())];

    debug!(
        mood = profile.name(),
        length,
        start = pitch,
        strategy = profile.transitions().name(),
        "generating melody"
    );

    let mut melody = Vec::with_capacity(length);
    let mut position = 0.0;

    for index in 0..length {
        let duration = profile.rhythm().duration(index, rng);
        melody.push(NoteEvent::new(pitch, duration, profile.velocity(), position));
        position += duration;

        if index + 1 == length {
            break;
        }

        let next = next_pitch(profile.transitions(), pitch, scale, rng).ok_or_else(|| {
            Error::DegenerateTransition {
                mood: profile.name().to_string(),
                pitch,
            }
        })?;
        trace!(from = pitch, to = next, "transition");
        pitch = next;
    }

    Ok(melody)
}
