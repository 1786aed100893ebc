// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Mood profiles and the registry they are looked up in.
//!
//! A profile bundles everything a mood controls: the pitch palette,
//! tempo, General MIDI instrument, transition strategy, harmony interval
//! and rhythm. The registry is built once at startup and only read after
//! that.

pub mod builtin;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::generators::rhythm::{DurationPolicy, QuarterOrEighth};
use crate::generators::transition::{TransitionStrategy, TransitionTable, UniformScale};
use crate::music::{Harmony, Pitch, Scale};

/// Default base velocity before jitter
pub const DEFAULT_VELOCITY: u8 = 80;

/// Everything a mood controls
#[derive(Clone)]
pub struct MoodProfile {
    name: String,
    scale: Scale,
    tempo_bpm: u16,
    instrument: u8,
    harmony: Harmony,
    velocity: u8,
    transitions: Arc<dyn TransitionStrategy>,
    rhythm: Arc<dyn DurationPolicy>,
}

impl MoodProfile {
    /// Create a profile with uniform transitions, solo harmony and the
    /// random quarter/eighth rhythm.
    pub fn new(name: impl Into<String>, scale: Scale, tempo_bpm: u16, instrument: u8) -> Result<Self> {
        let name = normalize_name(&name.into());
        if name.is_empty() {
            return Err(Error::InvalidProfile("mood name is empty".to_string()));
        }
        if tempo_bpm == 0 {
            return Err(Error::InvalidProfile(format!(
                "mood '{}' has a tempo of 0 BPM",
                name
            )));
        }
        if instrument > 127 {
            return Err(Error::InvalidProfile(format!(
                "mood '{}' instrument {} is outside 0-127",
                name, instrument
            )));
        }

        Ok(Self {
            name,
            scale,
            tempo_bpm,
            instrument,
            harmony: Harmony::Solo,
            velocity: DEFAULT_VELOCITY,
            transitions: Arc::new(UniformScale),
            rhythm: Arc::new(QuarterOrEighth),
        })
    }

    /// Set the transition strategy
    pub fn with_transitions(mut self, strategy: impl TransitionStrategy + 'static) -> Self {
        self.transitions = Arc::new(strategy);
        self
    }

    /// Set an already shared transition strategy
    pub fn with_shared_transitions(mut self, strategy: Arc<dyn TransitionStrategy>) -> Self {
        self.transitions = strategy;
        self
    }

    /// Set the duration policy
    pub fn with_rhythm(mut self, policy: impl DurationPolicy + 'static) -> Self {
        self.rhythm = Arc::new(policy);
        self
    }

    /// Set the harmony interval
    pub fn with_harmony(mut self, harmony: Harmony) -> Self {
        self.harmony = harmony;
        self
    }

    /// Set the base velocity (clamped to 1-127)
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.clamp(1, 127);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn tempo_bpm(&self) -> u16 {
        self.tempo_bpm
    }

    pub fn instrument(&self) -> u8 {
        self.instrument
    }

    pub fn harmony(&self) -> Harmony {
        self.harmony
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn transitions(&self) -> &dyn TransitionStrategy {
        self.transitions.as_ref()
    }

    /// Explicit transition table, when the strategy is table driven
    pub fn transition_table(&self) -> Option<&TransitionTable> {
        self.transitions.table()
    }

    pub fn rhythm(&self) -> &dyn DurationPolicy {
        self.rhythm.as_ref()
    }

    /// Milliseconds per quarter note
    pub fn ms_per_beat(&self) -> f64 {
        60_000.0 / self.tempo_bpm as f64
    }

    /// Harmony set for a melody pitch
    pub fn chord_for(&self, pitch: Pitch) -> Vec<Pitch> {
        self.harmony.expand(pitch)
    }
}

impl fmt::Debug for MoodProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoodProfile")
            .field("name", &self.name)
            .field("scale", &self.scale)
            .field("tempo_bpm", &self.tempo_bpm)
            .field("instrument", &self.instrument)
            .field("harmony", &self.harmony)
            .field("transitions", &self.transitions.name())
            .field("rhythm", &self.rhythm.name())
            .finish()
    }
}

/// Immutable lookup table from mood name to profile
#[derive(Debug, Clone, Default)]
pub struct MoodRegistry {
    moods: BTreeMap<String, MoodProfile>,
}

impl MoodRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in moods
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for profile in builtin::profiles() {
            registry.insert(profile);
        }
        registry
    }

    /// Add or replace a mood
    pub fn insert(&mut self, profile: MoodProfile) {
        debug!(mood = profile.name(), "registering mood");
        self.moods.insert(profile.name.clone(), profile);
    }

    /// Find a mood by name (case-insensitive, surrounding whitespace ignored)
    pub fn lookup(&self, name: &str) -> Result<&MoodProfile> {
        self.moods
            .get(&normalize_name(name))
            .ok_or_else(|| Error::UnknownMood {
                name: name.trim().to_string(),
                available: self.names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.moods.contains_key(&normalize_name(name))
    }

    /// Registered mood names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.moods.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoodProfile> {
        self.moods.values()
    }

    pub fn len(&self) -> usize {
        self.moods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
