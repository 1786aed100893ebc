// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! moodseq - mood-conditioned melody generator.
//!
//! A mood selects a scale, tempo, instrument, harmony and a Markov
//! transition strategy. The generator walks that strategy to produce a
//! melody, the renderer turns it into timed MIDI events, and the events
//! are played on a MIDI port or written to a Standard MIDI File.

pub mod config;
pub mod error;
pub mod generators;
pub mod midi;
pub mod mood;
pub mod music;
pub mod recording;
pub mod render;
pub mod rng;

pub use error::{Error, Result};
pub use generators::{MelodyGenerator, NoteEvent};
pub use mood::{MoodProfile, MoodRegistry};
pub use render::{EventRenderer, MidiEventKind, RenderConfig, TimedMidiEvent};
pub use rng::SharedRng;
