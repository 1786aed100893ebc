// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File output for generated melodies.
//!
//! This module provides:
//! - Standard MIDI file export of rendered streams
//! - Plain-text pitch logs

pub mod export;
pub mod text_log;

pub use export::{MidiExporter, DEFAULT_PPQN};
pub use text_log::{save_pitch_log, write_pitch_log};
