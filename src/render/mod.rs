// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Event renderer: melody notes to a timed MIDI event stream.
//!
//! The stream starts with one program change selecting the mood's
//! instrument. Each melody note then becomes a chord (the note plus the
//! mood's harmony interval). It is switched on together, held for the
//! tempo-derived duration with a little swing, and switched off together.
//! Every event carries absolute positions in milliseconds and ticks, so
//! playback and file writers never re-derive timing.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::generators::NoteEvent;
use crate::midi::messages;
use crate::mood::MoodProfile;
use crate::music::Pitch;

/// Kind of a rendered MIDI event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEventKind {
    /// Select an instrument
    ProgramChange { program: u8 },
    /// Start a note
    NoteOn { pitch: Pitch, velocity: u8 },
    /// Stop a note
    NoteOff { pitch: Pitch },
}

/// A MIDI event at an absolute position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMidiEvent {
    /// Time in milliseconds from sequence start
    pub time_ms: u64,
    /// Time in ticks from sequence start
    pub time_ticks: u64,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Message
    pub kind: MidiEventKind,
}

impl TimedMidiEvent {
    /// Create a program change event
    pub fn program_change(time_ms: u64, time_ticks: u64, channel: u8, program: u8) -> Self {
        Self {
            time_ms,
            time_ticks,
            channel,
            kind: MidiEventKind::ProgramChange { program },
        }
    }

    /// Create a note on event
    pub fn note_on(time_ms: u64, time_ticks: u64, channel: u8, pitch: Pitch, velocity: u8) -> Self {
        Self {
            time_ms,
            time_ticks,
            channel,
            kind: MidiEventKind::NoteOn { pitch, velocity },
        }
    }

    /// Create a note off event
    pub fn note_off(time_ms: u64, time_ticks: u64, channel: u8, pitch: Pitch) -> Self {
        Self {
            time_ms,
            time_ticks,
            channel,
            kind: MidiEventKind::NoteOff { pitch },
        }
    }

    /// Convert to MIDI bytes
    pub fn to_midi_bytes(&self) -> Vec<u8> {
        let channel = self.channel & 0x0F;
        match self.kind {
            MidiEventKind::ProgramChange { program } => {
                vec![messages::PROGRAM_CHANGE | channel, program & 0x7F]
            }
            MidiEventKind::NoteOn { pitch, velocity } => {
                vec![messages::NOTE_ON | channel, pitch & 0x7F, velocity & 0x7F]
            }
            MidiEventKind::NoteOff { pitch } => vec![messages::NOTE_OFF | channel, pitch & 0x7F, 0],
        }
    }

    pub fn is_note_off(&self) -> bool {
        matches!(self.kind, MidiEventKind::NoteOff { .. })
    }
}

/// Timing and dynamics settings for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum swing offset in either direction (ms)
    pub swing_ms: u32,
    /// Maximum velocity added on top of the mood's base velocity
    pub velocity_jitter: u8,
    /// Shortest allowed note (ms), applied after swing
    pub min_duration_ms: u64,
    /// Ticks per quarter note for tick positions
    pub ppqn: u16,
    /// MIDI channel (0-15)
    pub channel: u8,
}

/// Largest PPQN a Standard MIDI File header can carry
pub const MAX_PPQN: u16 = 0x7FFF;

impl RenderConfig {
    /// Reject settings the renderer would otherwise have to alter
    pub fn validate(&self) -> Result<()> {
        if self.ppqn == 0 || self.ppqn > MAX_PPQN {
            return Err(Error::Config(format!(
                "ppqn must be between 1 and {} (got {})",
                MAX_PPQN, self.ppqn
            )));
        }
        if self.channel > 15 {
            return Err(Error::Config(format!(
                "channel must be between 0 and 15 (got {})",
                self.channel
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            swing_ms: 5,
            velocity_jitter: 29,
            min_duration_ms: 10,
            ppqn: 480,
            channel: 0,
        }
    }
}

/// Turns melodies into timed event streams
#[derive(Debug, Clone, Default)]
pub struct EventRenderer {
    config: RenderConfig,
}

impl EventRenderer {
    /// Create a renderer with the given settings
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `notes` with the timing and instrument of `profile`
    pub fn render<R: RngCore>(
        &self,
        notes: &[NoteEvent],
        profile: &MoodProfile,
        rng: &mut R,
    ) -> Vec<TimedMidiEvent> {
        let channel = self.config.channel & 0x0F;
        let ms_per_beat = profile.ms_per_beat();
        let ppqn = self.config.ppqn.clamp(1, MAX_PPQN) as f64;
        let swing = self.config.swing_ms as i64;
        let min_ms = self.config.min_duration_ms.max(1);

        let mut events = Vec::with_capacity(1 + notes.len() * 4);
        events.push(TimedMidiEvent::program_change(0, 0, channel, profile.instrument()));

        let mut now_ms = 0u64;
        let mut now_ticks = 0u64;

        for note in notes {
            let chord = profile.chord_for(note.pitch);
            if chord.len() == 1 && profile.harmony().interval().is_some() {
                debug!(pitch = note.pitch, "harmony above MIDI range dropped");
            }
            let velocity = self.velocity(note.velocity, rng);
            let offset = if swing > 0 {
                rng.gen_range(-swing..=swing)
            } else {
                0
            };

            let nominal_ms = (ms_per_beat * note.duration_beats).round() as i64;
            let step_ms = (nominal_ms + offset).max(min_ms as i64) as u64;
            let step_ticks = ((step_ms as f64 * ppqn / ms_per_beat).round() as u64).max(1);

            for &pitch in &chord {
                events.push(TimedMidiEvent::note_on(now_ms, now_ticks, channel, pitch, velocity));
            }

            now_ms += step_ms;
            now_ticks += step_ticks;

            for &pitch in &chord {
                events.push(TimedMidiEvent::note_off(now_ms, now_ticks, channel, pitch));
            }
        }

        debug!(
            mood = profile.name(),
            notes = notes.len(),
            events = events.len(),
            total_ms = now_ms,
            total_ticks = now_ticks,
            "rendered melody"
        );

        events
    }

    fn velocity<R: RngCore>(&self, base: u8, rng: &mut R) -> u8 {
        let jitter = if self.config.velocity_jitter > 0 {
            rng.gen_range(0..=self.config.velocity_jitter as u16)
        } else {
            0
        };
        (base as u16 + jitter).clamp(1, 127) as u8
    }
}

/// Length of a rendered stream in milliseconds
pub fn total_duration_ms(events: &[TimedMidiEvent]) -> u64 {
    events.last().map(|e| e.time_ms).unwrap_or(0)
}
