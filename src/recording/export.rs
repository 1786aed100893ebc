// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.
//!
//! Writes a rendered event stream as a format 0 file with a single track.
//! Event positions are taken from the stream's tick stamps as they are.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::mood::builtin::program;
use crate::mood::MoodProfile;
use crate::render::{TimedMidiEvent, MAX_PPQN};

/// Default ticks per quarter note
pub const DEFAULT_PPQN: u16 = 480;

/// MIDI event for export
#[derive(Debug, Clone)]
struct MidiExportEvent {
    /// Absolute tick
    tick: u64,
    /// Event data
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn from_rendered(event: &TimedMidiEvent) -> Self {
        Self {
            tick: event.time_ticks,
            data: event.to_midi_bytes(),
        }
    }

    fn tempo(tick: u64, bpm: u16) -> Self {
        let microseconds = (60_000_000 / bpm.max(1) as u32).min(0xFF_FFFF);
        Self {
            tick,
            data: vec![
                0xFF, 0x51, 0x03,
                ((microseconds >> 16) & 0xFF) as u8,
                ((microseconds >> 8) & 0xFF) as u8,
                (microseconds & 0xFF) as u8,
            ],
        }
    }

    fn text_meta(tick: u64, kind: u8, text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut data = vec![0xFF, kind];
        write_variable_length(&mut data, bytes.len() as u32);
        data.extend_from_slice(bytes);
        Self { tick, data }
    }

    fn track_name(tick: u64, name: &str) -> Self {
        Self::text_meta(tick, 0x03, name)
    }

    fn instrument_name(tick: u64, name: &str) -> Self {
        Self::text_meta(tick, 0x04, name)
    }
}

/// MIDI file exporter
#[derive(Debug, Clone)]
pub struct MidiExporter {
    /// PPQN written to the header
    ppqn: u16,
    /// Tempo in BPM
    tempo: u16,
    /// Track name meta
    track_name: String,
    /// Instrument name meta
    instrument_name: Option<String>,
}

impl MidiExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self {
            ppqn: DEFAULT_PPQN,
            tempo: 120,
            track_name: "moodseq".to_string(),
            instrument_name: None,
        }
    }

    /// Exporter labelled with a mood's name, tempo and instrument
    pub fn for_profile(profile: &MoodProfile, ppqn: u16) -> Self {
        let mut exporter = Self::new();
        exporter.set_ppqn(ppqn);
        exporter.set_tempo(profile.tempo_bpm());
        exporter.set_track_name(profile.name());
        exporter.set_instrument_name(program::name(profile.instrument()));
        exporter
    }

    /// Set PPQN
    pub fn set_ppqn(&mut self, ppqn: u16) {
        self.ppqn = ppqn.clamp(1, MAX_PPQN);
    }

    /// Get PPQN
    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Set tempo
    pub fn set_tempo(&mut self, bpm: u16) {
        self.tempo = bpm.max(1);
    }

    /// Get tempo
    pub fn tempo(&self) -> u16 {
        self.tempo
    }

    pub fn set_track_name(&mut self, name: impl Into<String>) {
        self.track_name = name.into();
    }

    pub fn set_instrument_name(&mut self, name: impl Into<String>) {
        self.instrument_name = Some(name.into());
    }

    /// Export to file
    pub fn export<P: AsRef<Path>>(&self, events: &[TimedMidiEvent], path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(events, &mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), events = events.len(), "wrote MIDI file");
        Ok(())
    }

    /// Write MIDI data to writer
    pub fn write<W: Write>(&self, events: &[TimedMidiEvent], writer: &mut W) -> Result<()> {
        writer.write_all(&self.export_to_bytes(events))?;
        Ok(())
    }

    /// Encode a complete file in memory
    pub fn export_to_bytes(&self, events: &[TimedMidiEvent]) -> Vec<u8> {
        let mut track = Vec::with_capacity(events.len() + 3);
        track.push(MidiExportEvent::track_name(0, &self.track_name));
        track.push(MidiExportEvent::tempo(0, self.tempo));
        if let Some(name) = &self.instrument_name {
            track.push(MidiExportEvent::instrument_name(0, name));
        }
        track.extend(events.iter().map(MidiExportEvent::from_rendered));

        let mut buffer = Vec::new();
        self.write_header(&mut buffer, 0, 1);
        self.write_track(&mut buffer, &track);
        buffer
    }

    /// Write MIDI file header chunk
    fn write_header(&self, buffer: &mut Vec<u8>, format: u16, num_tracks: u16) {
        // MThd
        buffer.extend_from_slice(b"MThd");
        // Chunk length (always 6)
        buffer.extend_from_slice(&[0, 0, 0, 6]);
        buffer.extend_from_slice(&format.to_be_bytes());
        buffer.extend_from_slice(&num_tracks.to_be_bytes());
        buffer.extend_from_slice(&self.ppqn.to_be_bytes());
    }

    /// Write a track chunk
    fn write_track(&self, buffer: &mut Vec<u8>, events: &[MidiExportEvent]) {
        let mut track_data = Vec::new();
        let mut last_tick = 0u64;

        for event in events {
            let delta = event.tick.saturating_sub(last_tick).min(0x0FFF_FFFF);
            write_variable_length(&mut track_data, delta as u32);
            track_data.extend_from_slice(&event.data);
            last_tick = last_tick.max(event.tick);
        }

        // End of track
        write_variable_length(&mut track_data, 0);
        track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);

        // MTrk
        buffer.extend_from_slice(b"MTrk");
        buffer.extend_from_slice(&(track_data.len() as u32).to_be_bytes());
        buffer.extend_from_slice(&track_data);
    }
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write variable-length quantity
fn write_variable_length(buffer: &mut Vec<u8>, mut value: u32) {
    let mut bytes = Vec::with_capacity(4);

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    buffer.extend_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::MoodRegistry;

    fn stream() -> Vec<TimedMidiEvent> {
        vec![
            TimedMidiEvent::program_change(0, 0, 0, 40),
            TimedMidiEvent::note_on(0, 0, 0, 60, 100),
            TimedMidiEvent::note_off(1000, 480, 0, 60),
            TimedMidiEvent::note_on(1000, 480, 0, 62, 90),
            TimedMidiEvent::note_off(1500, 720, 0, 62),
        ]
    }

    #[test]
    fn test_exporter_creation() {
        let exporter = MidiExporter::new();
        assert_eq!(exporter.ppqn(), 480);
        assert_eq!(exporter.tempo(), 120);
    }

    #[test]
    fn test_header_is_format0_single_track() {
        let bytes = MidiExporter::new().export_to_bytes(&stream());

        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 6]);
        assert_eq!(&bytes[8..10], &0u16.to_be_bytes()); // Format 0
        assert_eq!(&bytes[10..12], &1u16.to_be_bytes()); // 1 track
        assert_eq!(&bytes[12..14], &480u16.to_be_bytes());
        assert_eq!(&bytes[14..18], b"MTrk");

        let length = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
        assert_eq!(bytes.len(), 22 + length);
        assert_eq!(&bytes[bytes.len() - 3..], &[0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_track_body_for_profile() {
        let registry = MoodRegistry::builtin();
        let sad = registry.lookup("sad").unwrap();
        let bytes = MidiExporter::for_profile(sad, 480).export_to_bytes(&stream());
        let body = &bytes[22..];

        let mut expected = vec![0x00, 0xFF, 0x03, 3];
        expected.extend_from_slice(b"sad");
        // 60 BPM = 1_000_000 us = 0x0F4240
        expected.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40]);
        expected.extend_from_slice(&[0x00, 0xFF, 0x04, 6]);
        expected.extend_from_slice(b"Violin");
        expected.extend_from_slice(&[0x00, 0xC0, 40]);
        expected.extend_from_slice(&[0x00, 0x90, 60, 100]);
        // 480 ticks = 0x83 0x60
        expected.extend_from_slice(&[0x83, 0x60, 0x80, 60, 0]);
        expected.extend_from_slice(&[0x00, 0x90, 62, 90]);
        // 240 ticks = 0x81 0x70
        expected.extend_from_slice(&[0x81, 0x70, 0x80, 62, 0]);
        expected.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        assert_eq!(body, expected.as_slice());
    }

    #[test]
    fn test_tempo_event() {
        let event = MidiExportEvent::tempo(0, 120);
        // 120 BPM = 500000 microseconds per beat = 0x07A120
        assert_eq!(event.data, vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    }

    #[test]
    fn test_long_meta_text_uses_variable_length() {
        let name = "x".repeat(200);
        let event = MidiExportEvent::track_name(0, &name);
        assert_eq!(&event.data[..4], &[0xFF, 0x03, 0x81, 0x48]);
        assert_eq!(event.data.len(), 4 + 200);
    }

    #[test]
    fn test_variable_length() {
        let mut buffer = Vec::new();

        write_variable_length(&mut buffer, 0);
        assert_eq!(buffer, vec![0x00]);

        buffer.clear();
        write_variable_length(&mut buffer, 127);
        assert_eq!(buffer, vec![0x7F]);

        buffer.clear();
        write_variable_length(&mut buffer, 128);
        assert_eq!(buffer, vec![0x81, 0x00]);

        buffer.clear();
        write_variable_length(&mut buffer, 16383);
        assert_eq!(buffer, vec![0xFF, 0x7F]);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("melody.mid");
        let exporter = MidiExporter::new();

        exporter.export(&stream(), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, exporter.export_to_bytes(&stream()));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("melody.mid");
        let result = MidiExporter::new().export(&stream(), &path);
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
