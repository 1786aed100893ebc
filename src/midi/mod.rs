// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI output abstraction layer.
//!
//! This module provides a trait-based abstraction for MIDI output so the
//! real-time player can drive a hardware port, a software synth or a test
//! double interchangeably.

#[cfg(feature = "realtime")]
pub mod midir_backend;
pub mod player;

use crate::error::{Error, Result};

pub use player::{InstantPacer, Pacer, PlaybackOutcome, Player, RealTimePacer};

/// Trait for MIDI output implementations.
pub trait MidiOutput: Send {
    /// Send a MIDI message immediately.
    ///
    /// # Arguments
    /// * `message` - Raw MIDI bytes (e.g., `[0x90, 60, 127]` for Note On)
    fn send(&mut self, message: &[u8]) -> Result<()>;

    /// Human-readable name of the destination
    fn name(&self) -> String {
        "MIDI output".to_string()
    }
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;

    /// Controller number for All Notes Off
    pub const ALL_NOTES_OFF: u8 = 123;
}

/// List available MIDI output ports as (index, name)
pub fn list_ports() -> Vec<(usize, String)> {
    #[cfg(feature = "realtime")]
    {
        midir_backend::list_ports()
    }
    #[cfg(not(feature = "realtime"))]
    {
        Vec::new()
    }
}

/// Print available MIDI output ports to stdout.
pub fn print_ports() {
    let ports = list_ports();
    if ports.is_empty() {
        println!("No MIDI output ports found.");
    } else {
        println!("Available MIDI output ports:");
        for (i, name) in ports {
            println!("  {}: {}", i, name);
        }
    }
}

/// Open a real-time output on the given port (first port by default).
///
/// Fails with [`Error::NoOutputDevice`] when no port exists or the crate
/// was built without a MIDI backend.
pub fn open_output(port: Option<usize>) -> Result<Box<dyn MidiOutput>> {
    #[cfg(feature = "realtime")]
    {
        let output = midir_backend::MidirOutput::new(port.unwrap_or(0))?;
        Ok(Box::new(output))
    }
    #[cfg(not(feature = "realtime"))]
    {
        let _ = port;
        Err(Error::NoOutputDevice(
            "built without the `realtime` feature".to_string(),
        ))
    }
}

/// Output that records every message, for dry runs and tests
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    messages: Vec<Vec<u8>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Vec<u8>] {
        &self.messages
    }
}

impl MidiOutput for RecordingOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        if message.is_empty() {
            return Err(Error::Output("empty MIDI message".to_string()));
        }
        self.messages.push(message.to_vec());
        Ok(())
    }

    fn name(&self) -> String {
        "recording".to_string()
    }
}
