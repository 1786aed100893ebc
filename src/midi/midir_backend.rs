// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cross-platform MIDI output through midir.

use midir::{MidiOutput as MidirClient, MidiOutputConnection};
use tracing::{debug, info};

use super::MidiOutput;
use crate::error::{Error, Result};

const CLIENT_NAME: &str = "moodseq";

/// midir connection to one output port
pub struct MidirOutput {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidirOutput {
    /// Connect to the output port at `index`.
    ///
    /// # Returns
    /// * `Err(Error::NoOutputDevice)` if the client cannot be created,
    ///   no ports exist, or the index is out of range
    pub fn new(index: usize) -> Result<Self> {
        let client = MidirClient::new(CLIENT_NAME)
            .map_err(|e| Error::NoOutputDevice(format!("failed to create MIDI client: {}", e)))?;

        let ports = client.ports();
        if ports.is_empty() {
            return Err(Error::NoOutputDevice("no MIDI output ports found".to_string()));
        }

        let port = ports.get(index).ok_or_else(|| {
            Error::NoOutputDevice(format!(
                "MIDI output {} not found (only {} available)",
                index,
                ports.len()
            ))
        })?;

        let port_name = client
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown {}", index));
        debug!(port = %port_name, index, "connecting to MIDI output");

        let connection = client
            .connect(port, "moodseq-out")
            .map_err(|e| Error::NoOutputDevice(format!("failed to connect to '{}': {}", port_name, e)))?;

        info!(port = %port_name, "MIDI output connected");
        Ok(Self {
            connection,
            port_name,
        })
    }
}

impl MidiOutput for MidirOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.connection
            .send(message)
            .map_err(|e| Error::Output(format!("failed to send MIDI message: {}", e)))
    }

    fn name(&self) -> String {
        self.port_name.clone()
    }
}

/// List output ports as (index, name)
pub fn list_ports() -> Vec<(usize, String)> {
    let Ok(client) = MidirClient::new(CLIENT_NAME) else {
        return Vec::new();
    };

    client
        .ports()
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let name = client
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}
