// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Plain-text pitch log, one MIDI note number per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::generators::NoteEvent;

/// Write one line per note to `writer`
pub fn write_pitch_log<W: Write>(notes: &[NoteEvent], writer: &mut W) -> Result<()> {
    for note in notes {
        writeln!(writer, "{}", note.pitch)?;
    }
    Ok(())
}

/// Write the pitch log to a file, replacing it if present
pub fn save_pitch_log<P: AsRef<Path>>(notes: &[NoteEvent], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_pitch_log(notes, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), notes = notes.len(), "wrote pitch log");
    Ok(())
}
