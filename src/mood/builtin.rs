// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Built-in moods.

use std::sync::Arc;

use tracing::warn;

use super::MoodProfile;
use crate::error::Result;
use crate::generators::rhythm::{Fixed, Pattern, QuarterOrEighth};
use crate::generators::transition::{ScaleNeighbor, TransitionTable, UniformScale, WeightedGraph};
use crate::music::{Harmony, Note, Scale, ScaleType};

/// General MIDI programs used by the built-in moods
pub mod program {
    pub const ACOUSTIC_GRAND_PIANO: u8 = 0;
    pub const VIOLIN: u8 = 40;
    pub const CELLO: u8 = 42;
    pub const LEAD_SAWTOOTH: u8 = 81;
    pub const PAD_NEW_AGE: u8 = 88;

    const NAMES: [&str; 128] = [
        "Acoustic Grand Piano", "Bright Acoustic Piano", "Electric Grand Piano", "Honky-tonk Piano",
        "Electric Piano 1", "Electric Piano 2", "Harpsichord", "Clavinet",
        "Celesta", "Glockenspiel", "Music Box", "Vibraphone",
        "Marimba", "Xylophone", "Tubular Bells", "Dulcimer",
        "Drawbar Organ", "Percussive Organ", "Rock Organ", "Church Organ",
        "Reed Organ", "Accordion", "Harmonica", "Tango Accordion",
        "Acoustic Guitar (nylon)", "Acoustic Guitar (steel)", "Electric Guitar (jazz)", "Electric Guitar (clean)",
        "Electric Guitar (muted)", "Overdriven Guitar", "Distortion Guitar", "Guitar Harmonics",
        "Acoustic Bass", "Electric Bass (finger)", "Electric Bass (pick)", "Fretless Bass",
        "Slap Bass 1", "Slap Bass 2", "Synth Bass 1", "Synth Bass 2",
        "Violin", "Viola", "Cello", "Contrabass",
        "Tremolo Strings", "Pizzicato Strings", "Orchestral Harp", "Timpani",
        "String Ensemble 1", "String Ensemble 2", "Synth Strings 1", "Synth Strings 2",
        "Choir Aahs", "Voice Oohs", "Synth Voice", "Orchestra Hit",
        "Trumpet", "Trombone", "Tuba", "Muted Trumpet",
        "French Horn", "Brass Section", "Synth Brass 1", "Synth Brass 2",
        "Soprano Sax", "Alto Sax", "Tenor Sax", "Baritone Sax",
        "Oboe", "English Horn", "Bassoon", "Clarinet",
        "Piccolo", "Flute", "Recorder", "Pan Flute",
        "Blown Bottle", "Shakuhachi", "Whistle", "Ocarina",
        "Lead 1 (square)", "Lead 2 (sawtooth)", "Lead 3 (calliope)", "Lead 4 (chiff)",
        "Lead 5 (charang)", "Lead 6 (voice)", "Lead 7 (fifths)", "Lead 8 (bass + lead)",
        "Pad 1 (new age)", "Pad 2 (warm)", "Pad 3 (polysynth)", "Pad 4 (choir)",
        "Pad 5 (bowed)", "Pad 6 (metallic)", "Pad 7 (halo)", "Pad 8 (sweep)",
        "FX 1 (rain)", "FX 2 (soundtrack)", "FX 3 (crystal)", "FX 4 (atmosphere)",
        "FX 5 (brightness)", "FX 6 (goblins)", "FX 7 (echoes)", "FX 8 (sci-fi)",
        "Sitar", "Banjo", "Shamisen", "Koto",
        "Kalimba", "Bagpipe", "Fiddle", "Shanai",
        "Tinkle Bell", "Agogo", "Steel Drums", "Woodblock",
        "Taiko Drum", "Melodic Tom", "Synth Drum", "Reverse Cymbal",
        "Guitar Fret Noise", "Breath Noise", "Seashore", "Bird Tweet",
        "Telephone Ring", "Helicopter", "Applause", "Gunshot",
    ];

    /// General MIDI name of a program number
    pub fn name(program: u8) -> &'static str {
        NAMES.get(program as usize).copied().unwrap_or("Unknown")
    }
}

/// All built-in profiles
pub fn profiles() -> Vec<MoodProfile> {
    let builders: [(&str, fn() -> Result<MoodProfile>); 6] = [
        ("happy", happy),
        ("sad", sad),
        ("energetic", energetic),
        ("melancholy", melancholy),
        ("joyful", joyful),
        ("calm", calm),
    ];

    builders
        .iter()
        .filter_map(|(name, build)| match build() {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(mood = name, error = %e, "skipping built-in mood");
                None
            }
        })
        .collect()
}

/// Hand-authored table for "happy". Pitches 74 and 76 lie above the
/// scale and have no entry of their own, so they fall back to the
/// uniform scale.
pub fn happy_table() -> TransitionTable {
    let mut table = TransitionTable::new();
    table.insert(60, vec![(62, 0.5), (64, 0.3), (67, 0.2)]);
    table.insert(62, vec![(64, 0.4), (60, 0.4), (65, 0.2)]);
    table.insert(64, vec![(65, 0.4), (67, 0.4), (60, 0.2)]);
    table.insert(65, vec![(67, 0.4), (69, 0.4), (60, 0.2)]);
    table.insert(67, vec![(69, 0.4), (71, 0.4), (60, 0.2)]);
    table.insert(69, vec![(71, 0.4), (72, 0.4), (60, 0.2)]);
    table.insert(71, vec![(72, 0.4), (74, 0.4), (60, 0.2)]);
    table.insert(72, vec![(74, 0.4), (76, 0.4), (60, 0.2)]);
    table
}

fn happy() -> Result<MoodProfile> {
    let scale = Scale::from_key(Note::C, ScaleType::Major, 4, true)?;
    Ok(MoodProfile::new("happy", scale, 120, program::ACOUSTIC_GRAND_PIANO)?
        .with_transitions(WeightedGraph::new(happy_table()))
        .with_harmony(Harmony::MajorThird)
        .with_rhythm(QuarterOrEighth))
}

fn sad() -> Result<MoodProfile> {
    let scale = Scale::from_key(Note::C, ScaleType::NaturalMinor, 4, true)?;
    Ok(MoodProfile::new("sad", scale, 60, program::VIOLIN)?
        .with_transitions(ScaleNeighbor)
        .with_harmony(Harmony::MinorThird)
        .with_rhythm(Fixed(1.0)))
}

fn energetic() -> Result<MoodProfile> {
    let scale = Scale::new([60, 62, 65, 67, 70, 72])?;
    Ok(MoodProfile::new("energetic", scale, 150, program::LEAD_SAWTOOTH)?
        .with_transitions(UniformScale)
        .with_rhythm(Pattern::new([0.5, 0.5, 1.0]))
        .with_velocity(95))
}

fn melancholy() -> Result<MoodProfile> {
    let scale = Scale::from_key(Note::A, ScaleType::NaturalMinor, 3, true)?;
    Ok(MoodProfile::new("melancholy", scale, 70, program::CELLO)?
        .with_transitions(ScaleNeighbor)
        .with_harmony(Harmony::MinorThird)
        .with_rhythm(Pattern::new([1.0, 1.0, 2.0]))
        .with_velocity(70))
}

fn joyful() -> Result<MoodProfile> {
    let scale = Scale::from_key(Note::C, ScaleType::Major, 4, true)?;
    let mut table = TransitionTable::new();
    table.insert(60, vec![(62, 1.0), (64, 1.0), (67, 1.0)]);
    Ok(MoodProfile::new("joyful", scale, 132, program::ACOUSTIC_GRAND_PIANO)?
        .with_transitions(WeightedGraph::new(table))
        .with_rhythm(QuarterOrEighth))
}

fn calm() -> Result<MoodProfile> {
    let scale = Scale::from_key(Note::C, ScaleType::MajorPentatonic, 4, true)?;
    let mut table = TransitionTable::new();
    table.insert(60, vec![(62, 2.0), (64, 1.0), (60, 1.0)]);
    table.insert(72, vec![(69, 2.0), (67, 1.0)]);
    let graph = WeightedGraph::new(table).with_fallback(Arc::new(ScaleNeighbor));
    Ok(MoodProfile::new("calm", scale, 80, program::PAD_NEW_AGE)?
        .with_transitions(graph)
        .with_rhythm(Fixed(2.0))
        .with_velocity(64))
}
