// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn, Level};

use moodseq::config::MoodFile;
use moodseq::midi::{self, PlaybackOutcome, Player, RealTimePacer};
use moodseq::recording::{save_pitch_log, MidiExporter};
use moodseq::render::total_duration_ms;
use moodseq::{
    EventRenderer, MelodyGenerator, MoodRegistry, NoteEvent, RenderConfig, SharedRng,
    TimedMidiEvent,
};

/// Generate a short melody for a mood and play or save it
#[derive(Debug, Parser)]
#[command(name = "moodseq", version, about)]
struct Args {
    /// Mood to generate (prompted for when omitted)
    #[arg(short, long)]
    mood: Option<String>,

    /// Number of melody notes
    #[arg(short, long, default_value_t = 16)]
    length: usize,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// YAML or TOML file with extra moods and render settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a Standard MIDI File
    #[arg(long)]
    midi_out: Option<PathBuf>,

    /// Write the melody pitches, one per line
    #[arg(long)]
    text_out: Option<PathBuf>,

    /// MIDI output port index
    #[arg(short, long)]
    port: Option<usize>,

    /// Skip real-time playback
    #[arg(long)]
    no_play: bool,

    /// List available moods and exit
    #[arg(long)]
    list_moods: bool,

    /// List MIDI output ports and exit
    #[arg(long)]
    list_ports: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_moods(registry: &MoodRegistry) {
    println!("Available moods:");
    for profile in registry.iter() {
        println!(
            "  {:<12} {:>3} BPM  program {:<3} {:<9} {:?}  {}",
            profile.name(),
            profile.tempo_bpm(),
            profile.instrument(),
            profile.transitions().name(),
            profile.harmony(),
            profile.scale()
        );
    }
}

/// Ask on stdin until a known mood is entered
fn prompt_mood(registry: &MoodRegistry) -> Result<String> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Enter a mood ({}): ", registry.names().join(", "));
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            bail!("no mood given");
        };
        let line = line.context("Failed to read mood from stdin")?;

        match registry.lookup(&line) {
            Ok(profile) => return Ok(profile.name().to_string()),
            Err(e) => eprintln!("{}", e),
        }
    }
}

fn print_summary(notes: &[NoteEvent], events: &[TimedMidiEvent]) {
    let pitches: Vec<String> = notes.iter().map(|n| n.pitch.to_string()).collect();
    println!("Melody: {}", pitches.join(" "));
    info!(
        notes = notes.len(),
        events = events.len(),
        duration_ms = total_duration_ms(events),
        "rendered"
    );
    for event in events {
        debug!(
            time_ms = event.time_ms,
            ticks = event.time_ticks,
            kind = ?event.kind,
            "event"
        );
    }
}

fn play(events: &[TimedMidiEvent], port: Option<usize>) -> Result<()> {
    let mut output = match midi::open_output(port) {
        Ok(output) => output,
        Err(e) if e.is_playback_only() => {
            warn!("{}, skipping playback", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        warn!("Ctrl-C received, stopping playback");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    println!("Playing on {} (Ctrl-C to stop)...", output.name());
    match Player::new().play(events, output.as_mut(), &mut RealTimePacer::new(), &cancel) {
        Ok(PlaybackOutcome::Completed) => info!("playback finished"),
        Ok(PlaybackOutcome::Cancelled) => println!("Playback stopped."),
        Err(e) if e.is_playback_only() => warn!("playback aborted: {}", e),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut registry = MoodRegistry::builtin();
    let mut render_config = RenderConfig::default();
    if let Some(path) = &args.config {
        let file = MoodFile::load(path)?;
        file.apply_to(&mut registry)
            .with_context(|| format!("Invalid mood in {:?}", path))?;
        render_config = file.render;
    }

    if args.list_moods {
        print_moods(&registry);
        return Ok(());
    }
    if args.list_ports {
        midi::print_ports();
        return Ok(());
    }

    let mood = match &args.mood {
        Some(mood) => mood.clone(),
        None => prompt_mood(&registry)?,
    };
    let profile = registry.lookup(&mood)?;

    let rng = SharedRng::from_seed_option(args.seed);
    if let Some(seed) = rng.seed() {
        info!(seed, "using fixed seed");
    }

    let generator = MelodyGenerator::new(&registry);
    let notes = rng.with(|r| generator.generate(profile.name(), args.length, r))?;

    let renderer = EventRenderer::new(render_config);
    let events = rng.with(|r| renderer.render(&notes, profile, r));

    if let Some(path) = &args.text_out {
        save_pitch_log(&notes, path).with_context(|| format!("Failed to write {:?}", path))?;
    }
    if let Some(path) = &args.midi_out {
        MidiExporter::for_profile(profile, renderer.config().ppqn)
            .export(&events, path)
            .with_context(|| format!("Failed to write {:?}", path))?;
    }

    print_summary(&notes, &events);

    if args.no_play {
        info!("playback disabled");
        return Ok(());
    }
    play(&events, args.port)
}
