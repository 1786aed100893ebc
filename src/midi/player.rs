// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Real-time playback of rendered event streams.
//!
//! The player walks a rendered stream in order, waits on a [`Pacer`] until
//! each event's millisecond offset and sends the raw bytes to a
//! [`MidiOutput`]. Between steps it polls a shared cancellation flag so a
//! Ctrl-C handler can stop playback without leaving notes hanging.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{messages, MidiOutput};
use crate::error::Result;
use crate::music::Pitch;
use crate::render::{MidiEventKind, TimedMidiEvent};

/// Waits until an offset from the start of playback
pub trait Pacer {
    /// Mark the start of playback
    fn start(&mut self) {}

    /// Block until `offset` has elapsed since [`Pacer::start`]
    fn wait_until(&mut self, offset: Duration);
}

/// Pacer that sleeps on the wall clock
#[derive(Debug, Clone, Copy)]
pub struct RealTimePacer {
    started: Instant,
}

impl RealTimePacer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for RealTimePacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for RealTimePacer {
    fn start(&mut self) {
        self.started = Instant::now();
    }

    fn wait_until(&mut self, offset: Duration) {
        let target = self.started + offset;
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }
}

/// Pacer that never blocks and records requested offsets
#[derive(Debug, Clone, Default)]
pub struct InstantPacer {
    waits: Vec<Duration>,
}

impl InstantPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offsets requested so far
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl Pacer for InstantPacer {
    fn wait_until(&mut self, offset: Duration) {
        self.waits.push(offset);
    }
}

/// How playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every event was sent
    Completed,
    /// The cancellation flag was raised
    Cancelled,
}

/// Sends rendered events to an output in time
#[derive(Debug, Default)]
pub struct Player {
    sounding: BTreeSet<(u8, Pitch)>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play `events` on `output`.
    ///
    /// `cancel` is checked before the first event and after every group of
    /// note offs. On cancel every pitch still sounding is switched off and
    /// an All Notes Off is sent on the channels in use. A failed send gets
    /// the same release, best effort, before the error is returned.
    pub fn play(
        &mut self,
        events: &[TimedMidiEvent],
        output: &mut dyn MidiOutput,
        pacer: &mut dyn Pacer,
        cancel: &AtomicBool,
    ) -> Result<PlaybackOutcome> {
        self.sounding.clear();
        info!(
            output = %output.name(),
            events = events.len(),
            "starting playback"
        );

        if cancel.load(Ordering::SeqCst) {
            return Ok(PlaybackOutcome::Cancelled);
        }

        pacer.start();
        for (index, event) in events.iter().enumerate() {
            pacer.wait_until(Duration::from_millis(event.time_ms));
            if let Err(e) = output.send(&event.to_midi_bytes()) {
                warn!(sent = index, error = %e, "send failed, releasing held notes");
                let _ = self.release(events, output);
                return Err(e);
            }

            match event.kind {
                MidiEventKind::NoteOn { pitch, .. } => {
                    self.sounding.insert((event.channel, pitch));
                }
                MidiEventKind::NoteOff { pitch } => {
                    self.sounding.remove(&(event.channel, pitch));
                }
                MidiEventKind::ProgramChange { .. } => {}
            }

            let step_done = event.is_note_off()
                && events.get(index + 1).map_or(true, |next| !next.is_note_off());
            if step_done && cancel.load(Ordering::SeqCst) {
                warn!(sent = index + 1, "playback cancelled");
                self.release(events, output)?;
                return Ok(PlaybackOutcome::Cancelled);
            }
        }

        debug!("playback finished");
        Ok(PlaybackOutcome::Completed)
    }

    /// Pitches currently held, as (channel, pitch)
    pub fn sounding(&self) -> impl Iterator<Item = &(u8, Pitch)> {
        self.sounding.iter()
    }

    fn release(&mut self, events: &[TimedMidiEvent], output: &mut dyn MidiOutput) -> Result<()> {
        for (channel, pitch) in std::mem::take(&mut self.sounding) {
            output.send(&[messages::NOTE_OFF | channel, pitch, 0])?;
        }

        let channels: BTreeSet<u8> = events.iter().map(|e| e.channel & 0x0F).collect();
        for channel in channels {
            output.send(&[messages::CONTROL_CHANGE | channel, messages::ALL_NOTES_OFF, 0])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::midi::RecordingOutput;

    fn two_note_stream() -> Vec<TimedMidiEvent> {
        vec![
            TimedMidiEvent::program_change(0, 0, 0, 40),
            TimedMidiEvent::note_on(0, 0, 0, 60, 90),
            TimedMidiEvent::note_on(0, 0, 0, 63, 90),
            TimedMidiEvent::note_off(1000, 480, 0, 60),
            TimedMidiEvent::note_off(1000, 480, 0, 63),
            TimedMidiEvent::note_on(1000, 480, 0, 62, 85),
            TimedMidiEvent::note_on(1000, 480, 0, 65, 85),
            TimedMidiEvent::note_off(2000, 960, 0, 62),
            TimedMidiEvent::note_off(2000, 960, 0, 65),
        ]
    }

    #[test]
    fn test_play_sends_everything_in_order() {
        let events = two_note_stream();
        let mut output = RecordingOutput::new();
        let mut pacer = InstantPacer::new();
        let cancel = AtomicBool::new(false);

        let outcome = Player::new()
            .play(&events, &mut output, &mut pacer, &cancel)
            .unwrap();

        assert_eq!(outcome, PlaybackOutcome::Completed);
        let expected: Vec<Vec<u8>> = events.iter().map(|e| e.to_midi_bytes()).collect();
        assert_eq!(output.messages(), expected.as_slice());
        assert_eq!(output.messages()[0], vec![0xC0, 40]);
    }

    #[test]
    fn test_pacer_sees_event_offsets() {
        let events = two_note_stream();
        let mut output = RecordingOutput::new();
        let mut pacer = InstantPacer::new();

        Player::new()
            .play(&events, &mut output, &mut pacer, &AtomicBool::new(false))
            .unwrap();

        let millis: Vec<u64> = pacer.waits().iter().map(|d| d.as_millis() as u64).collect();
        assert_eq!(millis, vec![0, 0, 0, 1000, 1000, 1000, 1000, 2000, 2000]);
    }

    #[test]
    fn test_cancel_before_start_sends_nothing() {
        let mut output = RecordingOutput::new();
        let outcome = Player::new()
            .play(
                &two_note_stream(),
                &mut output,
                &mut InstantPacer::new(),
                &AtomicBool::new(true),
            )
            .unwrap();

        assert_eq!(outcome, PlaybackOutcome::Cancelled);
        assert!(output.messages().is_empty());
    }

    /// Raises the cancel flag once a given number of messages went out
    struct CancelAfter<'a> {
        inner: RecordingOutput,
        after: usize,
        flag: &'a AtomicBool,
    }

    impl MidiOutput for CancelAfter<'_> {
        fn send(&mut self, message: &[u8]) -> Result<()> {
            self.inner.send(message)?;
            if self.inner.messages().len() == self.after {
                self.flag.store(true, Ordering::SeqCst);
            }
            Ok(())
        }
    }

    #[test]
    fn test_cancel_mid_step_releases_sounding_notes() {
        let cancel = AtomicBool::new(false);
        let mut output = CancelAfter {
            inner: RecordingOutput::new(),
            after: 2,
            flag: &cancel,
        };

        let mut player = Player::new();
        let outcome = player
            .play(&two_note_stream(), &mut output, &mut InstantPacer::new(), &cancel)
            .unwrap();

        assert_eq!(outcome, PlaybackOutcome::Cancelled);
        assert_eq!(player.sounding().count(), 0);

        // The first step completes before the flag is honoured
        let sent = output.inner.messages();
        assert_eq!(sent.len(), 6);
        assert_eq!(sent[3], vec![0x80, 60, 0]);
        assert_eq!(sent[4], vec![0x80, 63, 0]);
        assert_eq!(sent[5], vec![0xB0, 123, 0]);
    }

    #[test]
    fn test_release_switches_off_held_pitches() {
        let events = two_note_stream();
        let mut output = RecordingOutput::new();
        let mut player = Player::new();
        player.sounding.insert((0, 62));
        player.sounding.insert((0, 65));

        player.release(&events, &mut output).unwrap();

        assert_eq!(
            output.messages(),
            &[vec![0x80, 62, 0], vec![0x80, 65, 0], vec![0xB0, 123, 0]]
        );
    }

    struct FailingOutput;

    impl MidiOutput for FailingOutput {
        fn send(&mut self, _message: &[u8]) -> Result<()> {
            Err(Error::Output("port closed".to_string()))
        }
    }

    #[test]
    fn test_send_failure_propagates() {
        let result = Player::new().play(
            &two_note_stream(),
            &mut FailingOutput,
            &mut InstantPacer::new(),
            &AtomicBool::new(false),
        );
        assert!(matches!(result, Err(Error::Output(_))));
    }

    /// Fails one send, then records again
    struct FlakyOutput {
        inner: RecordingOutput,
        fail_at: usize,
        attempts: usize,
    }

    impl MidiOutput for FlakyOutput {
        fn send(&mut self, message: &[u8]) -> Result<()> {
            self.attempts += 1;
            if self.attempts == self.fail_at {
                return Err(Error::Output("device busy".to_string()));
            }
            self.inner.send(message)
        }
    }

    #[test]
    fn test_send_failure_releases_held_notes() {
        // The second chord's upper note fails while 62 is held
        let mut output = FlakyOutput {
            inner: RecordingOutput::new(),
            fail_at: 7,
            attempts: 0,
        };
        let mut player = Player::new();
        let result = player.play(
            &two_note_stream(),
            &mut output,
            &mut InstantPacer::new(),
            &AtomicBool::new(false),
        );

        assert!(matches!(result, Err(Error::Output(_))));
        assert_eq!(player.sounding().count(), 0);

        let sent = output.inner.messages();
        assert_eq!(sent.len(), 8);
        assert_eq!(sent[5], vec![0x90, 62, 85]);
        assert_eq!(sent[6], vec![0x80, 62, 0]);
        assert_eq!(sent[7], vec![0xB0, 123, 0]);
    }

    #[test]
    fn test_real_time_pacer_does_not_sleep_for_past_offsets() {
        let mut pacer = RealTimePacer::new();
        pacer.start();
        let before = Instant::now();
        pacer.wait_until(Duration::ZERO);
        assert!(before.elapsed() < Duration::from_millis(50));
    }
}
