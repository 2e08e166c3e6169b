//! Timeline synthesis: lowering one [`Sequence`] into time-stamped MIDI
//! events, and the global finalization pass that turns the union of every
//! `send`'s partial timeline into a complete, playable stream.

use crate::midi;
use crate::sequence::{Sequence, StepKind};

/// A signed duration in microseconds.
pub type Unit = i64;

/// A single MIDI message with its absolute timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Absolute time, in microseconds from the start of the timeline.
    pub time: Unit,
    /// The status byte (channel already OR'd in for channel messages).
    pub status: u8,
    /// First data byte.
    pub data1: u8,
    /// Second data byte.
    pub data2: u8,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub const fn new(time: Unit, status: u8, data1: u8, data2: u8) -> Self {
        Self {
            time,
            status,
            data1,
            data2,
        }
    }
}

/// A time-stamped MIDI event stream plus its overall duration.
///
/// `duration` is an upper bound on every contained event's `time`, not
/// necessarily the time of the last event (system frames may land exactly
/// on it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    /// Events, not necessarily in time order until [`finalize`] runs.
    pub events: Vec<Event>,
    /// The timeline's total duration.
    pub duration: Unit,
}

/// Lowers one sequence onto `chan0` (0-based), starting at `t0`.
///
/// `per` is the per-step duration in microseconds, derived from the
/// sequence's own `bpm` field rather than the compile-wide global one, so
/// sequences can carry a `bpm`-operator override.
#[must_use]
pub fn lower_sequence(seq: &Sequence, chan0: u8, t0: Unit) -> Timeline {
    let per = midi::ONE_MINUTE / (seq.bpm as Unit);
    let mut events = Vec::new();
    let mut t = t0;

    for step in &seq.steps {
        if step.kind == StepKind::Beat {
            let note = (step.note & 0x7F) as u8;
            events.push(Event::new(
                t,
                midi::channel_status(midi::NOTE_ON, chan0),
                note,
                midi::VELOCITY_DEFAULT,
            ));
            events.push(Event::new(
                t + per,
                midi::channel_status(midi::NOTE_OFF, chan0),
                note,
                midi::VELOCITY_DEFAULT,
            ));
        }
        t += per;
    }

    Timeline {
        events,
        duration: t0 + per * (seq.steps.len() as Unit),
    }
}

fn heartbeat(status: u8, interval: Unit, duration: Unit) -> impl Iterator<Item = Event> {
    let steps = if interval > 0 { duration / interval } else { 0 };
    (0..=steps)
        .map(move |i| Event::new(i * interval, status, 0, 0))
        .take_while(move |event| event.time < duration)
}

fn channel_mode_resets() -> Vec<Event> {
    let mut resets = Vec::new();
    for chan0 in 0..15u8 {
        for &controller in &[
            midi::ALL_RESET_CC,
            midi::ALL_NOTES_OFF,
            midi::ALL_SOUND_OFF,
        ] {
            resets.push(Event::new(
                0,
                midi::channel_status(midi::CHANNEL_MODE, chan0),
                controller,
                0,
            ));
        }
    }
    resets
}

/// Runs the one-time global finalization pass over the union of every
/// `send`'s partial timeline: active-sensing heartbeats, the MIDI clock,
/// a stable time sort, `START`/`STOP` bracketing, and the leading
/// channel-mode reset prefix.
///
/// A no-op on an empty timeline (no statement ever emitted anything).
#[must_use]
pub fn finalize(mut tl: Timeline, global_bpm: u64) -> Timeline {
    if tl.events.is_empty() {
        return tl;
    }

    tl.events
        .extend(heartbeat(midi::ACTIVE_SENSE, midi::ACTIVE_SENSING_INTERVAL, tl.duration));

    let clock_freq = midi::ONE_MINUTE / (global_bpm as Unit * 24);
    tl.events
        .extend(heartbeat(midi::TIMING_CLOCK, clock_freq, tl.duration));

    tl.events.sort_by_key(|event| event.time);

    let mut finalized = channel_mode_resets();
    finalized.push(Event::new(0, midi::START, 0, 0));
    finalized.append(&mut tl.events);
    finalized.push(Event::new(tl.duration, midi::STOP, 0, 0));

    Timeline {
        events: finalized,
        duration: tl.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{Sequence, Step};

    fn seq3in8(bpm: u64, note: u64) -> Sequence {
        Sequence::euclide(3, 8, note, bpm)
    }

    #[test]
    fn lowering_spaces_steps_by_per_and_tracks_duration() {
        let seq = seq3in8(120, 60);
        let tl = lower_sequence(&seq, 0, 0);
        assert_eq!(tl.duration, 4_000_000);
        let ons: Vec<Unit> = tl
            .events
            .iter()
            .filter(|e| e.status == midi::channel_status(midi::NOTE_ON, 0))
            .map(|e| e.time)
            .collect();
        assert_eq!(ons, vec![0, 1_500_000, 3_000_000]);
    }

    #[test]
    fn every_note_on_has_a_matching_note_off_one_per_later() {
        let seq = Sequence::from_steps(vec![Step::new(crate::sequence::StepKind::Beat, 60)], 120);
        let tl = lower_sequence(&seq, 2, 0);
        assert_eq!(tl.events.len(), 2);
        let per = midi::ONE_MINUTE / 120;
        assert_eq!(tl.events[0].time, 0);
        assert_eq!(tl.events[1].time, per);
        assert_eq!(tl.events[0].status, midi::channel_status(midi::NOTE_ON, 2));
        assert_eq!(tl.events[1].status, midi::channel_status(midi::NOTE_OFF, 2));
    }

    #[test]
    fn finalize_is_a_no_op_on_an_empty_timeline() {
        let tl = finalize(Timeline::default(), 120);
        assert!(tl.events.is_empty());
    }

    #[test]
    fn finalize_brackets_with_start_and_stop_and_leading_resets() {
        let seq = seq3in8(120, 60);
        let partial = lower_sequence(&seq, 0, 0);
        let tl = finalize(partial, 120);

        assert!(tl.events.len() > 45, "resets precede everything else");
        assert_eq!(tl.events[45].status, midi::START);
        assert_eq!(tl.events[45].time, 0);
        assert_eq!(tl.events.last().unwrap().status, midi::STOP);
        assert_eq!(tl.events.last().unwrap().time, tl.duration);

        for i in 0..15 {
            let base = i * 3;
            assert_eq!(tl.events[base].data1, midi::ALL_RESET_CC);
            assert_eq!(tl.events[base + 1].data1, midi::ALL_NOTES_OFF);
            assert_eq!(tl.events[base + 2].data1, midi::ALL_SOUND_OFF);
        }
    }

    #[test]
    fn finalize_sorts_events_by_ascending_time() {
        let seq = seq3in8(120, 60);
        let partial = lower_sequence(&seq, 0, 0);
        let tl = finalize(partial, 120);
        let times: Vec<Unit> = tl.events.iter().map(|e| e.time).collect();
        let mut sorted = times.clone();
        sorted.sort_unstable();
        assert_eq!(times, sorted);
    }
}
