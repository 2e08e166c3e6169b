//! MIDI wire constants shared by timeline lowering and any downstream
//! driver.

use crate::timeline::Unit;

/// Smallest valid 1-based channel number.
pub const CHANNEL_MIN: u8 = 1;
/// Largest valid 1-based channel number.
pub const CHANNEL_MAX: u8 = 16;

/// Default note-on/off velocity for every emitted note.
pub const VELOCITY_DEFAULT: u8 = 64;

/// Interval between `Active Sensing` heartbeats, in microseconds.
///
/// The MIDI specification requires receivers to assume a disconnect if no
/// message (of any kind) arrives within 300ms; 270ms keeps a safety margin.
pub const ACTIVE_SENSING_INTERVAL: Unit = 270_000;

/// Microseconds in one minute, used to convert BPM to a per-step duration.
pub const ONE_MINUTE: Unit = 60_000_000;

/// `Note On` status nibble (channel OR'd into the low nibble).
pub const NOTE_ON: u8 = 0x90;
/// `Note Off` status nibble (channel OR'd into the low nibble).
pub const NOTE_OFF: u8 = 0x80;
/// `Channel Mode` (controller change) status nibble.
pub const CHANNEL_MODE: u8 = 0xB0;

/// System Real-Time: `Start`.
pub const START: u8 = 0xFA;
/// System Real-Time: `Stop`.
pub const STOP: u8 = 0xFC;
/// System Real-Time: `Timing Clock`.
pub const TIMING_CLOCK: u8 = 0xF8;
/// System Real-Time: `Active Sensing`.
pub const ACTIVE_SENSE: u8 = 0xFE;

/// Channel-mode controller number: `All Sound Off`.
pub const ALL_SOUND_OFF: u8 = 120;
/// Channel-mode controller number: `Reset All Controllers`.
pub const ALL_RESET_CC: u8 = 121;
/// Channel-mode controller number: `All Notes Off`.
pub const ALL_NOTES_OFF: u8 = 123;

/// Combines a status nibble with a 0-based channel index into a single
/// status byte.
#[must_use]
pub const fn channel_status(status: u8, channel0: u8) -> u8 {
    status | (channel0 & 0x0F)
}
