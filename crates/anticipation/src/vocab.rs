//! Token vocabulary and tokenizer constants.
//!
//! The vocabulary is laid out in bands: event time, duration and
//! note/instrument, then the same three bands shifted by [`CONTROL_OFFSET`],
//! then a handful of special markers.

/// A vocabulary token.
pub type Token = u32;

/// Ticks per second for every time and duration value.
pub const TIME_RESOLUTION: u32 = 100;

pub const MAX_TIME_IN_SECONDS: u32 = 100;
pub const MAX_DURATION_IN_SECONDS: u32 = 10;
pub const MAX_TIME: u32 = TIME_RESOLUTION * MAX_TIME_IN_SECONDS;
pub const MAX_DUR: u32 = TIME_RESOLUTION * MAX_DURATION_IN_SECONDS;
pub const MAX_PITCH: u32 = 128;
/// 128 General MIDI programs plus drums.
pub const MAX_INSTR: u32 = 129;
pub const MAX_NOTE: u32 = MAX_PITCH * MAX_INSTR;

// event block
pub const EVENT_OFFSET: Token = 0;
pub const TIME_OFFSET: Token = EVENT_OFFSET;
pub const DUR_OFFSET: Token = TIME_OFFSET + MAX_TIME;
pub const NOTE_OFFSET: Token = DUR_OFFSET + MAX_DUR;
pub const REST: Token = NOTE_OFFSET + MAX_NOTE;

// control block
pub const CONTROL_OFFSET: Token = NOTE_OFFSET + MAX_NOTE + 1;
pub const ATIME_OFFSET: Token = CONTROL_OFFSET + TIME_OFFSET;
pub const ADUR_OFFSET: Token = ATIME_OFFSET + MAX_TIME;
pub const ANOTE_OFFSET: Token = ADUR_OFFSET + MAX_DUR;

// special block
pub const SPECIAL_OFFSET: Token = ANOTE_OFFSET + MAX_NOTE;
pub const SEPARATOR: Token = SPECIAL_OFFSET;
pub const AUTOREGRESS: Token = SPECIAL_OFFSET + 1;
pub const ANTICIPATE: Token = SPECIAL_OFFSET + 2;
pub const VOCAB_SIZE: Token = ANTICIPATE + 1;

/// Empty slot in the instrument-conditioning vector.
pub const NO_INSTRUMENT: Token = AUTOREGRESS;
/// Slots in the instrument-conditioning vector.
pub const CONDITIONING_SLOTS: usize = 16;

pub const EVENT_SIZE: usize = 3;
pub const COMPOUND_SIZE: usize = 5;
/// Events per emitted window.
pub const M: usize = 341;
/// Tokens per emitted window, excluding the conditioning prefix.
pub const WINDOW_TOKENS: usize = EVENT_SIZE * M;

/// Anticipation interval, and the length of an anticipated span, in seconds.
pub const DELTA: u32 = 5;

pub const MIN_TRACK_EVENTS: usize = 100;
pub const MIN_TRACK_TIME_IN_SECONDS: u32 = 10;
pub const MAX_TRACK_TIME_IN_SECONDS: u32 = 3600;
/// One per MIDI channel.
pub const MAX_TRACK_INSTR: usize = 16;

/// Normalizer for the random extraction rate.
pub const ANTICIPATION_RATES: u32 = 10;

/// Instrument id of a note/instrument token (event or control band).
pub fn instrument_of(note: Token) -> u32 {
    note_value(note) / MAX_PITCH
}

/// Pitch of a note/instrument token (event or control band).
pub fn pitch_of(note: Token) -> u32 {
    note_value(note) % MAX_PITCH
}

fn note_value(note: Token) -> u32 {
    if note >= ANOTE_OFFSET {
        note - ANOTE_OFFSET
    } else {
        note - NOTE_OFFSET
    }
}

/// Build an event note/instrument token.
pub fn note_token(instrument: u32, pitch: u32) -> Token {
    NOTE_OFFSET + MAX_PITCH * instrument + pitch
}
