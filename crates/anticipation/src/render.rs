//! Render a corpus window back to Standard MIDI for listening.
//!
//! Times map one tick to one MIDI tick at 100 ticks per quarter and 60 bpm,
//! so a quarter note lasts exactly one second of token time.

use crate::convert::DEFAULT_VELOCITY;
use crate::ops::split;
use crate::triple::{remove_control_offset, triples};
use crate::vocab::{
    instrument_of, pitch_of, Token, ADUR_OFFSET, ANOTE_OFFSET, ATIME_OFFSET, DUR_OFFSET,
    MAX_PITCH, NOTE_OFFSET, REST, SEPARATOR, SPECIAL_OFFSET, TIME_OFFSET, TIME_RESOLUTION,
};
use crate::{Error, Result};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use std::collections::BTreeMap;

/// MIDI ticks per quarter note.
pub const TICKS_PER_BEAT: u16 = TIME_RESOLUTION as u16;

/// 60 bpm.
const MICROS_PER_BEAT: u32 = 1_000_000;

/// Instrument id reserved for the drum kit.
const DRUMS: u32 = MAX_PITCH;
const DRUM_CHANNEL: u8 = 9;

/// Event and control halves of one window as SMF bytes.
#[derive(Debug, Clone)]
pub struct RenderedWindow {
    pub events_midi: Vec<u8>,
    pub controls_midi: Vec<u8>,
}

/// Render one corpus line, skipping its `prefix_len` conditioning tokens.
///
/// Controls are moved back to the event band and rendered as their own
/// file. Separators and REST filler are dropped.
pub fn window_to_midi(window: &[Token], prefix_len: usize) -> Result<RenderedWindow> {
    let body = window.get(prefix_len..).ok_or_else(|| {
        Error::Midi(format!(
            "window has {} tokens, fewer than its {} token prefix",
            window.len(),
            prefix_len
        ))
    })?;
    if body.len() % 3 != 0 {
        return Err(Error::Midi(format!(
            "window body of {} tokens is not whole triples",
            body.len()
        )));
    }

    for (i, triple) in triples(body).enumerate() {
        if !is_event(triple) && !is_control(triple) && triple != (SEPARATOR, SEPARATOR, SEPARATOR) {
            return Err(Error::Midi(format!(
                "triple {} {:?} mixes vocabulary bands",
                i, triple
            )));
        }
    }

    let (events, controls) = split(body);
    Ok(RenderedWindow {
        events_midi: events_to_midi(&events)?,
        controls_midi: events_to_midi(&remove_control_offset(&controls))?,
    })
}

fn is_event((time, dur, note): (Token, Token, Token)) -> bool {
    (TIME_OFFSET..DUR_OFFSET).contains(&time)
        && (DUR_OFFSET..NOTE_OFFSET).contains(&dur)
        && (NOTE_OFFSET..=REST).contains(&note)
}

fn is_control((time, dur, note): (Token, Token, Token)) -> bool {
    (ATIME_OFFSET..ADUR_OFFSET).contains(&time)
        && (ADUR_OFFSET..ANOTE_OFFSET).contains(&dur)
        && (ANOTE_OFFSET..SPECIAL_OFFSET).contains(&note)
}

/// Write event triples as a format 1 file: a tempo track, then one track
/// per instrument in ascending instrument order.
pub fn events_to_midi(events: &[Token]) -> Result<Vec<u8>> {
    if events.len() % 3 != 0 {
        return Err(Error::Midi(format!(
            "{} tokens are not whole triples",
            events.len()
        )));
    }

    // (tick, is_note_on, pitch) per instrument
    let mut edges: BTreeMap<u32, Vec<(u32, bool, u8)>> = BTreeMap::new();
    for triple @ (time, dur, note) in triples(events) {
        if !is_event(triple) {
            return Err(Error::Midi(format!("{:?} is not an event triple", triple)));
        }
        if note == REST {
            continue;
        }
        let onset = time - TIME_OFFSET;
        let pitch = pitch_of(note) as u8;
        let notes = edges.entry(instrument_of(note)).or_default();
        notes.push((onset, true, pitch));
        notes.push((onset + (dur - DUR_OFFSET), false, pitch));
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_BEAT)),
    ));
    smf.tracks.push(tempo_track());

    let mut next_channel = 0u8;
    for (instrument, notes) in edges {
        let channel = if instrument == DRUMS {
            DRUM_CHANNEL
        } else {
            let channel = next_channel.min(15);
            next_channel += 1;
            if next_channel == DRUM_CHANNEL {
                next_channel += 1;
            }
            channel
        };
        smf.tracks.push(instrument_track(instrument, channel, notes));
    }

    let mut buf = Vec::new();
    smf.write_std(&mut buf).map_err(|e| Error::Midi(e.to_string()))?;
    Ok(buf)
}

fn tempo_track() -> Track<'static> {
    vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(MICROS_PER_BEAT))),
        },
        end_of_track(0),
    ]
}

fn instrument_track(instrument: u32, channel: u8, mut notes: Vec<(u32, bool, u8)>) -> Track<'static> {
    let channel = u4::new(channel);
    let mut track = Vec::with_capacity(notes.len() + 2);

    if instrument != DRUMS {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(instrument as u8),
                },
            },
        });
    }

    // note-offs before note-ons on the same tick
    notes.sort_by_key(|&(tick, on, pitch)| (tick, on, pitch));

    let mut last_tick = 0u32;
    for (tick, on, pitch) in notes {
        let key = u7::new(pitch);
        let message = if on {
            MidiMessage::NoteOn {
                key,
                vel: u7::new(DEFAULT_VELOCITY as u8),
            }
        } else {
            MidiMessage::NoteOff { key, vel: u7::new(0) }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(end_of_track(0));
    track
}

fn end_of_track(delta: u32) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}
