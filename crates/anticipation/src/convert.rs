//! Compound codec: 5-field note records ⇄ 3-token event triples.
//!
//! A compound record is `(time, duration, pitch, instrument, velocity)` with
//! time and duration already in [`TIME_RESOLUTION`] ticks. A pitch of `-1`
//! marks a separator record; a duration of `-1` means "unknown".

use crate::triple::triples;
use crate::vocab::{
    Token, COMPOUND_SIZE, CONTROL_OFFSET, DUR_OFFSET, MAX_DUR, MAX_INSTR, MAX_PITCH, NOTE_OFFSET,
    REST, SEPARATOR, TIME_OFFSET, TIME_RESOLUTION,
};
use crate::{Error, Result};

/// Raw compound field; `-1` is a legal sentinel.
pub type Compound = i64;

/// Velocity written for every re-encoded note.
pub const DEFAULT_VELOCITY: Compound = 72;

/// Duration assigned to notes whose duration is unknown (250ms).
const UNKNOWN_DURATION: u32 = TIME_RESOLUTION / 4;

/// Decode compound records into event triples.
///
/// Velocities are dropped, `(pitch, instrument)` is packed into one note
/// token, and durations at or past [`MAX_DUR`] are clipped. Returns the
/// events together with the number of clipped durations.
pub fn compound_to_events(compound: &[Compound]) -> Result<(Vec<Token>, usize)> {
    if compound.len() % COMPOUND_SIZE != 0 {
        return Err(Error::MalformedCompound(format!(
            "length {} is not a multiple of {}",
            compound.len(),
            COMPOUND_SIZE
        )));
    }

    let mut events = Vec::with_capacity(compound.len() / COMPOUND_SIZE * 3);
    let mut truncations = 0;

    for (i, record) in compound.chunks_exact(COMPOUND_SIZE).enumerate() {
        let (time, dur, pitch, instr) = (record[0], record[1], record[2], record[3]);

        if pitch == -1 {
            events.extend([SEPARATOR; 3]);
            continue;
        }

        if !(0..MAX_PITCH as Compound).contains(&pitch) {
            return Err(Error::MalformedCompound(format!("record {}: pitch {}", i, pitch)));
        }
        if !(0..MAX_INSTR as Compound).contains(&instr) {
            return Err(Error::MalformedCompound(format!("record {}: instrument {}", i, instr)));
        }
        if time < 0 || time > (u32::MAX - SEPARATOR) as Compound {
            return Err(Error::MalformedCompound(format!("record {}: time {}", i, time)));
        }

        let dur = match dur {
            -1 => UNKNOWN_DURATION,
            d if d < -1 => {
                return Err(Error::MalformedCompound(format!("record {}: duration {}", i, d)));
            }
            d if d >= MAX_DUR as Compound => {
                truncations += 1;
                MAX_DUR - 1
            }
            d => d as u32,
        };

        events.extend([
            TIME_OFFSET + time as u32,
            DUR_OFFSET + dur,
            NOTE_OFFSET + MAX_PITCH * instr as u32 + pitch as u32,
        ]);
    }

    Ok((events, truncations))
}

/// Encode event (or control) triples back into compound records.
///
/// REST filler is dropped, control triples are moved back to the event
/// band, and separator triples become separator records. Returns an empty
/// vector when nothing encodable remains.
pub fn events_to_compound(tokens: &[Token]) -> Vec<Compound> {
    let mut out = Vec::with_capacity(tokens.len() / 3 * COMPOUND_SIZE);

    for (time, dur, note) in triples(tokens) {
        if note == SEPARATOR {
            out.extend([-1; COMPOUND_SIZE]);
            continue;
        }

        let (time, dur, note) = if note >= CONTROL_OFFSET {
            (time - CONTROL_OFFSET, dur - CONTROL_OFFSET, note - CONTROL_OFFSET)
        } else {
            (time, dur, note)
        };

        if note == REST {
            continue;
        }

        let note = note - NOTE_OFFSET;
        out.extend([
            (time - TIME_OFFSET) as Compound,
            (dur - DUR_OFFSET) as Compound,
            (note % MAX_PITCH) as Compound,
            (note / MAX_PITCH) as Compound,
            DEFAULT_VELOCITY,
        ]);
    }

    if out.iter().step_by(COMPOUND_SIZE).all(|&t| t == -1) {
        // only separators (or nothing) survived
        out.clear();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::note_token;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_and_packs_notes() {
        let compound = vec![0, 50, 60, 0, 100, 120, 25, 64, 40, 90];
        let (events, truncations) = compound_to_events(&compound).unwrap();
        assert_eq!(
            events,
            vec![
                0,
                DUR_OFFSET + 50,
                note_token(0, 60),
                120,
                DUR_OFFSET + 25,
                note_token(40, 64)
            ]
        );
        assert_eq!(truncations, 0);
    }

    #[test]
    fn clips_long_and_fills_unknown_durations() {
        let compound = vec![0, 5000, 60, 0, 100, 10, -1, 62, 0, 100];
        let (events, truncations) = compound_to_events(&compound).unwrap();
        assert_eq!(events[1], DUR_OFFSET + MAX_DUR - 1);
        assert_eq!(events[4], DUR_OFFSET + UNKNOWN_DURATION);
        assert_eq!(truncations, 1);
    }

    #[test]
    fn separator_record_fills_a_triple() {
        let compound = vec![-1, -1, -1, -1, -1];
        let (events, _) = compound_to_events(&compound).unwrap();
        assert_eq!(events, vec![SEPARATOR; 3]);
    }

    #[test]
    fn rejects_ragged_and_out_of_range() {
        assert!(compound_to_events(&[0, 1, 2]).is_err());
        assert!(compound_to_events(&[0, 10, 200, 0, 100]).is_err());
        assert!(compound_to_events(&[0, 10, 60, 129, 100]).is_err());
        assert!(compound_to_events(&[-5, 10, 60, 0, 100]).is_err());
    }

    #[test]
    fn encode_inverts_decode_up_to_velocity() {
        let events = vec![
            0,
            DUR_OFFSET + 50,
            note_token(0, 60),
            120,
            DUR_OFFSET + 25,
            note_token(40, 64),
        ];
        assert_eq!(
            events_to_compound(&events),
            vec![0, 50, 60, 0, DEFAULT_VELOCITY, 120, 25, 64, 40, DEFAULT_VELOCITY]
        );
    }

    #[test]
    fn encode_strips_controls_and_rests() {
        let controls: Vec<Token> = vec![
            10 + CONTROL_OFFSET,
            DUR_OFFSET + 20 + CONTROL_OFFSET,
            note_token(1, 61) + CONTROL_OFFSET,
            30,
            DUR_OFFSET,
            REST,
        ];
        assert_eq!(events_to_compound(&controls), vec![10, 20, 61, 1, DEFAULT_VELOCITY]);
    }

    #[test]
    fn encode_of_only_rests_is_empty() {
        let rests = vec![0, DUR_OFFSET, REST, 100, DUR_OFFSET, REST];
        assert!(events_to_compound(&rests).is_empty());
    }
}
