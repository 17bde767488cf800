//! Primitive operations on triple-encoded token streams.
//!
//! Times are measured in ticks relative to the band a triple lives in: event
//! triples against [`TIME_OFFSET`], control triples against [`ATIME_OFFSET`].
//! SEPARATOR triples carry no time and are skipped by every measurement.

use crate::triple::triples;
use crate::vocab::{
    instrument_of, Token, ADUR_OFFSET, ATIME_OFFSET, CONTROL_OFFSET, DELTA, DUR_OFFSET, MAX_TIME,
    REST, SEPARATOR, TIME_OFFSET, TIME_RESOLUTION,
};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Default anticipation interval in ticks.
pub const ANTICIPATION_INTERVAL: u32 = DELTA * TIME_RESOLUTION;

/// `(time, duration)` of a non-separator triple, in ticks.
fn timing(time: Token, dur: Token, note: Token) -> (u32, u32) {
    if note < CONTROL_OFFSET {
        (time - TIME_OFFSET, dur - DUR_OFFSET)
    } else {
        (time - ATIME_OFFSET, dur - ADUR_OFFSET)
    }
}

fn timed(
    tokens: &[Token],
    instrument: Option<u32>,
) -> impl Iterator<Item = (u32, u32)> + '_ {
    triples(tokens)
        .filter(|&(_, _, note)| note != SEPARATOR)
        .filter(move |&(_, _, note)| instrument.map_or(true, |i| instrument_of(note) == i))
        .map(|(time, dur, note)| timing(time, dur, note))
}

/// Earliest onset of the leading segment (everything before the first
/// SEPARATOR), optionally restricted to one instrument.
///
/// Later segments belong to other runs with their own time base.
pub fn min_time(tokens: &[Token], instrument: Option<u32>) -> Option<u32> {
    let leading = triples(tokens)
        .position(|(_, _, note)| note == SEPARATOR)
        .map_or(tokens.len(), |i| 3 * i);
    timed(&tokens[..leading], instrument).map(|(t, _)| t).min()
}

/// Latest onset, optionally restricted to one instrument. Zero when empty.
pub fn max_time(tokens: &[Token], instrument: Option<u32>) -> u32 {
    timed(tokens, instrument).map(|(t, _)| t).max().unwrap_or(0)
}

/// Latest offset (onset + duration), optionally restricted to one instrument.
pub fn max_end_time(tokens: &[Token], instrument: Option<u32>) -> Option<u32> {
    timed(tokens, instrument).map(|(t, d)| t + d).max()
}

/// Event count per instrument, over both event and control triples.
///
/// Separators and REST filler are not instruments.
pub fn instruments(tokens: &[Token]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for (_, _, note) in triples(tokens) {
        if note == SEPARATOR || note == REST || note == REST + CONTROL_OFFSET {
            continue;
        }
        *counts.entry(instrument_of(note)).or_insert(0) += 1;
    }
    counts
}

/// Insert REST filler so no gap between onsets exceeds one second, through
/// `end_time` (ticks) or the last onset when `None`.
///
/// Separator triples pass through untouched.
pub fn pad(tokens: &[Token], end_time: Option<u32>) -> Vec<Token> {
    let density = TIME_RESOLUTION;
    let end_time = TIME_OFFSET + end_time.unwrap_or_else(|| max_time(tokens, None));

    let mut padded = Vec::with_capacity(tokens.len());
    let mut previous = TIME_OFFSET;

    for (time, dur, note) in triples(tokens) {
        if note == SEPARATOR {
            padded.extend([time, dur, note]);
            continue;
        }
        assert!(note < CONTROL_OFFSET, "cannot pad a stream that contains controls");

        while time > previous + density {
            previous += density;
            padded.extend([previous, DUR_OFFSET, REST]);
        }

        padded.extend([time, dur, note]);
        previous = time;
    }

    while end_time > previous + density {
        previous += density;
        padded.extend([previous, DUR_OFFSET, REST]);
    }

    padded
}

/// Interleave `controls` into `events`, each control placed before the
/// first event later than `control_time - interval`.
///
/// Returns the merged stream and any controls left unconsumed because the
/// event stream ended too early.
pub fn anticipate(events: &[Token], controls: &[Token], interval: u32) -> (Vec<Token>, Vec<Token>) {
    if controls.is_empty() {
        return (events.to_vec(), Vec::new());
    }

    let control_time = |i: usize| -> i64 {
        controls
            .get(i)
            .map(|&t| i64::from(t - ATIME_OFFSET))
            .unwrap_or(i64::MAX)
    };

    let interval = i64::from(interval);
    let mut merged = Vec::with_capacity(events.len() + controls.len());
    let mut next = 0;
    let mut event_time: i64 = 0;

    for (time, dur, note) in triples(events) {
        while event_time >= control_time(next).saturating_sub(interval) {
            merged.extend_from_slice(&controls[next..next + 3]);
            next += 3;
        }

        assert!(note < CONTROL_OFFSET, "event stream contains a control or separator");
        event_time = i64::from(time - TIME_OFFSET);
        merged.extend([time, dur, note]);
    }

    (merged, controls[next..].to_vec())
}

/// Shift the leading segment by `delta` ticks; triples after the first
/// SEPARATOR keep their times.
///
/// Fails if any resulting time leaves `[0, MAX_TIME)`.
pub fn translate(tokens: &[Token], delta: i64) -> Result<Vec<Token>> {
    let mut shifted = Vec::with_capacity(tokens.len());
    let mut delta = delta;

    for (time, dur, note) in triples(tokens) {
        if note == SEPARATOR {
            shifted.extend([time, dur, note]);
            delta = 0;
            continue;
        }

        let base = if note < CONTROL_OFFSET { TIME_OFFSET } else { ATIME_OFFSET };
        let moved = i64::from(time - base) + delta;
        if !(0..i64::from(MAX_TIME)).contains(&moved) {
            return Err(Error::TimeOverflow {
                time: moved,
                delta,
                max: MAX_TIME,
            });
        }

        shifted.extend([base + moved as u32, dur, note]);
    }

    Ok(shifted)
}

/// Separate event triples from control triples, dropping separators.
///
/// Controls keep their offset.
pub fn split(tokens: &[Token]) -> (Vec<Token>, Vec<Token>) {
    let mut events = Vec::new();
    let mut controls = Vec::new();
    for (time, dur, note) in triples(tokens) {
        if note == SEPARATOR {
            continue;
        }
        if note < CONTROL_OFFSET {
            events.extend([time, dur, note]);
        } else {
            controls.extend([time, dur, note]);
        }
    }
    (events, controls)
}

/// Keep event triples with onsets in `[start, end)` ticks, shortening
/// durations that run past `end`.
pub fn clip(tokens: &[Token], start: u32, end: u32) -> Vec<Token> {
    let mut clipped = Vec::new();
    for (time, dur, note) in triples(tokens) {
        if note == SEPARATOR || note >= CONTROL_OFFSET {
            continue;
        }
        let (t, d) = timing(time, dur, note);
        if t < start || t >= end {
            continue;
        }
        clipped.extend([time, DUR_OFFSET + d.min(end - t), note]);
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::note_token;
    use pretty_assertions::assert_eq;

    fn ev(time: u32, dur: u32, instr: u32, pitch: u32) -> [Token; 3] {
        [TIME_OFFSET + time, DUR_OFFSET + dur, note_token(instr, pitch)]
    }

    fn ctl(time: u32, dur: u32, instr: u32, pitch: u32) -> [Token; 3] {
        let [t, d, n] = ev(time, dur, instr, pitch);
        [t + CONTROL_OFFSET, d + CONTROL_OFFSET, n + CONTROL_OFFSET]
    }

    fn stream(triples: &[[Token; 3]]) -> Vec<Token> {
        triples.concat()
    }

    #[test]
    fn min_max_respect_instrument_filter() {
        let tokens = stream(&[ev(10, 5, 0, 60), ev(40, 50, 1, 62), ev(80, 5, 0, 64)]);
        assert_eq!(min_time(&tokens, None), Some(10));
        assert_eq!(max_time(&tokens, None), 80);
        assert_eq!(min_time(&tokens, Some(1)), Some(40));
        assert_eq!(max_time(&tokens, Some(1)), 40);
        assert_eq!(max_end_time(&tokens, None), Some(90));
        assert_eq!(min_time(&tokens, Some(7)), None);
    }

    #[test]
    fn controls_are_measured_in_their_band() {
        let tokens = stream(&[ctl(25, 10, 0, 60), ev(30, 5, 0, 60)]);
        assert_eq!(min_time(&tokens, None), Some(25));
        assert_eq!(max_end_time(&tokens, None), Some(35));
    }

    #[test]
    fn instrument_inventory_skips_rests_and_separators() {
        let mut tokens = stream(&[ev(0, 5, 0, 60), ev(5, 5, 33, 40), ctl(6, 5, 33, 41)]);
        tokens.extend([100, DUR_OFFSET, REST]);
        tokens.extend([SEPARATOR; 3]);
        let inventory = instruments(&tokens);
        assert_eq!(inventory.into_iter().collect::<Vec<_>>(), vec![(0, 1), (33, 2)]);
    }

    #[test]
    fn pad_fills_gaps_up_to_end() {
        let tokens = stream(&[ev(0, 5, 0, 60), ev(250, 5, 0, 62)]);
        let padded = pad(&tokens, Some(420));
        let times: Vec<_> = triples(&padded).map(|(t, _, _)| t).collect();
        assert_eq!(times, vec![0, 100, 200, 250, 350]);
        let rests = triples(&padded).filter(|&(_, _, n)| n == REST).count();
        assert_eq!(rests, 3);
    }

    #[test]
    fn anticipate_places_controls_ahead() {
        let events = pad(&stream(&[ev(0, 5, 0, 60), ev(1000, 5, 0, 62)]), None);
        let controls = stream(&[ctl(600, 5, 0, 70)]);
        let (merged, leftover) = anticipate(&events, &controls, ANTICIPATION_INTERVAL);

        assert!(leftover.is_empty());
        assert_eq!(merged.len(), events.len() + controls.len());
        // the control follows the first event at or past 600 - 500
        let position = triples(&merged).position(|(_, _, n)| n >= CONTROL_OFFSET).unwrap();
        let preceding: Vec<_> = triples(&merged).take(position).map(|(t, _, _)| t).collect();
        assert_eq!(preceding.last(), Some(&100));
    }

    #[test]
    fn anticipate_reports_leftovers() {
        let events = stream(&[ev(0, 5, 0, 60), ev(10, 5, 0, 62)]);
        let controls = stream(&[ctl(5000, 5, 0, 70)]);
        let (merged, leftover) = anticipate(&events, &controls, ANTICIPATION_INTERVAL);
        assert_eq!(merged, events);
        assert_eq!(leftover, controls);
    }

    #[test]
    fn translate_shifts_both_bands() {
        let tokens = stream(&[ctl(150, 5, 0, 60), ev(120, 5, 0, 60)]);
        let shifted = translate(&tokens, -120).unwrap();
        assert_eq!(shifted, stream(&[ctl(30, 5, 0, 60), ev(0, 5, 0, 60)]));
    }

    #[test]
    fn leading_segment_sets_the_time_base() {
        let mut tokens = stream(&[ev(15_000, 5, 0, 60), ev(15_040, 5, 0, 62)]);
        tokens.extend([SEPARATOR; 3]);
        tokens.extend(ev(10, 5, 0, 64));

        assert_eq!(min_time(&tokens, None), Some(15_000));
        assert_eq!(min_time(&tokens[3..], Some(0)), Some(15_040));
        assert_eq!(min_time(&tokens[6..], None), None);

        let mut expected = stream(&[ev(0, 5, 0, 60), ev(40, 5, 0, 62)]);
        expected.extend([SEPARATOR; 3]);
        expected.extend(ev(10, 5, 0, 64));
        assert_eq!(translate(&tokens, -15_000).unwrap(), expected);
    }

    #[test]
    fn translate_checks_segments_after_a_separator() {
        let mut tokens = stream(&[ev(100, 5, 0, 60)]);
        tokens.extend([SEPARATOR; 3]);
        tokens.extend(ev(MAX_TIME + 1, 5, 0, 64));
        assert!(matches!(translate(&tokens, -100), Err(Error::TimeOverflow { .. })));
    }

    #[test]
    fn translate_overflow_is_an_error() {
        let tokens = stream(&[ev(0, 5, 0, 60), ev(MAX_TIME + 50, 5, 0, 60)]);
        assert!(matches!(translate(&tokens, 0), Err(Error::TimeOverflow { .. })));
        assert!(matches!(translate(&tokens[..3], -1), Err(Error::TimeOverflow { .. })));
    }

    #[test]
    fn split_and_clip() {
        let mut tokens = stream(&[ev(0, 500, 0, 60), ctl(10, 5, 0, 61)]);
        tokens.extend([SEPARATOR; 3]);
        tokens.extend(ev(300, 5, 1, 62));

        let (events, controls) = split(&tokens);
        assert_eq!(events, stream(&[ev(0, 500, 0, 60), ev(300, 5, 1, 62)]));
        assert_eq!(controls, stream(&[ctl(10, 5, 0, 61)]));

        assert_eq!(clip(&tokens, 0, 200), stream(&[ev(0, 200, 0, 60)]));
    }
}
