//! Stride-3 access to `(time, duration, note)` token streams.
//!
//! Every function here requires `tokens.len() % 3 == 0`. A ragged stream
//! means an upstream stage mis-encoded its output, so it is asserted rather
//! than reported.

use crate::vocab::{Token, CONTROL_OFFSET, EVENT_SIZE, SEPARATOR};

#[inline]
fn assert_triples(tokens: &[Token]) {
    assert!(
        tokens.len() % EVENT_SIZE == 0,
        "token stream length {} is not a multiple of {}",
        tokens.len(),
        EVENT_SIZE
    );
}

/// Iterate `(time, duration, note)` triples.
pub fn triples(tokens: &[Token]) -> impl Iterator<Item = (Token, Token, Token)> + '_ {
    assert_triples(tokens);
    tokens.chunks_exact(EVENT_SIZE).map(|t| (t[0], t[1], t[2]))
}

/// Time channel.
pub fn times(tokens: &[Token]) -> Vec<Token> {
    channel(tokens, 0)
}

/// Duration channel.
pub fn durations(tokens: &[Token]) -> Vec<Token> {
    channel(tokens, 1)
}

/// Note/instrument channel.
pub fn notes(tokens: &[Token]) -> Vec<Token> {
    channel(tokens, 2)
}

fn channel(tokens: &[Token], index: usize) -> Vec<Token> {
    assert_triples(tokens);
    tokens.iter().skip(index).step_by(EVENT_SIZE).copied().collect()
}

/// Overwrite the time channel in place.
///
/// `times` must hold exactly one value per triple.
pub fn set_times(tokens: &mut [Token], times: &[Token]) {
    assert_triples(tokens);
    assert_eq!(tokens.len() / EVENT_SIZE, times.len(), "time channel length mismatch");
    for (slot, &time) in tokens.iter_mut().step_by(EVENT_SIZE).zip(times) {
        *slot = time;
    }
}

/// Shift every token into the control band.
pub fn add_control_offset(tokens: &[Token]) -> Vec<Token> {
    assert_triples(tokens);
    tokens.iter().map(|&tok| tok + CONTROL_OFFSET).collect()
}

/// Shift every token out of the control band.
pub fn remove_control_offset(tokens: &[Token]) -> Vec<Token> {
    assert_triples(tokens);
    tokens
        .iter()
        .map(|&tok| {
            debug_assert!(tok >= CONTROL_OFFSET, "token {} is not a control", tok);
            tok - CONTROL_OFFSET
        })
        .collect()
}

/// Number of SEPARATOR tokens; a multiple of 3 in any well-formed stream.
pub fn separator_count(tokens: &[Token]) -> usize {
    tokens.iter().filter(|&&tok| tok == SEPARATOR).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn channels_split_by_stride() {
        let tokens = vec![1, 2, 3, 4, 5, 6];
        assert_eq!(times(&tokens), vec![1, 4]);
        assert_eq!(durations(&tokens), vec![2, 5]);
        assert_eq!(notes(&tokens), vec![3, 6]);
    }

    #[test]
    fn set_times_touches_only_time_channel() {
        let mut tokens = vec![1, 2, 3, 4, 5, 6];
        set_times(&mut tokens, &[10, 40]);
        assert_eq!(tokens, vec![10, 2, 3, 40, 5, 6]);
    }

    #[test]
    fn control_offset_round_trip() {
        let tokens = vec![0, 10_010, 11_060];
        let controls = add_control_offset(&tokens);
        assert_eq!(controls[0], CONTROL_OFFSET);
        assert_eq!(remove_control_offset(&controls), tokens);
    }

    #[test]
    #[should_panic(expected = "not a multiple of 3")]
    fn ragged_stream_is_a_bug() {
        let _ = times(&[1, 2, 3, 4]);
    }
}
