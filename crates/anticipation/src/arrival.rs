//! Absolute arrival times ⇄ inter-arrival deltas on a triple stream.
//!
//! Only the time channel changes. The first time is kept as-is; callers
//! treat it as the offset from stream start. Arithmetic wraps, so
//! `interarrival_to_arrival(arrival_to_interarrival(x)) == x` holds for
//! every input, including streams whose times are not sorted.

use crate::triple::{set_times, times};
use crate::vocab::Token;

/// Replace each time after the first with its distance from the previous
/// absolute time.
pub fn arrival_to_interarrival(tokens: &[Token]) -> Vec<Token> {
    let arrivals = times(tokens);
    let mut deltas = arrivals.clone();
    for (delta, pair) in deltas.iter_mut().skip(1).zip(arrivals.windows(2)) {
        *delta = pair[1].wrapping_sub(pair[0]);
    }

    let mut out = tokens.to_vec();
    set_times(&mut out, &deltas);
    out
}

/// Rebuild absolute times as a running sum seeded by the first time.
pub fn interarrival_to_arrival(tokens: &[Token]) -> Vec<Token> {
    let arrivals: Vec<Token> = times(tokens)
        .into_iter()
        .scan(None, |total: &mut Option<Token>, delta| {
            let next = total.map_or(delta, |t| t.wrapping_add(delta));
            *total = Some(next);
            Some(next)
        })
        .collect();

    let mut out = tokens.to_vec();
    set_times(&mut out, &arrivals);
    out
}
