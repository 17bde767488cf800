//! Melody augmentation: timing jitter plus pitch and instrument
//! normalization of a control stream.
//!
//! The output keeps the melodic shape (pitch class and rhythm) and drops
//! octave and timbre, so many distinct conditioning signals can be made from
//! one extracted melody.

use crate::arrival::{arrival_to_interarrival, interarrival_to_arrival};
use crate::convert::{compound_to_events, events_to_compound};
use crate::triple::{add_control_offset, remove_control_offset, separator_count, set_times, times};
use crate::vocab::{Token, COMPOUND_SIZE};
use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use tracing::debug;

/// Smallest variance used for the timing noise; a noise level of zero
/// still jitters a little.
pub const NOISE_FLOOR: f64 = 1e-4;

/// Every normalized pitch lands in `[REFERENCE_PITCH, REFERENCE_PITCH + 12)`.
pub const REFERENCE_PITCH: i64 = 60;

/// Instrument every normalized note is assigned to (acoustic grand piano).
pub const REFERENCE_INSTRUMENT: i64 = 0;

/// Log-normal `(μ, σ²)` whose samples have the given mean and variance.
pub fn lognormal_params(mean: f64, variance: f64) -> (f64, f64) {
    let sigma_sq = (variance / (mean * mean) + 1.0).ln();
    let mu = mean.ln() - sigma_sq / 2.0;
    (mu, sigma_sq)
}

/// Distort a control stream.
///
/// Inter-arrival times are scaled by independent mean-1 log-normal factors
/// with variance `noise_level`, then pitches fold into one octave and all
/// notes move to the reference instrument. Returns an empty stream when
/// nothing encodable survives re-encoding; callers treat that as a failed
/// variant.
pub fn distort<R: Rng + ?Sized>(controls: &[Token], noise_level: f64, rng: &mut R) -> Vec<Token> {
    assert!(
        separator_count(controls) % 3 == 0,
        "separator tokens do not fill whole triples"
    );

    let events = remove_control_offset(controls);
    let mut jittered = arrival_to_interarrival(&events);

    let (mu, sigma_sq) = lognormal_params(1.0, noise_level.max(NOISE_FLOOR));
    let noise = LogNormal::new(mu, sigma_sq.sqrt()).expect("moment-matched parameters are finite");
    let deltas: Vec<Token> = times(&jittered)
        .into_iter()
        .map(|delta| (f64::from(delta) * noise.sample(&mut *rng)).round() as Token)
        .collect();
    set_times(&mut jittered, &deltas);

    let arrivals = interarrival_to_arrival(&jittered);

    let mut compound = events_to_compound(&arrivals);
    if compound.is_empty() {
        return Vec::new();
    }

    for record in compound.chunks_exact_mut(COMPOUND_SIZE) {
        if record[2] == -1 {
            continue;
        }
        record[2] = record[2] % 12 + REFERENCE_PITCH;
        record[3] = REFERENCE_INSTRUMENT;
    }

    match compound_to_events(&compound) {
        Ok((normalized, _)) => add_control_offset(&normalized),
        Err(e) => {
            debug!("distorted melody no longer encodes: {}", e);
            Vec::new()
        }
    }
}
