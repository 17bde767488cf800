//! Control extraction: partition an event stream into kept events and
//! anticipated controls.
//!
//! Inputs must be plain event triples. SEPARATOR and REST are inserted
//! further downstream, so seeing either here is a bug in the caller.

use crate::triple::triples;
use crate::vocab::{
    instrument_of, Token, ANTICIPATION_RATES, CONTROL_OFFSET, DELTA, REST, SEPARATOR, TIME_OFFSET,
    TIME_RESOLUTION,
};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use std::collections::BTreeSet;

/// Result of an extraction: both halves keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub events: Vec<Token>,
    /// Extracted triples, shifted into the control band.
    pub controls: Vec<Token>,
}

impl Partition {
    fn push(&mut self, (time, dur, note): (Token, Token, Token), as_control: bool) {
        if as_control {
            self.controls
                .extend([CONTROL_OFFSET + time, CONTROL_OFFSET + dur, CONTROL_OFFSET + note]);
        } else {
            self.events.extend([time, dur, note]);
        }
    }
}

fn assert_extractable(note: Token) {
    assert!(
        note != SEPARATOR && note != REST,
        "separator/rest token in an event stream before extraction"
    );
}

/// Anticipate contiguous spans of `DELTA` seconds, separated by
/// exponentially distributed gaps averaging `1 / rate` seconds.
///
/// # Panics
///
/// If `rate` is not a positive finite number.
pub fn extract_spans<R: Rng + ?Sized>(events: &[Token], rate: f64, rng: &mut R) -> Partition {
    assert!(rate.is_finite() && rate > 0.0, "span rate must be positive, got {}", rate);
    let gap = Exp::new(rate).expect("rate checked above");
    let span_length = DELTA * TIME_RESOLUTION;

    let mut partition = Partition::default();
    let mut in_span = true;
    let mut end_span = TIME_OFFSET;
    let mut next_span = TIME_OFFSET;

    for triple in triples(events) {
        let (time, _, note) = triple;
        assert_extractable(note);

        // end of an anticipated span; decide when the next one starts
        if in_span && time >= end_span {
            in_span = false;
            next_span = time + (f64::from(TIME_RESOLUTION) * gap.sample(rng)) as u32;
        }

        if !in_span && time >= next_span {
            in_span = true;
            end_span = time + span_length;
        }

        partition.push(triple, in_span);
    }

    partition
}

/// Anticipate each event independently with probability
/// `rate / ANTICIPATION_RATES`.
pub fn extract_random<R: Rng + ?Sized>(events: &[Token], rate: f64, rng: &mut R) -> Partition {
    let probability = rate / f64::from(ANTICIPATION_RATES);
    let mut partition = Partition::default();

    for triple in triples(events) {
        assert_extractable(triple.2);
        partition.push(triple, rng.gen::<f64>() < probability);
    }

    partition
}

/// Anticipate every event played by one of `instruments`.
pub fn extract_instruments(events: &[Token], instruments: &BTreeSet<u32>) -> Partition {
    let mut partition = Partition::default();

    for triple in triples(events) {
        let note = triple.2;
        assert!(note < CONTROL_OFFSET, "control token in an event stream before extraction");
        assert_extractable(note);
        partition.push(triple, instruments.contains(&instrument_of(note)));
    }

    partition
}

/// A control extraction policy chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionStrategy {
    /// Contiguous anticipated spans; `rate` spans per second.
    Spans { rate: f64 },
    /// Independent per-event draws.
    Random { rate: f64 },
    /// Every event of the listed instruments.
    Instruments(BTreeSet<u32>),
}

impl ExtractionStrategy {
    pub fn extract<R: Rng + ?Sized>(&self, events: &[Token], rng: &mut R) -> Partition {
        match self {
            Self::Spans { rate } => extract_spans(events, *rate, rng),
            Self::Random { rate } => extract_random(events, *rate, rng),
            Self::Instruments(set) => extract_instruments(events, set),
        }
    }
}
