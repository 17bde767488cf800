//! Track-level admission: too short, too long, or too many instruments.

use crate::convert::{compound_to_events, Compound};
use crate::ops;
use crate::vocab::{
    Token, COMPOUND_SIZE, MAX_TRACK_INSTR, MAX_TRACK_TIME_IN_SECONDS, MIN_TRACK_EVENTS,
    MIN_TRACK_TIME_IN_SECONDS, TIME_RESOLUTION,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Outcome of classifying one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    Ok,
    Short,
    Long,
    TooManyInstruments,
}

impl TrackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Short => "short",
            Self::Long => "long",
            Self::TooManyInstruments => "too_many_instruments",
        }
    }
}

impl std::fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded events of an accepted track, or the reason it was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Empty unless `status` is [`TrackStatus::Ok`].
    pub events: Vec<Token>,
    /// Durations clipped by the decoder.
    pub truncations: usize,
    pub status: TrackStatus,
}

impl Classification {
    fn rejected(status: TrackStatus) -> Self {
        Self {
            events: Vec::new(),
            truncations: 0,
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == TrackStatus::Ok
    }
}

/// Classify a raw compound stream.
///
/// Checks run in order and stop at the first failure: record count, end
/// time lower bound, end time upper bound, instrument count. Malformed
/// records are an error rather than a rejection.
pub fn classify(compound: &[Compound]) -> Result<Classification> {
    if compound.len() < COMPOUND_SIZE * MIN_TRACK_EVENTS {
        return Ok(Classification::rejected(TrackStatus::Short));
    }

    let (events, truncations) = compound_to_events(compound)?;
    let end_time = ops::max_time(&events, None);

    if end_time < TIME_RESOLUTION * MIN_TRACK_TIME_IN_SECONDS {
        return Ok(Classification::rejected(TrackStatus::Short));
    }

    if end_time > TIME_RESOLUTION * MAX_TRACK_TIME_IN_SECONDS {
        return Ok(Classification::rejected(TrackStatus::Long));
    }

    if ops::instruments(&events).len() > MAX_TRACK_INSTR {
        return Ok(Classification::rejected(TrackStatus::TooManyInstruments));
    }

    Ok(Classification {
        events,
        truncations,
        status: TrackStatus::Ok,
    })
}
