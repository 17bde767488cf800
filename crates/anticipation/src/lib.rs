//! Anticipatory tokenization of symbolic music.
//!
//! Turns validated per-file event streams into fixed-length training windows
//! in which "control" events (a distorted melody) are interleaved ahead of
//! the time they occur, so a sequence model learns to condition on them.
//!
//! Pipeline, leaves first:
//!
//! 1. [`triple`] - stride-3 access to `(time, duration, note)` streams
//! 2. [`validity`] - reject short, long and over-orchestrated tracks
//! 3. [`extract`] - split an event stream into kept events and controls
//! 4. [`arrival`] - absolute times ⇄ inter-arrival deltas
//! 5. [`distort`] - timing jitter plus pitch/instrument normalization
//! 6. [`window`] - merge, window, filter, prefix and emit
//!
//! [`convert`] and [`ops`] supply the compound codec and the token-stream
//! primitives the stages are built from; [`corpus`] and [`render`] handle
//! reading, writing and auditioning the results.

pub mod arrival;
pub mod convert;
pub mod corpus;
pub mod distort;
pub mod extract;
pub mod ops;
pub mod render;
pub mod triple;
pub mod validity;
pub mod vocab;
pub mod window;

pub use arrival::{arrival_to_interarrival, interarrival_to_arrival};
pub use convert::{compound_to_events, events_to_compound};
pub use corpus::CorpusWriter;
pub use distort::distort;
pub use extract::{extract_instruments, extract_random, extract_spans, ExtractionStrategy, Partition};
pub use render::{window_to_midi, RenderedWindow};
pub use validity::{classify, Classification, TrackStatus};
pub use vocab::Token;
pub use window::{tokenize, Rejection, TokenizeStats, WindowDriver};

use std::path::PathBuf;

/// Errors from tokenization operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid token '{token}' in {context}")]
    ParseToken { token: String, context: String },

    #[error("malformed compound stream: {0}")]
    MalformedCompound(String),

    #[error("time {time} falls outside [0, {max}) after shifting by {delta}")]
    TimeOverflow { time: i64, delta: i64, max: u32 },

    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    #[error("MIDI write error: {0}")]
    Midi(String),
}

pub type Result<T> = std::result::Result<T, Error>;
