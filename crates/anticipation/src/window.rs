//! Window/emission driver.
//!
//! Per track: validity filter, melody instrument selection, then for each
//! chosen melody a series of distorted variants, each merged with the track
//! and appended to a carry-over buffer. Full windows are cut from the front
//! of the buffer, filtered, prefixed and written as corpus lines.
//!
//! One driver owns one buffer, one writer and is fed one generator; nothing
//! is shared between drivers.

use crate::convert::Compound;
use crate::corpus::{read_tokens, CorpusWriter};
use crate::distort::distort;
use crate::extract::extract_instruments;
use crate::ops::{self, ANTICIPATION_INTERVAL};
use crate::triple::{separator_count, triples};
use crate::validity::{classify, TrackStatus};
use crate::vocab::{
    instrument_of, Token, ANTICIPATE, CONDITIONING_SLOTS, NO_INSTRUMENT, REST, SEPARATOR,
    TIME_RESOLUTION, WINDOW_TOKENS,
};
use crate::Result;
use antconf::{Conditioning, TokenizeConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Why a track, variant or window was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Input file unreadable or not a valid compound stream.
    MalformedTrack,
    ShortTrack,
    LongTrack,
    TooManyInstruments,
    /// No instrument in the melodic program range.
    NoMelodyInstrument,
    /// SEPARATOR tokens that do not fill whole triples.
    MisalignedSeparators,
    /// Track already contains separator triples, which extraction forbids.
    EmbeddedSeparators,
    /// Distortion left nothing to encode.
    EmptyDistortion,
    /// The merge ran out of events before placing every control.
    UnconsumedControls,
    /// Relativized window times do not fit the time band.
    RelativizationOverflow,
    SparseMelody,
    LateMelodyOnset,
    EarlyMelodyOffset,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedTrack => "malformed_track",
            Self::ShortTrack => "short_track",
            Self::LongTrack => "long_track",
            Self::TooManyInstruments => "too_many_instruments",
            Self::NoMelodyInstrument => "no_melody_instrument",
            Self::MisalignedSeparators => "misaligned_separators",
            Self::EmbeddedSeparators => "embedded_separators",
            Self::EmptyDistortion => "empty_distortion",
            Self::UnconsumedControls => "unconsumed_controls",
            Self::RelativizationOverflow => "relativization_overflow",
            Self::SparseMelody => "sparse_melody",
            Self::LateMelodyOnset => "late_melody_onset",
            Self::EarlyMelodyOffset => "early_melody_offset",
        }
    }

    fn from_status(status: TrackStatus) -> Option<Self> {
        match status {
            TrackStatus::Ok => None,
            TrackStatus::Short => Some(Self::ShortTrack),
            TrackStatus::Long => Some(Self::LongTrack),
            TrackStatus::TooManyInstruments => Some(Self::TooManyInstruments),
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counts for one or more drivers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeStats {
    /// Input files seen.
    pub files: usize,
    /// Tracks that passed the validity filter.
    pub tracks: usize,
    /// Distorted variants attempted.
    pub variants: usize,
    /// Windows written to the corpus.
    pub windows: usize,
    /// REST tokens inserted by padding.
    pub rest_tokens: usize,
    /// Durations clipped while decoding accepted tracks.
    pub truncations: usize,
    /// Tokens left in the carry-over buffer at the end.
    pub discarded_tail_tokens: usize,
    pub rejections: BTreeMap<Rejection, usize>,
}

impl TokenizeStats {
    pub fn reject(&mut self, reason: Rejection) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    pub fn rejected(&self, reason: Rejection) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Fold another worker's counts into this one.
    pub fn merge(&mut self, other: &TokenizeStats) {
        self.files += other.files;
        self.tracks += other.tracks;
        self.variants += other.variants;
        self.windows += other.windows;
        self.rest_tokens += other.rest_tokens;
        self.truncations += other.truncations;
        self.discarded_tail_tokens += other.discarded_tail_tokens;
        for (&reason, &count) in &other.rejections {
            *self.rejections.entry(reason).or_insert(0) += count;
        }
    }
}

/// Where a merged run starts in the token stream and which melody it carries.
#[derive(Debug, Clone, Copy)]
struct RunMark {
    start: u64,
    melody: u32,
}

/// Drives tracks through extraction, distortion, merging and windowing.
pub struct WindowDriver<W: Write> {
    settings: TokenizeConfig,
    writer: CorpusWriter<W>,
    buffer: VecDeque<Token>,
    runs: VecDeque<RunMark>,
    /// Stream position of `buffer[0]`.
    consumed: u64,
    stats: TokenizeStats,
}

impl<W: Write> WindowDriver<W> {
    pub fn new(writer: CorpusWriter<W>, settings: TokenizeConfig) -> Self {
        Self {
            settings,
            writer,
            buffer: VecDeque::new(),
            runs: VecDeque::new(),
            consumed: 0,
            stats: TokenizeStats::default(),
        }
    }

    pub fn stats(&self) -> &TokenizeStats {
        &self.stats
    }

    /// Count an input that could not be read at all.
    pub fn record_unreadable(&mut self) {
        self.stats.files += 1;
        self.stats.reject(Rejection::MalformedTrack);
    }

    /// Run one track's compound stream through the pipeline.
    ///
    /// Rejections are counted, never returned; only writer failures are
    /// errors.
    pub fn process_track<R: Rng + ?Sized>(&mut self, compound: &[Compound], rng: &mut R) -> Result<()> {
        self.stats.files += 1;

        let classification = match classify(compound) {
            Ok(c) => c,
            Err(e) => {
                debug!("rejecting malformed track: {}", e);
                self.stats.reject(Rejection::MalformedTrack);
                return Ok(());
            }
        };
        if let Some(reason) = Rejection::from_status(classification.status) {
            debug!("rejecting track: {}", reason);
            self.stats.reject(reason);
            return Ok(());
        }

        self.stats.tracks += 1;
        self.stats.truncations += classification.truncations;
        let events = classification.events;

        // a time or duration may legitimately equal SEPARATOR; only the note slot marks one
        if triples(&events).any(|(_, _, note)| note == SEPARATOR) {
            self.stats.reject(Rejection::EmbeddedSeparators);
            return Ok(());
        }

        let end_time = ops::max_time(&events, None);
        let mut candidates: Vec<u32> = ops::instruments(&events)
            .into_keys()
            .filter(|&instr| self.settings.is_melody_program(instr))
            .collect();

        if candidates.is_empty() {
            self.stats.reject(Rejection::NoMelodyInstrument);
            return Ok(());
        }

        for _ in 0..self.settings.max_melodies {
            if candidates.is_empty() {
                break;
            }
            let melody = candidates.remove(rng.gen_range(0..candidates.len()));
            debug!("augmenting melody instrument {}", melody);
            self.augment_melody(&events, end_time, melody, rng)?;
        }

        Ok(())
    }

    fn augment_melody<R: Rng + ?Sized>(
        &mut self,
        events: &[Token],
        end_time: u32,
        melody: u32,
        rng: &mut R,
    ) -> Result<()> {
        let melody_controls = extract_instruments(events, &BTreeSet::from([melody])).controls;
        // an event at the REST tick becomes a SEPARATOR time token once offset
        if separator_count(&melody_controls) % 3 != 0 {
            debug!("melody {} controls carry a stray separator token", melody);
            self.stats.reject(Rejection::MisalignedSeparators);
            return Ok(());
        }

        for _ in 0..self.settings.variants_per_melody {
            self.stats.variants += 1;

            let noise_level = if self.settings.max_noise_level > 0.0 {
                rng.gen_range(0.0..self.settings.max_noise_level)
            } else {
                0.0
            };

            let controls = distort(&melody_controls, noise_level, rng);
            if controls.is_empty() {
                self.stats.reject(Rejection::EmptyDistortion);
                continue;
            }

            // cover the stretched controls so the merge can place all of them
            let padded = ops::pad(events, Some(end_time.max(ops::max_time(&controls, None))));
            self.stats.rest_tokens += triples(&padded).filter(|&(_, _, n)| n == REST).count();

            let (merged, leftover) = ops::anticipate(&padded, &controls, ANTICIPATION_INTERVAL);
            if !leftover.is_empty() {
                self.stats.reject(Rejection::UnconsumedControls);
                continue;
            }

            self.push_run(melody, merged);
            self.drain_windows(rng)?;
        }

        Ok(())
    }

    fn push_run(&mut self, melody: u32, merged: Vec<Token>) {
        self.runs.push_back(RunMark {
            start: self.consumed + self.buffer.len() as u64,
            melody,
        });
        self.buffer.extend([SEPARATOR; 3]);
        self.buffer.extend(merged);
    }

    /// Melody of the run that contains stream position `position`.
    fn melody_at(&self, position: u64) -> u32 {
        self.runs
            .iter()
            .take_while(|run| run.start <= position)
            .last()
            .map(|run| run.melody)
            .expect("every buffered token belongs to a run")
    }

    fn drain_windows<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        while self.buffer.len() >= WINDOW_TOKENS {
            let melody = self.melody_at(self.consumed);
            let window: Vec<Token> = self.buffer.drain(..WINDOW_TOKENS).collect();
            self.consumed += WINDOW_TOKENS as u64;

            while self.runs.len() > 1 && self.runs[1].start <= self.consumed {
                self.runs.pop_front();
            }

            match check_window(&window, melody, &self.settings) {
                Ok(relative) => {
                    let prefix = match self.settings.conditioning {
                        Conditioning::Anticipate => vec![ANTICIPATE],
                        Conditioning::Instruments => instrument_prefix(&relative, melody, rng),
                    };
                    self.writer.write_window(&prefix, &relative)?;
                    self.stats.windows += 1;
                }
                Err(reason) => self.stats.reject(reason),
            }
        }
        Ok(())
    }

    /// Flush the corpus, drop the partial tail and return the counts along
    /// with the underlying writer.
    pub fn finish(mut self) -> Result<(TokenizeStats, W)> {
        self.stats.discarded_tail_tokens = self.buffer.len();
        let inner = self.writer.finish()?;
        Ok((self.stats, inner))
    }
}

/// Relativize a window and apply the melody filters.
///
/// Returns the window shifted to start at time zero, or the first filter it
/// fails. Melody measurements look only at event triples of `melody`; the
/// anticipated controls are not counted.
pub fn check_window(
    window: &[Token],
    melody: u32,
    settings: &TokenizeConfig,
) -> std::result::Result<Vec<Token>, Rejection> {
    // relativize against the leading segment; later runs already start near zero
    let start = ops::min_time(window, None).unwrap_or(0);
    let relative =
        ops::translate(window, -i64::from(start)).map_err(|_| Rejection::RelativizationOverflow)?;
    if separator_count(&relative) % 3 != 0 {
        return Err(Rejection::MisalignedSeparators);
    }

    let (events, _) = ops::split(&relative);
    let melody_events = triples(&events)
        .filter(|&(_, _, n)| n != REST && instrument_of(n) == melody)
        .count();
    if melody_events == 0 || melody_events < settings.min_melody_events {
        return Err(Rejection::SparseMelody);
    }

    let onset = ops::min_time(&events, Some(melody)).unwrap_or(0);
    if onset > settings.melody_onset_bound_seconds * TIME_RESOLUTION {
        return Err(Rejection::LateMelodyOnset);
    }

    let melody_end = ops::max_end_time(&events, Some(melody)).unwrap_or(0);
    let window_end = ops::max_end_time(&events, None).unwrap_or(0);
    if window_end.saturating_sub(melody_end) > settings.melody_offset_bound_seconds * TIME_RESOLUTION {
        return Err(Rejection::EarlyMelodyOffset);
    }

    Ok(relative)
}

/// Instrument-conditioning vector: the window's event instruments in random
/// order with `melody` in slot 0, padded with [`NO_INSTRUMENT`].
pub fn instrument_prefix<R: Rng + ?Sized>(window: &[Token], melody: u32, rng: &mut R) -> Vec<Token> {
    let (events, _) = ops::split(window);
    let mut slots: Vec<Token> = ops::instruments(&events).into_keys().collect();
    slots.shuffle(rng);

    if let Some(position) = slots.iter().position(|&instr| instr == melody) {
        slots.swap(0, position);
    }

    slots.truncate(CONDITIONING_SLOTS);
    slots.resize(CONDITIONING_SLOTS, NO_INSTRUMENT);
    slots
}

/// Tokenize `datafiles` in order into one corpus file.
///
/// One generator is seeded from `seed` and threaded through every random
/// draw, so the same files, order and seed reproduce the same corpus.
pub fn tokenize(
    datafiles: &[PathBuf],
    output: &Path,
    settings: &TokenizeConfig,
    seed: u64,
) -> Result<TokenizeStats> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut driver = WindowDriver::new(CorpusWriter::create(output)?, settings.clone());

    for path in datafiles {
        let compound: Vec<Compound> = match read_tokens(path) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                driver.record_unreadable();
                continue;
            }
        };

        driver.process_track(&compound, &mut rng)?;
        debug!(
            "{}: {} windows so far",
            path.display(),
            driver.stats().windows
        );
    }

    let (stats, _) = driver.finish()?;
    info!(
        output = %output.display(),
        files = stats.files,
        tracks = stats.tracks,
        windows = stats.windows,
        "tokenized shard"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{note_token, CONTROL_OFFSET, DUR_OFFSET, TIME_OFFSET};
    use pretty_assertions::assert_eq;

    const MELODY: u32 = 40;
    /// Piano, outside the melodic program range.
    const BASS: u32 = 0;

    fn ev(time: u32, dur: u32, instr: u32, pitch: u32) -> [Token; 3] {
        [TIME_OFFSET + time, DUR_OFFSET + dur, note_token(instr, pitch)]
    }

    /// A window with `count` melody notes every 25 ticks from `melody_start`
    /// over a bass note every 50 ticks up to `end`.
    fn window_with(melody_start: u32, count: u32, end: u32) -> Vec<Token> {
        let mut notes: Vec<[Token; 3]> = (0..end / 50).map(|i| ev(i * 50, 40, BASS, 40)).collect();
        notes.extend((0..count).map(|i| ev(melody_start + i * 25, 20, MELODY, 72)));
        notes.sort_by_key(|t| t[0]);
        notes.concat()
    }

    #[test]
    fn dense_melody_window_passes() {
        let window = window_with(0, 40, 1000);
        let relative = check_window(&window, MELODY, &TokenizeConfig::default()).unwrap();
        assert_eq!(ops::min_time(&relative, None), Some(0));
    }

    #[test]
    fn window_is_relativized() {
        let shifted: Vec<Token> = window_with(0, 40, 1000)
            .chunks(3)
            .flat_map(|t| [t[0] + 700, t[1], t[2]])
            .collect();
        let relative = check_window(&shifted, MELODY, &TokenizeConfig::default()).unwrap();
        assert_eq!(relative, window_with(0, 40, 1000));
    }

    #[test]
    fn sparse_melody_is_rejected() {
        let window = window_with(0, 19, 1000);
        assert_eq!(
            check_window(&window, MELODY, &TokenizeConfig::default()),
            Err(Rejection::SparseMelody)
        );
    }

    #[test]
    fn late_onset_is_rejected() {
        // melody starts 2.5 seconds in
        let window = window_with(250, 30, 1000);
        assert_eq!(
            check_window(&window, MELODY, &TokenizeConfig::default()),
            Err(Rejection::LateMelodyOnset)
        );
    }

    #[test]
    fn early_offset_is_rejected() {
        // melody ends near 5.2s, the window runs to 10s
        let window = window_with(0, 20, 1000);
        assert_eq!(
            check_window(&window, MELODY, &TokenizeConfig::default()),
            Err(Rejection::EarlyMelodyOffset)
        );
    }

    #[test]
    fn controls_do_not_count_as_melody() {
        let mut window = window_with(0, 5, 1000);
        for i in 0..30 {
            let [t, d, n] = ev(i * 25, 20, MELODY, 72);
            window.extend([t + CONTROL_OFFSET, d + CONTROL_OFFSET, n + CONTROL_OFFSET]);
        }
        assert_eq!(
            check_window(&window, MELODY, &TokenizeConfig::default()),
            Err(Rejection::SparseMelody)
        );
    }

    #[test]
    fn overflowing_window_is_rejected() {
        let mut window = window_with(0, 40, 1000);
        window.extend(ev(20_000, 10, BASS, 40));
        assert_eq!(
            check_window(&window, MELODY, &TokenizeConfig::default()),
            Err(Rejection::RelativizationOverflow)
        );
    }

    #[test]
    fn window_across_a_run_boundary_is_accepted() {
        // tail of a run 150 seconds into its track, then the head of the next run
        let tail: Vec<Token> = window_with(0, 20, 500)
            .chunks(3)
            .flat_map(|t| [t[0] + 15_000, t[1], t[2]])
            .collect();
        let mut window = tail;
        window.extend([SEPARATOR; 3]);
        window.extend(window_with(0, 20, 500));

        let mut expected = window_with(0, 20, 500);
        expected.extend([SEPARATOR; 3]);
        expected.extend(window_with(0, 20, 500));

        assert_eq!(check_window(&window, MELODY, &TokenizeConfig::default()), Ok(expected));
    }

    #[test]
    fn window_opening_on_a_separator_keeps_its_times() {
        let mut window = vec![SEPARATOR; 3];
        window.extend(window_with(0, 40, 1000));
        assert_eq!(
            check_window(&window, MELODY, &TokenizeConfig::default()),
            Ok(window.clone())
        );
    }

    #[test]
    fn prefix_puts_melody_first() {
        let window = window_with(0, 40, 1000);
        for seed in 0..20 {
            let prefix = instrument_prefix(&window, MELODY, &mut StdRng::seed_from_u64(seed));
            assert_eq!(prefix.len(), CONDITIONING_SLOTS);
            assert_eq!(prefix[0], MELODY);
            assert_eq!(prefix[1], BASS);
            assert!(prefix[2..].iter().all(|&slot| slot == NO_INSTRUMENT));
        }
    }

    #[test]
    fn stats_merge_adds_counts() {
        let mut a = TokenizeStats::default();
        a.windows = 3;
        a.reject(Rejection::SparseMelody);
        let mut b = TokenizeStats::default();
        b.windows = 2;
        b.reject(Rejection::SparseMelody);
        b.reject(Rejection::ShortTrack);

        a.merge(&b);
        assert_eq!(a.windows, 5);
        assert_eq!(a.rejected(Rejection::SparseMelody), 2);
        assert_eq!(a.rejected(Rejection::ShortTrack), 1);
        assert_eq!(a.rejected(Rejection::LongTrack), 0);
    }

    #[test]
    fn stats_serialize_with_named_reasons() {
        let mut stats = TokenizeStats::default();
        stats.reject(Rejection::LateMelodyOnset);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["rejections"]["late_melody_onset"], 1);
        assert_eq!(json["windows"], 0);
    }

    /// 300 seconds: a melody note every 250ms on `MELODY`, bass every 500ms.
    fn compound_records() -> Vec<[Compound; 5]> {
        let mut records: Vec<[Compound; 5]> = (0..1200)
            .map(|i| [i * 25, 20, 60 + (i * 5) % 24, MELODY as Compound, 90])
            .collect();
        records.extend((0..600).map(|i| [i * 50, 45, 36 + i % 12, BASS as Compound, 80]));
        records
    }

    fn compound_track() -> Vec<Compound> {
        let mut records = compound_records();
        records.sort_by_key(|r| r[0]);
        records.concat()
    }

    fn run_track(
        track: &[Compound],
        seed: u64,
        settings: TokenizeConfig,
    ) -> (TokenizeStats, String) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut driver = WindowDriver::new(CorpusWriter::new(Vec::new()), settings);
        driver.process_track(track, &mut rng).unwrap();
        let (stats, bytes) = driver.finish().unwrap();
        (stats, String::from_utf8(bytes).unwrap())
    }

    fn run_driver(seed: u64, settings: TokenizeConfig) -> (TokenizeStats, String) {
        run_track(&compound_track(), seed, settings)
    }

    #[test]
    fn driver_emits_well_formed_windows() {
        let settings = TokenizeConfig {
            variants_per_melody: 2,
            ..TokenizeConfig::default()
        };
        let (stats, corpus) = run_driver(0, settings);

        assert_eq!(stats.files, 1);
        assert_eq!(stats.tracks, 1);
        assert_eq!(stats.variants, 2);
        assert!(stats.windows > 0);
        assert_eq!(corpus.lines().count(), stats.windows);

        for line in corpus.lines() {
            let tokens: Vec<Token> = line.split(' ').map(|t| t.parse().unwrap()).collect();
            assert_eq!(tokens.len(), CONDITIONING_SLOTS + WINDOW_TOKENS);
            assert_eq!(tokens[0], MELODY);
            assert_eq!(separator_count(&tokens[CONDITIONING_SLOTS..]) % 3, 0);
        }
    }

    #[test]
    fn driver_is_reproducible() {
        let settings = TokenizeConfig {
            variants_per_melody: 2,
            ..TokenizeConfig::default()
        };
        let (_, first) = run_driver(5, settings.clone());
        let (_, second) = run_driver(5, settings);
        assert_eq!(first, second);
    }

    #[test]
    fn anticipate_conditioning_uses_single_marker() {
        let settings = TokenizeConfig {
            variants_per_melody: 1,
            conditioning: Conditioning::Anticipate,
            ..TokenizeConfig::default()
        };
        let (stats, corpus) = run_driver(1, settings);
        assert!(stats.windows > 0);
        for line in corpus.lines() {
            let tokens: Vec<Token> = line.split(' ').map(|t| t.parse().unwrap()).collect();
            assert_eq!(tokens.len(), 1 + WINDOW_TOKENS);
            assert_eq!(tokens[0], ANTICIPATE);
        }
    }

    #[test]
    fn track_without_melody_instrument_is_counted() {
        let records: Vec<Compound> = (0..200).flat_map(|i| [i * 10, 5, 60, 0, 90]).collect();
        let mut rng = StdRng::seed_from_u64(0);
        let mut driver = WindowDriver::new(CorpusWriter::new(Vec::new()), TokenizeConfig::default());
        driver.process_track(&records, &mut rng).unwrap();
        assert_eq!(driver.stats().rejected(Rejection::NoMelodyInstrument), 1);
        assert_eq!(driver.stats().variants, 0);
    }

    #[test]
    fn melody_note_on_the_rest_tick_skips_the_melody() {
        // the control time token of tick 27512 collides with SEPARATOR
        let mut records = compound_records();
        records.push([REST as Compound, 20, 72, MELODY as Compound, 90]);
        records.sort_by_key(|r| r[0]);

        let settings = TokenizeConfig {
            variants_per_melody: 1,
            ..TokenizeConfig::default()
        };
        let (stats, corpus) = run_track(&records.concat(), 0, settings);

        assert_eq!(stats.tracks, 1);
        assert_eq!(stats.rejected(Rejection::MisalignedSeparators), 1);
        assert_eq!(stats.variants, 0);
        assert_eq!(corpus, "");
    }

    #[test]
    fn event_on_the_separator_tick_is_not_a_separator() {
        let mut records = compound_records();
        // keep the bass going past tick 55025
        records.extend((600..1110).map(|i| [i * 50, 45, 36 + i % 12, BASS as Compound, 80]));
        records.push([SEPARATOR as Compound, 45, 40, BASS as Compound, 80]);
        records.sort_by_key(|r| r[0]);

        let settings = TokenizeConfig {
            variants_per_melody: 1,
            ..TokenizeConfig::default()
        };
        let (stats, _) = run_track(&records.concat(), 1, settings);

        assert_eq!(stats.tracks, 1);
        assert_eq!(stats.rejected(Rejection::EmbeddedSeparators), 0);
        assert_eq!(stats.variants, 1);
        assert!(stats.windows > 0);
    }
}
