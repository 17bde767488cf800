//! Subcommand implementations.

use anyhow::{anyhow, bail, Context, Result};
use antconf::AntConfig;
use anticipation::corpus::read_windows;
use anticipation::{window_to_midi, TokenizeStats};
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix of the per-file compound inputs.
pub const COMPOUND_SUFFIX: &str = ".compound.txt";

/// Compound files directly under `dir`, sorted by path.
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_compound = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(COMPOUND_SUFFIX));
        if is_compound && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Split `files` into at most `workers` contiguous shards.
pub fn shard(files: &[PathBuf], workers: usize) -> Vec<&[PathBuf]> {
    if files.is_empty() {
        return Vec::new();
    }
    let per_shard = files.len().div_ceil(workers.max(1));
    files.chunks(per_shard).collect()
}

/// Tokenize the input directory, one scoped thread and one corpus file
/// per shard, and return the summed counts.
pub fn tokenize(config: &AntConfig) -> Result<TokenizeStats> {
    let settings = &config.tokenize;
    let output_dir = &config.paths.output_dir;

    let files = collect_inputs(&config.paths.input_dir)?;
    if files.is_empty() {
        bail!(
            "no *{} files in {}",
            COMPOUND_SUFFIX,
            config.paths.input_dir.display()
        );
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let shards = shard(&files, settings.workers);
    info!(
        "tokenizing {} files in {} shards into {}",
        files.len(),
        shards.len(),
        output_dir.display()
    );

    let results: Vec<anticipation::Result<TokenizeStats>> = std::thread::scope(|scope| {
        let handles: Vec<_> = shards
            .iter()
            .enumerate()
            .map(|(i, &shard)| {
                let output = output_dir.join(format!("tokenized-events-{}.txt", i));
                let seed = settings.seed.wrapping_add(i as u64);
                scope.spawn(move || anticipation::tokenize(shard, &output, settings, seed))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("tokenizer worker panicked"))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut total = TokenizeStats::default();
    for (i, result) in results.into_iter().enumerate() {
        let stats = result.with_context(|| format!("shard {} failed", i))?;
        total.merge(&stats);
    }

    info!(
        "done: {} windows from {} of {} tracks",
        total.windows, total.tracks, total.files
    );
    Ok(total)
}

/// Render `count` windows starting at `index`, returning the files written.
pub fn render(
    corpus: &Path,
    index: usize,
    count: usize,
    output: Option<&Path>,
    prefix_len: usize,
) -> Result<Vec<PathBuf>> {
    let output_dir = output
        .map(Path::to_path_buf)
        .or_else(|| corpus.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let stem = corpus
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("window");

    let windows = read_windows(corpus, index, count)?;
    if windows.is_empty() {
        bail!("{} has no window {}", corpus.display(), index);
    }

    let mut written = Vec::new();
    for (offset, window) in windows.iter().enumerate() {
        let rendered = window_to_midi(window, prefix_len)
            .with_context(|| format!("window {}", index + offset))?;

        for (suffix, bytes) in [
            ("event.mid", &rendered.events_midi),
            ("control.mid", &rendered.controls_midi),
        ] {
            let path = output_dir.join(format!("{}-{}.{}", stem, index + offset, suffix));
            std::fs::write(&path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
    }

    Ok(written)
}
