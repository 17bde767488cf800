//! Plain-text token files: compound inputs and the emitted corpus.
//!
//! Both are whitespace-separated integers. The corpus holds one window per
//! line, conditioning prefix first.

use crate::vocab::Token;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Parse whitespace-separated integers; `context` names the source in errors.
pub fn parse_tokens<T: FromStr>(text: &str, context: &str) -> Result<Vec<T>> {
    text.split_whitespace()
        .map(|tok| {
            tok.parse().map_err(|_| Error::ParseToken {
                token: tok.to_string(),
                context: context.to_string(),
            })
        })
        .collect()
}

/// Read a whole token file.
pub fn read_tokens<T: FromStr>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tokens(&text, &path.display().to_string())
}

/// Read `count` corpus lines starting at line `first` (zero-based).
pub fn read_windows(path: &Path, first: usize, count: usize) -> Result<Vec<Vec<Token>>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    BufReader::new(file)
        .lines()
        .enumerate()
        .skip(first)
        .take(count)
        .map(|(i, line)| {
            let line = line.map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_tokens(&line, &format!("{} line {}", path.display(), i + 1))
        })
        .collect()
}

/// Line-per-window corpus writer.
pub struct CorpusWriter<W: Write> {
    inner: W,
    lines: usize,
}

impl CorpusWriter<BufWriter<File>> {
    /// Create (truncating) a corpus file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CorpusWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    /// Write `prefix` followed by `window` as one line.
    pub fn write_window(&mut self, prefix: &[Token], window: &[Token]) -> Result<()> {
        let mut line = String::with_capacity((prefix.len() + window.len()) * 6);
        for (i, tok) in prefix.iter().chain(window).enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&tok.to_string());
        }
        line.push('\n');

        self.inner.write_all(line.as_bytes())?;
        self.lines += 1;
        Ok(())
    }

    /// Windows written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
