//! Load a newline-delimited integer dataset into memory.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    ops::Index,
    path::Path,
};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

/// Errors that can occur when loading a dataset.
#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum Error {
    /// The source was missing or unreadable.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// A non-blank line failed integer parsing.
    #[error("malformed entry at line {line}: {content:?}")]
    MalformedEntry { line: usize, content: String },
}

/// How the loader treats lines that fail integer parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Policy {
    /// Abort the load on the first malformed line.
    #[default]
    Fail,
    /// Drop malformed lines and continue.
    Skip,
}

/// An ascending sequence of integers, immutable after load.
///
/// The loader preserves file order and does not verify sortedness: the
/// exact-match phase of [crate::Engine] assumes ascending input, so
/// callers must supply a pre-sorted source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset(Vec<i64>);

impl Dataset {
    /// Loads a dataset from a file containing one integer per line.
    ///
    /// Blank lines are skipped and surrounding whitespace is ignored.
    /// Loading is a single attempt: there is no caching and no retry.
    pub fn load(path: impl AsRef<Path>, policy: Policy) -> Result<Self, Error> {
        let path = path.as_ref();
        let file =
            File::open(path).map_err(|_| Error::SourceNotFound(path.display().to_string()))?;
        let dataset = Self::read(BufReader::new(file), policy)?;
        debug!(path = %path.display(), values = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    /// Reads a dataset from any buffered source, one integer per line.
    pub fn read(reader: impl BufRead, policy: Policy) -> Result<Self, Error> {
        let mut values = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::SourceNotFound(e.to_string()))?;
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.parse::<i64>() {
                Ok(value) => values.push(value),
                Err(_) => {
                    if policy == Policy::Skip {
                        warn!(line = number + 1, content = entry, "skipping malformed entry");
                        continue;
                    }
                    return Err(Error::MalformedEntry {
                        line: number + 1,
                        content: entry.to_string(),
                    });
                }
            }
        }
        Ok(Self(values))
    }

    /// Returns the number of values in the dataset.
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the dataset holds no values.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a value by index, if it exists.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }
}

impl From<Vec<i64>> for Dataset {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl AsRef<[i64]> for Dataset {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

impl Index<usize> for Dataset {
    type Output = i64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
