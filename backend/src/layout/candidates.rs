//! Ordered candidate-path search.
//!
//! Several assets live in one of a few well-known places. Each location is a
//! labelled generator evaluated only when the search reaches it, so earlier
//! hits never pay for building later paths.

use std::path::{Path, PathBuf};

use tracing::debug;

type Generator<'a> = Box<dyn Fn() -> PathBuf + 'a>;

/// Ordered list of candidate locations, highest precedence first.
pub struct CandidatePaths<'a> {
    candidates: Vec<(&'static str, Generator<'a>)>,
}

impl<'a> CandidatePaths<'a> {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Append a candidate with lower precedence than all existing ones.
    pub fn then<F>(mut self, label: &'static str, generate: F) -> Self
    where
        F: Fn() -> PathBuf + 'a,
    {
        self.candidates.push((label, Box::new(generate)));
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Highest-precedence path, whether or not it exists.
    pub fn primary(&self) -> Option<PathBuf> {
        self.candidates.first().map(|(_, generate)| generate())
    }

    /// All candidate paths in precedence order.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.candidates.iter().map(|(_, generate)| generate())
    }

    /// First candidate that exists on disk.
    pub fn first_existing(&self) -> Option<PathBuf> {
        self.first_accepted(|path| Some(path.to_path_buf()))
    }

    /// First existing candidate for which `accept` produces a value.
    ///
    /// Candidates that exist but are rejected are skipped, so a corrupt file
    /// in a high-precedence location falls through to the next one.
    pub fn first_accepted<T, F>(&self, mut accept: F) -> Option<T>
    where
        F: FnMut(&Path) -> Option<T>,
    {
        for (label, generate) in &self.candidates {
            let path = generate();
            if !path.exists() {
                continue;
            }
            match accept(&path) {
                Some(value) => {
                    debug!(candidate = label, path = %path.display(), "Candidate accepted");
                    return Some(value);
                }
                None => debug!(candidate = label, path = %path.display(), "Candidate rejected"),
            }
        }
        None
    }
}

impl Default for CandidatePaths<'_> {
    fn default() -> Self {
        Self::new()
    }
}
