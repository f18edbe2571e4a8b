//! Mirror set: normalized remote repository prefixes and per-request
//! candidate URL construction.

mod discover;
mod normalize;

pub use discover::{discover_list_paths, LIST_FILENAMES};
pub use normalize::{defuzz, DEFAULT_RESOLVER_PATH};

use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::Path;

/// An ordered, deduplicated set of normalized mirror prefixes. Loaded once
/// and reused across checkouts; candidate lists are rebuilt (and
/// reshuffled) on every request.
#[derive(Debug, Clone, Default)]
pub struct MirrorSet {
    prefixes: Vec<String>,
}

impl MirrorSet {
    pub fn new() -> Self {
        MirrorSet::default()
    }

    /// Normalize and add one raw mirror spec. Specs that do not normalize
    /// into a parseable URL are dropped with a warning; duplicates (after
    /// normalization) collapse to the first occurrence.
    pub fn add(&mut self, raw: &str) {
        let prefix = defuzz(raw);
        if url::Url::parse(&prefix).is_err() {
            tracing::warn!(spec = raw, "ignoring unparseable mirror spec");
            return;
        }
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Parse mirror list content: blank lines and `#` comments ignored,
    /// `key = value` lines contribute only the value, any other non-empty
    /// line is a raw mirror spec.
    pub fn parse_list(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let spec = match tokens.as_slice() {
                [_, "=", value] => *value,
                _ => line,
            };
            self.add(spec);
        }
    }

    /// Load one mirror list file. A file that cannot be read is a soft
    /// failure: warn and skip, never fatal.
    pub fn load_list_file(&mut self, path: &Path) {
        match fs::read_to_string(path) {
            Ok(content) => self.parse_list(&content),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "couldn't open repository list file"
                );
            }
        }
    }

    /// Build a set from the standard list files discovered under
    /// `start_dir`'s ancestors and `home_dir`.
    pub fn load_standard(start_dir: &Path, home_dir: Option<&Path>) -> Self {
        let mut set = MirrorSet::new();
        for path in discover_list_paths(start_dir, home_dir) {
            tracing::debug!(path = %path.display(), "loading mirror list");
            set.load_list_file(&path);
        }
        set
    }

    /// One candidate URL per mirror (prefix + URN), in an order drawn
    /// fresh from `rng`. Randomization spreads load across mirrors when
    /// many clients share a list; nothing about the order persists.
    pub fn candidates_with<R: Rng + ?Sized>(&self, urn: &str, rng: &mut R) -> Vec<String> {
        let mut out: Vec<String> = self
            .prefixes
            .iter()
            .map(|prefix| format!("{prefix}{urn}"))
            .collect();
        out.shuffle(rng);
        out
    }

    /// `candidates_with` using the thread-local RNG.
    pub fn candidates(&self, urn: &str) -> Vec<String> {
        self.candidates_with(urn, &mut rand::rng())
    }
}
