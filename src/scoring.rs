//! Static per-card score lookup.
//!
//! The table is loaded once (from a JSON object of `name -> integer`, plain or
//! gzip-compressed) and is read-only afterwards. Unknown names score 0.

use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Result;
use crate::models::Deck;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringTable {
    scores: HashMap<String, i64>,
}

impl ScoringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping card names to integer scores.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scores: HashMap<String, i64> = serde_json::from_str(json)?;
        Ok(Self { scores })
    }

    /// Load a scoring file (handles `.gz` transparently).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            let file = fs::File::open(path)?;
            let mut decoder = BufReader::new(GzDecoder::new(BufReader::new(file)));
            let mut contents = String::new();
            decoder.read_to_string(&mut contents)?;
            contents
        } else {
            fs::read_to_string(path)?
        };
        let table = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), entries = table.len(), "loaded scoring table");
        Ok(table)
    }

    pub fn score(&self, name: &str) -> i64 {
        self.scores.get(name).copied().unwrap_or(0)
    }

    /// Sum of card scores across main, extra and side.
    pub fn deck_score(&self, deck: &Deck) -> i64 {
        deck.iter().map(|c| self.score(&c.name)).sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for ScoringTable {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
