use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const CATALOG_BASE: &str = "https://db.ygoprodeck.com/api/v7";

pub const MAIN_CAPACITY: usize = 60;
pub const EXTRA_CAPACITY: usize = 15;
pub const SIDE_CAPACITY: usize = 15;

/// Maximum copies of one card id across all three zones.
pub const COPY_LIMIT: usize = 3;

/// Delay between the last query change and the catalog request.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this (after trimming) never reach the catalog.
pub const MIN_QUERY_LEN: usize = 2;

pub const STORE_FILE: &str = "decks.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Substrings that mark the card types that accompany an extra-deck monster.
pub const EXTRA_DECK_MARKERS: [&str; 4] = ["fusion", "synchro", "xyz", "link"];

// ---------------------------------------------------------------------------
// Ruleset
// ---------------------------------------------------------------------------

/// A card category excluded from play by the active ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannedCategory {
    Link,
    Pendulum,
    Skill,
}

impl BannedCategory {
    /// Lowercase substring matched against a card's type string.
    pub fn marker(self) -> &'static str {
        match self {
            BannedCategory::Link => "link",
            BannedCategory::Pendulum => "pendulum",
            BannedCategory::Skill => "skill",
        }
    }
}

/// Format legality configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    pub banned: BTreeSet<BannedCategory>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            banned: BTreeSet::from([BannedCategory::Link, BannedCategory::Pendulum]),
        }
    }
}

impl Ruleset {
    /// A ruleset that bans nothing.
    pub fn unrestricted() -> Self {
        Self {
            banned: BTreeSet::new(),
        }
    }

    /// The default ruleset with Skill cards banned as well.
    pub fn with_skill() -> Self {
        Self::default().ban(BannedCategory::Skill)
    }

    pub fn ban(mut self, category: BannedCategory) -> Self {
        self.banned.insert(category);
        self
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("ygodeck")
    } else {
        PathBuf::from(".ygodeck-data")
    }
}
