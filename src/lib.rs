//! Deck building engine for the Yu-Gi-Oh! trading card game.
//!
//! Keeps a collection of named decks persisted to disk, enforces format
//! legality (zone capacities, a per-card copy limit, banned card categories)
//! on every edit, scores decks from a static lookup table, and runs a
//! debounced, cancellable card search against the YGOPRODeck catalog.
//!
//! # Quick start
//!
//! ```no_run
//! use ygodeck::{DeckEngine, Zone};
//!
//! let mut engine = DeckEngine::builder().build().unwrap();
//!
//! engine.collection_mut().create("Dragons", false).unwrap();
//!
//! engine.set_query("Blue-Eyes");
//! // ... once the debounce window has passed:
//! engine.run_due_search();
//! let zone = engine.add_search_result(0).unwrap();
//! assert_eq!(zone, Zone::Main);
//!
//! engine.collection_mut().save().unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod catalog;
pub mod classifier;
pub mod collection;
pub mod config;
pub mod error;
pub mod models;
pub mod scoring;
pub mod search;
pub mod store;
pub mod validator;

#[cfg(feature = "async")]
pub use async_client::{AsyncCardCatalog, AsyncSearch, AsyncYgoProDeckCatalog};
pub use catalog::{CardCatalog, YgoProDeckCatalog};
pub use classifier::{Classification, Classifier, Family};
pub use collection::{DeckCollection, EditorState, Snapshot};
pub use config::{BannedCategory, Ruleset};
pub use error::{DeckError, Rejection, Result};
pub use models::{CardId, CardRecord, Deck, Zone};
pub use scoring::ScoringTable;
pub use search::{SearchRequest, SearchSession, SearchState};
pub use store::{DeckStore, FileDeckStore, MemoryDeckStore};
pub use validator::{DeckValidator, Placement};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// DeckEngineBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DeckEngine`].
///
/// Use [`DeckEngine::builder()`] to obtain one.
pub struct DeckEngineBuilder {
    data_dir: Option<PathBuf>,
    ruleset: Ruleset,
    scoring: Option<ScoringTable>,
    scoring_path: Option<PathBuf>,
    catalog_base: String,
    timeout: Duration,
    debounce: Duration,
}

impl Default for DeckEngineBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            ruleset: Ruleset::default(),
            scoring: None,
            scoring_path: None,
            catalog_base: config::CATALOG_BASE.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            debounce: config::DEBOUNCE,
        }
    }
}

impl DeckEngineBuilder {
    /// Set the directory holding the deck snapshot.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/ygodeck` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the banned categories. Defaults to Link and Pendulum.
    pub fn ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Use an already loaded scoring table.
    pub fn scoring_table(mut self, table: ScoringTable) -> Self {
        self.scoring = Some(table);
        self
    }

    /// Load the scoring table from a JSON (or `.json.gz`) file at build time.
    pub fn scoring_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.scoring_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Point catalog lookups at another base URL. Defaults to the public YGOPRODeck API.
    pub fn catalog_base(mut self, url: impl Into<String>) -> Self {
        self.catalog_base = url.into();
        self
    }

    /// Set the HTTP request timeout for catalog lookups.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long search waits after the last keystroke. Defaults to 300 ms.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Build the engine on the file-backed store in the data directory.
    pub fn build(self) -> Result<DeckEngine<FileDeckStore>> {
        let store = FileDeckStore::new(self.data_dir.clone())?;
        self.build_with_store(store)
    }

    /// Build the engine on a caller-supplied store.
    pub fn build_with_store<S: DeckStore>(self, store: S) -> Result<DeckEngine<S>> {
        let scoring = match (self.scoring, self.scoring_path) {
            (Some(table), _) => table,
            (None, Some(path)) => ScoringTable::from_path(path)?,
            (None, None) => ScoringTable::new(),
        };
        let classifier = Classifier::new(self.ruleset);
        let collection =
            DeckCollection::open(store, DeckValidator::with_classifier(classifier.clone()))?;
        let catalog = YgoProDeckCatalog::new(self.catalog_base, self.timeout)?;
        let search = SearchSession::new(classifier).with_debounce(self.debounce);
        Ok(DeckEngine {
            collection,
            scoring,
            catalog,
            search,
        })
    }
}

// ---------------------------------------------------------------------------
// DeckEngine
// ---------------------------------------------------------------------------

/// The single controller owning the deck collection, scoring table, catalog
/// client and search session.
///
/// Created via [`DeckEngine::builder()`].
pub struct DeckEngine<S: DeckStore = FileDeckStore> {
    collection: DeckCollection<S>,
    scoring: ScoringTable,
    catalog: YgoProDeckCatalog,
    search: SearchSession,
}

impl DeckEngine<FileDeckStore> {
    pub fn builder() -> DeckEngineBuilder {
        DeckEngineBuilder::default()
    }
}

impl<S: DeckStore> DeckEngine<S> {
    pub fn collection(&self) -> &DeckCollection<S> {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut DeckCollection<S> {
        &mut self.collection
    }

    pub fn scoring(&self) -> &ScoringTable {
        &self.scoring
    }

    pub fn catalog(&self) -> &YgoProDeckCatalog {
        &self.catalog
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchSession {
        &mut self.search
    }

    /// Score of the deck currently being edited.
    pub fn score(&self) -> i64 {
        self.collection.score(&self.scoring)
    }

    /// Record a new search query as of now.
    pub fn set_query(&mut self, query: &str) -> u64 {
        self.search.set_query(query, Instant::now())
    }

    /// Issue the search request if its debounce window has elapsed.
    ///
    /// Blocks on the catalog. Returns `true` if a request was made.
    pub fn run_due_search(&mut self) -> bool {
        self.search.run_due(Instant::now(), &self.catalog)
    }

    /// Add the search result at `index` to main or extra.
    pub fn add_search_result(&mut self, index: usize) -> Result<Zone> {
        let card = self.search_result(index)?;
        Ok(self.collection.add_card(card)?)
    }

    /// Add the search result at `index` to the side deck.
    pub fn add_search_result_to_side(&mut self, index: usize) -> Result<()> {
        let card = self.search_result(index)?;
        Ok(self.collection.add_to_side(card)?)
    }

    fn search_result(&self, index: usize) -> Result<CardRecord> {
        self.search.results().get(index).cloned().ok_or_else(|| {
            DeckError::InvalidArgument(format!("no search result at index {index}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<S: DeckStore> fmt::Display for DeckEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeckEngine(decks={}, current={}, catalog={})",
            self.collection.len(),
            self.collection.current_name().unwrap_or("<none>"),
            self.catalog.base_url()
        )
    }
}
