//! Named deck registry with a "current deck" cursor and live editing buffers.
//!
//! The persisted snapshot is a JSON object keyed by deck name:
//!
//! ```json
//! { "Dragons": { "main": [...], "extra": [...], "side": [...] } }
//! ```
//!
//! Every structural mutation (create, save, save-as, rename, delete) writes
//! the full snapshot through the [`DeckStore`] before it takes effect. If the
//! write fails the in-memory state is left exactly as it was.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DeckError, Rejection, Result};
use crate::models::{CardRecord, Deck, Zone};
use crate::scoring::ScoringTable;
use crate::store::DeckStore;
use crate::validator::DeckValidator;

/// Persisted form of the whole collection, ordered by deck name.
pub type Snapshot = BTreeMap<String, Deck>;

/// The per-session editing state: which deck is selected and its working copy.
///
/// Edits land in `live` and only reach the registry on `save`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    pub current_name: Option<String>,
    pub live: Deck,
}

pub struct DeckCollection<S: DeckStore> {
    decks: Snapshot,
    editor: EditorState,
    validator: DeckValidator,
    store: S,
}

impl<S: DeckStore> DeckCollection<S> {
    /// Open a collection from whatever `store` currently holds.
    ///
    /// A missing snapshot yields an empty collection; so does a corrupt one,
    /// which is logged and discarded. Only store read failures are errors.
    pub fn open(store: S, validator: DeckValidator) -> Result<Self> {
        let blob = store.load()?;
        let mut collection = Self {
            decks: Snapshot::new(),
            editor: EditorState::default(),
            validator,
            store,
        };
        if let Some(blob) = blob {
            collection.load_blob(&blob);
        }
        Ok(collection)
    }

    /// Replace all state from a serialized snapshot.
    ///
    /// Input that is not a JSON object of decks is treated as an empty
    /// collection. Inside it, a deck entry that is not an object is skipped
    /// and bad card records are dropped without touching their neighbours.
    pub fn load_blob(&mut self, blob: &str) {
        let raw = match serde_json::from_str::<BTreeMap<String, Value>>(blob) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "stored deck snapshot is corrupt, starting empty");
                self.load(Snapshot::new());
                return;
            }
        };
        let mut snapshot = Snapshot::new();
        for (name, value) in raw {
            match Deck::deserialize(&value) {
                Ok(deck) => {
                    snapshot.insert(name, deck);
                }
                Err(e) => tracing::warn!(deck = %name, error = %e, "skipping unreadable stored deck"),
            }
        }
        self.load(snapshot);
    }

    /// Replace all state from `snapshot` and select the first deck by name.
    ///
    /// Each deck is rebuilt through the validator, so banned cards, copies
    /// past the limit, cards past zone capacity and cards stored in the wrong
    /// zone are dropped.
    pub fn load(&mut self, mut snapshot: Snapshot) {
        for (name, deck) in snapshot.iter_mut() {
            let dropped = deck.retain_legal(&self.validator);
            if dropped > 0 {
                tracing::warn!(deck = %name, dropped, "removed illegal cards from stored deck");
            }
        }
        self.decks = snapshot;
        match self.decks.keys().next().cloned() {
            Some(first) => self.open_live(first),
            None => self.editor = EditorState::default(),
        }
        tracing::info!(decks = self.decks.len(), "loaded deck collection");
    }

    // -- Accessors -------------------------------------------------------------

    pub fn current_name(&self) -> Option<&str> {
        self.editor.current_name.as_deref()
    }

    /// The working copy of the current deck.
    pub fn live(&self) -> &Deck {
        &self.editor.live
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Deck> {
        self.decks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.decks
    }

    pub fn validator(&self) -> &DeckValidator {
        &self.validator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Whether the live buffers differ from the stored copy of the current deck.
    ///
    /// Always `false` when nothing is selected.
    pub fn has_unsaved_changes(&self) -> bool {
        match self.current_name() {
            Some(name) => self.decks.get(name) != Some(&self.editor.live),
            None => false,
        }
    }

    pub fn score(&self, table: &ScoringTable) -> i64 {
        self.editor.live.score(table)
    }

    // -- Deck lifecycle --------------------------------------------------------

    /// Make `name` current, replacing the live buffers with its stored zones.
    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.decks.contains_key(name) {
            return Err(DeckError::NotFound(name.to_string()));
        }
        self.open_live(name.to_string());
        Ok(())
    }

    /// Create a new deck and make it current.
    ///
    /// With `seed_from_current` the new deck starts as a copy of the live
    /// buffers; otherwise it starts empty.
    pub fn create(&mut self, name: &str, seed_from_current: bool) -> Result<()> {
        self.check_new_name(name)?;
        let deck = if seed_from_current {
            self.editor.live.clone()
        } else {
            Deck::new()
        };

        let mut next = self.decks.clone();
        next.insert(name.to_string(), deck);
        self.commit(next)?;

        self.open_live(name.to_string());
        tracing::info!(deck = %name, seeded = seed_from_current, "created deck");
        Ok(())
    }

    /// Write the live buffers into the current deck.
    pub fn save(&mut self) -> Result<()> {
        let current = self.require_current()?.to_string();
        let mut next = self.decks.clone();
        next.insert(current.clone(), self.editor.live.clone());
        self.commit(next)?;
        tracing::info!(deck = %current, "saved deck");
        Ok(())
    }

    /// Store the live buffers under `new_name` and switch to it.
    ///
    /// The previously current deck keeps its last saved contents.
    pub fn save_as(&mut self, new_name: &str) -> Result<()> {
        self.require_current()?;
        self.check_new_name(new_name)?;
        let mut next = self.decks.clone();
        next.insert(new_name.to_string(), self.editor.live.clone());
        self.commit(next)?;
        self.editor.current_name = Some(new_name.to_string());
        tracing::info!(deck = %new_name, "saved deck under new name");
        Ok(())
    }

    /// Rename the current deck. Renaming to the same name is a no-op.
    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        let current = self.require_current()?.to_string();
        if new_name == current {
            return Ok(());
        }
        self.check_new_name(new_name)?;

        let mut next = self.decks.clone();
        let deck = next.remove(&current).unwrap_or_default();
        next.insert(new_name.to_string(), deck);
        self.commit(next)?;

        self.editor.current_name = Some(new_name.to_string());
        tracing::info!(from = %current, to = %new_name, "renamed deck");
        Ok(())
    }

    /// Delete the current deck and select the next one by name, if any.
    pub fn delete(&mut self) -> Result<()> {
        let current = self.require_current()?.to_string();
        let mut next = self.decks.clone();
        next.remove(&current);
        self.commit(next)?;

        let successor = self
            .decks
            .range::<str, _>((Bound::Excluded(current.as_str()), Bound::Unbounded))
            .next()
            .or_else(|| self.decks.iter().next())
            .map(|(name, _)| name.clone());
        match successor {
            Some(name) => self.open_live(name),
            None => self.editor = EditorState::default(),
        }
        tracing::info!(deck = %current, "deleted deck");
        Ok(())
    }

    // -- Live editing ----------------------------------------------------------

    pub fn add_card(&mut self, card: CardRecord) -> std::result::Result<Zone, Rejection> {
        self.editor.live.add_card(card, &self.validator)
    }

    pub fn add_to_side(&mut self, card: CardRecord) -> std::result::Result<(), Rejection> {
        self.editor.live.add_to_side(card, &self.validator)
    }

    pub fn remove_at(&mut self, zone: Zone, index: usize) -> Result<CardRecord> {
        self.editor.live.remove_at(zone, index)
    }

    pub fn move_card(&mut self, from: Zone, index: usize, to: Zone) -> Result<Zone> {
        self.editor.live.move_card(from, index, to, &self.validator)
    }

    pub fn sort(&mut self) {
        self.editor.live.sort();
    }

    /// Empty the live buffers. The caller is expected to have confirmed.
    pub fn clear(&mut self) {
        self.editor.live.clear();
    }

    // -- Internals -------------------------------------------------------------

    fn require_current(&self) -> Result<&str> {
        self.current_name().ok_or(DeckError::NoCurrentDeck)
    }

    fn check_new_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DeckError::BlankName);
        }
        if self.decks.contains_key(name) {
            return Err(DeckError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Persist `next` and, only if that succeeds, adopt it.
    fn commit(&mut self, next: Snapshot) -> Result<()> {
        let blob = serde_json::to_string(&next)?;
        self.store.save(&blob)?;
        self.decks = next;
        Ok(())
    }

    fn open_live(&mut self, name: String) {
        let mut live = self.decks.get(&name).cloned().unwrap_or_default();
        live.retain_legal(&self.validator);
        self.editor = EditorState {
            current_name: Some(name),
            live,
        };
    }
}
