//! Shared fixtures for the integration tests.
//!
//! Card constructors for each family, a ready-made collection on an in-memory
//! store, and a catalog double that records every lookup it receives.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use ygodeck::{
    CardCatalog, CardRecord, DeckCollection, DeckError, DeckValidator, MemoryDeckStore, Result,
};

pub fn monster(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Effect Monster")
}

pub fn normal_monster(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Normal Monster")
}

pub fn spell(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Spell Card")
}

pub fn trap(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Trap Card")
}

pub fn xyz(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "XYZ Monster")
}

pub fn fusion(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Fusion Monster")
}

pub fn link(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Link Monster")
}

pub fn pendulum(id: u64, name: &str) -> CardRecord {
    CardRecord::new(id, name, "Pendulum Effect Monster")
}

/// Distinct effect monsters with ids starting at `first_id`.
pub fn monsters(first_id: u64, count: usize) -> Vec<CardRecord> {
    (0..count as u64)
        .map(|i| monster(first_id + i, &format!("Monster {}", first_id + i)))
        .collect()
}

/// Distinct Xyz monsters with ids starting at `first_id`.
pub fn xyzs(first_id: u64, count: usize) -> Vec<CardRecord> {
    (0..count as u64)
        .map(|i| xyz(first_id + i, &format!("Xyz {}", first_id + i)))
        .collect()
}

pub fn validator() -> DeckValidator {
    DeckValidator::default()
}

/// An empty collection on an in-memory store.
pub fn empty_collection() -> DeckCollection<MemoryDeckStore> {
    DeckCollection::open(MemoryDeckStore::new(), validator()).unwrap()
}

/// A collection opened from the given snapshot JSON.
pub fn collection_from(json: serde_json::Value) -> DeckCollection<MemoryDeckStore> {
    let store = MemoryDeckStore::with_blob(json.to_string());
    DeckCollection::open(store, validator()).unwrap()
}

/// Catalog double answering from a fixed table and recording every query.
#[derive(Default)]
pub struct FakeCatalog {
    responses: HashMap<String, Vec<CardRecord>>,
    failing: bool,
    pub calls: RefCell<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, cards: Vec<CardRecord>) -> Self {
        self.responses.insert(query.to_string(), cards);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CardCatalog for FakeCatalog {
    fn lookup_by_name_fragment(&self, fragment: &str) -> Result<Vec<CardRecord>> {
        self.calls.borrow_mut().push(fragment.to_string());
        if self.failing {
            return Err(DeckError::Catalog("connection reset".into()));
        }
        Ok(self.responses.get(fragment).cloned().unwrap_or_default())
    }
}
