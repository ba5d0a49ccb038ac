use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::classifier::{family_of, Family};
use crate::config::{EXTRA_CAPACITY, MAIN_CAPACITY, SIDE_CAPACITY};
use crate::error::{DeckError, Rejection, Result};
use crate::models::card::valid_records;
use crate::models::{CardId, CardRecord};
use crate::scoring::ScoringTable;
use crate::validator::{DeckValidator, Placement};

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Main,
    Extra,
    Side,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Main, Zone::Extra, Zone::Side];

    pub fn capacity(self) -> usize {
        match self {
            Zone::Main => MAIN_CAPACITY,
            Zone::Extra => EXTRA_CAPACITY,
            Zone::Side => SIDE_CAPACITY,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Zone::Main => "main",
            Zone::Extra => "extra",
            Zone::Side => "side",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// FamilyCounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyCounts {
    pub monster: usize,
    pub spell: usize,
    pub trap: usize,
    pub other: usize,
}

// ---------------------------------------------------------------------------
// Deck
// ---------------------------------------------------------------------------

/// Three ordered zones of cards.
///
/// Insertion order is display order. All mutations go through the validated
/// operations below, so capacity, copy-limit and banned-category invariants
/// hold after every call; a rejected call leaves the deck untouched.
///
/// Deserialization is lenient per zone: a missing or `null` zone is empty and
/// records that fail validation are skipped. Stored decks should still be run
/// through [`Deck::retain_legal`] before use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, deserialize_with = "lenient_zone")]
    main: Vec<CardRecord>,
    #[serde(default, deserialize_with = "lenient_zone")]
    extra: Vec<CardRecord>,
    #[serde(default, deserialize_with = "lenient_zone")]
    side: Vec<CardRecord>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self, zone: Zone) -> &[CardRecord] {
        match zone {
            Zone::Main => &self.main,
            Zone::Extra => &self.extra,
            Zone::Side => &self.side,
        }
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<CardRecord> {
        match zone {
            Zone::Main => &mut self.main,
            Zone::Extra => &mut self.extra,
            Zone::Side => &mut self.side,
        }
    }

    pub fn len(&self, zone: Zone) -> usize {
        self.cards(zone).len()
    }

    pub fn total_len(&self) -> usize {
        self.main.len() + self.extra.len() + self.side.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Copies of `id` across all three zones.
    pub fn copies(&self, id: CardId) -> usize {
        self.iter().filter(|c| c.id == id).count()
    }

    /// All cards in main, extra, side order.
    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.main.iter().chain(&self.extra).chain(&self.side)
    }

    // -- Mutation ------------------------------------------------------------

    /// Add a card to main or extra, whichever its type routes it to.
    ///
    /// Returns the zone the card was appended to.
    pub fn add_card(
        &mut self,
        card: CardRecord,
        validator: &DeckValidator,
    ) -> std::result::Result<Zone, Rejection> {
        self.place(card, Placement::Routed, validator)
    }

    pub fn add_to_side(
        &mut self,
        card: CardRecord,
        validator: &DeckValidator,
    ) -> std::result::Result<(), Rejection> {
        self.place(card, Placement::Side, validator).map(|_| ())
    }

    fn place(
        &mut self,
        card: CardRecord,
        placement: Placement,
        validator: &DeckValidator,
    ) -> std::result::Result<Zone, Rejection> {
        match validator.check(self, placement, &card) {
            Ok(zone) => {
                self.zone_mut(zone).push(card);
                Ok(zone)
            }
            Err(rejection) => {
                tracing::debug!(card = %card.name, %rejection, "card rejected");
                Err(rejection)
            }
        }
    }

    /// Remove the card at `index`, keeping the order of the rest.
    pub fn remove_at(&mut self, zone: Zone, index: usize) -> Result<CardRecord> {
        let cards = self.zone_mut(zone);
        if index >= cards.len() {
            return Err(DeckError::IndexOutOfRange {
                zone,
                index,
                len: cards.len(),
            });
        }
        Ok(cards.remove(index))
    }

    /// Move the card at `from[index]` to the end of `to`.
    ///
    /// Moving into main or extra must agree with the card's eligibility. On
    /// rejection the card stays at its original position.
    pub fn move_card(
        &mut self,
        from: Zone,
        index: usize,
        to: Zone,
        validator: &DeckValidator,
    ) -> Result<Zone> {
        let card = self.remove_at(from, index)?;
        match validator.check(self, Placement::Exact(to), &card) {
            Ok(zone) => {
                self.zone_mut(zone).push(card);
                Ok(zone)
            }
            Err(rejection) => {
                self.zone_mut(from).insert(index, card);
                Err(rejection.into())
            }
        }
    }

    /// Stable sort of each zone by family, then type string, then name.
    ///
    /// Sorting an already sorted deck leaves it unchanged.
    pub fn sort(&mut self) {
        for zone in Zone::ALL {
            self.zone_mut(zone).sort_by(compare_cards);
        }
    }

    pub fn clear(&mut self) {
        self.main.clear();
        self.extra.clear();
        self.side.clear();
    }

    /// Rebuild the deck by replaying every card through `validator` into the
    /// zone it was stored in, dropping whatever is rejected.
    ///
    /// Main is replayed first, then extra, then side, so earlier zones win
    /// the copy limit. Returns how many cards were dropped.
    pub fn retain_legal(&mut self, validator: &DeckValidator) -> usize {
        let Deck { main, extra, side } = std::mem::take(self);
        let mut dropped = 0;
        for (zone, cards) in [(Zone::Main, main), (Zone::Extra, extra), (Zone::Side, side)] {
            for card in cards {
                match validator.check(self, Placement::Exact(zone), &card) {
                    Ok(target) => self.zone_mut(target).push(card),
                    Err(rejection) => {
                        tracing::warn!(card = %card.name, %zone, %rejection, "dropping stored card");
                        dropped += 1;
                    }
                }
            }
        }
        dropped
    }

    // -- Summaries -----------------------------------------------------------

    pub fn score(&self, table: &ScoringTable) -> i64 {
        table.deck_score(self)
    }

    pub fn family_counts(&self, zone: Zone) -> FamilyCounts {
        let mut counts = FamilyCounts::default();
        for card in self.cards(zone) {
            match family_of(&card.type_field) {
                Family::Monster => counts.monster += 1,
                Family::Spell => counts.spell += 1,
                Family::Trap => counts.trap += 1,
                Family::Other => counts.other += 1,
            }
        }
        counts
    }
}

fn compare_cards(a: &CardRecord, b: &CardRecord) -> Ordering {
    family_of(&a.type_field)
        .cmp(&family_of(&b.type_field))
        .then_with(|| a.type_field.cmp(&b.type_field))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Name order that ignores case and accents first, then case, then the raw
/// strings.
fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Canonical decomposition with combining marks stripped, lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn lenient_zone<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<CardRecord>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let items: &[Value] = match &raw {
        Value::Array(arr) => arr.as_slice(),
        Value::Null => &[],
        other => {
            tracing::warn!(found = %other, "stored zone is not a list, treating as empty");
            &[]
        }
    };
    Ok(valid_records(items))
}
