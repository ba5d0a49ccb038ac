//! Legality decisions for placing a card into a deck.
//!
//! Checks run in a fixed order: banned category, copy limit, zone routing,
//! zone capacity. The first failing check decides the rejection.

use crate::classifier::Classifier;
use crate::config::{Ruleset, COPY_LIMIT};
use crate::error::Rejection;
use crate::models::{CardRecord, Deck, Zone};

/// Where the caller wants a card to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Main or extra, chosen by the card's extra-deck eligibility.
    Routed,
    /// The side deck, which takes any legal card.
    Side,
    /// A specific zone; main and extra must agree with eligibility.
    Exact(Zone),
}

#[derive(Debug, Clone, Default)]
pub struct DeckValidator {
    classifier: Classifier,
}

impl DeckValidator {
    pub fn new(ruleset: Ruleset) -> Self {
        Self {
            classifier: Classifier::new(ruleset),
        }
    }

    pub fn with_classifier(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The zone a non-side placement of `card` must use.
    pub fn routed_zone(&self, card: &CardRecord) -> Zone {
        if self.classifier.classify(&card.type_field).is_extra_deck_eligible {
            Zone::Extra
        } else {
            Zone::Main
        }
    }

    /// Decide whether `card` may be placed in `deck`, returning the zone it
    /// would be appended to.
    pub fn check(
        &self,
        deck: &Deck,
        placement: Placement,
        card: &CardRecord,
    ) -> std::result::Result<Zone, Rejection> {
        if self.classifier.is_banned(&card.type_field) {
            return Err(Rejection::Banned);
        }
        if deck.copies(card.id) >= COPY_LIMIT {
            return Err(Rejection::CopyLimit);
        }

        let zone = match placement {
            Placement::Routed => self.routed_zone(card),
            Placement::Side | Placement::Exact(Zone::Side) => Zone::Side,
            Placement::Exact(requested) => {
                let required = self.routed_zone(card);
                if requested != required {
                    return Err(Rejection::WrongZone {
                        requested,
                        required,
                    });
                }
                requested
            }
        };

        if deck.len(zone) >= zone.capacity() {
            return Err(Rejection::ZoneFull(zone));
        }
        Ok(zone)
    }
}
