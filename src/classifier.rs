//! Card type classification.
//!
//! Everything is derived from the free-text `type` string by case-insensitive
//! substring matching, so unknown or empty types classify as `Other`, not
//! extra-deck eligible, not banned.

use std::fmt;

use crate::config::{BannedCategory, Ruleset, EXTRA_DECK_MARKERS};

/// Broad card family, ordered by sort priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Monster,
    Spell,
    Trap,
    Other,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Family::Monster => "Monster",
            Family::Spell => "Spell",
            Family::Trap => "Trap",
            Family::Other => "Other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub family: Family,
    pub is_extra_deck_eligible: bool,
    pub is_banned: bool,
}

/// Family of a type string, checked in Monster > Spell > Trap priority.
pub fn family_of(type_field: &str) -> Family {
    let lower = type_field.to_lowercase();
    if lower.contains("monster") {
        Family::Monster
    } else if lower.contains("spell") {
        Family::Spell
    } else if lower.contains("trap") {
        Family::Trap
    } else {
        Family::Other
    }
}

pub fn is_extra_deck_type(type_field: &str) -> bool {
    let lower = type_field.to_lowercase();
    EXTRA_DECK_MARKERS.iter().any(|m| lower.contains(m))
}

/// Classifies type strings against a configured set of banned categories.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    ruleset: Ruleset,
}

impl Classifier {
    pub fn new(ruleset: Ruleset) -> Self {
        Self { ruleset }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn classify(&self, type_field: &str) -> Classification {
        Classification {
            family: family_of(type_field),
            is_extra_deck_eligible: is_extra_deck_type(type_field),
            is_banned: self.banned_category(type_field).is_some(),
        }
    }

    pub fn is_banned(&self, type_field: &str) -> bool {
        self.banned_category(type_field).is_some()
    }

    /// The first configured category whose marker occurs in the type string.
    pub fn banned_category(&self, type_field: &str) -> Option<BannedCategory> {
        let lower = type_field.to_lowercase();
        self.ruleset
            .banned
            .iter()
            .copied()
            .find(|c| lower.contains(c.marker()))
    }
}
