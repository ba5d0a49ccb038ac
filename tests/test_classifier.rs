//! Card type classification tests.

use ygodeck::classifier::{family_of, is_extra_deck_type};
use ygodeck::{BannedCategory, Classifier, Family, Ruleset};

// ---------------------------------------------------------------------------
// family
// ---------------------------------------------------------------------------

#[test]
fn family_matches_case_insensitively() {
    assert_eq!(family_of("Effect Monster"), Family::Monster);
    assert_eq!(family_of("spell card"), Family::Spell);
    assert_eq!(family_of("TRAP CARD"), Family::Trap);
    assert_eq!(family_of("Skill Card"), Family::Other);
}

#[test]
fn family_priority_prefers_monster_over_spell_and_trap() {
    // Contrived types containing several family words resolve by priority.
    assert_eq!(family_of("Spell Monster"), Family::Monster);
    assert_eq!(family_of("Trap Spell"), Family::Spell);
}

#[test]
fn empty_type_is_other_not_eligible_not_banned() {
    let c = Classifier::default().classify("");
    assert_eq!(c.family, Family::Other);
    assert!(!c.is_extra_deck_eligible);
    assert!(!c.is_banned);
}

// ---------------------------------------------------------------------------
// extra-deck eligibility
// ---------------------------------------------------------------------------

#[test]
fn extra_deck_families_are_eligible() {
    for t in ["Fusion Monster", "Synchro Tuner Monster", "XYZ Monster", "Link Monster"] {
        assert!(is_extra_deck_type(t), "{t} should be extra-deck eligible");
    }
}

#[test]
fn main_deck_types_are_not_eligible() {
    for t in ["Effect Monster", "Ritual Monster", "Spell Card", "Trap Card"] {
        assert!(!is_extra_deck_type(t), "{t} should not be extra-deck eligible");
    }
}

// ---------------------------------------------------------------------------
// banned categories
// ---------------------------------------------------------------------------

#[test]
fn default_ruleset_bans_link_and_pendulum() {
    let classifier = Classifier::default();
    assert!(classifier.is_banned("Link Monster"));
    assert!(classifier.is_banned("Pendulum Effect Monster"));
    assert!(!classifier.is_banned("Skill Card"));
    assert!(!classifier.is_banned("XYZ Monster"));
}

#[test]
fn skill_ruleset_also_bans_skill_cards() {
    let classifier = Classifier::new(Ruleset::with_skill());
    assert!(classifier.is_banned("Skill Card"));
    assert_eq!(
        classifier.banned_category("Skill Card"),
        Some(BannedCategory::Skill)
    );
}

#[test]
fn unrestricted_ruleset_bans_nothing() {
    let classifier = Classifier::new(Ruleset::unrestricted());
    let c = classifier.classify("Link Monster");
    assert!(!c.is_banned);
    assert!(c.is_extra_deck_eligible);
}

#[test]
fn banned_category_reports_matching_marker() {
    let classifier = Classifier::default();
    assert_eq!(
        classifier.banned_category("Synchro Pendulum Effect Monster"),
        Some(BannedCategory::Pendulum)
    );
    assert_eq!(classifier.banned_category("Normal Monster"), None);
}
