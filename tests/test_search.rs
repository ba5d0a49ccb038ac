//! Search session state machine tests, driven by an explicit clock.

mod common;

use std::time::{Duration, Instant};

use common::*;
use ygodeck::{Classifier, DeckError, SearchSession, SearchState};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn session() -> SearchSession {
    SearchSession::new(Classifier::default())
}

// ---------------------------------------------------------------------------
// Idle threshold
// ---------------------------------------------------------------------------

#[test]
fn short_queries_stay_idle() {
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("D", t0);
    assert_eq!(s.state(), &SearchState::Idle);
    s.set_query("  D  ", t0);
    assert_eq!(s.state(), &SearchState::Idle);
    assert!(s.poll(t0 + ms(1000)).is_none());
    assert!(s.results().is_empty());
}

#[test]
fn shortening_query_clears_results() {
    let catalog = FakeCatalog::new().with("Dark", vec![monster(1, "Dark Magician")]);
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    assert!(s.run_due(t0 + ms(300), &catalog));
    assert_eq!(s.results().len(), 1);

    s.set_query("D", t0 + ms(400));
    assert_eq!(s.state(), &SearchState::Idle);
    assert!(s.results().is_empty());
}

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

#[test]
fn request_waits_for_debounce_window() {
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    assert!(s.is_loading());
    assert_eq!(s.next_deadline(), Some(t0 + ms(300)));
    assert!(s.poll(t0 + ms(299)).is_none());

    let request = s.poll(t0 + ms(300)).unwrap();
    assert_eq!(request.query, "Dark");
    assert_eq!(request.generation, s.generation());
    assert_eq!(
        s.state(),
        &SearchState::InFlight {
            query: "Dark".into()
        }
    );
    // Already in flight; nothing more to dispatch.
    assert!(s.poll(t0 + ms(900)).is_none());
}

#[test]
fn fast_typing_issues_one_request_for_last_query() {
    let catalog = FakeCatalog::new().with("Dark Magician", vec![monster(46986414, "Dark Magician")]);
    let mut s = session();
    let t0 = Instant::now();

    s.set_query("Dark", t0);
    assert!(!s.run_due(t0 + ms(100), &catalog));
    s.set_query("Dark Magician", t0 + ms(100));
    assert!(!s.run_due(t0 + ms(350), &catalog));
    assert!(s.run_due(t0 + ms(400), &catalog));
    assert!(!s.run_due(t0 + ms(2000), &catalog));

    assert_eq!(*catalog.calls.borrow(), vec!["Dark Magician".to_string()]);
    assert_eq!(s.results()[0].name, "Dark Magician");
}

// ---------------------------------------------------------------------------
// Generations and cancellation
// ---------------------------------------------------------------------------

#[test]
fn superseded_response_is_discarded() {
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    let stale = s.poll(t0 + ms(300)).unwrap();

    s.set_query("Blue", t0 + ms(350));
    assert!(!s.complete(stale.generation, Ok(vec![monster(1, "Dark Magician")])));
    assert!(matches!(s.state(), SearchState::Pending { query, .. } if query == "Blue"));

    let fresh = s.poll(t0 + ms(650)).unwrap();
    assert!(s.complete(fresh.generation, Ok(vec![monster(2, "Blue-Eyes")])));
    assert_eq!(s.results()[0].name, "Blue-Eyes");
}

#[test]
fn stale_error_is_discarded_too() {
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    let stale = s.poll(t0 + ms(300)).unwrap();
    s.set_query("Blue", t0 + ms(310));
    let fresh = s.poll(t0 + ms(610)).unwrap();

    assert!(!s.complete(stale.generation, Err(DeckError::Catalog("timeout".into()))));
    assert!(matches!(s.state(), SearchState::InFlight { .. }));
    assert!(s.complete(fresh.generation, Ok(vec![])));
    assert!(matches!(s.state(), SearchState::Resolved { results, .. } if results.is_empty()));
}

#[test]
fn cancel_returns_to_idle_and_drops_in_flight_answer() {
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    let request = s.poll(t0 + ms(300)).unwrap();
    s.cancel();
    assert_eq!(s.state(), &SearchState::Idle);
    assert!(!s.complete(request.generation, Ok(vec![monster(1, "Dark Magician")])));
    assert!(s.results().is_empty());
}

#[test]
fn generation_increases_on_every_change() {
    let mut s = session();
    let t0 = Instant::now();
    let g1 = s.set_query("Dark", t0);
    let g2 = s.set_query("Dark M", t0);
    s.cancel();
    let g3 = s.set_query("D", t0);
    assert!(g1 < g2 && g2 < g3);
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn banned_results_are_filtered() {
    let catalog = FakeCatalog::new().with(
        "Talker",
        vec![
            link(1, "Decode Talker"),
            monster(2, "Talker Kid"),
            pendulum(3, "Talker Pendulum"),
        ],
    );
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Talker", t0);
    s.run_due(t0 + ms(300), &catalog);
    let names: Vec<&str> = s.results().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Talker Kid"]);
}

#[test]
fn catalog_failure_sets_failed_state() {
    let catalog = FakeCatalog::failing();
    let mut s = session();
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    assert!(s.run_due(t0 + ms(300), &catalog));
    match s.state() {
        SearchState::Failed { query, error } => {
            assert_eq!(query, "Dark");
            assert!(error.contains("connection reset"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(s.results().is_empty());

    // A fresh query retries; nothing retries on its own.
    assert!(!s.run_due(t0 + ms(5000), &catalog));
    assert_eq!(catalog.call_count(), 1);
}

#[test]
fn custom_debounce_is_honoured() {
    let mut s = session().with_debounce(ms(50));
    let t0 = Instant::now();
    s.set_query("Dark", t0);
    assert!(s.poll(t0 + ms(50)).is_some());
}
