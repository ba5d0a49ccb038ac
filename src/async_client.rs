//! Tokio driver for [`SearchSession`].
//!
//! Each query change spawns one task that sleeps out the debounce window and
//! then awaits the catalog. A newer query aborts the previous task, which
//! drops its HTTP future and so cancels the request at the transport level.
//! Responses still pass through the session's generation check, so an answer
//! that races the abort is discarded.
//!
//! # Example
//!
//! ```no_run
//! use ygodeck::async_client::{AsyncSearch, AsyncYgoProDeckCatalog};
//! use ygodeck::{Classifier, SearchSession};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let catalog = AsyncYgoProDeckCatalog::default();
//!     let mut search = AsyncSearch::new(catalog, SearchSession::new(Classifier::default()));
//!
//!     search.set_query("Dark").unwrap();
//!     search.set_query("Dark Magician").unwrap();
//! }
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::catalog::{check_status, parse_catalog_response};
use crate::config;
use crate::error::{DeckError, Result};
use crate::models::CardRecord;
use crate::search::{SearchRequest, SearchSession, SearchState};

// ---------------------------------------------------------------------------
// AsyncCardCatalog
// ---------------------------------------------------------------------------

/// Async source of card records. Dropping the returned future cancels the
/// lookup.
pub trait AsyncCardCatalog: Send + Sync + 'static {
    fn lookup_by_name_fragment(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Vec<CardRecord>>> + Send;
}

/// Async client for the YGOPRODeck card database.
pub struct AsyncYgoProDeckCatalog {
    base_url: String,
    client: Client,
}

impl AsyncYgoProDeckCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Default for AsyncYgoProDeckCatalog {
    fn default() -> Self {
        Self {
            base_url: config::CATALOG_BASE.to_string(),
            client: Client::new(),
        }
    }
}

impl AsyncCardCatalog for AsyncYgoProDeckCatalog {
    fn lookup_by_name_fragment(
        &self,
        fragment: &str,
    ) -> impl Future<Output = Result<Vec<CardRecord>>> + Send {
        let request = self
            .client
            .get(format!("{}/cardinfo.php", self.base_url))
            .query(&[("fname", fragment)]);
        async move {
            let resp = request.send().await?;
            if !check_status(resp.status())? {
                return Ok(Vec::new());
            }
            let body: Value = resp.json().await?;
            Ok(parse_catalog_response(&body))
        }
    }
}

// ---------------------------------------------------------------------------
// AsyncSearch
// ---------------------------------------------------------------------------

/// Runs a [`SearchSession`] on the current Tokio runtime.
///
/// The session sits behind a [`Mutex`] shared with the background task; the
/// lock is never held across an await point.
pub struct AsyncSearch<C: AsyncCardCatalog> {
    catalog: Arc<C>,
    session: Arc<Mutex<SearchSession>>,
    task: Option<JoinHandle<()>>,
}

impl<C: AsyncCardCatalog> AsyncSearch<C> {
    pub fn new(catalog: C, session: SearchSession) -> Self {
        Self {
            catalog: Arc::new(catalog),
            session: Arc::new(Mutex::new(session)),
            task: None,
        }
    }

    /// Record a new query, aborting whatever the previous one had in motion.
    ///
    /// Must be called from within a Tokio runtime. Returns the new generation.
    pub fn set_query(&mut self, query: &str) -> Result<u64> {
        let handle = Handle::try_current()
            .map_err(|e| DeckError::InvalidArgument(format!("no Tokio runtime: {e}")))?;
        self.abort_task();

        let now = tokio::time::Instant::now().into_std();
        let (generation, debounce) = {
            let mut session = lock(&self.session)?;
            let generation = session.set_query(query, now);
            if !session.is_loading() {
                return Ok(generation);
            }
            (generation, session.debounce())
        };

        let session = Arc::clone(&self.session);
        let catalog = Arc::clone(&self.catalog);
        self.task = Some(handle.spawn(async move {
            tokio::time::sleep(debounce).await;

            let Some(request) = poll_due(&session) else {
                return;
            };
            if request.generation != generation {
                return;
            }

            let outcome = catalog.lookup_by_name_fragment(&request.query).await;
            if let Ok(mut s) = session.lock() {
                s.complete(request.generation, outcome);
            }
        }));
        Ok(generation)
    }

    /// Abort any pending or in-flight search and return to idle.
    pub fn cancel(&mut self) -> Result<()> {
        self.abort_task();
        lock(&self.session)?.cancel();
        Ok(())
    }

    pub fn state(&self) -> Result<SearchState> {
        Ok(lock(&self.session)?.state().clone())
    }

    pub fn results(&self) -> Result<Vec<CardRecord>> {
        Ok(lock(&self.session)?.results().to_vec())
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<C: AsyncCardCatalog> Drop for AsyncSearch<C> {
    fn drop(&mut self) {
        self.abort_task();
    }
}

fn poll_due(session: &Mutex<SearchSession>) -> Option<SearchRequest> {
    let mut session = session.lock().ok()?;
    session.poll(tokio::time::Instant::now().into_std())
}

fn lock(session: &Mutex<SearchSession>) -> Result<MutexGuard<'_, SearchSession>> {
    session
        .lock()
        .map_err(|_| DeckError::InvalidArgument("search session lock poisoned".into()))
}
