//! Card catalog lookups by name fragment.
//!
//! The public catalog answers `GET /cardinfo.php?fname=<fragment>` with
//! `{ "data": [ ... ] }`, or HTTP 400 when nothing matches. Other error
//! statuses surface as [`DeckError::Catalog`](crate::DeckError::Catalog).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config;
use crate::error::{DeckError, Result};
use crate::models::card::valid_records;
use crate::models::CardRecord;

/// Source of card records for search.
pub trait CardCatalog {
    /// Cards whose name contains `fragment`. No match is an empty list, not an
    /// error.
    fn lookup_by_name_fragment(&self, fragment: &str) -> Result<Vec<CardRecord>>;
}

/// Blocking client for the YGOPRODeck card database.
pub struct YgoProDeckCatalog {
    base_url: String,
    client: Client,
}

impl YgoProDeckCatalog {
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

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for YgoProDeckCatalog {
    fn default() -> Self {
        Self {
            base_url: config::CATALOG_BASE.to_string(),
            client: Client::new(),
        }
    }
}

impl CardCatalog for YgoProDeckCatalog {
    fn lookup_by_name_fragment(&self, fragment: &str) -> Result<Vec<CardRecord>> {
        let url = format!("{}/cardinfo.php", self.base_url);
        tracing::debug!(%url, fragment, "querying card catalog");

        let resp = self.client.get(&url).query(&[("fname", fragment)]).send()?;
        if !check_status(resp.status())? {
            return Ok(Vec::new());
        }
        let body: Value = resp.json()?;
        Ok(parse_catalog_response(&body))
    }
}

/// Extract card records from a catalog response body.
///
/// Accepts either `{ "data": [...] }` or a bare array. Records that fail
/// validation are skipped with a warning rather than failing the whole page.
pub fn parse_catalog_response(body: &Value) -> Vec<CardRecord> {
    let items: &[Value] = match body {
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(arr)) => arr.as_slice(),
            _ => &[],
        },
        Value::Array(arr) => arr.as_slice(),
        _ => &[],
    };

    valid_records(items)
}

/// Decide what a catalog status means before the body is read.
///
/// `Ok(true)` carries a body worth parsing, `Ok(false)` is the catalog's
/// "no card matches" answer (HTTP 400), anything else non-successful is a
/// [`DeckError::Catalog`].
pub fn check_status(status: StatusCode) -> Result<bool> {
    if status == StatusCode::BAD_REQUEST {
        Ok(false)
    } else if status.is_success() {
        Ok(true)
    } else {
        Err(DeckError::Catalog(format!("catalog answered {status}")))
    }
}
