use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

// ---------------------------------------------------------------------------
// CardId
// ---------------------------------------------------------------------------

/// Catalog identifier of one card printing.
///
/// Deck membership and the copy limit are counted over this id, never over
/// the card name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Loose::deserialize(deserializer)?;
        raw.as_u64()
            .map(CardId)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid card id: {raw:?}")))
    }
}

// ---------------------------------------------------------------------------
// CardImage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImage {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_u64")]
    pub id: Option<u64>,
    pub image_url: Option<String>,
    pub image_url_small: Option<String>,
    pub image_url_cropped: Option<String>,
}

// ---------------------------------------------------------------------------
// CardRecord
// ---------------------------------------------------------------------------

/// A card as received from the catalog and stored in decks.
///
/// Numeric stats arrive loosely typed (numbers, numeric strings or `null`)
/// and are coerced here so the rest of the engine works on plain options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub name: String,
    #[serde(rename = "type")]
    pub type_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_i64")]
    pub atk: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_i64")]
    pub def: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_u64")]
    pub level: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(default)]
    pub card_images: Vec<CardImage>,
}

impl CardRecord {
    /// Build a record with only the fields the engine reasons about.
    pub fn new(id: u64, name: impl Into<String>, type_field: impl Into<String>) -> Self {
        Self {
            id: CardId(id),
            name: name.into(),
            type_field: type_field.into(),
            atk: None,
            def: None,
            level: None,
            desc: None,
            race: None,
            attribute: None,
            archetype: None,
            card_images: Vec::new(),
        }
    }

    /// Validate and coerce one loosely-typed JSON object into a record.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(Self::deserialize(value)?)
    }

    /// Full-size artwork URL of the first image, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.card_images.first().and_then(|i| i.image_url.as_deref())
    }

    pub fn image_url_small(&self) -> Option<&str> {
        self.card_images
            .first()
            .and_then(|i| i.image_url_small.as_deref())
    }
}

/// Coerce every item that validates, logging and skipping the rest.
pub(crate) fn valid_records(items: &[Value]) -> Vec<CardRecord> {
    items
        .iter()
        .filter_map(|item| match CardRecord::from_value(item) {
            Ok(card) => Some(card),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed card record");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Lenient numeric coercion
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Loose {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(n) => Some(*n),
            Loose::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Loose::Float(_) => None,
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Other(_) => None,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_i64().and_then(|n| u64::try_from(n).ok())
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i64>, D::Error> {
    let raw = Option::<Loose>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_i64()))
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u64>, D::Error> {
    let raw = Option::<Loose>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_u64()))
}
