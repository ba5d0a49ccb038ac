use crate::models::Zone;

/// Why a card was refused by a deck.
///
/// These are expected outcomes of user actions, surfaced for display and
/// never treated as faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("card belongs to a banned category")]
    Banned,

    #[error("deck already holds the maximum number of copies of this card")]
    CopyLimit,

    #[error("{0} deck is full")]
    ZoneFull(Zone),

    #[error("card cannot go in the {requested} deck, it belongs in the {required} deck")]
    WrongZone { requested: Zone, required: Zone },
}

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("Deck not found: {0}")]
    NotFound(String),

    #[error("A deck named '{0}' already exists")]
    DuplicateName(String),

    #[error("Deck name must not be blank")]
    BlankName,

    #[error("No deck is selected")]
    NoCurrentDeck,

    #[error("Index {index} out of range for {zone} deck of {len} cards")]
    IndexOutOfRange { zone: Zone, index: usize, len: usize },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
