//! Data-transfer objects mirroring Trello's JSON resources.
//!
//! # Design
//! Every field Trello might omit is optional, and unknown fields are ignored,
//! so the structs survive API additions. Wire names follow Trello's camelCase
//! (`shortUrl`, `idBoard`, `idList`). These types are defined independently
//! from the mock-trello crate; integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// A Trello board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub short_url: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

impl Board {
    /// Drop the identifying fields of a board the server has confirmed
    /// deleted, and mark it closed. No re-fetch happens here.
    pub fn invalidate(&mut self) {
        self.id = None;
        self.name = None;
        self.url = None;
        self.short_url = None;
        self.closed = true;
    }
}

/// A list on a board. Named `CardList` to stay clear of `std` collections.
///
/// `cards` is a local cache of the cards created through this harness; it
/// is never sent to or read from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardList {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub closed: bool,
    pub id_board: Option<String>,
    pub pos: Option<f64>,
    #[serde(skip)]
    pub cards: Vec<Card>,
}

impl CardList {
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }
}

/// A card in a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Option<String>,
    pub name: Option<String>,
    pub id_list: Option<String>,
    pub desc: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

/// Fields to change on a card. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub closed: Option<bool>,
    pub id_list: Option<String>,
}

impl CardUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.desc.is_none() && self.closed.is_none() && self.id_list.is_none()
    }

    /// Query parameters in Trello's naming.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(name) = &self.name {
            params.push(("name", name.clone()));
        }
        if let Some(desc) = &self.desc {
            params.push(("desc", desc.clone()));
        }
        if let Some(closed) = self.closed {
            params.push(("closed", closed.to_string()));
        }
        if let Some(id_list) = &self.id_list {
            params.push(("idList", id_list.clone()));
        }
        params
    }
}

/// Outcome of deleting every cached card in a list.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, crate::error::ApiError)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
