//! Client core and end-to-end flow for the Trello REST API.
//!
//! # Overview
//! `ApiBase` holds the request template (base URL, `key`/`token` query
//! parameters, JSON headers) and dispatches requests through a `Transport`.
//! `BoardClient`, `ListClient` and `CardClient` wrap the board, list and card
//! endpoints and return the DTOs in `types`. `BoardScenario` strings them
//! together into the ordered board lifecycle.
//!
//! # Design
//! - `Config` is explicit and immutable; nothing reads settings globally.
//! - Dispatch returns the response to the caller and remembers nothing.
//! - `Transport` is the only I/O seam, so every client can be exercised
//!   against scripted responses or the `mock-trello` server.
//! - DTOs are defined independently from the mock-trello crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod datagen;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod scenario;
pub mod transport;
pub mod types;

pub use api::ApiBase;
pub use client::{BoardClient, CardClient, ListClient};
pub use config::{Config, ConfigError};
pub use datagen::TestDataGenerator;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestSpec};
pub use scenario::{BoardScenario, ScenarioError, Step};
pub use transport::{Transport, UreqTransport};
pub use types::{Board, BulkDeleteReport, Card, CardList, CardUpdate};
