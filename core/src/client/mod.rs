//! Resource clients for boards, lists and cards.
//!
//! # Design
//! Each client wraps a shared `ApiBase`. Every operation builds its query
//! parameters, dispatches, checks the status and deserializes the body into
//! the matching DTO. Failures are logged with status, body and elapsed time
//! and returned as `ApiError`; local records are only modified after the
//! server confirms the change.

mod board;
mod card;
mod list;

pub use board::BoardClient;
pub use card::CardClient;
pub use list::ListClient;

use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Map non-success status codes to the appropriate `ApiError` variant,
/// logging the failure under `action`.
fn check_status(response: &HttpResponse, action: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    error!(
        status = response.status,
        elapsed_ms = response.elapsed_ms() as u64,
        body = %response.body,
        "failed to {action}"
    );
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse, action: &str) -> Result<T, ApiError> {
    check_status(response, action)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
