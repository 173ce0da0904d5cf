use tracing::{error, info};

use super::{check_status, parse_body};
use crate::api::ApiBase;
use crate::endpoints;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::Board;

#[derive(Clone)]
pub struct BoardClient {
    api: ApiBase,
}

impl BoardClient {
    pub fn new(api: ApiBase) -> Self {
        Self { api }
    }

    pub fn create_board(&self, name: &str) -> Result<Board, ApiError> {
        let request = self.api.custom_request(None, Some(&[("name", name)][..]), None);
        let response = self.api.send(endpoints::BOARDS, HttpMethod::Post, request)?;
        let board: Board = parse_body(&response, "create board")?;
        info!(
            id = board.id.as_deref().unwrap_or_default(),
            name = board.name.as_deref().unwrap_or_default(),
            "board created"
        );
        Ok(board)
    }

    pub fn get_board(&self, id: &str) -> Result<Board, ApiError> {
        let response = self
            .api
            .send(&endpoints::board(id), HttpMethod::Get, self.api.request())?;
        parse_body(&response, "fetch board")
    }

    /// Delete `board` remotely. Only after a 200 is the local record
    /// invalidated; on any other outcome it is left untouched.
    pub fn delete_board(&self, board: &mut Board) -> Result<(), ApiError> {
        let id = board.id.as_deref().ok_or(ApiError::MissingId("board"))?;
        let response = self
            .api
            .send(&endpoints::board(id), HttpMethod::Delete, self.api.request())?;
        if response.status != 200 {
            check_status(&response, "delete board")?;
            // A 2xx other than 200 is not a confirmed delete.
            error!(
                status = response.status,
                elapsed_ms = response.elapsed_ms() as u64,
                body = %response.body,
                "board delete not confirmed"
            );
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        info!(
            id,
            name = board.name.as_deref().unwrap_or_default(),
            elapsed_ms = response.elapsed_ms() as u64,
            "board deleted"
        );
        board.invalidate();
        Ok(())
    }
}
