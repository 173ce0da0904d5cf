use tracing::info;

use super::parse_body;
use crate::api::ApiBase;
use crate::endpoints;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::CardList;

#[derive(Clone)]
pub struct ListClient {
    api: ApiBase,
}

impl ListClient {
    pub fn new(api: ApiBase) -> Self {
        Self { api }
    }

    pub fn create_list(&self, name: &str, board_id: &str) -> Result<CardList, ApiError> {
        let params = [("name", name), ("idBoard", board_id)];
        let request = self.api.custom_request(None, Some(&params[..]), None);
        let response = self.api.send(endpoints::LISTS, HttpMethod::Post, request)?;
        let list: CardList = parse_body(&response, "create list")?;
        info!(
            id = list.id.as_deref().unwrap_or_default(),
            name = list.name.as_deref().unwrap_or_default(),
            board = list.id_board.as_deref().unwrap_or_default(),
            "list created"
        );
        Ok(list)
    }
}
