use tracing::{info, warn};

use super::{check_status, parse_body};
use crate::api::ApiBase;
use crate::endpoints;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{BulkDeleteReport, Card, CardList, CardUpdate};

#[derive(Clone)]
pub struct CardClient {
    api: ApiBase,
}

impl CardClient {
    pub fn new(api: ApiBase) -> Self {
        Self { api }
    }

    pub fn create_card(&self, name: &str, list_id: &str) -> Result<Card, ApiError> {
        let params = [("name", name), ("idList", list_id)];
        let request = self.api.custom_request(None, Some(&params[..]), None);
        let response = self.api.send(endpoints::CARDS, HttpMethod::Post, request)?;
        let card: Card = parse_body(&response, "create card")?;
        info!(
            id = card.id.as_deref().unwrap_or_default(),
            name = card.name.as_deref().unwrap_or_default(),
            list = card.id_list.as_deref().unwrap_or_default(),
            "card created"
        );
        Ok(card)
    }

    pub fn get_card(&self, card_id: &str) -> Result<Card, ApiError> {
        let response = self
            .api
            .send(&endpoints::card(card_id), HttpMethod::Get, self.api.request())?;
        parse_body(&response, "fetch card")
    }

    /// PUT the fields set on `update`. An empty update sends nothing and
    /// returns the card as the server currently has it.
    pub fn update_card(&self, card_id: &str, update: &CardUpdate) -> Result<Card, ApiError> {
        if update.is_empty() {
            warn!(id = card_id, "empty card update, fetching instead");
            return self.get_card(card_id);
        }
        let owned = update.to_params();
        let params: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let request = self.api.custom_request(None, Some(&params[..]), None);
        let response = self
            .api
            .send(&endpoints::card(card_id), HttpMethod::Put, request)?;
        let card: Card = parse_body(&response, "update card")?;
        info!(
            id = card_id,
            name = card.name.as_deref().unwrap_or_default(),
            "card updated"
        );
        Ok(card)
    }

    pub fn delete_card(&self, card_id: &str) -> Result<(), ApiError> {
        let response = self
            .api
            .send(&endpoints::card(card_id), HttpMethod::Delete, self.api.request())?;
        check_status(&response, "delete card")?;
        info!(id = card_id, elapsed_ms = response.elapsed_ms() as u64, "card deleted");
        Ok(())
    }

    /// Delete every card cached on `list`.
    ///
    /// Each deletion is attempted even if an earlier one failed. A card leaves
    /// the cache only once the server has confirmed its deletion, so after a
    /// partial failure the cache holds exactly the cards still to clean up.
    pub fn delete_all_cards_in_list(&self, list: &mut CardList) -> BulkDeleteReport {
        let list_name = list.name.clone().unwrap_or_default();
        let mut report = BulkDeleteReport::default();
        if list.cards.is_empty() {
            warn!(list = %list_name, "list has no cards to delete");
            return report;
        }

        let mut remaining = Vec::new();
        for card in list.cards.drain(..) {
            let Some(id) = card.id.clone() else {
                warn!(list = %list_name, "skipping cached card without id");
                report.failed.push((String::new(), ApiError::MissingId("card")));
                remaining.push(card);
                continue;
            };
            match self.delete_card(&id) {
                Ok(()) => report.deleted.push(id),
                Err(err) => {
                    report.failed.push((id, err));
                    remaining.push(card);
                }
            }
        }
        list.cards = remaining;

        if report.is_complete() {
            info!(list = %list_name, deleted = report.deleted.len(), "all cards deleted");
        } else {
            warn!(
                list = %list_name,
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "some cards could not be deleted"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::transport::scripted::ScriptedTransport;
    use std::sync::Arc;

    fn client(transport: Arc<ScriptedTransport>) -> CardClient {
        let config = Config::new("https://trello.test/1", "k", "t", "%S").unwrap();
        CardClient::new(ApiBase::with_transport(&config, transport))
    }

    fn cached(ids: &[&str]) -> CardList {
        let mut list = CardList {
            id: Some("l1".to_string()),
            name: Some("Todo".to_string()),
            ..CardList::default()
        };
        for id in ids {
            list.add_card(Card {
                id: Some(id.to_string()),
                ..Card::default()
            });
        }
        list
    }

    #[test]
    fn create_card_sends_list_id() {
        let transport =
            ScriptedTransport::new(&[(200, r#"{"id":"c1","name":"Card1","idList":"l1","desc":""}"#)]);
        let card = client(transport.clone()).create_card("Card1", "l1").unwrap();
        assert_eq!(card.id_list.as_deref(), Some("l1"));

        let seen = &transport.requests()[0];
        assert_eq!(seen.url, "https://trello.test/1/cards");
        assert!(seen.query.contains(&("idList".to_string(), "l1".to_string())));
    }

    #[test]
    fn update_card_puts_only_changed_fields() {
        let transport = ScriptedTransport::new(&[(200, r#"{"id":"c1","name":"Renamed"}"#)]);
        let card = client(transport.clone())
            .update_card("c1", &CardUpdate::name("Renamed"))
            .unwrap();
        assert_eq!(card.name.as_deref(), Some("Renamed"));

        let seen = &transport.requests()[0];
        assert_eq!(seen.method, HttpMethod::Put);
        assert_eq!(seen.url, "https://trello.test/1/cards/c1");
        // key, token, name
        assert_eq!(seen.query.len(), 3);
    }

    #[test]
    fn empty_update_fetches_instead_of_putting() {
        let transport = ScriptedTransport::new(&[(200, r#"{"id":"c1","name":"Same"}"#)]);
        let card = client(transport.clone())
            .update_card("c1", &CardUpdate::default())
            .unwrap();
        assert_eq!(card.name.as_deref(), Some("Same"));

        let seen = transport.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, "https://trello.test/1/cards/c1");
    }

    #[test]
    fn delete_card_reports_not_found() {
        let transport = ScriptedTransport::new(&[(404, "The requested resource was not found.")]);
        let err = client(transport).delete_card("gone").unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn bulk_delete_clears_cache_when_all_succeed() {
        let transport = ScriptedTransport::new(&[(200, r#"{"limits":{}}"#), (200, r#"{"limits":{}}"#)]);
        let mut list = cached(&["c1", "c2"]);
        let report = client(transport.clone()).delete_all_cards_in_list(&mut list);

        assert!(report.is_complete());
        assert_eq!(report.deleted, ["c1", "c2"]);
        assert!(list.cards.is_empty());
        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            ["https://trello.test/1/cards/c1", "https://trello.test/1/cards/c2"]
        );
    }

    #[test]
    fn bulk_delete_continues_past_failures_and_keeps_them_cached() {
        let transport = ScriptedTransport::new(&[
            (500, "boom"),
            (200, r#"{"limits":{}}"#),
            (404, "not found"),
        ]);
        let mut list = cached(&["c1", "c2", "c3"]);
        let report = client(transport.clone()).delete_all_cards_in_list(&mut list);

        assert_eq!(transport.requests().len(), 3);
        assert_eq!(report.deleted, ["c2"]);
        let failed: Vec<_> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(failed, ["c1", "c3"]);
        let left: Vec<_> = list.cards.iter().filter_map(|c| c.id.as_deref()).collect();
        assert_eq!(left, ["c1", "c3"]);
    }

    #[test]
    fn bulk_delete_on_empty_list_sends_nothing() {
        let transport = ScriptedTransport::new(&[]);
        let mut list = cached(&[]);
        let report = client(transport.clone()).delete_all_cards_in_list(&mut list);
        assert!(report.deleted.is_empty());
        assert!(report.is_complete());
        assert!(transport.requests().is_empty());
    }
}
