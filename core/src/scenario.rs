//! The board lifecycle flow: board → list → two cards → rename one card →
//! delete all cards → delete the board.
//!
//! # Design
//! `BoardScenario` keeps the board and list created by earlier steps as
//! shared fixture state. Steps must run in order; a step whose fixture is
//! missing fails with `MissingFixture` rather than acting on half-built
//! state. Nothing is cleaned up when a step fails.

use thiserror::Error;
use tracing::{info, info_span};

use crate::api::ApiBase;
use crate::client::{BoardClient, CardClient, ListClient};
use crate::config::Config;
use crate::datagen::TestDataGenerator;
use crate::error::ApiError;
use crate::types::{Board, Card, CardList, CardUpdate};

pub const BOARD_PREFIX: &str = "E2E Test Board-";
pub const LIST_PREFIX: &str = "E2E Test List-";
pub const UPDATED_CARD_PREFIX: &str = "E2E Updated Card-";
pub const CARD_NAMES: [&str; 2] = ["E2E Test Card1", "E2E Test Card2"];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("step needs a {0} created by an earlier step")]
    MissingFixture(&'static str),

    #[error("{failed} of {total} cards could not be deleted")]
    CardsLeft { failed: usize, total: usize },
}

/// One ordered step of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateBoard,
    CreateList,
    CreateCards,
    UpdateRandomCard,
    DeleteAllCards,
    DeleteBoard,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::CreateBoard,
        Step::CreateList,
        Step::CreateCards,
        Step::UpdateRandomCard,
        Step::DeleteAllCards,
        Step::DeleteBoard,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Step::CreateBoard => "Create a new board",
            Step::CreateList => "Create a new list on the board",
            Step::CreateCards => "Create 2 new cards under the list",
            Step::UpdateRandomCard => "Update the name of a random card",
            Step::DeleteAllCards => "Delete all cards in the list",
            Step::DeleteBoard => "Delete the board",
        }
    }
}

pub struct BoardScenario {
    boards: BoardClient,
    lists: ListClient,
    cards: CardClient,
    data: TestDataGenerator,
    board: Option<Board>,
    list: Option<CardList>,
}

impl BoardScenario {
    pub fn new(config: &Config) -> Self {
        Self::with_api(ApiBase::new(config), TestDataGenerator::from_config(config))
    }

    pub fn with_api(api: ApiBase, data: TestDataGenerator) -> Self {
        Self {
            boards: BoardClient::new(api.clone()),
            lists: ListClient::new(api.clone()),
            cards: CardClient::new(api),
            data,
            board: None,
            list: None,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn list(&self) -> Option<&CardList> {
        self.list.as_ref()
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&mut self) -> Result<(), ScenarioError> {
        for step in Step::ALL {
            self.run_step(step)?;
        }
        Ok(())
    }

    pub fn run_step(&mut self, step: Step) -> Result<(), ScenarioError> {
        let _span = info_span!("step", name = step.description()).entered();
        match step {
            Step::CreateBoard => self.create_board(),
            Step::CreateList => self.create_list(),
            Step::CreateCards => self.create_cards(),
            Step::UpdateRandomCard => self.update_random_card().map(|_| ()),
            Step::DeleteAllCards => self.delete_all_cards(),
            Step::DeleteBoard => self.delete_board(),
        }
    }

    pub fn create_board(&mut self) -> Result<(), ScenarioError> {
        let board = self.boards.create_board(&self.data.generate_name(BOARD_PREFIX))?;
        self.board = Some(board);
        Ok(())
    }

    pub fn create_list(&mut self) -> Result<(), ScenarioError> {
        let board_id = self
            .board
            .as_ref()
            .and_then(|b| b.id.as_deref())
            .ok_or(ScenarioError::MissingFixture("board"))?;
        let list = self
            .lists
            .create_list(&self.data.generate_name(LIST_PREFIX), board_id)?;
        self.list = Some(list);
        Ok(())
    }

    pub fn create_cards(&mut self) -> Result<(), ScenarioError> {
        let list = self.list.as_mut().ok_or(ScenarioError::MissingFixture("list"))?;
        let list_id = list.id.clone().ok_or(ScenarioError::MissingFixture("list"))?;
        for name in CARD_NAMES {
            let card = self.cards.create_card(name, &list_id)?;
            list.add_card(card);
        }
        Ok(())
    }

    /// Rename one cached card, chosen at random. Returns the server's view
    /// of the card after the update.
    pub fn update_random_card(&mut self) -> Result<Card, ScenarioError> {
        let list = self.list.as_mut().ok_or(ScenarioError::MissingFixture("list"))?;
        if list.cards.is_empty() {
            return Err(ScenarioError::MissingFixture("card"));
        }
        let last = i32::try_from(list.cards.len() - 1).unwrap_or(i32::MAX);
        let index = self.data.random_int(0, last) as usize;
        let id = list.cards[index]
            .id
            .clone()
            .ok_or(ScenarioError::MissingFixture("card"))?;

        let update = CardUpdate::name(self.data.generate_name(UPDATED_CARD_PREFIX));
        let updated = self.cards.update_card(&id, &update)?;
        list.cards[index] = updated.clone();
        Ok(updated)
    }

    pub fn delete_all_cards(&mut self) -> Result<(), ScenarioError> {
        let list = self.list.as_mut().ok_or(ScenarioError::MissingFixture("list"))?;
        let total = list.cards.len();
        let report = self.cards.delete_all_cards_in_list(list);
        if !report.is_complete() {
            return Err(ScenarioError::CardsLeft {
                failed: report.failed.len(),
                total,
            });
        }
        Ok(())
    }

    pub fn delete_board(&mut self) -> Result<(), ScenarioError> {
        let board = self.board.as_mut().ok_or(ScenarioError::MissingFixture("board"))?;
        self.boards.delete_board(board)?;
        info!("board lifecycle finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;

    fn scenario(replies: &[(u16, &str)]) -> (BoardScenario, std::sync::Arc<ScriptedTransport>) {
        let config = Config::new("https://trello.test/1", "k", "t", "%S").unwrap();
        let transport = ScriptedTransport::new(replies);
        let api = ApiBase::with_transport(&config, transport.clone());
        let data = TestDataGenerator::from_config(&config);
        (BoardScenario::with_api(api, data), transport)
    }

    #[test]
    fn steps_are_ordered() {
        assert_eq!(Step::ALL.first(), Some(&Step::CreateBoard));
        assert_eq!(Step::ALL.last(), Some(&Step::DeleteBoard));
    }

    #[test]
    fn full_run_against_scripted_replies() {
        let (mut scenario, transport) = scenario(&[
            (200, r#"{"id":"b1","name":"E2E Test Board-01"}"#),
            (200, r#"{"id":"l1","name":"E2E Test List-01","idBoard":"b1"}"#),
            (200, r#"{"id":"c1","name":"E2E Test Card1","idList":"l1"}"#),
            (200, r#"{"id":"c2","name":"E2E Test Card2","idList":"l1"}"#),
            (200, r#"{"id":"c1","name":"E2E Updated Card-01","idList":"l1"}"#),
            (200, r#"{"limits":{}}"#),
            (200, r#"{"limits":{}}"#),
            (200, r#"{"_value":null}"#),
        ]);
        scenario.run().unwrap();

        assert_eq!(transport.requests().len(), 8);
        let board = scenario.board().unwrap();
        assert!(board.closed);
        assert!(board.id.is_none());
        assert!(scenario.list().unwrap().cards.is_empty());
    }

    #[test]
    fn list_step_without_board_fails_fast() {
        let (mut scenario, transport) = scenario(&[]);
        let err = scenario.run_step(Step::CreateList).unwrap_err();
        assert!(matches!(err, ScenarioError::MissingFixture("board")));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn run_stops_at_first_failure() {
        let (mut scenario, transport) = scenario(&[(401, "invalid key")]);
        let err = scenario.run().unwrap_err();
        assert!(matches!(err, ScenarioError::Api(ApiError::Http { status: 401, .. })));
        assert_eq!(transport.requests().len(), 1);
        assert!(scenario.board().is_none());
    }

    #[test]
    fn failed_card_delete_is_reported() {
        let (mut scenario, _) = scenario(&[
            (200, r#"{"id":"b1"}"#),
            (200, r#"{"id":"l1","idBoard":"b1"}"#),
            (200, r#"{"id":"c1"}"#),
            (200, r#"{"id":"c2"}"#),
            (200, r#"{"limits":{}}"#),
            (500, "boom"),
        ]);
        for step in [Step::CreateBoard, Step::CreateList, Step::CreateCards, Step::DeleteAllCards] {
            if step == Step::DeleteAllCards {
                let err = scenario.run_step(step).unwrap_err();
                assert!(matches!(err, ScenarioError::CardsLeft { failed: 1, total: 2 }));
            } else {
                scenario.run_step(step).unwrap();
            }
        }
        assert_eq!(scenario.list().unwrap().cards.len(), 1);
    }
}
