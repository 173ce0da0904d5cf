//! Trello REST paths, relative to the configured base URL.

pub const BOARDS: &str = "/boards";
pub const LISTS: &str = "/lists";
pub const CARDS: &str = "/cards";

pub fn board(id: &str) -> String {
    format!("{BOARDS}/{id}")
}

pub fn card(id: &str) -> String {
    format!("{CARDS}/{id}")
}
