//! In-memory stand-in for the slice of the Trello REST API the harness uses.
//!
//! Boards, lists and cards live in one store behind an `RwLock`. Every route
//! checks the `key` and `token` query parameters against the credentials the
//! app was built with. Request parameters travel in the query string, as
//! they do against the real API.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Path prefix of the API version, as in `https://api.trello.com/1`.
pub const API_PREFIX: &str = "/1";
pub const NOT_FOUND: &str = "The requested resource was not found.";
const POS_STEP: f64 = 65536.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub url: String,
    pub short_url: String,
    pub closed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub closed: bool,
    pub id_board: String,
    pub pos: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub id_list: String,
    pub id_board: String,
    pub closed: bool,
}

/// API key and token the mock accepts.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

impl Credentials {
    pub fn new(key: &str, token: &str) -> Self {
        Self {
            key: key.to_string(),
            token: token.to_string(),
        }
    }

    /// `MOCK_TRELLO_KEY` / `MOCK_TRELLO_TOKEN`, defaulting to `test-key` /
    /// `test-token`.
    pub fn from_env() -> Self {
        Self {
            key: std::env::var("MOCK_TRELLO_KEY").unwrap_or_else(|_| "test-key".to_string()),
            token: std::env::var("MOCK_TRELLO_TOKEN").unwrap_or_else(|_| "test-token".to_string()),
        }
    }
}

#[derive(Default)]
pub struct Store {
    pub boards: HashMap<String, Board>,
    pub lists: HashMap<String, List>,
    pub cards: HashMap<String, Card>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    credentials: Arc<Credentials>,
}

#[derive(Deserialize)]
struct AuthParams {
    key: Option<String>,
    token: Option<String>,
}

#[derive(Deserialize)]
struct CreateBoardParams {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateListParams {
    name: Option<String>,
    id_board: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCardParams {
    name: Option<String>,
    desc: Option<String>,
    id_list: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCardParams {
    name: Option<String>,
    desc: Option<String>,
    closed: Option<bool>,
    id_list: Option<String>,
}

type ApiResult<T> = Result<T, (StatusCode, &'static str)>;

pub fn app(credentials: Credentials) -> Router {
    app_with_db(credentials, Db::default())
}

/// Like `app`, but over a store the caller can inspect or seed.
pub fn app_with_db(credentials: Credentials, db: Db) -> Router {
    let state = AppState {
        db,
        credentials: Arc::new(credentials),
    };
    let api = Router::new()
        .route("/boards", post(create_board))
        .route("/boards/{id}", get(get_board).delete(delete_board))
        .route("/lists", post(create_list))
        .route("/cards", post(create_card))
        .route("/cards/{id}", get(get_card).put(update_card).delete(delete_card))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
    Router::new().nest(API_PREFIX, api).with_state(state)
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    run_with_db(listener, credentials, Db::default()).await
}

pub async fn run_with_db(
    listener: TcpListener,
    credentials: Credentials,
    db: Db,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(credentials, db)).await
}

async fn require_auth(
    State(state): State<AppState>,
    Query(auth): Query<AuthParams>,
    request: Request,
    next: Next,
) -> Response {
    if auth.key.as_deref() != Some(state.credentials.key.as_str()) {
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    if auth.token.as_deref() != Some(state.credentials.token.as_str()) {
        return (StatusCode::UNAUTHORIZED, "invalid token").into_response();
    }
    next.run(request).await
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

fn required(value: Option<String>, err: &'static str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or((StatusCode::BAD_REQUEST, err))
}

fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

async fn create_board(
    State(state): State<AppState>,
    Query(params): Query<CreateBoardParams>,
) -> ApiResult<Json<Board>> {
    let name = required(params.name, "invalid value for name")?;
    let short_link = Uuid::new_v4().simple().to_string()[..8].to_string();
    let board = Board {
        id: new_id(),
        url: format!("https://trello.com/b/{short_link}/{}", slug(&name)),
        short_url: format!("https://trello.com/b/{short_link}"),
        name,
        desc: String::new(),
        closed: false,
    };
    debug!(id = %board.id, "board created");
    state.db.write().await.boards.insert(board.id.clone(), board.clone());
    Ok(Json(board))
}

async fn get_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Board>> {
    let store = state.db.read().await;
    store
        .boards
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, NOT_FOUND))
}

async fn delete_board(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = state.db.write().await;
    store
        .boards
        .remove(&id)
        .ok_or((StatusCode::NOT_FOUND, NOT_FOUND))?;
    store.lists.retain(|_, list| list.id_board != id);
    store.cards.retain(|_, card| card.id_board != id);
    debug!(%id, "board deleted");
    Ok(Json(json!({ "_value": null })))
}

async fn create_list(
    State(state): State<AppState>,
    Query(params): Query<CreateListParams>,
) -> ApiResult<Json<List>> {
    let name = required(params.name, "invalid value for name")?;
    let id_board = required(params.id_board, "invalid value for idBoard")?;
    let mut store = state.db.write().await;
    if !store.boards.contains_key(&id_board) {
        return Err((StatusCode::BAD_REQUEST, "invalid value for idBoard"));
    }
    let on_board = store.lists.values().filter(|l| l.id_board == id_board).count();
    let list = List {
        id: new_id(),
        name,
        closed: false,
        id_board,
        pos: POS_STEP * (on_board + 1) as f64,
    };
    store.lists.insert(list.id.clone(), list.clone());
    Ok(Json(list))
}

async fn create_card(
    State(state): State<AppState>,
    Query(params): Query<CreateCardParams>,
) -> ApiResult<Json<Card>> {
    let id_list = required(params.id_list, "invalid value for idList")?;
    let mut store = state.db.write().await;
    let id_board = store
        .lists
        .get(&id_list)
        .map(|list| list.id_board.clone())
        .ok_or((StatusCode::BAD_REQUEST, "invalid value for idList"))?;
    let card = Card {
        id: new_id(),
        name: params.name.unwrap_or_default(),
        desc: params.desc.unwrap_or_default(),
        id_list,
        id_board,
        closed: false,
    };
    store.cards.insert(card.id.clone(), card.clone());
    Ok(Json(card))
}

async fn get_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Card>> {
    let store = state.db.read().await;
    store
        .cards
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, NOT_FOUND))
}

async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UpdateCardParams>,
) -> ApiResult<Json<Card>> {
    let mut store = state.db.write().await;
    let target_board = match &params.id_list {
        Some(id_list) => Some(
            store
                .lists
                .get(id_list)
                .map(|list| list.id_board.clone())
                .ok_or((StatusCode::BAD_REQUEST, "invalid value for idList"))?,
        ),
        None => None,
    };
    let card = store
        .cards
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, NOT_FOUND))?;
    if let Some(name) = params.name {
        card.name = name;
    }
    if let Some(desc) = params.desc {
        card.desc = desc;
    }
    if let Some(closed) = params.closed {
        card.closed = closed;
    }
    if let (Some(id_list), Some(id_board)) = (params.id_list, target_board) {
        card.id_list = id_list;
        card.id_board = id_board;
    }
    Ok(Json(card.clone()))
}

async fn delete_card(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = state.db.write().await;
    store
        .cards
        .remove(&id)
        .map(|_| Json(json!({ "limits": {} })))
        .ok_or((StatusCode::NOT_FOUND, NOT_FOUND))
}
