use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bible_text::full_name;
use bible_types::{SearchMode, VerseMatch};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::search::{LibraryIndex, SearchIndex};

/// Longest accepted search term, in characters.
pub const MAX_TERM_LEN: usize = 64;
const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<LibraryIndex>,
    pub max_page_size: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct CountsQuery {
    pub term: String,
    pub mode: Option<String>,
}

#[derive(Deserialize)]
pub struct MatchesQuery {
    pub term: String,
    pub mode: Option<String>,
    pub version: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Serialize)]
struct VersionInfo<'a> {
    name: &'a str,
    books: usize,
    chapters: usize,
    verses: usize,
    dropped_unknown_book: usize,
    dropped_invalid_chapter: usize,
}

#[derive(Serialize)]
struct MatchesResponse<'a> {
    term: String,
    mode: &'static str,
    page: usize,
    page_size: usize,
    versions: Vec<VersionMatches<'a>>,
}

#[derive(Serialize)]
struct VersionMatches<'a> {
    version: &'a str,
    total: usize,
    has_more: bool,
    items: Vec<MatchItem<'a>>,
}

#[derive(Serialize)]
struct MatchItem<'a> {
    book: &'a str,
    name: &'a str,
    chapter: usize,
    verse: usize,
    text: &'a str,
}

impl<'a> From<VerseMatch<'a>> for MatchItem<'a> {
    fn from(m: VerseMatch<'a>) -> Self {
        MatchItem {
            book: m.book,
            name: full_name(m.book),
            chapter: m.chapter,
            verse: m.verse,
            text: m.text,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(frontend))
        .route("/robots.txt", get(robots))
        .route("/healthz", get(healthz))
        .route("/v1/versions", get(versions))
        .route("/v1/counts", get(counts))
        .route("/v1/matches", get(matches))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn robots(State(state): State<AppState>) -> Response {
    let body = (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        "User-agent: *\nDisallow: /",
    );
    cached(&state, "public, max-age=86400, immutable", body)
}

async fn frontend(State(state): State<AppState>) -> Response {
    cached(&state, "public, max-age=3600, immutable", Html(panel_html()))
}

async fn versions(State(state): State<AppState>) -> Response {
    let versions: Vec<VersionInfo> = state
        .index
        .versions()
        .iter()
        .map(|v| {
            let corpus = v.corpus();
            let stats = corpus.stats();
            VersionInfo {
                name: corpus.name(),
                books: stats.books,
                chapters: stats.chapters,
                verses: stats.verses,
                dropped_unknown_book: corpus.dropped().unknown_book,
                dropped_invalid_chapter: corpus.dropped().invalid_chapter,
            }
        })
        .collect();
    cached(
        &state,
        "public, max-age=3600",
        Json(json!({ "versions": versions })),
    )
}

async fn counts(
    State(state): State<AppState>,
    Query(params): Query<CountsQuery>,
) -> Result<Response, ApiError> {
    let term = parse_term(&params.term)?;
    let mode = parse_mode(params.mode.as_deref())?;
    let table = state.index.count_table(term, mode);
    Ok(cached(&state, "public, max-age=300", Json(table)))
}

async fn matches(
    State(state): State<AppState>,
    Query(params): Query<MatchesQuery>,
) -> Result<Response, ApiError> {
    let term = parse_term(&params.term)?;
    let mode = parse_mode(params.mode.as_deref())?;

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::bad_request("page must be >= 1"));
    }
    let mut page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err(ApiError::bad_request("page_size must be >= 1"));
    }
    if page_size > state.max_page_size {
        page_size = state.max_page_size;
    }

    let selected: Vec<&SearchIndex> = match params.version.as_deref() {
        Some(name) if !name.is_empty() => {
            let version = state
                .index
                .get(name)
                .ok_or_else(|| ApiError::NotFound(format!("unknown version {name}")))?;
            vec![version]
        }
        _ => state.index.versions().iter().collect(),
    };

    let offset = (page - 1).saturating_mul(page_size);
    let versions = selected
        .into_iter()
        .map(|v| {
            let found = v.list_matches(term, mode);
            let total = found.len();
            VersionMatches {
                version: v.name(),
                total,
                has_more: offset.saturating_add(page_size) < total,
                items: found
                    .into_iter()
                    .skip(offset)
                    .take(page_size)
                    .map(MatchItem::from)
                    .collect(),
            }
        })
        .collect();

    let response = MatchesResponse {
        term: term.to_string(),
        mode: mode.as_str(),
        page,
        page_size,
        versions,
    };
    Ok(cached(&state, "public, max-age=300", Json(response)))
}

fn parse_term(raw: &str) -> Result<&str, ApiError> {
    let term = raw.trim();
    if term.is_empty() {
        return Err(ApiError::bad_request("term is required"));
    }
    if term.chars().count() > MAX_TERM_LEN {
        return Err(ApiError::bad_request(format!(
            "term must be at most {MAX_TERM_LEN} characters"
        )));
    }
    Ok(term)
}

fn parse_mode(raw: Option<&str>) -> Result<SearchMode, ApiError> {
    raw.unwrap_or_default()
        .parse()
        .map_err(|e: bible_types::ModeError| ApiError::bad_request(e.to_string()))
}

fn cached(state: &AppState, policy: &'static str, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static(policy))],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

const BASE_HTML: &str = include_str!("../templates/base.html");
const STYLE_HTML: &str = include_str!("../templates/style.html");
const PANEL_BODY_HTML: &str = include_str!("../templates/panel_body.html");
const PANEL_SCRIPT: &str = include_str!("../templates/panel_script.js");

fn render_page(title: &str, body: &str, script: &str) -> String {
    let base = BASE_HTML
        .replace("{{title}}", title)
        .replace("{{style}}", STYLE_HTML)
        .replace("{{body}}", body)
        .replace("{{scripts}}", &format!(r#"<script>{}</script>"#, script));
    base.replace("__MAX_TERM_LEN__", &MAX_TERM_LEN.to_string())
}

fn panel_html() -> String {
    render_page("Contador Bíblico", PANEL_BODY_HTML, PANEL_SCRIPT)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::NotFound(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
