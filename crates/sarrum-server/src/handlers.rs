use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use sarrum_lexicon::{DictEntry, Dictionary, LexiconSource};
use sarrum_types::Direction;

/// Result-count limit applied when the client does not send one.
pub const DEFAULT_QUERY_LIMIT: usize = 15;
/// Query length (and edit distance) cutoff for Akkadian fuzzy search.
pub const DEFAULT_QUERY_CUTOFF: usize = 4;
const MAX_QUERY_LIMIT: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub dict: Arc<Dictionary>,
    pub source: Arc<LexiconSource>,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct DefnQuery {
    pub word: String,
    pub lang: String,
    pub sections: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub lang: String,
    pub limit: Option<usize>,
    pub cutoff: Option<usize>,
    pub sections: Option<String>,
}

#[derive(Deserialize)]
pub struct RandomQuery {
    pub lang: String,
    pub sections: Option<String>,
}

#[derive(Serialize)]
struct RelationDto {
    kind: String,
    label: String,
    word: String,
}

#[derive(Serialize)]
struct EntryDto {
    word_attrs: Vec<String>,
    defns: Vec<String>,
    grammar_kind: String,
    section: u32,
    relations: Vec<RelationDto>,
}

impl EntryDto {
    fn from_entry(entry: &DictEntry) -> Self {
        Self {
            word_attrs: entry
                .word_attrs()
                .iter()
                .map(|attr| attr.code().to_string())
                .collect(),
            defns: entry.defns().to_vec(),
            grammar_kind: entry.grammar_kind().code().to_string(),
            section: entry.section_num(),
            relations: entry
                .relations()
                .iter()
                .map(|rel| RelationDto {
                    kind: rel.kind.name().to_string(),
                    label: rel.kind.label().to_string(),
                    word: rel.word.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct DefnResponse {
    word: String,
    lang: String,
    entries: Vec<EntryDto>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    lang: String,
    items: Vec<String>,
}

#[derive(Serialize)]
struct RandomResponse {
    word: String,
    entry: EntryDto,
}

#[derive(Serialize)]
struct SectionDto {
    num: u32,
    name: String,
    size: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, Json(ErrorResponse { error: msg })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/sarrum/dict", get(raw_lexicon))
        .route("/sarrum/version", get(version))
        .route("/v1/defn", get(defn))
        .route("/v1/search", get(search))
        .route("/v1/random", get(random))
        .route("/v1/sections", get(sections))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

/// Serve the raw lexicon text so offline clients can cache and re-parse it
/// themselves.
async fn raw_lexicon(State(state): State<AppState>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if !state.disable_cache {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        );
    }
    (headers, state.source.text.clone()).into_response()
}

async fn version(State(state): State<AppState>) -> Response {
    Json(json!({ "version": state.source.version })).into_response()
}

async fn defn(
    State(state): State<AppState>,
    Query(params): Query<DefnQuery>,
) -> Result<Response, ApiError> {
    let dir = parse_lang(&params.lang)?;
    let active = parse_sections(params.sections.as_deref())?;

    let dict = state.dict.with_sections(active.as_deref());
    let entries = dict
        .get_defn(&params.word, dir)
        .iter()
        .map(EntryDto::from_entry)
        .collect();

    Ok(Json(DefnResponse {
        word: params.word,
        lang: params.lang,
        entries,
    })
    .into_response())
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let dir = parse_lang(&params.lang)?;
    let active = parse_sections(params.sections.as_deref())?;

    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("query is required"));
    }

    let mut limit = params.limit.unwrap_or(DEFAULT_QUERY_LIMIT);
    if limit == 0 {
        return Err(ApiError::bad_request("limit must be >= 1"));
    }
    if limit > MAX_QUERY_LIMIT {
        limit = MAX_QUERY_LIMIT;
    }
    let cutoff = params.cutoff.unwrap_or(DEFAULT_QUERY_CUTOFF);

    let dict = state.dict.with_sections(active.as_deref());
    let items = dict.search(query, limit, cutoff, dir);

    Ok(Json(SearchResponse {
        query: query.to_string(),
        lang: params.lang,
        items,
    })
    .into_response())
}

async fn random(
    State(state): State<AppState>,
    Query(params): Query<RandomQuery>,
) -> Result<Response, ApiError> {
    let dir = parse_lang(&params.lang)?;
    let active = parse_sections(params.sections.as_deref())?;

    let dict = state.dict.with_sections(active.as_deref());
    let (word, entry) = dict
        .random_entry(dir)
        .ok_or_else(|| ApiError::NotFound("no entries in the active sections".to_string()))?;

    Ok(Json(RandomResponse {
        word: word.to_string(),
        entry: EntryDto::from_entry(entry),
    })
    .into_response())
}

async fn sections(State(state): State<AppState>) -> Response {
    let sections: Vec<SectionDto> = state
        .dict
        .sections()
        .iter()
        .map(|s| SectionDto {
            num: s.num,
            name: s.name.clone(),
            size: s.size,
        })
        .collect();
    Json(sections).into_response()
}

fn parse_lang(raw: &str) -> Result<Direction, ApiError> {
    Direction::from_code(raw)
        .ok_or_else(|| ApiError::bad_request(format!("invalid lang `{raw}`, expected `en` or `akk`")))
}

/// Parse the optional `sections` CSV parameter into active section numbers.
fn parse_sections(raw: Option<&str>) -> Result<Option<Vec<u32>>, ApiError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut nums = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let num = part
            .parse::<u32>()
            .map_err(|_| ApiError::bad_request(format!("invalid section number `{part}`")))?;
        nums.push(num);
    }
    Ok(Some(nums))
}
