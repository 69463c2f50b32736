//! In-memory fake of the table API.
//!
//! Serves `/v0/{base}/{table}` and `/v0/{base}/{table}/{id}` with bearer
//! auth, offset pagination, sorting, a minimal `{Field}='value'` filter and
//! the `{"error": {"type", "message"}}` error envelope.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Token accepted by `app()`.
pub const DEFAULT_TOKEN: &str = "test-token";

/// Largest page the server will return.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime")]
    pub created_time: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// Records per `(base, table)`, in insertion order.
pub type Db = Arc<RwLock<HashMap<(String, String), Vec<Record>>>>;

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    db: Db,
}

/// Error envelope matching the upstream service.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Could not find what you are looking for",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({"error": {"type": self.kind, "message": self.message}});
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/v0/{base}/{table}", get(list_records).post(create_record))
        .route(
            "/v0/{base}/{table}/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = format!("Bearer {}", state.token);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "AUTHENTICATION_REQUIRED",
            "Authentication required",
        )),
    }
}

async fn list_records(
    State(state): State<AppState>,
    Path((base, table)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<ListResponse>, ApiError> {
    authorize(&state, &headers)?;

    let mut records = {
        let db = state.db.read().await;
        db.get(&(base, table)).cloned().unwrap_or_default()
    };

    if let Some(formula) = query.get("filterByFormula") {
        let (field, value) = parse_formula(formula).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_FILTER_BY_FORMULA",
                format!("The formula for filtering records is invalid: {formula}"),
            )
        })?;
        records.retain(|r| r.fields.get(&field).map(field_text).as_deref() == Some(value.as_str()));
    }

    let sorts = parse_sorts(&query);
    if !sorts.is_empty() {
        records.sort_by(|a, b| {
            sorts.iter().fold(Ordering::Equal, |acc, (field, descending)| {
                acc.then_with(|| {
                    let ord = compare_field(a.fields.get(field), b.fields.get(field));
                    if *descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                })
            })
        });
    }

    if let Some(max) = parse_number(&query, "maxRecords")? {
        records.truncate(max);
    }

    let page_size = parse_number(&query, "pageSize")?
        .unwrap_or(MAX_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let start = match query.get("offset") {
        Some(offset) => decode_offset(offset).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "LIST_RECORDS_ITERATOR_NOT_AVAILABLE",
                "The offset is not valid",
            )
        })?,
        None => 0,
    };

    let end = (start + page_size).min(records.len());
    let page = records.get(start..end).map(<[Record]>::to_vec).unwrap_or_default();
    let offset = (end < records.len()).then(|| encode_offset(end));

    Ok(Json(ListResponse {
        records: page,
        offset,
    }))
}

async fn create_record(
    State(state): State<AppState>,
    Path((base, table)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Record>, ApiError> {
    authorize(&state, &headers)?;
    let fields = extract_fields(body)?;
    let record = Record {
        id: new_record_id(),
        created_time: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        fields,
    };
    debug!(id = %record.id, table = %table, "created record");
    state
        .db
        .write()
        .await
        .entry((base, table))
        .or_default()
        .push(record.clone());
    Ok(Json(record))
}

async fn get_record(
    State(state): State<AppState>,
    Path((base, table, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<Record>, ApiError> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    db.get(&(base, table))
        .and_then(|records| records.iter().find(|r| r.id == id))
        .cloned()
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

async fn update_record(
    State(state): State<AppState>,
    Path((base, table, id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Record>, ApiError> {
    authorize(&state, &headers)?;
    let fields = extract_fields(body)?;
    let mut db = state.db.write().await;
    let record = db
        .get_mut(&(base, table))
        .and_then(|records| records.iter_mut().find(|r| r.id == id))
        .ok_or_else(ApiError::not_found)?;
    for (key, value) in fields {
        record.fields.insert(key, value);
    }
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(state): State<AppState>,
    Path((base, table, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let records = db.get_mut(&(base, table)).ok_or_else(ApiError::not_found)?;
    let index = records
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(ApiError::not_found)?;
    records.remove(index);
    debug!(id = %id, "deleted record");
    Ok(Json(json!({"id": id, "deleted": true})))
}

fn extract_fields(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(mut map) => match map.remove("fields") {
            Some(Value::Object(fields)) => Ok(fields),
            _ => Err(missing_fields()),
        },
        _ => Err(missing_fields()),
    }
}

fn missing_fields() -> ApiError {
    ApiError::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        "INVALID_REQUEST_MISSING_FIELDS",
        "Could not find field \"fields\" in the request body",
    )
}

fn new_record_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("rec{}", &hex[..14])
}

/// Offsets are opaque to clients; the slash exercises their percent-encoding.
fn encode_offset(index: usize) -> String {
    format!("itr/{index}")
}

fn decode_offset(offset: &str) -> Option<usize> {
    offset.strip_prefix("itr/")?.parse().ok()
}

fn parse_number(query: &HashMap<String, String>, key: &str) -> Result<Option<usize>, ApiError> {
    query
        .get(key)
        .map(|raw| {
            raw.parse().map_err(|_| {
                ApiError::new(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_REQUEST_UNKNOWN",
                    format!("Invalid value for {key}: {raw}"),
                )
            })
        })
        .transpose()
}

/// `(field, descending)` pairs from `sort[i][field]` / `sort[i][direction]`.
fn parse_sorts(query: &HashMap<String, String>) -> Vec<(String, bool)> {
    (0..)
        .map_while(|i| {
            let field = query.get(&format!("sort[{i}][field]"))?;
            let descending = query
                .get(&format!("sort[{i}][direction]"))
                .is_some_and(|d| d == "desc");
            Some((field.clone(), descending))
        })
        .collect()
}

/// Accepts `{Field}='value'` or `{Field}="value"`.
fn parse_formula(formula: &str) -> Option<(String, String)> {
    let rest = formula.trim().strip_prefix('{')?;
    let (field, rest) = rest.split_once('}')?;
    let rest = rest.trim_start().strip_prefix('=')?.trim();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let value = rest.strip_prefix(quote)?.strip_suffix(quote)?;
    Some((field.to_string(), value.to_string()))
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => field_text(x).cmp(&field_text(y)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
