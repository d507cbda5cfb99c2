//! In-memory stand-in for the hosted `PostgREST` interface.
//!
//! Serves `/rest/v1/{table}` with the subset of `PostgREST` the storefront
//! uses: `eq.` and `in.(...)` filters, `Prefer: return=representation`, JSON
//! error bodies with a `message` field, and `409` on duplicate order numbers.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

use lynora_storefront::config::SupabaseConfig;
use lynora_storefront::models::{Category, Product};
use lynora_storefront::supabase::SupabaseClient;

/// Anon key the fake server accepts.
pub const ANON_KEY: &str = "lynora-test-anon-key-5c81f0a2e9d4";

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<Value>>,
    reads: HashMap<String, usize>,
    order_conflicts: usize,
    failing: HashSet<String>,
}

type Db = Arc<Mutex<Tables>>;

fn lock(db: &Db) -> MutexGuard<'_, Tables> {
    db.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running fake data service.
#[derive(Clone)]
pub struct FakePostgrest {
    addr: SocketAddr,
    db: Db,
}

impl FakePostgrest {
    /// Bind a random local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let db = Db::default();
        let app = Router::new()
            .route(
                "/rest/v1/{table}",
                get(select_rows)
                    .post(insert_rows)
                    .patch(update_rows)
                    .delete(delete_rows),
            )
            .with_state(db.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake data service");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake data service address");
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self { addr, db }
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the local address does not form a valid URL.
    #[must_use]
    pub fn config(&self, anon_key: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: Url::parse(&format!("http://{}/", self.addr)).expect("Invalid fake server URL"),
            anon_key: SecretString::from(anon_key.to_string()),
            cache_ttl: Duration::from_secs(60),
            timeout: Duration::from_secs(5),
        }
    }

    /// A client authenticated with [`ANON_KEY`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> SupabaseClient {
        SupabaseClient::new(&self.config(ANON_KEY)).expect("Failed to build client")
    }

    /// Load products (with embedded images and category) and categories.
    ///
    /// # Panics
    ///
    /// Panics if a fixture cannot be serialized.
    pub fn seed_catalog(&self, products: &[Product], categories: &[Category]) {
        let mut db = lock(&self.db);
        db.rows.insert(
            "products".to_string(),
            products
                .iter()
                .map(|p| serde_json::to_value(p).expect("Failed to serialize product"))
                .collect(),
        );
        db.rows.insert(
            "categories".to_string(),
            categories
                .iter()
                .map(|c| serde_json::to_value(c).expect("Failed to serialize category"))
                .collect(),
        );
    }

    /// Current rows of `table`.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        lock(&self.db).rows.get(table).cloned().unwrap_or_default()
    }

    /// Number of `GET` requests served for `table`.
    #[must_use]
    pub fn reads(&self, table: &str) -> usize {
        lock(&self.db).reads.get(table).copied().unwrap_or_default()
    }

    /// Answer the next `n` order inserts with a unique-violation.
    pub fn reject_next_orders(&self, n: usize) {
        lock(&self.db).order_conflicts = n;
    }

    /// Answer every request for `table` with a server error.
    pub fn fail_table(&self, table: &str) {
        lock(&self.db).failing.insert(table.to_string());
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn check_request(db: &Tables, table: &str, headers: &HeaderMap) -> Result<(), Response> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let bearer = header("authorization").and_then(|v| v.strip_prefix("Bearer "));
    if header("apikey") != Some(ANON_KEY) || bearer != Some(ANON_KEY) {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid API key"));
    }
    if db.failing.contains(table) {
        return Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "canceling statement due to statement timeout",
        ));
    }
    Ok(())
}

fn field(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn matches(row: &Value, params: &HashMap<String, String>) -> bool {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != "select")
        .all(|(column, filter)| {
            let value = field(row, column);
            if let Some(expected) = filter.strip_prefix("eq.") {
                value.as_deref() == Some(expected)
            } else if let Some(list) = filter
                .strip_prefix("in.(")
                .and_then(|rest| rest.strip_suffix(')'))
            {
                list.split(',')
                    .map(|item| item.trim_matches('"'))
                    .any(|item| value.as_deref() == Some(item))
            } else {
                false
            }
        })
}

async fn select_rows(
    State(db): State<Db>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut db = lock(&db);
    if let Err(response) = check_request(&db, &table, &headers) {
        return response;
    }
    *db.reads.entry(table.clone()).or_default() += 1;

    let rows: Vec<Value> = db
        .rows
        .get(&table)
        .map(|rows| rows.iter().filter(|row| matches(row, &params)).cloned().collect())
        .unwrap_or_default();
    Json(rows).into_response()
}

async fn insert_rows(
    State(db): State<Db>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut db = lock(&db);
    if let Err(response) = check_request(&db, &table, &headers) {
        return response;
    }

    let mut new_rows = match body {
        Value::Array(rows) => rows,
        row @ Value::Object(_) => vec![row],
        _ => return error(StatusCode::BAD_REQUEST, "expected object or array"),
    };

    if table == "orders" {
        if db.order_conflicts > 0 {
            db.order_conflicts -= 1;
            return error(
                StatusCode::CONFLICT,
                "duplicate key value violates unique constraint \"orders_order_number_key\"",
            );
        }
        let existing: HashSet<String> = db
            .rows
            .get("orders")
            .into_iter()
            .flatten()
            .filter_map(|row| field(row, "order_number"))
            .collect();
        if new_rows
            .iter()
            .filter_map(|row| field(row, "order_number"))
            .any(|number| existing.contains(&number))
        {
            return error(
                StatusCode::CONFLICT,
                "duplicate key value violates unique constraint \"orders_order_number_key\"",
            );
        }
    }

    let now = chrono::Utc::now().to_rfc3339();
    for row in &mut new_rows {
        if let Value::Object(map) = row {
            map.entry("id")
                .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
            map.entry("created_at")
                .or_insert_with(|| Value::String(now.clone()));
        }
    }
    db.rows
        .entry(table)
        .or_default()
        .extend(new_rows.iter().cloned());

    let wants_rows = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("return=representation"));
    if wants_rows {
        (StatusCode::CREATED, Json(new_rows)).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn update_rows(
    State(db): State<Db>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut db = lock(&db);
    if let Err(response) = check_request(&db, &table, &headers) {
        return response;
    }
    let Value::Object(changes) = body else {
        return error(StatusCode::BAD_REQUEST, "expected object");
    };

    if let Some(rows) = db.rows.get_mut(&table) {
        for row in rows.iter_mut().filter(|row| matches(row, &params)) {
            if let Value::Object(map) = row {
                for (key, value) in &changes {
                    map.insert(key.clone(), value.clone());
                }
            }
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_rows(
    State(db): State<Db>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut db = lock(&db);
    if let Err(response) = check_request(&db, &table, &headers) {
        return response;
    }
    if let Some(rows) = db.rows.get_mut(&table) {
        rows.retain(|row| !matches(row, &params));
    }
    StatusCode::NO_CONTENT.into_response()
}
