//! # HTTP Routes
//!
//! The admin API, the login endpoint, the flight-number lookup and the public
//! display view.
//!
//! ## Access:
//! - `/api/paging`, `/api/users`, `/api/stations` and `/api/logs` require the
//!   `x-api-key` header; see [`require_api_key`].
//! - `/api/paging/{id}`, `/api/paging/search`, `/api/auth/login`,
//!   `/api/flightnos` and the display view are open.

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use paging_common::display::texts::format_display_date;
use paging_common::display::{
    DisplayData, DisplayState, FALLBACK_LINES, HeaderText, Language, header_text, notice_text, paginate,
    select_display_data, total_pages,
};
use paging_common::models::{ApiMessage, PagingDraft, PagingEntry, PagingLogEntry, SearchRequest, Station, UserAccount, UserDraft};
use paging_common::retrieve::{API_KEY_HEADER, ArrivalsQuery};
use paging_common::utils::{password_digest, verify_password};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use super::error::AppError;
use super::state::AppState;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/paging",
            get(list_pagings).post(create_paging).put(update_paging).delete(delete_paging),
        )
        .route(
            "/api/users",
            get(list_users).post(create_user).put(update_user).delete(delete_user),
        )
        .route("/api/stations", get(list_stations))
        .route("/api/logs", get(list_logs))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    let public = Router::new()
        .route("/api/paging/search", post(search_pagings))
        .route("/api/paging/{id}", get(get_paging))
        .route("/api/auth/login", post(login))
        .route("/api/flightnos", get(flight_numbers))
        .route("/", get(display_view))
        .route("/display", get(display_view));

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    protected.merge(public).layer(cors).with_state(state)
}

/// Rejects the request with 401 unless `x-api-key` matches.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, AppError> {
    let presented = request.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if !state.api_key_matches(presented) {
        debug!(path = %request.uri().path(), "Rejected request without a valid API key");
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}

// --- Pagings ---

async fn list_pagings(State(state): State<AppState>) -> Result<Json<Vec<PagingEntry>>, AppError> {
    Ok(Json(state.store.list_pagings().await?))
}

fn belt_taken(belt_no: &str) -> AppError {
    AppError::Validation(format!(
        "Belt number {belt_no} is already in use. Please choose another belt number."
    ))
}

async fn create_paging(
    State(state): State<AppState>,
    payload: JsonBody<PagingDraft>,
) -> Result<(StatusCode, Json<PagingEntry>), AppError> {
    let Json(draft) = payload?;
    if !draft.missing_fields().is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if state.store.belt_in_use(&draft.belt_no, None).await? {
        return Err(belt_taken(&draft.belt_no));
    }

    let entry = state.store.insert_paging(&draft).await?;
    info!(id = entry.id, belt_no = %entry.belt_no, flight_no = %entry.flight_no, "Paging created");
    state.audit(&entry).await;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_paging(State(state): State<AppState>, payload: JsonBody<PagingDraft>) -> Result<Json<ApiMessage>, AppError> {
    let Json(draft) = payload?;
    let id = match draft.id {
        Some(id) if draft.missing_fields().is_empty() => id,
        _ => return Err(AppError::Validation("All fields are required".into())),
    };
    if state.store.belt_in_use(&draft.belt_no, Some(id)).await? {
        return Err(belt_taken(&draft.belt_no));
    }

    let entry = state
        .store
        .update_paging(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Paging not found".into()))?;
    info!(id, belt_no = %entry.belt_no, status = entry.status, "Paging updated");
    state.audit(&entry).await;
    Ok(Json(ApiMessage::new("Successfully Updated", 200)))
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
    #[serde(default)]
    id: Option<i32>,
}

async fn delete_paging(
    State(state): State<AppState>,
    payload: JsonBody<DeleteBody>,
) -> Result<(StatusCode, Json<ApiMessage>), AppError> {
    let Json(body) = payload?;
    let id = body.id.ok_or_else(|| AppError::Validation("ID is required".into()))?;

    let removed = state
        .store
        .delete_paging(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Paging not found".into()))?;
    info!(id, belt_no = %removed.belt_no, "Paging deleted");
    state.audit(&removed).await;
    Ok((StatusCode::ACCEPTED, Json(ApiMessage::new("Successfully Deleted", 202))))
}

async fn get_paging(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PagingEntry>, AppError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("ID must be a number".into()))?;
    state
        .store
        .get_paging(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("ID not found".into()))
}

async fn search_pagings(
    State(state): State<AppState>,
    payload: JsonBody<SearchRequest>,
) -> Result<Json<Vec<PagingEntry>>, AppError> {
    let Json(request) = payload?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    let hits = state.store.search_pagings(name).await?;
    if hits.is_empty() {
        return Err(AppError::NotFound("Name not found".into()));
    }
    Ok(Json(hits))
}

// --- Users, stations, audit log ---

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserAccount>>, AppError> {
    Ok(Json(state.store.list_users().await?))
}

fn username_taken(username: &str) -> AppError {
    AppError::Validation(format!(
        "Username {username} is already taken. Please choose another username."
    ))
}

async fn create_user(
    State(state): State<AppState>,
    payload: JsonBody<UserDraft>,
) -> Result<(StatusCode, Json<UserAccount>), AppError> {
    let Json(draft) = payload?;
    let incomplete = || AppError::Validation("All fields are required including station".into());
    if !draft.is_complete() {
        return Err(incomplete());
    }
    let UserDraft {
        id_sts: Some(id_sts),
        fullname: Some(fullname),
        username: Some(username),
        password: Some(password),
        email: Some(email),
        nohp: Some(nohp),
        is_active,
        ..
    } = draft
    else {
        return Err(incomplete());
    };

    if state.store.find_user_by_username(&username).await?.is_some() {
        return Err(username_taken(&username));
    }

    let account = UserAccount {
        id_usr: 0,
        id_sts,
        fullname,
        username,
        password: password_digest(&password),
        email,
        nohp,
        is_active: is_active.unwrap_or(1),
    };
    let stored = state.store.insert_user(&account).await?;
    info!(id_usr = stored.id_usr, username = %stored.username, "User created");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn update_user(State(state): State<AppState>, payload: JsonBody<UserDraft>) -> Result<Json<UserAccount>, AppError> {
    let Json(draft) = payload?;
    let id_usr = draft
        .id_usr
        .ok_or_else(|| AppError::Validation("User ID is required".into()))?;
    let existing = state
        .store
        .get_user(id_usr)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let given = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let username = given(draft.username);
    if let Some(username) = username.as_deref().filter(|u| *u != existing.username) {
        let clash = state.store.find_user_by_username(username).await?;
        if clash.is_some_and(|other| other.id_usr != id_usr) {
            return Err(username_taken(username));
        }
    }

    let updated = UserAccount {
        id_usr,
        id_sts: draft.id_sts.filter(|id| *id != 0).unwrap_or(existing.id_sts),
        fullname: given(draft.fullname).unwrap_or(existing.fullname),
        username: username.unwrap_or(existing.username),
        password: given(draft.password)
            .map(|p| password_digest(&p))
            .unwrap_or(existing.password),
        email: given(draft.email).unwrap_or(existing.email),
        nohp: given(draft.nohp).unwrap_or(existing.nohp),
        is_active: draft.is_active.unwrap_or(existing.is_active),
    };
    state.store.update_user(&updated).await?;
    info!(id_usr, "User updated");
    Ok(Json(updated))
}

async fn delete_user(State(state): State<AppState>, payload: JsonBody<UserDraft>) -> Result<Json<ApiMessage>, AppError> {
    let Json(draft) = payload?;
    let id_usr = draft
        .id_usr
        .ok_or_else(|| AppError::Validation("User ID is required".into()))?;
    if !state.store.delete_user(id_usr).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(id_usr, "User deleted");
    Ok(Json(ApiMessage::new("User deleted successfully", 200)))
}

async fn list_stations(State(state): State<AppState>) -> Result<Json<Vec<Station>>, AppError> {
    Ok(Json(state.store.list_active_stations().await?))
}

async fn list_logs(State(state): State<AppState>) -> Result<Json<Vec<PagingLogEntry>>, AppError> {
    Ok(Json(state.store.list_logs().await?))
}

// --- Login ---

#[derive(Debug, Default, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

fn login_rejected() -> Response {
    Json(json!({"logged_in": "0", "message": "Invalid username or password"})).into_response()
}

async fn login(State(state): State<AppState>, payload: JsonBody<LoginRequest>) -> Response {
    let Ok(Json(request)) = payload else {
        return login_rejected();
    };

    match state.store.find_user_by_username(&request.username).await {
        Ok(Some(user)) if user.is_active() && verify_password(&request.password, &user.password) => {
            info!(username = %user.username, "Login succeeded");
            Json(json!({
                "logged_in": "1",
                "user": {"id": user.id_usr, "fullname": user.fullname, "email": user.email}
            }))
            .into_response()
        }
        Ok(_) => {
            info!(username = %request.username, "Login rejected");
            login_rejected()
        }
        Err(e) => {
            error!("Login lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"logged_in": "0", "message": "Server error occurred"})),
            )
                .into_response()
        }
    }
}

// --- Flight numbers ---

#[derive(Debug, Default, Deserialize)]
struct FlightNoParams {
    station: Option<String>,
    start_date: Option<String>,
    to_date: Option<String>,
    source: Option<String>,
}

async fn flight_numbers(
    State(state): State<AppState>,
    Query(params): Query<FlightNoParams>,
) -> Result<Json<Value>, AppError> {
    let feed = state
        .arrivals
        .as_ref()
        .ok_or_else(|| AppError::Feed("Arrivals feed is not configured".into()))?;
    let query = ArrivalsQuery::from_parts(params.station, params.start_date, params.to_date, params.source);
    let flight_nos = feed.flight_numbers(&query).await?;
    debug!(station = %query.station, count = flight_nos.len(), "Flight numbers fetched");
    Ok(Json(json!({ "flightNos": flight_nos })))
}

// --- Display view ---

#[derive(Debug, Default, Deserialize)]
struct DisplayParams {
    belt_no: Option<String>,
}

/// A value in both screen languages.
#[derive(Debug, Serialize)]
struct Bilingual<T> {
    english: T,
    indonesian: T,
}

impl<T> Bilingual<T> {
    fn build(f: impl Fn(Language) -> T) -> Self {
        Self {
            english: f(Language::English),
            indonesian: f(Language::Indonesian),
        }
    }
}

/// Everything a stateless screen needs to render one belt; rotation is left to it.
#[derive(Debug, Serialize)]
struct DisplayView {
    belt_no: Option<String>,
    date: String,
    data: DisplayData,
    state: DisplayState,
    airline_code: Option<String>,
    total_pages: usize,
    pages: Vec<Vec<String>>,
    header: Option<Bilingual<HeaderText>>,
    notice: Bilingual<String>,
    fallback: Option<[&'static str; 2]>,
}

async fn display_view(
    State(state): State<AppState>,
    Query(params): Query<DisplayParams>,
) -> Result<Json<DisplayView>, AppError> {
    let belt_no = params.belt_no.filter(|b| !b.trim().is_empty());
    let entries = state.store.list_pagings().await?;
    let data = select_display_data(belt_no.as_deref(), &entries);
    let display_state = DisplayState::from_data(&data);
    let today = Local::now().date_naive();

    let header = match &display_state {
        DisplayState::PassengerList { flight_no, handle_by, .. } if !flight_no.is_empty() => {
            Some(Bilingual::build(|language| header_text(language, flight_no, today, *handle_by)))
        }
        _ => None,
    };
    let has_belt = belt_no.is_some();
    let fallback = matches!(display_state, DisplayState::Fallback { .. }).then_some(FALLBACK_LINES);

    Ok(Json(DisplayView {
        date: format_display_date(today),
        airline_code: data.airline_code().map(str::to_owned),
        total_pages: total_pages(data.names.len()),
        pages: paginate(&data.names),
        header,
        notice: Bilingual::build(|language| notice_text(language, has_belt)),
        fallback,
        state: display_state,
        data,
        belt_no,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging_logic::store::{MemoryStore, Store};
    use paging_common::models::{Handler, STATUS_NO_SHOW, STATUS_SHOW};
    use paging_common::retrieve::{ArrivalsFeed, PagingClient};

    const KEY: &str = "test-key";

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_server(arrivals: Option<ArrivalsFeed>) -> String {
        let station = |id, code: &str, active| Station {
            id_sts: id,
            code_station: code.into(),
            name_station: format!("{code} airport"),
            is_active: active,
        };
        let store = Store::Memory(MemoryStore::with_stations(vec![
            station(1, "SUB", 1),
            station(2, "CGK", 1),
            station(3, "KNO", 0),
        ]));
        serve(router(AppState::new(store, KEY, arrivals))).await
    }

    fn draft(belt: &str, flight: &str, names: &str, free: &str, status: i32) -> PagingDraft {
        PagingDraft {
            belt_no: belt.into(),
            flight_no: flight.into(),
            name_passenger: names.into(),
            free_text: free.into(),
            status,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_paging_lifecycle_with_audit_trail() {
        let base = spawn_server(None).await;
        let client = PagingClient::new(&base, KEY).unwrap();

        let created = client.add_paging(&draft("1", "GA123", "Alice,Bob", "", STATUS_SHOW)).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.handle_by, Handler::Jas);

        let dup = client.add_paging(&draft("1", "SQ956", "Carol", "", STATUS_SHOW)).await.unwrap_err();
        assert_eq!(dup.status(), Some(400));
        assert!(dup.to_string().contains("Belt number 1 is already in use"));

        let mut toggled = created.with_status(STATUS_NO_SHOW).to_draft();
        toggled.free_text = "Delayed".into();
        let ack = client.update_paging(&toggled).await.unwrap();
        assert_eq!(ack, ApiMessage::new("Successfully Updated", 200));
        assert_eq!(client.get_paging(1).await.unwrap().status, STATUS_NO_SHOW);

        assert_eq!(client.search_pagings("ALICE").await.unwrap().len(), 1);
        assert_eq!(client.search_pagings("Zed").await.unwrap_err().status(), Some(404));

        let ack = client.delete_paging(1).await.unwrap();
        assert_eq!(ack, ApiMessage::new("Successfully Deleted", 202));
        assert_eq!(client.delete_paging(1).await.unwrap_err().status(), Some(404));
        assert!(client.get_pagings().await.unwrap().is_empty());

        let logs = client.get_logs().await.unwrap();
        assert_eq!(logs.len(), 3);
        // Newest first: the delete recorded the state just before removal.
        assert_eq!(logs[0].free_text, "Delayed");
        assert_eq!(logs[0].status, STATUS_NO_SHOW);
        assert_eq!(logs[2].status, STATUS_SHOW);
    }

    #[tokio::test]
    async fn test_update_rules() {
        let base = spawn_server(None).await;
        let client = PagingClient::new(&base, KEY).unwrap();
        let one = client.add_paging(&draft("1", "GA1", "A", "", STATUS_SHOW)).await.unwrap();
        client.add_paging(&draft("2", "GA2", "B", "", STATUS_SHOW)).await.unwrap();

        // Keeping its own belt is fine, taking another one is not.
        let mut same = one.to_draft();
        same.name_passenger = "A,C".into();
        client.update_paging(&same).await.unwrap();

        let mut clash = one.to_draft();
        clash.belt_no = "2".into();
        assert_eq!(client.update_paging(&clash).await.unwrap_err().status(), Some(400));

        let mut ghost = one.to_draft();
        ghost.id = Some(99);
        ghost.belt_no = "9".into();
        assert_eq!(client.update_paging(&ghost).await.unwrap_err().status(), Some(404));

        let mut no_id = one.to_draft();
        no_id.id = None;
        assert_eq!(client.update_paging(&no_id).await.unwrap_err().status(), Some(400));
    }

    #[tokio::test]
    async fn test_api_key_and_validation_errors() {
        let base = spawn_server(None).await;
        let wrong = PagingClient::new(&base, "nope").unwrap();
        assert_eq!(wrong.get_pagings().await.unwrap_err().status(), Some(401));

        let http = reqwest::Client::new();
        let response = http.get(format!("{base}/api/logs")).send().await.unwrap();
        assert_eq!(response.status(), 401);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"message": "Invalid API Key", "status": 401}));

        let client = PagingClient::new(&base, KEY).unwrap();
        let err = client.add_paging(&draft("1", "", "Alice", "", STATUS_SHOW)).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("All fields are required"));

        // Open route, no key needed.
        let response = http.get(format!("{base}/api/paging/abc")).send().await.unwrap();
        assert_eq!(response.status(), 400);
        let response = http.get(format!("{base}/api/paging/42")).send().await.unwrap();
        assert_eq!(response.status(), 404);

        let response = http
            .delete(format!("{base}/api/paging"))
            .header(API_KEY_HEADER, KEY)
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let response = http
            .post(format!("{base}/api/paging/search"))
            .json(&json!({"name": "  "}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_users_and_login() {
        let base = spawn_server(None).await;
        let http = reqwest::Client::new();
        let users = format!("{base}/api/users");
        let login = format!("{base}/api/auth/login");

        let new_user = json!({
            "id_sts": 2, "fullname": "Ops One", "username": "ops1",
            "password": "secret", "email": "ops1@example.com", "nohp": "0812"
        });
        let response = http.post(&users).header(API_KEY_HEADER, KEY).json(&new_user).send().await.unwrap();
        assert_eq!(response.status(), 201);
        let created: Value = response.json().await.unwrap();
        assert_eq!(created["id_usr"], json!(1));
        assert_eq!(created["is_active"], json!(1));
        assert!(created.get("password").is_none());

        let response = http.post(&users).header(API_KEY_HEADER, KEY).json(&new_user).send().await.unwrap();
        assert_eq!(response.status(), 400);

        let response = http
            .post(&users)
            .header(API_KEY_HEADER, KEY)
            .json(&json!({"username": "half"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let ok: Value = http
            .post(&login)
            .json(&json!({"username": "ops1", "password": "secret"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(ok["logged_in"], json!("1"));
        assert_eq!(ok["user"]["fullname"], json!("Ops One"));

        let bad: Value = http
            .post(&login)
            .json(&json!({"username": "ops1", "password": "wrong"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(bad, json!({"logged_in": "0", "message": "Invalid username or password"}));

        // Partial update: only the password changes.
        let response = http
            .put(&users)
            .header(API_KEY_HEADER, KEY)
            .json(&json!({"id_usr": 1, "password": "rotated", "fullname": ""}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let updated: Value = response.json().await.unwrap();
        assert_eq!(updated["fullname"], json!("Ops One"));

        let ok: Value = http
            .post(&login)
            .json(&json!({"username": "ops1", "password": "rotated"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(ok["logged_in"], json!("1"));

        // Deactivated users cannot log in.
        http.put(&users)
            .header(API_KEY_HEADER, KEY)
            .json(&json!({"id_usr": 1, "is_active": 0}))
            .send()
            .await
            .unwrap();
        let inactive: Value = http
            .post(&login)
            .json(&json!({"username": "ops1", "password": "rotated"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(inactive["logged_in"], json!("0"));

        let response = http
            .delete(&users)
            .header(API_KEY_HEADER, KEY)
            .json(&json!({"id_usr": 1}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let response = http
            .delete(&users)
            .header(API_KEY_HEADER, KEY)
            .json(&json!({"id_usr": 1}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_stations_are_active_and_sorted() {
        let base = spawn_server(None).await;
        let stations: Vec<Station> = reqwest::Client::new()
            .get(format!("{base}/api/stations"))
            .header(API_KEY_HEADER, KEY)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let codes: Vec<&str> = stations.iter().map(|s| s.code_station.as_str()).collect();
        assert_eq!(codes, ["CGK", "SUB"]);
    }

    async fn spawn_upstream() -> String {
        async fn arrivals(headers: axum::http::HeaderMap) -> (StatusCode, Json<Value>) {
            // "nexus:pw"
            if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Basic bmV4dXM6cHc=") {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad credentials"})));
            }
            (
                StatusCode::OK,
                Json(json!([{"flight_no": "GA410"}, {"flightNo": "QZ7510"}, {"flight_no": "GA410"}])),
            )
        }
        serve(Router::new().route("/feed", get(arrivals))).await
    }

    #[tokio::test]
    async fn test_flight_numbers_proxy() {
        let upstream = format!("{}/feed", spawn_upstream().await);
        let http = reqwest::Client::new();

        let base = spawn_server(Some(ArrivalsFeed::new(&upstream, "nexus", "pw").unwrap())).await;
        let body: Value = http
            .get(format!("{base}/api/flightnos?station=CGK"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({"flightNos": ["GA410", "QZ7510"]}));

        let base = spawn_server(Some(ArrivalsFeed::new(&upstream, "nexus", "nope").unwrap())).await;
        let response = http.get(format!("{base}/api/flightnos")).send().await.unwrap();
        assert_eq!(response.status(), 502);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], json!("Upstream error"));
        assert_eq!(body["status"], json!(401));

        let base = spawn_server(None).await;
        let response = http.get(format!("{base}/api/flightnos")).send().await.unwrap();
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn test_display_view_scenarios() {
        let base = spawn_server(None).await;
        let client = PagingClient::new(&base, KEY).unwrap();
        client.add_paging(&draft("1", "GA123", "Alice,Bob", "", STATUS_SHOW)).await.unwrap();
        client.add_paging(&draft("2", "GA200", "Zed", "Delayed", STATUS_NO_SHOW)).await.unwrap();

        let http = reqwest::Client::new();
        let view = |belt: &'static str| {
            let url = format!("{base}/display?belt_no={belt}");
            let http = http.clone();
            async move { http.get(url).send().await.unwrap().json::<Value>().await.unwrap() }
        };

        let one = view("1").await;
        assert_eq!(one["state"]["kind"], json!("passenger_list"));
        assert_eq!(one["state"]["flight_no"], json!("GA123"));
        assert_eq!(one["pages"], json!([["Alice", "Bob"]]));
        assert_eq!(one["airline_code"], json!("GA"));
        assert_eq!(one["header"]["english"]["title"], json!("ATTENTION"));

        let two = view("2").await;
        assert_eq!(two["state"], json!({"kind": "free_text", "text": "Delayed", "handle_by": "Jas"}));
        assert!(two["header"].is_null());

        let nine = view("9").await;
        assert_eq!(nine["state"], json!({"kind": "fallback", "handle_by": "Jas"}));
        assert_eq!(nine["fallback"][1], json!(FALLBACK_LINES[1]));

        let idle: Value = http.get(format!("{base}/")).send().await.unwrap().json().await.unwrap();
        assert!(idle["belt_no"].is_null());
        assert!(idle["notice"]["english"].as_str().unwrap().contains("ARRIVAL HALL"));
    }
}
