//! Mock collaborator services for integration tests
//!
//! One local axum server plays iBL, Playlister, the music metadata service
//! and the Spotify API, answering from the JSON files in `tests/fixtures`.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use epmood::services::{IblClient, MusicClient, PlaylisterClient, SpotifyClient};
use epmood::MoodPipeline;
use epmood_common::SpotifyCredentials;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
/// `Basic base64("test-client:test-secret")`
const EXPECTED_BASIC_AUTH: &str = "Basic dGVzdC1jbGllbnQ6dGVzdC1zZWNyZXQ=";
const ACCESS_TOKEN: &str = "test-token";

type Reply = (StatusCode, Json<Value>);

/// Switches for failure scenarios
#[derive(Default)]
pub struct MockBehaviour {
    /// Answer the token endpoint with 401
    pub reject_token: bool,
    /// Answer every music metadata lookup with 500
    pub fail_music: bool,
    pub requests: Mutex<Vec<String>>,
}

impl MockBehaviour {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

pub struct MockServices {
    pub base_url: String,
    state: Arc<MockBehaviour>,
}

impl MockServices {
    pub async fn start() -> Self {
        Self::start_with(MockBehaviour::default()).await
    }

    pub async fn start_with(behaviour: MockBehaviour) -> Self {
        let state = Arc::new(behaviour);
        let router = Router::new()
            .route("/ibl/v1/episodes/:id", get(episodes))
            .route("/playlister/versions/:id", get(segments))
            .route("/music/records/:id", get(records))
            .route("/spotify/token", post(token))
            .route("/spotify/v1/audio-features/:id", get(audio_features))
            .route("/spotify/v1/audio-analysis/:id", get(audio_analysis))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Requests received so far, as "<resource> <id>"
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn ibl_url(&self) -> String {
        format!("{}/ibl/v1/episodes/{{id}}", self.base_url)
    }

    pub fn playlister_url(&self) -> String {
        format!("{}/playlister/versions/{{id}}", self.base_url)
    }

    pub fn music_url(&self) -> String {
        format!("{}/music/records/{{id}}", self.base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/spotify/token", self.base_url)
    }

    pub fn api_url(&self) -> String {
        format!("{}/spotify/v1", self.base_url)
    }

    /// Pipeline wired to this server over plain HTTP
    pub fn pipeline(&self) -> MoodPipeline {
        MoodPipeline::new(
            Box::new(IblClient::new(self.ibl_url()).unwrap()),
            Box::new(PlaylisterClient::new(self.playlister_url()).unwrap()),
            Box::new(MusicClient::with_client(reqwest::Client::new(), self.music_url())),
            Box::new(SpotifyClient::with_client(
                reqwest::Client::new(),
                SpotifyCredentials {
                    client_id: CLIENT_ID.to_string(),
                    client_secret: CLIENT_SECRET.to_string(),
                },
                self.token_url(),
                self.api_url(),
            )),
        )
    }

    /// Complete TOML configuration pointing at this server
    pub fn config_toml(&self) -> String {
        format!(
            r#"
cert_file = "{cert}"
key_file = "{key}"
spotify_client_id = "{CLIENT_ID}"
spotify_client_secret = "{CLIENT_SECRET}"
music_url = "{music}"
ibl_url = "{ibl}"
playlister_url = "{playlister}"
spotify_token_url = "{token}"
spotify_api_url = "{api}"
timeout_secs = 10
"#,
            cert = fixture_path("client.crt").display(),
            key = fixture_path("client.key").display(),
            music = self.music_url(),
            ibl = self.ibl_url(),
            playlister = self.playlister_url(),
            token = self.token_url(),
            api = self.api_url(),
        )
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> Value {
    let content = std::fs::read_to_string(fixture_path(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

fn not_found(what: &str) -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "status": 404, "message": format!("{} not found", what) } })),
    )
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "invalid_client" })),
    )
}

async fn episodes(
    State(state): State<Arc<MockBehaviour>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    state.record(format!("episode {}", id));

    let filtered = query.get("availability").map(String::as_str) == Some("all")
        && query.get("mixin").map(String::as_str) == Some("live");
    if !filtered {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing availability/mixin" })),
        );
    }

    match id.as_str() {
        "epid1" => ok(fixture("episode.json")),
        "noversion" => ok(json!({ "episodes": [{ "id": "noversion", "versions": [] }] })),
        "silent" => ok(json!({ "episodes": [{ "versions": [{ "id": "vpid-silent" }] }] })),
        "slashed" => ok(json!({ "episodes": [{ "versions": [{ "id": "vpid/2?x#y" }] }] })),
        "broken" => (StatusCode::OK, Json(json!("not an episode list"))),
        _ => ok(json!({ "episodes": [] })),
    }
}

async fn segments(State(state): State<Arc<MockBehaviour>>, Path(id): Path<String>) -> Reply {
    state.record(format!("segments {}", id));

    match id.as_str() {
        "vpid1" => ok(fixture("segments.json")),
        _ => ok(json!({ "segments": [] })),
    }
}

async fn records(State(state): State<Arc<MockBehaviour>>, Path(id): Path<String>) -> Reply {
    state.record(format!("record {}", id));

    if state.fail_music {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "upstream unavailable" })),
        );
    }

    match id.as_str() {
        "rec1" => ok(fixture("record_rec1.json")),
        "rec2" => ok(fixture("record_rec2.json")),
        _ => not_found("record"),
    }
}

async fn token(
    State(state): State<Arc<MockBehaviour>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Reply {
    state.record("token".to_string());

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(EXPECTED_BASIC_AUTH);
    let grant = form.get("grant_type").map(String::as_str) == Some("client_credentials");

    if state.reject_token || !authorized || !grant {
        return unauthorized();
    }

    ok(json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600
    }))
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", ACCESS_TOKEN);
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str())
}

async fn audio_features(
    State(state): State<Arc<MockBehaviour>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    state.record(format!("features {}", id));

    if !bearer_ok(&headers) {
        return unauthorized();
    }
    match id.as_str() {
        "tid1" => ok(fixture("audio_features.json")),
        _ => not_found("audio features"),
    }
}

async fn audio_analysis(
    State(state): State<Arc<MockBehaviour>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    state.record(format!("analysis {}", id));

    if !bearer_ok(&headers) {
        return unauthorized();
    }
    match id.as_str() {
        "tid1" => ok(fixture("audio_analysis.json")),
        _ => not_found("analysis"),
    }
}
