#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use photo_wall::{app::App, client::HttpWallApi, config::Config, letter::{Letter, RetryPolicy}};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub created_by: String,
    pub caption: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
pub struct BackendState {
    pub photos: Vec<Value>,
    pub speeches: Vec<Value>,
    pub uploads: Vec<ReceivedUpload>,
    /// "METHOD /path" for every request served.
    pub requests: Vec<String>,
    /// Remaining forced failures per speech id.
    pub delete_failures: HashMap<String, usize>,
    pub fail_images: bool,
    next_id: u64,
}

pub type Shared = Arc<Mutex<BackendState>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    /// Serves the fake API under `/api` on an ephemeral port.
    pub async fn start(photos: Vec<Value>, speeches: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            photos,
            speeches,
            next_id: 1000,
            ..Default::default()
        }));

        let api = Router::new()
            .route("/images", get(list_images).post(create_image))
            .route("/speeches", get(list_speeches))
            .route("/speeches/{id}", delete(delete_speech))
            .with_state(state.clone());
        let app = Router::new().nest("/api", api).layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeBackend {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn config(&self) -> Config {
        let base_url = self.base_url.clone();
        Config::from_lookup(move |key| match key {
            "WALL_API_URL" => Some(base_url.clone()),
            "WALL_FLIP_DELAY_MS" | "WALL_SUCCESS_DELAY_MS" => Some("0".into()),
            "WALL_REQUEST_TIMEOUT_SECS" => Some("5".into()),
            "WALL_VIEWPORT_WIDTH" => Some("1280".into()),
            _ => None,
        })
        .unwrap()
    }

    pub fn client(&self) -> HttpWallApi {
        let config = self.config();
        HttpWallApi::new(config.api_url, config.request_timeout).unwrap()
    }

    /// An app wired to this backend with a fast retry policy, already mounted.
    pub async fn app(&self) -> App {
        let config = self.config();
        let letter = Letter::new(Duration::ZERO, Duration::from_secs(1)).with_retry_policy(RetryPolicy {
            initial_interval: Duration::from_millis(5),
            max_interval: Duration::from_millis(20),
            max_elapsed: Duration::from_millis(300),
        });
        let mut app = App::new(Arc::new(self.client()), &config).with_letter(letter);
        app.mount().await;
        app
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_matching(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.starts_with(prefix))
            .collect()
    }

    pub fn fail_delete(&self, id: &str, times: usize) {
        self.state
            .lock()
            .unwrap()
            .delete_failures
            .insert(id.to_string(), times);
    }

    pub fn fail_images(&self, fail: bool) {
        self.state.lock().unwrap().fail_images = fail;
    }

    pub fn speech_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .speeches
            .iter()
            .map(|s| id_of(s))
            .collect()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }
}

pub fn photo(id: u64, url: &str, caption: &str) -> Value {
    json!({ "id": id, "imageUrl": url, "caption": caption, "createdBy": "tester" })
}

pub fn speech(id: u64, header: &str) -> Value {
    json!({ "id": id, "header": header, "content": format!("{header}\nsecond line"), "from": "friend" })
}

fn id_of(value: &Value) -> String {
    match &value["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn list_images(State(state): State<Shared>) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    state.requests.push("GET /images".into());
    if state.fail_images {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })));
    }
    (StatusCode::OK, Json(Value::Array(state.photos.clone())))
}

async fn create_image(State(state): State<Shared>, mut multipart: Multipart) -> impl IntoResponse {
    let mut created_by = None;
    let mut caption = None;
    let mut file = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "createdBy" => created_by = field.text().await.ok(),
            "caption" => caption = field.text().await.ok(),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
                file = Some((file_name, content_type, size));
            }
            _ => {}
        }
    }

    let mut state = state.lock().unwrap();
    state.requests.push("POST /images".into());
    let (Some(created_by), Some(caption), Some((file_name, content_type, size))) = (created_by, caption, file) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "missing field" })));
    };

    state.next_id += 1;
    let id = state.next_id;
    let record = json!({
        "id": id,
        "imageUrl": format!("https://cdn.example/{file_name}"),
        "caption": caption,
        "createdBy": created_by,
    });
    state.photos.push(record.clone());
    state.uploads.push(ReceivedUpload {
        created_by,
        caption,
        file_name,
        content_type,
        size,
    });
    (StatusCode::CREATED, Json(record))
}

async fn list_speeches(State(state): State<Shared>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.requests.push("GET /speeches".into());
    Json(Value::Array(state.speeches.clone()))
}

async fn delete_speech(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut state = state.lock().unwrap();
    state.requests.push(format!("DELETE /speeches/{id}"));

    if let Some(remaining) = state.delete_failures.get_mut(&id) {
        if *remaining > 0 {
            *remaining -= 1;
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    let before = state.speeches.len();
    state.speeches.retain(|s| id_of(s) != id);
    if state.speeches.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}
