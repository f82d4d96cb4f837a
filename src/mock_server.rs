//! In-process camera server used by the tests.

use axum::{extract::State, http::StatusCode, http::Uri, Router};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub path: String,
    pub query: Vec<(String, String)>,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    replies: Arc<Mutex<HashMap<String, Reply>>>,
}

pub struct MockCameraServer {
    state: MockState,
    base_url: Url,
}

impl MockCameraServer {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: Url::parse(&format!("http://{}/", addr)).unwrap(),
        }
    }

    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Answer `path` with `status` and `body` instead of `200 OK`.
    pub fn reply(&self, path: &str, status: u16, body: &str) {
        self.reply_after(path, status, body, Duration::ZERO);
    }

    pub fn reply_after(&self, path: &str, status: u16, body: &str, delay: Duration) {
        self.state.replies.lock().unwrap().insert(
            path.to_string(),
            Reply {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
                delay,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle(State(state): State<MockState>, uri: Uri) -> (StatusCode, String) {
    let url = Url::parse(&format!("http://mock{}", uri)).unwrap();
    let path = url.path().trim_start_matches('/').to_string();
    let query = url.query_pairs().into_owned().collect();

    state.requests.lock().unwrap().push(Recorded {
        path: path.clone(),
        query,
    });

    let reply = state.replies.lock().unwrap().get(&path).cloned();
    match reply {
        Some(reply) => {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            (reply.status, reply.body)
        }
        None => (StatusCode::OK, "OK".to_string()),
    }
}
