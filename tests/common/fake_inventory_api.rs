//! Fake inventory endpoint for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1 and serves `GET /output.json` with whatever status and body the
//! test configured. Requests are counted so reload behaviour can be checked.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeInventoryApi::start().await.unwrap();
//! api.set_json(&sample_inventory()).await;
//! let source: Source = api.url().parse().unwrap();
//! ```

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// State shared between the router and test code.
struct ApiState {
    status: u16,
    body: String,
    hits: usize,
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            status: 200,
            body: "{}".to_string(),
            hits: 0,
        }
    }
}

/// Handle to the running fake inventory server.
pub struct FakeInventoryApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeInventoryApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/output.json", get(serve_inventory))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the server (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the inventory document.
    pub fn url(&self) -> String {
        format!("{}/output.json", self.base_url())
    }

    /// Serve `doc` with status 200.
    pub async fn set_json(&self, doc: &Value) {
        let mut state = self.state.lock().await;
        state.status = 200;
        state.body = doc.to_string();
    }

    /// Serve `body` verbatim with `status`.
    pub async fn set_response(&self, status: u16, body: &str) {
        let mut state = self.state.lock().await;
        state.status = status;
        state.body = body.to_string();
    }

    /// Requests served so far.
    pub async fn hits(&self) -> usize {
        self.state.lock().await.hits
    }
}

async fn serve_inventory(State(state): State<Arc<Mutex<ApiState>>>) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.hits += 1;
    let status = StatusCode::from_u16(state.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}
