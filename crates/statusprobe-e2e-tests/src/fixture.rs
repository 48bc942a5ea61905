use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use garde::Validate as _;
use statusprobe_types::status::{CreateStatusCheck, DEFAULT_GREETING, Greeting, StatusCheck};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::{
    sync::{RwLock, oneshot},
    task::JoinHandle,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, error};
use url::Url;

/// Knobs to make the fixture backend break the contract in specific ways.
#[derive(Debug, Clone)]
pub struct FixtureOptions {
    pub greeting: String,
    pub cors: bool,
    /// When false, created records are echoed back but never stored.
    pub persist: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        FixtureOptions {
            greeting: DEFAULT_GREETING.to_string(),
            cors: true,
            persist: true,
        }
    }
}

#[derive(Clone)]
struct FixtureState {
    options: Arc<FixtureOptions>,
    records: Arc<RwLock<Vec<StatusCheck>>>,
    requests: Arc<AtomicUsize>,
}

/// In-process backend serving the status check API on an ephemeral port.
///
/// Shuts down when dropped.
pub struct FixtureServer {
    base_url: Url,
    state: FixtureState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureServer {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub async fn records(&self) -> Vec<StatusCheck> {
        self.state.records.read().await.clone()
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_fixture(options: FixtureOptions) -> Result<FixtureServer> {
    let state = FixtureState {
        options: Arc::new(options),
        records: Arc::new(RwLock::new(Vec::new())),
        requests: Arc::new(AtomicUsize::new(0)),
    };
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let base_url = Url::parse(&format!("http://{}", addr))?;
    debug!("Fixture backend listening on {}", addr);

    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let shutdown = async {
            let _ = rx.await;
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!("Fixture backend failed: {}", e);
        }
    });

    Ok(FixtureServer {
        base_url,
        state,
        shutdown: Some(tx),
        handle: Some(handle),
    })
}

fn router(state: FixtureState) -> Router<()> {
    let mut router = Router::new()
        .route("/api/", get(root))
        .route("/api/status", get(list_status_checks).post(create_status_check));

    if state.options.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state)
}

async fn count_requests(State(state): State<FixtureState>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

async fn root(State(state): State<FixtureState>) -> Json<Greeting> {
    Json(Greeting {
        message: state.options.greeting.clone(),
    })
}

async fn create_status_check(
    State(state): State<FixtureState>,
    Json(payload): Json<CreateStatusCheck>,
) -> Result<Json<StatusCheck>, Response> {
    if let Err(e) = payload.validate() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response());
    }
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response())?;
    let record = StatusCheck {
        id: uuid::Uuid::new_v4().to_string(),
        client_name: payload.client_name,
        timestamp,
    };
    if state.options.persist {
        state.records.write().await.push(record.clone());
    }
    Ok(Json(record))
}

async fn list_status_checks(State(state): State<FixtureState>) -> Json<Vec<StatusCheck>> {
    Json(state.records.read().await.clone())
}
