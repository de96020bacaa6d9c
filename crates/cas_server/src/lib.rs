//! HTTP front end for the word-problem solver.
//!
//! | Method | Path     | Body             | Response            |
//! |--------|----------|------------------|---------------------|
//! | GET    | `/`      |                  | `StatusResponse`    |
//! | POST   | `/solve` | `SolveRequest`   | `SolutionResponse`  |
//!
//! Every route answers CORS preflights for any origin.

pub mod config;
pub mod error;
pub mod telemetry;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use cas_api_models::{SolutionResponse, SolveRequest, StatusResponse};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use config::ServerConfig;
pub use error::{ConfigError, ServerError};
pub use telemetry::{init_tracing, LogFormat};

pub const BANNER: &str = "Symbolic Geometry Solver Backend is Running";

#[derive(Debug, Clone)]
pub struct AppState {
    pub max_problem_len: usize,
}

impl From<&ServerConfig> for AppState {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_problem_len: config.max_problem_len,
        }
    }
}

pub fn build_router(config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status))
        .route("/solve", post(solve))
        .with_state(AppState::from(config))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::ok(BANNER))
}

async fn solve(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> Json<SolutionResponse> {
    let problem = request.problem;
    let len = problem.chars().count();
    if len > state.max_problem_len {
        warn!(len, limit = state.max_problem_len, "problem text rejected");
        return Json(SolutionResponse::error(format!(
            "Problem text is too long ({len} characters, limit {})",
            state.max_problem_len
        )));
    }

    info!(problem = %problem, "solve request");
    // Symbolic work is CPU-bound.
    let response = tokio::task::spawn_blocking(move || cas_solver::solve(&problem))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "solver task aborted");
            SolutionResponse::error(format!("Internal error: {e}"))
        });
    Json(response)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "solver listening");

    axum::serve(listener, build_router(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("solver stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
