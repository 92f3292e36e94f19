//! User Service Library
//!
//! A layered CRUD service for users:
//!
//! - **controller**: process boundary (plain methods and HTTP routes)
//! - **service**: use cases, delegating to the repository
//! - **repository**: persistence contract and in-memory store
//! - **domain**: the `User` entity
//!
//! Dependencies only point downwards. The crate root is the composition
//! root and is the one place that wires the layers together.

pub mod config;
pub mod controller;
pub mod domain;
pub mod repository;
pub mod service;

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use common::{AppError, AppResult};

use crate::config::UserServiceConfig;
use crate::controller::UserController;
use crate::repository::{InMemoryUserRepository, UserRepository};
use crate::service::DefaultUserService;

/// Wire repository -> service -> controller.
pub fn build_controller(repo: Arc<dyn UserRepository>) -> Arc<UserController> {
    let user_service = Arc::new(DefaultUserService::new(repo));
    Arc::new(UserController::new(user_service))
}

/// Create the application router with all routes configured
pub fn create_router(controller: Arc<UserController>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/user", controller::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(controller)
}

/// Router backed by a fresh in-memory repository.
pub fn app() -> Router {
    create_router(build_controller(Arc::new(InMemoryUserRepository::new())))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run(config: UserServiceConfig) -> AppResult<()> {
    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("{} listening on http://{}", config.server.service_name, addr);

    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
