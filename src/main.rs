//! Interview Prep Backend
//!
//! A REST backend for tracking interview questions, answer attempts, self-reviews,
//! and a personal technology stack, persisted in SQLite.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod search;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Database;
use errors::AppError;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Interview Prep Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    // The pool is created on first use
    let db = Arc::new(Database::from_config(&config));
    if !db.is_configured() {
        tracing::warn!("No DATABASE_URL configured. Data endpoints will fail!");
    }

    let app = create_router(AppState { db });

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Questions
        .route(
            "/questions",
            get(api::list_questions).post(api::create_question),
        )
        .route(
            "/questions/{id}",
            get(api::get_question)
                .put(api::update_question)
                .delete(api::delete_question),
        )
        .route(
            "/questions/{id}/answers",
            get(api::list_question_answers).post(api::create_question_answer),
        )
        // Answers
        .route(
            "/answers/{id}",
            get(api::get_answer)
                .put(api::update_answer)
                .delete(api::delete_answer),
        )
        .route(
            "/answers/{id}/reviews",
            get(api::list_answer_reviews).post(api::create_answer_review),
        )
        // Reviews
        .route(
            "/reviews/{id}",
            get(api::get_review)
                .put(api::update_review)
                .delete(api::delete_review),
        )
        // Tech stack
        .route(
            "/tech-stack",
            get(api::list_tech_stacks).post(api::create_tech_stack),
        )
        .route("/tech-stack/stats", get(api::tech_stack_stats))
        .route(
            "/tech-stack/{id}",
            get(api::get_tech_stack)
                .put(api::update_tech_stack)
                .delete(api::delete_tech_stack),
        )
        .route(
            "/tech-stack/{id}/knowledge",
            get(api::list_knowledge).post(api::create_knowledge),
        )
        // Knowledge notes
        .route(
            "/knowledge/{id}",
            get(api::get_knowledge)
                .put(api::update_knowledge)
                .delete(api::delete_knowledge),
        )
        // Tech notes
        .route("/tech-notes", get(api::list_tech_notes).post(api::create_tech_note))
        .route(
            "/tech-notes/{id}",
            get(api::get_tech_note)
                .put(api::update_tech_note)
                .delete(api::delete_tech_note),
        )
        // GitHub repos
        .route(
            "/github-repos",
            get(api::list_github_repos).post(api::create_github_repo),
        )
        .route(
            "/github-repos/{id}",
            get(api::get_github_repo)
                .put(api::update_github_repo)
                .delete(api::delete_github_repo),
        );

    // Health check never touches the store
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
