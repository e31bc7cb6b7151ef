//! # SmartCity Explorer API
//!
//! Thin HTTP layer over three storage backends:
//! - PostgreSQL for structured city and score records
//! - MongoDB for free-form user reviews
//! - Neo4j for the similarity graph driving recommendations
//!
//! Control flow is routes → service → repository → store. Each request
//! builds its repositories from the long-lived handles in [`state::State`];
//! nothing request-scoped outlives the call.
//!
//! The stores are populated offline by the `seed` binary, which fully
//! replaces their contents from the flat datasets.

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal::ctrl_c};
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod graph;
pub mod mongo;
pub mod postgres;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

use routes::{
    city_detail_handler, city_scores_handler, create_review_handler, get_reviews_handler,
    health_handler, recommendations_handler, search_cities_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    // The dashboard is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/cities", get(search_cities_handler))
        .route("/cities/{city_id}", get(city_detail_handler))
        .route("/cities/{city_id}/scores", get(city_scores_handler))
        .route(
            "/cities/{city_id}/reviews",
            get(get_reviews_handler).post(create_review_handler),
        )
        .route("/recommendations", get(recommendations_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
