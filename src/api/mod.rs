mod handlers;

use std::env;
use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{health, map, navigation};

const DEFAULT_PORT: u16 = 8000;

pub async fn serve() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .route("/run-navigation", post(navigation::run))
        .route("/map", get(map::show))
        .route("/health", get(health::check));

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
