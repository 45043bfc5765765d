pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod log_store;
pub mod models;
pub mod routes;
pub mod search;
pub mod templates;
pub mod tmdb;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, log_store::LogStore, tmdb::TmdbClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub store: LogStore,
    pub tmdb: Arc<TmdbClient>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/search", get(routes::search))
        .route("/mylist", get(routes::my_list))
        .route("/movies/{id}", get(routes::movie_detail))
        .route("/movies/{id}/want", post(routes::add_want))
        .route("/movies/{id}/watched", post(routes::mark_watched))
        .route("/movies/{id}/log", post(routes::save_log))
        .route("/movies/{id}/delete", post(routes::delete_entry))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
