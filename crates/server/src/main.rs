use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use server_api::{
    create_movie, delete_movie, get_movie, list_movies, movie_route, movies_route, update_movie,
    ApiContext,
};
use shared::{
    domain::Movie,
    error::{ApiError, ErrorCode},
};
use storage::MovieStore;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, Settings};

fn json_content_type() -> [(HeaderName, &'static str); 1] {
    [(header::CONTENT_TYPE, "application/json")]
}

/// Error responses carry only a status code; the message goes to the log.
struct HttpError(ApiError);

impl From<ApiError> for HttpError {
    fn from(value: ApiError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.0.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Validation => StatusCode::BAD_REQUEST,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(code = ?self.0.code, message = %self.0.message, "request failed");
        } else {
            warn!(code = ?self.0.code, message = %self.0.message, "request rejected");
        }
        (status, json_content_type()).into_response()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = settings.socket_addr()?;
    let store = MovieStore::seeded();
    let seeded = store.len().await;
    info!(movies = seeded, "movie store seeded");

    let state = AppState {
        api: ApiContext::new(store),
    };
    let app = build_router(Arc::new(state), &settings);

    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, settings: &Settings) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(movies_route(), get(http_list_movies).post(http_create_movie))
        .route(
            movie_route(),
            get(http_get_movie)
                .put(http_update_movie)
                .delete(http_delete_movie),
        )
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_movies(State(state): State<Arc<AppState>>) -> Json<Vec<Movie>> {
    Json(list_movies(&state.api).await)
}

async fn http_get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, HttpError> {
    let movie = get_movie(&state.api, &id).await?;
    Ok(Json(movie))
}

async fn http_create_movie(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Movie>, HttpError> {
    let movie = create_movie(&state.api, &body).await?;
    Ok(Json(movie))
}

async fn http_update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Vec<Movie>>, HttpError> {
    let movies = update_movie(&state.api, &id, &body).await?;
    Ok(Json(movies))
}

async fn http_delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    delete_movie(&state.api, &id).await?;
    Ok((StatusCode::OK, json_content_type()))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
