use shared::{
    domain::{Movie, MovieDraft, MovieId},
    error::ApiError,
};
use storage::MovieStore;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ApiContext {
    pub store: MovieStore,
}

impl ApiContext {
    pub fn new(store: MovieStore) -> Self {
        Self { store }
    }
}

pub fn movies_route() -> &'static str {
    "/movies"
}

pub fn movie_route() -> &'static str {
    "/movies/:id"
}

pub fn parse_movie_id(raw: &str) -> Result<MovieId, ApiError> {
    raw.parse::<i64>()
        .map(MovieId)
        .map_err(|_| ApiError::validation(format!("invalid movie id '{raw}'")))
}

pub fn decode_draft(body: &[u8]) -> Result<MovieDraft, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("invalid movie body: {e}")))
}

pub async fn list_movies(ctx: &ApiContext) -> Vec<Movie> {
    ctx.store.list().await
}

pub async fn get_movie(ctx: &ApiContext, raw_id: &str) -> Result<Movie, ApiError> {
    let id = parse_movie_id(raw_id)?;
    ctx.store
        .find(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("movie {id} not found")))
}

pub async fn create_movie(ctx: &ApiContext, body: &[u8]) -> Result<Movie, ApiError> {
    let draft = decode_draft(body)?;
    let movie = ctx
        .store
        .insert_draft(draft)
        .await
        .ok_or_else(|| ApiError::internal("movie id space exhausted"))?;
    info!(movie_id = %movie.id, title = %movie.title, "movie created");
    Ok(movie)
}

/// Replaces the movie at `raw_id` with the decoded body and returns the whole
/// collection. An unknown id is reported before the body is looked at, and a
/// bad body never loses the existing entry.
pub async fn update_movie(
    ctx: &ApiContext,
    raw_id: &str,
    body: &[u8],
) -> Result<Vec<Movie>, ApiError> {
    let id = parse_movie_id(raw_id)?;
    let movies = ctx
        .store
        .replace(id, || decode_draft(body))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("movie {id} not found")))?;
    info!(movie_id = %id, "movie updated");
    Ok(movies)
}

/// Deleting an id that is not present is not an error.
pub async fn delete_movie(ctx: &ApiContext, raw_id: &str) -> Result<Option<Movie>, ApiError> {
    let id = parse_movie_id(raw_id)?;
    let removed = ctx.store.remove_first_matching(id).await;
    match &removed {
        Some(_) => info!(movie_id = %id, "movie deleted"),
        None => debug!(movie_id = %id, "delete matched nothing"),
    }
    Ok(removed)
}
