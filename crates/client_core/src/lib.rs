use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::domain::{Movie, MovieDraft, MovieId};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Typed client for the `/movies` HTTP surface.
#[derive(Clone)]
pub struct MoviesClient {
    http: Client,
    base_url: Url,
}

impl MoviesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let res = send(self.http.get(self.url("/movies")?)).await?;
        decode(res).await
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        let res = send(self.http.get(self.url(&format!("/movies/{id}"))?)).await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(res).await.map(Some)
    }

    pub async fn create_movie(&self, draft: &MovieDraft) -> Result<Movie> {
        let res = send(self.http.post(self.url("/movies")?).json(draft)).await?;
        decode(res).await
    }

    /// Returns the whole collection after the update, or `None` if `id` is unknown.
    pub async fn update_movie(&self, id: MovieId, draft: &MovieDraft) -> Result<Option<Vec<Movie>>> {
        let res = send(
            self.http
                .put(self.url(&format!("/movies/{id}"))?)
                .json(draft),
        )
        .await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(res).await.map(Some)
    }

    pub async fn delete_movie(&self, id: MovieId) -> Result<()> {
        let res = send(self.http.delete(self.url(&format!("/movies/{id}"))?)).await?;
        ensure_success(res.status())
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    let res = request.send().await?;
    debug!(status = %res.status(), url = %res.url(), "movies api response");
    Ok(res)
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T> {
    ensure_success(res.status())?;
    Ok(res.json().await?)
}

fn ensure_success(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Status(status))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
