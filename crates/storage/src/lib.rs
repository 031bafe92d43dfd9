use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use shared::domain::{Director, Movie, MovieDraft, MovieId};

/// Shared handle to the in-memory movie collection.
///
/// Insertion order is the only order. Every operation takes the lock once, so
/// compound mutations such as [`MovieStore::replace`] are never observed half
/// applied.
#[derive(Clone, Default)]
pub struct MovieStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    movies: Vec<Movie>,
    next_id: i64,
    // set once an id of i64::MAX has been taken
    ids_exhausted: bool,
}

impl Inner {
    fn position(&self, id: MovieId) -> Option<usize> {
        self.movies.iter().position(|movie| movie.id == id)
    }

    fn allocate_id(&mut self) -> Option<MovieId> {
        if self.ids_exhausted {
            return None;
        }
        let id = self.next_id.max(1);
        self.bump_past(id);
        Some(MovieId(id))
    }

    fn bump_past(&mut self, id: i64) {
        match id.checked_add(1) {
            Some(next) if next > self.next_id => self.next_id = next,
            Some(_) => {}
            None => self.ids_exhausted = true,
        }
    }

    fn push(&mut self, movie: Movie) {
        self.bump_past(movie.id.0);
        self.movies.push(movie);
    }
}

struct SeedMovie {
    id: i64,
    isbn: &'static str,
    title: &'static str,
    director: Option<(&'static str, &'static str)>,
}

const SEED: [SeedMovie; 3] = [
    SeedMovie {
        id: 1,
        isbn: "423847",
        title: "Movie One",
        director: Some(("John", "Doe")),
    },
    SeedMovie {
        id: 2,
        isbn: "294679",
        title: "Second Movie",
        director: Some(("Bob", "Smith")),
    },
    SeedMovie {
        id: 3,
        isbn: "847532",
        title: "Bee Movie",
        director: None,
    },
];

pub fn seed_movies() -> Vec<Movie> {
    SEED.iter()
        .map(|seed| Movie {
            id: MovieId(seed.id),
            isbn: seed.isbn.to_string(),
            title: seed.title.to_string(),
            director: seed
                .director
                .map(|(firstname, lastname)| Director::new(firstname, lastname)),
        })
        .collect()
}

impl MovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self::with_movies(seed_movies())
    }

    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut inner = Inner::default();
        for movie in movies {
            inner.push(movie);
        }
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Snapshot of every movie in insertion order.
    pub async fn list(&self) -> Vec<Movie> {
        self.inner.read().await.movies.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.movies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.movies.is_empty()
    }

    pub async fn find(&self, id: MovieId) -> Option<Movie> {
        let inner = self.inner.read().await;
        inner.position(id).map(|idx| inner.movies[idx].clone())
    }

    /// Appends without checking `id` or `isbn` for duplicates.
    pub async fn append(&self, movie: Movie) {
        self.inner.write().await.push(movie);
    }

    /// Assigns the next free id to `draft` and appends it. Returns `None`
    /// once every positive id above the largest one stored has been used.
    pub async fn insert_draft(&self, draft: MovieDraft) -> Option<Movie> {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id()?;
        let movie = draft.into_movie(id);
        inner.push(movie.clone());
        debug!(movie_id = %id, "movie appended");
        Some(movie)
    }

    /// Removes at most one movie, the first whose id matches.
    pub async fn remove_first_matching(&self, id: MovieId) -> Option<Movie> {
        let mut inner = self.inner.write().await;
        let idx = inner.position(id)?;
        Some(inner.movies.remove(idx))
    }

    /// Drops the first movie with `id` and appends the draft produced by
    /// `build` under the same id at the end of the collection.
    ///
    /// `build` only runs once a match is found, under the write lock. Returns
    /// the whole collection afterwards, `Ok(None)` when nothing matched, or the
    /// error from `build`; in both failure cases the store is left untouched.
    pub async fn replace<E>(
        &self,
        id: MovieId,
        build: impl FnOnce() -> Result<MovieDraft, E>,
    ) -> Result<Option<Vec<Movie>>, E> {
        let mut inner = self.inner.write().await;
        let Some(idx) = inner.position(id) else {
            return Ok(None);
        };
        let draft = build()?;
        inner.movies.remove(idx);
        inner.push(draft.into_movie(id));
        debug!(movie_id = %id, "movie replaced");
        Ok(Some(inner.movies.clone()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
