use super::*;

use std::convert::Infallible;

fn draft(isbn: &str, title: &str) -> MovieDraft {
    MovieDraft {
        isbn: isbn.into(),
        title: title.into(),
        director: None,
    }
}

fn ready(draft: MovieDraft) -> impl FnOnce() -> Result<MovieDraft, Infallible> {
    move || Ok(draft)
}

async fn insert(store: &MovieStore, isbn: &str, title: &str) -> Movie {
    store
        .insert_draft(draft(isbn, title))
        .await
        .expect("id available")
}

fn ids(movies: &[Movie]) -> Vec<i64> {
    movies.iter().map(|movie| movie.id.0).collect()
}

#[tokio::test]
async fn seeded_store_lists_three_movies_in_order() {
    let store = MovieStore::seeded();
    let movies = store.list().await;
    assert_eq!(ids(&movies), vec![1, 2, 3]);
    assert_eq!(movies[2].title, "Bee Movie");
    assert!(movies[2].director.is_none());
}

#[tokio::test]
async fn find_returns_first_match() {
    let store = MovieStore::seeded();
    store
        .append(draft("dup", "Duplicate Two").into_movie(MovieId(2)))
        .await;

    let movie = store.find(MovieId(2)).await.expect("movie");
    assert_eq!(movie.title, "Second Movie");
    assert_eq!(movie.director, Some(Director::new("Bob", "Smith")));
    assert!(store.find(MovieId(999)).await.is_none());
}

#[tokio::test]
async fn insert_draft_assigns_fresh_nonzero_ids() {
    let store = MovieStore::seeded();
    let first = insert(&store, "111", "New").await;
    let second = insert(&store, "222", "Newer").await;

    assert_eq!(first.id, MovieId(4));
    assert_eq!(second.id, MovieId(5));
    assert_eq!(ids(&store.list().await), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn empty_store_starts_ids_at_one() {
    let store = MovieStore::new();
    assert!(store.is_empty().await);
    let movie = insert(&store, "111", "New").await;
    assert_eq!(movie.id, MovieId(1));
}

#[tokio::test]
async fn appended_ids_push_the_counter_forward() {
    let store = MovieStore::seeded();
    store.append(draft("x", "Manual").into_movie(MovieId(50))).await;
    let movie = insert(&store, "y", "Assigned").await;
    assert_eq!(movie.id, MovieId(51));
}

#[tokio::test]
async fn remove_first_matching_removes_a_single_entry() {
    let store = MovieStore::seeded();
    store.append(draft("dup", "Again").into_movie(MovieId(1))).await;

    let removed = store.remove_first_matching(MovieId(1)).await.expect("removed");
    assert_eq!(removed.title, "Movie One");
    assert_eq!(ids(&store.list().await), vec![2, 3, 1]);

    assert!(store.remove_first_matching(MovieId(999)).await.is_none());
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn replace_moves_entry_to_the_end() {
    let store = MovieStore::seeded();
    let movies = store
        .replace(MovieId(1), ready(draft("000", "Changed")))
        .await
        .expect("infallible")
        .expect("replaced");

    assert_eq!(ids(&movies), vec![2, 3, 1]);
    assert_eq!(movies[2].title, "Changed");
    assert!(movies[2].director.is_none());
    assert_eq!(store.list().await, movies);
}

#[tokio::test]
async fn replace_of_missing_id_leaves_store_untouched() {
    let store = MovieStore::seeded();
    let replaced = store
        .replace(MovieId(999), ready(draft("0", "x")))
        .await
        .expect("infallible");
    assert!(replaced.is_none());
    assert_eq!(store.list().await, seed_movies());
}

#[tokio::test]
async fn replace_skips_the_builder_when_nothing_matches() {
    let store = MovieStore::seeded();
    let replaced = store
        .replace(MovieId(999), || -> Result<MovieDraft, &str> {
            panic!("builder must not run for a missing id")
        })
        .await
        .expect("no builder error");
    assert!(replaced.is_none());
}

#[tokio::test]
async fn failed_builder_keeps_the_existing_entry() {
    let store = MovieStore::seeded();
    let err = store
        .replace(MovieId(1), || Err("bad body"))
        .await
        .expect_err("builder error");
    assert_eq!(err, "bad body");
    assert_eq!(store.list().await, seed_movies());
}

#[tokio::test]
async fn largest_id_does_not_wrap_the_counter() {
    let store = MovieStore::seeded();
    store
        .append(draft("max", "Last").into_movie(MovieId(i64::MAX)))
        .await;

    assert!(store.insert_draft(draft("111", "New")).await.is_none());
    assert_eq!(ids(&store.list().await), vec![1, 2, 3, i64::MAX]);
}

#[tokio::test]
async fn counter_hands_out_the_largest_id_once() {
    let store = MovieStore::with_movies([draft("x", "Near").into_movie(MovieId(i64::MAX - 1))]);
    let last = insert(&store, "y", "Last").await;
    assert_eq!(last.id, MovieId(i64::MAX));
    assert!(store.insert_draft(draft("z", "Over")).await.is_none());
}

#[tokio::test]
async fn clones_share_the_same_collection() {
    let store = MovieStore::seeded();
    let handle = store.clone();
    insert(&handle, "111", "New").await;
    assert_eq!(store.len().await, 4);
}

#[tokio::test]
async fn concurrent_inserts_never_share_an_id() {
    let store = MovieStore::seeded();
    let tasks: Vec<_> = (0..32)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move { insert(&store, &n.to_string(), "Race").await })
        })
        .collect();

    let mut assigned = Vec::new();
    for task in tasks {
        assigned.push(task.await.expect("join").id.0);
    }
    assigned.sort_unstable();
    assigned.dedup();
    assert_eq!(assigned.len(), 32);
    assert_eq!(store.len().await, 35);
}
