//! In-memory `MovieApi` for controller and app tests.

use crate::error::{FetchError, network_error};
use crate::models::{MovieRecord, MovieSummary, SearchQuery};
use crate::omdb::{MovieApi, SearchPage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted answer for one request.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Api(Option<String>),
    Network,
    Malformed,
}

impl<T> Reply<T> {
    async fn into_result(self) -> Result<T, FetchError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Api(message) => Err(FetchError::Api(message)),
            Reply::Network => Err(network_error().await),
            Reply::Malformed => Err(FetchError::Malformed("scripted".to_string())),
        }
    }
}

pub fn record(n: u32) -> MovieRecord {
    MovieRecord {
        id: format!("tt{:07}", n),
        title: format!("Movie {}", n),
        year: format!("{}", 1990 + n),
        poster: format!("https://img.example.com/{}.jpg", n),
        runtime: format!("{} min", 100 + n),
        plot: format!("Plot of movie {}.", n),
        director: "Someone".to_string(),
        actors: "Actor A, Actor B".to_string(),
        imdb_rating: "7.0".to_string(),
        genre: "Drama".to_string(),
        rated: "PG".to_string(),
        released: "01 Jan 2000".to_string(),
        language: "English".to_string(),
    }
}

pub fn summary(n: u32) -> MovieSummary {
    let record = record(n);
    MovieSummary {
        id: record.id,
        title: record.title,
        year: record.year,
        poster: record.poster,
        runtime: None,
        plot: None,
    }
}

pub fn summaries(range: RangeInclusive<u32>) -> Vec<MovieSummary> {
    range.map(summary).collect()
}

/// Searches answer only what was scripted (anything else is "Movie not
/// found!"); movies fall back to `record(n)` for ids shaped like `tt{n}`.
#[derive(Default)]
pub struct FakeApi {
    searches: Mutex<HashMap<(String, u32), Reply<Vec<MovieSummary>>>>,
    movies: Mutex<HashMap<String, Reply<MovieRecord>>>,
    search_calls: AtomicUsize,
    movie_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(self, term: &str, page: u32, reply: Reply<Vec<MovieSummary>>) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert((term.to_string(), page), reply);
        self
    }

    pub fn with_movie(self, id: &str, reply: Reply<MovieRecord>) -> Self {
        self.movies.lock().unwrap().insert(id.to_string(), reply);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn movie_calls(&self) -> usize {
        self.movie_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, FetchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .searches
            .lock()
            .unwrap()
            .get(&(query.term.clone(), query.page))
            .cloned()
            .unwrap_or_else(|| Reply::Api(Some("Movie not found!".to_string())));
        let items = reply.into_result().await?;
        Ok(SearchPage {
            total_results: Some(items.len() as u32),
            items,
        })
    }

    async fn movie(&self, id: &str) -> Result<MovieRecord, FetchError> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.movies.lock().unwrap().get(id).cloned();
        let reply = scripted.unwrap_or_else(|| {
            match id.strip_prefix("tt").and_then(|n| n.parse().ok()) {
                Some(n) => Reply::Ok(record(n)),
                None => Reply::Api(Some("Incorrect IMDb ID.".to_string())),
            }
        });
        reply.into_result().await
    }
}
