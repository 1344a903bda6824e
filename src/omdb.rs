//! Client for the OMDb movie-metadata API.
//!
//! Responses are parsed into typed models at this boundary. OMDb signals
//! failures in-band with `"Response": "False"` and an `Error` message, so the
//! envelope is checked before the payload is deserialized.

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::{MovieRecord, MovieSummary, SearchQuery};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// The subset of the movie service the controllers depend on.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// `?s={term}&page={n}`
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, FetchError>;

    /// `?i={id}`
    async fn movie(&self, id: &str) -> Result<MovieRecord, FetchError>;
}

/// One server-side page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<MovieSummary>,
    pub total_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(rename = "Search", default)]
    search: Vec<MovieSummary>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

pub struct OmdbClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let base_url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| FetchError::Malformed(format!("base URL {}: {}", config.base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .https_only(true)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    async fn get_body(&self, params: &[(&str, &str)]) -> Result<String, FetchError> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "movie service returned an error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, FetchError> {
        tracing::info!(term = %query.term, page = query.page, "searching");
        let page = query.page.to_string();
        let body = self
            .get_body(&[("s", query.term.as_str()), ("page", page.as_str())])
            .await?;
        parse_search(&body)
    }

    async fn movie(&self, id: &str) -> Result<MovieRecord, FetchError> {
        tracing::debug!(id, "fetching movie");
        let body = self.get_body(&[("i", id)]).await?;
        parse_movie(&body)
    }
}

fn parse_envelope(body: &str) -> Result<Value, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let envelope = Envelope::deserialize(&value).map_err(|e| FetchError::Malformed(e.to_string()))?;
    if envelope.response.as_deref() == Some("False") {
        return Err(FetchError::Api(envelope.error));
    }
    Ok(value)
}

/// Parse a search response body.
pub fn parse_search(body: &str) -> Result<SearchPage, FetchError> {
    let value = parse_envelope(body)?;
    let parsed = SearchBody::deserialize(&value).map_err(|e| FetchError::Malformed(e.to_string()))?;
    Ok(SearchPage {
        items: parsed.search,
        total_results: parsed.total_results.and_then(|t| t.parse().ok()),
    })
}

/// Parse a single-record response body.
pub fn parse_movie(body: &str) -> Result<MovieRecord, FetchError> {
    let value = parse_envelope(body)?;
    MovieRecord::deserialize(&value).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_success() {
        let body = r#"{
            "Search": [
                {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "https://m.media-amazon.com/a.jpg"},
                {"Title": "The Batman", "Year": "2022", "imdbID": "tt1877830", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "612",
            "Response": "True"
        }"#;
        let page = parse_search(body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "tt0372784");
        assert_eq!(page.items[1].poster, "N/A");
        assert_eq!(page.items[0].runtime, None);
        assert_eq!(page.total_results, Some(612));
    }

    #[test]
    fn test_parse_search_without_results_array() {
        let page = parse_search(r#"{"Response": "True"}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_results, None);
    }

    #[test]
    fn test_parse_search_api_failure() {
        let err = parse_search(r#"{"Response": "False", "Error": "Too many results."}"#).unwrap_err();
        assert_eq!(err.api_message(), Some("Too many results."));
    }

    #[test]
    fn test_parse_search_shape_mismatch() {
        let err = parse_search(r#"{"Response": "True", "Search": [{"Year": "2005"}]}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let err = parse_search("<html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_parse_movie_success() {
        let body = r#"{
            "Title": "The Matrix", "Year": "1999", "Rated": "R", "Released": "31 Mar 1999",
            "Runtime": "136 min", "Genre": "Action, Sci-Fi", "Director": "Lana Wachowski, Lilly Wachowski",
            "Actors": "Keanu Reeves, Laurence Fishburne", "Plot": "A computer hacker learns the truth.",
            "Language": "English", "Poster": "http://example.com/matrix.jpg",
            "imdbRating": "8.7", "imdbID": "tt0133093", "Response": "True"
        }"#;
        let record = parse_movie(body).unwrap();
        assert_eq!(record.id, "tt0133093");
        assert_eq!(record.imdb_rating, "8.7");
        assert_eq!(record.director, "Lana Wachowski, Lilly Wachowski");
        // Normalization is the detail controller's job, not the parser's.
        assert_eq!(record.poster, "http://example.com/matrix.jpg");
    }

    #[test]
    fn test_parse_movie_not_found() {
        let err = parse_movie(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Api(Some(ref m)) if m == "Movie not found!"));
    }

    #[test]
    fn test_parse_movie_failure_without_message() {
        let err = parse_movie(r#"{"Response":"False"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Api(None)));
    }

    #[test]
    fn test_client_rejects_unparseable_base_url() {
        let config = AppConfig {
            api_key: "k".to_string(),
            base_url: "nope".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(OmdbClient::new(&config), Err(FetchError::Malformed(_))));
    }
}
