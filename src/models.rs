use serde::{Deserialize, Serialize};

/// Number of results shown per page in the list view.
pub const PAGE_SIZE: usize = 5;

/// One request against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub term: String,
    pub page: u32,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, page: u32) -> Self {
        Self {
            term: term.into(),
            page,
        }
    }
}

/// Monotonic tag attached to every in-flight fetch so that a completion can be
/// matched against the request the controller is still waiting for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(u64);

impl RequestTag {
    pub fn next(self) -> Self {
        RequestTag(self.0 + 1)
    }
}

/// A movie as it appears in a result list.
///
/// Search responses only carry id, title, year and poster; `runtime` and
/// `plot` are filled in once the landing set has been enriched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

impl MovieSummary {
    pub fn runtime_label(&self) -> &str {
        self.runtime.as_deref().filter(|r| !r.is_empty()).unwrap_or("N/A")
    }

    pub fn plot_label(&self) -> &str {
        self.plot
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("No plot available.")
    }
}

impl From<&MovieRecord> for MovieSummary {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year.clone(),
            poster: record.poster.clone(),
            runtime: Some(record.runtime.clone()),
            plot: Some(record.plot.clone()),
        }
    }
}

/// Full record returned by the by-id endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Rated", default)]
    pub rated: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Language", default)]
    pub language: String,
}

/// Placeholder review shown under every movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: u32,
    pub author: &'static str,
    pub content: &'static str,
}

/// A window of `PAGE_SIZE` items over the controller's result list.
#[derive(Debug, Clone, Serialize)]
pub struct ResultPage<'a> {
    pub items: &'a [MovieSummary],
    pub page_number: u32,
    pub page_size: usize,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tag_is_monotonic() {
        let first = RequestTag::default();
        let second = first.next();
        assert!(second > first);
        assert!(second.next() > second);
    }

    #[test]
    fn test_summary_labels_fall_back() {
        let summary = MovieSummary {
            id: "tt0000001".to_string(),
            title: "Blank".to_string(),
            year: "1999".to_string(),
            poster: String::new(),
            runtime: None,
            plot: Some(String::new()),
        };
        assert_eq!(summary.runtime_label(), "N/A");
        assert_eq!(summary.plot_label(), "No plot available.");
    }

    #[test]
    fn test_summary_from_record_carries_runtime_and_plot() {
        let record = MovieRecord {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster: "https://example.com/p.jpg".to_string(),
            runtime: "136 min".to_string(),
            plot: "A hacker learns the truth.".to_string(),
            director: "Lana Wachowski, Lilly Wachowski".to_string(),
            actors: "Keanu Reeves".to_string(),
            imdb_rating: "8.7".to_string(),
            genre: "Action, Sci-Fi".to_string(),
            rated: "R".to_string(),
            released: "31 Mar 1999".to_string(),
            language: "English".to_string(),
        };
        let summary = MovieSummary::from(&record);
        assert_eq!(summary.id, "tt0133093");
        assert_eq!(summary.runtime_label(), "136 min");
        assert_eq!(summary.plot_label(), "A hacker learns the truth.");
    }
}
