use crate::error::FetchError;
use crate::models::{MovieRecord, RequestTag, Review};
use crate::omdb::MovieApi;

pub const DETAIL_NETWORK_ERROR: &str = "Network error: Unable to fetch movie details.";
pub const DETAIL_DEFAULT_ERROR: &str = "Movie details are unavailable.";

/// Rewrite an `http://` poster URL to `https://`. Anything else, including
/// the service's `N/A` placeholder, is returned unchanged.
pub fn normalize_poster_url(url: &str) -> String {
    const INSECURE: &str = "http://";
    match url.get(..INSECURE.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(INSECURE) => {
            format!("https://{}", &url[INSECURE.len()..])
        }
        _ => url.to_string(),
    }
}

/// The three reviews shown under every movie.
pub fn placeholder_reviews() -> Vec<Review> {
    vec![
        Review {
            id: 1,
            author: "John Doe",
            content: "An amazing movie! Highly recommended.",
        },
        Review {
            id: 2,
            author: "Jane Smith",
            content: "A thrilling experience from start to finish.",
        },
        Review {
            id: 3,
            author: "Sam Wilson",
            content: "Not what I expected, but still enjoyable.",
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading,
    Loaded(MovieRecord),
    Failed(String),
}

/// A detail fetch the controller is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub tag: RequestTag,
    pub id: String,
}

/// State behind the detail view. Every open is a fresh fetch.
#[derive(Debug)]
pub struct DetailController {
    id: Option<String>,
    state: DetailState,
    reviews: Vec<Review>,
    last_tag: RequestTag,
    pending: Option<RequestTag>,
}

impl Default for DetailController {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailController {
    pub fn new() -> Self {
        Self {
            id: None,
            state: DetailState::Idle,
            reviews: Vec::new(),
            last_tag: RequestTag::default(),
            pending: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn movie(&self) -> Option<&MovieRecord> {
        match &self.state {
            DetailState::Loaded(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DetailState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == DetailState::Loading
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Start loading `id`. Any fetch still in flight becomes stale.
    pub fn begin_load(&mut self, id: &str) -> DetailRequest {
        self.last_tag = self.last_tag.next();
        self.pending = Some(self.last_tag);
        self.id = Some(id.to_string());
        self.state = DetailState::Loading;
        self.reviews = placeholder_reviews();
        DetailRequest {
            tag: self.last_tag,
            id: id.to_string(),
        }
    }

    /// Commit a completed fetch. Returns `false` when `request` is no longer
    /// the latest one.
    pub fn finish_load(
        &mut self,
        request: &DetailRequest,
        outcome: Result<MovieRecord, FetchError>,
    ) -> bool {
        if self.pending != Some(request.tag) {
            tracing::debug!(id = %request.id, "discarding stale detail response");
            return false;
        }
        self.pending = None;

        self.state = match outcome {
            Ok(mut record) => {
                record.poster = normalize_poster_url(&record.poster);
                DetailState::Loaded(record)
            }
            Err(e) if e.is_network() => {
                tracing::warn!(id = %request.id, error = %e, "detail request failed");
                DetailState::Failed(DETAIL_NETWORK_ERROR.to_string())
            }
            Err(e) => {
                tracing::info!(id = %request.id, error = %e, "detail request rejected");
                let message = e.api_message().unwrap_or(DETAIL_DEFAULT_ERROR);
                DetailState::Failed(message.to_string())
            }
        };
        true
    }

    pub async fn load_detail(&mut self, api: &dyn MovieApi, id: &str) {
        let request = self.begin_load(id);
        let outcome = api.movie(&request.id).await;
        self.finish_load(&request, outcome);
    }
}
