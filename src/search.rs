//! Search state machine behind the list view.
//!
//! Transitions are split into `begin_*` (decide what to fetch, flip flags)
//! and `finish_*` (apply a completed fetch). The TUI runs the fetch on a
//! spawned task in between; the async drivers at the bottom run it inline.
//!
//! Paging is asymmetric: with an active term, changing page re-queries the
//! service for that server page; without one, it only moves the cursor over
//! the in-memory landing set.

use crate::error::FetchError;
use crate::models::{MovieRecord, MovieSummary, PAGE_SIZE, RequestTag, ResultPage, SearchQuery};
use crate::omdb::{MovieApi, SearchPage};
use futures_util::future::try_join_all;
use std::ops::Range;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Unable to fetch data.";
pub const LANDING_ERROR_MESSAGE: &str = "Failed to load data.";

/// Number of pages needed for `count` results.
pub fn total_pages(count: usize) -> u32 {
    count.div_ceil(PAGE_SIZE) as u32
}

/// Index range of `page` (1-based) within a list of `count` results.
pub fn page_bounds(page: u32, count: usize) -> Range<usize> {
    let start = (page.max(1) as usize - 1) * PAGE_SIZE;
    let end = start + PAGE_SIZE;
    start.min(count)..end.min(count)
}

/// An explicit search the controller is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub tag: RequestTag,
    pub query: SearchQuery,
}

/// A batch of per-item detail fetches for the landing set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub tag: RequestTag,
    pub ids: Vec<String>,
}

/// What a page change turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    /// Outside `[1, total_pages]`; nothing changed.
    Rejected,
    /// Cursor moved over the landing set.
    Local,
    /// A term is active; the page must be fetched.
    Fetch(SearchRequest),
}

#[derive(Debug, Default)]
pub struct SearchController {
    term: String,
    page: u32,
    landing: Vec<MovieSummary>,
    results: Vec<MovieSummary>,
    loading: bool,
    error: Option<String>,
    showing_landing: bool,
    last_tag: RequestTag,
    pending_search: Option<RequestTag>,
    pending_enrichment: Option<RequestTag>,
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            page: 1,
            showing_landing: true,
            ..Self::default()
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.results.len())
    }

    /// The slice of results for the current page.
    pub fn current_page(&self) -> ResultPage<'_> {
        let bounds = page_bounds(self.page, self.results.len());
        ResultPage {
            items: &self.results[bounds],
            page_number: self.page,
            page_size: PAGE_SIZE,
            total_pages: self.total_pages(),
        }
    }

    fn next_tag(&mut self) -> RequestTag {
        self.last_tag = self.last_tag.next();
        self.last_tag
    }

    // ── Landing set ──

    /// Apply the landing query's outcome. Returns the enrichment batch to run
    /// when there is anything to enrich.
    pub fn finish_landing(
        &mut self,
        outcome: Result<SearchPage, FetchError>,
    ) -> Option<EnrichmentRequest> {
        match outcome {
            Ok(page) => {
                tracing::info!(count = page.items.len(), total = ?page.total_results, "landing set loaded");
                self.landing = page.items;
                if self.showing_landing {
                    self.results = self.landing.clone();
                    self.page = 1;
                }
                if self.landing.is_empty() {
                    return None;
                }
                let tag = self.next_tag();
                self.pending_enrichment = Some(tag);
                Some(EnrichmentRequest {
                    tag,
                    ids: self.landing.iter().map(|m| m.id.clone()).collect(),
                })
            }
            Err(FetchError::Api(message)) => {
                // The service answered but found nothing for the landing term.
                tracing::info!(error = ?message, "landing query returned no results");
                self.landing.clear();
                if self.showing_landing {
                    self.results.clear();
                    self.page = 1;
                }
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "landing set failed to load");
                if self.showing_landing {
                    self.error = Some(LANDING_ERROR_MESSAGE.to_string());
                }
                None
            }
        }
    }

    /// Apply an enrichment batch. Only the visible list is replaced, and only
    /// while it still shows the landing set; the landing snapshot keeps the
    /// raw summaries. Any failure leaves the list untouched.
    pub fn finish_enrichment(
        &mut self,
        tag: RequestTag,
        outcome: Result<Vec<MovieRecord>, FetchError>,
    ) {
        if self.pending_enrichment != Some(tag) {
            tracing::debug!(?tag, "discarding stale enrichment batch");
            return;
        }
        self.pending_enrichment = None;

        match outcome {
            Ok(records) => {
                if self.showing_landing {
                    self.results = records.iter().map(MovieSummary::from).collect();
                }
                tracing::debug!(count = records.len(), "landing set enriched");
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching movie details");
            }
        }
    }

    // ── Explicit search ──

    fn start_fetch(&mut self, query: SearchQuery) -> SearchRequest {
        let tag = self.next_tag();
        self.loading = true;
        self.error = None;
        self.pending_search = Some(tag);
        SearchRequest { tag, query }
    }

    /// Submit `term`. An empty term restores the landing set locally and
    /// returns `None`.
    pub fn begin_search(&mut self, term: &str) -> Option<SearchRequest> {
        self.term = term.to_string();
        if term.is_empty() {
            self.results = self.landing.clone();
            self.page = 1;
            self.error = None;
            self.loading = false;
            self.pending_search = None;
            self.showing_landing = true;
            return None;
        }
        Some(self.start_fetch(SearchQuery::new(term, 1)))
    }

    /// Move to `page`, rejecting anything outside `[1, total_pages]`.
    pub fn request_page(&mut self, page: u32) -> PageChange {
        if page < 1 || page > self.total_pages() {
            return PageChange::Rejected;
        }
        if self.term.is_empty() {
            self.page = page;
            return PageChange::Local;
        }
        PageChange::Fetch(self.start_fetch(SearchQuery::new(self.term.clone(), page)))
    }

    /// Apply a completed search. Returns `false` if `request` was superseded.
    pub fn finish_search(
        &mut self,
        request: &SearchRequest,
        outcome: Result<SearchPage, FetchError>,
    ) -> bool {
        if self.pending_search != Some(request.tag) {
            tracing::debug!(term = %request.query.term, page = request.query.page, "discarding stale search response");
            return false;
        }
        self.pending_search = None;
        self.loading = false;

        match outcome {
            Ok(page) => {
                self.showing_landing = false;
                tracing::debug!(term = %request.query.term, total = ?page.total_results, "search finished");
                self.results = page.items;
                self.page = request.query.page;
            }
            Err(e) if e.is_network() => {
                tracing::warn!(error = %e, "search request failed");
                self.error = Some(NETWORK_ERROR_MESSAGE.to_string());
            }
            Err(e) => {
                tracing::info!(term = %request.query.term, error = %e, "search rejected");
                self.showing_landing = false;
                self.error = Some(e.user_message());
                self.results.clear();
                self.page = request.query.page;
            }
        }
        true
    }

    // ── Inline drivers ──

    /// Load the landing set and run its enrichment batch.
    pub async fn load_landing(&mut self, api: &dyn MovieApi, landing_term: &str) {
        let outcome = api.search(&SearchQuery::new(landing_term, 1)).await;
        if let Some(batch) = self.finish_landing(outcome) {
            let outcome = enrich(api, &batch.ids).await;
            self.finish_enrichment(batch.tag, outcome);
        }
    }

    pub async fn search(&mut self, api: &dyn MovieApi, term: &str) {
        if let Some(request) = self.begin_search(term) {
            let outcome = api.search(&request.query).await;
            self.finish_search(&request, outcome);
        }
    }

    pub async fn change_page(&mut self, api: &dyn MovieApi, page: u32) -> PageChange {
        let change = self.request_page(page);
        if let PageChange::Fetch(request) = &change {
            let outcome = api.search(&request.query).await;
            self.finish_search(request, outcome);
        }
        change
    }
}

/// Fetch every id concurrently; the first failure fails the whole batch.
pub async fn enrich(api: &dyn MovieApi, ids: &[String]) -> Result<Vec<MovieRecord>, FetchError> {
    try_join_all(ids.iter().map(|id| async move {
        api.movie(id)
            .await
            .map_err(|e| FetchError::EnrichmentBatch {
                failed_id: id.clone(),
                source: Box::new(e),
            })
    }))
    .await
}
