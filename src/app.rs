use crate::detail::{DetailController, DetailRequest};
use crate::error::FetchError;
use crate::models::{MovieRecord, RequestTag};
use crate::omdb::{MovieApi, SearchPage};
use crate::search::{self, PageChange, SearchController, SearchRequest};
use crate::ui::feedback::{FeedbackForm, FeedbackResult};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Completions sent back from fetch tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    LandingLoaded(Result<SearchPage, FetchError>),
    Enriched {
        tag: RequestTag,
        outcome: Result<Vec<MovieRecord>, FetchError>,
    },
    SearchFinished {
        request: SearchRequest,
        outcome: Result<SearchPage, FetchError>,
    },
    DetailFinished {
        request: DetailRequest,
        outcome: Result<MovieRecord, FetchError>,
    },
}

/// Main application state.
pub struct App {
    api: Arc<dyn MovieApi>,
    events: UnboundedSender<AppEvent>,
    landing_term: String,

    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    // Search bar
    pub search_input: String,
    pub input_mode: InputMode,

    // List view state
    pub search: SearchController,
    pub list_selected: usize, // Index within the visible page

    // Detail view state
    pub detail: DetailController,
    pub detail_scroll: u16,

    pub feedback: Option<FeedbackForm>,

    // Status message
    pub status_msg: String,
}

impl App {
    pub fn new(api: Arc<dyn MovieApi>, events: UnboundedSender<AppEvent>, landing_term: String) -> Self {
        Self {
            api,
            events,
            landing_term,

            should_quit: false,
            view: View::List,
            show_help: false,

            search_input: String::new(),
            input_mode: InputMode::Normal,

            search: SearchController::new(),
            list_selected: 0,

            detail: DetailController::new(),
            detail_scroll: 0,

            feedback: None,

            status_msg: "Loading movies...".to_string(),
        }
    }

    /// Kick off the landing query.
    pub fn init(&mut self) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let query = crate::models::SearchQuery::new(self.landing_term.clone(), 1);
        tokio::spawn(async move {
            let outcome = api.search(&query).await;
            let _ = events.send(AppEvent::LandingLoaded(outcome));
        });
    }

    /// Apply a completion from a fetch task.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LandingLoaded(outcome) => {
                if let Some(batch) = self.search.finish_landing(outcome) {
                    self.spawn_enrichment(batch.tag, batch.ids);
                }
                self.clamp_selection();
                self.refresh_status();
            }
            AppEvent::Enriched { tag, outcome } => {
                self.search.finish_enrichment(tag, outcome);
            }
            AppEvent::SearchFinished { request, outcome } => {
                if self.search.finish_search(&request, outcome) {
                    self.list_selected = 0;
                    self.refresh_status();
                }
            }
            AppEvent::DetailFinished { request, outcome } => {
                self.detail.finish_load(&request, outcome);
            }
        }
    }

    fn spawn_enrichment(&self, tag: RequestTag, ids: Vec<String>) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = search::enrich(api.as_ref(), &ids).await;
            let _ = events.send(AppEvent::Enriched { tag, outcome });
        });
    }

    fn spawn_search(&self, request: SearchRequest) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = api.search(&request.query).await;
            let _ = events.send(AppEvent::SearchFinished { request, outcome });
        });
    }

    fn spawn_detail(&self, request: DetailRequest) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = api.movie(&request.id).await;
            let _ = events.send(AppEvent::DetailFinished { request, outcome });
        });
    }

    fn refresh_status(&mut self) {
        let count = self.search.results().len();
        self.status_msg = if self.search.term().is_empty() {
            format!("{} movies", count)
        } else {
            format!("{} movies for \"{}\"", count, self.search.term())
        };
    }

    fn clamp_selection(&mut self) {
        let visible = self.search.current_page().items.len();
        if self.list_selected >= visible {
            self.list_selected = visible.saturating_sub(1);
        }
    }

    /// Submit the search bar contents.
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.list_selected = 0;
        match self.search.begin_search(&self.search_input) {
            Some(request) => {
                self.status_msg = format!("Searching for \"{}\"...", request.query.term);
                self.spawn_search(request);
            }
            None => self.refresh_status(),
        }
    }

    /// Jump to `page`; out-of-range pages are ignored.
    pub fn change_page(&mut self, page: u32) {
        match self.search.request_page(page) {
            PageChange::Rejected => {}
            PageChange::Local => {
                self.list_selected = 0;
            }
            PageChange::Fetch(request) => {
                self.list_selected = 0;
                self.status_msg = format!("Loading page {}...", page);
                self.spawn_search(request);
            }
        }
    }

    pub fn next_page(&mut self) {
        self.change_page(self.search.page() + 1);
    }

    pub fn prev_page(&mut self) {
        self.change_page(self.search.page().saturating_sub(1));
    }

    /// Move selection down within the current page.
    pub fn list_next(&mut self) {
        let visible = self.search.current_page().items.len();
        if self.list_selected + 1 < visible {
            self.list_selected += 1;
        }
    }

    /// Move selection up within the current page.
    pub fn list_prev(&mut self) {
        self.list_selected = self.list_selected.saturating_sub(1);
    }

    /// Open the detail view for the currently selected movie.
    pub fn open_detail(&mut self) {
        if self.search.is_loading() || self.search.error().is_some() {
            return;
        }
        let id = match self.search.current_page().items.get(self.list_selected) {
            Some(movie) => movie.id.clone(),
            None => return,
        };
        let request = self.detail.begin_load(&id);
        self.spawn_detail(request);
        self.detail_scroll = 0;
        self.view = View::Detail;
    }

    pub fn close_detail(&mut self) {
        self.view = View::List;
    }

    pub fn toggle_feedback(&mut self) {
        self.feedback = match self.feedback {
            Some(_) => None,
            None => Some(FeedbackForm::new()),
        };
    }

    /// Route a key to the open feedback form.
    pub fn handle_feedback_key(&mut self, key: crossterm::event::KeyEvent) {
        let Some(form) = self.feedback.as_mut() else {
            return;
        };
        match form.handle_key(key) {
            Some(FeedbackResult::Submit(text)) => {
                tracing::info!(feedback = %text, "feedback submitted");
                self.feedback = None;
                self.status_msg = "Thanks for the feedback!".to_string();
            }
            Some(FeedbackResult::Cancel) => {
                self.feedback = None;
            }
            None => {}
        }
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_page_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(20);
    }

    pub fn scroll_page_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(20);
    }
}
