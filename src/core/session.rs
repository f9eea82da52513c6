//! In-memory state of one user's search session.
//!
//! Transitions:
//!
//! | From                    | Event                 | To            |
//! |-------------------------|-----------------------|---------------|
//! | any                     | submit (non-empty)    | Searching     |
//! | Searching               | search ok             | Results       |
//! | Searching               | search failed         | Idle          |
//! | Results, DetailShown    | select recipe         | DetailLoading |
//! | DetailLoading           | detail ok             | DetailShown   |
//! | DetailLoading           | detail failed         | Results       |
//! | DetailLoading, Shown    | close                 | Results       |
//!
//! Every request carries a [`RequestToken`]. A completion whose token is not
//! the latest one issued for its kind is stale and leaves the state alone.

use crate::models::{FilterKey, RecipeDetail, RecipeSummary, SearchFilters};
use crate::services::proxy_client::{ClientError, ProxyClient};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Results,
    DetailLoading,
    DetailShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Search,
    Detail,
}

/// Identifies one issued request; sequence numbers only grow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub kind: RequestKind,
    pub seq: u64,
}

/// What the caller should send for a search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub query: String,
    pub filters: SearchFilters,
}

/// What the caller should fetch for a detail view
#[derive(Debug, Clone, Copy)]
pub struct DetailRequest {
    pub token: RequestToken,
    pub id: i64,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Info,
    Destructive,
}

/// Transient toast for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Info,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Search term is empty")]
    EmptyQuery,

    #[error("Cannot {action} while {from:?}")]
    InvalidTransition { from: Phase, action: &'static str },
}

#[derive(Debug)]
pub struct SearchSession {
    input_query: String,
    submitted_query: Option<String>,
    filters: SearchFilters,
    results: Vec<RecipeSummary>,
    selected: Option<RecipeDetail>,
    phase: Phase,
    notifications: VecDeque<Notification>,
    last_seq: u64,
    pending_search: Option<RequestToken>,
    pending_detail: Option<RequestToken>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            input_query: String::new(),
            submitted_query: None,
            filters: SearchFilters::default(),
            results: Vec::new(),
            selected: None,
            phase: Phase::Idle,
            notifications: VecDeque::new(),
            last_seq: 0,
            pending_search: None,
            pending_detail: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input_query(&self) -> &str {
        &self.input_query
    }

    /// Last query that was actually submitted
    pub fn submitted_query(&self) -> Option<&str> {
        self.submitted_query.as_deref()
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn results(&self) -> &[RecipeSummary] {
        &self.results
    }

    pub fn selected(&self) -> Option<&RecipeDetail> {
        self.selected.as_ref()
    }

    pub fn is_searching(&self) -> bool {
        self.phase == Phase::Searching
    }

    pub fn is_loading_detail(&self) -> bool {
        self.phase == Phase::DetailLoading
    }

    pub fn set_input_query(&mut self, query: impl Into<String>) {
        self.input_query = query.into();
    }

    pub fn set_filter(&mut self, key: FilterKey, value: Option<String>) {
        self.filters.set(key, value);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Take all queued notifications, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn next_token(&mut self, kind: RequestKind) -> RequestToken {
        self.last_seq += 1;
        RequestToken {
            kind,
            seq: self.last_seq,
        }
    }

    /// Submit the current input. Blank input only queues a hint.
    pub fn begin_search(&mut self) -> Result<SearchRequest, SessionError> {
        if self.input_query.trim().is_empty() {
            self.notifications.push_back(Notification::destructive(
                "Please enter a search term",
                "Try searching for 'chicken', 'pasta', or 'vegan'",
            ));
            return Err(SessionError::EmptyQuery);
        }

        let token = self.next_token(RequestKind::Search);
        self.pending_search = Some(token);
        // A new search supersedes whatever detail was open or loading
        self.pending_detail = None;
        self.selected = None;
        self.submitted_query = Some(self.input_query.clone());
        self.phase = Phase::Searching;

        tracing::debug!("Search #{} issued for {:?}", token.seq, self.input_query);

        Ok(SearchRequest {
            token,
            query: self.input_query.clone(),
            filters: self.filters.clone(),
        })
    }

    pub fn complete_search(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<RecipeSummary>, ClientError>,
    ) -> Completion {
        if self.pending_search != Some(token) {
            tracing::debug!("Dropping stale search response #{}", token.seq);
            return Completion::Stale;
        }
        self.pending_search = None;

        match outcome {
            Ok(results) => {
                self.notifications.push_back(Notification::info(
                    "Search completed",
                    format!("Found {} recipes", results.len()),
                ));
                self.results = results;
                self.phase = Phase::Results;
            }
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                self.notifications
                    .push_back(Notification::destructive("Search failed", e.to_string()));
                self.results.clear();
                self.phase = Phase::Idle;
            }
        }

        Completion::Applied
    }

    /// Open a recipe from the current results
    pub fn select_recipe(&mut self, id: i64) -> Result<DetailRequest, SessionError> {
        if !matches!(self.phase, Phase::Results | Phase::DetailShown) {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                action: "select a recipe",
            });
        }

        let token = self.next_token(RequestKind::Detail);
        self.pending_detail = Some(token);
        self.selected = None;
        self.phase = Phase::DetailLoading;

        let is_favorite = self
            .results
            .iter()
            .find(|r| r.id == id)
            .is_some_and(|r| r.is_favorite);

        Ok(DetailRequest { token, id, is_favorite })
    }

    pub fn complete_detail(&mut self, token: RequestToken, outcome: Result<RecipeDetail, ClientError>) -> Completion {
        if self.pending_detail != Some(token) {
            tracing::debug!("Dropping stale detail response #{}", token.seq);
            return Completion::Stale;
        }
        self.pending_detail = None;

        match outcome {
            Ok(mut detail) => {
                // Favorites may have been toggled while the detail was loading
                if let Some(summary) = self.results.iter().find(|r| r.id == detail.id()) {
                    detail.summary.is_favorite = summary.is_favorite;
                }
                self.selected = Some(detail);
                self.phase = Phase::DetailShown;
            }
            Err(e) => {
                tracing::warn!("Loading recipe details failed: {}", e);
                self.notifications.push_back(Notification::destructive(
                    "Failed to load recipe details",
                    e.to_string(),
                ));
                self.selected = None;
                self.phase = Phase::Results;
            }
        }

        Completion::Applied
    }

    pub fn close_detail(&mut self) {
        if matches!(self.phase, Phase::DetailLoading | Phase::DetailShown) {
            self.pending_detail = None;
            self.selected = None;
            self.phase = Phase::Results;
        }
    }

    /// Flip the favorite flag on the result card and on the open detail.
    ///
    /// Returns the new flag, or `None` when no such recipe is on screen.
    pub fn toggle_favorite(&mut self, id: i64) -> Option<bool> {
        let mut title = None;
        let mut now_favorite = None;

        if let Some(summary) = self.results.iter_mut().find(|r| r.id == id) {
            summary.is_favorite = !summary.is_favorite;
            title = Some(summary.title.clone());
            now_favorite = Some(summary.is_favorite);
        }

        if let Some(detail) = self.selected.as_mut().filter(|d| d.id() == id) {
            detail.summary.is_favorite = !detail.summary.is_favorite;
            title.get_or_insert_with(|| detail.summary.title.clone());
            now_favorite.get_or_insert(detail.summary.is_favorite);
        }

        let now_favorite = now_favorite?;
        let heading = if now_favorite {
            "Added to favorites"
        } else {
            "Removed from favorites"
        };
        self.notifications
            .push_back(Notification::info(heading, title.unwrap_or_default()));

        Some(now_favorite)
    }

    /// Submit the current input and wait for the proxy
    pub async fn run_search(&mut self, proxy: &ProxyClient) -> Result<Completion, SessionError> {
        let request = self.begin_search()?;
        let outcome = proxy.search(&request.query, &request.filters).await;
        Ok(self.complete_search(request.token, outcome))
    }

    /// Open a recipe and wait for its details
    pub async fn open_recipe(&mut self, proxy: &ProxyClient, id: i64) -> Result<Completion, SessionError> {
        let request = self.select_recipe(id)?;
        let outcome = proxy.recipe_details(request.id, request.is_favorite).await;
        Ok(self.complete_detail(request.token, outcome))
    }
}
