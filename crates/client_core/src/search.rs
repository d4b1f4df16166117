use serde::{Deserialize, Serialize};
use shared::{
    domain::{Query, SearchResult},
    error::{CatalogError, RequestKind},
};
use tracing::{debug, warn};

use crate::Resolution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSession {
    /// Pending text as typed; trimmed only when a search is submitted.
    pub query: String,
    pub page: u32,
    pub last_result: SearchResult,
    pub loading: bool,
    pub error: Option<String>,
    pub request_sequence: u64,
}

impl SearchSession {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            last_result: SearchResult::default(),
            loading: false,
            error: None,
            request_sequence: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub sequence: u64,
    pub query: Query,
    pub page: u32,
}

#[derive(Debug, Clone)]
pub struct SearchController {
    session: SearchSession,
}

impl SearchController {
    pub fn new(default_query: impl Into<String>) -> Self {
        Self {
            session: SearchSession::new(default_query),
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.session.query = text.into();
    }

    pub fn submit(&mut self, page: u32) -> Option<SearchRequest> {
        let query = Query::parse(&self.session.query)?;
        self.session.error = None;
        self.session.loading = true;
        self.session.request_sequence += 1;

        let request = SearchRequest {
            sequence: self.session.request_sequence,
            query,
            page: page.max(1),
        };
        debug!(
            sequence = request.sequence,
            query = %request.query,
            page = request.page,
            "search submitted"
        );
        Some(request)
    }

    pub fn go_to_page(&mut self, delta: i64) -> Option<SearchRequest> {
        let target = i64::from(self.session.page) + delta;
        let total_pages = i64::from(self.session.last_result.total_pages);
        if target < 1 || target > total_pages {
            return None;
        }
        self.submit(u32::try_from(target).ok()?)
    }

    pub fn on_response(
        &mut self,
        request: &SearchRequest,
        outcome: Result<SearchResult, CatalogError>,
    ) -> Resolution {
        if request.sequence != self.session.request_sequence {
            debug!(
                sequence = request.sequence,
                latest = self.session.request_sequence,
                "discarding superseded search response"
            );
            return Resolution::Discarded;
        }

        match outcome {
            Ok(result) => {
                self.session.page = result.page;
                self.session.last_result = result;
            }
            Err(error) => {
                let message = error.display_message(RequestKind::Search);
                warn!(query = %request.query, page = request.page, "{message}");
                self.session.error = Some(message);
            }
        }
        self.session.loading = false;
        Resolution::Applied
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
