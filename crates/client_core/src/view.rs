use serde::{Deserialize, Serialize};
use shared::domain::{MovieDetail, MovieId, MovieSummary};

use crate::{detail::DetailSession, search::SearchSession};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub query: String,
    pub searching: bool,
    pub banner_error: Option<String>,
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub show_pager: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub detail_panel: Option<DetailPanel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPanel {
    pub movie_id: MovieId,
    pub detail: Option<MovieDetail>,
    pub error: Option<String>,
}

impl DetailPanel {
    pub fn is_loading(&self) -> bool {
        self.detail.is_none() && self.error.is_none()
    }
}

impl ViewState {
    pub fn derive(search: &SearchSession, detail: &DetailSession) -> Self {
        let total_pages = search.last_result.total_pages;
        let detail_panel = detail.selected_id.map(|movie_id| DetailPanel {
            movie_id,
            detail: detail.detail.clone(),
            error: detail.error.clone(),
        });

        Self {
            query: search.query.clone(),
            searching: search.loading,
            banner_error: search.error.clone(),
            results: search.last_result.results.clone(),
            page: search.page,
            total_pages,
            show_pager: total_pages > 1,
            can_go_back: search.page > 1,
            can_go_forward: search.page < total_pages,
            detail_panel,
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
