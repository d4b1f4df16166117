use serde::{Deserialize, Serialize};
use shared::{
    domain::{MovieDetail, MovieId},
    error::{CatalogError, RequestKind},
};
use tracing::{debug, warn};

use crate::Resolution;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailSession {
    pub selected_id: Option<MovieId>,
    pub detail: Option<MovieDetail>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub id: MovieId,
}

#[derive(Debug, Clone, Default)]
pub struct DetailController {
    session: DetailSession,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &DetailSession {
        &self.session
    }

    pub fn open(&mut self, id: MovieId) -> DetailRequest {
        self.session = DetailSession {
            selected_id: Some(id),
            detail: None,
            error: None,
        };
        debug!(movie_id = %id, "detail opened");
        DetailRequest { id }
    }

    pub fn close(&mut self) {
        self.session = DetailSession::default();
    }

    pub fn on_response(
        &mut self,
        request: DetailRequest,
        outcome: Result<MovieDetail, CatalogError>,
    ) -> Resolution {
        if self.session.selected_id != Some(request.id) {
            debug!(movie_id = %request.id, "discarding detail response for a closed panel");
            return Resolution::Discarded;
        }

        match outcome {
            Ok(detail) => self.session.detail = Some(detail),
            Err(error) => {
                let message = error.display_message(RequestKind::Detail);
                warn!(movie_id = %request.id, "{message}");
                self.session.error = Some(message);
            }
        }
        Resolution::Applied
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
