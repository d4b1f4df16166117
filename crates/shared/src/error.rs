use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Search,
    Detail,
}

impl RequestKind {
    fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Detail => "Detail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Non-success HTTP status, or no response at all when `status` is `None`.
    #[error("{}", request_failed_text(.status))]
    RequestFailed { status: Option<u16> },
    #[error("malformed response ({reason})")]
    DecodeFailed { reason: String },
}

impl CatalogError {
    pub fn status(status: u16) -> Self {
        Self::RequestFailed {
            status: Some(status),
        }
    }

    pub fn transport() -> Self {
        Self::RequestFailed { status: None }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            reason: reason.into(),
        }
    }

    pub fn display_message(&self, kind: RequestKind) -> String {
        format!("{} failed: {self}", kind.label())
    }
}

fn request_failed_text(status: &Option<u16>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "network error".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
