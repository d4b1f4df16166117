use std::fmt;

use serde::{Deserialize, Serialize};

/// Image host prefix that poster paths are appended to.
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w342";

pub const PLACEHOLDER: &str = "—";
pub const NO_OVERVIEW: &str = "No overview provided.";
pub const NO_IMAGE: &str = "No Image";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(MovieId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl MovieSummary {
    pub fn year_label(&self) -> &str {
        label_or_placeholder(self.year.as_deref())
    }

    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("★ {rating:.1}"),
            None => "★ –".to_string(),
        }
    }

    pub fn overview_text(&self) -> &str {
        overview_or_placeholder(self.overview.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSearchResult")]
pub struct SearchResult {
    pub results: Vec<MovieSummary>,
    pub page: u32,
    pub total_pages: u32,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            page: 1,
            total_pages: 1,
        }
    }
}

#[derive(Deserialize)]
struct RawSearchResult {
    #[serde(default)]
    results: Vec<MovieSummary>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl From<RawSearchResult> for SearchResult {
    fn from(raw: RawSearchResult) -> Self {
        let page = raw.page.filter(|page| *page >= 1).unwrap_or(1);
        let total_pages = raw.total_pages.unwrap_or(1).max(1).max(page);
        Self {
            results: raw.results,
            page,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl MovieDetail {
    pub fn year_label(&self) -> &str {
        label_or_placeholder(self.year.as_deref())
    }

    pub fn rating_label(&self) -> String {
        self.rating
            .map(|rating| rating.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn runtime_label(&self) -> String {
        match self.runtime {
            Some(minutes) => format!("{minutes} min"),
            None => format!("{PLACEHOLDER} min"),
        }
    }

    pub fn genres_label(&self) -> String {
        join_or_placeholder(&self.genres)
    }

    pub fn cast_label(&self) -> String {
        join_or_placeholder(&self.cast)
    }

    pub fn overview_text(&self) -> &str {
        overview_or_placeholder(self.overview.as_deref())
    }
}

pub fn poster_url(image_base: &str, poster: Option<&str>) -> Option<String> {
    let path = poster.map(str::trim).filter(|path| !path.is_empty())?;
    Some(format!(
        "{}{}",
        image_base.trim_end_matches('/'),
        ensure_leading_slash(path)
    ))
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn label_or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => PLACEHOLDER,
    }
}

fn overview_or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => NO_OVERVIEW,
    }
}

fn join_or_placeholder(values: &[String]) -> String {
    if values.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
