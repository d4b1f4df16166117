use std::fmt::Write as _;

use client_core::{DetailPanel, ViewState};
use shared::domain::{poster_url, MovieDetail, MovieSummary, NO_IMAGE};

pub const ATTRIBUTION: &str =
    "Data by TMDB. This product uses the TMDB API but is not endorsed or certified by TMDB.";

pub fn render_view(view: &ViewState, image_base: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CineScout");
    let status = if view.searching { " (searching…)" } else { "" };
    let _ = writeln!(out, "Search: {}{status}", view.query.trim());
    if let Some(error) = &view.banner_error {
        let _ = writeln!(out, "[error] {error}");
    }
    out.push('\n');

    if view.results.is_empty() {
        let _ = writeln!(out, "No results.");
    }
    for movie in &view.results {
        render_summary(&mut out, movie, image_base);
    }

    if view.show_pager {
        let _ = writeln!(out, "Page {} / {}", view.page, view.total_pages);
    }

    if let Some(panel) = &view.detail_panel {
        out.push('\n');
        render_panel(&mut out, panel, image_base);
    }

    let _ = writeln!(out, "\n{ATTRIBUTION}");
    out
}

fn render_summary(out: &mut String, movie: &MovieSummary, image_base: &str) {
    let _ = writeln!(
        out,
        "#{} {} ({}) {}",
        movie.id,
        movie.title,
        movie.year_label(),
        movie.rating_label()
    );
    let _ = writeln!(out, "    {}", poster_line(image_base, movie.poster.as_deref()));
    let _ = writeln!(out, "    {}", movie.overview_text());
}

fn render_panel(out: &mut String, panel: &DetailPanel, image_base: &str) {
    match (&panel.detail, &panel.error) {
        (_, Some(error)) => {
            let _ = writeln!(out, "Movie #{}: {error}", panel.movie_id);
        }
        (Some(detail), None) => render_detail(out, detail, image_base),
        (None, None) => {
            let _ = writeln!(out, "Loading details for #{}…", panel.movie_id);
        }
    }
}

fn render_detail(out: &mut String, detail: &MovieDetail, image_base: &str) {
    let _ = writeln!(out, "{} ({})", detail.title, detail.year_label());
    let _ = writeln!(out, "{}", poster_line(image_base, detail.poster.as_deref()));
    let _ = writeln!(
        out,
        "Rating: {} | Runtime: {}",
        detail.rating_label(),
        detail.runtime_label()
    );
    let _ = writeln!(out, "Genres: {}", detail.genres_label());
    let _ = writeln!(out, "Top cast: {}", detail.cast_label());
    let _ = writeln!(out, "{}", detail.overview_text());
}

fn poster_line(image_base: &str, poster: Option<&str>) -> String {
    poster_url(image_base, poster).unwrap_or_else(|| format!("[{NO_IMAGE}]"))
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
