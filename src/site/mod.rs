//! Static gallery generation from a collection snapshot.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Collection;

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Fill the template's title and movie grid placeholders
pub fn render_site(template: &str, site_title: &str, collection: &Collection, placeholder_poster: &str) -> String {
    let mut grid = String::new();

    for (title, details) in collection {
        let poster = details
            .poster
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(placeholder_poster);
        let title = escape_html(title);

        // Writing into a String cannot fail
        let _ = write!(
            grid,
            r#"
        <li>
            <div class="movie">
                <div class="movie-poster">
                    <img src="{poster}" alt="{title} poster">
                </div>
                <div class="movie-title">{title}</div>
                <div class="movie-year">{year}</div>
            </div>
        </li>
"#,
            poster = escape_html(poster),
            title = title,
            year = details.year,
        );
    }

    template
        .replace(TITLE_PLACEHOLDER, &escape_html(site_title))
        .replace(GRID_PLACEHOLDER, &grid)
}

/// Read the configured template, render, write the output page
pub fn generate_site(config: &Config, collection: &Collection) -> Result<()> {
    let template = read_template(&config.template_path)?;
    let html = render_site(&template, &config.site_title, collection, &config.placeholder_poster);

    if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config.output_path, html).map_err(|e| {
        Error::new(
            ErrorKind::Io,
            format!("Failed to write {}: {}", config.output_path.display(), e),
        )
    })?;

    info!(
        output = %config.output_path.display(),
        movies = collection.len(),
        "website generated"
    );
    Ok(())
}

fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorKind::Template,
            format!("Template file {} not readable: {}", path.display(), e),
        )
    })
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
