use crossterm::style::Stylize;
use crate::core::types::Rating;

/// Console colors: headings yellow, prompts green, errors red, results cyan
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    pub enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Painter { enabled }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, |t| t.to_string().yellow().to_string())
    }

    pub fn prompt(&self, text: &str) -> String {
        self.paint(text, |t| t.to_string().green().to_string())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.to_string().red().to_string())
    }

    pub fn result(&self, text: &str) -> String {
        self.paint(text, |t| t.to_string().cyan().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.enabled {
            style(text)
        } else {
            text.to_string()
        }
    }
}

pub fn format_rating(rating: Option<Rating>) -> String {
    rating.map(|r| r.to_string()).unwrap_or_else(|| "N/A".to_string())
}
