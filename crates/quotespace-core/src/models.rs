use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A quote as the rest of the app sees it
///
/// `id` comes from the retrieval side (`"<author>-<text>"`) and is never
/// rewritten here. `category` is whatever the provider said, unnormalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Quote {
    /// Build a quote with the id derived the same way the providers derive it
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        let text = text.into();
        let author = author.into();
        Self {
            id: format!("{}-{}", author, text),
            text,
            author,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Message handed to the share sheet / clipboard
    pub fn share_text(&self) -> String {
        format!("\"{}\" — {}", self.text, self.author)
    }

    /// Case-insensitive substring match on text or author
    ///
    /// `needle` must already be trimmed and lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}

/// What the daily cache stores per category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyRecord {
    /// Local calendar date, serialized as YYYY-MM-DD
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub quote: Quote,
}
