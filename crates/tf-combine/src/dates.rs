//! Chapter dates block.
//!
//! A chapter with `created` or `published` front matter gets a pymdown-style
//! block right after its heading:
//!
//! ```text
//! /// chapter-dates
//! Created: 2024-01-15
//! Published: 2024-01-20
//! ///
//! ```

use std::fmt::Write as _;

use chrono::NaiveDate;

/// Tag of the injected block.
pub const CHAPTER_DATES_TAG: &str = "chapter-dates";

const ISO_DATE: &str = "%Y-%m-%d";

/// Labels and date format used in the chapter dates block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateLabels {
    /// Label for the creation date.
    pub created: String,
    /// Label for the publication date.
    pub published: String,
    /// `strftime`-style format for dates.
    pub date_format: String,
}

impl Default for DateLabels {
    fn default() -> Self {
        Self::for_locale("en")
    }
}

impl DateLabels {
    /// Default labels for a locale. Russian locales get Russian labels,
    /// everything else English.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let (created, published) = if locale.to_lowercase().starts_with("ru") {
            ("Создано", "Опубликовано")
        } else {
            ("Created", "Published")
        };
        Self {
            created: created.to_owned(),
            published: published.to_owned(),
            date_format: ISO_DATE.to_owned(),
        }
    }

    /// Render the block, or `None` when neither date is present.
    #[must_use]
    pub fn render(&self, created: Option<NaiveDate>, published: Option<NaiveDate>) -> Option<String> {
        if created.is_none() && published.is_none() {
            return None;
        }

        let mut block = format!("/// {CHAPTER_DATES_TAG}\n");
        for (label, date) in [(&self.created, created), (&self.published, published)] {
            if let Some(date) = date {
                block.push_str(label);
                block.push_str(": ");
                block.push_str(&self.format_date(date));
                block.push('\n');
            }
        }
        block.push_str("///");
        Some(block)
    }

    /// Format a date, falling back to ISO when the format string is invalid.
    #[must_use]
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            tracing::warn!(format = %self.date_format, "Invalid date format, using ISO dates");
            return date.format(ISO_DATE).to_string();
        }
        out
    }
}
