//! Book edition from git history.

use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};

use crate::tools::capture;

const RU_MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Version label and date of the book build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edition {
    /// Latest tag, abbreviated commit, or `dev`.
    pub tag: String,
    /// Date of the last commit, or today.
    pub date: NaiveDate,
}

impl Edition {
    /// Look up the edition of the repository containing `dir`.
    ///
    /// Never fails: outside a repository the tag is `dev` and the date today.
    #[must_use]
    pub fn from_git(git: &Path, dir: &Path) -> Self {
        let git = git.as_os_str();
        let tag = capture(git, &["describe", "--tags", "--abbrev=0"], dir)
            .or_else(|| capture(git, &["describe", "--tags", "--always"], dir))
            .unwrap_or_else(|| "dev".to_owned());
        let date = capture(git, &["log", "-1", "--format=%cs"], dir)
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
            .unwrap_or_else(|| Local::now().date_naive());

        tracing::debug!(tag = %tag, date = %date, "Resolved edition");
        Self { tag, date }
    }

    /// ISO date, as used for the `[date]` placeholder.
    #[must_use]
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Edition line, e.g. `v0.51.0, 29 января 2026`.
    #[must_use]
    pub fn label(&self, locale: &str) -> String {
        format!("{}, {}", self.tag, long_date(self.date, locale))
    }
}

/// Day, month name and year. Russian locales use genitive month names.
#[must_use]
pub fn long_date(date: NaiveDate, locale: &str) -> String {
    let months = if locale.to_lowercase().starts_with("ru") {
        &RU_MONTHS
    } else {
        &EN_MONTHS
    };
    format!(
        "{:02} {} {}",
        date.day(),
        months[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_long_date_russian_genitive() {
        assert_eq!(long_date(date(2026, 1, 29), "ru"), "29 января 2026");
        assert_eq!(long_date(date(2024, 5, 3), "ru_RU"), "03 мая 2024");
    }

    #[test]
    fn test_long_date_english() {
        assert_eq!(long_date(date(2024, 12, 1), "en"), "01 December 2024");
    }

    #[test]
    fn test_edition_label() {
        let edition = Edition {
            tag: "v0.51.0b1".to_owned(),
            date: date(2026, 1, 29),
        };
        assert_eq!(edition.label("ru"), "v0.51.0b1, 29 января 2026");
        assert_eq!(edition.iso_date(), "2026-01-29");
    }

    #[test]
    fn test_outside_repository_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let edition = Edition::from_git(Path::new("text-forge-missing-git"), dir.path());

        assert_eq!(edition.tag, "dev");
        assert_eq!(edition.date, Local::now().date_naive());
    }
}
