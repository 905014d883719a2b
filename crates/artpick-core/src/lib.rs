//! Paged catalog browsing with cross-page selection.
//!
//! The crate is split along the data flow of a browsing session: a
//! [`PageSource`] fetches one page of [`Record`]s, the [`planner`] turns a
//! "pick N total" request into a per-page [`PickPlan`], and the
//! [`SelectionSession`] reducer reconciles fetched pages and manual edits into a
//! [`SelectionSet`] that outlives whichever page is currently loaded.

use std::time::Duration;

pub mod config_file;
pub mod fetch;
pub mod planner;
pub mod record;
pub mod selection;
pub mod session;

// Re-export for convenience
pub use fetch::{FetchError, HttpPageSource, Page, PageRequest, PageSource, parse_page_body};
pub use planner::{PickPlan, parse_pick_count};
pub use record::{Record, RecordId};
pub use selection::SelectionSet;
pub use session::{FetchTicket, PageWindow, SelectionSession, SessionEvent, SessionPhase};

/// Public Art Institute of Chicago artworks endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1/artworks";
pub const DEFAULT_PAGE_SIZE: usize = 12;
/// Record count assumed until a response reports the real one.
pub const DEFAULT_TOTAL_RECORDS: usize = 120;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration resolved from CLI flags, environment and config files.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub page_size: usize,
    /// Page sizes offered by the paginator. Always contains `page_size`.
    pub page_size_options: Vec<usize>,
    pub timeout_secs: u64,
    /// Fixed total record count. `None` derives it from responses.
    pub total_records: Option<usize>,
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![12, 24, 48],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            total_records: None,
            theme: "hacker".to_string(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply values from an on-disk config. Fields absent from the file keep
    /// their current value.
    pub fn apply_file(&mut self, file: &config_file::ConfigFile) {
        if let Some(source) = &file.source {
            if let Some(url) = &source.base_url {
                self.base_url = url.clone();
            }
            if let Some(secs) = source.timeout_secs {
                self.timeout_secs = secs;
            }
            if source.total_records.is_some() {
                self.total_records = source.total_records;
            }
        }
        if let Some(display) = &file.display {
            if let Some(size) = display.page_size {
                self.page_size = size;
            }
            if let Some(options) = &display.page_size_options {
                self.page_size_options = options.clone();
            }
            if let Some(theme) = &display.theme {
                self.theme = theme.clone();
            }
        }
    }

    /// Clamp page sizes to at least 1 and make sure the active page size is
    /// one of the offered options.
    pub fn normalize(&mut self) {
        self.page_size = self.page_size.max(1);
        self.page_size_options.retain(|&s| s > 0);
        if !self.page_size_options.contains(&self.page_size) {
            self.page_size_options.push(self.page_size);
        }
        self.page_size_options.sort_unstable();
        self.page_size_options.dedup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{ConfigFile, DisplayConfig, SourceConfig};

    #[test]
    fn apply_file_overrides_only_present_fields() {
        let mut config = Config::default();
        let file = ConfigFile {
            source: Some(SourceConfig {
                base_url: Some("http://localhost:9000/items".into()),
                ..Default::default()
            }),
            display: Some(DisplayConfig {
                page_size: Some(24),
                ..Default::default()
            }),
        };
        config.apply_file(&file);
        assert_eq!(config.base_url, "http://localhost:9000/items");
        assert_eq!(config.page_size, 24);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.total_records, None);
    }

    #[test]
    fn normalize_adds_active_page_size_to_options() {
        let mut config = Config {
            page_size: 30,
            page_size_options: vec![48, 0, 12, 12],
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.page_size_options, vec![12, 30, 48]);
    }

    #[test]
    fn normalize_rejects_zero_page_size() {
        let mut config = Config {
            page_size: 0,
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.page_size, 1);
        assert!(config.page_size_options.contains(&1));
    }
}
