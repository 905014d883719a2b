//! In-memory page source for tests and offline demos.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{FetchError, Page, PageRequest, PageSource};
use crate::record::Record;

const ORIGINS: &[&str] = &["France", "Japan", "United States", "Italy", "Netherlands"];
const ARTISTS: &[&str] = &[
    "Unknown maker",
    "Claude Monet (French, 1840-1926)",
    "Katsushika Hokusai (Japanese, 1760-1849)",
    "Georgia O'Keeffe (American, 1887-1986)",
    "Rembrandt van Rijn (Dutch, 1606-1669)",
];

/// A synthetic catalog of `total` records with ids `1..=total`.
///
/// Supports:
/// - Pages that fail on demand ([`fail_page`](MockPageSource::fail_page)).
/// - Optional per-call latency.
/// - Call counting via [`call_count()`](MockPageSource::call_count).
pub struct MockPageSource {
    total: usize,
    report_total: bool,
    failing_pages: Mutex<HashSet<usize>>,
    delay: Option<Duration>,
    call_count: AtomicUsize,
}

impl MockPageSource {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            report_total: true,
            failing_pages: Mutex::new(HashSet::new()),
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Leave `Page::total` unset, like a source without pagination metadata.
    pub fn without_total(mut self) -> Self {
        self.report_total = false;
        self
    }

    /// Make every fetch of `page` fail until [`heal_page`](Self::heal_page).
    pub fn fail_page(&self, page: usize) {
        if let Ok(mut pages) = self.failing_pages.lock() {
            pages.insert(page);
        }
    }

    pub fn heal_page(&self, page: usize) {
        if let Ok(mut pages) = self.failing_pages.lock() {
            pages.remove(&page);
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The records the catalog serves for `request`, ignoring failures.
    pub fn page_records(&self, request: PageRequest) -> Vec<Record> {
        let limit = request.limit.max(1);
        let start = request.page.max(1).saturating_sub(1).saturating_mul(limit);
        let end = start.saturating_add(limit).min(self.total);
        (start..end).map(|i| synthetic_record(i as u64 + 1)).collect()
    }

    fn is_failing(&self, page: usize) -> bool {
        self.failing_pages
            .lock()
            .map(|pages| pages.contains(&page))
            .unwrap_or(false)
    }
}

fn synthetic_record(id: u64) -> Record {
    let i = id as usize;
    let start = 1500 + (i * 7 % 500) as i32;
    Record {
        id,
        title: Some(format!("Catalog Item {id}")),
        place_of_origin: Some(ORIGINS[i % ORIGINS.len()].to_string()),
        artist_display: Some(ARTISTS[i % ARTISTS.len()].to_string()),
        inscriptions: (i % 3 == 0).then(|| format!("Inscribed no. {id}")),
        date_start: Some(start),
        date_end: Some(start + (i % 5) as i32),
    }
}

impl PageSource for MockPageSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_page<'a>(
        &'a self,
        request: PageRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Page, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }

            if self.is_failing(request.page) {
                return Err(FetchError::Unavailable(format!(
                    "page {} is configured to fail",
                    request.page
                )));
            }

            Ok(Page {
                records: self.page_records(request),
                total: self.report_total.then_some(self.total),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_consecutive_ids() {
        let source = MockPageSource::new(30);
        let page = source
            .fetch_page(PageRequest { page: 2, limit: 12 })
            .await
            .unwrap();
        let ids: Vec<_> = page.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (13..=24).collect::<Vec<_>>());
        assert_eq!(page.total, Some(30));
    }

    #[tokio::test]
    async fn last_page_is_short_and_beyond_is_empty() {
        let source = MockPageSource::new(30);
        let last = source.fetch_page(PageRequest { page: 3, limit: 12 }).await.unwrap();
        assert_eq!(last.records.len(), 6);
        let beyond = source.fetch_page(PageRequest { page: 9, limit: 12 }).await.unwrap();
        assert!(beyond.records.is_empty());
    }

    #[tokio::test]
    async fn failing_page_errors_until_healed() {
        let source = MockPageSource::new(30);
        source.fail_page(2);
        let req = PageRequest { page: 2, limit: 12 };
        assert!(matches!(
            source.fetch_page(req).await,
            Err(FetchError::Unavailable(_))
        ));
        source.heal_page(2);
        assert!(source.fetch_page(req).await.is_ok());
        assert_eq!(source.call_count(), 2);
    }
}
