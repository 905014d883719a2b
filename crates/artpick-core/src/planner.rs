//! Turns a "pick N total" request into per-page auto-selection counts.

use std::collections::BTreeMap;

/// Page number → number of leading records on that page to auto-select.
///
/// Pages are 1-based. Every stored count is in `1..=page_size`; pages with no
/// share are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickPlan {
    counts: BTreeMap<usize, usize>,
}

impl PickPlan {
    /// Greedily spread `requested_total` over consecutive pages starting at
    /// `starting_page`, `min(page_size, remaining)` per page.
    ///
    /// A `page_size` of 0 is treated as 1.
    pub fn build(requested_total: usize, page_size: usize, starting_page: usize) -> Self {
        let page_size = page_size.max(1);
        let mut counts = BTreeMap::new();
        let mut remaining = requested_total;
        let mut page = starting_page.max(1);

        while remaining > 0 {
            let take = page_size.min(remaining);
            counts.insert(page, take);
            remaining -= take;
            page += 1;
        }

        Self { counts }
    }

    /// Count planned for `page`, 0 if the page has no share.
    pub fn count_for(&self, page: usize) -> usize {
        self.counts.get(&page).copied().unwrap_or(0)
    }

    /// Sum of all planned counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn last_page(&self) -> Option<usize> {
        self.counts.keys().next_back().copied()
    }

    /// `(page, count)` pairs in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&p, &c)| (p, c))
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Parse quick-pick input the way a lenient numeric field does: optional
/// surrounding whitespace, optional sign, then leading digits. Anything after
/// the digits is ignored.
///
/// Negative, empty and non-numeric input yields 0. Values too large for
/// `usize` saturate.
pub fn parse_pick_count(input: &str) -> usize {
    let s = input.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: usize = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(d as usize);
    }

    if negative || !seen_digit { 0 } else { value }
}
