//! Reducer for one browsing/selection session.
//!
//! All state changes go through [`SelectionSession::update`] (or the method
//! each event dispatches to). The session performs no I/O: page changes return
//! a [`FetchTicket`] describing the fetch the caller must run, and the result
//! comes back as a `PageLoaded` or `PageFailed` event carrying the ticket's
//! generation.

use crate::DEFAULT_TOTAL_RECORDS;
use crate::fetch::{Page, PageRequest};
use crate::planner::PickPlan;
use crate::record::{Record, RecordId};
use crate::selection::SelectionSet;

/// Offset/size pair describing the visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn new(offset: usize, page_size: usize) -> Self {
        Self {
            offset,
            page_size: page_size.max(1),
        }
    }

    /// 1-based page number containing `offset`.
    pub fn page_number(&self) -> usize {
        self.offset / self.page_size + 1
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page_number(),
            limit: self.page_size,
        }
    }
}

/// A fetch the caller must perform. The result is only accepted while
/// `generation` is still the latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No plan, nothing requested.
    Idle,
    /// A pick plan is active and being applied as pages load.
    Planning,
}

/// Inputs to the session reducer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ChangePage { offset: usize, page_size: usize },
    Reload,
    PageLoaded { generation: u64, page: Page },
    PageFailed { generation: u64, error: String },
    /// "Pick N total" starting at the current page. 0 cancels everything.
    QuickPick(usize),
    /// Complete checked-row state of the visible page.
    ManualEdit(Vec<Record>),
    ToggleRecord(RecordId),
    SetAllVisible(bool),
}

#[derive(Debug, Clone)]
pub struct SelectionSession {
    window: PageWindow,
    records: Vec<Record>,
    loading: bool,
    generation: u64,
    selection: SelectionSet,
    plan: PickPlan,
    requested_total: usize,
    auto_fill: bool,
    total_records: usize,
    /// When set, responses never change `total_records`.
    total_fixed: bool,
}

impl SelectionSession {
    /// Start on page 1. `total_records` fixes the collection size; `None`
    /// derives it from responses.
    pub fn new(page_size: usize, total_records: Option<usize>) -> Self {
        Self {
            window: PageWindow::new(0, page_size),
            records: Vec::new(),
            loading: false,
            generation: 0,
            selection: SelectionSet::new(),
            plan: PickPlan::default(),
            requested_total: 0,
            auto_fill: false,
            total_records: total_records.unwrap_or(DEFAULT_TOTAL_RECORDS),
            total_fixed: total_records.is_some(),
        }
    }

    /// Apply an event. Returns the fetch to run, if the event needs one.
    pub fn update(&mut self, event: SessionEvent) -> Option<FetchTicket> {
        match event {
            SessionEvent::ChangePage { offset, page_size } => {
                return Some(self.change_page(offset, page_size));
            }
            SessionEvent::Reload => return Some(self.reload()),
            SessionEvent::PageLoaded { generation, page } => {
                self.page_loaded(generation, page);
            }
            SessionEvent::PageFailed { generation, error } => {
                self.page_failed(generation, &error);
            }
            SessionEvent::QuickPick(count) => self.quick_pick(count),
            SessionEvent::ManualEdit(visible) => self.manual_edit(visible),
            SessionEvent::ToggleRecord(id) => self.toggle_record(id),
            SessionEvent::SetAllVisible(checked) => self.set_all_visible(checked),
        }
        None
    }

    // ── pagination ──────────────────────────────────────────────

    /// Move to a new window and mark the session loading.
    pub fn change_page(&mut self, offset: usize, page_size: usize) -> FetchTicket {
        self.window = PageWindow::new(offset, page_size);
        self.begin_fetch()
    }

    /// Re-request the current window.
    pub fn reload(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.loading = true;
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            request: self.window.request(),
        };
        tracing::debug!(
            generation = ticket.generation,
            page = ticket.request.page,
            limit = ticket.request.limit,
            "page requested"
        );
        ticket
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "discarding stale page response"
            );
            return false;
        }
        true
    }

    /// Accept a fetched page. Returns `false` if the response was stale.
    pub fn page_loaded(&mut self, generation: u64, page: Page) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.records = page.records;
        self.loading = false;
        if !self.total_fixed
            && let Some(total) = page.total
        {
            self.total_records = total;
        }

        let added = self.apply_plan_for_page();
        if added > 0 {
            tracing::debug!(
                page = self.page_number(),
                added,
                selected = self.selection.len(),
                "auto-selected from plan"
            );
        }
        self.check_completion();
        true
    }

    /// Record a failed fetch: the page shows no records, selections from
    /// other pages are untouched. Returns `false` if the response was stale.
    pub fn page_failed(&mut self, generation: u64, error: &str) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        tracing::debug!(page = self.page_number(), error, "page cleared after failed fetch");
        self.records.clear();
        self.loading = false;
        self.check_completion();
        true
    }

    // ── selection ───────────────────────────────────────────────

    /// Apply the plan's share of the loaded page. Idempotent; skipped while
    /// loading. Returns how many records were newly selected.
    pub fn apply_plan_for_page(&mut self) -> usize {
        if self.loading || !self.auto_fill {
            return 0;
        }
        let page = self.page_number();
        self.selection
            .apply_plan_for_page(&self.plan, &self.records, page)
    }

    /// Start (or restart) auto-fill for `count` records from the current page.
    ///
    /// `count` is clamped to the records available from the current page to
    /// the end of the collection. A count of 0 clears the selection; a
    /// non-zero count with nothing left to pick changes nothing.
    pub fn quick_pick(&mut self, count: usize) {
        if count == 0 {
            tracing::info!("quick pick cleared selection");
            self.selection.clear();
            self.clear_plan();
            return;
        }
        let count = count.min(self.available_from_current_page());
        if count == 0 {
            tracing::debug!(
                page = self.page_number(),
                total_records = self.total_records,
                "quick pick ignored, no records from this page on"
            );
            return;
        }

        let page = self.page_number();
        self.plan = PickPlan::build(count, self.window.page_size, page);
        self.requested_total = count;
        self.auto_fill = true;
        tracing::info!(
            requested = count,
            first_page = page,
            last_page = self.plan.last_page(),
            "quick pick planned"
        );

        if self.loading {
            // Applied once the page arrives.
            self.selection.clear();
        } else {
            self.selection
                .reset_to_plan(&self.plan, &self.records, page);
            self.check_completion();
        }
    }

    /// Reconcile the visible page's checked rows. Always ends auto-fill.
    pub fn manual_edit(&mut self, visible_selection: Vec<Record>) {
        if self.auto_fill {
            tracing::info!("manual edit cancelled auto-fill");
        }
        self.clear_plan();
        self.selection
            .apply_manual_edit(&self.records, visible_selection);
    }

    /// Flip one visible row. Ids not on the loaded page are ignored.
    pub fn toggle_record(&mut self, id: RecordId) {
        if !self.records.iter().any(|r| r.id == id) {
            return;
        }
        let mut visible = self.selection.visible_on(&self.records);
        if let Some(pos) = visible.iter().position(|r| r.id == id) {
            visible.remove(pos);
        } else if let Some(record) = self.records.iter().find(|r| r.id == id) {
            visible.push(record.clone());
        }
        self.manual_edit(visible);
    }

    /// Check or uncheck every visible row.
    pub fn set_all_visible(&mut self, checked: bool) {
        let visible = if checked {
            self.records.clone()
        } else {
            Vec::new()
        };
        self.manual_edit(visible);
    }

    fn check_completion(&mut self) {
        if self.loading || !self.auto_fill {
            return;
        }
        if self.selection.len() >= self.plan.total() {
            tracing::info!(selected = self.selection.len(), "auto-fill complete");
            self.clear_plan();
        }
    }

    fn clear_plan(&mut self) {
        self.plan.clear();
        self.auto_fill = false;
        self.requested_total = 0;
    }

    fn available_from_current_page(&self) -> usize {
        let start = (self.page_number() - 1) * self.window.page_size;
        self.total_records.saturating_sub(start)
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn page_number(&self) -> usize {
        self.window.page_number()
    }

    pub fn page_size(&self) -> usize {
        self.window.page_size
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Page count, never less than the current page so a shrunken total
    /// does not leave the window past the end.
    pub fn total_pages(&self) -> usize {
        self.total_records
            .div_ceil(self.window.page_size)
            .max(self.page_number())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn plan(&self) -> &PickPlan {
        &self.plan
    }

    pub fn requested_total(&self) -> usize {
        self.requested_total
    }

    pub fn is_auto_fill(&self) -> bool {
        self.auto_fill
    }

    pub fn phase(&self) -> SessionPhase {
        if self.auto_fill {
            SessionPhase::Planning
        } else {
            SessionPhase::Idle
        }
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// How many more records are needed to reach the requested total.
    pub fn pending(&self) -> usize {
        self.requested_total.saturating_sub(self.selection.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(ids: std::ops::RangeInclusive<u64>) -> Page {
        Page {
            records: ids.map(Record::with_id).collect(),
            total: None,
        }
    }

    #[test]
    fn page_number_from_offset() {
        assert_eq!(PageWindow::new(0, 12).page_number(), 1);
        assert_eq!(PageWindow::new(11, 12).page_number(), 1);
        assert_eq!(PageWindow::new(24, 12).page_number(), 3);
    }

    #[test]
    fn change_page_sets_loading_and_bumps_generation() {
        let mut s = SelectionSession::new(12, None);
        let t1 = s.change_page(12, 12);
        assert!(s.is_loading());
        assert_eq!(t1.request, PageRequest { page: 2, limit: 12 });
        let t2 = s.reload();
        assert_eq!(t2.generation, t1.generation + 1);
        assert_eq!(t2.request, t1.request);
    }

    #[test]
    fn update_dispatches_and_returns_tickets() {
        let mut s = SelectionSession::new(12, None);
        let ticket = s
            .update(SessionEvent::ChangePage { offset: 0, page_size: 12 })
            .unwrap();
        assert!(
            s.update(SessionEvent::PageLoaded {
                generation: ticket.generation,
                page: page_of(1..=12),
            })
            .is_none()
        );
        assert_eq!(s.records().len(), 12);
        s.update(SessionEvent::ToggleRecord(3));
        assert!(s.is_selected(3));
    }

    #[test]
    fn quick_pick_during_loading_applies_on_arrival() {
        let mut s = SelectionSession::new(12, None);
        let ticket = s.change_page(0, 12);
        s.quick_pick(5);
        assert!(s.selection().is_empty());
        assert_eq!(s.phase(), SessionPhase::Planning);

        s.page_loaded(ticket.generation, page_of(1..=12));
        assert_eq!(s.selection().len(), 5);
        assert_eq!(s.phase(), SessionPhase::Idle);
    }

    #[test]
    fn quick_pick_is_clamped_to_available_records() {
        let mut s = SelectionSession::new(12, Some(30));
        let t = s.change_page(24, 12);
        s.page_loaded(t.generation, page_of(25..=30));
        s.quick_pick(500);
        assert_eq!(s.selection().len(), 6);
        assert!(s.plan().is_empty());
        assert_eq!(s.phase(), SessionPhase::Idle);
    }

    #[test]
    fn quick_pick_clamp_keeps_plan_while_loading() {
        let mut s = SelectionSession::new(12, Some(30));
        s.change_page(24, 12);
        s.quick_pick(500);
        assert_eq!(s.plan().total(), 6);
        assert_eq!(s.requested_total(), 6);
    }

    #[test]
    fn nonzero_quick_pick_past_the_end_keeps_selection() {
        let mut s = SelectionSession::new(12, None);
        let t = s.reload();
        s.page_loaded(t.generation, page_of(1..=12));
        s.set_all_visible(true);
        let t = s.change_page(24, 12);
        s.page_loaded(t.generation, page_of(25..=36));
        s.set_all_visible(true);
        assert_eq!(s.selection().len(), 24);

        let t = s.reload();
        s.page_loaded(
            t.generation,
            Page {
                records: vec![],
                total: Some(20),
            },
        );
        s.quick_pick(3);
        assert_eq!(s.selection().len(), 24);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.requested_total(), 0);

        s.quick_pick(0);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn shrunken_total_keeps_current_page_in_range() {
        let mut s = SelectionSession::new(12, None);
        let t = s.change_page(24, 12);
        s.page_loaded(
            t.generation,
            Page {
                records: vec![],
                total: Some(20),
            },
        );
        assert_eq!(s.page_number(), 3);
        assert_eq!(s.total_pages(), 3);
    }

    #[test]
    fn derived_total_follows_responses_unless_fixed() {
        let mut derived = SelectionSession::new(12, None);
        assert_eq!(derived.total_records(), DEFAULT_TOTAL_RECORDS);
        let t = derived.reload();
        derived.page_loaded(
            t.generation,
            Page {
                records: vec![],
                total: Some(500),
            },
        );
        assert_eq!(derived.total_records(), 500);
        assert_eq!(derived.total_pages(), 42);

        let mut fixed = SelectionSession::new(12, Some(120));
        let t = fixed.reload();
        fixed.page_loaded(
            t.generation,
            Page {
                records: vec![],
                total: Some(500),
            },
        );
        assert_eq!(fixed.total_records(), 120);
    }

    #[test]
    fn toggle_ignores_ids_not_on_page() {
        let mut s = SelectionSession::new(12, None);
        let t = s.reload();
        s.page_loaded(t.generation, page_of(1..=12));
        s.toggle_record(99);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn set_all_visible_checks_and_unchecks_page() {
        let mut s = SelectionSession::new(12, None);
        let t = s.reload();
        s.page_loaded(t.generation, page_of(1..=12));
        s.set_all_visible(true);
        assert_eq!(s.selection().len(), 12);
        s.set_all_visible(false);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn pending_counts_down() {
        let mut s = SelectionSession::new(12, None);
        let t = s.reload();
        s.page_loaded(t.generation, page_of(1..=12));
        s.quick_pick(30);
        assert_eq!(s.selection().len(), 12);
        assert_eq!(s.pending(), 18);
    }
}
