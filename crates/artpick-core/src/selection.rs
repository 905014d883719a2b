//! Selection bookkeeping that spans pages which are no longer loaded.

use std::collections::HashSet;

use crate::planner::PickPlan;
use crate::record::{Record, RecordId};

/// Selected records keyed by id, in the order they were selected.
///
/// Holds full records (not just ids) so records from pages that are no longer
/// loaded can still be listed.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    records: Vec<Record>,
    ids: HashSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.iter().map(|r| r.id)
    }

    /// Add a record. Returns `false` if a record with the same id is already
    /// selected.
    pub fn insert(&mut self, record: Record) -> bool {
        if !self.ids.insert(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.ids.clear();
    }

    fn retain(&mut self, mut keep: impl FnMut(&Record) -> bool) {
        self.records.retain(|r| keep(r));
        self.ids = self.records.iter().map(|r| r.id).collect();
    }

    /// Select the leading records of a page according to `plan`.
    ///
    /// Takes the first `plan.count_for(page_number)` records in fetch order and
    /// adds those not already selected. Applying the same page twice leaves the
    /// set unchanged. Returns how many records were newly added.
    pub fn apply_plan_for_page(
        &mut self,
        plan: &PickPlan,
        page_records: &[Record],
        page_number: usize,
    ) -> usize {
        let count = plan.count_for(page_number);
        page_records
            .iter()
            .take(count)
            .filter(|r| self.insert((*r).clone()))
            .count()
    }

    /// Reconcile the complete checked-row state of the visible page.
    ///
    /// Selections for records not on `page_records` are kept; selections for
    /// records on the page are replaced by `visible_selection`.
    pub fn apply_manual_edit(&mut self, page_records: &[Record], visible_selection: Vec<Record>) {
        let on_page: HashSet<RecordId> = page_records.iter().map(|r| r.id).collect();
        self.retain(|r| !on_page.contains(&r.id));
        for record in visible_selection {
            self.insert(record);
        }
    }

    /// Records of `page_records` that are currently selected, in page order.
    pub fn visible_on(&self, page_records: &[Record]) -> Vec<Record> {
        page_records
            .iter()
            .filter(|r| self.contains(r.id))
            .cloned()
            .collect()
    }

    /// Replace the whole selection with the plan's share of one page.
    pub(crate) fn reset_to_plan(
        &mut self,
        plan: &PickPlan,
        page_records: &[Record],
        page_number: usize,
    ) {
        self.clear();
        self.apply_plan_for_page(plan, page_records, page_number);
    }
}
