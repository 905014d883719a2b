use std::cmp::Ordering;

use artpick_core::Record;

/// Display sort for the visible page. Never changes the fetch order the
/// planner selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    FetchOrder,
    Title,
    Origin,
    Artist,
    StartYear,
    EndYear,
}

impl SortColumn {
    pub fn next(self) -> Self {
        match self {
            Self::FetchOrder => Self::Title,
            Self::Title => Self::Origin,
            Self::Origin => Self::Artist,
            Self::Artist => Self::StartYear,
            Self::StartYear => Self::EndYear,
            Self::EndYear => Self::FetchOrder,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FetchOrder => "Default",
            Self::Title => "Title",
            Self::Origin => "Origin",
            Self::Artist => "Artist",
            Self::StartYear => "Start Year",
            Self::EndYear => "End Year",
        }
    }

    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            Self::FetchOrder => Ordering::Equal,
            Self::Title => cmp_text(a.title_label(), b.title_label()),
            Self::Origin => cmp_text(a.origin_label(), b.origin_label()),
            Self::Artist => cmp_text(a.artist_label(), b.artist_label()),
            // Missing years sort last.
            Self::StartYear => cmp_year(a.date_start, b.date_start),
            Self::EndYear => cmp_year(a.date_end, b.date_end),
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn cmp_year(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Indices into `records` in display order. Ties keep fetch order.
pub fn sorted_indices(records: &[Record], sort: SortColumn, reversed: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..records.len()).collect();
    indices.sort_by(|&a, &b| {
        sort.compare(&records[a], &records[b])
            .then_with(|| a.cmp(&b))
    });
    if reversed {
        indices.reverse();
    }
    indices
}
