//! Column layout for the month view.

use serde::Serialize;

use crate::birthday::BirthdayEntry;

/// More entries than this switch the grid to three columns.
pub const THREE_COLUMN_THRESHOLD: usize = 12;

/// More entries than this shrink the grid text.
pub const CROWDED_THRESHOLD: usize = 18;

/// How the month's entries are arranged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum Layout {
    /// Nobody has a birthday this month.
    Placeholder,
    /// Two or three columns, each in day order.
    Grid(Vec<Vec<BirthdayEntry>>),
}

impl Layout {
    pub fn column_count(&self) -> usize {
        match self {
            Layout::Placeholder => 0,
            Layout::Grid(columns) => columns.len(),
        }
    }

    pub fn entry_count(&self) -> usize {
        match self {
            Layout::Placeholder => 0,
            Layout::Grid(columns) => columns.iter().map(Vec::len).sum(),
        }
    }

    /// Whether the grid holds enough entries to need smaller text.
    pub fn is_crowded(&self) -> bool {
        self.entry_count() > CROWDED_THRESHOLD
    }
}

/// Split already-sorted `entries` into balanced columns.
///
/// Earlier columns take the extra entry when the count does not divide
/// evenly.
pub fn layout_month(entries: &[BirthdayEntry]) -> Layout {
    let n = entries.len();
    if n == 0 {
        return Layout::Placeholder;
    }

    let splits = if n > THREE_COLUMN_THRESHOLD {
        vec![0, n.div_ceil(3), (2 * n).div_ceil(3), n]
    } else {
        vec![0, n.div_ceil(2), n]
    };

    let columns = splits
        .windows(2)
        .map(|w| entries[w[0]..w[1]].to_vec())
        .collect();

    Layout::Grid(columns)
}

/// English ordinal suffix for a day of the month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `day` followed by its ordinal suffix, e.g. `22nd`.
pub fn with_ordinal(day: u32) -> String {
    format!("{day}{}", ordinal_suffix(day))
}

/// Display label for a month entry, e.g. `Bob — 2nd`.
pub fn entry_label(entry: &BirthdayEntry) -> String {
    format!("{} — {}", entry.name, with_ordinal(entry.day))
}
