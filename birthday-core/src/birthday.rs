//! Birthday matching against a reference date.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::{BoardError, BoardResult};

pub const NAME_COLUMN: &str = "Name";
pub const BIRTHDAY_COLUMN: &str = "Birthday";

/// A usable line of the sheet: both required cells present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub birthday: String,
}

/// Someone with a birthday in the reference month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayEntry {
    pub name: String,
    pub day: u32,
}

/// Result of one matching pass.
///
/// `month` keeps source order; use [`MatchSets::sorted_month`] for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSets {
    pub today: Vec<String>,
    pub month: Vec<BirthdayEntry>,
}

impl MatchSets {
    /// Month entries ordered by day. Equal days stay in source order.
    pub fn sorted_month(&self) -> Vec<BirthdayEntry> {
        let mut entries = self.month.clone();
        entries.sort_by_key(|e| e.day);
        entries
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub name: usize,
    pub birthday: usize,
}

impl Columns {
    pub fn locate(headers: &[String]) -> BoardResult<Self> {
        let find = |column: &str| headers.iter().position(|h| h == column);

        match (find(NAME_COLUMN), find(BIRTHDAY_COLUMN)) {
            (Some(name), Some(birthday)) => Ok(Columns { name, birthday }),
            (name, birthday) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push(NAME_COLUMN.to_string());
                }
                if birthday.is_none() {
                    missing.push(BIRTHDAY_COLUMN.to_string());
                }
                Err(BoardError::Schema {
                    missing,
                    available: headers.to_vec(),
                })
            }
        }
    }

    /// Pull the name and birthday cells out of one record.
    ///
    /// Returns `None` when the record is too short or either cell is blank.
    pub fn extract(&self, record: &[String]) -> Option<Row> {
        let name = record.get(self.name)?.trim();
        let birthday = record.get(self.birthday)?.trim();

        if name.is_empty() || birthday.is_empty() {
            return None;
        }

        Some(Row {
            name: name.to_string(),
            birthday: birthday.to_string(),
        })
    }
}

/// Month and day parts of a `YYYY-MM-DD`-like birthday cell.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MonthDay {
    /// Zero-padded `MM-DD` comparison key.
    key: String,
    month: Option<u32>,
    day: Option<u32>,
}

impl MonthDay {
    fn parse(birthday: &str) -> Option<Self> {
        let parts: Vec<&str> = birthday.split('-').collect();
        if parts.len() < 3 {
            return None;
        }

        let (month, day) = (parts[1], parts[2]);
        Some(MonthDay {
            key: format!("{}-{}", pad(month), pad(day)),
            month: leading_number(month),
            day: leading_number(day),
        })
    }
}

fn pad(part: &str) -> String {
    if part.chars().count() == 1 {
        format!("0{part}")
    } else {
        part.to_string()
    }
}

/// Integer value of the leading digits of `s`, ignoring leading whitespace
/// and an optional `+`. `"07"` is 7, `"+6"` is 6, `"15T00:00"` is 15, `"x"`
/// is `None`. Digit runs that overflow `u32` are `None`.
fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

/// `MM-DD` key of a date.
pub fn month_day_key(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Scan `records` for birthdays on `reference`'s day and in its month.
///
/// Malformed rows are skipped. The month set is left in source order.
pub fn select_birthdays(
    records: &[Vec<String>],
    reference: NaiveDate,
    headers: &[String],
) -> BoardResult<MatchSets> {
    let columns = Columns::locate(headers)?;
    let today_key = month_day_key(reference);
    let current_month = reference.month();

    let mut sets = MatchSets::default();

    for (index, record) in records.iter().enumerate() {
        let Some(row) = columns.extract(record) else {
            debug!(line = index + 2, "skipping row without name or birthday");
            continue;
        };

        let Some(date) = MonthDay::parse(&row.birthday) else {
            debug!(line = index + 2, birthday = %row.birthday, "skipping malformed birthday");
            continue;
        };

        if date.key == today_key {
            sets.today.push(row.name.clone());
        }

        if date.month == Some(current_month) {
            match date.day {
                Some(day) => sets.month.push(BirthdayEntry { name: row.name, day }),
                None => debug!(line = index + 2, birthday = %row.birthday, "skipping unreadable day"),
            }
        }
    }

    Ok(sets)
}
