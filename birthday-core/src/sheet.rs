//! Whole-document view of a published sheet export.

use chrono::NaiveDate;

use crate::birthday::{MatchSets, select_birthdays};
use crate::csv::{parse_header, parse_line};
use crate::error::{BoardError, BoardResult};

/// Header fields plus the raw fields of every data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Sheet {
    /// Parse CSV text into headers and records.
    ///
    /// Surrounding whitespace of the whole document is dropped first, so a
    /// trailing newline does not count as a data line. Anything shorter than
    /// a header plus one data line is [`BoardError::EmptyData`].
    pub fn parse(text: &str) -> BoardResult<Self> {
        let lines: Vec<&str> = text.trim().split('\n').collect();
        if lines.len() < 2 {
            return Err(BoardError::EmptyData);
        }

        let headers = parse_header(lines[0]);
        let records = lines[1..].iter().map(|line| parse_line(line)).collect();

        Ok(Sheet { headers, records })
    }

    /// Match this sheet's rows against `reference`.
    pub fn select(&self, reference: NaiveDate) -> BoardResult<MatchSets> {
        select_birthdays(&self.records, reference, &self.headers)
    }
}
