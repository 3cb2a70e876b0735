use std::path::Path;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{LiftError, Result, Warning};
use crate::models::{ColumnSpec, DatedTransaction, Transaction};

/// Month difference beyond which a month/day is moved into the adjacent year.
const ROLLOVER_MONTHS: i32 = 10;

/// Matches bare `M/D` date tokens such as `3/7` or `12/31`.
#[derive(Debug, Clone)]
pub struct DatePattern {
    leading: Regex,
    anywhere: Regex,
}

impl DatePattern {
    pub fn new() -> Result<Self> {
        Ok(Self {
            leading: Regex::new(r"^\d{1,2}/\d{1,2}")?,
            anywhere: Regex::new(r"(\d{1,2})/(\d{1,2})")?,
        })
    }

    /// True when the text starts with a date token.
    pub fn is_date(&self, text: &str) -> bool {
        self.leading.is_match(text.trim_start())
    }

    /// First `(month, day)` pair in the text. Digits only; not range-checked.
    pub fn month_day(&self, text: &str) -> Option<(u32, u32)> {
        let caps = self.anywhere.captures(text)?;
        Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
    }
}

/// Per-document facts the resolver reads: the statement's closing date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementContext {
    pub reference_date: NaiveDate,
}

impl StatementContext {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// Reads the first run of exactly six digits in the file name as `MMDDYY`.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        statement_date_in(name).map(Self::new)
    }
}

/// First standalone `MMDDYY` run in a file name, e.g. `Statement_013124.words.csv`.
pub fn statement_date_in(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |p| start + p);
        if end - start == 6 {
            if let Ok(date) = NaiveDate::parse_from_str(&name[start..end], "%m%d%y") {
                return Some(date);
            }
        }
        start = end;
    }
    None
}

/// Place a bare month/day in the calendar year closest to the reference date.
pub fn resolve_date(raw: &str, ctx: &StatementContext, pattern: &DatePattern) -> Result<NaiveDate> {
    let invalid = || LiftError::InvalidDate {
        raw: raw.trim().to_string(),
    };
    let (month, day) = pattern.month_day(raw).ok_or_else(invalid)?;
    let reference = ctx.reference_date;
    let diff = month as i32 - reference.month() as i32;
    let year = if diff > ROLLOVER_MONTHS {
        reference.year() - 1
    } else if diff < -ROLLOVER_MONTHS {
        reference.year() + 1
    } else {
        reference.year()
    };
    // Only December and January can roll, so 2/29 is always checked against
    // the reference year itself.
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Resolve every transaction's date. Unresolvable transactions are skipped and
/// reported, never guessed.
pub fn resolve_dates(
    transactions: Vec<Transaction>,
    spec: &ColumnSpec,
    ctx: &StatementContext,
    pattern: &DatePattern,
) -> (Vec<DatedTransaction>, Vec<Warning>) {
    let mut dated = Vec::with_capacity(transactions.len());
    let mut warnings = Vec::new();
    for (i, transaction) in transactions.into_iter().enumerate() {
        let raw = &transaction.fields[spec.date_index()].1;
        match resolve_date(raw, ctx, pattern) {
            Ok(date) => dated.push(DatedTransaction { date, transaction }),
            Err(_) => {
                tracing::warn!(transaction = i + 1, raw = %raw, "skipping transaction with invalid date");
                warnings.push(Warning::InvalidDate {
                    row: i + 1,
                    raw: raw.clone(),
                });
            }
        }
    }
    (dated, warnings)
}
