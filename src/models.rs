use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LiftError, Result};

/// A fragment of rendered text with its horizontal start and vertical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Date,
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Header word text to look for; the name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default)]
    pub kind: ColumnKind,
}

impl Column {
    pub fn date(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: None,
            kind: ColumnKind::Date,
        }
    }

    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: None,
            kind: ColumnKind::Text,
        }
    }

    pub fn with_header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered column list for one statement type. Order defines adjacency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct ColumnSpec {
    columns: Vec<Column>,
    date_index: usize,
}

impl ColumnSpec {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let dates: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Date)
            .map(|(i, _)| i)
            .collect();
        if dates.len() != 1 {
            return Err(LiftError::Settings(format!(
                "a column spec needs exactly one date column, found {}",
                dates.len()
            )));
        }
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].iter().any(|o| o.name == c.name) {
                return Err(LiftError::Settings(format!("duplicate column: {}", c.name)));
            }
        }
        Ok(Self {
            date_index: dates[0],
            columns,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn date_index(&self) -> usize {
        self.date_index
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn is_header(&self, text: &str) -> bool {
        self.columns.iter().any(|c| c.header() == text)
    }
}

impl TryFrom<Vec<Column>> for ColumnSpec {
    type Error = LiftError;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<ColumnSpec> for Vec<Column> {
    fn from(spec: ColumnSpec) -> Self {
        spec.columns
    }
}

/// One reconstructed ledger entry, fields in column spec order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub fields: Vec<(String, String)>,
}

#[allow(dead_code)]
impl Transaction {
    pub fn empty(spec: &ColumnSpec) -> Self {
        Self {
            fields: spec
                .columns()
                .iter()
                .map(|c| (c.name.clone(), String::new()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }
}

/// A transaction whose month/day has been placed in a calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedTransaction {
    pub date: NaiveDate,
    pub transaction: Transaction,
}
