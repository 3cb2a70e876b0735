use crate::error::{LiftError, Result};
use crate::models::{ColumnSpec, Word};
use crate::rows::Row;

/// Left boundary of each column, in column spec order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    boundaries: Vec<f64>,
}

/// Number of words starting at `words[start]` that spell `header`: either one
/// word holding the whole label, or one word per whitespace-separated token.
fn header_span(words: &[Word], start: usize, header: &str) -> Option<usize> {
    if words[start].text == header {
        return Some(1);
    }
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let end = start + tokens.len();
    if tokens.len() < 2 || end > words.len() {
        return None;
    }
    words[start..end]
        .iter()
        .zip(&tokens)
        .all(|(w, t)| w.text == *t)
        .then_some(tokens.len())
}

/// Drop header labels from a row. `claim` is offered each match as
/// `(column, x of its first word)` and decides whether the words are consumed.
fn remove_headers(spec: &ColumnSpec, row: Row, mut claim: impl FnMut(usize, f64) -> bool) -> Row {
    let mut kept = Vec::with_capacity(row.words.len());
    let mut i = 0;
    while i < row.words.len() {
        let x = row.words[i].x;
        let consumed = spec
            .columns()
            .iter()
            .enumerate()
            .find_map(|(c, col)| header_span(&row.words, i, col.header()).filter(|_| claim(c, x)));
        match consumed {
            Some(n) => i += n,
            None => {
                kept.push(row.words[i].clone());
                i += 1;
            }
        }
    }
    Row {
        key: row.key,
        words: kept,
    }
}

impl ColumnLayout {
    /// Locate every column's header and take its x as the left boundary.
    ///
    /// Rows must be in reading order. The first occurrence of a column's
    /// header claims that column and its words are removed from the stream;
    /// a label split into several words on one row counts as one occurrence.
    pub fn resolve(spec: &ColumnSpec, rows: Vec<Row>) -> Result<(Self, Vec<Row>)> {
        let mut found: Vec<Option<f64>> = vec![None; spec.len()];
        let remaining: Vec<Row> = rows
            .into_iter()
            .map(|row| {
                remove_headers(spec, row, |c, x| {
                    if found[c].is_some() {
                        return false;
                    }
                    found[c] = Some(x);
                    true
                })
            })
            .filter(|row| !row.words.is_empty())
            .collect();
        let missing: Vec<String> = spec
            .columns()
            .iter()
            .zip(&found)
            .filter(|(_, b)| b.is_none())
            .map(|(c, _)| c.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(LiftError::LayoutIncomplete { missing });
        }
        let boundaries = found.into_iter().flatten().collect();
        Ok((Self { boundaries }, remaining))
    }

    #[cfg(test)]
    pub fn from_boundaries(boundaries: Vec<f64>) -> Self {
        Self { boundaries }
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Index of the column whose `[left, next left)` interval contains `x`.
    pub fn column_for(&self, x: f64) -> Option<usize> {
        (0..self.boundaries.len()).find(|&i| {
            let upper = self.boundaries.get(i + 1).copied().unwrap_or(f64::INFINITY);
            self.boundaries[i] <= x && x < upper
        })
    }
}

/// Resolves the layout once and strips header labels from every later page.
#[derive(Debug, Default)]
pub struct LayoutResolver {
    layout: Option<ColumnLayout>,
}

impl LayoutResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the current layout so the next page resolves its own.
    pub fn reset(&mut self) {
        self.layout = None;
    }

    pub fn prepare(&mut self, spec: &ColumnSpec, rows: Vec<Row>) -> Result<(&ColumnLayout, Vec<Row>)> {
        let rows = if self.layout.is_some() {
            rows.into_iter()
                .map(|row| remove_headers(spec, row, |_, _| true))
                .filter(|row| !row.words.is_empty())
                .collect()
        } else {
            let (layout, rest) = ColumnLayout::resolve(spec, rows)?;
            tracing::debug!(boundaries = ?layout.boundaries(), "resolved column layout");
            self.layout = Some(layout);
            rest
        };
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| LiftError::Other("column layout unavailable".into()))?;
        Ok((layout, rows))
    }
}
