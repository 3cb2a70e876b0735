use serde::{Deserialize, Serialize};

use crate::assign::{ColumnAssigner, Placement, RowFields};
use crate::dates::DatePattern;
use crate::layout::ColumnLayout;
use crate::models::{ColumnSpec, Transaction};
use crate::rows::Row;

/// Which undated rows extend the transaction above them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationPolicy {
    /// Only a row directly below a dated row.
    #[default]
    PreviousRowDated,
    /// Any undated row while a transaction is open.
    AnyOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NoOpenTransaction,
    TransactionOpen { accepts_continuation: bool },
}

/// Transactions built from one page.
#[derive(Debug, Default)]
pub struct PageTransactions {
    pub transactions: Vec<Transaction>,
    /// The row marker was hit; rows below it were not read.
    pub truncated: bool,
    pub discarded_rows: usize,
}

pub struct TransactionAssembler<'a> {
    spec: &'a ColumnSpec,
    dates: &'a DatePattern,
    policy: ContinuationPolicy,
    row_marker: &'a str,
}

impl<'a> TransactionAssembler<'a> {
    pub fn new(
        spec: &'a ColumnSpec,
        dates: &'a DatePattern,
        policy: ContinuationPolicy,
        row_marker: &'a str,
    ) -> Self {
        Self {
            spec,
            dates,
            policy,
            row_marker,
        }
    }

    fn is_footer(&self, row: &Row) -> bool {
        !self.row_marker.is_empty() && row.text().contains(self.row_marker)
    }

    fn open(&self, fields: RowFields) -> Transaction {
        let mut txn = Transaction::empty(self.spec);
        for ((_, slot), value) in txn.fields.iter_mut().zip(fields.values) {
            *slot = value.trim().to_string();
        }
        txn
    }

    fn extend(&self, txn: &mut Transaction, fields: RowFields) {
        let date_index = fields.date_index();
        for (i, ((_, slot), value)) in txn.fields.iter_mut().zip(fields.values).enumerate() {
            let piece = value.trim();
            if i == date_index || piece.is_empty() {
                continue;
            }
            if !slot.is_empty() {
                slot.push('\n');
            }
            slot.push_str(piece);
        }
    }

    /// Run the row state machine over one page's rows, top to bottom.
    pub fn assemble_page(&self, rows: &[Row], layout: &ColumnLayout) -> PageTransactions {
        let assigner = ColumnAssigner::new(self.spec, layout, self.dates);
        let mut page = PageTransactions::default();
        let mut state = State::NoOpenTransaction;

        for row in rows {
            if self.is_footer(row) {
                tracing::debug!(row = row.key, "row marker reached; skipping rest of page");
                page.truncated = true;
                break;
            }
            let (fields, placements) = assigner.assign_row(row);
            for (word, placement) in row.words.iter().zip(&placements) {
                if !matches!(placement, Placement::Column(_)) {
                    tracing::trace!(text = %word.text, x = word.x, ?placement, "word not placed");
                }
            }

            if self.dates.is_date(fields.date()) {
                page.transactions.push(self.open(fields));
                state = State::TransactionOpen {
                    accepts_continuation: true,
                };
                continue;
            }

            match (state, page.transactions.last_mut()) {
                (State::TransactionOpen { accepts_continuation: true }, Some(txn)) => {
                    self.extend(txn, fields);
                    if self.policy == ContinuationPolicy::PreviousRowDated {
                        state = State::TransactionOpen {
                            accepts_continuation: false,
                        };
                    }
                }
                _ => {
                    tracing::trace!(row = row.key, text = %row.text(), "discarding undated row");
                    page.discarded_rows += 1;
                }
            }
        }
        page
    }
}
