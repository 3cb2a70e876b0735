use crate::assembler::TransactionAssembler;
use crate::dates::DatePattern;
use crate::error::{Result, Warning};
use crate::formats::StatementFormat;
use crate::layout::LayoutResolver;
use crate::models::Transaction;
use crate::rows::group_rows;
use crate::source::WordSource;
use crate::window::PageWindow;

/// Outcome of running one document through the page pipeline.
#[derive(Debug, Default)]
pub struct Extraction {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<Warning>,
    /// Zero-based inclusive range of pages inside the window.
    pub pages: Option<(usize, usize)>,
}

/// Walk the document's pages in order and rebuild its transactions.
///
/// Fails only when the column headers cannot be located; every other
/// problem is recorded as a warning and extraction carries on.
pub fn extract<S: WordSource + ?Sized>(
    source: &S,
    format: &StatementFormat,
    dates: &DatePattern,
) -> Result<Extraction> {
    let spec = &format.columns;
    let mut window = PageWindow::new(&format.window, &format.end_marker);
    let mut resolver = LayoutResolver::new();
    let assembler = TransactionAssembler::new(spec, dates, format.continuation, &format.row_marker);
    let mut out = Extraction::default();

    for page in 0..source.page_count() {
        if window.is_closed() {
            break;
        }
        if !window.admit(page, &source.full_text(page, format.row_unit)) {
            continue;
        }

        let grouped = group_rows(source.words(page), format.row_unit);
        for word in grouped.rejected {
            tracing::warn!(page = page + 1, text = %word.text, "word has no usable position");
            out.warnings.push(Warning::RowError {
                page,
                detail: format!("word '{}' has no usable position", word.text),
            });
        }

        if format.relayout_each_page {
            resolver.reset();
        }
        let (layout, rows) = resolver.prepare(spec, grouped.rows)?;
        let built = assembler.assemble_page(&rows, layout);
        tracing::debug!(
            page = page + 1,
            rows = rows.len(),
            transactions = built.transactions.len(),
            discarded = built.discarded_rows,
            truncated = built.truncated,
            "page processed"
        );
        out.transactions.extend(built.transactions);
    }

    if !window.was_opened() {
        tracing::warn!("transaction history section not found");
        out.warnings.push(Warning::NoWindowFound);
    } else if window.is_unterminated() {
        tracing::warn!("end marker not found; read to the last page");
        out.warnings.push(Warning::UnterminatedWindow);
    }
    out.pages = window.span();
    Ok(out)
}
