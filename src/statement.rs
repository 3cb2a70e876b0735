use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::dates::{resolve_dates, DatePattern, StatementContext};
use crate::error::{Result, Warning};
use crate::extractor::extract;
use crate::formats::StatementFormat;
use crate::source::{WordDump, WordSource, DUMP_SUFFIXES};

/// Tabular result for one statement, ready to print or write.
#[derive(Debug)]
pub struct StatementTable {
    pub columns: Vec<String>,
    pub records: Vec<Vec<String>>,
    pub warnings: Vec<Warning>,
    pub pages: Option<(usize, usize)>,
    pub reference_date: Option<NaiveDate>,
}

impl StatementTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Run a loaded word source through extraction and date resolution.
///
/// With a statement context the date column is rewritten as `YYYY-MM-DD`;
/// without one the printed `M/D` is kept and a warning added.
pub fn build_table<S: WordSource + ?Sized>(
    source: &S,
    format: &StatementFormat,
    context: Option<StatementContext>,
) -> Result<StatementTable> {
    let dates = DatePattern::new()?;
    let extraction = extract(source, format, &dates)?;
    let spec = &format.columns;
    let mut warnings = extraction.warnings;

    let records = match context {
        Some(ctx) => {
            let (dated, skipped) = resolve_dates(extraction.transactions, spec, &ctx, &dates);
            warnings.extend(skipped);
            dated
                .into_iter()
                .map(|d| {
                    let mut values: Vec<String> = d.transaction.values().map(str::to_string).collect();
                    values[spec.date_index()] = d.date.format("%Y-%m-%d").to_string();
                    values
                })
                .collect()
        }
        None => {
            tracing::warn!("no statement date; dates left as printed");
            warnings.push(Warning::UnresolvedDates);
            extraction
                .transactions
                .iter()
                .map(|t| t.values().map(str::to_string).collect())
                .collect()
        }
    };

    Ok(StatementTable {
        columns: spec.names().into_iter().map(str::to_string).collect(),
        records,
        warnings,
        pages: extraction.pages,
        reference_date: context.map(|c| c.reference_date),
    })
}

/// Load a word dump from disk and build its table. The statement date comes
/// from `statement_date` or, failing that, the file name.
pub fn process_statement(
    path: &Path,
    format: &StatementFormat,
    statement_date: Option<NaiveDate>,
) -> Result<StatementTable> {
    let mut dump = WordDump::open(path)?;
    let context = statement_date
        .map(StatementContext::new)
        .or_else(|| StatementContext::from_file_name(path));
    let mut warnings = std::mem::take(&mut dump.warnings);
    let mut table = build_table(&dump, format, context)?;
    warnings.append(&mut table.warnings);
    table.warnings = warnings;
    Ok(table)
}

/// `<dir>/<stem><suffix>.csv`, where the stem drops any word dump suffix.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement");
    let stem = DUMP_SUFFIXES
        .iter()
        .find_map(|s| name.strip_suffix(s))
        .or_else(|| input.file_stem().and_then(|s| s.to_str()))
        .unwrap_or(name);
    input.with_file_name(format!("{stem}{suffix}.csv"))
}

/// Write the table as CSV: header row of column names, one row per record.
pub fn write_csv(table: &StatementTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.columns)?;
    for record in &table.records {
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::builtin_formats;
    use crate::models::Word;

    fn page() -> Vec<Word> {
        let mut words = vec![Word::new("Transaction history", 20.0, 30.0)];
        for (t, x) in [
            ("Date", 20.0),
            ("Number", 60.0),
            ("Description", 110.0),
            ("Deposits/", 330.0),
            ("Withdrawals/", 400.0),
            ("Ending daily", 470.0),
        ] {
            words.push(Word::new(t, x, 60.0));
        }
        words.extend([
            Word::new("12/30", 22.0, 80.0),
            Word::new("Coffee", 112.0, 80.0),
            Word::new("4.50", 405.0, 80.0),
            Word::new("1/2", 22.0, 95.0),
            Word::new("Payroll", 112.0, 95.0),
            Word::new("ACME INC", 112.0, 105.0),
            Word::new("2,000.00", 335.0, 95.0),
            Word::new("Ending balance on 1/31", 112.0, 130.0),
        ]);
        words
    }

    #[test]
    fn test_build_table_resolves_dates_across_year_end() {
        let format = builtin_formats().unwrap().remove(0);
        let ctx = StatementContext::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let table = build_table(&WordDump::from_pages(vec![page()]), &format, Some(ctx)).unwrap();
        assert_eq!(table.columns[0], "Date");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0][0], "2023-12-30");
        assert_eq!(table.records[1][0], "2024-01-02");
        assert_eq!(table.records[1][2], "Payroll\nACME INC");
        assert_eq!(table.records[1][3], "2,000.00");
        assert!(table.warnings.is_empty());
    }

    #[test]
    fn test_build_table_without_context_keeps_raw_dates() {
        let format = builtin_formats().unwrap().remove(0);
        let table = build_table(&WordDump::from_pages(vec![page()]), &format, None).unwrap();
        assert_eq!(table.records[0][0], "12/30");
        assert_eq!(table.warnings, vec![Warning::UnresolvedDates]);
    }

    #[test]
    fn test_output_path_for_strips_dump_suffix() {
        assert_eq!(
            output_path_for(Path::new("/s/013124.words.csv"), "_transactions"),
            PathBuf::from("/s/013124_transactions.csv")
        );
        assert_eq!(
            output_path_for(Path::new("/s/jan.json"), "_transactions"),
            PathBuf::from("/s/jan_transactions.csv")
        );
    }

    #[test]
    fn test_process_and_write_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("013124.words.csv");
        let mut content = String::from("page,text,x0,top\n");
        for w in page() {
            content.push_str(&format!("1,\"{}\",{},{}\n", w.text, w.x, w.y));
        }
        std::fs::write(&input, content).unwrap();

        let format = builtin_formats().unwrap().remove(0);
        let table = process_statement(&input, &format, None).unwrap();
        assert_eq!(table.reference_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        let out = output_path_for(&input, "_transactions");
        write_csv(&table, &out).unwrap();

        let mut rdr = csv::Reader::from_path(&out).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.len(), 6);
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][2], "Payroll\nACME INC");
    }
}
