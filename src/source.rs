use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LiftError, Result, Warning};
use crate::models::Word;
use crate::rows::group_rows;

/// Supplies positioned words for each page of one document.
pub trait WordSource {
    fn page_count(&self) -> usize;

    /// Words on a zero-based page, in no particular order.
    fn words(&self, page: usize) -> Vec<Word>;

    /// Whole-page text used for marker matching, one line per row on the
    /// same `unit` grid the row grouper uses.
    fn full_text(&self, page: usize, unit: f64) -> String {
        group_rows(self.words(page), unit)
            .rows
            .iter()
            .map(|r| r.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One word as written by `pdfplumber words --format csv|json`.
#[derive(Debug, Deserialize)]
struct DumpRecord {
    page: usize,
    text: String,
    x0: f64,
    top: f64,
}

/// Words loaded from a word dump file, bucketed by page.
#[derive(Debug, Default)]
pub struct WordDump {
    pages: Vec<Vec<Word>>,
    pub warnings: Vec<Warning>,
}

/// Highest page number a dump record may carry.
const MAX_PAGES: usize = 10_000;

pub const DUMP_SUFFIXES: &[&str] = &[".words.csv", ".words.json"];

/// True for file names the batch walker should pick up.
pub fn is_word_dump(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| DUMP_SUFFIXES.iter().any(|s| n.ends_with(s)))
}

impl WordDump {
    #[cfg(test)]
    pub fn from_pages(pages: Vec<Vec<Word>>) -> Self {
        Self {
            pages,
            warnings: Vec::new(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        match ext.as_deref() {
            Some("csv") => Self::from_csv(reader),
            Some("json") => Self::from_json(reader),
            _ => Err(LiftError::UnsupportedDump(path.display().to_string())),
        }
    }

    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let headers = rdr.headers()?.clone();
        let mut dump = Self::default();
        for result in rdr.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    dump.malformed(line, e.to_string());
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());
            match record.deserialize::<DumpRecord>(Some(&headers)) {
                Ok(word) => dump.push(word, line),
                Err(e) => dump.malformed(line, e.to_string()),
            }
        }
        Ok(dump)
    }

    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
        let mut dump = Self::default();
        for (i, value) in values.into_iter().enumerate() {
            let line = i as u64 + 1;
            match serde_json::from_value::<DumpRecord>(value) {
                Ok(record) => dump.push(record, line),
                Err(e) => dump.malformed(line, e.to_string()),
            }
        }
        Ok(dump)
    }

    fn malformed(&mut self, line: u64, detail: String) {
        tracing::warn!(line, %detail, "skipping malformed word record");
        self.warnings.push(Warning::MalformedRecord { line, detail });
    }

    fn push(&mut self, record: DumpRecord, line: u64) {
        if record.page == 0 {
            self.malformed(line, "page numbers start at 1".to_string());
            return;
        }
        if record.page > MAX_PAGES {
            self.malformed(line, format!("page {} is beyond page {MAX_PAGES}", record.page));
            return;
        }
        if record.text.trim().is_empty() {
            return;
        }
        if self.pages.len() < record.page {
            self.pages.resize_with(record.page, Vec::new);
        }
        self.pages[record.page - 1].push(Word::new(record.text, record.x0, record.top));
    }
}

impl WordSource for WordDump {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn words(&self, page: usize) -> Vec<Word> {
        self.pages.get(page).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_dump_buckets_words_by_page() {
        let csv = "\
page,text,x0,top,x1,bottom
1,Summary,10.0,20.0,60.0,30.0
3,Transaction history,10.0,40.5,90.0,50.0
3,1/4,12.0,80.0,30.0,90.0
";
        let dump = WordDump::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(dump.page_count(), 3);
        assert!(dump.words(1).is_empty());
        assert_eq!(dump.words(2).len(), 2);
        assert_eq!(dump.words(2)[0], Word::new("Transaction history", 10.0, 40.5));
        assert!(dump.words(9).is_empty());
        assert!(dump.warnings.is_empty());
    }

    #[test]
    fn test_csv_dump_skips_malformed_and_blank_records() {
        let csv = "\
page,text,x0,top
1,ok,1.0,2.0
1,bad,notanumber,2.0
0,zero,1.0,2.0
1,   ,1.0,2.0
";
        let dump = WordDump::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(dump.words(0), vec![Word::new("ok", 1.0, 2.0)]);
        assert_eq!(dump.warnings.len(), 2);
    }

    #[test]
    fn test_json_dump() {
        let json = r#"[
            {"page": 1, "text": "Date", "x0": 20.0, "top": 10.0, "doctop": 10.0},
            {"page": 2, "text": "1/2", "x0": 20.0, "top": 30.0},
            {"page": "two", "text": "x", "x0": 1.0, "top": 1.0}
        ]"#;
        let dump = WordDump::from_json(json.as_bytes()).unwrap();
        assert_eq!(dump.page_count(), 2);
        assert_eq!(dump.words(1)[0].text, "1/2");
        assert!(matches!(dump.warnings[0], Warning::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_full_text_follows_reading_order() {
        let dump = WordDump::from_pages(vec![vec![
            Word::new("history", 60.0, 10.2),
            Word::new("row", 10.0, 30.0),
            Word::new("Transaction", 10.0, 9.9),
        ]]);
        assert_eq!(dump.full_text(0, 1.0), "Transaction history\nrow");
    }

    #[test]
    fn test_full_text_uses_row_unit() {
        let dump = WordDump::from_pages(vec![vec![
            Word::new("Ending", 10.0, 100.0),
            Word::new("balance on", 60.0, 103.0),
        ]]);
        assert_eq!(dump.full_text(0, 1.0), "Ending\nbalance on");
        assert_eq!(dump.full_text(0, 8.0), "Ending balance on");
    }

    #[test]
    fn test_out_of_range_page_is_malformed_not_allocated() {
        let csv = "\
page,text,x0,top
18446744073709551615,x,1,1
100000000,y,1,1
2,ok,1,1
";
        let dump = WordDump::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(dump.page_count(), 2);
        assert_eq!(dump.words(1), vec![Word::new("ok", 1.0, 1.0)]);
        assert!(matches!(dump.warnings[0], Warning::MalformedRecord { line: 2, .. }));
        assert!(matches!(dump.warnings[1], Warning::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_unquoted_thousands_separator_is_rejected() {
        let csv = "\
page,text,x0,top,x1,bottom
1,Payroll,112.00,95.00,150.00,103.00
1,2,000.00,335.00,95.00,360.00,103.00
";
        let dump = WordDump::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(dump.words(0), vec![Word::new("Payroll", 112.0, 95.0)]);
        assert_eq!(dump.warnings.len(), 1);
        assert!(matches!(dump.warnings[0], Warning::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_open_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("013124.words.csv");
        std::fs::write(&path, "page,text,x0,top\n1,Date,1,1\n").unwrap();
        assert_eq!(WordDump::open(&path).unwrap().page_count(), 1);
        assert!(is_word_dump(&path));

        let other = dir.path().join("notes.txt");
        std::fs::write(&other, "x").unwrap();
        assert!(matches!(WordDump::open(&other), Err(LiftError::UnsupportedDump(_))));
        assert!(!is_word_dump(&other));
    }
}
