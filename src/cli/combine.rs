use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::{files_under, Context};
use crate::dates::statement_date_in;
use crate::error::{LiftError, Result};

/// Converted statements under `dir` ordered by the date in their names.
/// Files without a date are returned separately.
pub fn dated_outputs(dir: &Path, suffix: &str, exclude: &Path) -> Result<(Vec<(NaiveDate, PathBuf)>, Vec<PathBuf>)> {
    let wanted = format!("{suffix}.csv");
    let mut dated = Vec::new();
    let mut undated = Vec::new();
    for path in files_under(dir)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(&wanted) || path == exclude {
            continue;
        }
        match statement_date_in(name) {
            Some(date) => dated.push((date, path)),
            None => undated.push(path),
        }
    }
    dated.sort();
    undated.sort();
    Ok((dated, undated))
}

/// Append every input's rows under one shared header.
pub fn combine_files(inputs: &[PathBuf], output: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(output)?;
    let mut header: Option<csv::StringRecord> = None;
    let mut rows = 0usize;
    for input in inputs {
        let mut rdr = csv::Reader::from_path(input)?;
        let this = rdr.headers()?.clone();
        match &header {
            None => {
                wtr.write_record(&this)?;
                header = Some(this);
            }
            Some(h) if !h.iter().eq(this.iter()) => {
                return Err(LiftError::Other(format!(
                    "{} has different columns than the files before it",
                    input.display()
                )));
            }
            Some(_) => {}
        }
        for record in rdr.records() {
            wtr.write_record(&record?)?;
            rows += 1;
        }
    }
    wtr.flush()?;
    Ok(rows)
}

pub fn run(ctx: &Context, dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| dir.join("combined.csv"));
    let (dated, undated) = dated_outputs(dir, &ctx.settings.output_suffix, &output)?;
    for path in &undated {
        tracing::warn!(path = %path.display(), "no statement date in file name; skipped");
        println!("{} {} has no MMDDYY date; skipped", "warning:".yellow(), path.display());
    }
    if dated.is_empty() {
        println!("No converted statements found in {}", dir.display());
        return Ok(());
    }
    let inputs: Vec<PathBuf> = dated.into_iter().map(|(_, p)| p).collect();
    let rows = combine_files(&inputs, &output)?;
    println!("Combined {} files ({rows} rows) into {}", inputs.len(), output.display());
    Ok(())
}
