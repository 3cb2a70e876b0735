use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::{files_under, Context};
use crate::error::{LiftError, Result};
use crate::formats::StatementFormat;
use crate::source::is_word_dump;
use crate::statement::{output_path_for, process_statement, write_csv, StatementTable};

/// Word dumps under `dir`, recursively, in path order.
pub fn find_word_dumps(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = files_under(dir)?;
    found.retain(|p| is_word_dump(p));
    Ok(found)
}

#[cfg(feature = "parallel")]
fn process_all(paths: &[PathBuf], format: &StatementFormat) -> Vec<Result<StatementTable>> {
    use rayon::prelude::*;
    paths
        .par_iter()
        .map(|p| process_statement(p, format, None))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn process_all(paths: &[PathBuf], format: &StatementFormat) -> Vec<Result<StatementTable>> {
    paths
        .iter()
        .map(|p| process_statement(p, format, None))
        .collect()
}

fn report(input: &Path, output: &Path, table: &StatementTable) {
    let span = table
        .pages
        .map(|(a, b)| format!(", pages {}-{}", a + 1, b + 1))
        .unwrap_or_default();
    println!(
        "{} {} -> {} ({} transactions{span})",
        "ok".green(),
        input.display(),
        output.display(),
        table.len()
    );
    for warning in &table.warnings {
        println!("   {} {warning}", "warning:".yellow());
    }
}

pub fn run(
    ctx: &Context,
    path: &Path,
    batch: bool,
    format_key: Option<&str>,
    statement_date: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = ctx.format(format_key)?;
    let suffix = &ctx.settings.output_suffix;

    if !batch {
        let table = process_statement(path, &format, statement_date)?;
        let out = output.unwrap_or_else(|| output_path_for(path, suffix));
        write_csv(&table, &out)?;
        report(path, &out, &table);
        return Ok(());
    }

    let paths = find_word_dumps(path)?;
    if paths.is_empty() {
        println!("No word dumps found under {}", path.display());
        return Ok(());
    }
    tracing::info!(documents = paths.len(), format = %format.key, "converting batch");

    // Extraction runs concurrently; files are written one at a time.
    let results = process_all(&paths, &format);
    let mut failed = 0usize;
    for (input, result) in paths.iter().zip(results) {
        let written = result.and_then(|table| {
            let out = output_path_for(input, suffix);
            write_csv(&table, &out)?;
            report(input, &out, &table);
            Ok(())
        });
        if let Err(e) = written {
            failed += 1;
            tracing::error!(path = %input.display(), error = %e, "statement failed");
            println!("{} {}: {e}", "failed".red(), input.display());
        }
    }

    println!(
        "{} converted, {} failed",
        paths.len() - failed,
        failed
    );
    if failed > 0 {
        return Err(LiftError::Other(format!(
            "{failed} of {} statements failed",
            paths.len()
        )));
    }
    Ok(())
}
