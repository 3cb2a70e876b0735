use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::statement::process_statement;

pub fn run(ctx: &Context, path: &Path, format_key: Option<&str>, statement_date: Option<NaiveDate>) -> Result<()> {
    let format = ctx.format(format_key)?;
    let table = process_statement(path, &format, statement_date)?;

    let mut out = Table::new();
    out.set_header(&table.columns);
    for record in &table.records {
        out.add_row(record.iter().map(Cell::new).collect::<Vec<_>>());
    }
    println!("{} ({})\n{out}", path.display(), format.name);
    match table.reference_date {
        Some(date) => println!("{} transactions, statement date {date}", table.len()),
        None => println!("{} transactions", table.len()),
    }
    for warning in &table.warnings {
        println!("{} {warning}", "warning:".yellow());
    }
    Ok(())
}
