use comfy_table::{Cell, Table};

use crate::assembler::ContinuationPolicy;
use crate::cli::Context;
use crate::error::Result;
use crate::formats::all_formats;

pub fn list(ctx: &Context) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Name", "Window", "Ends at", "Continuation", "Columns"]);
    for f in all_formats(&ctx.settings)? {
        let key = if f.key == ctx.settings.default_format {
            format!("{} *", f.key)
        } else {
            f.key.clone()
        };
        let continuation = match f.continuation {
            ContinuationPolicy::PreviousRowDated => "next line",
            ContinuationPolicy::AnyOpen => "until next date",
        };
        table.add_row(vec![
            Cell::new(key),
            Cell::new(&f.name),
            Cell::new(f.window_label()),
            Cell::new(&f.end_marker),
            Cell::new(continuation),
            Cell::new(f.columns.names().join(", ")),
        ]);
    }
    println!("Statement formats (* = default)\n{table}");
    println!("Settings: {}", ctx.settings_path.display());
    Ok(())
}
