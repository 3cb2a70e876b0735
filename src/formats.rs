use serde::{Deserialize, Serialize};

use crate::assembler::ContinuationPolicy;
use crate::error::{LiftError, Result};
use crate::models::{Column, ColumnSpec};
use crate::settings::Settings;
use crate::window::WindowStart;

/// Everything that differs between statement layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementFormat {
    pub key: String,
    pub name: String,
    pub columns: ColumnSpec,
    pub window: WindowStart,
    /// Page text that closes the window; the page itself is still read.
    #[serde(default)]
    pub end_marker: String,
    /// Row text below which nothing on the page is transaction data.
    #[serde(default)]
    pub row_marker: String,
    #[serde(default)]
    pub continuation: ContinuationPolicy,
    /// Find the column headers again on every page instead of once.
    #[serde(default)]
    pub relayout_each_page: bool,
    #[serde(default = "default_row_unit")]
    pub row_unit: f64,
}

fn default_row_unit() -> f64 {
    1.0
}

impl StatementFormat {
    pub fn validate(&self) -> Result<()> {
        if !(self.row_unit.is_finite() && self.row_unit > 0.0) {
            return Err(LiftError::Settings(format!(
                "format {}: row_unit must be a positive number",
                self.key
            )));
        }
        if let WindowStart::Marker { marker } = &self.window {
            if marker.is_empty() {
                return Err(LiftError::Settings(format!(
                    "format {}: start marker is empty",
                    self.key
                )));
            }
        }
        Ok(())
    }

    pub fn window_label(&self) -> String {
        match &self.window {
            WindowStart::Marker { marker } => format!("after \"{marker}\""),
            WindowStart::PageIndex { index } => format!("from page {}", index + 1),
        }
    }
}

fn wells_fargo_columns() -> Result<ColumnSpec> {
    ColumnSpec::new(vec![
        Column::date("Date"),
        Column::text("Number"),
        Column::text("Description"),
        Column::text("Deposits").with_header("Deposits/"),
        Column::text("Withdrawals").with_header("Withdrawals/"),
        Column::text("Ending daily balance").with_header("Ending daily"),
    ])
}

/// Formats that ship with the binary.
pub fn builtin_formats() -> Result<Vec<StatementFormat>> {
    Ok(vec![
        StatementFormat {
            key: "wells_fargo".into(),
            name: "Wells Fargo checking".into(),
            columns: wells_fargo_columns()?,
            window: WindowStart::Marker {
                marker: "Transaction history".into(),
            },
            end_marker: "Ending balance on".into(),
            row_marker: "Ending balance".into(),
            continuation: ContinuationPolicy::PreviousRowDated,
            relayout_each_page: false,
            row_unit: default_row_unit(),
        },
        StatementFormat {
            key: "wells_fargo_paged".into(),
            name: "Wells Fargo checking (no section heading)".into(),
            columns: wells_fargo_columns()?,
            window: WindowStart::PageIndex { index: 1 },
            end_marker: "Ending balance on".into(),
            row_marker: "Ending balance".into(),
            continuation: ContinuationPolicy::AnyOpen,
            relayout_each_page: true,
            row_unit: default_row_unit(),
        },
    ])
}

/// User formats first so they can shadow a built-in key.
pub fn all_formats(settings: &Settings) -> Result<Vec<StatementFormat>> {
    let mut formats = settings.formats.clone();
    for builtin in builtin_formats()? {
        if !formats.iter().any(|f| f.key == builtin.key) {
            formats.push(builtin);
        }
    }
    Ok(formats)
}

pub fn get_by_key(settings: &Settings, key: &str) -> Result<StatementFormat> {
    let format = all_formats(settings)?
        .into_iter()
        .find(|f| f.key == key)
        .ok_or_else(|| LiftError::UnknownFormat(key.to_string()))?;
    format.validate()?;
    Ok(format)
}
