// Excel import (xlsx, xls, xlsb, ods) of a single sheet into a Table

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use crawlparity_recon::{CellValue, ReconError};
use tracing::debug;

use crate::table::Table;

/// Load one sheet. `sheet = None` reads the first sheet in the workbook.
pub fn load(path: &Path, sheet: Option<&str>, source: &str) -> Result<Table, ReconError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| {
        ReconError::source_load(source, format!("failed to open {}: {e}", path.display()))
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let target = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                ReconError::source_load(
                    source,
                    format!("sheet '{name}' not found (sheets: {})", sheet_names.join(", ")),
                )
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReconError::source_load(source, "workbook contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&target)
        .map_err(|e| ReconError::source_load(source, format!("failed to read sheet '{target}': {e}")))?;

    let (height, width) = range.get_size();
    debug!(source, sheet = %target, height, width, "read sheet");

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::from_rows(rows))
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_field(s),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Error cells carry no usable value
        Data::Error(_) => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
