use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};

/// Workbook reader type used for every source file.
pub type SourceReader = Xlsx<BufReader<File>>;

/// File extensions recognised as spreadsheet sources.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];

/// Opens an `.xlsx`/`.xlsm` workbook for reading.
pub fn open_source(path: &Path) -> Result<SourceReader> {
    let workbook: SourceReader = open_workbook(path)?;
    Ok(workbook)
}

/// Returns true when the path carries a recognised spreadsheet extension.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Looks a sheet up by name, ignoring ASCII case the way office engines do,
/// and returns the name as stored in the workbook.
pub fn resolve_sheet_name(workbook: &SourceReader, requested: &str) -> Option<String> {
    let requested = requested.trim();
    workbook
        .sheet_names()
        .iter()
        .find(|name| name.eq_ignore_ascii_case(requested))
        .cloned()
}

/// Reads the used range of a sheet. A missing sheet is reported as
/// [`ToolError::SheetNotFound`].
pub fn read_sheet(workbook: &mut SourceReader, requested: &str) -> Result<(String, Range<DataType>)> {
    let name = resolve_sheet_name(workbook, requested)
        .ok_or_else(|| ToolError::SheetNotFound(requested.to_string()))?;
    let range = workbook
        .worksheet_range(&name)
        .ok_or_else(|| ToolError::SheetNotFound(name.clone()))?
        .map_err(ToolError::from)?;
    Ok((name, range))
}

/// Reads the first sheet of a workbook.
pub fn read_first_sheet(workbook: &mut SourceReader) -> Result<(String, Range<DataType>)> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::InvalidWorkbook("workbook contains no sheets".into()))?;
    read_sheet(workbook, &name)
}

/// Converts a range into display text, one `Vec<String>` per row.
pub fn range_to_text(range: &Range<DataType>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
        .collect()
}

pub fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
