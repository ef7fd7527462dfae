use calamine::{DataType, Range};
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{Result, ToolError};

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm";

/// Builds a standalone workbook that holds only `sheet_name`, with every
/// cell kept at its original coordinates, and returns the serialised bytes.
pub fn isolate_sheet(sheet_name: &str, range: &Range<DataType>) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (row_idx, col_idx, cell) in range.cells() {
        let row = start_row + to_u32(row_idx)?;
        let col = u16::try_from(start_col as usize + col_idx).map_err(|_| {
            ToolError::InvalidWorkbook(format!("column {col_idx} out of range in '{sheet_name}'"))
        })?;

        match cell {
            DataType::Empty => {}
            DataType::String(value) => {
                worksheet.write_string(row, col, value)?;
            }
            DataType::Float(value) => {
                worksheet.write_number(row, col, *value)?;
            }
            DataType::Int(value) => {
                worksheet.write_number(row, col, *value as f64)?;
            }
            DataType::Bool(value) => {
                worksheet.write_boolean(row, col, *value)?;
            }
            DataType::DateTime(serial) => {
                worksheet.write_number_with_format(row, col, *serial, &date_format)?;
            }
            other => {
                worksheet.write_string(row, col, other.to_string())?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn to_u32(index: usize) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| ToolError::InvalidWorkbook(format!("row {index} out of range")))
}
