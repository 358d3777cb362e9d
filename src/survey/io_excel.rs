use calamine::{open_workbook, DataType, Reader, Xlsx};
use chrono::{Duration, DurationRound};

use survey_tally::builder::TableBuilder;

use crate::survey::*;

/// Reads a response export in the Excel format. The first row of the worksheet
/// is the header.
///
/// Without a worksheet name, the first worksheet is used.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> SurveyResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    }
    .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    for cell in header {
        columns.push(read_cell(cell, 1)?);
    }
    // Spreadsheets pad the header with empty cells up to the widest row.
    while columns.last().map(|c| c.is_empty()).unwrap_or(false) {
        columns.pop();
    }
    debug!("read_excel_table: header: {:?}", columns);

    let mut builder = TableBuilder::new(&columns).context(MalformedTableSnafu { path })?;
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let mut values: Vec<String> = Vec::with_capacity(columns.len());
        for (col, cell) in row.iter().enumerate() {
            let v = read_cell(cell, lineno)?;
            if col < columns.len() {
                values.push(v);
            } else if !v.is_empty() {
                // A value outside of any named column.
                return ExcelWrongCellTypeSnafu {
                    lineno: lineno as u64,
                    content: format!("{:?}", row),
                }
                .fail();
            }
        }
        // Ranges are rectangular, so rows are never shorter than the header.
        if values.iter().all(|v| v.is_empty()) {
            debug!("read_excel_table: skipping empty line {}", lineno);
            continue;
        }
        builder
            .add_row_owned(values)
            .context(MalformedTableSnafu { path })?;
    }
    info!(
        "read_excel_table: {}: {} rows, {} columns",
        path,
        builder.num_rows(),
        columns.len()
    );
    Ok(builder.build())
}

fn read_cell(cell: &DataType, lineno: usize) -> SurveyResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::DateTime(_) => match cell.as_datetime() {
            Some(dt) => Ok(format_timestamp(dt)),
            None => ExcelWrongCellTypeSnafu {
                lineno: lineno as u64,
                content: format!("{:?}", cell),
            }
            .fail(),
        },
        _ => ExcelWrongCellTypeSnafu {
            lineno: lineno as u64,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

// The timestamp layout of form exports, e.g. `4/15/2025 3:09:03`.
fn format_timestamp(dt: chrono::NaiveDateTime) -> String {
    // Serials are fractions of a day: snap to the nearest second.
    let dt = dt.duration_round(Duration::seconds(1)).unwrap_or(dt);
    dt.format("%-m/%-d/%Y %-H:%M:%S").to_string()
}
