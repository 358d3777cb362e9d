// Primitives for reading and writing delimited text files.

use std::io::Read;

use survey_tally::builder::TableBuilder;

use crate::survey::*;

/// Reads a delimited text file. The first record is the header.
///
/// A file with no record at all is read as an empty table without columns.
pub fn read_csv_table(path: &str, delimiter: u8) -> SurveyResult<Table> {
    let rdr = reader_builder(delimiter)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_records(rdr, path)
}

fn reader_builder(delimiter: u8) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // The header is read by hand, and row lengths are checked by the table builder.
    builder.has_headers(false).flexible(true).delimiter(delimiter);
    builder
}

fn read_records<R: Read>(rdr: csv::Reader<R>, path: &str) -> SurveyResult<Table> {
    let mut records = rdr.into_records();
    let header = match records.next() {
        Some(r) => r.context(CsvLineParseSnafu { path, lineno: 1usize })?,
        None => {
            warn!("read_records: {} is empty", path);
            return Ok(Table::empty(&[]));
        }
    };
    let columns: Vec<String> = header.iter().map(|s| s.to_string()).collect();
    debug!("read_records: {}: header: {:?}", path, columns);
    let mut builder = TableBuilder::new(&columns).context(MalformedTableSnafu { path })?;

    for (idx, line_r) in records.enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        builder
            .add_row_owned(line.iter().map(|s| s.to_string()).collect())
            .context(MalformedTableSnafu { path })?;
    }
    info!(
        "read_records: {}: {} rows, {} columns",
        path,
        builder.num_rows(),
        columns.len()
    );
    Ok(builder.build())
}

/// Writes a table as delimited text, header first.
///
/// The content goes to a temporary sibling file that is renamed over the
/// destination once complete, so a failure never leaves a partial file at
/// `path`.
pub fn write_csv_table(path: &str, table: &Table, delimiter: u8) -> SurveyResult<()> {
    let tmp_path = format!("{}.tmp", path);
    let res = write_records(&tmp_path, table, delimiter)
        .and_then(|_| fs::rename(&tmp_path, path).context(WritingFileSnafu { path }));
    if res.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    res
}

fn write_records(path: &str, table: &Table, delimiter: u8) -> SurveyResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context(WritingCsvSnafu { path })?;
    wtr.write_record(table.columns())
        .context(WritingCsvSnafu { path })?;
    for row in table.rows() {
        wtr.write_record(row).context(WritingCsvSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    debug!("write_records: {}: {} rows", path, table.len());
    Ok(())
}
