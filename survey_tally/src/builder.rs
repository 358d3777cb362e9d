pub use crate::config::*;

use std::collections::HashSet;

/// A builder for assembling a table row by row.
///
/// Readers should go through the builder: it guarantees that the resulting
/// table is rectangular.
///
/// ```
/// pub use survey_tally::builder::TableBuilder;
/// # use survey_tally::TallyErrors;
///
/// let mut builder = TableBuilder::new(&["Timestamp".to_string(), "Beta".to_string()])?;
///
/// builder.add_row(&["4/15/2025 3:09:03".to_string(), "Yes".to_string()])?;
/// let table = builder.build();
/// assert_eq!(table.len(), 1);
///
/// # Ok::<(), TallyErrors>(())
/// ```
pub struct TableBuilder {
    pub(crate) _columns: Vec<String>,
    pub(crate) _rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new(columns: &[String]) -> Result<TableBuilder, TallyErrors> {
        let mut seen: HashSet<&str> = HashSet::new();
        for c in columns {
            if !seen.insert(c.as_str()) {
                return Err(TallyErrors::DuplicateColumn(c.clone()));
            }
        }
        Ok(TableBuilder {
            _columns: columns.to_vec(),
            _rows: Vec::new(),
        })
    }

    /// Adds a row to the builder.
    ///
    /// The row must contain one value per column, blanks included.
    pub fn add_row(&mut self, values: &[String]) -> Result<(), TallyErrors> {
        self.add_row_owned(values.to_vec())
    }

    pub fn add_row_owned(&mut self, values: Vec<String>) -> Result<(), TallyErrors> {
        if values.len() != self._columns.len() {
            return Err(TallyErrors::RaggedRow {
                row: self._rows.len() + 1,
                expected: self._columns.len(),
                found: values.len(),
            });
        }
        self._rows.push(values);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self._rows.len()
    }

    pub fn build(self) -> Table {
        Table {
            columns: self._columns,
            rows: self._rows,
        }
    }
}

/// Builds a table from string slices. Mostly useful for tests and small inline
/// batches.
pub fn table_from_strs(columns: &[&str], rows: &[&[&str]]) -> Result<Table, TallyErrors> {
    let cols: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
    let mut builder = TableBuilder::new(&cols)?;
    for row in rows {
        builder.add_row_owned(row.iter().map(|s| s.to_string()).collect())?;
    }
    Ok(builder.build())
}
