// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A survey response table: one header row of column names and one row per
/// response.
///
/// Every row has exactly as many values as there are columns. Blank and absent
/// answers are both stored as the empty string.
///
/// Tables are usually built with [crate::builder::TableBuilder], which checks
/// the shape of every row.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl Table {
    /// A table with the given columns and no rows.
    pub fn empty(columns: &[String]) -> Table {
        Table {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The number of responses.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The position of a column, by exact name.
    pub fn column_index(&self, field: &str) -> Result<usize, TallyErrors> {
        self.columns
            .iter()
            .position(|c| c == field)
            .ok_or_else(|| TallyErrors::FieldNotFound(field.to_string()))
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.as_str())
    }
}

// ******** Output data structures *********

/// Row counts reported after a merge.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MergeStats {
    pub canonical_rows: usize,
    pub batch_rows: usize,
    pub merged_rows: usize,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MergeResult {
    pub table: Table,
    pub stats: MergeStats,
}

/// The label of a group in a frequency count.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Category {
    Value(String),
    /// The group of rows with no answer.
    Blank,
}

impl Category {
    pub const BLANK_LABEL: &'static str = "(blank)";

    pub fn from_value(s: &str) -> Category {
        if s.is_empty() {
            Category::Blank
        } else {
            Category::Value(s.to_string())
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Value(s) => write!(f, "{}", s),
            Category::Blank => write!(f, "{}", Category::BLANK_LABEL),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FieldCount {
    pub label: Category,
    pub count: u64,
}

/// A count together with its share of the total, in percent.
#[derive(PartialEq, Debug, Clone)]
pub struct FieldShare {
    pub label: Category,
    pub count: u64,
    pub percent: f64,
}

/// Errors that prevent a tabulation or a merge from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// The requested column does not exist in the table.
    FieldNotFound(String),
    /// A row does not have the same number of values as the header.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The same column name appears twice in a header.
    DuplicateColumn(String),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::FieldNotFound(field) => write!(f, "field not found: {:?}", field),
            TallyErrors::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} values, expected {} (one per column)",
                row, found, expected
            ),
            TallyErrors::DuplicateColumn(name) => {
                write!(f, "column {:?} appears more than once in the header", name)
            }
        }
    }
}

// ********* Tabulation options **********

/// The order in which counts are returned.
///
/// Ties always keep the order in which the labels first appear in the table.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortOrder {
    /// Largest counts first, for "top N" displays.
    Descending,
    /// Smallest counts first, for horizontal bar charts.
    Ascending,
}

/// What to do with blank answers in a single-field frequency count.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum BlankPolicy {
    /// Blanks form their own [Category::Blank] group.
    Keep,
    /// Blank rows are left out of the count.
    Drop,
}

/// How option strings of a multi-select answer are compared.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OptionNormalization {
    /// Exact string match on the split fragments. This reproduces the
    /// historical counts.
    Exact,
    /// Fragments are trimmed and lowercased before counting, and empty
    /// fragments are dropped.
    TrimCaseFold,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Comparison {
    Equals,
    NotEquals,
}

/// The delimiter used by form tools to join the options of a multi-select
/// answer.
pub const DEFAULT_OPTION_DELIMITER: &str = ", ";
