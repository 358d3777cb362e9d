use crate::survey::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: String,
    /// A file path, or `stdout`.
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    /// `csv` (any delimiter) or `xlsx`.
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub delimiter: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub name: String,
    pub kind: String,
    pub field: String,
    pub order: Option<String>,
    pub blanks: Option<String>,
    pub shares: Option<bool>,
    pub delimiter: Option<String>,
    pub normalize: Option<bool>,
    pub target: Option<String>,
    pub comparison: Option<String>,
}

impl ViewConfig {
    pub fn order(&self) -> SurveyResult<SortOrder> {
        match self.order.as_deref() {
            None | Some("descending") => Ok(SortOrder::Descending),
            Some("ascending") => Ok(SortOrder::Ascending),
            Some(x) => whatever!("view {:?}: unknown order: {}", self.name, x),
        }
    }

    pub fn blanks(&self) -> SurveyResult<BlankPolicy> {
        match self.blanks.as_deref() {
            None | Some("keep") => Ok(BlankPolicy::Keep),
            Some("drop") => Ok(BlankPolicy::Drop),
            Some(x) => whatever!("view {:?}: unknown blank policy: {}", self.name, x),
        }
    }

    pub fn comparison(&self) -> SurveyResult<Comparison> {
        match self.comparison.as_deref() {
            None | Some("equals") => Ok(Comparison::Equals),
            Some("notEquals") => Ok(Comparison::NotEquals),
            Some(x) => whatever!("view {:?}: unknown comparison: {}", self.name, x),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSource")]
    pub data_source: DataSource,
    pub views: Vec<ViewConfig>,
}

pub fn read_config(path: &str) -> SurveyResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Reads a reference summary, as produced by a previous run.
pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}
