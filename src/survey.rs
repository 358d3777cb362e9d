use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_tally::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

use crate::survey::config_reader::*;
use crate::survey::io_common::*;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Malformed table in {path}: {source}"))]
    MalformedTable { source: TallyErrors, path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet named {name} in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("No data found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot read line {lineno} of the spreadsheet: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("View {view:?}: {source}"))]
    FieldNotFound { source: TallyErrors, view: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

// **** Merging ****

/// Where a new batch of responses comes from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BatchSource {
    Delimited { path: String, delimiter: u8 },
    Excel {
        path: String,
        worksheet: Option<String>,
    },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MergeSettings {
    pub canonical_path: String,
    pub canonical_delimiter: u8,
    pub batch: BatchSource,
    /// Defaults to `<canonical stem>_updated.csv`.
    pub output_path: Option<String>,
}

impl MergeSettings {
    pub fn from_args(
        canonical: &str,
        batch: &str,
        canonical_delimiter: Option<&str>,
        batch_delimiter: Option<&str>,
        batch_type: Option<&str>,
        excel_worksheet_name: Option<&str>,
        out: Option<&str>,
    ) -> SurveyResult<MergeSettings> {
        let batch = match batch_type.unwrap_or("csv") {
            "csv" => BatchSource::Delimited {
                path: batch.to_string(),
                delimiter: parse_delimiter(batch_delimiter.unwrap_or(","))?,
            },
            "tsv" => BatchSource::Delimited {
                path: batch.to_string(),
                delimiter: parse_delimiter(batch_delimiter.unwrap_or("tab"))?,
            },
            "xlsx" => BatchSource::Excel {
                path: batch.to_string(),
                worksheet: excel_worksheet_name.map(|s| s.to_string()),
            },
            x => whatever!("Batch type {:?} is not supported (csv, tsv, xlsx)", x),
        };
        Ok(MergeSettings {
            canonical_path: canonical.to_string(),
            canonical_delimiter: parse_delimiter(canonical_delimiter.unwrap_or(","))?,
            batch,
            output_path: out.map(|s| s.to_string()),
        })
    }
}

/// Merges a batch into the canonical file and writes the result to a new
/// file. The canonical file itself is never modified.
pub fn run_merge(settings: &MergeSettings) -> SurveyResult<MergeStats> {
    let out_path = settings
        .output_path
        .clone()
        .unwrap_or_else(|| default_output_path(&settings.canonical_path));
    if same_file(&out_path, &settings.canonical_path) {
        whatever!(
            "Refusing to overwrite the canonical file {}: choose a different output path",
            out_path
        );
    }

    info!("Attempting to read canonical file {:?}", settings.canonical_path);
    let canonical =
        io_csv::read_csv_table(&settings.canonical_path, settings.canonical_delimiter)?;
    let batch = read_batch(&settings.batch)?;

    let res = merge_tables(&canonical, &batch);
    info!("Writing merged table to {:?}", out_path);
    io_csv::write_csv_table(&out_path, &res.table, settings.canonical_delimiter)?;
    Ok(res.stats)
}

fn read_batch(source: &BatchSource) -> SurveyResult<Table> {
    match source {
        BatchSource::Delimited { path, delimiter } => {
            info!("Attempting to read batch file {:?}", path);
            io_csv::read_csv_table(path, *delimiter)
        }
        BatchSource::Excel { path, worksheet } => {
            info!("Attempting to read batch workbook {:?}", path);
            io_excel::read_excel_table(path, worksheet.as_deref())
        }
    }
}

// **** Summaries ****

#[derive(Eq, PartialEq, Debug, Clone)]
enum ViewKind {
    Frequency {
        order: SortOrder,
        blanks: BlankPolicy,
        shares: bool,
    },
    MultiSelect {
        delimiter: String,
        order: SortOrder,
        normalization: OptionNormalization,
    },
    Match {
        target: String,
        comparison: Comparison,
    },
    FreeText,
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct View {
    name: String,
    field: String,
    kind: ViewKind,
}

fn validate_views(views: &[ViewConfig]) -> SurveyResult<Vec<View>> {
    if views.is_empty() {
        whatever!("The configuration does not define any view");
    }
    let mut res: Vec<View> = Vec::new();
    for vc in views {
        let kind = match vc.kind.as_str() {
            "frequency" => ViewKind::Frequency {
                order: vc.order()?,
                blanks: vc.blanks()?,
                shares: vc.shares.unwrap_or(false),
            },
            "multiSelect" => ViewKind::MultiSelect {
                delimiter: vc
                    .delimiter
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPTION_DELIMITER.to_string()),
                order: vc.order()?,
                normalization: if vc.normalize.unwrap_or(false) {
                    OptionNormalization::TrimCaseFold
                } else {
                    OptionNormalization::Exact
                },
            },
            "match" => match vc.target.clone() {
                Some(target) => ViewKind::Match {
                    target,
                    comparison: vc.comparison()?,
                },
                None => whatever!("view {:?}: a match view needs a target", vc.name),
            },
            "freeText" => ViewKind::FreeText,
            x => whatever!("view {:?}: unknown kind: {}", vc.name, x),
        };
        res.push(View {
            name: vc.name.clone(),
            field: vc.field.clone(),
            kind,
        });
    }
    Ok(res)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn count_to_json(label: &Category, count: u64, percent: Option<f64>) -> JSValue {
    let mut js = json!({ "label": label.to_string(), "count": count });
    if *label == Category::Blank {
        js["blank"] = json!(true);
    }
    if let Some(p) = percent {
        js["percent"] = json!(round2(p));
    }
    js
}

fn counts_to_json(counts: &[FieldCount], shares: bool) -> Vec<JSValue> {
    if shares {
        with_shares(counts)
            .iter()
            .map(|share| count_to_json(&share.label, share.count, Some(share.percent)))
            .collect()
    } else {
        counts
            .iter()
            .map(|fc| count_to_json(&fc.label, fc.count, None))
            .collect()
    }
}

fn evaluate_view(table: &Table, view: &View) -> Result<JSValue, TallyErrors> {
    debug!("evaluate_view: {:?}", view);
    let js = match &view.kind {
        ViewKind::Frequency {
            order,
            blanks,
            shares,
        } => {
            let counts = count_values(table, &view.field, *order, *blanks)?;
            json!({
                "name": view.name,
                "kind": "frequency",
                "field": view.field,
                "counts": counts_to_json(&counts, *shares),
            })
        }
        ViewKind::MultiSelect {
            delimiter,
            order,
            normalization,
        } => {
            let counts = tabulate_options(table, &view.field, delimiter, *order, *normalization)?;
            let votes: u64 = counts.iter().map(|fc| fc.count).sum();
            json!({
                "name": view.name,
                "kind": "multiSelect",
                "field": view.field,
                "votes": votes,
                "counts": counts_to_json(&counts, false),
            })
        }
        ViewKind::Match { target, comparison } => {
            let count = count_matching(table, &view.field, target, *comparison)?;
            let comparison_name = match comparison {
                Comparison::Equals => "equals",
                Comparison::NotEquals => "notEquals",
            };
            json!({
                "name": view.name,
                "kind": "match",
                "field": view.field,
                "target": target,
                "comparison": comparison_name,
                "count": count,
            })
        }
        ViewKind::FreeText => {
            let responses = free_text(table, &view.field)?;
            json!({
                "name": view.name,
                "kind": "freeText",
                "field": view.field,
                "responses": responses,
            })
        }
    };
    Ok(js)
}

fn build_summary_js(config: &ReportConfig, views: &[View], table: &Table) -> SurveyResult<JSValue> {
    let mut results: Vec<JSValue> = Vec::new();
    for view in views {
        let js = evaluate_view(table, view).context(FieldNotFoundSnafu {
            view: view.name.clone(),
        })?;
        results.push(js);
    }
    Ok(json!({
        "config": {
            "reportName": config.output_settings.report_name,
            "source": simplify_file_name(&config.data_source.file_path),
            "totalResponses": table.len(),
        },
        "results": results,
    }))
}

fn read_source(source: &DataSource, path: &str) -> SurveyResult<Table> {
    info!("Attempting to read response file {:?}", path);
    match source.provider.as_str() {
        "csv" => {
            let delimiter = parse_delimiter(source.delimiter.as_deref().unwrap_or(","))?;
            io_csv::read_csv_table(path, delimiter)
        }
        "xlsx" => io_excel::read_excel_table(path, source.excel_worksheet_name.as_deref()),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

/// Computes every view of the report over a fresh read of the response file.
///
/// Arguments:
/// * `config_path` the JSON report configuration
/// * `input` if set, replaces the response file named in the configuration
/// * `out` if set, replaces the output path of the configuration (`stdout` is accepted)
/// * `check_summary_path` a reference summary that the output must match
pub fn run_summary(
    config_path: &str,
    input: Option<&str>,
    out: Option<&str>,
    check_summary_path: Option<&str>,
) -> SurveyResult<JSValue> {
    let config_p = Path::new(config_path);
    let config = read_config(config_path)?;
    debug!("config: {:?}", config);

    // Validate the views before reading any data.
    let views = validate_views(&config.views)?;

    let data_path: String = match input {
        Some(p) => p.to_string(),
        None => {
            let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
            let p: PathBuf = root_p.join(&config.data_source.file_path);
            p.as_path().display().to_string()
        }
    };
    let table = read_source(&config.data_source, &data_path)?;
    info!(
        "Summarizing {} responses over {} views",
        table.len(),
        views.len()
    );

    let result_js = build_summary_js(&config, &views, &table)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    let out_path = out
        .map(|s| s.to_string())
        .or_else(|| config.output_settings.output_path.clone());
    match out_path.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) => {
            info!("Writing summary to {:?}", p);
            fs::write(p, &pretty_js_stats).context(WritingFileSnafu { path: p })?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CANONICAL: &str = "\
Timestamp,How often?,Features,Install
4/15/2025 3:09:03,Weekly,\"Real-time phishing detection, All of the above\",Definitely
4/15/2025 3:20:37,Weekly,All of the above,Probably
";

    const BATCH_TSV: &str = "\
Timestamp\tHow often?\tFeatures\tInstall\tBeta
4/15/2025 3:20:37\tWeekly\tAll of the above\tProbably\t
4/16/2025 12:46:41\tRarely\tDark web monitoring\tNot sure\tMaybe
4/24/2025 1:56:40\tDaily\tReal-time phishing detection, Dark web monitoring\tDefinitely\tYes
";

    fn write(dir: &TempDir, name: &str, contents: &str) -> String {
        let p = dir.path().join(name);
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    fn tsv_settings(canonical: &str, batch: &str, out: Option<&str>) -> MergeSettings {
        MergeSettings::from_args(canonical, batch, None, None, Some("tsv"), None, out).unwrap()
    }

    #[test]
    fn merge_tab_batch_into_canonical() {
        let dir = TempDir::new().unwrap();
        let canonical = write(&dir, "responses.csv", CANONICAL);
        let batch = write(&dir, "batch.tsv", BATCH_TSV);

        let stats = run_merge(&tsv_settings(&canonical, &batch, None)).unwrap();
        assert_eq!(
            stats,
            MergeStats {
                canonical_rows: 2,
                batch_rows: 3,
                merged_rows: 4
            }
        );

        let out = default_output_path(&canonical);
        assert!(out.ends_with("responses_updated.csv"));
        let merged = io_csv::read_csv_table(&out, b',').unwrap();
        assert_eq!(
            merged.columns(),
            &["Timestamp", "How often?", "Features", "Install", "Beta"]
        );
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.value(0, 4), Some(""));
        assert_eq!(merged.value(3, 4), Some("Yes"));
        assert_eq!(
            merged.value(0, 2),
            Some("Real-time phishing detection, All of the above")
        );

        // The canonical snapshot is left as it was.
        assert_eq!(fs::read_to_string(&canonical).unwrap(), CANONICAL);
    }

    #[test]
    fn merge_refuses_to_overwrite_canonical() {
        let dir = TempDir::new().unwrap();
        let canonical = write(&dir, "responses.csv", CANONICAL);
        let batch = write(&dir, "batch.tsv", BATCH_TSV);
        let res = run_merge(&tsv_settings(&canonical, &batch, Some(&canonical)));
        assert!(res.is_err());
        assert_eq!(fs::read_to_string(&canonical).unwrap(), CANONICAL);
    }

    #[test]
    fn merge_ragged_batch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let canonical = write(&dir, "responses.csv", CANONICAL);
        let batch = write(&dir, "batch.tsv", "Timestamp\tInstall\n1\tYes\textra\n");
        let out = dir.path().join("merged.csv").display().to_string();
        let res = run_merge(&tsv_settings(&canonical, &batch, Some(&out)));
        assert!(matches!(res, Err(SurveyError::MalformedTable { .. })));
        assert!(!Path::new(&out).exists());
        assert!(!Path::new(&format!("{}.tmp", out)).exists());
    }

    #[test]
    fn merge_missing_canonical_fails() {
        let dir = TempDir::new().unwrap();
        let batch = write(&dir, "batch.tsv", BATCH_TSV);
        let missing = dir.path().join("missing.csv").display().to_string();
        let res = run_merge(&tsv_settings(&missing, &batch, None));
        assert!(matches!(res, Err(SurveyError::OpeningCsv { .. })));
    }

    #[test]
    fn merge_empty_batch_dedupes_canonical() {
        let dir = TempDir::new().unwrap();
        let doubled = format!("{}{}", CANONICAL, "4/15/2025 3:20:37,Weekly,All of the above,Probably\n");
        let canonical = write(&dir, "responses.csv", &doubled);
        let batch = write(&dir, "batch.csv", "");
        let settings =
            MergeSettings::from_args(&canonical, &batch, None, None, None, None, None).unwrap();
        let stats = run_merge(&settings).unwrap();
        assert_eq!(stats.canonical_rows, 3);
        assert_eq!(stats.batch_rows, 0);
        assert_eq!(stats.merged_rows, 2);
    }

    #[test]
    fn delimiters_by_name() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(":").unwrap(), b':');
        assert!(parse_delimiter("::").is_err());
    }

    // Rows of strings; `None` leaves the cell unwritten.
    fn write_xlsx(dir: &TempDir, name: &str, sheet: &str, rows: &[&[Option<&str>]]) -> String {
        let p = dir.path().join(name);
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    worksheet.write_string(r as u32, c as u16, *v).unwrap();
                }
            }
        }
        workbook.save(&p).unwrap();
        p.display().to_string()
    }

    const HEADER: &[Option<&str>] = &[
        Some("Timestamp"),
        Some("How often?"),
        Some("Features"),
        Some("Install"),
    ];

    #[test]
    fn merge_excel_batch_into_canonical() {
        let dir = TempDir::new().unwrap();
        let canonical = write(&dir, "responses.csv", CANONICAL);
        let batch = write_xlsx(
            &dir,
            "batch.xlsx",
            "Form Responses 1",
            &[
                HEADER,
                // Same answers as the second canonical row.
                &[
                    Some("4/15/2025 3:20:37"),
                    Some("Weekly"),
                    Some("All of the above"),
                    Some("Probably"),
                ],
                // An empty line in the middle of the sheet.
                &[],
                &[
                    Some("4/16/2025 12:46:41"),
                    Some("Rarely"),
                    Some("Dark web monitoring"),
                    None,
                ],
            ],
        );
        let out = dir.path().join("merged.csv").display().to_string();
        let settings = MergeSettings::from_args(
            &canonical,
            &batch,
            None,
            None,
            Some("xlsx"),
            Some("Form Responses 1"),
            Some(&out),
        )
        .unwrap();
        assert!(matches!(settings.batch, BatchSource::Excel { .. }));

        let stats = run_merge(&settings).unwrap();
        assert_eq!(
            stats,
            MergeStats {
                canonical_rows: 2,
                batch_rows: 2,
                merged_rows: 3
            }
        );
        let merged = io_csv::read_csv_table(&out, b',').unwrap();
        assert_eq!(merged.columns(), &["Timestamp", "How often?", "Features", "Install"]);
        assert_eq!(merged.value(2, 0), Some("4/16/2025 12:46:41"));
        assert_eq!(merged.value(2, 3), Some(""));
    }

    #[test]
    fn excel_batch_errors() {
        let dir = TempDir::new().unwrap();
        let batch = write_xlsx(
            &dir,
            "stray.xlsx",
            "Sheet1",
            &[
                HEADER,
                &[Some("1"), Some("Weekly"), None, None],
                // A value beyond the last named column.
                &[Some("2"), Some("Daily"), None, None, None, Some("stray")],
            ],
        );

        let res = io_excel::read_excel_table(&batch, Some("Nope"));
        assert!(matches!(res, Err(SurveyError::MissingWorksheet { .. })));

        let res = io_excel::read_excel_table(&batch, None);
        assert!(matches!(
            res,
            Err(SurveyError::ExcelWrongCellType { lineno: 3, .. })
        ));
    }

    #[test]
    fn excel_header_padding_is_trimmed() {
        let dir = TempDir::new().unwrap();
        // The first row is wider than the header, but its extra cell is empty.
        let batch = write_xlsx(
            &dir,
            "padded.xlsx",
            "Sheet1",
            &[
                &[Some("Timestamp"), Some("Install")],
                &[Some("1"), Some("Definitely"), Some("")],
            ],
        );
        let table = io_excel::read_excel_table(&batch, None).unwrap();
        assert_eq!(table.columns(), &["Timestamp", "Install"]);
        assert_eq!(table.len(), 1);
    }

    fn report_config(data_file: &str, views: JSValue) -> String {
        json!({
            "outputSettings": { "reportName": "Validation survey", "outputPath": null },
            "dataSource": { "provider": "csv", "filePath": data_file, "delimiter": null, "excelWorksheetName": null },
            "views": views,
        })
        .to_string()
    }

    fn standard_views() -> JSValue {
        json!([
            { "name": "Install intent", "kind": "frequency", "field": "Install", "order": "descending", "shares": true },
            { "name": "Feature demand", "kind": "multiSelect", "field": "Features", "order": "ascending" },
            { "name": "High install intent", "kind": "match", "field": "Install", "target": "Definitely", "comparison": "equals" },
            { "name": "Not definitely", "kind": "match", "field": "Install", "target": "Definitely", "comparison": "notEquals" },
            { "name": "Timestamps", "kind": "freeText", "field": "Timestamp" },
        ])
    }

    #[test]
    fn summary_over_canonical_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "responses.csv", CANONICAL);
        let config = write(&dir, "report.json", &report_config("responses.csv", standard_views()));
        let out = dir.path().join("summary.json").display().to_string();

        let js = run_summary(&config, None, Some(&out), None).unwrap();
        assert_eq!(js["config"]["totalResponses"], json!(2));
        assert_eq!(js["config"]["source"], json!("responses.csv"));

        let install = &js["results"][0];
        assert_eq!(install["counts"][0]["label"], json!("Definitely"));
        assert_eq!(install["counts"][0]["percent"], json!(50.0));

        let features = &js["results"][1];
        assert_eq!(features["votes"], json!(3));
        assert_eq!(features["counts"][0]["label"], json!("Real-time phishing detection"));
        assert_eq!(features["counts"][1]["label"], json!("All of the above"));
        assert_eq!(features["counts"][1]["count"], json!(2));

        assert_eq!(js["results"][2]["count"], json!(1));
        assert_eq!(js["results"][3]["count"], json!(1));
        assert_eq!(
            js["results"][4]["responses"],
            json!(["4/15/2025 3:09:03", "4/15/2025 3:20:37"])
        );

        // The written summary can serve as a reference for the next run.
        let again = run_summary(&config, None, Some("stdout"), Some(&out));
        assert!(again.is_ok());
    }

    #[test]
    fn summary_differs_from_reference() {
        let dir = TempDir::new().unwrap();
        write(&dir, "responses.csv", CANONICAL);
        let config = write(&dir, "report.json", &report_config("responses.csv", standard_views()));
        let reference = write(&dir, "reference.json", "{\"results\": []}");
        let res = run_summary(&config, None, Some("stdout"), Some(&reference));
        assert!(matches!(res, Err(SurveyError::Whatever { .. })));
    }

    #[test]
    fn summary_reports_missing_field() {
        let dir = TempDir::new().unwrap();
        write(&dir, "responses.csv", CANONICAL);
        let views = json!([{ "name": "Pricing", "kind": "frequency", "field": "What pricing?" }]);
        let config = write(&dir, "report.json", &report_config("responses.csv", views));
        match run_summary(&config, None, Some("stdout"), None) {
            Err(e @ SurveyError::FieldNotFound { .. }) => {
                let msg = e.to_string();
                assert!(msg.contains("Pricing"));
                assert!(msg.contains("What pricing?"));
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn malformed_config_names_the_file() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "broken.json", "{ \"views\": [");
        match run_summary(&config, None, Some("stdout"), None) {
            Err(e @ SurveyError::ParsingJson { .. }) => {
                assert!(e.to_string().contains("broken.json"));
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn summary_rejects_unknown_options_before_reading() {
        let dir = TempDir::new().unwrap();
        // The data file does not exist: validation must fail first.
        let views = json!([{ "name": "Pay", "kind": "match", "field": "Pay", "target": "x", "comparison": "greater" }]);
        let config = write(&dir, "report.json", &report_config("missing.csv", views));
        let res = run_summary(&config, None, Some("stdout"), None);
        assert!(matches!(res, Err(SurveyError::Whatever { .. })));

        let config = write(&dir, "empty.json", &report_config("missing.csv", json!([])));
        assert!(run_summary(&config, None, Some("stdout"), None).is_err());
    }
}
