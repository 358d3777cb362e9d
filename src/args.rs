use clap::{Parser, Subcommand};

/// This is a survey response merging and tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Appends a batch of new responses to the canonical file, dropping duplicate rows.
    /// The result is written to a new file; the canonical file is left untouched.
    Merge {
        /// (file path) The canonical response file.
        #[clap(long, value_parser)]
        canonical: String,

        /// (file path) The batch of new responses.
        #[clap(long, value_parser)]
        batch: String,

        /// (default comma) The field delimiter of the canonical file. The merged file uses the same delimiter.
        #[clap(long, value_parser)]
        canonical_delimiter: Option<String>,

        /// (default depends on --batch-type) The field delimiter of the batch: a single character, or one of
        /// comma, tab, semicolon, pipe.
        #[clap(long, value_parser)]
        batch_delimiter: Option<String>,

        /// (default csv) The type of the batch: csv, tsv or xlsx.
        #[clap(long, value_parser)]
        batch_type: Option<String>,

        /// When the batch is an Excel file, indicates the name of the worksheet to use. Defaults to the first one.
        #[clap(long, value_parser)]
        excel_worksheet_name: Option<String>,

        /// (file path or empty) Where to write the merged file. Defaults to <canonical name>_updated.csv next to
        /// the canonical file.
        #[clap(short, long, value_parser)]
        out: Option<String>,
    },

    /// Computes the views described in a report configuration over the canonical file.
    Summarize {
        /// (file path) The JSON report configuration.
        #[clap(short, long, value_parser)]
        config: String,

        /// (file path or empty) If specified, the response file to read. Setting this option overrides what may be
        /// specified in the configuration.
        #[clap(short, long, value_parser)]
        input: Option<String>,

        /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
        /// location. Setting this option overrides the path that may be specified in the configuration.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (file path) A reference file containing a summary in JSON format. If provided, the command will
        /// check that the computed summary matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
}
