// elreg CLI - monthly electoral register update runs

mod exit_codes;
mod merge;
mod prep;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use elreg_prep::PrepError;
use elreg_register::MergeError;

use exit_codes::{
    EXIT_CONFIG, EXIT_CSV_PARSE, EXIT_ERROR, EXIT_IO, EXIT_PREP_LOOKUP,
    EXIT_PREP_UNKNOWN_HEADER, EXIT_SCHEMA, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "elreg")]
#[command(about = "Prepare supplier electoral register files and merge monthly updates")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a transformed update file into the register
    #[command(after_help = "\
Examples:
  elreg merge
  elreg merge -u update.csv -r register.csv -o register.csv
  elreg merge --numeric-months --strict --json > report.json
  elreg merge --config merge.toml --audit -v")]
    Merge {
        /// Update file
        #[arg(short, long, default_value = "update.csv")]
        update: PathBuf,

        /// Current register file
        #[arg(short, long, default_value = "register.csv")]
        register: PathBuf,

        /// Output register file
        #[arg(short, long, default_value = "register.csv")]
        output: PathBuf,

        /// Merge configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compare lifecycle months as integers instead of strings
        #[arg(long)]
        numeric_months: bool,

        /// Log and report every applied action
        #[arg(long)]
        audit: bool,

        /// Do not write timestamped backups of the inputs
        #[arg(long)]
        no_backup: bool,

        /// Fail without writing if any record is skipped
        #[arg(long)]
        strict: bool,

        /// Print the merge report as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Map a supplier file's columns onto the canonical register fields
    #[command(after_help = "\
Examples:
  elreg map
  elreg map -i electors.csv -o mapped.csv -d ';'
  elreg map -d auto --synonyms council-synonyms.toml")]
    Map {
        /// Supplier file
        #[arg(short, long, default_value = "electors.csv")]
        input: PathBuf,

        /// Mapped output file
        #[arg(short, long, default_value = "mapped.csv")]
        output: PathBuf,

        /// Field delimiter of the supplier file: one character, 'tab' or 'auto'
        #[arg(short, long, default_value = ",")]
        delimiter: String,

        /// Synonym table (TOML) replacing the built-in one
        #[arg(long)]
        synonyms: Option<PathBuf>,

        /// Print the mapping summary as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Clean, enrich and key a mapped file
    #[command(after_help = "\
Examples:
  elreg transform
  elreg transform -i mapped.csv -o transformed.csv -p pd.csv --month 3")]
    Transform {
        /// Mapped input file
        #[arg(short, long, default_value = "mapped.csv")]
        input: PathBuf,

        /// Transformed output file
        #[arg(short, long, default_value = "transformed.csv")]
        output: PathBuf,

        /// Polling district lookup table
        #[arg(short, long = "pd-file", default_value = "pd.csv")]
        pd_file: PathBuf,

        /// Processing month written into the lifecycle columns
        #[arg(long)]
        month: Option<u32>,

        /// Transform configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the transform report as JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Merge {
            update,
            register,
            output,
            config,
            numeric_months,
            audit,
            no_backup,
            strict,
            json,
        } => merge::cmd_merge(merge::MergeArgs {
            update,
            register,
            output,
            config,
            numeric_months,
            audit,
            no_backup,
            strict,
            json,
        }),
        Commands::Map { input, output, delimiter, synonyms, json } => {
            prep::cmd_map(input, output, delimiter, synonyms, json)
        }
        Commands::Transform { input, output, pd_file, month, config, json } => {
            prep::cmd_transform(input, output, pd_file, month, config, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Map a merge engine error onto its exit code.
    pub fn merge(err: MergeError) -> Self {
        let code = match &err {
            MergeError::ConfigParse(_) | MergeError::ConfigValidation(_) => EXIT_CONFIG,
            e if e.is_schema() => EXIT_SCHEMA,
            MergeError::Csv { .. } => EXIT_CSV_PARSE,
            _ => EXIT_IO,
        };
        let hint = match &err {
            MergeError::MissingKeyField { source, .. } if source == "update" => {
                Some("run `elreg transform` first so every row carries an Elector ID".to_string())
            }
            MergeError::MissingColumn { .. } => Some(
                "lifecycle columns are added by `elreg transform` from the Status flag".to_string(),
            ),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Map a preparation error onto its exit code.
    pub fn prep(err: PrepError) -> Self {
        let (code, hint) = match &err {
            PrepError::ConfigParse(_) | PrepError::ConfigValidation(_) => (EXIT_CONFIG, None),
            PrepError::UnknownHeader(_) => (
                EXIT_PREP_UNKNOWN_HEADER,
                Some("add the column to a synonym table and pass it with --synonyms".to_string()),
            ),
            PrepError::LookupRow { .. } => (
                EXIT_PREP_LOOKUP,
                Some("each row must be: LAD, E-code, O-code, PD code, constituency".to_string()),
            ),
            PrepError::Csv(_) => (EXIT_CSV_PARSE, None),
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Read an input file, naming it in the error.
pub(crate) fn read_input(path: &std::path::Path) -> Result<String, CliError> {
    elreg_io::read_file_as_utf8(path).map_err(CliError::io)
}
