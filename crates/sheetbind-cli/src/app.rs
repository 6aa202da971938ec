//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use sheetbind_data::sources::column_index;
use sheetbind_data::{
    CellValue, DataEngine, ExcelSource, Extraction, RowMap, SheetRequest, Table, WorkbookReader,
};

use crate::config::{JobConfig, OutputFormat, OutputSettings};

#[derive(Parser)]
#[command(name = "sheetbind")]
#[command(author, version, about = "Spreadsheet sheets to tables and records", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a workbook
    Sheets {
        /// Input workbook (.xls, .xlsx, .xlsm)
        input: PathBuf,
    },

    /// Extract one or more sheets as tables
    Extract {
        /// Input workbook (.xls, .xlsx, .xlsm)
        input: PathBuf,

        /// Sheet to extract, optionally with columns: NAME or NAME:2,0 or NAME:C,A
        #[arg(short, long = "sheet")]
        sheets: Vec<String>,

        /// Job configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (overrides the config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Dump the generic rows of a sheet, keyed by column letter
    Records {
        /// Input workbook (.xls, .xlsx, .xlsm)
        input: PathBuf,

        /// Sheet name
        #[arg(short, long)]
        sheet: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sheets { input } => {
            sheets_command(&input)?;
        }
        Commands::Extract {
            input,
            sheets,
            config,
            format,
        } => {
            let job = match config {
                Some(path) => JobConfig::load(&path)?,
                None => JobConfig::default(),
            };
            let (requests, output) = resolve_job(&job, &sheets, format)?;
            extract_command(&input, &requests, &output)?;
        }
        Commands::Records {
            input,
            sheet,
            format,
        } => {
            records_command(&input, &sheet, format)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    // A subscriber may already be installed when running embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Combine command-line flags with a job configuration
///
/// `--sheet` flags replace the config's sheet list; `--format` replaces its
/// output format.
pub fn resolve_job(
    job: &JobConfig,
    sheets: &[String],
    format: Option<OutputFormat>,
) -> Result<(Vec<SheetRequest>, OutputSettings)> {
    let requests = if sheets.is_empty() {
        job.requests()
    } else {
        sheets
            .iter()
            .map(|arg| parse_sheet_arg(arg))
            .collect::<Result<Vec<_>>>()?
    };

    if requests.is_empty() {
        anyhow::bail!("No sheets requested: use --sheet or a config file with [[sheets]]");
    }

    let mut output = job.output.clone();
    if let Some(format) = format {
        output.format = format;
    }

    Ok((requests, output))
}

/// Parse a `--sheet` argument
///
/// `NAME` requests every column; `NAME:2,0` or `NAME:C,A` requests those
/// columns in that order. Sheet names cannot contain `:`, so the last one
/// separates the column list.
pub fn parse_sheet_arg(arg: &str) -> Result<SheetRequest> {
    let Some((name, columns)) = arg.rsplit_once(':') else {
        return Ok(SheetRequest::new(arg));
    };

    let indexes = columns
        .split(',')
        .map(|token| {
            let token = token.trim();
            if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
                token
                    .parse::<u32>()
                    .with_context(|| format!("Invalid column index '{}' in '{}'", token, arg))
            } else {
                column_index(token)
                    .with_context(|| format!("Invalid column '{}' in '{}'", token, arg))
            }
        })
        .collect::<Result<Vec<u32>>>()?;

    Ok(SheetRequest::new(name).with_columns(indexes))
}

/// Execute the sheets command
pub fn sheets_command(input: &Path) -> Result<()> {
    let source = ExcelSource::open(input)
        .with_context(|| format!("Failed to open workbook: {}", input.display()))?;

    for name in source.list_sheets()? {
        println!("{}", name);
    }
    Ok(())
}

/// Execute the extract command
pub fn extract_command(
    input: &Path,
    requests: &[SheetRequest],
    output: &OutputSettings,
) -> Result<()> {
    debug!("Extracting {} sheet(s) from {}", requests.len(), input.display());

    let extraction = DataEngine::read_tables(input, requests)
        .with_context(|| format!("Failed to extract from {}", input.display()))?;

    let rendered = match output.format {
        OutputFormat::Json => extraction_to_json(&extraction, output.pretty)?,
        OutputFormat::Text => extraction_to_text(&extraction),
    };
    print!("{}", rendered);
    Ok(())
}

/// Execute the records command
pub fn records_command(input: &Path, sheet: &str, format: OutputFormat) -> Result<()> {
    let mut source = ExcelSource::open(input)
        .with_context(|| format!("Failed to open workbook: {}", input.display()))?;
    let rows = source
        .row_maps(sheet)
        .with_context(|| format!("Failed to read sheet '{}'", sheet))?;
    let keys = rows.keys().to_vec();

    let records = rows
        .skip(1)
        .collect::<sheetbind_data::Result<Vec<RowMap>>>()
        .with_context(|| format!("Failed to read rows of sheet '{}'", sheet))?;

    let rendered = match format {
        OutputFormat::Json => rows_to_json(&keys, &records)?,
        OutputFormat::Text => rows_to_text(&keys, &records),
    };
    print!("{}", rendered);
    Ok(())
}

/// Render an extraction as JSON
pub fn extraction_to_json(extraction: &Extraction, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(extraction)
    } else {
        serde_json::to_string(extraction)
    }
    .context("Failed to serialize extraction to JSON")?;
    json.push('\n');
    Ok(json)
}

/// Render an extraction as tab-separated text
///
/// Multi-sheet results get a `# name` line before each table.
pub fn extraction_to_text(extraction: &Extraction) -> String {
    match extraction {
        Extraction::Single(table) => table_to_text(table),
        Extraction::Multiple(tables) => tables
            .iter()
            .map(|named| format!("# {}\n{}", named.name, table_to_text(&named.table)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn table_to_text(table: &Table) -> String {
    let mut output = table.column_names().join("\t");
    output.push('\n');
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(CellValue::to_string).collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }
    output
}

fn rows_to_json(keys: &[String], rows: &[RowMap]) -> Result<String> {
    let objects: Vec<BTreeMap<&str, &CellValue>> = rows
        .iter()
        .map(|row| {
            keys.iter()
                .filter_map(|key| row.get(key).map(|value| (key.as_str(), value)))
                .collect()
        })
        .collect();

    let mut json =
        serde_json::to_string_pretty(&objects).context("Failed to serialize rows to JSON")?;
    json.push('\n');
    Ok(json)
}

fn rows_to_text(keys: &[String], rows: &[RowMap]) -> String {
    let mut output = keys.join("\t");
    output.push('\n');
    for row in rows {
        let cells: Vec<String> = keys
            .iter()
            .map(|key| row.get(key).map(CellValue::to_string).unwrap_or_default())
            .collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }
    output
}
