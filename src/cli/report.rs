//! CLI commands for reports
//!
//! Every report takes the same date range and keyword filter and can be
//! printed as a table or exported as CSV, JSON or YAML.

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use log::{info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::display::format_report;
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::{export_report_csv, export_report_json, export_report_yaml};
use crate::models::{BucketSize, Dataset, DateRange, Money};
use crate::reports::{
    BalanceSheetReport, ExpenseReport, InventoryReport, ProfitAndLossReport, ReportFilter,
    ReportTable, SalesReport,
};
use crate::storage::Storage;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal table
    #[default]
    Table,
    /// CSV (report table and totals)
    Csv,
    /// JSON (full report)
    Json,
    /// YAML (full report, human-readable)
    Yaml,
}

/// Date range and keyword shared by every report
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    pub from: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    pub to: Option<String>,

    /// Only records with a text field containing this (case-insensitive)
    #[arg(short, long)]
    pub keyword: Option<String>,
}

/// Where and how a report is written
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write to this file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Revenue, cost of goods sold, expenses and net income
    #[command(alias = "profit-loss")]
    Pnl {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Assets, liabilities and equity
    #[command(alias = "balance")]
    BalanceSheet {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Revenue and units sold per period, with top products
    Sales {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Period size: day, week or month (default from settings)
        #[arg(short, long)]
        bucket: Option<String>,

        /// Number of top products to list
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Stock on hand, unit costs and margins
    #[command(alias = "stock")]
    Inventory {
        /// Only products with a name or category containing this
        #[arg(short, long)]
        keyword: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Operating expenses by category
    Expenses {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> BackofficeResult<()> {
    let (dataset, summary) = storage.load_dataset()?;
    if summary.total_issues() > 0 {
        info!(
            "{} field issue(s) while reading collections; run 'backoffice validate' for details",
            summary.total_issues()
        );
    }

    run_report(&dataset, settings, cmd)
}

/// Generate and write a report from an already-loaded dataset
pub fn run_report(dataset: &Dataset, settings: &Settings, cmd: ReportCommands) -> BackofficeResult<()> {
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Pnl { filter, output } => {
            let filter = build_filter(&filter, settings)?;
            let report = ProfitAndLossReport::generate(dataset, &filter);
            write_report(&report, &output, currency)
        }
        ReportCommands::BalanceSheet { filter, output } => {
            let filter = build_filter(&filter, settings)?;
            let tolerance = Money::from_cents(settings.equity_tolerance_cents);
            let report = BalanceSheetReport::generate(dataset, &filter, tolerance);
            write_report(&report, &output, currency)
        }
        ReportCommands::Sales {
            filter,
            output,
            bucket,
            top,
        } => {
            let filter = build_filter(&filter, settings)?;
            let bucket_size = match bucket {
                Some(value) => BucketSize::parse(&value).map_err(|e| {
                    BackofficeError::Validation(format!("{}. Use day, week or month", e))
                })?,
                None => settings.default_bucket,
            };
            let report = SalesReport::generate(dataset, &filter, bucket_size, top);
            write_report(&report, &output, currency)
        }
        ReportCommands::Inventory { keyword, output } => {
            let filter = ReportFilter::all().with_keyword(keyword.unwrap_or_default());
            let report = InventoryReport::generate(dataset, &filter);
            write_report(&report, &output, currency)
        }
        ReportCommands::Expenses { filter, output } => {
            let filter = build_filter(&filter, settings)?;
            let report = ExpenseReport::generate(dataset, &filter);
            write_report(&report, &output, currency)
        }
    }
}

/// Parse a date given on the command line
///
/// Accepts ISO dates and the configured date format. Unlike document fields,
/// a bad date here is an error.
pub fn parse_date_arg(value: &str, label: &str, date_format: &str) -> BackofficeResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, date_format))
        .map_err(|_| {
            BackofficeError::Validation(format!(
                "Invalid {} date: {}. Use YYYY-MM-DD",
                label, value
            ))
        })
}

/// Turn filter arguments into a report filter
pub fn build_filter(args: &FilterArgs, settings: &Settings) -> BackofficeResult<ReportFilter> {
    let from = args
        .from
        .as_deref()
        .map(|s| parse_date_arg(s, "start", &settings.date_format))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|s| parse_date_arg(s, "end", &settings.date_format))
        .transpose()?;

    let range = DateRange::new(from, to);
    if range.is_inverted() {
        warn!("Start date is after end date; no dated records will match");
    }

    Ok(ReportFilter::all()
        .with_range(range)
        .with_keyword(args.keyword.clone().unwrap_or_default()))
}

/// Write a report in the requested format to a file or standard output
pub fn write_report<R>(report: &R, output: &OutputArgs, currency: &str) -> BackofficeResult<()>
where
    R: ReportTable + Serialize,
{
    match &output.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BackofficeError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            render(report, output.format, &mut writer, currency)?;
            writer
                .flush()
                .map_err(|e| BackofficeError::Export(e.to_string()))?;
            println!("{} written to: {}", report.title(), path.display());
            Ok(())
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            render(report, output.format, &mut writer, currency)
        }
    }
}

fn render<R, W>(report: &R, format: OutputFormat, writer: &mut W, currency: &str) -> BackofficeResult<()>
where
    R: ReportTable + Serialize,
    W: Write,
{
    match format {
        OutputFormat::Table => write!(writer, "{}", format_report(report, currency))
            .map_err(|e| BackofficeError::Export(e.to_string())),
        OutputFormat::Csv => export_report_csv(report, writer),
        OutputFormat::Json => export_report_json(report, writer, true),
        OutputFormat::Yaml => export_report_yaml(report, writer),
    }
}
