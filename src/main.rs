use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use backoffice::cli::{
    handle_collections_command, handle_import_command, handle_report_command,
    handle_validate_command, ReportCommands,
};
use backoffice::config::{paths::BackofficePaths, settings::Settings};
use backoffice::storage::Storage;

#[derive(Parser)]
#[command(
    name = "backoffice",
    version,
    about = "Financial reports for a small organization's back office",
    long_about = "Backoffice imports JSON exports of the payments, sales, expenses, \
                  assets, liabilities, products and equity collections and computes \
                  profit & loss, balance sheet, sales, inventory and expense reports \
                  from them."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Import a JSON export of a collection
    Import {
        /// Collection name (payments, sales, expenses, assets, liabilities, products, equity)
        collection: String,
        /// JSON file holding an array of documents
        file: PathBuf,
        /// Keep existing documents; imported documents with the same id replace them
        #[arg(long)]
        merge: bool,
    },

    /// List collections and their document counts
    #[command(alias = "ls")]
    Collections,

    /// Report fields that could not be read from the imported documents
    Validate {
        /// List every issue instead of the first few
        #[arg(long)]
        all: bool,
    },

    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),
}

fn init_logging(settings: &Settings) {
    let env = env_logger::Env::default().default_filter_or(settings.log_level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BackofficePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Backoffice at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Import your collections next, for example:");
            println!("  backoffice import payments payments.json");
            println!("  backoffice import products products.json");
        }
        Some(Commands::Config) => {
            println!("Backoffice Configuration");
            println!("========================");
            println!("Data directory:        {}", paths.base_dir().display());
            println!("Collections directory: {}", paths.collections_dir().display());
            println!("Settings file:         {}", paths.settings_file().display());
            println!("Initialized:           {}", storage.is_initialized());
            println!();
            println!("Settings:");
            if !settings.organization_name.is_empty() {
                println!("  Organization:     {}", settings.organization_name);
            }
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Default bucket:   {}", settings.default_bucket);
            println!("  Equity tolerance: {} cents", settings.equity_tolerance_cents);
            println!("  Log level:        {}", settings.log_level);
        }
        Some(Commands::Import {
            collection,
            file,
            merge,
        }) => {
            handle_import_command(&storage, &collection, &file, merge)?;
        }
        Some(Commands::Collections) => {
            handle_collections_command(&storage)?;
        }
        Some(Commands::Validate { all }) => {
            handle_validate_command(&storage, all)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        None => {
            println!("Backoffice - financial reports from your back-office data");
            println!();
            println!("Run 'backoffice --help' for usage information.");
        }
    }

    Ok(())
}
