use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_reporter::cli::{
    handle_chart_command, handle_export_command, handle_summary_command, ChartCommands,
    ExportCommands, PeriodArgs, ReportContext,
};
use expense_reporter::config::{ReporterPaths, Settings};
use expense_reporter::services::JsonExpenseSource;

#[derive(Parser)]
#[command(
    name = "expense-report",
    author = "Kaylee Beyene",
    version,
    about = "Spending summaries, charts and exports for a reporting period",
    long_about = "expense-report aggregates your expenses over a period (this month, \
                  last year, a custom range, ...) into a spending summary and charts, \
                  and exports them as CSV or as a paginated PDF report."
)]
struct Cli {
    /// Data directory (overrides the platform default)
    #[arg(long, global = true, env = "EXPENSE_REPORTER_DATA_DIR")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the spending summary for a period
    Summary {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Chart views of a period
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Export a period as CSV or PDF
    #[command(subcommand)]
    Export(ExportCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    expense_reporter::init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data {
        Some(dir) => ReporterPaths::with_base_dir(dir),
        None => ReporterPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Summary { period }) => {
            let ctx = ReportContext::new(paths, settings);
            handle_summary_command(&ctx, period).await?;
        }
        Some(Commands::Chart(cmd)) => {
            let ctx = ReportContext::new(paths, settings);
            handle_chart_command(&ctx, cmd).await?;
        }
        Some(Commands::Export(cmd)) => {
            let ctx = ReportContext::new(paths, settings);
            handle_export_command(&ctx, cmd).await?;
        }
        Some(Commands::Init) => {
            println!("Initializing expense-report at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            let source = JsonExpenseSource::new(&paths);
            if !paths.expenses_file().exists() {
                source.save_expenses(Vec::new())?;
            }
            if !paths.budgets_file().exists() {
                source.save_budgets(Vec::new())?;
            }
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Add expenses to {}", paths.expenses_file().display());
            println!("then run 'expense-report summary'.");
        }
        Some(Commands::Config) => {
            println!("expense-report Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!(
                "Export directory: {}",
                paths.documents_dir(settings.documents_dir.as_ref()).display()
            );
            println!("Fallback:         {}", paths.downloads_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency:        {}", settings.currency_code);
            println!("  Date format:     {}", settings.date_format);
            println!(
                "  Week starts on:  {}",
                if settings.first_day_of_week == 1 {
                    "Monday"
                } else if settings.first_day_of_week == 0 {
                    "Sunday"
                } else {
                    "custom"
                }
            );
            println!("  Report title:    {}", settings.report_title);
            println!("  Fetch timeout:   {}s", settings.fetch_timeout_secs);
            if let Some(logo) = &settings.logo_path {
                println!("  Logo:            {}", logo.display());
            }
            println!();
            println!(
                "Initialized: {}",
                if paths.is_initialized() { "Yes" } else { "No" }
            );
        }
        None => {
            println!("expense-report - spending summaries, charts and exports");
            println!();
            println!("Run 'expense-report --help' for usage information.");
            println!("Run 'expense-report summary' for this month's spending.");
        }
    }

    Ok(())
}
