//! CLI commands for report export
//!
//! Exports the selected period as CSV or PDF into the documents directory,
//! or into `--output` when given.

use std::path::PathBuf;

use clap::Subcommand;

use super::{PeriodArgs, ReportContext};
use crate::error::{ReportError, ReportResult};
use crate::export::{Delivery, DeliveryMethod, ExportDestination, ReportExporter};
use crate::services::PeriodResolver;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the period's expenses as CSV
    Csv {
        #[command(flatten)]
        period: PeriodArgs,

        /// Directory to write into instead of the documents directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the period's report as a PDF document
    Pdf {
        #[command(flatten)]
        period: PeriodArgs,

        /// Directory to write into instead of the documents directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub async fn handle_export_command(ctx: &ReportContext, cmd: ExportCommands) -> ReportResult<()> {
    let (period, output, is_pdf) = match cmd {
        ExportCommands::Csv { period, output } => (period, output, false),
        ExportCommands::Pdf { period, output } => (period, output, true),
    };

    let mut destination = ExportDestination::from_settings(&ctx.paths, &ctx.settings);
    if output.is_some() {
        destination.native_dir = output;
    }

    let snapshot = ctx.load(&period).await?;
    let exporter = ReportExporter::new(&ctx.settings, &ctx.catalog, &ctx.formatter, destination);

    let result = if is_pdf {
        exporter.export_document(&snapshot)
    } else {
        exporter.export_csv(&snapshot, PeriodResolver::today())
    };

    match result {
        Ok(delivery) => {
            print_delivery(&delivery);
            Ok(())
        }
        // Nothing to export is a notice, not a failure
        Err(ReportError::EmptyDataset) => {
            println!("{}", ReportError::EmptyDataset);
            Ok(())
        }
        Err(ReportError::IncompleteSelector) => {
            println!("{}", ReportError::IncompleteSelector);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn print_delivery(delivery: &Delivery) {
    match delivery.method {
        DeliveryMethod::Native => println!("Exported to {}", delivery.path.display()),
        DeliveryMethod::Download => println!(
            "Documents folder unavailable; exported to {}",
            delivery.path.display()
        ),
    }
}
