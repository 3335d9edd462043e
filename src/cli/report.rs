//! CLI commands for reports
//!
//! The spending summary and the three chart views.

use clap::Subcommand;

use super::{PeriodArgs, ReportContext};
use crate::display::{
    format_distribution, format_heading, format_summary, format_top_categories, format_trend,
};
use crate::error::{ReportError, ReportResult};
use crate::reports::{CategoryDistribution, DailyTrend, TopCategories};
use crate::services::{PeriodResolver, ReportSnapshot};

/// Chart subcommands
#[derive(Subcommand, Debug)]
pub enum ChartCommands {
    /// Spending share per category
    Distribution {
        #[command(flatten)]
        period: PeriodArgs,

        /// Print the chart data as JSON
        #[arg(long)]
        json: bool,
    },

    /// The five largest categories
    Top {
        #[command(flatten)]
        period: PeriodArgs,

        /// Print the chart data as JSON
        #[arg(long)]
        json: bool,
    },

    /// Spending per day
    Trend {
        #[command(flatten)]
        period: PeriodArgs,

        /// Print the chart data as JSON
        #[arg(long)]
        json: bool,
    },
}

fn heading(ctx: &ReportContext, snapshot: &ReportSnapshot) -> String {
    let period_line = match &snapshot.interval {
        Some(interval) => {
            PeriodResolver::describe(&snapshot.selector, interval, &ctx.settings.date_format)
        }
        None => snapshot.selector.kind.display_name().to_string(),
    };
    format_heading(
        &ctx.settings.report_title,
        &period_line,
        snapshot.interval.as_ref(),
    )
}

/// Handle the summary command
pub async fn handle_summary_command(ctx: &ReportContext, period: PeriodArgs) -> ReportResult<()> {
    let snapshot = ctx.load(&period).await?;

    print!(
        "{}",
        format_summary(
            &heading(ctx, &snapshot),
            &snapshot.summary,
            &snapshot.budgets,
            &ctx.style()
        )
    );
    Ok(())
}

/// Handle chart commands
pub async fn handle_chart_command(ctx: &ReportContext, cmd: ChartCommands) -> ReportResult<()> {
    match cmd {
        ChartCommands::Distribution { period, json } => {
            let snapshot = ctx.load(&period).await?;
            let chart = CategoryDistribution::from_summary(&snapshot.summary, &ctx.catalog);
            if json {
                return print_json(&chart);
            }
            println!("{}", heading(ctx, &snapshot));
            print!("{}", format_distribution(&chart, &ctx.style()));
        }
        ChartCommands::Top { period, json } => {
            let snapshot = ctx.load(&period).await?;
            let chart = TopCategories::from_summary(&snapshot.summary, &ctx.catalog);
            if json {
                return print_json(&chart);
            }
            println!("{}", heading(ctx, &snapshot));
            print!("{}", format_top_categories(&chart, &ctx.style()));
        }
        ChartCommands::Trend { period, json } => {
            let snapshot = ctx.load(&period).await?;
            let chart = DailyTrend::from_summary(&snapshot.summary);
            if json {
                return print_json(&chart);
            }
            println!("{}", heading(ctx, &snapshot));
            print!(
                "{}",
                format_trend(&chart, &ctx.settings.date_format, &ctx.style())
            );
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> ReportResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ReportError::Json(format!("Failed to serialize chart: {}", e)))?;
    println!("{}", text);
    Ok(())
}
