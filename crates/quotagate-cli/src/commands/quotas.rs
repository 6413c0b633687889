//! Quota ledger inspection.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use quotagate_core::error::AppError;
use quotagate_core::types::BillingMonth;

use super::Cli;
use crate::output;

/// Arguments for the quotas command
#[derive(Debug, Args)]
pub struct QuotasArgs {
    /// Billing month as YYYY-MM (defaults to the current UTC month)
    #[arg(short, long)]
    pub month: Option<BillingMonth>,
}

/// Quota display row
#[derive(Debug, Serialize, Tabled)]
struct QuotaRow {
    /// Token
    token: String,
    /// Remaining seconds
    remaining: i64,
    /// Status
    status: String,
}

/// Execute the quotas command
pub async fn execute(args: &QuotasArgs, cli: &Cli) -> Result<(), AppError> {
    let service = cli.connect().await?;
    let month = args.month.unwrap_or_else(BillingMonth::current);
    let report = service.quota_report(month).await?;

    let rows: Vec<QuotaRow> = report
        .quotas
        .iter()
        .map(|(token, quota)| QuotaRow {
            token: token.clone(),
            remaining: quota.remaining_seconds,
            status: quota.status.as_str().to_string(),
        })
        .collect();

    if cli.format == output::OutputFormat::Table {
        output::print_kv("Month", &report.month.to_string());
    }
    output::print_rows(&rows, &report, cli.format);
    Ok(())
}
