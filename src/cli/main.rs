use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use facility_archive::archive::{ArchiveReportRequest, ReportFormat, ReportType, SearchParams};
use facility_archive::models::CollectionKind;
use reqwest::{Client, Response};
use serde_json::json;

#[derive(Parser)]
#[command(name = "facility-archive-cli")]
#[command(about = "Facility Archive CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "FACILITY_ARCHIVE_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an archive report
    Report {
        /// all, maintenance, work_orders, issues or inspections
        #[arg(short = 't', long, default_value = "all")]
        report_type: String,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(short, long)]
        from: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short = 'F', long)]
        financials: bool,

        /// Emit CSV instead of JSON
        #[arg(long)]
        csv: bool,

        #[arg(short, long)]
        requested_by: String,
    },

    /// Search archived records
    Search {
        /// Collection to search; repeat for several (default: all)
        #[arg(short, long)]
        collection: Vec<String>,

        /// Status to match; repeat for several
        #[arg(short, long)]
        status: Vec<String>,

        #[arg(short, long)]
        from: Option<String>,

        #[arg(short, long)]
        to: Option<String>,

        #[arg(short, long)]
        keywords: Option<String>,

        /// Per-collection result cap
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Flag completed maintenance tasks as archived
    AutoArchive,

    /// Create tasks from active weekly maintenance plans
    WeeklyTasks,

    /// Delete report audits older than the retention period
    PurgeReports {
        #[arg(short, long, default_value = "90")]
        retention_days: i64,
    },

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Report {
            report_type,
            from,
            to,
            status,
            financials,
            csv,
            requested_by,
        } => {
            let report_type: ReportType = serde_json::from_value(json!(&report_type))
                .with_context(|| format!("unknown report type '{}'", report_type))?;

            let request = ArchiveReportRequest {
                date_from: from,
                date_to: to,
                status,
                include_financials: financials,
                format: if csv { ReportFormat::Csv } else { ReportFormat::Json },
                ..ArchiveReportRequest::new(report_type, requested_by)
            };

            let response = client
                .post(format!("{}/v1/archive/reports", cli.endpoint))
                .json(&request)
                .send()
                .await?;

            print_response(response, csv).await?;
        }

        Commands::Search {
            collection,
            status,
            from,
            to,
            keywords,
            limit,
        } => {
            let collections = collection
                .iter()
                .map(|name| {
                    name.parse::<CollectionKind>()
                        .with_context(|| format!("unknown collection '{}'", name))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let params = SearchParams {
                collections: Some(collections).filter(|c| !c.is_empty()),
                statuses: status,
                date_from: from,
                date_to: to,
                keywords,
                limit,
            };

            let response = client
                .post(format!("{}/v1/archive/search", cli.endpoint))
                .json(&params)
                .send()
                .await?;

            print_response(response, false).await?;
        }

        Commands::AutoArchive => {
            let response = client
                .post(format!("{}/v1/maintenance/auto-archive", cli.endpoint))
                .send()
                .await?;

            print_response(response, false).await?;
        }

        Commands::WeeklyTasks => {
            let response = client
                .post(format!("{}/v1/maintenance/weekly-tasks", cli.endpoint))
                .send()
                .await?;

            print_response(response, false).await?;
        }

        Commands::PurgeReports { retention_days } => {
            let response = client
                .post(format!("{}/v1/archive/reports/purge", cli.endpoint))
                .json(&json!({ "retentionDays": retention_days }))
                .send()
                .await?;

            print_response(response, false).await?;
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await?;

            print_response(response, false).await?;
        }
    }

    Ok(())
}

/// Print the body, pretty-printing JSON; raw text when CSV was requested
async fn print_response(response: Response, raw_csv: bool) -> anyhow::Result<()> {
    let status = response.status();
    let is_csv = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/csv"));

    if raw_csv && is_csv {
        println!("{}", response.text().await?);
        return Ok(());
    }

    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("request failed with status {}", status);
    }
    Ok(())
}
