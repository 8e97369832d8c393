// cli.rs
use crate::client::HttpDiffSource;
use crate::config::Config;
use crate::date_selector::DateSelector;
use crate::model::DiffResponse;
use crate::report::render_report;
use crate::surface::PageSurface;
use crate::utils::{
    create_spinner, print_header, print_rendered, print_significant, print_summary, report_filename,
};
use crate::viewer::{DiffViewer, ViewerError};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use console::style;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare an archived version of a page with its current version
    Compare {
        /// Page to compare
        url: String,
        /// Archive date (YYYY-MM-DD), defaults to one year ago
        #[arg(short, long)]
        date: Option<String>,
        /// Base URL of the diff service
        #[arg(short, long)]
        endpoint: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Render a saved diff payload (JSON)
    Render {
        /// Path of the payload file
        payload: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Hide unchanged lines
    #[arg(short, long)]
    pub changes_only: bool,
    /// Highlight a search term in the diff
    #[arg(short, long)]
    pub search: Option<String>,
    /// Report destination (defaults to a generated name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Open the report in the browser
    #[arg(long)]
    pub open: bool,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            url,
            date,
            endpoint,
            view,
        } => {
            print_header("🔍 Comparing Archived Version");
            let mut config = Config::load_or_default();
            config.apply_endpoint_override(endpoint);

            let mut viewer = DiffViewer::new(PageSurface::new(), DateSelector::new());
            if let Some(date) = date {
                let update = viewer.select_date(&date)?;
                if let Some(warning) = update.warning {
                    println!("{}", style(warning).yellow());
                }
            }

            let source = HttpDiffSource::new(config.endpoint.clone());
            let spinner = create_spinner(&format!("Fetching diff from {}", source.endpoint()));
            let result = viewer.submit(&url, &source).await;
            spinner.finish_and_clear();

            if let Err(err) = result {
                println!("{} {}", style("Error:").red().bold(), style(&err).red());
                return Err(err.into());
            }

            let timestamp = viewer.dates().timestamp();
            present(viewer, &view, &config, &url, &timestamp)
        }

        Commands::Render { payload, view } => {
            print_header("📄 Rendering Diff");
            let config = Config::load_or_default();

            let content = fs::read_to_string(&payload)
                .with_context(|| format!("Failed to read {}", payload.display()))?;
            let response: DiffResponse = serde_json::from_str(&content)
                .with_context(|| format!("Invalid diff payload in {}", payload.display()))?;

            let url = response.url.clone();
            let mut viewer = DiffViewer::new(PageSurface::new(), DateSelector::new());
            let timestamp = archive_timestamp(&response.archived_date)
                .unwrap_or_else(|| viewer.dates().timestamp());
            viewer.show_response(response);

            present(viewer, &view, &config, &url, &timestamp)
        }

        Commands::Config => {
            print_header("⚙️  Configuration");
            let config = Config::load()?;
            println!(
                "{} {}",
                style("File:").green(),
                style(Config::path()?.display()).cyan()
            );
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Applies view options, prints the terminal summary and writes the report.
fn present(
    mut viewer: DiffViewer<PageSurface>,
    view: &ViewArgs,
    config: &Config,
    url: &str,
    timestamp: &str,
) -> Result<()> {
    if (view.changes_only || config.changes_only) && !viewer.toggle_changes() {
        println!("{}", style("No changes to focus on, showing all content.").dim());
    }

    if let Some(query) = &view.search {
        match viewer.search(query) {
            Ok(Some(outcome)) => println!(
                "{} {} {}",
                style("Found").green(),
                style(outcome.matched_rows.len()).cyan(),
                style(if outcome.matched_rows.len() == 1 { "matching line" } else { "matching lines" })
                    .green()
            ),
            Ok(None) => {}
            Err(ViewerError::Search(err)) => println!("{}", style(err).yellow()),
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(response) = viewer.current() {
        print_summary(response);
        print_significant(response);
    }
    print_rendered(viewer.rendered());

    let today = Local::now().date_naive();
    let output = match &view.output {
        Some(path) => path.clone(),
        None => {
            let dir = match &config.output_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            dir.join(report_filename(url, timestamp, today))
        }
    };
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let page = viewer.into_surface();
    fs::write(&output, render_report(&page, &format!("Wayback diff: {}", url)))
        .with_context(|| format!("Failed to write report {}", output.display()))?;
    info!(path = %output.display(), "report written");

    println!(
        "\n{} {}",
        style("Report written to").green(),
        style(output.display()).cyan()
    );

    if view.open {
        let _ = open::that(&output);
    }
    Ok(())
}

/// Converts the service's `MM-DD-YYYY` archive date into `YYYYMMDD`.
fn archive_timestamp(archived_date: &str) -> Option<String> {
    NaiveDate::parse_from_str(archived_date, "%m-%d-%Y")
        .ok()
        .map(|date| date.format("%Y%m%d").to_string())
}
