//! chase - categorize and total Chase Bank CSV downloads
//!
//! Usage:
//!   chase FILE...                      Category / merchant report
//!   chase --monthly FILE...            Monthly totals and averages per category
//!   chase --barchart -s foy FILE...    Chart category totals since January 1
//!   chase --interactive FILE...        Browse categories, merchants and transactions

use anyhow::{Context, Result};
use chase_core::{DateBound, DateWindow, Report, ReportMode, ReportRequest};
use chase_finance::{Engine, chart as series};
use chase_ingest::{dedupe_across_files, load_files};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod browser;
mod chart;
mod config;
mod report;
mod state;

use chart::ChartKind;
use config::Settings;
use report::{Painter, TextOptions};

#[derive(Parser, Debug)]
#[command(
    name = "chase",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CHASE_BUILD_SHA"), ")"),
    about = "Process Chase Bank transaction files",
    after_help = "Print each category in descending order of its total, and within each \
                  category each merchant in descending order of its total:\n\n    chase file..."
)]
struct Cli {
    /// Config file (default: ~/.chase.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not print in color
    #[arg(long)]
    no_color: bool,

    /// Do not exclude `chart_exclude_categories` from charts
    #[arg(long)]
    no_exclude_chart_categories: bool,

    /// Print totals only
    #[arg(long)]
    totals_only: bool,

    /// Print averages only (implies --monthly; --barchart/--piechart may also be given)
    #[arg(long)]
    averages_only: bool,

    /// Generate a monthly report
    #[arg(long)]
    monthly: bool,

    /// Limit transactions to CATEGORY
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,

    /// Display a bar chart of category totals
    #[arg(long)]
    barchart: bool,

    /// Display a pie chart of category totals
    #[arg(long)]
    piechart: bool,

    /// Include transaction details in the report
    #[arg(long)]
    detail: bool,

    /// Plot a moving average on the monthly category chart
    #[arg(long)]
    moving_average: bool,

    /// Include transactions on or after DATE (YYYY-MM-DD, `foy` or `fom`)
    #[arg(short = 's', long = "start", value_name = "DATE")]
    start: Option<String>,

    /// Include transactions before DATE (YYYY-MM-DD, `foy` or `fom`)
    #[arg(short = 'e', long = "end", value_name = "DATE")]
    end: Option<String>,

    /// Process the files matched by `datafiles` in the config file
    #[arg(long)]
    use_datafiles: bool,

    /// Drop rows repeated across overlapping downloads
    #[arg(long)]
    dedupe_overlapping: bool,

    /// Browse categories, merchants and transactions in a terminal UI
    #[arg(long)]
    interactive: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// CSV files to process
    files: Vec<PathBuf>,
}

impl Cli {
    fn chart_kind(&self) -> Option<ChartKind> {
        if self.barchart {
            Some(ChartKind::Bar)
        } else if self.piechart {
            Some(ChartKind::Pie)
        } else {
            None
        }
    }

    /// A chart with `--monthly` plots averages; `--averages-only` implies `--monthly`.
    fn normalize(mut self) -> Self {
        if self.monthly && self.chart_kind().is_some() {
            self.averages_only = true;
        } else if self.averages_only {
            self.monthly = true;
        }
        self
    }

    fn window(&self, today: NaiveDate) -> Result<DateWindow> {
        let bound = |s: &Option<String>| -> Result<DateBound> {
            Ok(s.as_deref().unwrap_or_default().parse::<DateBound>()?)
        };
        Ok(DateWindow::resolve(bound(&self.start)?, bound(&self.end)?, today)?)
    }

    fn request(&self) -> ReportRequest {
        let (mode, detail) = if self.interactive {
            (ReportMode::CategoryMerchant, true)
        } else if self.monthly {
            (ReportMode::CategoryMonth, self.detail)
        } else {
            (ReportMode::CategoryMerchant, self.detail)
        };
        ReportRequest::new(mode)
            .with_detail(detail)
            .with_category(self.category.clone())
    }

    fn text_options(&self) -> TextOptions {
        TextOptions {
            totals_only: self.totals_only,
            averages_only: self.averages_only,
            detail: self.detail,
        }
    }
}

fn init_logging(verbose: bool) {
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn input_files(cli: &Cli, settings: &Settings) -> Result<Vec<PathBuf>> {
    if cli.use_datafiles {
        match &settings.datafiles {
            Some(pattern) => return config::datafile_paths(pattern),
            None => warn!("--use-datafiles given but the config has no `datafiles`"),
        }
    }
    Ok(cli.files.clone())
}

fn main() -> Result<()> {
    let cli = Cli::parse().normalize();
    init_logging(cli.verbose);

    // Bad dates and bad config fail before any file is opened.
    let today = Local::now().date_naive();
    let window = cli.window(today)?;
    let settings = config::load_settings(cli.config.as_deref())?;

    let files = input_files(&cli, &settings)?;
    if files.is_empty() {
        warn!("No input files");
    }
    let mut raws = load_files(&files, &settings.schema).context("loading transactions")?;
    if cli.dedupe_overlapping {
        let before = raws.len();
        raws = dedupe_across_files(raws);
        info!("Dropped {} overlapping rows", before - raws.len());
    }

    let report = Engine::new(&settings.engine).report(&raws, &window, &cli.request());
    debug!(
        "Report over {} months: {} transactions",
        report.summary.span_months, report.summary.count
    );

    if cli.interactive {
        return browser::run_browser(&report);
    }

    let painter = Painter::new(!cli.no_color);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(kind) = cli.chart_kind() {
        let exclude = if cli.no_exclude_chart_categories {
            BTreeSet::new()
        } else {
            settings.engine.chart_exclude_categories.clone()
        };
        return show_chart(&mut out, &cli, &report, &exclude, kind, painter);
    }

    if cli.monthly {
        report::write_monthly_report(&mut out, &report, cli.text_options(), painter)?;
    } else {
        report::write_category_report(&mut out, &report, cli.text_options(), painter)?;
    }
    out.flush()?;
    Ok(())
}

fn show_chart<W: Write>(
    out: &mut W,
    cli: &Cli,
    report: &Report,
    exclude: &BTreeSet<String>,
    kind: ChartKind,
    painter: Painter,
) -> Result<()> {
    let prepared = match (&cli.category, cli.monthly) {
        (Some(category), true) => series::monthly_category(report, category, cli.moving_average),
        (_, true) => Some(series::monthly_averages(report, exclude)),
        (_, false) => Some(series::category_totals(report, exclude)),
    };
    match prepared {
        Some(s) if !s.is_empty() => chart::display(out, &s, kind, painter),
        _ => {
            warn!("Nothing to chart");
            Ok(())
        }
    }
}
