//! FarmScope - portfolio metrics for dairy supply-chain monitoring
//!
//! The `farmscope` command loads a farm snapshot from a JSON file and
//! prints portfolio views of it.
//!
//! ## Commands
//!
//! - `summary`: Aggregate metrics, risk and data quality for a filter
//! - `regions`: Per-region averages over the whole portfolio
//! - `farm`: Risk profile of a single farm
//! - `indicators`: TNFD indicators and benchmarks for a filter
//! - `rows`: First page of the farm table for a filter
//! - `validate`: Report records that could not be loaded

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};

use farmscope_core::{
    AggregateResult, EngineConfig, FarmRiskProfile, FarmRowPage, FarmSnapshot, FilterCriteria,
    IndicatorReport, JsonFileProvider, PortfolioController, RefreshOutcome, RegionalRollupEntry,
    RiskBucket, VerificationTier, METRICS,
};

#[derive(Parser)]
#[command(name = "farmscope")]
#[command(author = "FarmScope Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Farm portfolio metrics aggregation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Farm snapshot file (JSON array of farm records)
    #[arg(
        short,
        long,
        global = true,
        env = "FARMSCOPE_SNAPSHOT",
        default_value = "farms.json"
    )]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate metrics, risk distribution and data quality
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Per-region averages (ignores any filter)
    Regions {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Risk profile of one farm
    Farm {
        /// Farm id
        id: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// TNFD indicators and benchmarks
    Indicators {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// First page of the farm table
    Rows {
        #[command(flatten)]
        filter: FilterArgs,

        /// Rows to show (default: FARMSCOPE_ROW_LIMIT or 10)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Report records that were rejected while loading the snapshot
    Validate,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Region name, or "all"
    #[arg(short, long, default_value = farmscope_core::ALL_REGIONS)]
    region: String,

    /// Case-insensitive farm name search
    #[arg(short = 'q', long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        FilterCriteria::parse(&self.region, self.search.clone())
            .with_context(|| format!("Invalid region filter: {:?}", self.region))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = EngineConfig::from_env();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    farmscope_core::init_tracing(cli.json || config.log_json, level);

    if let Commands::Rows {
        limit: Some(limit), ..
    } = &cli.command
    {
        config = config.with_row_limit(*limit);
    }

    let (controller, outcome) = load_portfolio(&cli.snapshot, config).await?;

    let result = match cli.command {
        Commands::Summary { filter, format } => cmd_summary(&controller, &filter, format),
        Commands::Regions { format } => cmd_regions(&controller, format),
        Commands::Farm { id, format } => cmd_farm(&controller, &id, format),
        Commands::Indicators { filter, format } => cmd_indicators(&controller, &filter, format),
        Commands::Rows { filter, format, .. } => cmd_rows(&controller, &filter, format),
        Commands::Validate => cmd_validate(&outcome),
    };

    METRICS.flush();
    result
}

async fn load_portfolio(
    path: &Path,
    config: EngineConfig,
) -> Result<(PortfolioController, RefreshOutcome)> {
    let controller = PortfolioController::new(FarmSnapshot::empty(), config);
    let outcome = controller
        .refresh(&JsonFileProvider::new(path))
        .await
        .with_context(|| format!("Failed to load farm snapshot: {:?}", path))?;

    info!(
        snapshot = %outcome.version.short(),
        farms = outcome.accepted,
        rejected = outcome.faults.len(),
        "portfolio loaded"
    );
    Ok((controller, outcome))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Aggregate summary for a filter
fn cmd_summary(
    controller: &PortfolioController,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filter.criteria()?;
    let result = controller.aggregate(&criteria);
    match format {
        OutputFormat::Json => print_json(&*result),
        OutputFormat::Text => {
            print!("{}", render_summary_text(&criteria, &result));
            Ok(())
        }
    }
}

fn cmd_regions(controller: &PortfolioController, format: OutputFormat) -> Result<()> {
    let rollup = controller.regional_rollup();
    match format {
        OutputFormat::Json => print_json(&*rollup),
        OutputFormat::Text => {
            print!("{}", render_regions_text(&rollup));
            Ok(())
        }
    }
}

fn cmd_farm(controller: &PortfolioController, id: &str, format: OutputFormat) -> Result<()> {
    let profile = controller
        .farm_profile(id)
        .with_context(|| format!("No farm with id '{}' in snapshot", id))?;
    match format {
        OutputFormat::Json => print_json(&profile),
        OutputFormat::Text => {
            print!("{}", render_profile_text(&profile));
            Ok(())
        }
    }
}

fn cmd_indicators(
    controller: &PortfolioController,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filter.criteria()?;
    let report = controller.indicators(&criteria);
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print!("{}", render_indicators_text(report.as_ref()));
            Ok(())
        }
    }
}

fn cmd_rows(
    controller: &PortfolioController,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let criteria = filter.criteria()?;
    let page = controller.farm_rows(&criteria);
    match format {
        OutputFormat::Json => print_json(&page),
        OutputFormat::Text => {
            print!("{}", render_rows_text(&page));
            Ok(())
        }
    }
}

fn cmd_validate(outcome: &RefreshOutcome) -> Result<()> {
    println!(
        "Snapshot {}: {} farms loaded, {} rejected",
        outcome.version.short(),
        outcome.accepted,
        outcome.faults.len()
    );
    for fault in &outcome.faults {
        println!("  - record #{} ({}): {}", fault.index, fault.farm_id, fault.error);
    }
    if !outcome.faults.is_empty() {
        anyhow::bail!("{} record(s) failed validation", outcome.faults.len());
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}

fn render_summary_text(criteria: &FilterCriteria, result: &AggregateResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Portfolio: {} farms (region: {}, search: {:?})",
        result.total_farms, criteria.region, criteria.search_text
    );

    let Some(avg) = result.avg_metrics.as_ref() else {
        let _ = writeln!(out, "No farms match this filter.");
        return out;
    };

    let _ = writeln!(out, "Total hectares:        {:.0}", result.total_hectares);
    let _ = writeln!(
        out,
        "Milk production:       {:.1}M L/yr",
        result.total_milk_production / 1_000_000.0
    );
    if let Some(quality) = result.data_quality_percent {
        let _ = writeln!(out, "Data quality:          {quality}%");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Average metrics:");
    for (name, value) in avg.entries() {
        let _ = writeln!(out, "  {name:<20} {value:>8.1}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Risk distribution:");
    for bucket in [RiskBucket::Low, RiskBucket::Medium, RiskBucket::High] {
        let _ = writeln!(
            out,
            "  {:<8} {}",
            bucket.label(),
            result.risk_distribution.get(bucket)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Verification:");
    for tier in VerificationTier::ALL {
        let _ = writeln!(
            out,
            "  {} {:<14} {}",
            tier.icon(),
            tier.label(),
            result.verification_distribution.get(tier)
        );
    }
    out
}

fn render_regions_text(rollup: &[RegionalRollupEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:>6} {:>10} {:>14} {:>12}",
        "Region", "Farms", "Water", "Biodiversity", "N efficiency"
    );
    for entry in rollup {
        let _ = writeln!(
            out,
            "{:<14} {:>6} {:>10} {:>14} {:>12}",
            entry.region.as_str(),
            entry.farm_count,
            fmt_opt(entry.avg_water_usage, 1),
            fmt_opt(entry.avg_biodiversity_index, 1),
            fmt_opt(entry.avg_n_efficiency, 0),
        );
    }
    out
}

fn render_profile_text(profile: &FarmRiskProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", profile.farm_name, profile.farm_id);
    let _ = writeln!(
        out,
        "Risk: {} (max {:.1}, driven by {})",
        profile.bucket.label(),
        profile.max_risk,
        profile.dominant_category
    );
    for (category, score) in profile.scores.entries() {
        let _ = writeln!(out, "  {:<22} {score:.1}", category.as_str());
    }
    out
}

fn render_indicators_text(report: Option<&IndicatorReport>) -> String {
    let Some(report) = report else {
        return "No farms match this filter.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "TNFD indicators:");
    for indicator in &report.tnfd {
        let status = if indicator.meets_target() {
            "on target"
        } else {
            "below target"
        };
        let _ = writeln!(
            out,
            "  {:<26} {:>7.1} {:<9} target {:>5.0}  {:>6}%  {status}",
            indicator.name,
            indicator.current,
            indicator.unit,
            indicator.target,
            fmt_opt(indicator.performance_percent, 0),
        );
    }
    let _ = writeln!(
        out,
        "Water usage: {:.1} vs target {:.0} ({:+.1}%)",
        report.water_usage.average, report.water_usage.target, report.water_usage.deviation_percent
    );
    let _ = writeln!(out, "Biodiversity: {:?}", report.biodiversity);
    out
}

fn render_rows_text(page: &FarmRowPage) -> String {
    let mut out = String::new();
    for row in &page.rows {
        let badges: String = row.badges.iter().map(|b| b.icon).collect();
        let _ = writeln!(
            out,
            "{:<10} {:<24} {:<14} {:>6.0} ha  {:<6} {}",
            row.id,
            row.name,
            row.region.as_str(),
            row.hectares,
            row.risk.label(),
            badges
        );
    }
    if page.truncated {
        let _ = writeln!(
            out,
            "... showing {} of {} farms",
            page.rows.len(),
            page.total_matched
        );
    }
    out
}
