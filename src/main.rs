use analytics::{
    AnalyticsEngine, EquityCurve, MetricsSnapshot, TimeBucket, aggregate_time_buckets,
    best_windows, build_equity_curve, worst_windows,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{LogFormat, Settings};
use core_types::TradeRecord;
use simulator::{SimulationResult, SimulationScenario};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The main entry point for the TradeLens analytics CLI.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    // Flushes the file sink on drop; must outlive the command.
    let _guard = configuration::init_tracing(&settings.logging)
        .context("Failed to initialise logging")?;

    match cli.command {
        Commands::Metrics(args) => handle_metrics(args),
        Commands::Equity(args) => handle_equity(args),
        Commands::Buckets(args) => handle_buckets(args),
        Commands::Simulate(args) => handle_simulate(args, &settings),
        Commands::Scenarios(args) => handle_scenarios(args, &settings),
        Commands::Template => {
            println!("{}", ingest::template());
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics and Monte Carlo risk projections for trade histories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./tradelens.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log filter (e.g. "debug", "analytics=trace").
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override the configured log output format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full performance and risk report for a trade file.
    Metrics(MetricsArgs),
    /// Print the exit-time-ordered equity and drawdown curve.
    Equity(EquityArgs),
    /// Show the best and worst weekday/hour entry windows.
    Buckets(BucketsArgs),
    /// Run a Monte Carlo projection under a market scenario.
    Simulate(SimulateArgs),
    /// List the built-in and configured market scenarios.
    Scenarios(ScenariosArgs),
    /// Print the CSV header accepted by the importer.
    Template,
}

#[derive(Args)]
struct MetricsArgs {
    /// CSV file of closed trades.
    file: PathBuf,

    /// Optional file of per-period benchmark returns, aligned with trades by exit order.
    #[arg(long)]
    benchmark: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct EquityArgs {
    /// CSV file of closed trades.
    file: PathBuf,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BucketsArgs {
    /// CSV file of closed trades.
    file: PathBuf,

    /// How many best and worst windows to list.
    #[arg(long, default_value_t = 5)]
    top: usize,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SimulateArgs {
    /// Scenario name: a built-in profile or one defined under [scenarios] in the config.
    #[arg(long, default_value = "sideways")]
    scenario: String,

    /// Starting capital (defaults to [simulation].initial_capital).
    #[arg(long)]
    capital: Option<f64>,

    /// Trading days to project (defaults to [simulation].horizon_days).
    #[arg(long)]
    horizon: Option<usize>,

    /// Number of paths (defaults to [simulation].path_count).
    #[arg(long)]
    paths: Option<usize>,

    /// Random seed (defaults to [simulation].seed).
    #[arg(long)]
    seed: Option<u64>,

    /// Custom mean daily return, e.g. 0.0005. Requires --volatility.
    #[arg(long, requires = "volatility", allow_hyphen_values = true)]
    drift: Option<f64>,

    /// Custom daily return standard deviation. Requires --drift.
    #[arg(long, requires = "drift")]
    volatility: Option<f64>,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ScenariosArgs {
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_metrics(args: MetricsArgs) -> anyhow::Result<()> {
    let trades = read_trades(&args.file)?;
    let benchmark = args
        .benchmark
        .as_deref()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read benchmark file {}", path.display()))?;
            ingest::parse_benchmark(&text)
                .with_context(|| format!("Failed to parse benchmark file {}", path.display()))
        })
        .transpose()?;

    let report = AnalyticsEngine::new().calculate(&trades, benchmark.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_metrics(&report, benchmark.is_some());
    }
    Ok(())
}

fn handle_equity(args: EquityArgs) -> anyhow::Result<()> {
    let trades = read_trades(&args.file)?;
    let curve = build_equity_curve(&trades);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&curve)?);
    } else {
        print_equity(&curve);
    }
    Ok(())
}

fn handle_buckets(args: BucketsArgs) -> anyhow::Result<()> {
    let trades = read_trades(&args.file)?;
    let buckets = aggregate_time_buckets(&trades);
    let best = best_windows(&buckets, args.top);
    let worst = worst_windows(&buckets, args.top);

    if args.json {
        let output = serde_json::json!({
            "buckets": buckets,
            "best": best,
            "worst": worst,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Best entry windows");
        println!("{}", bucket_table(&best));
        println!("Worst entry windows");
        println!("{}", bucket_table(&worst));
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs, settings: &Settings) -> anyhow::Result<()> {
    let scenario = resolve_scenario(&args, settings)?;
    let defaults = &settings.simulation;

    let result = simulator::simulate(
        &scenario,
        args.capital.unwrap_or(defaults.initial_capital),
        args.horizon.unwrap_or(defaults.horizon_days),
        args.paths.unwrap_or(defaults.path_count),
        args.seed.unwrap_or(defaults.seed),
    )
    .context("Invalid simulation parameters")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_simulation(&result);
    }
    Ok(())
}

fn handle_scenarios(args: ScenariosArgs, settings: &Settings) -> anyhow::Result<()> {
    let catalogue = scenario_catalogue(settings);

    if args.json {
        let output: Vec<_> = catalogue
            .iter()
            .map(|(scenario, source)| serde_json::json!({ "source": source, "scenario": scenario }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let mut table = new_table(&["Scenario", "Daily drift", "Daily volatility", "Source"]);
        for (scenario, source) in &catalogue {
            table.add_row(vec![
                scenario.name.clone(),
                format!("{:+.4}%", scenario.daily_drift * 100.0),
                format!("{:.4}%", scenario.daily_volatility * 100.0),
                source.to_string(),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}

/// Built-in presets in display order, with `[scenarios.<name>]` entries replacing
/// same-named presets and the rest appended by name.
fn scenario_catalogue(settings: &Settings) -> Vec<(SimulationScenario, &'static str)> {
    let mut catalogue: Vec<_> = SimulationScenario::presets()
        .into_iter()
        .map(|scenario| (scenario, "built-in"))
        .collect();

    let mut configured: Vec<_> = settings.scenarios.iter().collect();
    configured.sort_by(|a, b| a.0.cmp(b.0));
    for (name, params) in configured {
        let scenario = SimulationScenario::new(
            name.to_ascii_lowercase(),
            params.daily_drift,
            params.daily_volatility,
        );
        match catalogue.iter_mut().find(|(s, _)| s.name == scenario.name) {
            Some(slot) => *slot = (scenario, "config"),
            None => catalogue.push((scenario, "config")),
        }
    }
    catalogue
}

/// Explicit drift/volatility flags win, then config-defined profiles, then built-ins.
/// Names are matched case-insensitively at every level.
fn resolve_scenario(args: &SimulateArgs, settings: &Settings) -> anyhow::Result<SimulationScenario> {
    let name = args.scenario.to_ascii_lowercase();
    if let (Some(drift), Some(volatility)) = (args.drift, args.volatility) {
        return Ok(SimulationScenario::new(name, drift, volatility));
    }
    let configured = settings
        .scenarios
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        .map(|(_, params)| params);
    if let Some(params) = configured {
        return Ok(SimulationScenario::new(
            name,
            params.daily_drift,
            params.daily_volatility,
        ));
    }
    Ok(name.parse::<SimulationScenario>()?)
}

fn read_trades(path: &Path) -> anyhow::Result<Vec<TradeRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trade file {}", path.display()))?;
    let trades = ingest::ingest(&text)
        .with_context(|| format!("Failed to import trades from {}", path.display()))?;
    info!(file = %path.display(), trades = trades.len(), "Loaded trade history");
    Ok(trades)
}

// ==============================================================================
// Rendering
// ==============================================================================

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn print_metrics(report: &MetricsSnapshot, with_benchmark: bool) {
    let mut table = new_table(&["Metric", "Value"]);
    let mut row = |name: &str, value: String| {
        table.add_row(vec![name.to_string(), value]);
    };

    row("Total trades", report.total_trades.to_string());
    row(
        "Winners / losers / breakeven",
        format!("{} / {} / {}", report.winners, report.losers, report.breakeven),
    );
    row("Win rate", format!("{:.2}%", report.win_rate));
    row("Total P&L", format!("{:.2}", report.total_pnl));
    row("Gross profit", format!("{:.2}", report.gross_profit));
    row("Gross loss", format!("{:.2}", report.gross_loss));
    row("Profit factor", report.profit_factor.to_string());
    row("Average win", format!("{:.2}", report.avg_win));
    row("Average loss", format!("{:.2}", report.avg_loss));
    row("Payoff ratio", format!("{:.4}", report.payoff_ratio));
    row("Expectancy", format!("{:.2}", report.expectancy));
    row("Largest win", format!("{:.2}", report.largest_win));
    row("Largest loss", format!("{:.2}", report.largest_loss));
    row("Annualized return", format!("{:.2}%", report.annualized_return_pct));
    row("Max drawdown", format!("{:.2}%", report.max_drawdown_pct));
    row("Sharpe ratio", format!("{:.4}", report.sharpe_ratio));
    row("Sortino ratio", format!("{:.4}", report.sortino_ratio));
    row("Calmar ratio", format!("{:.4}", report.calmar_ratio));
    row("Omega ratio", report.omega_ratio.to_string());
    row("VaR 95%", format!("{:.4}%", report.var_95));
    row("VaR 99%", format!("{:.4}%", report.var_99));
    row("CVaR 95%", format!("{:.4}%", report.cvar_95));
    row("Kelly", format!("{:.2}%", report.kelly_pct));
    if with_benchmark {
        row("Beta", format!("{:.4}", report.beta));
        row("Alpha", format!("{:.4}", report.alpha));
        row("Information ratio", format!("{:.4}", report.information_ratio));
        row("Treynor ratio", format!("{:.4}", report.treynor_ratio));
    }
    row("Max consecutive wins", report.max_consecutive_wins.to_string());
    row("Max consecutive losses", report.max_consecutive_losses.to_string());
    row(
        "Average holding period",
        format!("{}s", report.average_holding_period.as_secs()),
    );

    println!("{table}");
}

fn print_equity(curve: &EquityCurve) {
    let mut table = new_table(&["Exit time", "Equity", "Peak", "Drawdown"]);
    for point in &curve.points {
        table.add_row(vec![
            point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", point.equity),
            format!("{:.2}", point.peak_to_date),
            format!("{:.2}%", point.drawdown_pct),
        ]);
    }
    println!("{table}");
    println!(
        "Final equity {:.2}, max drawdown {:.2} ({:.2}%)",
        curve.final_equity, curve.max_drawdown, curve.max_drawdown_pct
    );
}

fn bucket_table(buckets: &[TimeBucket]) -> Table {
    const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    let mut table = new_table(&["Weekday", "Hour (UTC)", "Trades", "Avg P&L %"]);
    for bucket in buckets {
        let weekday = WEEKDAYS.get(bucket.weekday as usize).copied().unwrap_or("?");
        table.add_row(vec![
            weekday.to_string(),
            format!("{:02}:00", bucket.hour),
            bucket.trade_count.to_string(),
            format!("{:.4}", bucket.average()),
        ]);
    }
    table
}

fn print_simulation(result: &SimulationResult) {
    println!("Scenario: {}", result.scenario);
    let mut table = new_table(&["Statistic", "Value"]);
    let rows = [
        ("Initial capital", format!("{:.2}", result.initial_capital)),
        ("Horizon", format!("{} days", result.horizon_days)),
        ("Paths", result.path_count.to_string()),
        ("Seed", result.seed.to_string()),
        ("Expected return", format!("{:.2}%", result.expected_return_pct)),
        ("Mean max drawdown", format!("{:.2}%", result.max_drawdown_pct)),
        ("Probability of loss", format!("{:.2}%", result.probability_of_loss_pct)),
        ("VaR 95% (final equity)", format!("{:.2}", result.var_95)),
        ("Worst case (p5)", format!("{:.2}", result.worst_case)),
        ("Median", format!("{:.2}", result.median_final_equity)),
        ("Best case (p95)", format!("{:.2}", result.best_case)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    println!("{table}");
}
