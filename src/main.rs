//! Benchlens CLI - compare llm-d inference benchmark reports
//!
//! # Commands
//!
//! - `points` - List comparable configurations
//! - `frontier` - Mark the Pareto frontier under two objectives
//! - `leaderboard` - Score and rank configurations
//! - `throughput` - Max throughput per hardware and config
//! - `latency` - Latency percentile ladders
//! - `card` - Render a card definition file

use std::path::PathBuf;

use benchlens::{
    cli::{self, OutputFormat},
    error::Result,
    frontier::{Axis, AxisKey},
    normalize::ConfigKind,
    DedupPolicy, FilterContext, SortDirection, SortKey,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Benchlens - Pareto frontiers and leaderboards for LLM serving benchmarks
#[derive(Parser)]
#[command(name = "benchlens")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (JSON); defaults apply when omitted
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Inputs and selection shared by every command
#[derive(Args)]
struct InputArgs {
    /// Report files or directories (.json, .yaml, .yml)
    #[arg(value_name = "REPORTS", required = true)]
    reports: Vec<PathBuf>,

    /// Keep only these accelerators
    #[arg(long, value_delimiter = ',')]
    hardware: Vec<String>,

    /// Keep only these models
    #[arg(long = "model", value_delimiter = ',')]
    models: Vec<String>,

    /// Keep only these engine tools
    #[arg(long = "framework", value_delimiter = ',')]
    frameworks: Vec<String>,

    /// Keep only these topologies (standalone, llm-d, disaggregated)
    #[arg(long = "config-kind", value_delimiter = ',')]
    configs: Vec<ConfigKind>,

    /// Keep only these sequence-length buckets (e.g. 1k/1k)
    #[arg(long = "seq-len", value_delimiter = ',')]
    seq_lens: Vec<String>,

    /// Case-insensitive search over hardware, model, framework, config and seq len
    #[arg(long, default_value = "")]
    search: String,

    /// On duplicate configurations keep the highest throughput instead of the first
    #[arg(long)]
    keep_max: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl InputArgs {
    fn filter(&self) -> FilterContext {
        FilterContext::new()
            .with_hardware(self.hardware.iter().cloned())
            .with_models(self.models.iter().cloned())
            .with_frameworks(self.frameworks.iter().cloned())
            .with_configs(self.configs.clone())
            .with_seq_lens(self.seq_lens.iter().cloned())
            .with_search(&self.search)
    }

    fn dedup(&self) -> DedupPolicy {
        if self.keep_max {
            DedupPolicy::MaxThroughput
        } else {
            DedupPolicy::FirstWins
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List comparable configurations
    ///
    /// Examples:
    ///   benchlens points results/
    ///   benchlens points results/ --hardware H100,H200 --format json
    Points {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Mark the Pareto frontier under two objectives
    ///
    /// Examples:
    ///   benchlens frontier results/ --x ttftP50Ms --y throughputPerGpu
    ///   benchlens frontier results/ --x tcoPerGpuHr --y throughputPerGpu
    Frontier {
        #[command(flatten)]
        input: InputArgs,

        /// Horizontal objective
        #[arg(long, default_value = "ttftP50Ms")]
        x: AxisKey,

        /// Vertical objective
        #[arg(long, default_value = "throughputPerGpu")]
        y: AxisKey,

        /// Treat higher X as better (default: the axis's natural direction)
        #[arg(long)]
        x_higher_is_better: Option<bool>,

        /// Treat higher Y as better (default: the axis's natural direction)
        #[arg(long)]
        y_higher_is_better: Option<bool>,
    },
    /// Score and rank configurations
    ///
    /// Examples:
    ///   benchlens leaderboard results/ --sort llmdAdvantage
    ///   benchlens leaderboard results/ --sort ttftP50Ms --dir asc --limit 10
    Leaderboard {
        #[command(flatten)]
        input: InputArgs,

        /// Column to sort by
        #[arg(long, default_value = "score")]
        sort: SortKey,

        /// Sort direction (asc, desc)
        #[arg(long, default_value = "desc")]
        dir: SortDirection,

        /// Show only the top N rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Max throughput per hardware and config
    Throughput {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Latency percentile ladders per configuration
    Latency {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Render a card definition file against the reports
    ///
    /// Filter flags are ignored; the card carries its own filter.
    ///
    /// Example:
    ///   benchlens card leaderboard.json results/ --format json
    Card {
        /// Card definition (JSON, tagged by "type")
        #[arg(value_name = "CARD")]
        card: PathBuf,

        #[command(flatten)]
        input: InputArgs,
    },
}

fn setup_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => subscriber
            .json()
            .with_timer(tracing_subscriber::fmt::time::uptime())
            .init(),
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
    }
}

fn run(cli: Cli) -> Result<String> {
    let input = match &cli.command {
        Commands::Points { input }
        | Commands::Frontier { input, .. }
        | Commands::Leaderboard { input, .. }
        | Commands::Throughput { input }
        | Commands::Latency { input }
        | Commands::Card { input, .. } => input,
    };

    let engine = cli::load_engine(cli.config.as_deref(), input.dedup())?;
    let reports = cli::load_inputs(&input.reports)?;
    let filter = input.filter();
    let format = input.format;

    match &cli.command {
        Commands::Points { .. } => cli::points_command(&engine, &reports, &filter, format),
        Commands::Frontier {
            x,
            y,
            x_higher_is_better,
            y_higher_is_better,
            ..
        } => {
            let x = x_higher_is_better.map_or_else(|| Axis::new(*x), |h| Axis::with_direction(*x, h));
            let y = y_higher_is_better.map_or_else(|| Axis::new(*y), |h| Axis::with_direction(*y, h));
            cli::frontier_command(&engine, &reports, &filter, x, y, format)
        },
        Commands::Leaderboard {
            sort, dir, limit, ..
        } => cli::leaderboard_command(&engine, &reports, &filter, *sort, *dir, *limit, format),
        Commands::Throughput { .. } => cli::throughput_command(&engine, &reports, &filter, format),
        Commands::Latency { .. } => cli::latency_command(&engine, &reports, &filter, format),
        Commands::Card { card, .. } => cli::card_command(&engine, card, &reports, format),
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.log_format);

    match run(cli) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        },
    }
}
