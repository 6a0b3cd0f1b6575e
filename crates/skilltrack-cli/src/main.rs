//! skilltrack CLI — the operator-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "skilltrack", version, about = "Ability scoring and review scheduling engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply practice events to an ability state
    Score {
        /// Ability state JSON (omit to start from the baseline)
        #[arg(long)]
        state: Option<PathBuf>,

        /// Ordered practice-event list JSON
        #[arg(long)]
        events: PathBuf,

        /// Write the resulting snapshot JSON here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Learner label recorded in the snapshot
        #[arg(long, default_value = "learner")]
        learner: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Flag weak abilities and anomalous results
    Insights {
        /// Ability state JSON
        #[arg(long)]
        state: PathBuf,

        /// Recent practice history JSON (ordered oldest first)
        #[arg(long)]
        history: PathBuf,
    },

    /// Build today's ranked review plan
    Plan {
        /// Mistake records JSON
        #[arg(long)]
        mistakes: PathBuf,

        /// Maximum items in the plan
        #[arg(long)]
        limit: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the rolling review calendar
    Calendar {
        /// Mistake records JSON
        #[arg(long)]
        mistakes: PathBuf,

        /// Number of days to show
        #[arg(long, default_value = "7")]
        days: usize,
    },

    /// Show aggregate review statistics
    Stats {
        /// Mistake records JSON
        #[arg(long)]
        mistakes: PathBuf,
    },

    /// Compare two ability snapshots
    Compare {
        /// Baseline snapshot JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current snapshot JSON
        #[arg(long)]
        current: PathBuf,

        /// Shift threshold in points
        #[arg(long, default_value = "2.0")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example input files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skilltrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            state,
            events,
            output,
            learner,
            config,
        } => commands::score::execute(state, events, output, learner, config),
        Commands::Insights { state, history } => commands::insights::execute(state, history),
        Commands::Plan {
            mistakes,
            limit,
            config,
        } => commands::plan::execute(mistakes, limit, config),
        Commands::Calendar { mistakes, days } => commands::calendar::execute(mistakes, days),
        Commands::Stats { mistakes } => commands::stats::execute(mistakes),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
