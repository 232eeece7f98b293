use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskrank_core::{AnalysisPipeline, AnalyzeRequest, profiles, time::today_in};
use tracing::debug;

mod config;
mod input;
mod logging;
mod render;
mod server;
mod state;

use crate::config::{Config, config_path, init_config, load_config};
use crate::logging::{LogLevel, init_logging};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TASKRANK_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version,
    long_version = LONG_VERSION,
    about = "Rank tasks by urgency, importance, effort and what they unblock"
)]
struct Cli {
    /// Log verbosity (overrides TASKRANK_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every task and print them highest priority first
    Analyze {
        #[command(flatten)]
        input: RankArgs,

        /// Only print the first N tasks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the top 3 tasks with a short explanation each
    Suggest {
        #[command(flatten)]
        input: RankArgs,
    },

    /// List the available strategies and their weights
    Strategies,

    /// Run the JSON HTTP API
    Serve {
        /// Address to bind (default: config [server].bind)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage ~/.taskrank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// JSON or CSV file with tasks (reads stdin when omitted)
    #[arg(long)]
    file: Option<PathBuf>,

    /// smart_balance | fastest_wins | high_impact | deadline_driven
    #[arg(long)]
    strategy: Option<String>,

    /// Treat the input as CSV even without a .csv extension
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Print the JSON response instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Score as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match cli.command {
        Command::Analyze { input, limit } => {
            let cfg = load_config()?;
            let (pipeline, req) = prepare(&cfg, &input)?;
            let analysis = pipeline.analyze_request(req)?;
            if input.json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                render::print_analysis(&analysis, limit);
            }
        }

        Command::Suggest { input } => {
            let cfg = load_config()?;
            let (pipeline, req) = prepare(&cfg, &input)?;
            let suggestions = pipeline.suggest_request(req)?;
            if input.json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                render::print_suggestions(&suggestions);
            }
        }

        Command::Strategies => render::print_strategies(&profiles()),

        Command::Serve { bind } => {
            let cfg = load_config()?;
            server::serve(&cfg, bind).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Path => println!("{}", config_path()?.display()),
        },
    }

    Ok(())
}

/// Resolve "today", the fallback strategy and the request body.
/// `--strategy` beats the body's strategy, which beats the config default.
fn prepare(cfg: &Config, args: &RankArgs) -> Result<(AnalysisPipeline, AnalyzeRequest)> {
    let today = match args.today {
        Some(d) => d,
        None => today_in(cfg.timezone()?, Utc::now()),
    };
    let pipeline = AnalysisPipeline::new(today).with_default_strategy(cfg.default_strategy()?);

    let mut req = input::read_request(args.file.as_deref(), args.csv)?;
    if let Some(s) = &args.strategy {
        req.strategy = Some(s.clone());
    }
    debug!(%today, tasks = req.tasks.len(), strategy = ?req.strategy, "request loaded");

    Ok((pipeline, req))
}
