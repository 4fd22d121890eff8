//! Vote CLI
//!
//! Drives the vote store from the command line and prints JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use vote_engine::OptionRegistry;
use vote_runtime::{RuntimeConfig, VoteStore, VoterContext, VotingService};

#[derive(Parser, Debug)]
#[command(name = "vote")]
#[command(about = "Single-choice voting: record votes and read live results")]
struct Args {
    /// Data directory holding votes.log
    #[arg(short, long, env = "VOTE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List votable options
    Options,
    /// Cast a vote
    Vote {
        option: String,
        #[arg(long, default_value = "cli")]
        session: String,
        #[arg(long, default_value = "127.0.0.1")]
        voter: String,
        #[arg(long, default_value = "vote-cli")]
        agent: String,
    },
    /// Current counts and percentages
    Results,
    /// Most recent votes
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Totals, sessions and first vote
    Summary,
    /// Votes per hour
    Trend {
        #[arg(long)]
        hours: Option<u32>,
    },
    /// Delete every vote and session
    Reset,
    /// Store status
    Health,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vote_runtime=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = RuntimeConfig::from_env()?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    info!("Vote log: {}", config.log_path().display());

    let store = VoteStore::open(OptionRegistry::default(), &config)?;
    let service = VotingService::new(store, &config);

    match args.command {
        Command::Options => print_json(&service.list_options())?,
        Command::Vote {
            option,
            session,
            voter,
            agent,
        } => {
            let ctx = VoterContext {
                voter_address: voter,
                user_agent: agent,
                session_id: session,
            };
            print_json(&service.submit_vote(&option, &ctx)?)?
        }
        Command::Results => print_json(&service.get_results()?)?,
        Command::History { limit } => print_json(&service.get_history(limit)?)?,
        Command::Summary => print_json(&service.get_summary()?)?,
        Command::Trend { hours } => print_json(&service.get_trend(hours)?)?,
        Command::Reset => {
            service.admin_reset()?;
            print_json(&serde_json::json!({ "message": "All votes have been reset" }))?
        }
        Command::Health => print_json(&service.health())?,
    }

    Ok(())
}
