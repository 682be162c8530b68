//! LocoMotion CLI - Command-line interface
//!
//! Loads a route, plays it back on the simulation clock and prints the live
//! vehicle metrics.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use console::style;

use commands::common::ProfileArg;
use commands::config::ConfigCommands;
use commands::{config, route, run};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "locomotion", version, about = "Vehicle route simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the configured route and play it back
    Run {
        /// Route through all configured waypoints instead of start to end
        #[arg(long)]
        multi_point: bool,

        /// Travel profile (overrides provider.profile)
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,

        /// Skip the provider and play a synthetic preview route
        #[arg(long, conflicts_with = "multi_point")]
        offline: bool,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<usize>,
    },

    /// Acquire the configured route and print it
    Route {
        /// Route through all configured waypoints instead of start to end
        #[arg(long)]
        multi_point: bool,

        /// Travel profile (overrides provider.profile)
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,

        /// Load the direct route for every profile and print summaries
        #[arg(long, conflicts_with_all = ["multi_point", "profile"])]
        all_profiles: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli.command) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Run {
            multi_point,
            profile,
            offline,
            ticks,
        } => run::run(run::RunArgs {
            multi_point,
            profile,
            offline,
            ticks,
        }),
        Commands::Route {
            multi_point,
            profile,
            all_profiles,
            json,
        } => route::run(route::RouteArgs {
            multi_point,
            profile,
            all_profiles,
            json,
        }),
        Commands::Config { command } => config::run(command),
    }
}
