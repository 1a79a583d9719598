// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use clap::{Parser, Subcommand};
use tessera_cli::{plan, split};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Plan(plan::PlanArgs),
    Split(split::SplitArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Plan(plan_args)) => plan::plan(plan_args),
        Some(Commands::Split(split_args)) => split::split(split_args),
        None => {}
    }
}
