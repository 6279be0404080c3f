use crate::demo::{run_ranks, run_simulation, RanksArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use seva_rank::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Seva Rank Service",
    about = "Track seva points and rank progression for community members",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the configured rank ladder with thresholds and perks
    Ranks(RanksArgs),
    /// Replay a series of activities against a fresh member and show each rank-up
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ranks(args) => run_ranks(args),
        Command::Simulate(args) => run_simulation(args),
    }
}
