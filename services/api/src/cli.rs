use crate::commands::{run_candidates, run_search, run_seed, CandidatesArgs, SearchArgs, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use founder_scout::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Founder Scout",
    about = "Discover, score, and review founder candidates from the command line",
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
    /// Run a single discovery pass and persist the ranked candidates
    Search(SearchArgs),
    /// List persisted candidates with optional filters and CSV export
    Candidates(CandidatesArgs),
    /// Write demo candidates to the configured CSV file
    Seed(SeedArgs),
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
        Command::Search(args) => run_search(args).await,
        Command::Candidates(args) => run_candidates(args),
        Command::Seed(args) => run_seed(args),
    }
}
