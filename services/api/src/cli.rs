use crate::demo::{run_free_test, run_score, FreeTestArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use survey_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Survey Risk Service",
    about = "Score psychosocial risk surveys and run the survey intake API",
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
    /// Score a CSV of answers against the survey catalog
    Score(ScoreArgs),
    /// Run the public free test from the command line
    FreeTest(FreeTestArgs),
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
        Command::Score(args) => run_score(args),
        Command::FreeTest(args) => run_free_test(args),
    }
}
