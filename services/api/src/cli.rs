use crate::evaluate::{run_evaluate, run_evidence, EvaluateArgs, EvidenceArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hla_donor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HLA Donor Evaluator",
    about = "Evaluate HLA donor risk for stem-cell transplant candidates",
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
    /// Evaluate a CSV batch of donor/recipient pairs and print the summary
    Evaluate(EvaluateArgs),
    /// Print or export the immunogenetic evidence reference table
    Evidence(EvidenceArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Evidence(args) => run_evidence(args),
    }
}
