use crate::commands::{run_history, run_predict, HistoryArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_eligibility::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Eligibility Service",
    about = "Score loan applications and review the recorded decisions",
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
    /// Score a single application read from a JSON file
    Predict(PredictArgs),
    /// Print the most recently recorded applications
    History(HistoryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// SQLite database file; the in-memory store is used when neither this nor
    /// APP_DATABASE_PATH is set
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::History(args) => run_history(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["loan-eligibility-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn predict_requires_an_input_file() {
        assert!(Cli::try_parse_from(["loan-eligibility-api", "predict"]).is_err());

        let cli = Cli::try_parse_from([
            "loan-eligibility-api",
            "predict",
            "--input",
            "application.json",
            "--record",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.input, PathBuf::from("application.json"));
                assert!(args.record);
                assert!(args.database.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn history_accepts_limit_and_csv() {
        let cli = Cli::try_parse_from([
            "loan-eligibility-api",
            "history",
            "--limit",
            "5",
            "--csv",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::History(args)) => {
                assert_eq!(args.limit, Some(5));
                assert!(args.csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
