use crate::report::{run_check, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mietcheck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mietcheck",
    about = "Check German rent increase notices and serve the calculator API",
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
    /// Evaluate a single rent increase notice and print the assessment
    Check(CheckArgs),
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
        Command::Check(args) => run_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["mietcheck"]).expect("parses without subcommand");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "mietcheck",
            "check",
            "--current-rent",
            "800",
            "--requested-rent",
            "900,50",
            "--living-area",
            "65",
            "--tenancy-start",
            "2024-01-01",
            "--dense-area",
            "--justification",
            "comparable-units",
            "--json",
        ])
        .expect("check arguments parse");

        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.requested_rent, "900,50");
                assert!(args.dense_area);
                assert!(args.json);
                assert_eq!(args.justification, "comparable-units");
                assert!(args.notice_received.is_none());
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }
}
