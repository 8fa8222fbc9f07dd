use crate::demo::{run_demo, run_resolve, DemoArgs, ResolveArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Portal Status Engine",
    about = "Serve and inspect the job portal application status pipeline",
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
    /// Resolve a board column and optional sub-stage to its canonical status
    Resolve(ResolveArgs),
    /// Walk one application through the pipeline and print its audit trail
    Demo(DemoArgs),
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
        Command::Resolve(args) => run_resolve(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["job-portal-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_resolve_with_sub_stage() {
        let cli = Cli::try_parse_from([
            "job-portal-api",
            "resolve",
            "--column",
            "interview",
            "--sub-stage",
            "negotiation",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Resolve(args)) => {
                assert_eq!(args.column, "interview");
                assert_eq!(args.sub_stage.as_deref(), Some("negotiation"));
            }
            other => panic!("expected resolve command, got {other:?}"),
        }
    }
}
