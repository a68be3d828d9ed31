use crate::demo::{run_demo, run_job_search, DemoArgs, JobSearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use trampo_certo::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trampo Certo",
    about = "Run and explore the Trampo Certo student job marketplace from the command line",
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
    /// Query the job catalogue of the configured storage
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Walk through posting, searching, applying, and deciding over in-memory storage
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// Search postings with text and facet filters
    Search(JobSearchArgs),
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
        Command::Jobs {
            command: JobsCommand::Search(args),
        } => run_job_search(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["trampo-certo-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn jobs_search_collects_filters() {
        let cli = Cli::try_parse_from([
            "trampo-certo-api",
            "jobs",
            "search",
            "marketing",
            "--modality",
            "hybrid,remote",
            "--min-flex-score",
            "80",
            "--sort",
            "flex_score",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Jobs {
                command: JobsCommand::Search(args),
            }) => {
                assert_eq!(args.query.as_deref(), Some("marketing"));
                assert_eq!(args.modality.as_deref(), Some("hybrid,remote"));
                assert_eq!(args.min_flex_score, Some(80));
            }
            other => panic!("expected jobs search, got {other:?}"),
        }
    }
}
