use crate::demo::{run_demo, run_list, run_status_update, StatusUpdateArgs};
use crate::server;
use case_review::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Case Review",
    about = "Serve and operate the application status review workflow",
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
    /// Inspect the seeded application caseload
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
    /// Change the status of a seeded application
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// Walk through approval, revision, and validation scenarios
    Demo,
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// List reference numbers, titles, and current statuses
    List,
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// Submit one status update through the review form
    Update(StatusUpdateArgs),
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
        Command::Applications {
            command: ApplicationsCommand::List,
        } => run_list(),
        Command::Status {
            command: StatusCommand::Update(args),
        } => run_status_update(args).await,
        Command::Demo => run_demo().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_review::workflows::status_update::ApplicationStatus;

    #[test]
    fn parses_status_update_arguments() {
        let cli = Cli::try_parse_from([
            "case-review",
            "status",
            "update",
            "--reference",
            "APP-100",
            "--status",
            "needs-revision",
            "--comment",
            "See notes",
            "--revision-instructions",
            "Add budget breakdown",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Status {
                command: StatusCommand::Update(args),
            }) => {
                assert_eq!(args.reference, "APP-100");
                assert_eq!(args.status, ApplicationStatus::NeedsRevision);
                assert_eq!(
                    args.revision_instructions.as_deref(),
                    Some("Add budget breakdown")
                );
                assert!(args.actor_name.is_none());
            }
            other => panic!("expected status update command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let result = Cli::try_parse_from([
            "case-review",
            "status",
            "update",
            "--reference",
            "APP-100",
            "--status",
            "archived",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["case-review"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
