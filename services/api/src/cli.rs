use crate::commands::{run_leave_command, LeaveCommand};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leavedesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Leave Desk",
    about = "Submit, review, and serve employee leave requests from the command line",
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
    /// Work with leave records in the configured store
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Walk through a submit-and-approve cycle against an in-memory store
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
        Command::Leave { command } => run_leave_command(command).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
