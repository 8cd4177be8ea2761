use crate::demo::{run_board_snapshot, BoardSnapshotArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jobdeck::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Jobdeck Board Service",
    about = "Run and demo the jobdeck application board from the command line",
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
    /// Inspect the application board without starting the server
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Render the seeded demo board as text
    Snapshot(BoardSnapshotArgs),
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
        Command::Board {
            command: BoardCommand::Snapshot(args),
        } => run_board_snapshot(args).await,
    }
}
