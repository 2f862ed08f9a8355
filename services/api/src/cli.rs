use crate::report::{run_columns, run_scenario, ColumnsArgs, ScenarioRunArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tuition_scenarios::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tuition Scenarios",
    about = "Project tuition and revenue for academic programs under what-if credit pricing",
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
    /// Work with program tables from the command line
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ScenarioCommand {
    /// Run a scenario over a program table and print the revenue summary
    Run(ScenarioRunArgs),
    /// Show detected columns and the suggested mapping for a program table
    Columns(ColumnsArgs),
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
        Command::Scenario {
            command: ScenarioCommand::Run(args),
        } => run_scenario(args),
        Command::Scenario {
            command: ScenarioCommand::Columns(args),
        } => run_columns(args),
    }
}
