use crate::demo::{run_campaign_report, run_demo, CampaignRunArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Campaign Orchestrator",
    about = "Demonstrate and run the recruitment campaign crew from the command line",
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
    /// Run recruitment campaigns against a roster from the command line
    Campaign {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Run an end-to-end CLI demo covering the full campaign lifecycle
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CampaignCommand {
    /// Source, evaluate, and rank candidates for a role brief
    Run(CampaignRunArgs),
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
        Command::Campaign {
            command: CampaignCommand::Run(args),
        } => run_campaign_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
