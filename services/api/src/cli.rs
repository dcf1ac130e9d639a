use crate::demo::{
    run_analytics, run_audit, run_chat, run_demo, run_hike, run_remediate, run_reset, run_verify,
    AnalyticsCommand, ChatArgs, DemoArgs, HikeArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_assist::config::AppConfig;
use hr_assist::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "HR Assist",
    about = "Run the HR assistant service or drive its workforce workflows from the command line",
    version
)]
struct Cli {
    /// Override the directory holding the workforce tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Model a salary hike against the employee's peer band
    Hike(HikeArgs),
    /// Report missing emails and emergency contacts
    Audit,
    /// Simulate employees filling in their missing data
    Remediate,
    /// Check whether every data gap has been closed
    Verify,
    /// Regenerate demo data and reintroduce data gaps
    Reset,
    /// Headcount, attrition and engagement views
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
    /// Send one instruction through the reasoning engine
    Chat(ChatArgs),
    /// Walk through reset, audit, remediation, verification and a hike scenario
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
    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Hike(args) => run_hike(&config, args),
        Command::Audit => run_audit(&config),
        Command::Remediate => run_remediate(&config),
        Command::Verify => run_verify(&config),
        Command::Reset => run_reset(&config),
        Command::Analytics { command } => run_analytics(&config, command),
        Command::Chat(args) => run_chat(&config, args).await,
        Command::Demo(args) => run_demo(&config, args),
    }
}
