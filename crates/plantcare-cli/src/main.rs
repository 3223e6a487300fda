mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, plant::PlantSubcommand, schedule::ScheduleSubcommand,
    task::TaskSubcommand, zone::ZoneSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plantcare",
    about = "Plant-care duty scheduler: water and sun duties rotated across zone rosters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .plantcare/)
    #[arg(long, global = true, env = "PLANTCARE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .plantcare/ with a default config and an empty store
    Init,

    /// Manage plants
    Plant {
        #[command(subcommand)]
        subcommand: PlantSubcommand,
    },

    /// Manage zones and their rosters
    Zone {
        #[command(subcommand)]
        subcommand: ZoneSubcommand,
    },

    /// Generate or inspect the daily schedule
    Schedule {
        #[command(subcommand)]
        subcommand: ScheduleSubcommand,
    },

    /// List, complete and delegate tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Resolved-task counts per employee
    Scoreboard {
        /// Also post the scoreboard to the Slack channel
        #[arg(long)]
        post: bool,
    },

    /// Everyone on any zone roster
    Employees,

    /// Show or validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the HTTP server (Slack webhooks and JSON API)
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3000", env = "PLANTCARE_PORT")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. }
        | Commands::Schedule {
            subcommand: ScheduleSubcommand::Run,
        } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Plant { subcommand } => cmd::plant::run(&root, subcommand, cli.json),
        Commands::Zone { subcommand } => cmd::zone::run(&root, subcommand, cli.json),
        Commands::Schedule { subcommand } => cmd::schedule::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Scoreboard { post } => cmd::scoreboard::run(&root, post, cli.json),
        Commands::Employees => cmd::scoreboard::employees(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
