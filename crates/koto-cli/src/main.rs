mod cmd;

use clap::{Parser, Subcommand};
use cmd::schema::SchemaSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "koto",
    about = "Natural-language command interpreter for a Notion-backed assistant",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "KOTO_CONFIG", default_value = "koto.yaml")]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret one utterance and print the reply
    Ask {
        /// The utterance, e.g. "買い物リストに牛乳を追加して"
        utterance: String,

        /// Reference date for relative expressions (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3141")]
        port: u16,
    },

    /// Inspect the configured database schemas
    Schema {
        #[command(subcommand)]
        subcommand: SchemaSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Ask { utterance, date } => {
            cmd::ask::run(&cli.config, &utterance, date.as_deref(), cli.json)
        }
        Commands::Serve { port } => cmd::serve::run(&cli.config, port),
        Commands::Schema { subcommand } => cmd::schema::run(&cli.config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
