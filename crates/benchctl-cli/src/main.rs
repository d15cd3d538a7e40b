//! benchctl CLI - render and reconcile benchmark environment manifests

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::reconcile::Mode;
use commands::{ClusterArgs, ManifestArgs};

/// Log filter for `--debug`: our crates at debug, dependencies at info
const DEBUG_FILTER: &str = "info,benchctl=debug,benchctl_core=debug,benchctl_engine=debug,benchctl_kube=debug";

#[derive(Parser)]
#[command(name = "benchctl")]
#[command(version)]
#[command(about = "Render and reconcile benchmark environment manifests against Kubernetes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render manifests locally and print them
    Render {
        #[command(flatten)]
        manifests: ManifestArgs,

        /// Render unbound variables as empty instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Create or update every resource in the manifests
    Apply {
        #[command(flatten)]
        manifests: ManifestArgs,

        #[command(flatten)]
        cluster: ClusterArgs,
    },

    /// Delete every resource in the manifests
    Delete {
        #[command(flatten)]
        manifests: ManifestArgs,

        #[command(flatten)]
        cluster: ClusterArgs,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries rendered manifests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Render { manifests, lenient } => commands::render::run(&manifests, lenient),
        Commands::Apply { manifests, cluster } => {
            commands::reconcile::run(Mode::Apply, &manifests, &cluster).await
        }
        Commands::Delete { manifests, cluster } => {
            commands::reconcile::run(Mode::Delete, &manifests, &cluster).await
        }
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
