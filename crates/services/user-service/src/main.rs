//! User Service - HTTP server for user management.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service_lib::config::UserServiceConfig;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(author, version, about = "User management service", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, env = "SERVER_HOST")]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long, env = "SERVER_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = UserServiceConfig::from_env();

    init_tracing(cli.verbose, &config.server.log_level);

    let result = match cli.command {
        Commands::Serve { host, port } => {
            user_service_lib::run(config.with_overrides(host, port)).await
        }
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {:?}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool, log_level: &str) {
    let filter = if verbose { "debug" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
