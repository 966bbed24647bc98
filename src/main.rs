use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sendloop::api;
use sendloop_core::{Database, HabitService};

#[derive(Parser)]
#[command(name = "sendloop")]
#[command(about = "Habit tracking with a daily progress ledger and growth stages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sendloop API server
    Serve {
        /// Port for the HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Database file (defaults to the platform data directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "sendloop=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let (port, db_path) = match cli.command {
        Some(Commands::Serve { port, db }) => (port, db),
        // Default: serve on the standard port
        None => (3000, None),
    };

    let db = match db_path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router(HabitService::new(db));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("sendloop listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
