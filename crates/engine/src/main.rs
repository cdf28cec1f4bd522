//! Scenescript - Main entry point.

use std::io::Write;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenescript_engine::cli::{self, Cli};
use scenescript_engine::App;

fn main() -> anyhow::Result<()> {
    // Load environment before parsing so env-backed flags see it.
    load_dotenv();

    let args = Cli::parse();

    // Logs go to stderr; stdout carries the generated script.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenescript_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.config();
    tracing::debug!(?config, "Configuration loaded");

    let app = App::open(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&app, args.command, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Load `.env.local` then `.env` from the working directory and the repo root.
/// Values already set win over later files.
fn load_dotenv() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");
    let roots = [std::path::PathBuf::from("."), repo_root];

    // Prefer local overrides.
    for root in &roots {
        for filename in [".env.local", ".env"] {
            let path = root.join(filename);
            if path.exists() {
                let _ = dotenvy::from_path(path);
            }
        }
    }
}
