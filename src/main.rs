// Entrypoint for the bookshelf client.
// - Resolves configuration, sets up logging, restores the saved session.
// - Hands the assembled `App` to the interactive menu loop.

use anyhow::{Context, Result};
use bookshelf_cli::{
    api::ApiClient,
    app::App,
    config::Config,
    session::{FileTokenStore, Session},
    ui::main_menu,
};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about = "Manage your personal book catalog", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Backend base URL (defaults to BOOKSHELF_API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// File holding the saved session token
    #[arg(long)]
    token_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "bookshelf=debug,bookshelf_cli=debug"
    } else {
        "bookshelf_cli=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::resolve(cli.api_url, cli.token_file);
    tracing::debug!(base_url = %config.base_url, token_path = %config.token_path.display(), "configuration resolved");

    let api = ApiClient::new(config.base_url.clone()).context("Failed to build API client")?;
    let session = Session::new(FileTokenStore::new(config.token_path));

    let mut app = App::new(api, session);
    app.start();

    // Blocks until the user exits.
    main_menu(&mut app)?;
    Ok(())
}
