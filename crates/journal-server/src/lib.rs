//! HTTP server and `journal` command line for the markdown-backed site.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use journal_config::{Config, LoadOptions};
use journal_content::{parse_frontmatter, ContentError, ContentStore};
use journal_render::render_markdown;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{ServerError, ServerResult};
pub use routes::build_router;
pub use state::AppState;
pub use templates::TemplateCache;

const DEFAULT_LOG_FILTER: &str = "info,journal_server=debug";

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Render(args) => handle_render(args),
        Command::Check(args) => handle_check(args),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let mut options = LoadOptions::default();
    if let Some(path) = path {
        options = options.with_override_path(path);
    }
    Ok(Config::load(options)?)
}

fn handle_serve(args: ServeArgs) -> Result<i32> {
    let ServeArgs { config, host, port } = args;

    let mut config = load_config(config)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(serve(config))?;
    Ok(0)
}

fn handle_render(args: RenderArgs) -> Result<i32> {
    let RenderArgs { file, toc } = args;

    let source = fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let (_, body) = parse_frontmatter(&source);
    let rendered = render_markdown(body)
        .with_context(|| format!("failed to render {}", file.display()))?;

    if toc {
        emit(&rendered.toc)?;
    } else {
        emit(&rendered.html)?;
    }
    Ok(0)
}

fn handle_check(args: CheckArgs) -> Result<i32> {
    let config = load_config(args.config)?;
    let store = ContentStore::from_settings(&config.content);

    TemplateCache::load(config.templates.dir.as_deref(), &config.site.title)
        .context("templates failed to load")?;

    let counts = [
        ("articles", store.articles().map(|items| items.len())),
        ("fragments", store.fragments().map(|items| items.len())),
        ("shelf", store.shelf_items().map(|items| items.len())),
        ("pixels", store.pixels().map(|items| items.len())),
    ];

    let mut report = format!("content root: {}\n", store.root().display());
    for (kind, count) in counts {
        match count {
            Ok(count) => report.push_str(&format!("{kind}: {count}\n")),
            Err(err) => {
                emit(&report)?;
                eprintln!("{kind}: {err}");
                return Ok(1);
            }
        }
    }

    match store.about() {
        Ok(_) => report.push_str("about: present\n"),
        Err(ContentError::NotFound { .. }) => report.push_str("about: missing\n"),
        Err(err) => {
            emit(&report)?;
            eprintln!("about: {err}");
            return Ok(1);
        }
    }

    emit(&report)?;
    Ok(0)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.server.bind_address();
    tracing::info!(
        content = %config.content.root.display(),
        static_dir = %config.static_files.dir.display(),
        "loading templates"
    );

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("journal listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("journal stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[derive(Parser)]
#[command(author, version, about = "journal site server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site over HTTP
    Serve(ServeArgs),
    /// Render a markdown file to HTML on stdout
    Render(RenderArgs),
    /// Load all content and report counts
    Check(CheckArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Use this configuration file instead of ./journal.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override server.host
    #[arg(long)]
    host: Option<String>,
    /// Override server.port
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

#[derive(Args)]
struct RenderArgs {
    /// Markdown file to render
    file: PathBuf,
    /// Print only the table of contents
    #[arg(long)]
    toc: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Use this configuration file instead of ./journal.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}
