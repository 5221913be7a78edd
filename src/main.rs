use clap::{Parser, Subcommand};

use techdesk::chat::ChatSession;
use techdesk::config::{self, AppConfig};
use techdesk::news::NewsFetcher;
use techdesk::profile::ProfileStore;
use techdesk::providers;
use techdesk::shell::Shell;

#[derive(Parser)]
#[command(name = "techdesk", version, about = "Terminal tech chat & news assistant")]
struct Cli {
    /// Enable info-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug-level logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send a single chat message and print the reply
    Ask { message: String },
    /// Fetch and summarize the latest technology news
    News,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("starting techdesk version {}", env!("CARGO_PKG_VERSION"));

    let app_config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("falling back to default config: {e}");
            AppConfig::default()
        }
    };

    // Write a starter config on first run so the options are discoverable
    if AppConfig::config_path().is_some_and(|p| !p.exists()) {
        if let Err(e) = config::save_config(&app_config) {
            tracing::debug!("could not write starter config: {e}");
        }
    }

    let generator = providers::create_generator(&app_config);

    match cli.command {
        Some(Command::Ask { message }) => {
            require_api_keys()?;
            let mut session = ChatSession::new(generator, app_config.prompt_strategy);
            println!("{}", session.send_message(&message).await);
        }
        Some(Command::News) => {
            require_api_keys()?;
            let api_key = std::env::var(config::NEWS_API_KEY).unwrap_or_default();
            let store = ProfileStore::open_default();
            let mut session = ChatSession::new(generator, app_config.prompt_strategy);
            let fetcher = NewsFetcher::new(&api_key, &app_config);

            for item in fetcher.fetch_and_summarize(&store.profile, &mut session).await {
                println!("{}", item.title);
                println!("  {}", item.summary);
                if !item.url.is_empty() {
                    println!("  {}", item.url);
                }
                println!();
            }
        }
        None => {
            let mut shell = Shell::new(app_config, generator);
            if let Err(e) = shell.run().await {
                tracing::error!("shell error: {e}");
                return Err(e.into());
            }
        }
    }

    Ok(())
}

/// Proactive key check for the one-shot modes; the shell does its own gating
fn require_api_keys() -> anyhow::Result<()> {
    config::validate_api_keys().map_err(|e| {
        eprintln!("{}", config::key_report(&config::missing_api_keys()));
        anyhow::anyhow!(e)
    })
}
