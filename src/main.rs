mod host;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pokedex::catalog::{CatalogBrowser, CatalogClient, CatalogError};
use pokedex::config::{AppConfig, ConfigError};
use pokedex::wizard::{FileStore, FormWizard, StoreError, WizardError};
use tokio::io::{AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Host(#[from] host::HostError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pokedex", about = "Creature catalog browser and multi-step form")]
struct Cli {
    /// Overrides `POKEAPI_BASE_URL`.
    #[arg(long, env = "POKEAPI_BASE_URL")]
    base_url: Option<String>,

    /// Overrides `FORM_STORE_PATH`.
    #[arg(long, env = "FORM_STORE_PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive list/detail browser.
    Browse {
        #[arg(default_value_t = 1)]
        page: usize,
    },
    /// Print one page of the list and exit.
    List {
        #[arg(default_value_t = 1)]
        page: usize,
    },
    /// Print one creature's detail and exit.
    Show { name: String },
    /// Interactive three-step form.
    Form {
        #[arg(default_value = "1")]
        step: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(path) = cli.store {
        config.form_store_path = path;
    }

    let result = run(&config, cli.command.unwrap_or(Command::Browse { page: 1 })).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "pokedex exited with error");
    }
    result
}

async fn run(config: &AppConfig, command: Command) -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    match command {
        Command::Browse { page } => {
            let browser = catalog_browser(config)?;
            let stdin = BufReader::new(tokio::io::stdin());
            host::browse(&browser, page, stdin, &mut stdout).await?;
        }
        Command::List { page } => {
            let browser = catalog_browser(config)?;
            let list = browser.list_page(page).await?;
            stdout.write_all(host::render_page(&list, browser.pagination()).as_bytes()).await?;
        }
        Command::Show { name } => {
            let browser = catalog_browser(config)?;
            let detail = browser.creature(&name).await?;
            stdout.write_all(host::render_detail(&detail).as_bytes()).await?;
        }
        Command::Form { step } => {
            let store = FileStore::open(config.form_store_path.clone())?;
            let mut wizard = FormWizard::open_route(store, &step)?;
            let stdin = BufReader::new(tokio::io::stdin());
            host::form(&mut wizard, stdin, &mut stdout).await?;
        }
    }
    stdout.flush().await?;
    Ok(())
}

fn catalog_browser(config: &AppConfig) -> Result<CatalogBrowser, CatalogError> {
    let client = CatalogClient::from_config(config)?;
    tracing::info!(base_url = client.base_url(), "catalog client ready");
    Ok(CatalogBrowser::from_config(Arc::new(client), config))
}
