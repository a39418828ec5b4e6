//! Portfolio - GitHub profile aggregation
//!
//! Main entry point for the portfolio CLI.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use portfolio::config::{BaseUrlChain, PortfolioConfig};
use portfolio::github::GitHubClient;
use portfolio::profile::{ProfileAggregator, TimedCache};
use portfolio::projects::ProjectSelector;
use portfolio::server::PortfolioServer;
use portfolio::web::SiteClient;
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Portfolio - GitHub profile API for a personal site
#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/portfolio/config.yaml)
    #[arg(short, long, env = "PORTFOLIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Print the aggregated profile
    Profile,

    /// Print repositories tagged "featured"
    Featured,

    /// Print repositories tagged "portfolio"
    Projects,

    /// Print the resolved public base URL
    BaseUrl,

    /// Query a running API the way the site does
    Fetch {
        /// Resource to fetch
        #[arg(value_enum)]
        resource: Resource,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Resource {
    Profile,
    Featured,
    Projects,
}

#[tokio::main]
async fn main() {
    if let Err(e) = portfolio::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init = cli.command {
        return handle_init_command(cli.config);
    }

    let config = match &cli.config {
        Some(path) => PortfolioConfig::load(path)?,
        None => PortfolioConfig::load_default()?,
    }
    .apply_env()?;

    tracing::info!(
        username = %config.github.username,
        authenticated = config.github.token.is_some(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.server.bind.clone());
            let server = PortfolioServer::from_config(&config)?;
            server.run(&addr).await?;
        }
        Commands::Profile => {
            let client = Arc::new(GitHubClient::new(&config.github)?);
            let cache = Arc::new(TimedCache::new(config.cache.ttl()));
            let aggregator = ProfileAggregator::new(client, cache, &config.github.username);
            print_json(&aggregator.get_profile().await?)?;
        }
        Commands::Featured => {
            let selector = project_selector(&config)?;
            print_json(&selector.featured().await?)?;
        }
        Commands::Projects => {
            let selector = project_selector(&config)?;
            print_json(&selector.portfolio().await?)?;
        }
        Commands::BaseUrl => {
            println!("{}", BaseUrlChain::from_settings(&config.site).resolve());
        }
        Commands::Fetch { resource } => {
            let site = SiteClient::from_config(&config)?;
            match resource {
                Resource::Profile => match site.profile().await {
                    Some(profile) => print_json(&profile)?,
                    None => anyhow::bail!("No profile available from {}", site.base_url()),
                },
                Resource::Featured => print_json(&site.featured_projects().await)?,
                Resource::Projects => print_json(&site.projects().await)?,
            }
        }
    }

    Ok(())
}

fn project_selector(config: &PortfolioConfig) -> anyhow::Result<ProjectSelector> {
    let client = Arc::new(GitHubClient::new(&config.github)?);
    Ok(ProjectSelector::new(client, &config.github.username))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn handle_init_command(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_file = config_path.unwrap_or_else(PortfolioConfig::default_path);

    if config_file.exists() {
        println!("Configuration already exists at {}", config_file.display());
        return Ok(());
    }

    PortfolioConfig::default()
        .save(&config_file)
        .with_context(|| format!("Failed to write {}", config_file.display()))?;

    println!("Created configuration at {}", config_file.display());
    println!();
    println!("Set the account to showcase with github.username, or GITHUB_USERNAME.");
    Ok(())
}
