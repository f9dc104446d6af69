//! Scout CLI - Command-line tools for web research

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout_core::prelude::*;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Objective-driven web research tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file layered over scout.toml, below SCOUT_* overrides
    #[arg(short, long, global = true, env = "SCOUT_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the web and print the raw provider response
    Search {
        /// Search keyword or question
        query: String,
    },
    /// Scrape a page, summarizing it for the objective if it is long
    Scrape {
        /// What the research is for
        #[arg(short, long)]
        objective: String,
        /// Page to scrape
        #[arg(short, long)]
        url: String,
    },
    /// Print embedding vectors for one or more texts as JSON
    Embed {
        /// Texts to embed
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Research tool commands
    Tools {
        #[command(subcommand)]
        command: ToolCommands,
    },
    /// Version information
    Version,
}

#[derive(Subcommand)]
enum ToolCommands {
    /// List registered tools and their argument schemas
    List,
    /// Call a tool by name with JSON arguments
    Call {
        /// Tool name
        name: String,
        /// Arguments as a JSON object
        args: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ScoutConfig> {
    let config = match path {
        Some(path) => ScoutConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ScoutConfig::load()?,
    };
    Ok(config)
}

fn research_tools(config: &ScoutConfig) -> Result<ToolRegistry> {
    let search = Arc::new(SerperProvider::from_config(&config.search)?);
    let fetcher = Arc::new(ResearchFetcher::from_config(config)?);
    Ok(ToolRegistry::with_research_tools(search, fetcher))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("scout {}", env!("CARGO_PKG_VERSION"));
            println!("scout-core {}", scout_core::VERSION);
        }
        Commands::Search { query } => {
            let config = load_config(cli.config.as_ref())?;
            let provider = SerperProvider::from_config(&config.search)?;
            let response = provider.search(&query).await?;
            println!("{}", response.body);
        }
        Commands::Scrape { objective, url } => {
            let config = load_config(cli.config.as_ref())?;
            let fetcher = ResearchFetcher::from_config(&config)?;
            let content = fetcher.fetch(&objective, &url).await?;
            println!("{}", content);
        }
        Commands::Embed { texts } => {
            let config = load_config(cli.config.as_ref())?;
            let embeddings = OpenAIEmbeddings::from_config(&config.embeddings)?;
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let vectors = embeddings.generate_embeddings(&refs).await?;
            tracing::info!(
                count = vectors.len(),
                dimension = embeddings.dimension(),
                "Generated embeddings"
            );
            println!("{}", serde_json::to_string(&vectors)?);
        }
        Commands::Tools { command } => {
            let config = load_config(cli.config.as_ref())?;
            let registry = research_tools(&config)?;
            match command {
                ToolCommands::List => {
                    println!("{}", serde_json::to_string_pretty(&registry.list())?);
                }
                ToolCommands::Call { name, args } => {
                    let args: serde_json::Value =
                        serde_json::from_str(&args).context("tool arguments must be JSON")?;
                    let output = registry.call(&name, args).await?;
                    println!("{}", output.content);
                }
            }
        }
    }

    Ok(())
}
