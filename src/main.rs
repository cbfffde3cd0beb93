use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use forskola::api::AppState;
use forskola::models::PreschoolDetail;
use forskola::{Dataset, DirectoryConfig, DirectoryPage, SearchFilters, ViewportChange, logging, web};

#[derive(Parser, Debug)]
#[command(name = "forskola")]
#[command(version, about = "Searchable map directory of Swedish preschools")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Filter the directory and print the matching preschools
    Search {
        /// Free text matched against name, address, municipality and description
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(long)]
        municipality: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        language: Option<String>,
        /// Minimum rating, e.g. 4.5
        #[arg(long)]
        min_rating: Option<String>,
        /// Print JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Show every detail of one preschool
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// List the municipalities offered by the municipality filter
    Municipalities,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DirectoryConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);
    if cli.verbose {
        tracing::debug!("Configuration: {:?}", config);
    }

    let dataset = Dataset::builtin().context("Failed to load the preschool dataset")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState::new(dataset, config.map.clone());
            web::run(&config.server, state).await?;
        }
        Command::Search {
            query,
            municipality,
            specialty,
            language,
            min_rating,
            json,
        } => {
            let filters = SearchFilters::from_params(
                municipality.as_deref(),
                specialty.as_deref(),
                language.as_deref(),
                min_rating.as_deref(),
            )
            .context("Invalid search filters")?;
            let page = DirectoryPage::with_inputs(Arc::new(dataset), &config.map, query, filters);
            print_search(&page, json)?;
        }
        Command::Show { id, json } => {
            let preschool = dataset
                .require_preschool(&id)
                .with_context(|| format!("Cannot show preschool '{id}'"))?;
            let detail = PreschoolDetail::from(preschool);
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{detail}");
            }
        }
        Command::Municipalities => {
            for municipality in dataset.municipalities() {
                println!("{:<12} {}", municipality.name, municipality.region);
            }
        }
    }

    Ok(())
}

fn print_search(page: &DirectoryPage, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&page.cards())?);
        return Ok(());
    }

    println!("📍 {} förskolor", page.results_count());
    let active = page.filters().active();
    if !active.is_empty() {
        let badges: Vec<String> = active
            .iter()
            .map(|(key, value)| format!("{}: {value}", key.label()))
            .collect();
        println!("🔎 {}", badges.join(" · "));
    }
    println!();

    if let Some(message) = page.empty_message() {
        println!("{message}");
        return Ok(());
    }
    for card in page.cards() {
        println!("{card}");
    }

    match page.last_change() {
        ViewportChange::SetView { center, zoom } => {
            println!("🗺️ Map centred on {} at zoom {zoom}", center.format_coordinates());
        }
        ViewportChange::FitBounds { bounds, padding } => {
            println!(
                "🗺️ Map fitted to S{:.4} W{:.4} N{:.4} E{:.4} (padding {}px)",
                bounds.south, bounds.west, bounds.north, bounds.east, padding[0]
            );
        }
        ViewportChange::Unchanged => {}
    }
    Ok(())
}
