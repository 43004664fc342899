mod browse;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mandi_core::{CategoryLevel, CategoryLookup, LocationTarget, SortKey, DEFAULT_PAGE_SIZE};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mandi-cli")]
#[command(about = "Search and facet a classifieds snapshot")]
struct Cli {
    /// Category taxonomy file (JSON, or YAML by extension)
    #[arg(
        long,
        global = true,
        env = "MANDI_CATEGORIES_PATH",
        default_value = "./data/categories.json"
    )]
    categories: PathBuf,
    /// Location taxonomy file (JSON, or YAML by extension)
    #[arg(
        long,
        global = true,
        env = "MANDI_LOCATIONS_PATH",
        default_value = "./data/locations.json"
    )]
    locations: PathBuf,
    /// Listing snapshot file; required by `search` and `facets`
    #[arg(long, global = true, env = "MANDI_LISTINGS_PATH")]
    listings: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Filter, sort and page listings
    Search(SearchArgs),
    /// Print the category and location trees with listing counts
    Facets {
        /// Free-text query applied before counting
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Resolve a raw category id (and optional name) to a tagged reference
    Resolve {
        #[arg(long)]
        id: i64,
        /// Display name used to disambiguate colliding ids
        #[arg(long)]
        name: Option<String>,
        /// Treat the id as already tagged with this level (domain, field, item)
        #[arg(long)]
        level: Option<CategoryLevel>,
    },
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Case-insensitive substring matched against title and description
    #[arg(long, short)]
    query: Option<String>,
    /// Category to select, as ID or ID:LEVEL (repeatable)
    #[arg(long = "category", value_parser = parse_category_arg)]
    category_lookups: Vec<CategoryLookup>,
    /// Location to select: a ward `7`, an address `7-2`, or a branch `district:27` (repeatable)
    #[arg(long = "location")]
    location_targets: Vec<LocationTarget>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    /// relevance, price-asc, price-desc, title-asc, title-desc, newest-first, rating
    #[arg(long, default_value = "relevance")]
    sort: SortKey,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

/// Parses `12` or `12:field` into a category lookup.
fn parse_category_arg(raw: &str) -> Result<CategoryLookup, String> {
    let (id, level) = match raw.split_once(':') {
        Some((id, level)) => (id, Some(level.parse::<CategoryLevel>()?)),
        None => (raw, None),
    };
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid category id '{id}': {e}"))?;
    Ok(CategoryLookup {
        level,
        id,
        name: None,
    })
}

fn init_tracing() -> anyhow::Result<()> {
    let fallback = std::env::var("MANDI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing()?;

    match &cli.command {
        Commands::Search(args) => {
            let snapshot = browse::load(&cli.categories, &cli.locations, cli.listings.as_deref())?;
            browse::run_search(&snapshot, args, cli.json)
        }
        Commands::Facets { query } => {
            let snapshot = browse::load(&cli.categories, &cli.locations, cli.listings.as_deref())?;
            browse::run_facets(&snapshot, query.as_deref(), cli.json)
        }
        Commands::Resolve { id, name, level } => {
            let lookup = CategoryLookup {
                level: *level,
                id: *id,
                name: name.clone(),
            };
            browse::run_resolve(&cli.categories, &lookup, cli.json)
        }
    }
}

#[cfg(test)]
mod tests;
