mod error;
mod export;
mod gender;
mod parser;
mod store;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gender::Gender;
use store::ProfileStore;

#[derive(Parser)]
#[command(name = "topmovies_scraper", about = "IMDB top-movies cast scraper")]
struct Cli {
    /// Saved listing page to parse
    #[arg(short, long, default_value = "top_movies_2016.html")]
    input: PathBuf,
    /// Directory holding cached person profile pages
    #[arg(long, default_value = "cache")]
    cache_dir: PathBuf,
    /// Base URL prepended to relative listing links
    #[arg(long, default_value = "http://www.imdb.com")]
    base_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the parsed collection as nested JSON
    Json {
        /// Output file
        #[arg(short, long, default_value = "movies_collection.json")]
        out: PathBuf,
    },
    /// Classify genders and export one row per (movie, role, person) as CSV
    Table {
        /// Output file
        #[arg(short, long, default_value = "movies.csv")]
        out: PathBuf,
    },
    /// Download and cache profile pages for everyone in the listing
    Prefetch {
        /// Max profiles to fetch (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let listing = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read listing {}", cli.input.display()))?;
    let movies = parser::parse_listing(&listing, &cli.base_url)?;
    println!("Parsed {} movies from {}", movies.len(), cli.input.display());

    let result = match cli.command {
        Commands::Json { out } => {
            export::write_json(&movies, &out)?;
            println!("Wrote {}", out.display());
            Ok(())
        }
        Commands::Table { out } => {
            let store = ProfileStore::new(&cli.cache_dir)?;
            let rows = export::flatten_collection(&movies, &store);
            let unknown = rows.iter().filter(|r| r.gender == Gender::Unknown).count();
            export::write_csv(&rows, &out)?;
            println!(
                "Wrote {} rows to {} ({} with unknown gender)",
                rows.len(),
                out.display(),
                unknown
            );
            Ok(())
        }
        Commands::Prefetch { limit } => {
            let store = ProfileStore::new(&cli.cache_dir)?;
            let persons: Vec<&parser::person::Person> =
                movies.iter().flat_map(|m| m.people()).collect();
            let stats = store::warm_cache(&store, &persons, limit);
            println!(
                "Done: {} fetched, {} already cached, {} errors ({} distinct people).",
                stats.fetched, stats.cached, stats.errors, stats.total
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
