//! CLI interface for the vector search service

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vecsim::{Config, Vector, VectorIndex};

#[derive(Parser)]
#[command(name = "vecsim")]
#[command(about = "Exact vector similarity search service", long_about = None)]
struct Cli {
    /// Fixed vector dimension of the store
    #[arg(long, default_value_t = vecsim::config::DEFAULT_DIMENSION)]
    dimension: usize,

    /// Data directory for the snapshot pair
    #[arg(long, default_value = "data")]
    data_dir: String,

    /// Divisor mapping squared L2 distance onto confidence
    #[arg(long, default_value_t = vecsim::config::DEFAULT_NORMALIZATION_FACTOR)]
    normalization_factor: f32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,
    },
    /// Insert a vector and persist
    Insert {
        /// Identifier for the vector
        id: String,
        /// Vector data as comma-separated values (e.g., "1.0,2.0,3.0")
        #[arg(short, long)]
        vector: String,
    },
    /// Search for the nearest stored vectors
    Search {
        /// Query vector as comma-separated values (e.g., "1.0,2.0,3.0")
        query: String,
        /// Number of results to return
        #[arg(short, long, default_value = "5")]
        k: usize,
    },
    /// Print the number of stored vectors
    Count,
    /// Delete all vectors and persist the empty state
    Clear,
}

fn run(mut index: VectorIndex, command: Commands) -> Result<()> {
    match command {
        Commands::Insert { id, vector } => {
            let v = Vector::from_str(&vector)?;
            let total = index.add(id.clone(), v)?;
            index.save()?;
            println!("Inserted vector with ID: {} ({} total)", id, total);
        }
        Commands::Search { query, k } => {
            let q = Vector::from_str(&query)?;
            let results = index.search(&q, k)?;

            if results.is_empty() {
                println!("No results found (store is empty)");
            } else {
                println!("Top {} results:", results.len());
                for (i, hit) in results.iter().enumerate() {
                    println!("{}. {} (confidence: {:.4})", i + 1, hit.id, hit.confidence);
                }
            }
        }
        Commands::Count => {
            println!("{}", index.len());
        }
        Commands::Clear => {
            index.clear();
            index.save()?;
            println!("All vectors cleared");
        }
        Commands::Serve { .. } => {
            unreachable!("Serve handled separately");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        dimension: cli.dimension,
        data_dir: cli.data_dir.into(),
        normalization_factor: cli.normalization_factor,
        ..Config::default()
    };

    // Serve needs the async runtime; everything else runs directly
    // against the persistent index.
    if let Commands::Serve { ref addr } = cli.command {
        vecsim::server::start(addr, &config).await?;
        return Ok(());
    }

    let index = VectorIndex::open(&config)?;
    run(index, cli.command)
}
