use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docrag", version, about = "Document store with semantic search")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// SQLite database path (overrides DOCRAG_DB)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides DOCRAG_ADDR)
        #[arg(long)]
        addr: Option<String>,
        /// Skip loading sample records on startup
        #[arg(long)]
        no_seed: bool,
    },
    /// Load sample widgets and documents into empty stores
    Seed,
    /// Semantic search over documents
    Search {
        query: String,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Re-embed every stored document into the vector index
    Reindex,
}
