use clap::Parser;
use docrag::cli::commands::{Cli, Commands};
use docrag::config::Config;
use docrag::domain::values::search::SearchQuery;
use docrag::DocRag;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Err(e) = run_command(config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(mut config: Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Serve { addr, no_seed } = &cmd {
        if let Some(addr) = addr {
            config.addr = addr.clone();
        }
        if *no_seed {
            config.seed = false;
        }
    }

    let app = DocRag::new(&config)?;

    match cmd {
        Commands::Serve { .. } => serve(app, &config).await?,
        Commands::Seed => {
            app.bootstrap().await?;
            let report = app.seed().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Search { query, limit } => {
            app.bootstrap().await?;
            let response = app.search(SearchQuery::new(query, limit)).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Reindex => {
            app.bootstrap().await?;
            let count = app.reindex().await?;
            println!("{}", serde_json::json!({ "reindexed": count }));
        }
    }
    Ok(())
}

async fn serve(app: DocRag, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // A collection that cannot be resolved yet is retried on first use.
    if let Err(e) = app.bootstrap().await {
        tracing::warn!(error = %e, "Vector index not ready at startup");
    }

    if config.seed {
        match app.seed().await {
            Ok(report) => tracing::info!(documents = report.documents, widgets = report.widgets, "Seed complete"),
            Err(e) => tracing::warn!(error = %e, "Seeding failed"),
        }
    }

    let router = docrag::api::router(Arc::new(app));
    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {e}", config.addr))?;
    tracing::info!(addr = %config.addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
