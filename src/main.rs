//! Tacklefront CLI
//!
//! Command-line interface for the storefront client.
//! Provides one-shot search commands and the interactive shop TUI.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tacklefront::{StoreClient, StoreConfig};

/// Tacklefront - shop the tackle store from a terminal
#[derive(Parser)]
#[command(name = "tacklefront")]
#[command(author = "Tacklefront Contributors")]
#[command(version)]
#[command(about = "Terminal client for the tackle storefront", long_about = None)]
struct Cli {
    /// Shop base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// CSRF token for authenticated POSTs
    #[arg(long, global = true)]
    csrf_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the shop interactively (search, checkout, listing, signup)
    Browse {
        /// Pre-tokenized payment method id to check out with
        #[arg(long)]
        payment_method: Option<String>,
    },

    /// Search products once and print the hits
    Search {
        /// Search text (use -- before text if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,
    },

    /// Print brand suggestions for a term
    Brands { term: String },

    /// Print category suggestions for a term
    Categories { term: String },
}

fn main() {
    // Initialize logging
    tacklefront::logging::init();
    tacklefront::logging::info("MAIN", "Tacklefront starting up");

    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Browse { payment_method } => tacklefront::tui::run(config, payment_method),
        Commands::Search { query } => cmd_search(&config, &query),
        Commands::Brands { term } => cmd_suggest(&config, "brands", &term),
        Commands::Categories { term } => cmd_suggest(&config, "categories", &term),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        if e.is_transport() {
            eprintln!("{}", style("The shop may be unreachable; try again shortly.").dim());
        }
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> tacklefront::Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(token) = &cli.csrf_token {
        config.csrf_token = Some(token.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// One-shot product search
fn cmd_search(config: &StoreConfig, query: &str) -> tacklefront::Result<()> {
    let trimmed = query.trim();
    if trimmed.chars().count() <= config.search.min_query_length {
        println!(
            "Type at least {} characters to search.",
            config.search.min_query_length + 1
        );
        return Ok(());
    }

    let client = StoreClient::new(config)?;

    let pb = spinner("Searching...");
    let products = client.search_products(trimmed);
    pb.finish_and_clear();
    let products = products?;

    if products.is_empty() {
        println!(
            "No matches — browse all products at {}",
            style(client.url_for(&config.search.catalog_route)).cyan()
        );
        return Ok(());
    }

    println!(
        "Found {} product{}:",
        style(products.len()).green(),
        if products.len() == 1 { "" } else { "s" }
    );
    println!();

    for (i, product) in products.iter().enumerate() {
        let href = format!("{}{}", config.search.product_route, product.slug);
        println!(
            "  {} {}",
            style(format!("{:2}.", i + 1)).dim(),
            style(&product.name).cyan()
        );
        println!("      {}", style(client.url_for(&href)).dim());
    }

    Ok(())
}

/// One-shot brand/category suggestions
fn cmd_suggest(config: &StoreConfig, kind: &str, term: &str) -> tacklefront::Result<()> {
    let client = StoreClient::new(config)?;

    let pb = spinner("Fetching suggestions...");
    let suggestions = match kind {
        "brands" => client.suggest_brands(term),
        _ => client.suggest_categories(term),
    };
    pb.finish_and_clear();
    let suggestions = suggestions?;

    if suggestions.is_empty() {
        println!("No {} match '{}'.", kind, term);
        return Ok(());
    }

    for suggestion in suggestions {
        println!("  {} {}", style("•").green(), suggestion);
    }

    Ok(())
}
