//! Cart CLI - drive the marketplace cart store from a terminal.
//!
//! Commands:
//! - `cart add` - Add one unit of a product
//! - `cart increment` - Add one unit of a product already in the cart
//! - `cart decrement` - Remove one unit of a product
//! - `cart show` - List the cart with totals
//! - `cart config` - Print the effective configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, AdjustArgs, ShowArgs};

/// Cart CLI - inspect and edit the persisted marketplace cart
#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Store file path (overrides the config file)
    #[arg(short, long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add(AddArgs),

    /// Add one unit of a product already in the cart
    Increment(AdjustArgs),

    /// Remove one unit of a product
    Decrement(AdjustArgs),

    /// List the cart with totals
    Show(ShowArgs),

    /// Print the effective configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "market_cart=debug,market_kv=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), cli.store.as_deref(), output)?;

    let result = match cli.command {
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Increment(args) => commands::adjust::increment(args, &ctx).await,
        Commands::Decrement(args) => commands::adjust::decrement(args, &ctx).await,
        Commands::Show(args) => commands::show::run(args, &ctx).await,
        Commands::Config => commands::show::config(&ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
