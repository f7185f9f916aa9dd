use clap::Parser;
use raydium_cached_swap::cli::commands::{pools, tradable, trade};
use raydium_cached_swap::cli::{Cli, Commands};
use raydium_cached_swap::core::{Config, SwapError};

#[tokio::main]
async fn main() -> Result<(), SwapError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Buy(args) => trade::execute(trade::TradeKind::Buy, args, config).await?,
        Commands::Sell(args) => trade::execute(trade::TradeKind::Sell, args, config).await?,
        Commands::RoundTrip(args) => {
            trade::execute(trade::TradeKind::RoundTrip, args, config).await?
        }
        Commands::Tradable(args) => tradable::execute(args, config).await?,
        Commands::Pools(args) => pools::execute(args, config).await?,
    }

    Ok(())
}
