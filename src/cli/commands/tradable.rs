use crate::cache::PoolListCache;
use crate::cli::{display::TradeDisplay, TradableArgs};
use crate::client::RaydiumClient;
use crate::core::{Config, SwapResult};
use crate::trader::is_tradable;
use crate::transaction::connect;
use colored::*;

pub async fn execute(args: TradableArgs, config: Config) -> SwapResult<()> {
    let pools = PoolListCache::new(
        config.cache.pool_file_path(),
        config.cache.pool_list_ttl(),
        config.cache.strict,
    );
    let dex = RaydiumClient::from_config(&config, connect(&config))?;

    let pb = TradeDisplay::create_progress_bar("Looking for routes...");
    let tradable = is_tradable(&args.mint, &pools, &dex).await;
    pb.finish_and_clear();

    if tradable {
        println!("{} {} is tradable against SOL", "✅".green(), args.mint.to_string().bold());
    } else {
        println!("{} {} is not tradable against SOL", "❌".red(), args.mint.to_string().bold());
    }
    Ok(())
}
