use crate::cache::{now_ms, PoolListCache};
use crate::cli::{display::TradeDisplay, PoolsArgs};
use crate::client::{DexClient, RaydiumClient};
use crate::core::{Config, SwapError, SwapResult};
use crate::trader::load_pool_list;
use crate::transaction::connect;
use colored::*;
use log::info;

pub async fn execute(args: PoolsArgs, config: Config) -> SwapResult<()> {
    println!("{}", "🚀 Raydium Pool Cache".bold().cyan());

    let cache = PoolListCache::new(
        config.cache.pool_file_path(),
        config.cache.pool_list_ttl(),
        config.cache.strict,
    );
    println!("Cache file: {}", cache.path().display());

    if args.clear {
        cache.clear()?;
        println!("{}", "🗑️  Pool cache cleared".yellow());
        return Ok(());
    }

    let dex = RaydiumClient::from_config(&config, connect(&config))?;
    let pb = TradeDisplay::create_progress_bar("Loading pool list...");

    let snapshot = if args.refresh {
        info!("Refreshing pool list cache");
        let snapshot = dex.fetch_pool_list().await;
        pb.finish_and_clear();
        let snapshot = snapshot?;
        if snapshot.is_empty() {
            return Err(SwapError::NoPoolData);
        }
        cache.write(&snapshot)?;
        snapshot
    } else {
        let snapshot = load_pool_list(&cache, &dex).await;
        pb.finish_and_clear();
        snapshot?
    };

    let age_secs = cache.stored_at().map(|time| (now_ms() - time) / 1000);
    TradeDisplay::display_pool_summary(&snapshot, age_secs);
    Ok(())
}
