use super::load_pool_list;
use crate::cache::PoolListCache;
use crate::client::DexClient;
use crate::core::{SwapResult, SwapSide};
use log::{debug, warn};
use solana_sdk::pubkey::Pubkey;

/// Whether `mint` can be both bought and sold against wSOL.
///
/// Only reads the pool list (cached or fetched); nothing is submitted and
/// any failure counts as not tradable.
pub async fn is_tradable(mint: &Pubkey, pools: &PoolListCache, dex: &dyn DexClient) -> bool {
    match check(mint, pools, dex).await {
        Ok(tradable) => tradable,
        Err(e) => {
            warn!("Error checking if {} is tradable: {}", mint, e);
            false
        }
    }
}

async fn check(mint: &Pubkey, pools: &PoolListCache, dex: &dyn DexClient) -> SwapResult<bool> {
    let snapshot = load_pool_list(pools, dex).await?;

    let sell = SwapSide::Sell.pair(*mint);
    let buy = SwapSide::Buy.pair(*mint);
    let sellable = !dex
        .find_routes(&sell.input_mint, &sell.output_mint, &snapshot)
        .is_empty();
    let buyable = !dex
        .find_routes(&buy.input_mint, &buy.output_mint, &snapshot)
        .is_empty();

    debug!("{}: buyable={} sellable={}", mint, buyable, sellable);
    Ok(buyable && sellable)
}
