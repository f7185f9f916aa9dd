use crate::core::{
    constants::*, MintInfo, PoolAccountSnapshot, PoolKind, RouteGraph, RouteSimulationBundle,
    SwapError, SwapResult, TradingPair,
};
use log::{debug, info, warn};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, program_pack::Pack, pubkey::Pubkey,
};
use spl_token::state::Mint;
use std::sync::Arc;

/// CLMM tick-array bitmap extension address of `pool_id`
pub fn tick_array_bitmap_address(pool_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[CLMM_TICK_ARRAY_BITMAP_SEED, pool_id.as_ref()],
        &CLMM_PROGRAM,
    )
    .0
}

/// Decode the base mint layout shared by SPL Token and Token-2022.
/// Token-2022 extensions after the base layout are ignored.
pub fn decode_mint(account: &Account) -> Option<MintInfo> {
    let base = account.data.get(..Mint::LEN)?;
    let mint = Mint::unpack(base).ok()?;
    Some(MintInfo {
        decimals: mint.decimals,
        program_id: account.owner,
    })
}

/// Fetches the account state needed to quote the routes of one pair
pub struct RouteDataFetcher {
    rpc_client: Arc<RpcClient>,
}

impl RouteDataFetcher {
    pub fn new(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }

    pub async fn fetch(
        &self,
        pair: &TradingPair,
        routes: &RouteGraph,
    ) -> SwapResult<RouteSimulationBundle> {
        let mut bundle = RouteSimulationBundle {
            route_path_dict: routes.route_path_dict.clone(),
            ..Default::default()
        };

        // Mints: both ends of the pair plus every intermediate
        let mut mints = vec![pair.input_mint, pair.output_mint];
        for mid in routes.route_path_dict.keys() {
            if !mints.contains(mid) {
                mints.push(*mid);
            }
        }
        let (slot, accounts) = self.fetch_accounts(&mints).await?;
        bundle.slot = slot;
        for (mint, account) in mints.iter().zip(accounts) {
            match account.as_ref().and_then(decode_mint) {
                Some(info) => {
                    bundle.mint_infos.insert(*mint, info);
                }
                None => warn!("Mint account {} is missing or undecodable", mint),
            }
        }

        for (kind, ids) in routes.pools_by_kind() {
            let (_, accounts) = self.fetch_accounts(&ids).await?;
            let snapshots = bundle.pool_snapshots_mut(kind);
            for (id, account) in ids.iter().zip(accounts) {
                if let Some(account) = account {
                    snapshots.insert(*id, snapshot(account));
                } else {
                    debug!("{} pool {} no longer exists", kind, id);
                }
            }

            if kind == PoolKind::Clmm {
                let bitmaps: Vec<Pubkey> = ids.iter().map(tick_array_bitmap_address).collect();
                let (_, accounts) = self.fetch_accounts(&bitmaps).await?;
                for (id, account) in ids.iter().zip(accounts) {
                    if let Some(account) = account {
                        bundle.tick_arrays.insert(*id, snapshot(account));
                    }
                }
            }
        }

        info!(
            "Fetched route data for {}: {} mints, {} AMM | {} CLMM | {} CPMM pools at slot {}",
            pair,
            bundle.mint_infos.len(),
            bundle.amm_pools.len(),
            bundle.clmm_pools.len(),
            bundle.cpmm_pools.len(),
            bundle.slot
        );
        Ok(bundle)
    }

    /// `getMultipleAccounts` in chunks of `MAX_MULTIPLE_ACCOUNTS`, results in key order
    async fn fetch_accounts(&self, keys: &[Pubkey]) -> SwapResult<(u64, Vec<Option<Account>>)> {
        let mut slot = 0;
        let mut accounts = Vec::with_capacity(keys.len());

        for chunk in keys.chunks(MAX_MULTIPLE_ACCOUNTS) {
            let response = self
                .rpc_client
                .get_multiple_accounts_with_commitment(chunk, CommitmentConfig::confirmed())
                .await
                .map_err(SwapError::RpcError)?;
            slot = slot.max(response.context.slot);
            accounts.extend(response.value);
        }

        Ok((slot, accounts))
    }
}

fn snapshot(account: Account) -> PoolAccountSnapshot {
    PoolAccountSnapshot {
        owner: account.owner,
        lamports: account.lamports,
        data: account.data,
    }
}
