use crate::core::{constants::*, BasicPoolInfo, PoolKind, PoolListSnapshot, SwapError, SwapResult};
use futures::future::try_join_all;
use log::{debug, info};
use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::RpcFilterType,
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::sync::Arc;

/// Where the two mints live inside a pool account of one category
#[derive(Debug, Clone, Copy)]
pub struct PoolLayout {
    pub kind: PoolKind,
    pub program_id: Pubkey,
    pub data_size: u64,
    pub mint_offset: usize,
    pub version: u8,
}

impl PoolLayout {
    pub fn for_kind(kind: PoolKind) -> Self {
        match kind {
            PoolKind::Amm => Self {
                kind,
                program_id: *AMM_V4_PROGRAM,
                data_size: AMM_V4_POOL_SIZE,
                mint_offset: AMM_V4_MINT_OFFSET,
                version: AMM_V4_VERSION,
            },
            PoolKind::Clmm => Self {
                kind,
                program_id: *CLMM_PROGRAM,
                data_size: CLMM_POOL_SIZE,
                mint_offset: CLMM_MINT_OFFSET,
                version: CLMM_VERSION,
            },
            PoolKind::Cpmm => Self {
                kind,
                program_id: *CPMM_PROGRAM,
                data_size: CPMM_POOL_SIZE,
                mint_offset: CPMM_MINT_OFFSET,
                version: CPMM_VERSION,
            },
        }
    }

    /// Decode the 64-byte mint slice returned by the program-account scan
    pub fn decode(&self, id: Pubkey, slice: &[u8]) -> Option<BasicPoolInfo> {
        if slice.len() < 64 {
            return None;
        }
        let mint_a = Pubkey::try_from(&slice[0..32]).ok()?;
        let mint_b = Pubkey::try_from(&slice[32..64]).ok()?;
        Some(BasicPoolInfo {
            id,
            version: self.version,
            mint_a,
            mint_b,
        })
    }
}

/// Scans the Raydium programs for every pool and its mints
pub struct PoolListFetcher {
    rpc_client: Arc<RpcClient>,
}

impl PoolListFetcher {
    pub fn new(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }

    pub async fn fetch_all(&self) -> SwapResult<PoolListSnapshot> {
        info!("Fetching Raydium pool list from RPC");

        let kinds = [PoolKind::Amm, PoolKind::Clmm, PoolKind::Cpmm];
        let mut lists = try_join_all(kinds.iter().map(|kind| self.fetch_kind(*kind))).await?;

        let cpmm_pools = lists.pop().unwrap_or_default();
        let clmm_pools = lists.pop().unwrap_or_default();
        let amm_pools = lists.pop().unwrap_or_default();
        let snapshot = PoolListSnapshot {
            amm_pools,
            clmm_pools,
            cpmm_pools,
        };

        info!(
            "Fetched {} pools ({} AMM | {} CLMM | {} CPMM)",
            snapshot.len(),
            snapshot.amm_pools.len(),
            snapshot.clmm_pools.len(),
            snapshot.cpmm_pools.len()
        );
        Ok(snapshot)
    }

    async fn fetch_kind(&self, kind: PoolKind) -> SwapResult<Vec<BasicPoolInfo>> {
        let layout = PoolLayout::for_kind(kind);
        debug!("Scanning {} pools of program {}", kind, layout.program_id);

        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::DataSize(layout.data_size)]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: Some(UiDataSliceConfig {
                    offset: layout.mint_offset,
                    length: 64,
                }),
                commitment: Some(CommitmentConfig::confirmed()),
                ..Default::default()
            },
            ..Default::default()
        };

        let accounts = self
            .rpc_client
            .get_program_accounts_with_config(&layout.program_id, config)
            .await
            .map_err(SwapError::RpcError)?;

        let total = accounts.len();
        let pools: Vec<BasicPoolInfo> = accounts
            .into_iter()
            .filter_map(|(id, account)| layout.decode(id, &account.data))
            .collect();

        if pools.len() != total {
            debug!("Skipped {} undecodable {} accounts", total - pools.len(), kind);
        }
        Ok(pools)
    }
}
