use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::core::constants::{BPS_DENOMINATOR, WSOL};

/// Raydium pool category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Amm,
    Clmm,
    Cpmm,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Amm => write!(f, "AMM"),
            PoolKind::Clmm => write!(f, "CLMM"),
            PoolKind::Cpmm => write!(f, "CPMM"),
        }
    }
}

/// Directional mint pair. `(a, b)` and `(b, a)` are different pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradingPair {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
}

impl TradingPair {
    pub fn new(input_mint: Pubkey, output_mint: Pubkey) -> Self {
        Self {
            input_mint,
            output_mint,
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.output_mint, self.input_mint)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input_mint, self.output_mint)
    }
}

/// Minimal pool description kept in the pool-list cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BasicPoolInfo {
    pub id: Pubkey,
    pub version: u8,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
}

impl BasicPoolInfo {
    /// The mint on the other side of the pool, if `mint` is one of its sides
    pub fn other_mint(&self, mint: &Pubkey) -> Option<Pubkey> {
        if self.mint_a == *mint {
            Some(self.mint_b)
        } else if self.mint_b == *mint {
            Some(self.mint_a)
        } else {
            None
        }
    }

    pub fn connects(&self, a: &Pubkey, b: &Pubkey) -> bool {
        (self.mint_a == *a && self.mint_b == *b) || (self.mint_a == *b && self.mint_b == *a)
    }
}

/// Snapshot of every known Raydium pool, one list per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolListSnapshot {
    pub amm_pools: Vec<BasicPoolInfo>,
    pub clmm_pools: Vec<BasicPoolInfo>,
    pub cpmm_pools: Vec<BasicPoolInfo>,
}

impl PoolListSnapshot {
    pub fn is_empty(&self) -> bool {
        self.amm_pools.is_empty() && self.clmm_pools.is_empty() && self.cpmm_pools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.amm_pools.len() + self.clmm_pools.len() + self.cpmm_pools.len()
    }

    pub fn pools(&self, kind: PoolKind) -> &[BasicPoolInfo] {
        match kind {
            PoolKind::Amm => &self.amm_pools,
            PoolKind::Clmm => &self.clmm_pools,
            PoolKind::Cpmm => &self.cpmm_pools,
        }
    }

    /// Every pool tagged with its category
    pub fn iter(&self) -> impl Iterator<Item = (PoolKind, &BasicPoolInfo)> {
        self.amm_pools
            .iter()
            .map(|p| (PoolKind::Amm, p))
            .chain(self.clmm_pools.iter().map(|p| (PoolKind::Clmm, p)))
            .chain(self.cpmm_pools.iter().map(|p| (PoolKind::Cpmm, p)))
    }
}

/// A pool that takes part in a route, with its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutePool {
    pub kind: PoolKind,
    pub info: BasicPoolInfo,
}

/// Two-hop path through one intermediate mint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePath {
    /// Pools connecting the input mint to the intermediate mint
    pub in_pools: Vec<RoutePool>,
    /// Pools connecting the intermediate mint to the output mint
    pub out_pools: Vec<RoutePool>,
}

/// All direct pools and two-hop paths between an input and an output mint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGraph {
    pub direct_path: Vec<RoutePool>,
    pub route_path_dict: BTreeMap<Pubkey, RoutePath>,
}

impl RouteGraph {
    pub fn is_empty(&self) -> bool {
        self.direct_path.is_empty() && self.route_path_dict.is_empty()
    }

    /// Number of distinct paths, counting each in/out pool combination once
    pub fn path_count(&self) -> usize {
        self.direct_path.len()
            + self
                .route_path_dict
                .values()
                .map(|p| p.in_pools.len() * p.out_pools.len())
                .sum::<usize>()
    }

    /// Every pool of the graph, direct ones first. A pool shared by several
    /// paths is yielded once per path.
    pub fn pools(&self) -> impl Iterator<Item = &RoutePool> {
        self.direct_path.iter().chain(
            self.route_path_dict
                .values()
                .flat_map(|p| p.in_pools.iter().chain(p.out_pools.iter())),
        )
    }

    /// Every pool id used by the graph, deduplicated and grouped by category
    pub fn pools_by_kind(&self) -> HashMap<PoolKind, Vec<Pubkey>> {
        let mut grouped: HashMap<PoolKind, Vec<Pubkey>> = HashMap::new();
        for pool in self.pools() {
            let ids = grouped.entry(pool.kind).or_default();
            if !ids.contains(&pool.info.id) {
                ids.push(pool.info.id);
            }
        }
        grouped
    }
}

/// Decoded mint account fields needed for quoting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
    /// Token program owning the mint (SPL Token or Token-2022)
    pub program_id: Pubkey,
}

/// Raw account state of a pool at fetch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolAccountSnapshot {
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// Everything needed to quote a route for one trading pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSimulationBundle {
    pub mint_infos: HashMap<Pubkey, MintInfo>,
    pub amm_pools: HashMap<Pubkey, PoolAccountSnapshot>,
    pub clmm_pools: HashMap<Pubkey, PoolAccountSnapshot>,
    pub cpmm_pools: HashMap<Pubkey, PoolAccountSnapshot>,
    /// CLMM tick-array bitmap extension accounts keyed by pool id
    pub tick_arrays: HashMap<Pubkey, PoolAccountSnapshot>,
    pub route_path_dict: BTreeMap<Pubkey, RoutePath>,
    pub slot: u64,
}

impl RouteSimulationBundle {
    pub fn pool_snapshots(&self, kind: PoolKind) -> &HashMap<Pubkey, PoolAccountSnapshot> {
        match kind {
            PoolKind::Amm => &self.amm_pools,
            PoolKind::Clmm => &self.clmm_pools,
            PoolKind::Cpmm => &self.cpmm_pools,
        }
    }

    pub fn pool_snapshots_mut(
        &mut self,
        kind: PoolKind,
    ) -> &mut HashMap<Pubkey, PoolAccountSnapshot> {
        match kind {
            PoolKind::Amm => &mut self.amm_pools,
            PoolKind::Clmm => &mut self.clmm_pools,
            PoolKind::Cpmm => &mut self.cpmm_pools,
        }
    }
}

/// Quote parameters handed to the quoting backend
#[derive(Debug, Clone, Copy)]
pub struct QuoteParams {
    pub pair: TradingPair,
    pub amount_in: u64,
    pub slippage_bps: u16,
    /// Chain time (unix seconds) at the start of the swap
    pub chain_time: i64,
}

impl QuoteParams {
    /// Slippage as a fraction, e.g. 500 bps -> 0.05
    pub fn slippage(&self) -> f64 {
        self.slippage_bps as f64 / BPS_DENOMINATOR
    }
}

/// One candidate route returned by the quoting backend
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuote {
    pub pool_ids: Vec<Pubkey>,
    pub amount_in: u64,
    pub amount_out: u64,
    pub min_amount_out: u64,
    pub price_impact_pct: f64,
    /// Backend payload needed to build the transaction for this quote
    pub response: serde_json::Value,
}

/// Resolved on-chain keys of a pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolKeys {
    pub id: Pubkey,
    pub program_id: Pubkey,
    pub raw: serde_json::Value,
}

/// Compute-unit price paid on top of the base fee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityFee {
    pub unit_price_micro_lamports: u64,
}

/// Everything needed to build swap transactions for a selected quote
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub owner: Pubkey,
    pub pair: TradingPair,
    pub quote: RouteQuote,
    pub pool_keys: Vec<PoolKeys>,
    pub priority_fee: PriorityFee,
    /// Token programs owning the input and output mints
    pub input_token_program: Pubkey,
    pub output_token_program: Pubkey,
}

impl SwapRequest {
    pub fn wraps_sol(&self) -> bool {
        self.pair.input_mint == *WSOL
    }

    pub fn unwraps_sol(&self) -> bool {
        self.pair.output_mint == *WSOL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapSide {
    Buy,
    Sell,
}

impl SwapSide {
    /// Log tag used for every message of this side
    pub fn tag(&self) -> &'static str {
        match self {
            SwapSide::Buy => "[BUY]",
            SwapSide::Sell => "[SELL]",
        }
    }

    /// Trading pair for swapping `mint` against wSOL in this direction
    pub fn pair(&self, mint: Pubkey) -> TradingPair {
        match self {
            SwapSide::Buy => TradingPair::new(*WSOL, mint),
            SwapSide::Sell => TradingPair::new(mint, *WSOL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub success: bool,
    pub signature: String,
}
