pub mod raydium;

use crate::core::{
    PoolKeys, PoolListSnapshot, QuoteParams, RouteGraph, RouteQuote, RouteSimulationBundle,
    SwapRequest, SwapResult, TradingPair,
};
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction};

pub use raydium::RaydiumClient;

/// DEX-side collaborator: pool discovery, routing, quoting and transaction building.
///
/// Nothing behind this trait is cached; callers own the caching policy.
#[async_trait::async_trait]
pub trait DexClient: Send + Sync {
    /// Fetch the full AMM / CLMM / CPMM pool list from the network
    async fn fetch_pool_list(&self) -> SwapResult<PoolListSnapshot>;

    /// Direct and two-hop routes from `input` to `output` over `pools`
    fn find_routes(&self, input: &Pubkey, output: &Pubkey, pools: &PoolListSnapshot) -> RouteGraph;

    /// Fetch mint and pool account data needed to quote `routes`
    async fn fetch_route_data(
        &self,
        pair: &TradingPair,
        routes: &RouteGraph,
    ) -> SwapResult<RouteSimulationBundle>;

    /// Candidate routes with their expected and minimum outputs. Every
    /// candidate runs only through pools of `routes` whose state `bundle` holds.
    async fn compute_quotes(
        &self,
        params: &QuoteParams,
        routes: &RouteGraph,
        bundle: &RouteSimulationBundle,
    ) -> SwapResult<Vec<RouteQuote>>;

    async fn fetch_pool_keys(&self, pool_ids: &[Pubkey]) -> SwapResult<Vec<PoolKeys>>;

    /// Unsigned transactions executing the swap, in submission order
    async fn build_swap_transactions(
        &self,
        request: &SwapRequest,
    ) -> SwapResult<Vec<VersionedTransaction>>;
}

/// Ledger-side collaborator: chain time, submission and balances.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current chain time in unix seconds
    async fn refresh_chain_time(&self) -> SwapResult<i64>;

    /// Submit a signed transaction and wait for confirmation
    async fn send_transaction(&self, transaction: &VersionedTransaction) -> SwapResult<Signature>;

    /// Program logs from simulating `transaction`
    async fn simulation_logs(&self, transaction: &VersionedTransaction) -> SwapResult<Vec<String>>;

    /// Raw token balance of `owner`'s associated account for `mint`
    async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> SwapResult<u64>;
}
