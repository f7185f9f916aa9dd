pub mod tradable;


use crate::cache::{CacheSet, PoolListCache};
use crate::client::{DexClient, LedgerClient, RaydiumClient};
use crate::core::{
    constants::MAX_SLIPPAGE_BPS, Config, PoolListSnapshot, PriorityFee, QuoteParams, RouteGraph,
    RouteQuote, RouteSimulationBundle, SwapError, SwapRequest, SwapResult, SwapSide, TradingPair,
    TransactionResult,
};
use crate::transaction::{connect, sign_transaction, RpcLedger};
use log::{debug, error, info};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, transaction::VersionedTransaction};
use std::sync::Arc;

pub use tradable::is_tradable;

const BUY_AND_SELL_TAG: &str = "[BUY AND SELL]";

/// Pool list from the file cache, or fetched and written back on a miss.
/// An empty fetch is an error and is never cached.
pub async fn load_pool_list(
    cache: &PoolListCache,
    dex: &dyn DexClient,
) -> SwapResult<PoolListSnapshot> {
    if let Some(snapshot) = cache.read() {
        debug!("Using cached pool list ({} pools)", snapshot.len());
        return Ok(snapshot);
    }

    let snapshot = dex.fetch_pool_list().await?;
    if snapshot.is_empty() {
        return Err(SwapError::NoPoolData);
    }
    cache.write(&snapshot)?;
    Ok(snapshot)
}

/// Candidate with the highest minimum output. Zero-output candidates are
/// infeasible; among equal minimum outputs the earliest wins.
pub fn select_best_quote(candidates: Vec<RouteQuote>, amount_in: u64) -> SwapResult<RouteQuote> {
    let total = candidates.len();
    let mut best: Option<RouteQuote> = None;

    for candidate in candidates.into_iter().filter(|c| c.amount_out > 0) {
        match &best {
            Some(current) if current.min_amount_out >= candidate.min_amount_out => {}
            _ => best = Some(candidate),
        }
    }

    best.ok_or_else(|| {
        if total > 0 {
            SwapError::NoSwapRoute(format!("input amount {} is too small", amount_in))
        } else {
            SwapError::NoSwapRoute("no candidate route returned".to_string())
        }
    })
}

/// Buys and sells tokens against wSOL on Raydium, caching pool lists,
/// routes and route data between calls
pub struct RaydiumTrader {
    dex: Arc<dyn DexClient>,
    ledger: Arc<dyn LedgerClient>,
    caches: Arc<CacheSet>,
    default_priority_fee: PriorityFee,
}

impl RaydiumTrader {
    pub fn new(
        dex: Arc<dyn DexClient>,
        ledger: Arc<dyn LedgerClient>,
        caches: Arc<CacheSet>,
    ) -> Self {
        Self {
            dex,
            ledger,
            caches,
            default_priority_fee: PriorityFee::default(),
        }
    }

    /// Wire the RPC ledger and Raydium client from `config`
    pub fn from_config(config: &Config, caches: Arc<CacheSet>) -> SwapResult<Self> {
        let rpc_client = connect(config);
        let dex = Arc::new(RaydiumClient::from_config(config, rpc_client.clone())?);
        let ledger = Arc::new(RpcLedger::new(rpc_client));

        Ok(Self::new(dex, ledger, caches).with_priority_fee(config.default_priority_fee()))
    }

    pub fn with_priority_fee(mut self, priority_fee: PriorityFee) -> Self {
        self.default_priority_fee = priority_fee;
        self
    }

    pub fn caches(&self) -> &CacheSet {
        &self.caches
    }

    pub fn dex(&self) -> &dyn DexClient {
        self.dex.as_ref()
    }

    /// Swap `amount_in` lamports of wSOL for `mint`
    pub async fn buy(
        &self,
        buyer: &Keypair,
        mint: &Pubkey,
        amount_in: u64,
        slippage_bps: u16,
        priority_fee: Option<PriorityFee>,
    ) -> SwapResult<TransactionResult> {
        self.swap(SwapSide::Buy, buyer, mint, amount_in, slippage_bps, priority_fee)
            .await
    }

    /// Swap `amount_in` raw units of `mint` for wSOL
    pub async fn sell(
        &self,
        seller: &Keypair,
        mint: &Pubkey,
        amount_in: u64,
        slippage_bps: u16,
        priority_fee: Option<PriorityFee>,
    ) -> SwapResult<TransactionResult> {
        self.swap(SwapSide::Sell, seller, mint, amount_in, slippage_bps, priority_fee)
            .await
    }

    /// Buy `mint`, then sell the whole resulting token balance.
    /// A failed sell does not undo the buy.
    pub async fn buy_and_sell(
        &self,
        trader: &Keypair,
        mint: &Pubkey,
        amount_in: u64,
        slippage_bps: u16,
        priority_fee: Option<PriorityFee>,
    ) -> SwapResult<TransactionResult> {
        let buy = self
            .buy(trader, mint, amount_in, slippage_bps, priority_fee)
            .await
            .map_err(|e| {
                error!("{} Error during buy: {}", BUY_AND_SELL_TAG, e);
                e
            })?;

        let balance = self
            .ledger
            .token_balance(&trader.pubkey(), mint)
            .await
            .map_err(|e| {
                error!("{} Failed to read token balance: {}", BUY_AND_SELL_TAG, e);
                e
            })?;
        info!("{} Selling back {} tokens of {}", BUY_AND_SELL_TAG, balance, mint);

        let sell = self
            .sell(trader, mint, balance, slippage_bps, priority_fee)
            .await
            .map_err(|e| {
                error!("{} Error during sell: {}", BUY_AND_SELL_TAG, e);
                e
            })?;

        Ok(TransactionResult {
            success: buy.success && sell.success,
            signature: sell.signature,
        })
    }

    async fn swap(
        &self,
        side: SwapSide,
        signer: &Keypair,
        mint: &Pubkey,
        amount_in: u64,
        slippage_bps: u16,
        priority_fee: Option<PriorityFee>,
    ) -> SwapResult<TransactionResult> {
        let result = self
            .execute_swap(side, signer, side.pair(*mint), amount_in, slippage_bps, priority_fee)
            .await;
        if let Err(e) = &result {
            error!("{} Swap of {} failed: {}", side.tag(), mint, e);
        }
        result
    }

    async fn execute_swap(
        &self,
        side: SwapSide,
        signer: &Keypair,
        pair: TradingPair,
        amount_in: u64,
        slippage_bps: u16,
        priority_fee: Option<PriorityFee>,
    ) -> SwapResult<TransactionResult> {
        let tag = side.tag();
        if amount_in == 0 {
            return Err(SwapError::InvalidAmount("amount must be greater than 0".to_string()));
        }
        if slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(SwapError::InvalidSlippage(format!(
                "{} bps exceeds {} bps",
                slippage_bps, MAX_SLIPPAGE_BPS
            )));
        }

        let chain_time = self.ledger.refresh_chain_time().await?;
        let routes = self.routes(&pair).await?;
        let bundle = self.route_data(&pair, &routes).await?;

        let params = QuoteParams {
            pair,
            amount_in,
            slippage_bps,
            chain_time,
        };
        let candidates = self.dex.compute_quotes(&params, &routes, &bundle).await?;
        debug!("{} {} candidate routes for {}", tag, candidates.len(), pair);
        let quote = select_best_quote(candidates, amount_in)?;
        info!(
            "{} Route {:?}: {} in, {} out, {} minimum",
            tag, quote.pool_ids, quote.amount_in, quote.amount_out, quote.min_amount_out
        );

        let pool_keys = self.dex.fetch_pool_keys(&quote.pool_ids).await?;
        if let Some(missing) = quote
            .pool_ids
            .iter()
            .find(|id| !pool_keys.iter().any(|keys| keys.id == **id))
        {
            return Err(SwapError::PoolNotFound(missing.to_string()));
        }

        let mint_program = |mint: &Pubkey| {
            bundle
                .mint_infos
                .get(mint)
                .map(|info| info.program_id)
                .ok_or(SwapError::MissingMintInfo(*mint))
        };
        let request = SwapRequest {
            owner: signer.pubkey(),
            pair,
            input_token_program: mint_program(&pair.input_mint)?,
            output_token_program: mint_program(&pair.output_mint)?,
            quote,
            pool_keys,
            priority_fee: priority_fee.unwrap_or(self.default_priority_fee),
        };

        let transactions = self.dex.build_swap_transactions(&request).await?;
        let signature = self.submit(tag, signer, transactions).await?;
        info!(
            "{} Swap confirmed: https://explorer.solana.com/tx/{}",
            tag, signature
        );

        Ok(TransactionResult {
            success: true,
            signature,
        })
    }

    /// Route graph of `pair`, cached or discovered over the pool list
    async fn routes(&self, pair: &TradingPair) -> SwapResult<RouteGraph> {
        if let Some(routes) = self.caches.routes.get(pair) {
            return Ok(routes);
        }

        let pools = load_pool_list(&self.caches.pools, self.dex.as_ref()).await?;
        let routes = self
            .dex
            .find_routes(&pair.input_mint, &pair.output_mint, &pools);
        if routes.is_empty() {
            return Err(SwapError::NoRoute {
                input: pair.input_mint,
                output: pair.output_mint,
            });
        }

        debug!("Found {} paths for {}", routes.path_count(), pair);
        self.caches.routes.put(routes.clone(), pair);
        Ok(routes)
    }

    async fn route_data(
        &self,
        pair: &TradingPair,
        routes: &RouteGraph,
    ) -> SwapResult<Arc<RouteSimulationBundle>> {
        if let Some(bundle) = self.caches.route_data.get(pair) {
            return Ok(bundle);
        }

        let bundle = self.dex.fetch_route_data(pair, routes).await?;
        for mint in [pair.input_mint, pair.output_mint] {
            if !bundle.mint_infos.contains_key(&mint) {
                return Err(SwapError::MissingMintInfo(mint));
            }
        }

        let bundle = Arc::new(bundle);
        self.caches.route_data.put(bundle.clone(), pair);
        Ok(bundle)
    }

    /// Sign and send every transaction in order. Returns the first signature.
    async fn submit(
        &self,
        tag: &str,
        signer: &Keypair,
        transactions: Vec<VersionedTransaction>,
    ) -> SwapResult<String> {
        if transactions.is_empty() {
            return Err(SwapError::TransactionFailed(
                "no transaction to submit".to_string(),
            ));
        }

        let mut first = None;
        for transaction in transactions {
            let transaction = sign_transaction(transaction, signer)?;
            match self.ledger.send_transaction(&transaction).await {
                Ok(signature) => {
                    debug!("{} Sent {}", tag, signature);
                    first.get_or_insert(signature);
                }
                Err(e) => {
                    self.log_failure(tag, &transaction, &e).await;
                    return Err(e);
                }
            }
        }

        Ok(first.map(|s| s.to_string()).unwrap_or_default())
    }

    /// Best-effort program logs of a rejected transaction
    async fn log_failure(&self, tag: &str, transaction: &VersionedTransaction, err: &SwapError) {
        if !matches!(err, SwapError::RpcError(_) | SwapError::TransactionFailed(_)) {
            return;
        }

        match self.ledger.simulation_logs(transaction).await {
            Ok(logs) if !logs.is_empty() => {
                error!("{} Transaction logs:", tag);
                for line in logs {
                    error!("{}   {}", tag, line);
                }
            }
            Ok(_) => error!("{} No transaction logs available.", tag),
            Err(log_err) => error!("{} Failed to get transaction logs: {}", tag, log_err),
        }
    }
}
