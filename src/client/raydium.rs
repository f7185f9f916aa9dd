use crate::client::DexClient;
use crate::core::{
    Config, PoolKeys, PoolKind, PoolListSnapshot, QuoteParams, RouteGraph, RoutePool, RouteQuote,
    RouteSimulationBundle, SwapRequest, SwapResult, TradingPair,
};
use crate::discovery::{find_routes, PoolLayout, PoolListFetcher, RouteDataFetcher};
use crate::quotes::RaydiumApi;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, transaction::VersionedTransaction};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::collections::HashSet;
use std::sync::Arc;

/// `DexClient` backed by Solana RPC for pool state and the Raydium HTTP APIs
/// for quoting and transaction assembly
pub struct RaydiumClient {
    pool_fetcher: PoolListFetcher,
    route_data_fetcher: RouteDataFetcher,
    api: RaydiumApi,
}

impl RaydiumClient {
    pub fn new(rpc_client: Arc<RpcClient>, api: RaydiumApi) -> Self {
        Self {
            pool_fetcher: PoolListFetcher::new(rpc_client.clone()),
            route_data_fetcher: RouteDataFetcher::new(rpc_client),
            api,
        }
    }

    pub fn from_config(config: &Config, rpc_client: Arc<RpcClient>) -> SwapResult<Self> {
        let api = RaydiumApi::new(
            &config.raydium_api_url,
            &config.raydium_trade_api_url,
            config.timeout(),
        )?;
        Ok(Self::new(rpc_client, api))
    }
}

#[async_trait::async_trait]
impl DexClient for RaydiumClient {
    async fn fetch_pool_list(&self) -> SwapResult<PoolListSnapshot> {
        self.pool_fetcher.fetch_all().await
    }

    fn find_routes(&self, input: &Pubkey, output: &Pubkey, pools: &PoolListSnapshot) -> RouteGraph {
        find_routes(input, output, pools)
    }

    async fn fetch_route_data(
        &self,
        pair: &TradingPair,
        routes: &RouteGraph,
    ) -> SwapResult<RouteSimulationBundle> {
        self.route_data_fetcher.fetch(pair, routes).await
    }

    async fn compute_quotes(
        &self,
        params: &QuoteParams,
        routes: &RouteGraph,
        bundle: &RouteSimulationBundle,
    ) -> SwapResult<Vec<RouteQuote>> {
        debug!(
            "Quoting {} at {:.2}% slippage",
            params.pair,
            params.slippage() * 100.0
        );
        let quotes = self.api.compute(params).await?;
        Ok(retain_quotable(quotes, routes, bundle))
    }

    async fn fetch_pool_keys(&self, pool_ids: &[Pubkey]) -> SwapResult<Vec<PoolKeys>> {
        self.api.pool_keys(pool_ids).await
    }

    async fn build_swap_transactions(
        &self,
        request: &SwapRequest,
    ) -> SwapResult<Vec<VersionedTransaction>> {
        // Native SOL legs are wrapped by the backend, token legs use the owner's ATA
        let input_account = (!request.wraps_sol()).then(|| {
            get_associated_token_address_with_program_id(
                &request.owner,
                &request.pair.input_mint,
                &request.input_token_program,
            )
        });
        let output_account = (!request.unwraps_sol()).then(|| {
            get_associated_token_address_with_program_id(
                &request.owner,
                &request.pair.output_mint,
                &request.output_token_program,
            )
        });

        self.api
            .swap_transactions(request, input_account, output_account)
            .await
    }
}

/// Pools of `routes` whose live state is held by `bundle`: the account is
/// owned by the pool program and still holds the cached mints. CLMM pools
/// also need their tick-array bitmap extension.
pub fn quotable_pools(routes: &RouteGraph, bundle: &RouteSimulationBundle) -> HashSet<Pubkey> {
    routes
        .pools()
        .filter(|pool| is_quotable(pool, bundle))
        .map(|pool| pool.info.id)
        .collect()
}

fn is_quotable(pool: &RoutePool, bundle: &RouteSimulationBundle) -> bool {
    let layout = PoolLayout::for_kind(pool.kind);
    let state = match bundle.pool_snapshots(pool.kind).get(&pool.info.id) {
        Some(state) if state.owner == layout.program_id => state,
        _ => return false,
    };

    let live = state
        .data
        .get(layout.mint_offset..)
        .and_then(|slice| layout.decode(pool.info.id, slice));
    match live {
        Some(live) if live.mint_a == pool.info.mint_a && live.mint_b == pool.info.mint_b => {}
        _ => return false,
    }

    pool.kind != PoolKind::Clmm || bundle.tick_arrays.contains_key(&pool.info.id)
}

/// Drop candidates routed through any pool the cached route data cannot back
pub fn retain_quotable(
    quotes: Vec<RouteQuote>,
    routes: &RouteGraph,
    bundle: &RouteSimulationBundle,
) -> Vec<RouteQuote> {
    let usable = quotable_pools(routes, bundle);
    quotes
        .into_iter()
        .filter(|quote| {
            let backed = !quote.pool_ids.is_empty()
                && quote.pool_ids.iter().all(|id| usable.contains(id));
            if !backed {
                debug!(
                    "Dropping quote through pools outside the cached routes: {:?}",
                    quote.pool_ids
                );
            }
            backed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BasicPoolInfo, PoolAccountSnapshot, RoutePath, WSOL};
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn route_pool(kind: PoolKind, mint_a: Pubkey, mint_b: Pubkey) -> RoutePool {
        RoutePool {
            kind,
            info: BasicPoolInfo {
                id: Pubkey::new_unique(),
                version: PoolLayout::for_kind(kind).version,
                mint_a,
                mint_b,
            },
        }
    }

    /// Pool account as the program lays it out, mints at the layout offset
    fn live_state(pool: &RoutePool) -> PoolAccountSnapshot {
        let layout = PoolLayout::for_kind(pool.kind);
        let mut data = vec![0u8; layout.data_size as usize];
        let offset = layout.mint_offset;
        data[offset..offset + 32].copy_from_slice(pool.info.mint_a.as_ref());
        data[offset + 32..offset + 64].copy_from_slice(pool.info.mint_b.as_ref());
        PoolAccountSnapshot {
            owner: layout.program_id,
            lamports: 1,
            data,
        }
    }

    fn bundle_for(pools: &[&RoutePool]) -> RouteSimulationBundle {
        let mut bundle = RouteSimulationBundle::default();
        for pool in pools {
            bundle
                .pool_snapshots_mut(pool.kind)
                .insert(pool.info.id, live_state(pool));
            if pool.kind == PoolKind::Clmm {
                bundle.tick_arrays.insert(
                    pool.info.id,
                    PoolAccountSnapshot {
                        owner: *crate::core::CLMM_PROGRAM,
                        lamports: 1,
                        data: vec![0u8; 8],
                    },
                );
            }
        }
        bundle
    }

    fn quote_through(pool_ids: Vec<Pubkey>) -> RouteQuote {
        RouteQuote {
            pool_ids,
            amount_in: 1_000_000,
            amount_out: 50_000,
            min_amount_out: 47_500,
            price_impact_pct: 0.1,
            response: json!({ "success": true }),
        }
    }

    #[test]
    fn test_quotable_pools_need_live_state() {
        let mint = Pubkey::new_unique();
        let mid = Pubkey::new_unique();
        let amm = route_pool(PoolKind::Amm, mint, *WSOL);
        let clmm = route_pool(PoolKind::Clmm, *WSOL, mid);
        let cpmm = route_pool(PoolKind::Cpmm, mid, mint);
        let mut routes = RouteGraph {
            direct_path: vec![amm],
            ..Default::default()
        };
        routes.route_path_dict.insert(
            mid,
            RoutePath {
                in_pools: vec![clmm],
                out_pools: vec![cpmm],
            },
        );

        let bundle = bundle_for(&[&amm, &clmm, &cpmm]);
        let usable = quotable_pools(&routes, &bundle);
        assert_eq!(usable.len(), 3);

        // no snapshot at all
        assert!(quotable_pools(&routes, &RouteSimulationBundle::default()).is_empty());

        // CLMM pool without its bitmap extension
        let mut no_bitmap = bundle.clone();
        no_bitmap.tick_arrays.clear();
        let usable = quotable_pools(&routes, &no_bitmap);
        assert!(!usable.contains(&clmm.info.id));
        assert!(usable.contains(&amm.info.id));

        // account now owned by another program
        let mut reassigned = bundle.clone();
        reassigned.amm_pools.get_mut(&amm.info.id).unwrap().owner = Pubkey::new_unique();
        assert!(!quotable_pools(&routes, &reassigned).contains(&amm.info.id));

        // account holds different mints than the cached pool list
        let mut moved = bundle.clone();
        let offset = PoolLayout::for_kind(PoolKind::Cpmm).mint_offset;
        moved.cpmm_pools.get_mut(&cpmm.info.id).unwrap().data[offset..offset + 32]
            .copy_from_slice(Pubkey::new_unique().as_ref());
        assert!(!quotable_pools(&routes, &moved).contains(&cpmm.info.id));
    }

    #[test]
    fn test_retain_quotable_keeps_order_of_backed_quotes() {
        let mint = Pubkey::new_unique();
        let first = route_pool(PoolKind::Amm, mint, *WSOL);
        let second = route_pool(PoolKind::Cpmm, *WSOL, mint);
        let routes = RouteGraph {
            direct_path: vec![first, second],
            ..Default::default()
        };
        let bundle = bundle_for(&[&first, &second]);

        let kept = retain_quotable(
            vec![
                quote_through(vec![second.info.id]),
                quote_through(vec![Pubkey::new_unique()]),
                quote_through(vec![]),
                quote_through(vec![first.info.id]),
            ],
            &routes,
            &bundle,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].pool_ids, vec![second.info.id]);
        assert_eq!(kept[1].pool_ids, vec![first.info.id]);
    }

    #[tokio::test]
    async fn test_compute_quotes_drops_routes_outside_cached_graph() {
        let mut server = mockito::Server::new_async().await;
        let mint = Pubkey::new_unique();
        let cached = route_pool(PoolKind::Amm, *WSOL, mint);
        let routes = RouteGraph {
            direct_path: vec![cached],
            ..Default::default()
        };
        let bundle = bundle_for(&[&cached]);
        let foreign = Pubkey::new_unique();

        let body = json!({
            "success": true,
            "data": {
                "inputAmount": "1000000",
                "outputAmount": "52000",
                "otherAmountThreshold": "49400",
                "priceImpactPct": 0.1,
                "routePlan": [{ "poolId": foreign.to_string() }]
            }
        });
        server
            .mock("GET", Matcher::Regex("^/compute/swap-base-in".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = RaydiumApi::new(&server.url(), &server.url(), Duration::from_secs(5)).unwrap();
        let client = RaydiumClient::new(
            Arc::new(RpcClient::new("http://127.0.0.1:8899".to_string())),
            api,
        );
        let params = QuoteParams {
            pair: TradingPair::new(*WSOL, mint),
            amount_in: 1_000_000,
            slippage_bps: 500,
            chain_time: 0,
        };

        let quotes = client.compute_quotes(&params, &routes, &bundle).await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_compute_quotes_keeps_route_through_cached_pool() {
        let mut server = mockito::Server::new_async().await;
        let mint = Pubkey::new_unique();
        let cached = route_pool(PoolKind::Clmm, *WSOL, mint);
        let routes = RouteGraph {
            direct_path: vec![cached],
            ..Default::default()
        };

        let body = json!({
            "success": true,
            "data": {
                "inputAmount": "1000000",
                "outputAmount": "52000",
                "otherAmountThreshold": "49400",
                "routePlan": [{ "poolId": cached.info.id.to_string() }]
            }
        });
        server
            .mock("GET", Matcher::Regex("^/compute/swap-base-in".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .expect(2)
            .create_async()
            .await;

        let api = RaydiumApi::new(&server.url(), &server.url(), Duration::from_secs(5)).unwrap();
        let client = RaydiumClient::new(
            Arc::new(RpcClient::new("http://127.0.0.1:8899".to_string())),
            api,
        );
        let params = QuoteParams {
            pair: TradingPair::new(*WSOL, mint),
            amount_in: 1_000_000,
            slippage_bps: 500,
            chain_time: 0,
        };

        let bundle = bundle_for(&[&cached]);
        let quotes = client.compute_quotes(&params, &routes, &bundle).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].pool_ids, vec![cached.info.id]);
        assert_eq!(quotes[0].min_amount_out, 49_400);

        // same graph, but the route data never saw the pool
        let quotes = client
            .compute_quotes(&params, &routes, &RouteSimulationBundle::default())
            .await
            .unwrap();
        assert!(quotes.is_empty());
    }
}
