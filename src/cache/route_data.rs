use crate::cache::entry::TtlMap;
use crate::core::{RouteSimulationBundle, TradingPair};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// In-memory cache of the on-chain data needed to quote a pair.
///
/// Bundles can hold many pool accounts, so they are stored behind `Arc`
/// and handed out without copying.
pub struct RouteDataCache {
    bundles: TtlMap<Arc<RouteSimulationBundle>>,
}

impl RouteDataCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            bundles: TtlMap::new(ttl),
        }
    }

    pub fn get(&self, pair: &TradingPair) -> Option<Arc<RouteSimulationBundle>> {
        let bundle = self.bundles.get(pair);
        debug!(
            "Route data cache {} for {}",
            if bundle.is_some() { "hit" } else { "miss" },
            pair
        );
        bundle
    }

    pub fn put(&self, bundle: Arc<RouteSimulationBundle>, pair: &TradingPair) {
        self.bundles.put(pair, bundle);
    }

    /// Store a bundle with a given creation time (ms since epoch)
    pub fn put_with_timestamp(
        &self,
        bundle: Arc<RouteSimulationBundle>,
        pair: &TradingPair,
        created_at_ms: i64,
    ) {
        self.bundles.put_with_timestamp(pair, bundle, created_at_ms);
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
