use crate::cache::entry::TtlMap;
use crate::core::{RouteGraph, TradingPair};
use log::debug;
use std::time::Duration;

/// In-memory cache of computed route graphs, keyed by directional pair
pub struct RouteCache {
    routes: TtlMap<RouteGraph>,
}

impl RouteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            routes: TtlMap::new(ttl),
        }
    }

    pub fn get(&self, pair: &TradingPair) -> Option<RouteGraph> {
        let routes = self.routes.get(pair);
        debug!(
            "Route cache {} for {}",
            if routes.is_some() { "hit" } else { "miss" },
            pair
        );
        routes
    }

    pub fn put(&self, routes: RouteGraph, pair: &TradingPair) {
        self.routes.put(pair, routes);
    }

    /// Store routes with a given creation time (ms since epoch)
    pub fn put_with_timestamp(&self, routes: RouteGraph, pair: &TradingPair, created_at_ms: i64) {
        self.routes.put_with_timestamp(pair, routes, created_at_ms);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
