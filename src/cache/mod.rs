pub mod entry;
pub mod pool_list;
pub mod route;
pub mod route_data;

use crate::core::config::CacheConfig;

pub use entry::{now_ms, CacheKey, TimedEntry, TtlMap};
pub use pool_list::PoolListCache;
pub use route::RouteCache;
pub use route_data::RouteDataCache;

/// The three caches shared by every trader of a process.
///
/// Build one per process and hand it out behind an `Arc`; a trader given a
/// different set works against its own caches.
pub struct CacheSet {
    pub pools: PoolListCache,
    pub routes: RouteCache,
    pub route_data: RouteDataCache,
}

impl CacheSet {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            pools: PoolListCache::new(
                config.pool_file_path(),
                config.pool_list_ttl(),
                config.strict,
            ),
            routes: RouteCache::new(config.route_ttl()),
            route_data: RouteDataCache::new(config.route_ttl()),
        }
    }
}
