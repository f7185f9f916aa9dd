pub mod pool_fetcher;
pub mod route_data;
pub mod route_finder;

pub use pool_fetcher::{PoolLayout, PoolListFetcher};
pub use route_data::RouteDataFetcher;
pub use route_finder::find_routes;
