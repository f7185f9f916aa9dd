pub mod cache;
pub mod cli;
pub mod client;
pub mod core;
pub mod discovery;
pub mod quotes;
pub mod trader;
pub mod transaction;
pub mod utils;

// Re-export commonly used types
pub use cache::CacheSet;
pub use client::{DexClient, LedgerClient, RaydiumClient};
pub use crate::core::{Config, PriorityFee, SwapError, SwapResult, TransactionResult};
pub use trader::{is_tradable, RaydiumTrader};
pub use transaction::RpcLedger;
