use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

// Raydium Program IDs (Mainnet)
pub const RAYDIUM_AMM_V4_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const RAYDIUM_CPMM_PROGRAM_ID: &str = "CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C";
pub const RAYDIUM_CLMM_PROGRAM_ID: &str = "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK";

// Program IDs as Pubkey
lazy_static::lazy_static! {
    pub static ref AMM_V4_PROGRAM: Pubkey = Pubkey::from_str(RAYDIUM_AMM_V4_PROGRAM_ID).unwrap();
    pub static ref CPMM_PROGRAM: Pubkey = Pubkey::from_str(RAYDIUM_CPMM_PROGRAM_ID).unwrap();
    pub static ref CLMM_PROGRAM: Pubkey = Pubkey::from_str(RAYDIUM_CLMM_PROGRAM_ID).unwrap();
    pub static ref WSOL: Pubkey = Pubkey::from_str(WSOL_MINT).unwrap();
}

// Common token addresses
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";

// Pool account layouts used by the pool-list scan: (data size, mint slice offset, version)
pub const AMM_V4_POOL_SIZE: u64 = 752;
pub const AMM_V4_MINT_OFFSET: usize = 400;
pub const AMM_V4_VERSION: u8 = 4;
pub const CLMM_POOL_SIZE: u64 = 1544;
pub const CLMM_MINT_OFFSET: usize = 73;
pub const CLMM_VERSION: u8 = 6;
pub const CPMM_POOL_SIZE: u64 = 637;
pub const CPMM_MINT_OFFSET: usize = 168;
pub const CPMM_VERSION: u8 = 7;

/// PDA seed of the CLMM tick-array bitmap extension account
pub const CLMM_TICK_ARRAY_BITMAP_SEED: &[u8] = b"pool_tick_array_bitmap_extension";

// Cache TTL in seconds
pub const POOL_LIST_CACHE_TTL: u64 = 60 * 60 * 24;
pub const ROUTE_CACHE_TTL: u64 = 60 * 60 * 4;

// Cache location
pub const DEFAULT_CACHE_DIR: &str = "data";
pub const POOL_CACHE_FILE: &str = "pool_data.json";

// Raydium HTTP APIs
pub const RAYDIUM_API_URL: &str = "https://api-v3.raydium.io";
pub const RAYDIUM_TRADE_API_URL: &str = "https://transaction-v1.raydium.io";

// RPC Configuration
pub const DEFAULT_RPC_TIMEOUT: u64 = 30;
pub const MAX_MULTIPLE_ACCOUNTS: usize = 100;

// Transaction Configuration
pub const DEFAULT_SLIPPAGE_BPS: u16 = 500; // 5%
pub const MAX_SLIPPAGE_BPS: u16 = 10_000; // 100%
pub const BPS_DENOMINATOR: f64 = 10_000.0;
pub const DEFAULT_PRIORITY_FEE_MICRO_LAMPORTS: u64 = 0;
