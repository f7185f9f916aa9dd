use crate::core::{constants::*, error::SwapResult, PriorityFee, SwapError};
use serde::{Deserialize, Serialize};
use solana_sdk::signature::Keypair;
use solana_sdk::signer::SeedDerivable;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings of the three caches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub pool_file: String,
    pub pool_list_ttl_secs: u64,
    pub route_ttl_secs: u64,
    /// Surface pool-list write failures instead of logging and continuing
    pub strict: bool,
}

impl CacheConfig {
    pub fn pool_file_path(&self) -> PathBuf {
        self.dir.join(&self.pool_file)
    }

    pub fn pool_list_ttl(&self) -> Duration {
        Duration::from_secs(self.pool_list_ttl_secs)
    }

    pub fn route_ttl(&self) -> Duration {
        Duration::from_secs(self.route_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
            pool_file: POOL_CACHE_FILE.to_string(),
            pool_list_ttl_secs: POOL_LIST_CACHE_TTL,
            route_ttl_secs: ROUTE_CACHE_TTL,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    pub helius_api_key: Option<String>,
    pub timeout_secs: u64,
    pub default_slippage_bps: u16,
    pub max_slippage_bps: u16,
    pub priority_fee_micro_lamports: u64,
    pub raydium_api_url: String,
    pub raydium_trade_api_url: String,
    pub cache: CacheConfig,
    #[serde(skip_serializing)]
    pub wallet_private_key: Option<String>,
}

impl Config {
    pub fn from_env() -> SwapResult<Self> {
        let rpc_url = env::var("RPC_URL")
            .or_else(|_| env::var("HELIUS_RPC_URL"))
            .unwrap_or_else(|_| {
                if let Ok(api_key) = env::var("HELIUS_API_KEY") {
                    format!("https://mainnet.helius-rpc.com/?api-key={}", api_key)
                } else {
                    "https://api.mainnet-beta.solana.com".to_string()
                }
            });

        let helius_api_key = env::var("HELIUS_API_KEY").ok();

        let cache = CacheConfig {
            dir: env::var("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR)),
            pool_file: env::var("POOL_CACHE_FILE").unwrap_or_else(|_| POOL_CACHE_FILE.to_string()),
            pool_list_ttl_secs: env::var("POOL_CACHE_TTL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(POOL_LIST_CACHE_TTL),
            route_ttl_secs: env::var("ROUTE_CACHE_TTL_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(ROUTE_CACHE_TTL),
            strict: parse_flag(&env::var("CACHE_STRICT").unwrap_or_default()),
        };

        Ok(Self {
            rpc_url,
            helius_api_key,
            timeout_secs: env::var("TIMEOUT_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_RPC_TIMEOUT),
            default_slippage_bps: env::var("DEFAULT_SLIPPAGE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_SLIPPAGE_BPS),
            max_slippage_bps: env::var("MAX_SLIPPAGE_BPS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(MAX_SLIPPAGE_BPS),
            priority_fee_micro_lamports: env::var("PRIORITY_FEE_MICRO_LAMPORTS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_PRIORITY_FEE_MICRO_LAMPORTS),
            raydium_api_url: env::var("RAYDIUM_API_URL")
                .unwrap_or_else(|_| RAYDIUM_API_URL.to_string()),
            raydium_trade_api_url: env::var("RAYDIUM_TRADE_API_URL")
                .unwrap_or_else(|_| RAYDIUM_TRADE_API_URL.to_string()),
            cache,
            wallet_private_key: env::var("WALLET_PRIVATE_KEY")
                .or_else(|_| env::var("PRIVATE_KEY"))
                .ok(),
        })
    }

    pub fn validate(&self) -> SwapResult<()> {
        if self.max_slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(SwapError::ConfigError(
                "Max slippage cannot exceed 100%".to_string(),
            ));
        }

        if self.default_slippage_bps > self.max_slippage_bps {
            return Err(SwapError::ConfigError(
                "Default slippage cannot exceed max slippage".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(SwapError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.cache.pool_list_ttl_secs == 0 || self.cache.route_ttl_secs == 0 {
            return Err(SwapError::ConfigError(
                "Cache TTLs must be greater than 0".to_string(),
            ));
        }

        if self.cache.pool_file.is_empty() {
            return Err(SwapError::ConfigError(
                "Pool cache file name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Priority fee applied when the caller does not pass one
    pub fn default_priority_fee(&self) -> PriorityFee {
        PriorityFee {
            unit_price_micro_lamports: self.priority_fee_micro_lamports,
        }
    }

    /// Load the signing wallet. A swap client cannot be built without one.
    pub fn load_keypair(&self) -> SwapResult<Keypair> {
        let private_key = self.wallet_private_key.as_deref().ok_or_else(|| {
            SwapError::ConfigError(
                "Wallet is not configured: set WALLET_PRIVATE_KEY or PRIVATE_KEY".to_string(),
            )
        })?;
        parse_keypair(private_key)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            helius_api_key: None,
            timeout_secs: DEFAULT_RPC_TIMEOUT,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            max_slippage_bps: MAX_SLIPPAGE_BPS,
            priority_fee_micro_lamports: DEFAULT_PRIORITY_FEE_MICRO_LAMPORTS,
            raydium_api_url: RAYDIUM_API_URL.to_string(),
            raydium_trade_api_url: RAYDIUM_TRADE_API_URL.to_string(),
            cache: CacheConfig::default(),
            wallet_private_key: None,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Parse a wallet secret given either as a JSON byte array or as base58.
pub fn parse_keypair(private_key: &str) -> SwapResult<Keypair> {
    let private_key = private_key.trim();
    let bytes = if private_key.starts_with('[') && private_key.ends_with(']') {
        serde_json::from_str::<Vec<u8>>(private_key)
            .map_err(|_| SwapError::ConfigError("Invalid private key format".to_string()))?
    } else {
        bs58::decode(private_key)
            .into_vec()
            .map_err(|_| SwapError::ConfigError("Invalid base58 private key format".to_string()))?
    };

    match bytes.len() {
        32 => Keypair::from_seed(&bytes)
            .map_err(|e| SwapError::ConfigError(format!("Invalid seed: {}", e))),
        64 => Keypair::from_bytes(&bytes)
            .map_err(|e| SwapError::ConfigError(format!("Invalid private key: {}", e))),
        n => Err(SwapError::ConfigError(format!(
            "Private key must be 32 (seed) or 64 (keypair) bytes, got {}",
            n
        ))),
    }
}
