use solana_client::client_error::ClientError;
use solana_sdk::pubkey::{ParsePubkeyError, Pubkey};
use thiserror::Error;

pub type SwapResult<T> = Result<T, SwapError>;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("No pool data available: fetched pool lists are empty")]
    NoPoolData,

    #[error("No route between {input} and {output}")]
    NoRoute { input: Pubkey, output: Pubkey },

    #[error("Missing mint info for {0}")]
    MissingMintInfo(Pubkey),

    #[error("No swap route found: {0}")]
    NoSwapRoute(String),

    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid slippage: {0}")]
    InvalidSlippage(String),

    #[error("RPC error: {0}")]
    RpcError(#[from] ClientError),

    #[error("Raydium API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParsePubkeyError),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SwapError {
    fn from(err: reqwest::Error) -> Self {
        SwapError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for SwapError {
    fn from(err: bincode::Error) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<base64::DecodeError> for SwapError {
    fn from(err: base64::DecodeError) -> Self {
        SwapError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        SwapError::Other(err.to_string())
    }
}
