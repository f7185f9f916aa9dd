use clap::{Args, Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;

use crate::utils::parse_token_identifier;

pub mod commands;
pub mod display;

#[derive(Parser, Debug)]
#[command(name = "raydium-swap")]
#[command(about = "Buy and sell tokens against SOL on Raydium with cached routing", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Buy a token with SOL
    Buy(TradeArgs),

    /// Sell a token for SOL (amount in raw token units)
    Sell(TradeArgs),

    /// Buy a token with SOL, then sell the whole balance back
    RoundTrip(TradeArgs),

    /// Check whether a token can be bought and sold against SOL
    Tradable(TradableArgs),

    /// Show, refresh or clear the cached pool list
    Pools(PoolsArgs),
}

#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Token mint address (or a known symbol such as USDC)
    #[arg(value_parser = parse_mint)]
    pub mint: Pubkey,

    /// Amount: SOL for buy and round-trip, raw token units for sell
    pub amount: String,

    /// Slippage tolerance in basis points (default: DEFAULT_SLIPPAGE_BPS or 500 = 5%)
    #[arg(short, long)]
    pub slippage: Option<u16>,

    /// Compute-unit price in micro-lamports
    #[arg(long)]
    pub priority_fee: Option<u64>,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct TradableArgs {
    /// Token mint address
    #[arg(value_parser = parse_mint)]
    pub mint: Pubkey,
}

#[derive(Args, Debug)]
pub struct PoolsArgs {
    /// Fetch the pool list again and overwrite the cache file
    #[arg(long)]
    pub refresh: bool,

    /// Delete the cache file
    #[arg(long, conflicts_with = "refresh")]
    pub clear: bool,
}

fn parse_mint(s: &str) -> Result<Pubkey, String> {
    parse_token_identifier(s).ok_or_else(|| format!("Invalid mint: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WSOL;

    #[test]
    fn test_parse_buy_command() {
        let cli = Cli::try_parse_from([
            "raydium-swap",
            "buy",
            "So11111111111111111111111111111111111111112",
            "0.5",
            "--slippage",
            "300",
            "--yes",
        ])
        .unwrap();

        match cli.command {
            Commands::Buy(args) => {
                assert_eq!(args.mint, *WSOL);
                assert_eq!(args.amount, "0.5");
                assert_eq!(args.slippage, Some(300));
                assert!(args.yes);
                assert!(args.priority_fee.is_none());
            }
            _ => panic!("expected buy"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_mint() {
        assert!(Cli::try_parse_from(["raydium-swap", "tradable", "not-a-mint"]).is_err());
        assert!(Cli::try_parse_from(["raydium-swap", "pools", "--refresh", "--clear"]).is_err());
    }

    #[test]
    fn test_help_needs_no_configuration() {
        let err = Cli::try_parse_from(["raydium-swap", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        let err = Cli::try_parse_from(["raydium-swap", "buy", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
