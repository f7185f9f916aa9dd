use crate::cache::CacheSet;
use crate::cli::{display::TradeDisplay, TradeArgs};
use crate::core::{Config, PriorityFee, SwapError, SwapResult, SwapSide, WSOL};
use crate::trader::RaydiumTrader;
use crate::utils::parse_ui_amount;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::info;
use solana_sdk::signer::Signer;
use std::sync::Arc;

/// Which trader operation a trade command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
    RoundTrip,
}

impl TradeKind {
    fn label(&self) -> &'static str {
        match self {
            TradeKind::Buy => "Buy",
            TradeKind::Sell => "Sell",
            TradeKind::RoundTrip => "Round Trip",
        }
    }

    /// Side whose input amount the user typed
    fn input_side(&self) -> SwapSide {
        match self {
            TradeKind::Sell => SwapSide::Sell,
            TradeKind::Buy | TradeKind::RoundTrip => SwapSide::Buy,
        }
    }
}

pub async fn execute(kind: TradeKind, args: TradeArgs, config: Config) -> SwapResult<()> {
    println!("{}", "🚀 Raydium Cached Swap".bold().cyan());

    if args.mint == *WSOL {
        println!("{}", "❌ Cannot trade SOL against itself".red().bold());
        return Ok(());
    }

    // SOL amounts come in UI units, token amounts are already raw
    let amount = match kind.input_side() {
        SwapSide::Buy => parse_ui_amount(&args.amount, 9)?,
        SwapSide::Sell => parse_ui_amount(&args.amount, 0)?,
    };
    let slippage_bps = args.slippage.unwrap_or(config.default_slippage_bps);
    if slippage_bps > config.max_slippage_bps {
        return Err(SwapError::InvalidSlippage(format!(
            "{} bps exceeds the configured maximum of {} bps",
            slippage_bps, config.max_slippage_bps
        )));
    }
    let priority_fee = args.priority_fee.map(|unit_price_micro_lamports| PriorityFee {
        unit_price_micro_lamports,
    });

    let wallet = config.load_keypair()?;
    let caches = Arc::new(CacheSet::new(&config.cache));
    let trader = RaydiumTrader::from_config(&config, caches)?;
    info!("Using wallet: {}", wallet.pubkey());

    TradeDisplay::display_trade_confirmation(
        kind.label(),
        &args.mint,
        amount,
        kind.input_side(),
        slippage_bps,
        &wallet.pubkey(),
    );

    let proceed = if args.yes {
        true
    } else {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Do you want to proceed with this swap?")
            .default(false)
            .interact()
            .map_err(|e| SwapError::Other(format!("Confirmation prompt failed: {}", e)))?
    };

    if !proceed {
        println!("{}", "❌ Swap cancelled".yellow());
        return Ok(());
    }

    let pb = TradeDisplay::create_progress_bar("Executing swap...");
    let result = match kind {
        TradeKind::Buy => {
            trader
                .buy(&wallet, &args.mint, amount, slippage_bps, priority_fee)
                .await
        }
        TradeKind::Sell => {
            trader
                .sell(&wallet, &args.mint, amount, slippage_bps, priority_fee)
                .await
        }
        TradeKind::RoundTrip => {
            trader
                .buy_and_sell(&wallet, &args.mint, amount, slippage_bps, priority_fee)
                .await
        }
    };
    pb.finish_and_clear();

    match result {
        Ok(result) => {
            TradeDisplay::display_transaction_result(kind.label(), &result);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "❌ Swap failed:".red().bold(), e);
            Err(e)
        }
    }
}
