use crate::core::{PoolKind, PoolListSnapshot, SwapSide, TransactionResult};
use crate::utils::{format_number, format_ui_amount};
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use solana_sdk::pubkey::Pubkey;

/// Terminal output helpers
pub struct TradeDisplay;

impl TradeDisplay {
    /// Create a spinner for long-running operations
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    pub fn display_trade_confirmation(
        label: &str,
        mint: &Pubkey,
        amount: u64,
        side: SwapSide,
        slippage_bps: u16,
        wallet: &Pubkey,
    ) {
        println!("\n{}", style(format!("💱 {} Confirmation", label)).bold().underlined());
        match side {
            SwapSide::Buy => println!(
                "Spend: {} SOL → {}",
                format_ui_amount(amount, 9).bold(),
                style(mint).bold()
            ),
            SwapSide::Sell => println!(
                "Sell: {} raw units of {} → SOL",
                format_number(amount).bold(),
                style(mint).bold()
            ),
        }
        println!("Slippage: {}", format!("{:.2}%", slippage_bps as f64 / 100.0).yellow());
        println!("Wallet: {}", style(wallet).dim());
    }

    pub fn display_transaction_result(label: &str, result: &TransactionResult) {
        if result.success {
            println!("\n{}", style(format!("✅ {} Successful!", label)).bold().green());
        } else {
            println!("\n{}", style(format!("⚠️  {} finished with errors", label)).bold().yellow());
        }
        println!("Signature: {}", style(&result.signature).dim());
        println!(
            "\n{}",
            style(format!(
                "View on Explorer: https://explorer.solana.com/tx/{}",
                result.signature
            ))
            .dim()
        );
    }

    pub fn display_pool_summary(snapshot: &PoolListSnapshot, age_secs: Option<i64>) {
        println!("\n{}", style("📊 Cached Raydium Pools").bold().underlined());
        for kind in [PoolKind::Amm, PoolKind::Clmm, PoolKind::Cpmm] {
            let label = format!("{:<4}", kind.to_string());
            let label = match kind {
                PoolKind::Amm => label.blue(),
                PoolKind::Clmm => label.yellow(),
                PoolKind::Cpmm => label.green(),
            };
            println!("{}  {}", label.bold(), format_number(snapshot.pools(kind).len() as u64));
        }
        println!("Total {}", format_number(snapshot.len() as u64).bold());
        if let Some(age) = age_secs {
            println!("Age: {}", style(format_age(age)).dim());
        }
    }
}

fn format_age(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(5), "5s");
        assert_eq!(format_age(125), "2m 5s");
        assert_eq!(format_age(7260), "2h 1m");
        assert_eq!(format_age(-3), "0s");
    }
}
