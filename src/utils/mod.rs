use crate::core::{constants::*, SwapError, SwapResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Parse token symbol or address to Pubkey
pub fn parse_token_identifier(input: &str) -> Option<Pubkey> {
    // First try to parse as Pubkey
    if let Ok(pubkey) = Pubkey::from_str(input) {
        return Some(pubkey);
    }

    // Common token mappings
    let address = match input.to_uppercase().as_str() {
        "SOL" | "WSOL" => WSOL_MINT,
        "USDC" => USDC_MINT,
        "USDT" => USDT_MINT,
        _ => return None,
    };
    Pubkey::from_str(address).ok()
}

/// Format large numbers with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for ch in s.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Convert a decimal UI amount (e.g. "0.25" SOL) to raw units
pub fn parse_ui_amount(input: &str, decimals: u32) -> SwapResult<u64> {
    let value = Decimal::from_str(input.trim())
        .map_err(|_| SwapError::InvalidAmount(format!("not a number: {}", input)))?;
    if value.is_sign_negative() {
        return Err(SwapError::InvalidAmount(format!("negative amount: {}", input)));
    }

    let scaled = value
        .checked_mul(Decimal::from(10u64.pow(decimals)))
        .ok_or_else(|| SwapError::InvalidAmount(format!("amount too large: {}", input)))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(SwapError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            input, decimals
        )));
    }

    scaled
        .to_u64()
        .ok_or_else(|| SwapError::InvalidAmount(format!("amount too large: {}", input)))
}

/// Raw units as a decimal string with trailing zeros trimmed
pub fn format_ui_amount(amount: u64, decimals: u32) -> String {
    Decimal::from_i128_with_scale(amount as i128, decimals)
        .normalize()
        .to_string()
}
