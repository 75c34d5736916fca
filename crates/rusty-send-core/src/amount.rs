//! Display-unit <-> base-unit conversion.
//!
//! Amounts never pass through floating point: the user's decimal string is split on
//! the decimal point and scaled by `10^decimals` with checked integer arithmetic.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount: {0}")]
    Malformed(String),
    #[error("amount supports at most {max} decimal places")]
    TooManyDecimals { max: u32 },
    #[error("amount is too large")]
    Overflow,
    #[error("Amount must be greater than 0")]
    NotPositive,
}

pub fn parse_amount(raw: &str, decimals: u32) -> Result<u128, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::NotPositive);
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (unsigned, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Malformed(raw.to_owned()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AmountError::Malformed(raw.to_owned()));
    }

    let significant_fraction = fraction.trim_end_matches('0');
    if significant_fraction.len() > decimals as usize {
        return Err(AmountError::TooManyDecimals { max: decimals });
    }

    let scale = 10u128
        .checked_pow(decimals)
        .ok_or(AmountError::Overflow)?;
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| AmountError::Overflow)?
    };
    let fraction_units = if significant_fraction.is_empty() {
        0
    } else {
        let padded = format!("{significant_fraction:0<width$}", width = decimals as usize);
        padded.parse::<u128>().map_err(|_| AmountError::Overflow)?
    };

    let units = whole_units
        .checked_mul(scale)
        .and_then(|x| x.checked_add(fraction_units))
        .ok_or(AmountError::Overflow)?;
    if units == 0 {
        return Err(AmountError::NotPositive);
    }
    Ok(units)
}

pub fn format_base_units(units: u128, decimals: u32) -> String {
    if decimals == 0 {
        return units.to_string();
    }
    match 10u128.checked_pow(decimals) {
        Some(scale) => format!(
            "{}.{:0width$}",
            units / scale,
            units % scale,
            width = decimals as usize
        ),
        // More decimals than u128 can scale: everything is fractional.
        None => format!("0.{:0>width$}", units, width = decimals as usize),
    }
}
