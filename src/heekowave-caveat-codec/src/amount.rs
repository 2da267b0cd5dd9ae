//! Spend-limit amounts: decimal user input to token base units and back.

use std::str::FromStr;
use std::sync::OnceLock;

use alloy_primitives::U256;
use regex::Regex;

use crate::errors::{CodecError, Result};

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)(?:\.([0-9]+))?$").expect("static regex"))
}

fn invalid(input: &str, reason: &'static str) -> CodecError {
    CodecError::InvalidAmount { input: input.to_string(), reason }
}

fn pow10(decimals: u8) -> Option<U256> {
    let ten = U256::from(10u64);
    (0..decimals).try_fold(U256::from(1u64), |acc, _| acc.checked_mul(ten))
}

/// Scale a decimal amount string (eg `"100.5"`) to base units with `decimals` places.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(CodecError::NegativeAmount(trimmed.to_string()));
    }

    let caps = decimal_pattern()
        .captures(trimmed)
        .ok_or_else(|| invalid(input, "expected a decimal number"))?;
    let whole = &caps[1];
    let fraction = caps.get(2).map_or("", |m| m.as_str());
    if fraction.len() > decimals as usize {
        return Err(invalid(input, "too many decimal places"));
    }

    let scale = pow10(decimals).ok_or_else(|| invalid(input, "unsupported token decimals"))?;
    let whole = U256::from_str_radix(whole, 10).map_err(|_| invalid(input, "exceeds 256 bits"))?;

    let mut padded = fraction.to_string();
    padded.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).map_err(|_| invalid(input, "exceeds 256 bits"))?
    };

    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(|| invalid(input, "exceeds 256 bits"))
}

/// Render base units as a decimal string, dropping trailing fractional zeros.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let Some(scale) = pow10(decimals) else {
        return amount.to_string();
    };
    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Conversion into a caveat max amount.
///
/// Lets the encoders take unsigned and signed integers alike. Negative values
/// fail with [`CodecError::NegativeAmount`].
pub trait IntoMaxAmount {
    fn into_max_amount(self) -> Result<U256>;
}

impl IntoMaxAmount for U256 {
    fn into_max_amount(self) -> Result<U256> {
        Ok(self)
    }
}

impl IntoMaxAmount for &U256 {
    fn into_max_amount(self) -> Result<U256> {
        Ok(*self)
    }
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl IntoMaxAmount for $t {
            fn into_max_amount(self) -> Result<U256> {
                Ok(U256::from(self))
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl IntoMaxAmount for $t {
            fn into_max_amount(self) -> Result<U256> {
                if self < 0 {
                    return Err(CodecError::NegativeAmount(self.to_string()));
                }
                Ok(U256::from(self as u128))
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_signed!(i8, i16, i32, i64, i128, isize);

/// Integer string in base units: decimal, or `0x` hex.
impl IntoMaxAmount for &str {
    fn into_max_amount(self) -> Result<U256> {
        let trimmed = self.trim();
        if trimmed.starts_with('-') {
            return Err(CodecError::NegativeAmount(trimmed.to_string()));
        }
        U256::from_str(trimmed).map_err(|_| invalid(self, "not an unsigned 256-bit integer"))
    }
}

impl IntoMaxAmount for &String {
    fn into_max_amount(self) -> Result<U256> {
        self.as_str().into_max_amount()
    }
}
