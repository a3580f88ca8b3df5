use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::StorefrontResult;

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn set_color(enabled: bool) {
    let mut color = COLOR.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *color = enabled;
}

fn color_enabled() -> bool {
    *COLOR.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if color_enabled() {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Parses a non-negative decimal price such as `275.00`.
pub fn parse_price(value: &str) -> Result<Decimal, String> {
    let price: Decimal = value
        .trim()
        .parse()
        .map_err(|e| format!("`{value}` is not a valid price: {e}"))?;

    if price.is_sign_negative() {
        return Err(format!("`{value}` is negative"));
    }

    Ok(price)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> StorefrontResult<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}

pub fn format_price(price: Decimal) -> String {
    format!("${:.2}", price)
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
