// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Reading coercion and display precision.
//!
//! Form state arrives as strings; every raw field follows one coercion
//! policy: the longest leading decimal prefix parses, anything else is 0.
//! Decimal precision is a per-field configuration constant applied at the
//! display surface, with rounding half-away-from-zero.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// A raw field value as the host sends it: number, string, or blank.
///
/// Report payloads mix the three freely (a pre-seeded form serializes
/// numbers, a live form serializes strings), so hydration accepts all of
/// them and [`Reading::value`] applies the single coercion policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
    Blank,
}

impl Default for Reading {
    fn default() -> Self {
        Reading::Blank
    }
}

impl Reading {
    /// Coerced numeric value of the reading.
    pub fn value(&self) -> f64 {
        match self {
            Reading::Number(n) if n.is_finite() => *n,
            Reading::Number(_) => 0.0,
            Reading::Text(s) => coerce(s),
            Reading::Blank => 0.0,
        }
    }

    /// True when the field was never filled in.
    pub fn is_blank(&self) -> bool {
        match self {
            Reading::Blank => true,
            Reading::Text(s) => s.trim().is_empty(),
            Reading::Number(_) => false,
        }
    }
}

/// Coerce a form-field string to a number.
///
/// Parses the longest leading decimal prefix (sign, digits, fraction,
/// exponent); blank, unparseable, or non-finite input coerces to 0.
#[wasm_bindgen]
pub fn coerce(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_len = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let dot = end;
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if int_len == 0 && end - dot == 1 {
            return 0.0; // bare sign/dot
        }
    } else if int_len == 0 {
        return 0.0;
    }

    // Optional exponent, only kept if complete
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Round to a fixed number of decimals, half-away-from-zero.
#[wasm_bindgen]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a derived value for a report cell.
///
/// `None` (and any non-finite residue) renders as the empty string; the
/// numeric display surface never shows `NaN`, `inf`, or a placeholder zero.
#[wasm_bindgen]
pub fn format_fixed(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals as usize, v),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_plain_numbers() {
        assert_eq!(coerce("150"), 150.0);
        assert_eq!(coerce("  8.345"), 8.345);
        assert_eq!(coerce("-3.2"), -3.2);
        assert_eq!(coerce("2.5e2"), 250.0);
    }

    #[test]
    fn test_coerce_numeric_prefix() {
        // Form inputs sometimes carry trailing units
        assert_eq!(coerce("150mm"), 150.0);
        assert_eq!(coerce("8.5 kg"), 8.5);
        assert_eq!(coerce("2.5e"), 2.5);
    }

    #[test]
    fn test_coerce_junk_is_zero() {
        assert_eq!(coerce(""), 0.0);
        assert_eq!(coerce("   "), 0.0);
        assert_eq!(coerce("abc"), 0.0);
        assert_eq!(coerce("-"), 0.0);
        assert_eq!(coerce("."), 0.0);
    }

    #[test]
    fn test_reading_value_and_blank() {
        assert_eq!(Reading::Number(2.4).value(), 2.4);
        assert_eq!(Reading::Text("2.4".into()).value(), 2.4);
        assert_eq!(Reading::Blank.value(), 0.0);
        assert_eq!(Reading::Number(f64::NAN).value(), 0.0);
        assert!(Reading::Blank.is_blank());
        assert!(Reading::Text("  ".into()).is_blank());
        assert!(!Reading::Number(0.0).is_blank());
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(8.695, 2), 8.7);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(2518.518, 1), 2518.5);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(Some(8.6956), 2), "8.70");
        assert_eq!(format_fixed(Some(1.96), 3), "1.960");
        assert_eq!(format_fixed(Some(0.003375), 6), "0.003375");
        assert_eq!(format_fixed(None, 2), "");
        assert_eq!(format_fixed(Some(f64::NAN), 2), "");
    }
}
