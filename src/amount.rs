//! Amount Normalization
//!
//! Converts between the ledger's integer base units and the canonical
//! display-unit decimal strings used throughout the client. All base-unit
//! arithmetic is integer arithmetic; floats only ever appear at the display
//! boundary.

use thiserror::Error;

/// Minimum number of fractional digits in a canonical decimal string.
/// More digits are kept when needed so a nonzero amount never renders as zero.
pub const MIN_FRACTION_DIGITS: usize = 4;

/// An amount together with the caller's declared source encoding.
///
/// The ledger reports base-unit integers, forms produce decimal strings, and
/// some presentation paths hand over native floats. The same numeric value is
/// plausible in more than one encoding, so the kind is always declared by the
/// caller and never inferred from magnitude.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountSource {
    /// Integer amount in the ledger's smallest denomination.
    BaseUnits(u128),
    /// Decimal string already in display units.
    DecimalStr(String),
    /// Native float in display units.
    Display(f64),
}

/// Errors from amount parsing and conversion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    /// Input is not a finite non-negative amount, or does not fit the
    /// ledger's integer range
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Render any declared amount source as a canonical decimal string in
/// display units.
pub fn to_canonical(source: &AmountSource, decimals: u32) -> Result<String, AmountError> {
    match source {
        AmountSource::BaseUnits(base) => render_base_units(*base, decimals),
        AmountSource::DecimalStr(value) => {
            let base = to_base_units(value, decimals)?;
            render_base_units(base, decimals)
        }
        AmountSource::Display(value) => {
            if !value.is_finite() || *value < 0.0 {
                return Err(AmountError::InvalidAmount(format!(
                    "not a finite non-negative number: {}",
                    value
                )));
            }
            // 12 fractional digits cover anything a display path produces
            // without dragging binary float noise into the base units.
            let rendered = format!("{:.12}", value);
            let mut base = to_base_units(&rendered, decimals)?;
            if base == 0 && *value > 0.0 {
                // Nonzero values below 10^-12 re-render at full precision:
                // anything worth at least one base unit must not truncate
                // to zero. Two guard digits keep the final digit truncated
                // rather than rounded.
                let full = format!("{:.prec$}", value, prec = decimals as usize + 2);
                base = to_base_units(&full, decimals)?;
            }
            render_base_units(base, decimals)
        }
    }
}

/// Parse a plain decimal string in display units into base units.
///
/// Excess fractional digits are truncated, never rounded: over-reporting a
/// transfer value is unacceptable.
pub fn to_base_units(value: &str, decimals: u32) -> Result<u128, AmountError> {
    let scale = scale(decimals)?;
    let trimmed = value.trim();

    let invalid =
        || AmountError::InvalidAmount(format!("not a non-negative decimal: {:?}", trimmed));
    let out_of_range = || AmountError::InvalidAmount(format!("amount out of range: {}", trimmed));

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let (whole_part, frac_part) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    // Digits only: rejects signs, exponents, and a second decimal point.
    if whole_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !whole_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u128 = if whole_part.is_empty() {
        0
    } else {
        whole_part.parse().map_err(|_| out_of_range())?
    };

    let kept = &frac_part[..frac_part.len().min(decimals as usize)];
    let frac: u128 = if kept.is_empty() {
        0
    } else {
        kept.parse().map_err(|_| out_of_range())?
    };
    let frac_scale = 10u128.pow(decimals - kept.len() as u32);

    whole
        .checked_mul(scale)
        .and_then(|scaled| frac.checked_mul(frac_scale).and_then(|f| scaled.checked_add(f)))
        .ok_or_else(out_of_range)
}

/// Parse a ledger-reported base-unit amount, which arrives as a decimal
/// digit string because it does not fit a JSON number.
pub fn base_units_from_str(value: &str) -> Result<u128, AmountError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidAmount(format!(
            "not a base-unit integer: {:?}",
            trimmed
        )));
    }
    trimmed
        .parse()
        .map_err(|_| AmountError::InvalidAmount(format!("base-unit amount out of range: {}", trimmed)))
}

fn scale(decimals: u32) -> Result<u128, AmountError> {
    10u128
        .checked_pow(decimals)
        .ok_or_else(|| AmountError::InvalidAmount(format!("unsupported precision: {} decimals", decimals)))
}

fn render_base_units(base: u128, decimals: u32) -> Result<String, AmountError> {
    let scale = scale(decimals)?;
    let whole = base / scale;
    let frac = base % scale;

    let mut frac_str = if decimals == 0 {
        String::new()
    } else {
        format!("{:0width$}", frac, width = decimals as usize)
    };

    // Fixed precision of MIN_FRACTION_DIGITS; trailing zeros beyond that are
    // dropped, but significant digits are never cut off.
    while frac_str.len() > MIN_FRACTION_DIGITS && frac_str.ends_with('0') {
        frac_str.pop();
    }
    while frac_str.len() < MIN_FRACTION_DIGITS {
        frac_str.push('0');
    }

    Ok(format!("{}.{}", whole, frac_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_units_to_canonical() {
        let canonical =
            to_canonical(&AmountSource::BaseUnits(2_500_000_000_000_000_000), 18).unwrap();
        assert_eq!(canonical, "2.5000");
    }

    #[test]
    fn test_decimal_string_to_base_units() {
        assert_eq!(to_base_units("2.5", 18).unwrap(), 2_500_000_000_000_000_000);
        assert_eq!(to_base_units("0.001", 18).unwrap(), 1_000_000_000_000_000);
        assert_eq!(to_base_units("0", 18).unwrap(), 0);
        assert_eq!(to_base_units(".5", 2).unwrap(), 50);
        assert_eq!(to_base_units("7.", 2).unwrap(), 700);
    }

    #[test]
    fn test_excess_fraction_truncates() {
        // Truncation, not rounding.
        assert_eq!(to_base_units("1.23456789", 4).unwrap(), 12_345);
        assert_eq!(to_base_units("0.9999", 2).unwrap(), 99);
    }

    #[test]
    fn test_sub_precision_nonzero_is_not_rendered_as_zero() {
        // One base unit at 18 decimals is far below the 4-digit minimum
        // precision; it must still render as a nonzero string.
        let canonical = to_canonical(&AmountSource::BaseUnits(1), 18).unwrap();
        assert_eq!(canonical, "0.000000000000000001");
        assert_ne!(to_base_units(&canonical, 18).unwrap(), 0);
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let samples: [u128; 7] = [
            0,
            1,
            999,
            1_000_000_000_000_000,
            2_500_000_000_000_000_000,
            u64::MAX as u128,
            123_456_789_012_345_678_901_234_567,
        ];
        for &base in &samples {
            let canonical = to_canonical(&AmountSource::BaseUnits(base), 18).unwrap();
            assert_eq!(to_base_units(&canonical, 18).unwrap(), base, "base={}", base);
        }
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(to_canonical(&AmountSource::BaseUnits(42), 0).unwrap(), "42.0000");
        assert_eq!(to_base_units("42.0000", 0).unwrap(), 42);
        // Fractional digits below one base unit are dropped.
        assert_eq!(to_base_units("42.9", 0).unwrap(), 42);
    }

    #[test]
    fn test_display_float_source() {
        let canonical = to_canonical(&AmountSource::Display(0.001), 18).unwrap();
        assert_eq!(to_base_units(&canonical, 18).unwrap(), 1_000_000_000_000_000);

        assert!(to_canonical(&AmountSource::Display(-1.0), 18).is_err());
        assert!(to_canonical(&AmountSource::Display(f64::NAN), 18).is_err());
        assert!(to_canonical(&AmountSource::Display(f64::INFINITY), 18).is_err());
    }

    #[test]
    fn test_tiny_display_float_keeps_its_base_units() {
        // Far below 12 fractional digits but still 1000 base units at 18
        // decimals; must not come back as zero.
        let canonical = to_canonical(&AmountSource::Display(1e-15), 18).unwrap();
        assert_eq!(to_base_units(&canonical, 18).unwrap(), 1_000);

        // One base unit exactly.
        let canonical = to_canonical(&AmountSource::Display(1e-18), 18).unwrap();
        assert_eq!(to_base_units(&canonical, 18).unwrap(), 1);

        // Below one base unit there is nothing to represent.
        let canonical = to_canonical(&AmountSource::Display(1e-30), 18).unwrap();
        assert_eq!(canonical, "0.0000");
    }

    #[test]
    fn test_decimal_string_source_is_canonicalized() {
        let canonical = to_canonical(&AmountSource::DecimalStr("2.5".to_string()), 18).unwrap();
        assert_eq!(canonical, "2.5000");
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["", " ", "-1", "+1", "1e5", "1.2.3", "abc", "1 000", "."] {
            assert!(to_base_units(input, 18).is_err(), "input={:?}", input);
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        // u128::MAX has 39 digits; one more order of magnitude overflows.
        let huge = format!("{}0", u128::MAX);
        assert!(to_base_units(&huge, 0).is_err());
        assert!(to_base_units("1", 39).is_err());
    }

    #[test]
    fn test_base_units_from_str() {
        assert_eq!(base_units_from_str("2500000000000000000").unwrap(), 2_500_000_000_000_000_000);
        assert!(base_units_from_str("-5").is_err());
        assert!(base_units_from_str("2.5").is_err());
        assert!(base_units_from_str("").is_err());
    }
}
