//! Text and number cleanup applied to every value before it reaches the CSV.
//!
//! The export is `;`-delimited and consumed by tools that expect "natural"
//! decimals, so text loses markup artifacts and semicolons, and numbers lose
//! trailing-zero noise.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ScraperError;

/// Substrings removed from scraped text.
const TEXT_DENYLIST: [&str; 12] = [
    "&nbsp", "\n", "\r", "\t", "\u{c2}", "\u{a0}", "\\", "\"", "”", "“", "«", "»",
];

/// Cleans a scraped string for the CSV export.
///
/// Removes [`TEXT_DENYLIST`] artifacts, collapses runs of spaces, replaces
/// `;` with `,`, and trims. Removal repeats until stable so that deleting one
/// artifact cannot splice together another.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let before = text.len();
        for artifact in TEXT_DENYLIST {
            if text.contains(artifact) {
                text = text.replace(artifact, "");
            }
        }
        if text.len() == before {
            break;
        }
    }

    while text.contains("  ") {
        text = text.replace("  ", " ");
    }

    text.replace(';', ",").trim().to_string()
}

/// Normalizes a numeric string into its canonical decimal form.
///
/// - `,` is accepted as the decimal separator.
/// - No fraction, or an all-zero fraction, yields an integer (scale 0).
/// - A fraction below 100 (as an integer) only loses trailing zeros:
///   `"12,50"` → `12.5`, `"12.05"` → `12.05`.
/// - A fraction of 100 or more loses trailing zeros and is then rounded to
///   two places if more than two digits remain: `"12,0700"` → `12.07`,
///   `"1.23456"` → `1.23`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidNumber`] when `raw` is not a plain decimal.
pub fn normalize_number(raw: &str) -> Result<Decimal, ScraperError> {
    let invalid = || ScraperError::InvalidNumber {
        value: raw.to_string(),
    };

    let value = raw.trim().replace(',', ".");
    let (whole, fraction) = value.split_once('.').unwrap_or((value.as_str(), ""));

    if !is_integer_literal(whole) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let significant = fraction.trim_end_matches('0');
    if significant.is_empty() {
        return Decimal::from_str(whole).map_err(|_| invalid());
    }

    let parsed = Decimal::from_str(&format!("{whole}.{significant}")).map_err(|_| invalid())?;

    // Fraction value >= 100 means at least three digits once leading zeros go.
    let fraction_at_least_100 = fraction.trim_start_matches('0').len() >= 3;
    if fraction_at_least_100 && significant.len() > 2 {
        return Ok(parsed.round_dp(2).normalize());
    }

    Ok(parsed)
}

/// Applies [`normalize_number`] to an already-parsed decimal.
///
/// # Errors
///
/// Propagates [`ScraperError::InvalidNumber`]; unreachable for finite decimals
/// but kept so callers treat both entry points alike.
pub fn normalize_decimal(value: Decimal) -> Result<Decimal, ScraperError> {
    normalize_number(&value.to_string())
}

/// An optional `-` followed by at least one ASCII digit.
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
