//! Weight and volume conversion into grams and millilitres.

use std::str::FromStr;

use rust_decimal::Decimal;
use yarche_core::ProductField;

use crate::error::ScraperError;
use crate::normalize::normalize_decimal;

/// The physical dimension a raw unit string describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Scaled to grams.
    Weight,
    /// Scaled to millilitres.
    Volume,
}

impl Dimension {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Volume => "volume",
        }
    }

    #[must_use]
    pub fn min_field(self) -> ProductField {
        match self {
            Self::Weight => ProductField::SkuWeightMin,
            Self::Volume => ProductField::SkuVolumeMin,
        }
    }

    #[must_use]
    pub fn max_field(self) -> ProductField {
        match self {
            Self::Weight => ProductField::SkuWeightMax,
            Self::Volume => ProductField::SkuVolumeMax,
        }
    }
}

/// A converted measurement. `max` is only present for ranges like `"1-2 кг"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measure {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

/// Unit suffixes and their scale to the base unit. "кг" precedes "г" because
/// the latter is a substring of the former.
const UNIT_SCALES: [(&str, u32); 4] = [("кг", 1000), ("г", 1), ("мл", 1), ("л", 1000)];

/// Converts a raw storefront unit string such as `"0,5 кг"` or `"1-1.5 л"`.
///
/// Returns `Ok(None)` for an empty or whitespace-only string. The first
/// matching suffix in [`UNIT_SCALES`] decides the scale; a string without a
/// known suffix is taken as already being in the base unit. Each endpoint is
/// scaled and then normalized with [`normalize_decimal`].
///
/// # Errors
///
/// Returns [`ScraperError::UnitConversion`] when an endpoint is not a number
/// (including leftover text after the unit) or the range has more than two
/// endpoints.
pub fn convert_weight_or_volume(
    raw: &str,
    dimension: Dimension,
) -> Result<Option<Measure>, ScraperError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let failed = || ScraperError::UnitConversion {
        dimension: dimension.as_str(),
        value: raw.to_string(),
    };

    let value = raw.replace(',', ".");
    let (numeric, scale) = UNIT_SCALES
        .iter()
        .find(|(suffix, _)| value.contains(suffix))
        .map_or((value.clone(), 1), |&(suffix, scale)| {
            (value.replace(suffix, ""), scale)
        });

    let endpoints: Vec<&str> = numeric.split('-').map(str::trim).collect();
    let convert = |endpoint: &str| -> Result<Decimal, ScraperError> {
        let parsed = Decimal::from_str(endpoint).map_err(|_| failed())?;
        normalize_decimal(parsed * Decimal::from(scale)).map_err(|_| failed())
    };

    match endpoints.as_slice() {
        [single] => Ok(Some(Measure {
            min: convert(single)?,
            max: None,
        })),
        [low, high] => Ok(Some(Measure {
            min: convert(low)?,
            max: Some(convert(high)?),
        })),
        _ => Err(failed()),
    }
}
