//! Assembly of one [`ProductRecord`] from a rendered product page.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use yarche_core::{AppConfig, ProductField, ProductRecord};

use crate::error::ScraperError;
use crate::html::{state_at, ProductPage, PRODUCT_DATA_POINTER};
use crate::normalize::{normalize_number, normalize_text};
use crate::types::{PropertyValue, QuantUnit, RawProductPayload};
use crate::units::{convert_weight_or_volume, Dimension};

const SERVER_IP: &str = "127.0.0.1";
const PROMODATA: &str = "promodata";
const PRICE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Products that are listed in a category but open without any category.
const UNCATEGORIZED_LINKS: [&str; 2] = [
    "/product/mayonezniy-sous-12292",
    "/product/igrushka-myalka-antistress-26247",
];
const UNCATEGORIZED_NOTE: &str = "Продукт расположен в категории, но при переходе на продукт \
                                  оказывается, что он не находится ни в какой категории";

/// Property names mirrored into dedicated columns.
const MIRRORED_PROPERTIES: [(&str, ProductField); 7] = [
    ("brand", ProductField::SkuBrand),
    ("country_of_manufacture", ProductField::SkuCountry),
    ("manufacturer", ProductField::SkuManufacturer),
    ("weight_unit", ProductField::SkuWeightMin),
    ("volume_unit", ProductField::SkuVolumeMin),
    ("quantity_in_package", ProductField::SkuQuantityMin),
    ("at_pack", ProductField::SkuPackage),
];

/// Per-product inputs that do not come from the page itself.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub config: &'a AppConfig,
    /// Store address the page was rendered for.
    pub tt_id: &'a str,
    /// Site-relative product link, e.g. `/product/moloko-10`.
    pub link: &'a str,
    pub scraped_at: NaiveDateTime,
}

/// Builds the export record for one product page.
///
/// # Errors
///
/// Any failure is returned as [`ScraperError::Product`] naming the link.
pub fn assemble_record(
    page: &ProductPage,
    ctx: &RecordContext<'_>,
) -> Result<ProductRecord, ScraperError> {
    build_record(page, ctx).map_err(|source| ScraperError::Product {
        link: ctx.link.to_string(),
        source: Box::new(source),
    })
}

fn build_record(page: &ProductPage, ctx: &RecordContext<'_>) -> Result<ProductRecord, ScraperError> {
    let mut record = ProductRecord::new();
    fill_common(&mut record, ctx);

    if ctx.config.sku_images_enabled {
        record.set(ProductField::SkuImages, page.images()?.join("|"));
    }

    record.set(ProductField::SkuStatus, i64::from(page.is_in_stock()?));

    let state = page.initial_state()?;
    let data = state_at(&state, PRODUCT_DATA_POINTER)?;
    let payload = RawProductPayload::deserialize(data).map_err(ScraperError::ProductPayload)?;

    apply_payload(&mut record, &payload, ctx.config.sku_parameters_enabled)?;
    Ok(record)
}

fn fill_common(record: &mut ProductRecord, ctx: &RecordContext<'_>) {
    let config = ctx.config;
    record.set(ProductField::ParserId, config.parser_id.as_str());
    record.set(ProductField::ChainId, config.chain_id.as_str());
    record.set(ProductField::TtRegion, config.tt_region.name);
    record.set(ProductField::ServerIp, SERVER_IP);
    record.set(ProductField::Promodata, PROMODATA);
    record.set(ProductField::SkuLink, format!("{}{}", config.base_url, ctx.link));
    record.set(ProductField::TtId, ctx.tt_id);
    record.set(
        ProductField::TtName,
        normalize_text(&format!("{} ({})", config.chain_name, ctx.tt_id)),
    );
    record.set(
        ProductField::PriceDatetime,
        ctx.scraped_at.format(PRICE_DATETIME_FORMAT).to_string(),
    );

    let dev_info = if UNCATEGORIZED_LINKS.contains(&ctx.link) {
        UNCATEGORIZED_NOTE
    } else {
        ""
    };
    record.set(ProductField::DevInfo, dev_info);
}

/// Writes the payload-derived columns: prices, naming, parameters, units,
/// and the packaging code.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidNumber`] for an unparseable price and
/// [`ScraperError::UnitConversion`] for a malformed weight or volume.
pub fn apply_payload(
    record: &mut ProductRecord,
    payload: &RawProductPayload,
    mirror_parameters: bool,
) -> Result<(), ScraperError> {
    record.set(ProductField::SourceSkuCode, payload.id.as_str());
    record.set(ProductField::SkuName, normalize_text(&payload.name));

    let price = price_of(&payload.price)?;
    match payload.previous_price.as_ref().map(price_of).transpose()? {
        Some(previous) if !previous.is_zero() && previous > price => {
            record.set(ProductField::Price, previous);
            record.set(ProductField::PricePromo, price);
        }
        _ => record.set(ProductField::Price, price),
    }

    if !payload.categories.is_empty() {
        let breadcrumb = payload
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>()
            .join("|");
        record.set(ProductField::SkuCategory, normalize_text(&breadcrumb));
    }

    let mut parameters = Map::new();
    for value in &payload.property_values {
        let property = value.property();
        let cleaned = normalize_text(&value.raw_value());
        if mirror_parameters {
            mirror_property(record, value, &cleaned);
        }
        parameters.insert(property.title.clone(), Value::String(cleaned));
    }
    record.set(ProductField::SkuParametersJson, parameters);

    for dimension in [Dimension::Weight, Dimension::Volume] {
        apply_measure(record, dimension)?;
    }

    let packed: i64 = match payload.quant.unit {
        QuantUnit::Kilogram => 0,
        QuantUnit::Piece
            if record.has_value(ProductField::SkuWeightMin)
                || record.has_value(ProductField::SkuVolumeMin) =>
        {
            1
        }
        QuantUnit::Piece | QuantUnit::Pack => 2,
    };
    record.set(ProductField::SkuPacked, packed);

    Ok(())
}

fn mirror_property(record: &mut ProductRecord, value: &PropertyValue, cleaned: &str) {
    let name = value.property().name.as_str();
    if let Some(&(_, field)) = MIRRORED_PROPERTIES.iter().find(|(mirrored, _)| *mirrored == name) {
        record.set(field, cleaned);
    }
}

/// Replaces the raw mirrored unit text in the `_min` column with its
/// converted value, filling `_max` for ranges.
fn apply_measure(record: &mut ProductRecord, dimension: Dimension) -> Result<(), ScraperError> {
    let raw = record.text(dimension.min_field()).unwrap_or_default().to_string();
    if let Some(measure) = convert_weight_or_volume(&raw, dimension)? {
        record.set(dimension.min_field(), measure.min);
        if let Some(max) = measure.max {
            record.set(dimension.max_field(), max);
        }
    }
    Ok(())
}

fn price_of(number: &Number) -> Result<Decimal, ScraperError> {
    let raw = number.to_string();
    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ScraperError::InvalidNumber { value: raw.clone() })?;
    normalize_number(&parsed.to_string())
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
