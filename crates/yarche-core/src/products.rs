use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// One column of the product export. Declaration order is the CSV column
/// order, and the derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    ParserId,
    ChainId,
    TtId,
    TtRegion,
    TtName,
    PriceDatetime,
    Price,
    PricePromo,
    PriceCard,
    PriceCardPromo,
    PromoStartDate,
    PromoEndDate,
    PromoType,
    SkuStatus,
    InStock,
    SourceSkuCode,
    SkuArticle,
    SkuBarcode,
    SkuCategory,
    SkuName,
    SkuWeightMin,
    SkuWeightMax,
    SkuVolumeMin,
    SkuVolumeMax,
    SkuQuantityMin,
    SkuQuantityMax,
    SkuFatMin,
    SkuFatMax,
    SkuAlcoholMin,
    SkuAlcoholMax,
    SkuPacked,
    SkuPackage,
    SkuBrand,
    SkuCountry,
    SkuManufacturer,
    SkuParametersJson,
    SkuLink,
    AppLink,
    SkuImages,
    ServerIp,
    DevInfo,
    Promodata,
}

/// The fixed product export schema, in column order.
pub const PRODUCT_CSV_FIELDS: [ProductField; 42] = {
    use ProductField::*;
    [
        ParserId, ChainId, TtId, TtRegion, TtName, PriceDatetime, Price, PricePromo, PriceCard,
        PriceCardPromo, PromoStartDate, PromoEndDate, PromoType, SkuStatus, InStock,
        SourceSkuCode, SkuArticle, SkuBarcode, SkuCategory, SkuName, SkuWeightMin, SkuWeightMax,
        SkuVolumeMin, SkuVolumeMax, SkuQuantityMin, SkuQuantityMax, SkuFatMin, SkuFatMax,
        SkuAlcoholMin, SkuAlcoholMax, SkuPacked, SkuPackage, SkuBrand, SkuCountry,
        SkuManufacturer, SkuParametersJson, SkuLink, AppLink, SkuImages, ServerIp, DevInfo,
        Promodata,
    ]
};

impl ProductField {
    /// Column header as written to the CSV.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParserId => "parser_id",
            Self::ChainId => "chain_id",
            Self::TtId => "tt_id",
            Self::TtRegion => "tt_region",
            Self::TtName => "tt_name",
            Self::PriceDatetime => "price_datetime",
            Self::Price => "price",
            Self::PricePromo => "price_promo",
            Self::PriceCard => "price_card",
            Self::PriceCardPromo => "price_card_promo",
            Self::PromoStartDate => "promo_start_date",
            Self::PromoEndDate => "promo_end_date",
            Self::PromoType => "promo_type",
            Self::SkuStatus => "sku_status",
            Self::InStock => "in_stock",
            Self::SourceSkuCode => "source_sku_code",
            Self::SkuArticle => "sku_article",
            Self::SkuBarcode => "sku_barcode",
            Self::SkuCategory => "sku_category",
            Self::SkuName => "sku_name",
            Self::SkuWeightMin => "sku_weight_min",
            Self::SkuWeightMax => "sku_weight_max",
            Self::SkuVolumeMin => "sku_volume_min",
            Self::SkuVolumeMax => "sku_volume_max",
            Self::SkuQuantityMin => "sku_quantity_min",
            Self::SkuQuantityMax => "sku_quantity_max",
            Self::SkuFatMin => "sku_fat_min",
            Self::SkuFatMax => "sku_fat_max",
            Self::SkuAlcoholMin => "sku_alcohol_min",
            Self::SkuAlcoholMax => "sku_alcohol_max",
            Self::SkuPacked => "sku_packed",
            Self::SkuPackage => "sku_package",
            Self::SkuBrand => "sku_brand",
            Self::SkuCountry => "sku_country",
            Self::SkuManufacturer => "sku_manufacturer",
            Self::SkuParametersJson => "sku_parameters_json",
            Self::SkuLink => "sku_link",
            Self::AppLink => "app_link",
            Self::SkuImages => "sku_images",
            Self::ServerIp => "server_ip",
            Self::DevInfo => "dev_info",
            Self::Promodata => "promodata",
        }
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell value of a [`ProductRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    /// Normalized decimal; scale 0 means the value is an integer.
    Number(Decimal),
    /// Nested key/value parameters, serialized as a JSON object.
    Json(Map<String, Value>),
}

impl FieldValue {
    /// Blank values (empty text, zero, empty object) export as an empty cell.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Integer(n) => *n == 0,
            Self::Number(d) => d.is_zero(),
            Self::Json(map) => map.is_empty(),
        }
    }

    /// Renders the value as a CSV cell.
    #[must_use]
    pub fn to_cell(&self) -> String {
        if self.is_blank() {
            return String::new();
        }
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Number(d) => d.normalize().to_string(),
            Self::Json(map) => Value::Object(map.clone()).to_string(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<Map<String, Value>> for FieldValue {
    fn from(value: Map<String, Value>) -> Self {
        Self::Json(value)
    }
}

/// One normalized product row. Fields that were never set export as empty
/// cells, so every schema column is always present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    values: BTreeMap<ProductField, FieldValue>,
}

impl ProductRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ProductField, value: impl Into<FieldValue>) {
        self.values.insert(field, value.into());
    }

    #[must_use]
    pub fn get(&self, field: ProductField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Returns the stored text for `field`, if it holds a text value.
    #[must_use]
    pub fn text(&self, field: ProductField) -> Option<&str> {
        match self.values.get(&field) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// `true` when `field` is set to a non-blank value.
    #[must_use]
    pub fn has_value(&self, field: ProductField) -> bool {
        self.values.get(&field).is_some_and(|v| !v.is_blank())
    }

    #[must_use]
    pub fn cell(&self, field: ProductField) -> String {
        self.values
            .get(&field)
            .map(FieldValue::to_cell)
            .unwrap_or_default()
    }

    /// Cells for `schema`, in schema order.
    #[must_use]
    pub fn row(&self, schema: &[ProductField]) -> Vec<String> {
        schema.iter().map(|&field| self.cell(field)).collect()
    }
}

/// Insertion-ordered mapping from product link to [`ProductRecord`].
///
/// A link scraped twice (listed under two categories) keeps its first
/// position; the newer record replaces the older one.
#[derive(Debug, Clone, Default)]
pub struct ProductSnapshot {
    links: Vec<String>,
    records: HashMap<String, ProductRecord>,
}

impl ProductSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, link: impl Into<String>, record: ProductRecord) {
        let link = link.into();
        if !self.records.contains_key(&link) {
            self.links.push(link.clone());
        }
        self.records.insert(link, record);
    }

    #[must_use]
    pub fn get(&self, link: &str) -> Option<&ProductRecord> {
        self.records.get(link)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductRecord)> {
        self.links
            .iter()
            .filter_map(|link| self.records.get(link).map(|r| (link.as_str(), r)))
    }
}
