//! Shapes of the JSON the storefront embeds in `window.__INITIAL_STATE__`.
//!
//! ### Ids
//! Category and product ids show up both as JSON numbers and as strings
//! depending on the page, so every id is read through [`de_id`] into a
//! `String`.
//!
//! ### `parentTreeId`
//! Always present on category entries. Roots carry `null`; a handful of older
//! entries carry `0` or `""` instead, which are treated the same as `null`.
//!
//! ### `propertyValues`
//! A GraphQL union discriminated by `__typename`. Any typename outside the
//! three known variants fails deserialization of the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// One entry of `api.categoryList.list`, with its nested children.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategoryEntry {
    #[serde(deserialize_with = "de_id")]
    pub tree_id: String,

    #[serde(deserialize_with = "de_opt_id")]
    pub parent_tree_id: Option<String>,

    /// URL slug, e.g. `"moloko-syr-yayca"`.
    pub code: String,

    #[serde(deserialize_with = "de_id")]
    pub id: String,

    pub name: String,

    pub is_catalog_display: bool,

    pub is_category_display: bool,

    /// `null`, absent, and `[]` all mean "no children".
    #[serde(default)]
    pub children: Option<Vec<RawCategoryEntry>>,
}

/// `api.product.data` of a product page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProductPayload {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    pub name: String,

    /// Current shelf price. Kept as a JSON number so no precision is lost
    /// before normalization.
    pub price: Number,

    /// Price before the promotion, when one is running.
    #[serde(default)]
    pub previous_price: Option<Number>,

    #[serde(default)]
    pub categories: Vec<RawProductCategory>,

    pub quant: Quant,

    #[serde(default)]
    pub property_values: Vec<PropertyValue>,
}

#[derive(Debug, Deserialize)]
pub struct RawProductCategory {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Quant {
    pub unit: QuantUnit,
}

/// The unit a product is sold in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum QuantUnit {
    /// Sold by weight.
    #[serde(rename = "кг")]
    Kilogram,
    /// Sold by piece.
    #[serde(rename = "шт.")]
    Piece,
    /// Sold by pack.
    #[serde(rename = "упак.")]
    Pack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    /// Machine name, e.g. `"country_of_manufacture"`.
    pub name: String,
    /// Display title, e.g. `"Страна производства"`.
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub label: String,
}

/// One product characteristic.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum PropertyValue {
    /// A single choice from a fixed list.
    #[serde(rename = "ItemOfListPropertyValue")]
    ItemOfList { property: Property, item: Label },

    /// Several choices from a fixed list.
    #[serde(rename = "ListPropertyValue")]
    List { property: Property, list: Vec<Label> },

    /// Free text.
    #[serde(rename = "StringPropertyValue")]
    Text {
        property: Property,
        #[serde(rename = "strValue")]
        str_value: String,
    },
}

impl PropertyValue {
    #[must_use]
    pub fn property(&self) -> &Property {
        match self {
            Self::ItemOfList { property, .. }
            | Self::List { property, .. }
            | Self::Text { property, .. } => property,
        }
    }

    /// The raw value; list choices are joined with `,`.
    #[must_use]
    pub fn raw_value(&self) -> String {
        match self {
            Self::ItemOfList { item, .. } => item.label.clone(),
            Self::List { list, .. } => list
                .iter()
                .map(|part| part.label.as_str())
                .collect::<Vec<_>>()
                .join(","),
            Self::Text { str_value, .. } => str_value.clone(),
        }
    }
}

/// Accepts a JSON string or number and returns it as a `String`.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Like [`de_id`], but `null`, `0`, and `""` become `None`.
fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(None),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string, number or null parent id, got {other}"
        ))),
    }
}
