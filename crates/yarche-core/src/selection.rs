use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::categories::{CATALOG_PREFIX, CATEGORY_PREFIX};
use crate::ConfigError;

/// Per-store category selection, read from a YAML file of the form:
///
/// ```yaml
/// categories:
///   "Москва, Вересаева 10":
///     - /catalog/moloko-10
///     - /category/molochnye-produkty-2
/// ```
///
/// A store that is absent from the file (or listed with an empty list)
/// scrapes every listable category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySelection {
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
}

impl CategorySelection {
    /// Requested category URLs for one store address.
    #[must_use]
    pub fn for_location(&self, tt_id: &str) -> &[String] {
        self.categories.get(tt_id).map_or(&[], Vec::as_slice)
    }
}

/// Load and validate the category selection from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains a
/// URL that is neither a `/catalog/` nor a `/category/` path.
pub fn load_category_selection(path: &Path) -> Result<CategorySelection, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SelectionFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let selection: CategorySelection =
        serde_yaml::from_str(&content).map_err(ConfigError::SelectionFileParse)?;

    validate_selection(&selection)?;

    Ok(selection)
}

fn validate_selection(selection: &CategorySelection) -> Result<(), ConfigError> {
    for (tt_id, urls) in &selection.categories {
        if tt_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store address must be non-empty".to_string(),
            ));
        }
        for url in urls {
            if !url.starts_with(CATALOG_PREFIX) && !url.starts_with(CATEGORY_PREFIX) {
                return Err(ConfigError::Validation(format!(
                    "category '{url}' for '{tt_id}' must start with {CATALOG_PREFIX} or {CATEGORY_PREFIX}"
                )));
            }
        }
    }
    Ok(())
}
