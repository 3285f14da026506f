//! Category tree construction and category selection.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use yarche_core::{is_aggregate_url, CategoryNode, CategoryTree, CATALOG_PREFIX, CATEGORY_PREFIX};

use crate::error::ScraperError;
use crate::types::RawCategoryEntry;

/// Builds the visible category tree from `api.categoryList.list`.
///
/// Entries are walked depth-first. An entry is stored when either display
/// flag is set; children are visited even when their parent is hidden, so a
/// visible child of a hidden parent is stored as an orphan with its bare name
/// and an empty `parent_url`.
///
/// # Errors
///
/// Returns [`ScraperError::CategoryList`] carrying the full input list when
/// any entry lacks an expected key or has a wrong type.
pub fn build_categories(entries: &Value) -> Result<CategoryTree, ScraperError> {
    let parsed =
        Vec::<RawCategoryEntry>::deserialize(entries).map_err(|source| {
            ScraperError::CategoryList {
                entries: entries.to_string(),
                source,
            }
        })?;

    let mut tree = CategoryTree::new();
    collect_visible(&parsed, &mut tree);
    Ok(tree)
}

fn collect_visible(entries: &[RawCategoryEntry], tree: &mut CategoryTree) {
    for entry in entries {
        if entry.is_catalog_display || entry.is_category_display {
            let node = to_node(entry, tree);
            tree.insert(node);
        }

        if let Some(children) = entry.children.as_deref() {
            collect_visible(children, tree);
        }
    }
}

fn to_node(entry: &RawCategoryEntry, tree: &CategoryTree) -> CategoryNode {
    let prefix = if entry.is_catalog_display {
        CATALOG_PREFIX
    } else {
        CATEGORY_PREFIX
    };
    let url = format!("{prefix}{}-{}", entry.code, entry.id);

    let parent = entry
        .parent_tree_id
        .as_deref()
        .and_then(|parent_id| tree.get(parent_id));

    let (name, parent_url) = match (parent, entry.parent_tree_id.as_deref()) {
        (Some(parent), _) => (format!("{}|{}", parent.name, entry.name), parent.url.clone()),
        (None, Some(parent_id)) => {
            tracing::warn!(
                tree_id = %entry.tree_id,
                parent_id,
                url = %url,
                "category parent is not visible; storing as orphan"
            );
            (entry.name.clone(), String::new())
        }
        (None, None) => (entry.name.clone(), String::new()),
    };

    CategoryNode {
        id: entry.tree_id.clone(),
        parent_id: entry.parent_tree_id.clone(),
        name,
        url,
        parent_url,
    }
}

/// Resolves a requested category selection against the live tree into the
/// list of listable `/catalog/` URLs to scrape.
///
/// An empty request selects the whole tree. Requested `/category/` URLs are
/// expanded to their direct children, which are appended after the requested
/// URLs. Unknown URLs are logged and skipped. The result holds no
/// `/category/` URL and no duplicates.
#[must_use]
pub fn resolve_categories(requested: &[String], tree: &CategoryTree) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if requested.is_empty() {
        candidates.extend(tree.iter().map(|node| node.url.clone()));
    } else {
        let mut expanded: Vec<String> = Vec::new();
        for url in requested {
            if !tree.contains_url(url) {
                tracing::error!(url = %url, "requested category is not on the site; skipping");
                continue;
            }
            candidates.push(url.clone());
            if is_aggregate_url(url) {
                expanded.extend(tree.children_of(url).map(|child| child.url.clone()));
            }
        }
        candidates.extend(expanded);
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|url| !is_aggregate_url(url))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
