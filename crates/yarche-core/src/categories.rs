use std::collections::HashMap;

use serde::Serialize;

/// Path prefix of a listable (leaf) category page.
pub const CATALOG_PREFIX: &str = "/catalog/";
/// Path prefix of an aggregating category page that only links to children.
pub const CATEGORY_PREFIX: &str = "/category/";

/// Returns `true` for aggregating `/category/` URLs, which list no products
/// themselves.
#[must_use]
pub fn is_aggregate_url(url: &str) -> bool {
    url.contains(CATEGORY_PREFIX)
}

/// One visible node of the storefront category tree, as exported to CSV.
///
/// Field order matches the export header `id;parent_id;name;url;parent_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub id: String,
    /// Raw parent tree id. May reference a node that is not part of the tree
    /// when the parent itself is hidden from the storefront.
    pub parent_id: Option<String>,
    /// Breadcrumb of ancestor names joined with `|`.
    pub name: String,
    pub url: String,
    /// URL of the stored parent, or empty for roots and orphans.
    pub parent_url: String,
}

/// Insertion-ordered mapping from tree id to [`CategoryNode`].
///
/// Re-inserting an id replaces the node but keeps its original position, so
/// iteration order is always first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
    index: HashMap<String, usize>,
}

impl CategoryTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: CategoryNode) {
        if let Some(&pos) = self.index.get(&node.id) {
            self.nodes[pos] = node;
        } else {
            self.index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CategoryNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn contains_url(&self, url: &str) -> bool {
        self.nodes.iter().any(|n| n.url == url)
    }

    /// Direct children of the node at `url`, in tree order.
    pub fn children_of<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a CategoryNode> + 'a {
        self.nodes.iter().filter(move |n| n.parent_url == url)
    }
}

impl<'a> IntoIterator for &'a CategoryTree {
    type Item = &'a CategoryNode;
    type IntoIter = std::slice::Iter<'a, CategoryNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
