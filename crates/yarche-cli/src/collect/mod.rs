//! Run orchestration for the `categories` and `products` commands.
//!
//! Every store address is processed in turn on one [`PageFetcher`] session:
//! open the site, select the address, then scrape. Any failure aborts the run
//! with the store address attached.

mod categories;
mod products;

use anyhow::Context;
use yarche_core::{AppConfig, CategoryTree};
use yarche_scraper::{build_categories, extract_initial_state, state_at, PageFetcher, CATEGORY_LIST_POINTER};

pub(crate) use categories::run_categories;
pub(crate) use products::{run_products, ProductRunOptions};

/// Loads the storefront home page and switches the session to `tt_id`.
async fn open_location<F: PageFetcher>(
    fetcher: &mut F,
    config: &AppConfig,
    tt_id: &str,
) -> anyhow::Result<()> {
    fetcher
        .fetch(&config.base_url)
        .await
        .with_context(|| format!("loading {}", config.base_url))?;
    fetcher
        .select_location(tt_id)
        .await
        .with_context(|| format!("selecting delivery address \"{tt_id}\""))?;
    tracing::info!(tt_id, "location selected");
    Ok(())
}

/// Fetches `/category/` and builds the live category tree.
async fn fetch_category_tree<F: PageFetcher>(
    fetcher: &F,
    config: &AppConfig,
) -> anyhow::Result<CategoryTree> {
    let url = format!("{}/category/", config.base_url);
    let html = fetcher.fetch(&url).await?;
    let tree = parse_category_tree(&html).with_context(|| format!("reading categories from {url}"))?;
    tracing::info!(categories = tree.len(), "category tree loaded");
    Ok(tree)
}

fn parse_category_tree(html: &str) -> Result<CategoryTree, yarche_scraper::ScraperError> {
    let state = extract_initial_state(html)?;
    build_categories(state_at(&state, CATEGORY_LIST_POINTER)?)
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
