use std::path::PathBuf;

use anyhow::Context;
use yarche_core::AppConfig;
use yarche_export::{categories_csv_name, write_categories_csv};
use yarche_scraper::PageFetcher;

use super::{fetch_category_tree, now, open_location};

/// Writes one category CSV per configured store and returns their paths.
///
/// # Errors
///
/// Returns an error naming the store when a page cannot be loaded or parsed,
/// or the CSV cannot be written.
pub(crate) async fn run_categories<F: PageFetcher>(
    fetcher: &mut F,
    config: &AppConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(config.tt_ids.len());

    for tt_id in &config.tt_ids {
        open_location(fetcher, config, tt_id)
            .await
            .with_context(|| format!("store \"{tt_id}\""))?;
        let tree = fetch_category_tree(fetcher, config)
            .await
            .with_context(|| format!("store \"{tt_id}\""))?;

        let path = config.output_dir.join(categories_csv_name(tt_id, now()));
        write_categories_csv(&path, &tree)
            .with_context(|| format!("writing categories for store \"{tt_id}\""))?;
        written.push(path);
    }

    Ok(written)
}
