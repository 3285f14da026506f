use std::path::PathBuf;

use anyhow::Context;
use yarche_core::{AppConfig, CategorySelection, ProductRecord, ProductSnapshot, PRODUCT_CSV_FIELDS};
use yarche_export::{
    archive_name_for, create_zip_archive, mail_subject, products_csv_name, send_archive,
    write_products_csv,
};
use yarche_scraper::{
    assemble_record, extract_product_links, resolve_categories, PageFetcher, ProductPage,
    RecordContext, ScraperError,
};

use super::{fetch_category_tree, now, open_location};

#[derive(Debug, Clone, Default)]
pub(crate) struct ProductRunOptions {
    /// Scrape only this store instead of every configured one.
    pub tt_filter: Option<String>,
    /// Mail the archive when mail is configured.
    pub send_email: bool,
}

/// Files produced for one store.
#[derive(Debug)]
pub(crate) struct StoreExport {
    pub csv: PathBuf,
    /// `None` once the archive has been mailed and removed.
    pub archive: Option<PathBuf>,
    pub products: usize,
}

/// Scrapes every selected category of every store, then writes, archives,
/// and optionally mails one product export per store.
///
/// # Errors
///
/// Returns an error naming the store on the first page, record, or file
/// failure. Categories without product links are logged and skipped.
pub(crate) async fn run_products<F: PageFetcher>(
    fetcher: &mut F,
    config: &AppConfig,
    selection: &CategorySelection,
    options: &ProductRunOptions,
) -> anyhow::Result<Vec<StoreExport>> {
    let tt_ids: Vec<String> = match &options.tt_filter {
        Some(tt_id) => vec![tt_id.clone()],
        None => config.tt_ids.clone(),
    };

    if tt_ids.len() > 1 && !fetcher.applies_location() {
        tracing::warn!(
            stores = tt_ids.len(),
            "delivery address is not applied by this fetcher; every store exports the same unlocalized prices"
        );
    }

    let mut exports = Vec::with_capacity(tt_ids.len());
    for tt_id in &tt_ids {
        let export = scrape_store(fetcher, config, selection, options, tt_id)
            .await
            .with_context(|| format!("store \"{tt_id}\""))?;
        exports.push(export);
    }
    Ok(exports)
}

async fn scrape_store<F: PageFetcher>(
    fetcher: &mut F,
    config: &AppConfig,
    selection: &CategorySelection,
    options: &ProductRunOptions,
    tt_id: &str,
) -> anyhow::Result<StoreExport> {
    let started = now();
    open_location(fetcher, config, tt_id).await?;
    let tree = fetch_category_tree(fetcher, config).await?;
    let categories = resolve_categories(selection.for_location(tt_id), &tree);
    tracing::info!(tt_id, categories = categories.len(), "categories selected");

    let mut snapshot = ProductSnapshot::new();
    for category in &categories {
        let url = format!("{}{category}", config.base_url);
        let html = fetcher.fetch(&url).await?;
        let links = extract_product_links(&html, config.promo_only).map_err(|source| {
            ScraperError::CategoryPage {
                url: url.clone(),
                source: Box::new(source),
            }
        })?;
        if links.is_empty() {
            tracing::error!(url = %url, "no products found in category; skipping");
            continue;
        }

        for link in &links {
            let html = fetcher.fetch(&format!("{}{link}", config.base_url)).await?;
            let ctx = RecordContext {
                config,
                tt_id,
                link,
                scraped_at: now(),
            };
            snapshot.insert(link.as_str(), assemble_from_html(&html, &ctx)?);
        }
        tracing::info!(url = %url, products = links.len(), "category scraped");
    }

    let csv = config
        .output_dir
        .join(products_csv_name(config.tt_region, tt_id, &config.part_number, started));
    write_products_csv(&csv, &PRODUCT_CSV_FIELDS, &snapshot)?;

    let archive = archive_name_for(&csv);
    create_zip_archive(&archive, &csv)?;

    let archive = match (&config.smtp, options.send_email && config.email_enabled()) {
        (Some(smtp), true) => {
            let subject = mail_subject(&config.chain_name, config.tt_region, tt_id, now());
            send_archive(smtp, &config.emails_to, &subject, &archive).await?;
            None
        }
        _ => Some(archive),
    };

    Ok(StoreExport {
        csv,
        archive,
        products: snapshot.len(),
    })
}

/// Parses and assembles in one synchronous step so the parsed DOM never
/// lives across an `.await`.
fn assemble_from_html(html: &str, ctx: &RecordContext<'_>) -> Result<ProductRecord, ScraperError> {
    let page = ProductPage::parse(html);
    assemble_record(&page, ctx)
}
