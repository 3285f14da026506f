//! HTML extraction for category listings and product pages.
//!
//! The storefront ships obfuscated but stable class names; every selector the
//! scraper depends on lives in this module.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::error::ScraperError;

const INITIAL_STATE_MARKER: &str = "window.__INITIAL_STATE__";
const OUT_OF_STOCK_TEXT: &str = "Нет в наличии";

const LISTING: &str = "div.k30d0QKVw";
const PRODUCT_CARD: &str = "div.c3s8K6a5X";
const PRODUCT_LINK: &str = "a.g2mGXj5-x";
const PROMO_BADGE: &str = "div.e10FT7BLs.a3blieLf1.m3blieLf1";
const STOCK_REGION: &str = "div.q1a5cSewj";
const SINGLE_IMAGE: &str = "img.c1uCMShdi";
const HERO_IMAGE: &str = "img.bTBOnDBin";
const THUMBNAIL_IMAGE: &str = "img.b1yGNlZZL";

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static SCRIPT_SEL: LazyLock<Selector> = LazyLock::new(|| selector("script"));
static DIV_SEL: LazyLock<Selector> = LazyLock::new(|| selector("div"));
static LISTING_SEL: LazyLock<Selector> = LazyLock::new(|| selector(LISTING));
static CARD_SEL: LazyLock<Selector> = LazyLock::new(|| selector(PRODUCT_CARD));
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| selector(PRODUCT_LINK));
static PROMO_SEL: LazyLock<Selector> = LazyLock::new(|| selector(PROMO_BADGE));
static STOCK_SEL: LazyLock<Selector> = LazyLock::new(|| selector(STOCK_REGION));
static SINGLE_IMAGE_SEL: LazyLock<Selector> = LazyLock::new(|| selector(SINGLE_IMAGE));
static HERO_IMAGE_SEL: LazyLock<Selector> = LazyLock::new(|| selector(HERO_IMAGE));
static THUMBNAIL_SEL: LazyLock<Selector> = LazyLock::new(|| selector(THUMBNAIL_IMAGE));

/// JSON pointers into the initial state.
pub const CATEGORY_LIST_POINTER: &str = "/api/categoryList/list";
pub const PRODUCT_DATA_POINTER: &str = "/api/product/data";

/// Parses the `window.__INITIAL_STATE__=...;` script of a rendered page.
///
/// # Errors
///
/// Returns [`ScraperError::InitialStateMissing`] when no such script exists
/// and [`ScraperError::InitialStateJson`] when its payload is not JSON.
pub fn extract_initial_state(html: &str) -> Result<Value, ScraperError> {
    initial_state_of(&Html::parse_document(html))
}

fn initial_state_of(document: &Html) -> Result<Value, ScraperError> {
    let script = document
        .select(&SCRIPT_SEL)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.trim_start().starts_with(INITIAL_STATE_MARKER))
        .ok_or(ScraperError::InitialStateMissing)?;

    let payload = script
        .trim()
        .trim_start_matches(INITIAL_STATE_MARKER)
        .trim_start()
        .trim_start_matches('=')
        .trim_end_matches(';');

    serde_json::from_str(payload).map_err(ScraperError::InitialStateJson)
}

/// Looks up `pointer` in an initial state.
///
/// # Errors
///
/// Returns [`ScraperError::MissingStatePath`] when nothing lives there.
pub fn state_at<'a>(state: &'a Value, pointer: &'static str) -> Result<&'a Value, ScraperError> {
    state
        .pointer(pointer)
        .ok_or(ScraperError::MissingStatePath { pointer })
}

/// Collects product links from a category page, in page order.
///
/// Only cards inside the listing container are considered, so recommendation
/// carousels elsewhere on the page are ignored. With `promo_only`, cards
/// without the promo badge are dropped.
///
/// # Errors
///
/// Returns [`ScraperError::MissingElement`] when the listing container is
/// absent or a card has no product link, and
/// [`ScraperError::MissingAttribute`] when a link has no `href`.
pub fn extract_product_links(html: &str, promo_only: bool) -> Result<Vec<String>, ScraperError> {
    let document = Html::parse_document(html);
    let listing = document
        .select(&LISTING_SEL)
        .next()
        .ok_or(ScraperError::MissingElement { selector: LISTING })?;

    listing
        .select(&CARD_SEL)
        .filter(|card| !promo_only || card.select(&PROMO_SEL).next().is_some())
        .map(|card| {
            let anchor = card
                .select(&LINK_SEL)
                .next()
                .ok_or(ScraperError::MissingElement {
                    selector: PRODUCT_LINK,
                })?;
            href_of(anchor, PRODUCT_LINK)
        })
        .collect()
}

fn href_of(anchor: ElementRef<'_>, selector: &'static str) -> Result<String, ScraperError> {
    anchor
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or(ScraperError::MissingAttribute {
            selector,
            attribute: "href",
        })
}

fn src_of(img: ElementRef<'_>, selector: &'static str) -> Result<String, ScraperError> {
    img.value()
        .attr("src")
        .map(str::to_string)
        .ok_or(ScraperError::MissingAttribute {
            selector,
            attribute: "src",
        })
}

/// A parsed product page.
///
/// Holds the parsed DOM, which is not `Send`; build it, extract, and drop it
/// before the next `.await`.
pub struct ProductPage {
    document: Html,
}

impl ProductPage {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// See [`extract_initial_state`].
    ///
    /// # Errors
    ///
    /// Same as [`extract_initial_state`].
    pub fn initial_state(&self) -> Result<Value, ScraperError> {
        initial_state_of(&self.document)
    }

    /// `false` when the stock region carries the out-of-stock marker.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingElement`] when the stock region is
    /// missing from the page.
    pub fn is_in_stock(&self) -> Result<bool, ScraperError> {
        let region = self
            .document
            .select(&STOCK_SEL)
            .next()
            .ok_or(ScraperError::MissingElement {
                selector: STOCK_REGION,
            })?;

        let out_of_stock = region
            .select(&DIV_SEL)
            .any(|div| div.text().collect::<String>().trim() == OUT_OF_STOCK_TEXT);
        Ok(!out_of_stock)
    }

    /// Image URLs of the product, hero first.
    ///
    /// Two layouts exist: a lone image, or a hero image followed by a
    /// thumbnail strip that repeats it. Thumbnails are deduplicated by `src`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UnsupportedImageLayout`] when neither layout
    /// matches, and [`ScraperError::MissingAttribute`] for an image without
    /// `src`.
    pub fn images(&self) -> Result<Vec<String>, ScraperError> {
        if let Some(img) = self.document.select(&SINGLE_IMAGE_SEL).next() {
            return Ok(vec![src_of(img, SINGLE_IMAGE)?]);
        }

        let hero = self
            .document
            .select(&HERO_IMAGE_SEL)
            .next()
            .ok_or(ScraperError::UnsupportedImageLayout)?;

        let mut images = vec![src_of(hero, HERO_IMAGE)?];
        for thumb in self.document.select(&THUMBNAIL_SEL) {
            let src = src_of(thumb, THUMBNAIL_IMAGE)?;
            if !images.contains(&src) {
                images.push(src);
            }
        }
        Ok(images)
    }
}
