use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("loading page {url} failed after {retries} attempts: {source}")]
    LoadPage {
        url: String,
        retries: u32,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("page has no window.__INITIAL_STATE__ script")]
    InitialStateMissing,

    #[error("window.__INITIAL_STATE__ is not valid JSON: {0}")]
    InitialStateJson(#[source] serde_json::Error),

    #[error("initial state has no value at {pointer}")]
    MissingStatePath { pointer: &'static str },

    #[error("parsing categories from list failed: {source}; list of categories: {entries}")]
    CategoryList {
        entries: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("product payload does not match the expected shape: {0}")]
    ProductPayload(#[source] serde_json::Error),

    #[error("page element not found: {selector}")]
    MissingElement { selector: &'static str },

    #[error("element {selector} has no {attribute} attribute")]
    MissingAttribute {
        selector: &'static str,
        attribute: &'static str,
    },

    #[error("no supported image layout on product page")]
    UnsupportedImageLayout,

    #[error("value is not a number: \"{value}\"")]
    InvalidNumber { value: String },

    #[error("converting {dimension} failed for value \"{value}\"")]
    UnitConversion {
        dimension: &'static str,
        value: String,
    },

    #[error("product {link}: {source}")]
    Product {
        link: String,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("collecting product links from {url}: {source}")]
    CategoryPage {
        url: String,
        #[source]
        source: Box<ScraperError>,
    },
}
