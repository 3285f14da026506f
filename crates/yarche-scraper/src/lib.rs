pub mod categories;
pub mod client;
pub mod error;
pub mod html;
pub mod normalize;
pub mod record;
pub(crate) mod retry;
pub mod types;
pub mod units;

pub use categories::{build_categories, resolve_categories};
pub use client::{HttpPageFetcher, PageFetcher};
pub use error::ScraperError;
pub use html::{
    extract_initial_state, extract_product_links, state_at, ProductPage, CATEGORY_LIST_POINTER,
    PRODUCT_DATA_POINTER,
};
pub use normalize::{normalize_decimal, normalize_number, normalize_text};
pub use record::{apply_payload, assemble_record, RecordContext};
pub use retry::RetryPolicy;
pub use types::{PropertyValue, QuantUnit, RawCategoryEntry, RawProductPayload};
pub use units::{convert_weight_or_volume, Dimension, Measure};
