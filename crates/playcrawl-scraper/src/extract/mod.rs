//! Field extractors: one pure function per output field.
//!
//! Every extractor shares the same shape — locate container, locate leaf,
//! validate non-empty, convert — and returns an [`ExtractionOutcome`]
//! whose fault names the field, the expected structural element, and the
//! reason. No extractor can abort a sibling.

mod additional_block;
mod app_block;
mod content;
mod review_block;

pub(crate) use additional_block::{
    current_version, developer_link, download_estimate, last_update, min_os_version,
};
pub(crate) use app_block::{
    app_name, category, contains_ads, content_rating, in_app_purchases, price, top_developer,
};
pub(crate) use content::{description, whats_new};
pub(crate) use review_block::{rating, rating_distribution, ratings_count};
