pub mod client;
pub mod crawl;
mod dom;
pub mod error;
mod extract;
mod locate;
pub mod normalize;
pub mod selectors;
mod similar;

pub use client::PlayStoreClient;
pub use crawl::{Crawler, CrawlerConfig};
pub use error::{BuildError, ExtractionOutcome, Fault, FetchError};
pub use selectors::{SelectorTable, Selectors};
