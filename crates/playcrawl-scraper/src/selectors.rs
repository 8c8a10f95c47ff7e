//! The single configuration surface for everything the engine knows about
//! the upstream markup.
//!
//! The storefront page has no stable schema: class names are obfuscated
//! and rotate without notice, and two of the structural contracts are
//! purely positional. Every tag/class/itemprop pair and every positional
//! index the extractors consume lives in [`SelectorTable`], so a markup
//! change means editing one table, not a dozen extractor bodies.

use scraper::Selector;

use crate::error::BuildError;

/// Raw selector strings and positional indices for one markup generation.
///
/// [`SelectorTable::default`] describes the markup generation this crawler
/// was written against. Tests override individual entries to build small
/// fixtures; a future markup rotation is absorbed the same way.
#[derive(Debug, Clone)]
pub struct SelectorTable {
    /// Top-level content container; absence means the whole page is
    /// unusable and field extraction is skipped entirely.
    pub page_root: String,
    /// Outer container of the app-info block.
    pub app_container: String,
    /// Inner app-info block holding name/category/price/badges.
    pub app_block: String,
    /// Heading marker for the three main information blocks.
    pub block_headline: String,
    /// Entry grid inside the additional-information block.
    pub additional_container: String,
    /// Similar-apps region on the details page.
    pub similar_container: String,
    /// Listing container holding one child per suggested app.
    pub similar_listing: String,

    pub app_name: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub top_developer_badge: String,
    pub content_rating: String,
    pub rating_value: String,
    pub ratings_count: String,
    pub rating_distribution: String,
    /// Ads and in-app-purchase notices share one class; the badge text
    /// distinguishes them.
    pub monetization_badge: String,

    pub positions: Positions,
    pub labels: Labels,
}

/// The two positional structural contracts, in one place.
///
/// Block order (review, what's-new, additional) and the additional-info
/// child indices are how the upstream page is laid out today — a
/// positional contract, not a semantic search. A markup reordering
/// silently scrambles the assignment; that risk is documented here rather
/// than auto-corrected.
#[derive(Debug, Clone)]
pub struct Positions {
    pub block_review: usize,
    pub block_whats_new: usize,
    pub block_additional: usize,
    /// Number of heading-anchored blocks required before any of them is
    /// trusted.
    pub min_main_blocks: usize,
    /// Index of the content child under each walked-up block ancestor.
    pub block_content_child: usize,
    /// Ancestor levels to walk up from a block headline.
    pub headline_ancestor_levels: usize,

    /// Minimum entries expected in the additional-information grid.
    pub min_additional_children: usize,
    pub additional_last_update: usize,
    pub additional_downloads: usize,
    pub additional_current_version: usize,
    pub additional_min_os: usize,

    /// Index of the child holding the content-rating image.
    pub content_rating_child: usize,
    /// Minimum bucket rows under the rating-distribution container.
    pub min_distribution_buckets: usize,
}

/// Fixed literal strings the page uses for badge and fallback values.
#[derive(Debug, Clone)]
pub struct Labels {
    pub contains_ads: String,
    pub in_app_purchases: String,
    pub varies_with_device: String,
    pub unknown_version: String,
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self {
            page_root: "div.LXrl4c".to_owned(),
            app_container: "div.oQ6oV".to_owned(),
            app_block: "div.rlnrKc".to_owned(),
            block_headline: "h2.Rm6Gwb".to_owned(),
            additional_container: "div.IxB2fe".to_owned(),
            similar_container: "div.Ktdaqe".to_owned(),
            similar_listing: "div.ZmHEEd".to_owned(),
            app_name: "h1[itemprop=\"name\"]".to_owned(),
            category: "a[itemprop=\"genre\"]".to_owned(),
            price: "meta[itemprop=\"price\"]".to_owned(),
            description: "div[itemprop=\"description\"]".to_owned(),
            top_developer_badge: "meta[itemprop=\"editorsChoiceBadgeUrl\"]".to_owned(),
            content_rating: "div.ZVWMWc".to_owned(),
            rating_value: "div.BHMmbe".to_owned(),
            ratings_count: "span.EymY4b".to_owned(),
            rating_distribution: "div.VEF2C".to_owned(),
            monetization_badge: "div.bSIuKf".to_owned(),
            positions: Positions {
                block_review: 0,
                block_whats_new: 1,
                block_additional: 2,
                min_main_blocks: 3,
                block_content_child: 1,
                headline_ancestor_levels: 2,
                min_additional_children: 11,
                additional_last_update: 0,
                additional_downloads: 2,
                additional_current_version: 3,
                additional_min_os: 4,
                content_rating_child: 1,
                min_distribution_buckets: 5,
            },
            labels: Labels {
                contains_ads: "Contains Ads".to_owned(),
                in_app_purchases: "Offers in-app purchases".to_owned(),
                varies_with_device: "Varies with device".to_owned(),
                unknown_version: "unknown".to_owned(),
            },
        }
    }
}

/// Compiled form of a [`SelectorTable`], built once per crawler.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub(crate) table: SelectorTable,

    pub(crate) page_root: Selector,
    pub(crate) app_container: Selector,
    pub(crate) app_block: Selector,
    pub(crate) block_headline: Selector,
    pub(crate) additional_container: Selector,
    pub(crate) similar_container: Selector,
    pub(crate) similar_listing: Selector,
    pub(crate) app_name: Selector,
    pub(crate) category: Selector,
    pub(crate) price: Selector,
    pub(crate) description: Selector,
    pub(crate) top_developer_badge: Selector,
    pub(crate) content_rating: Selector,
    pub(crate) rating_value: Selector,
    pub(crate) ratings_count: Selector,
    pub(crate) rating_distribution: Selector,
    pub(crate) monetization_badge: Selector,

    pub(crate) any_link: Selector,
    pub(crate) any_span: Selector,
    pub(crate) any_div: Selector,
    pub(crate) any_img: Selector,
}

fn compile(name: &'static str, selector: &str) -> Result<Selector, BuildError> {
    Selector::parse(selector).map_err(|e| BuildError::InvalidSelector {
        name,
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

impl Selectors {
    /// Compiles every selector in the table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidSelector`] naming the first table entry
    /// that does not parse as a CSS selector.
    pub fn compile(table: SelectorTable) -> Result<Self, BuildError> {
        Ok(Self {
            page_root: compile("page_root", &table.page_root)?,
            app_container: compile("app_container", &table.app_container)?,
            app_block: compile("app_block", &table.app_block)?,
            block_headline: compile("block_headline", &table.block_headline)?,
            additional_container: compile("additional_container", &table.additional_container)?,
            similar_container: compile("similar_container", &table.similar_container)?,
            similar_listing: compile("similar_listing", &table.similar_listing)?,
            app_name: compile("app_name", &table.app_name)?,
            category: compile("category", &table.category)?,
            price: compile("price", &table.price)?,
            description: compile("description", &table.description)?,
            top_developer_badge: compile("top_developer_badge", &table.top_developer_badge)?,
            content_rating: compile("content_rating", &table.content_rating)?,
            rating_value: compile("rating_value", &table.rating_value)?,
            ratings_count: compile("ratings_count", &table.ratings_count)?,
            rating_distribution: compile("rating_distribution", &table.rating_distribution)?,
            monetization_badge: compile("monetization_badge", &table.monetization_badge)?,
            any_link: compile("any_link", "a")?,
            any_span: compile("any_span", "span")?,
            any_div: compile("any_div", "div")?,
            any_img: compile("any_img", "img")?,
            table,
        })
    }

    pub(crate) fn positions(&self) -> &Positions {
        &self.table.positions
    }

    pub(crate) fn labels(&self) -> &Labels {
        &self.table.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_compiles() {
        let selectors = Selectors::compile(SelectorTable::default());
        assert!(selectors.is_ok(), "default table must compile: {selectors:?}");
    }

    #[test]
    fn invalid_selector_is_reported_by_name() {
        let table = SelectorTable {
            page_root: ":::".to_owned(),
            ..SelectorTable::default()
        };
        let err = Selectors::compile(table).unwrap_err();
        assert!(matches!(
            err,
            BuildError::InvalidSelector { name: "page_root", .. }
        ));
    }
}
