//! The extraction orchestrator: drives one full pass over a details page.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use playcrawl_core::{AppConfig, AppSnapshot};

use crate::client::PlayStoreClient;
use crate::error::{BuildError, Fault};
use crate::normalize;
use crate::selectors::{SelectorTable, Selectors};
use crate::{extract, locate, similar};

/// Construction-time configuration for a [`Crawler`].
///
/// Everything that used to be ambient — selector constants, the capture
/// date, the storefront root — is passed in here explicitly, so tests can
/// override any of it without global mutation.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Fixed capture date for deterministic runs; `None` means "today".
    pub capture_date: Option<NaiveDate>,
    pub selector_table: SelectorTable,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://play.google.com".to_owned(),
            request_timeout_secs: 30,
            user_agent: "playcrawl/0.1 (app-page-crawler)".to_owned(),
            capture_date: None,
            selector_table: SelectorTable::default(),
        }
    }
}

impl CrawlerConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            capture_date: config.capture_date,
            selector_table: SelectorTable::default(),
        }
    }
}

/// What remains to be done for the similar-apps field after the
/// synchronous pass. The parsed document cannot be held across an await
/// point, so the sync pass reduces it to owned data first.
enum SimilarPlan {
    /// Page root was missing; similar apps are not attempted at all.
    Skip,
    /// Resolution finished synchronously (inline listing, or a fault).
    Done {
        ids: Vec<String>,
        fault: Option<Fault>,
    },
    /// A listing link was found: fetch it, prefer its candidates, fall
    /// back to the inline result when it yields nothing.
    Fetch {
        href: String,
        fallback_ids: Vec<String>,
        fallback_fault: Option<Fault>,
    },
}

/// Drives the full extraction pass for one package.
///
/// The crawler is stateless between crawls: every pass is an independent
/// computation over its own document tree, and the only shared piece is
/// the pooled HTTP client, which is safe for concurrent use.
#[derive(Debug)]
pub struct Crawler {
    client: PlayStoreClient,
    selectors: Selectors,
    capture_date: Option<NaiveDate>,
}

impl Crawler {
    /// Builds a crawler from configuration, compiling the selector table.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a selector does not compile or the
    /// HTTP client cannot be constructed.
    pub fn new(config: CrawlerConfig) -> Result<Self, BuildError> {
        let client = PlayStoreClient::new(
            &config.base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let selectors = Selectors::compile(config.selector_table)?;
        Ok(Self {
            client,
            selectors,
            capture_date: config.capture_date,
        })
    }

    /// Fetches and extracts the details page of one package.
    ///
    /// Total: always returns a complete snapshot. A failed fetch, a
    /// missing page container, or any number of per-field faults all
    /// degrade into fault-log entries, never into an error.
    pub async fn crawl(&self, package: &str) -> AppSnapshot {
        let mut snapshot = AppSnapshot::new(package, self.capture_date_value());

        let body = match self.client.fetch_app_page(package).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(package, error = %error, "app page fetch failed");
                snapshot
                    .errors
                    .push(Fault::network("page", error.to_string()).to_string());
                return snapshot;
            }
        };

        // The parsed tree is not Send; finish everything synchronous
        // before the optional second fetch.
        let plan = {
            let document = Html::parse_document(&body);
            self.sync_pass(&document, &mut snapshot)
        };
        self.apply_similar_plan(plan, &mut snapshot).await;

        if snapshot.likely_blocked() {
            tracing::warn!(
                package,
                "all identity fields empty; the response was probably a bot challenge"
            );
        }
        tracing::debug!(package, faults = snapshot.errors.len(), "extraction pass complete");
        snapshot
    }

    /// Extracts a snapshot from an already-parsed document, without any
    /// network access: the similar-apps field resolves from the inline
    /// listing only. Re-running this on the same tree yields an
    /// identical snapshot (fix the capture date for full determinism).
    #[must_use]
    pub fn extract(&self, document: &Html, package: &str) -> AppSnapshot {
        let mut snapshot = AppSnapshot::new(package, self.capture_date_value());
        match self.sync_pass(document, &mut snapshot) {
            SimilarPlan::Skip => {}
            SimilarPlan::Done { ids, fault }
            | SimilarPlan::Fetch {
                fallback_ids: ids,
                fallback_fault: fault,
                ..
            } => {
                snapshot.similar_apps = ids;
                if let Some(fault) = fault {
                    snapshot.errors.push(fault.to_string());
                }
            }
        }
        if snapshot.likely_blocked() {
            tracing::warn!(
                package,
                "all identity fields empty; the response was probably a bot challenge"
            );
        }
        snapshot
    }

    /// The synchronous part of a pass: every field extractor in fixed
    /// order, then the similar-apps scan reduced to an owned plan.
    fn sync_pass(&self, document: &Html, snapshot: &mut AppSnapshot) -> SimilarPlan {
        let root = match locate::page_root(document, &self.selectors) {
            Ok(root) => root,
            Err(fault) => {
                // The one escalation point: without the page container
                // nothing else can be located, so the whole extractor
                // set is skipped rather than attempted field by field.
                snapshot.errors.push(fault.to_string());
                return SimilarPlan::Skip;
            }
        };

        self.extract_fields(root, snapshot);

        match similar::scan(document, &self.selectors) {
            Err(fault) => SimilarPlan::Done {
                ids: Vec::new(),
                fault: Some(fault),
            },
            Ok(scan) => {
                let inline = similar::listing_children_in(scan.block, &self.selectors);
                let (ids, fault) = similar::collect_package_ids(&inline, &self.selectors);
                match scan.listing_href {
                    Some(href) => SimilarPlan::Fetch {
                        href,
                        fallback_ids: ids,
                        fallback_fault: fault,
                    },
                    None => SimilarPlan::Done { ids, fault },
                }
            }
        }
    }

    /// Field extractors in their fixed order. The order does not affect
    /// field values (extractors are independent), but the fault-log order
    /// is part of the observable contract.
    fn extract_fields(&self, root: ElementRef<'_>, snapshot: &mut AppSnapshot) {
        let selectors = &self.selectors;

        if let Some(value) = record(snapshot, extract::app_name(root, selectors)) {
            snapshot.name = value;
        }
        if let Some(value) = record(snapshot, extract::category(root, selectors)) {
            snapshot.category = value;
        }
        if let Some(value) = record(snapshot, extract::content_rating(root, selectors)) {
            snapshot.usk = value;
        }
        if let Some(price) = record(snapshot, extract::price(root, selectors)) {
            snapshot.price = price.tier;
            snapshot.price_value = price.value;
            snapshot.price_currency = price.currency;
        }
        if let Some(value) = record(snapshot, extract::description(root, selectors)) {
            snapshot.description = value;
        }
        if let Some(value) = record(snapshot, extract::whats_new(root, selectors)) {
            snapshot.whats_new = value;
        }
        if let Some(value) = record(snapshot, extract::rating(root, selectors)) {
            snapshot.rating = value;
        }
        if let Some(value) = record(snapshot, extract::ratings_count(root, selectors)) {
            snapshot.stars_count = value;
        }
        if let Some(value) = record(snapshot, extract::rating_distribution(root, selectors)) {
            snapshot.count_per_rating = value;
        }
        if let Some(value) = record(snapshot, extract::download_estimate(root, selectors)) {
            snapshot.estimated_download_number = value;
        }
        if let Some(value) = record(snapshot, extract::developer_link(root, selectors)) {
            snapshot.developer_name = value;
        }
        if let Some(value) = record(snapshot, extract::top_developer(root, selectors)) {
            snapshot.top_developer = value;
        }
        if let Some(value) = record(snapshot, extract::contains_ads(root, selectors)) {
            snapshot.contains_ads = value;
        }
        if let Some(value) = record(snapshot, extract::in_app_purchases(root, selectors)) {
            snapshot.in_app_purchases = value;
        }
        if let Some(value) = record(snapshot, extract::last_update(root, selectors)) {
            snapshot.last_update = value;
        }
        if let Some(value) = record(snapshot, extract::min_os_version(root, selectors)) {
            snapshot.requires_os_version = value;
        }
        if let Some(value) = record(snapshot, extract::current_version(root, selectors)) {
            snapshot.current_software_version = value;
        }
    }

    async fn apply_similar_plan(&self, plan: SimilarPlan, snapshot: &mut AppSnapshot) {
        match plan {
            SimilarPlan::Skip => {}
            SimilarPlan::Done { ids, fault } => {
                snapshot.similar_apps = ids;
                if let Some(fault) = fault {
                    snapshot.errors.push(fault.to_string());
                }
            }
            SimilarPlan::Fetch {
                href,
                fallback_ids,
                fallback_fault,
            } => match self.client.fetch_listing(&href).await {
                Ok(body) => {
                    let listing_doc = Html::parse_document(&body);
                    let children = similar::listing_children_in_doc(&listing_doc, &self.selectors);
                    let (ids, fault) = if children.is_empty() {
                        (fallback_ids, fallback_fault)
                    } else {
                        similar::collect_package_ids(&children, &self.selectors)
                    };
                    snapshot.similar_apps = ids;
                    if let Some(fault) = fault {
                        snapshot.errors.push(fault.to_string());
                    }
                }
                Err(error) => {
                    tracing::warn!(href, error = %error, "similar-apps listing fetch failed");
                    snapshot.errors.push(
                        Fault::network(
                            similar::FIELD,
                            format!("listing page fetch failed: {error}"),
                        )
                        .to_string(),
                    );
                    snapshot.similar_apps = fallback_ids;
                    if let Some(fault) = fallback_fault {
                        snapshot.errors.push(fault.to_string());
                    }
                }
            },
        }
    }

    fn capture_date_value(&self) -> i64 {
        let date = self
            .capture_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        normalize::date_to_yyyymmdd(date)
    }
}

/// Stores a successful outcome's value, or appends the fault to the log.
fn record<T>(snapshot: &mut AppSnapshot, outcome: Result<T, Fault>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(fault) => {
            snapshot.errors.push(fault.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawler_builds_with_default_config() {
        assert!(Crawler::new(CrawlerConfig::default()).is_ok());
    }

    #[test]
    fn crawler_rejects_a_broken_selector_table() {
        let config = CrawlerConfig {
            selector_table: SelectorTable {
                rating_value: "::bad::".to_owned(),
                ..SelectorTable::default()
            },
            ..CrawlerConfig::default()
        };
        let err = Crawler::new(config).unwrap_err();
        assert!(matches!(err, BuildError::InvalidSelector { name: "rating_value", .. }));
    }

    #[test]
    fn capture_date_override_is_used() {
        let config = CrawlerConfig {
            capture_date: NaiveDate::from_ymd_opt(2020, 1, 2),
            ..CrawlerConfig::default()
        };
        let crawler = Crawler::new(config).unwrap();
        let snapshot = crawler.extract(&Html::parse_document("<p></p>"), "com.x");
        assert_eq!(snapshot.date_crawled, 20_200_102);
    }
}
