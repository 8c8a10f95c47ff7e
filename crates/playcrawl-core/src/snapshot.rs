//! The structured result of one app-page extraction pass.
//!
//! Field names are the wire contract: downstream consumers index into the
//! serialized form by these exact keys, so renames here are breaking.

use serde::{Deserialize, Serialize};

/// Platform label stamped on every snapshot. The crawler only understands
/// the Google Play storefront, so this never varies per page.
pub const PLATFORM_ANDROID: &str = "ANDROID";

/// One extracted app-page snapshot.
///
/// A snapshot is always complete in shape: extraction never fails as a
/// whole. Fields that could not be extracted stay at their zero value and
/// the reason is appended to [`errors`](Self::errors), one entry per
/// failed field, in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub name: String,
    pub package_name: String,
    /// Capture date as a `YYYYMMDD` integer, e.g. `20260807`.
    pub date_crawled: i64,
    pub category: String,
    /// Age/content-rating label shown on the page, e.g. `"USK: All ages"`.
    pub usk: String,
    /// Price tier: `"free"`, `"paid"`, or empty when extraction failed.
    pub price: String,
    pub price_value: f64,
    /// Currency symbol as displayed, e.g. `"$"`. Empty for free apps.
    pub price_currency: String,
    pub description: String,
    pub whats_new: Vec<String>,
    /// Average star rating, 0–5.
    pub rating: f64,
    /// Total number of ratings.
    pub stars_count: i64,
    pub count_per_rating: RatingDistribution,
    pub estimated_download_number: i64,
    /// Link to the developer page, as found in the `href` attribute.
    #[serde(rename = "developer")]
    pub developer_name: String,
    pub top_developer: bool,
    pub contains_ads: bool,
    #[serde(rename = "in_app_purchase")]
    pub in_app_purchases: bool,
    /// Last-update date as a `YYYYMMDD` integer; `0` when unknown.
    pub last_update: i64,
    pub os: String,
    pub requires_os_version: String,
    pub current_software_version: String,
    /// Related package identifiers, deduplicated, first-seen order.
    pub similar_apps: Vec<String>,
    /// Human-readable fault log, one entry per failed field.
    pub errors: Vec<String>,
}

impl AppSnapshot {
    /// A zero-valued snapshot for the given package, with the platform
    /// label and capture date already stamped.
    #[must_use]
    pub fn new(package_name: &str, date_crawled: i64) -> Self {
        Self {
            name: String::new(),
            package_name: package_name.to_owned(),
            date_crawled,
            category: String::new(),
            usk: String::new(),
            price: String::new(),
            price_value: 0.0,
            price_currency: String::new(),
            description: String::new(),
            whats_new: Vec::new(),
            rating: 0.0,
            stars_count: 0,
            count_per_rating: RatingDistribution::default(),
            estimated_download_number: 0,
            developer_name: String::new(),
            top_developer: false,
            contains_ads: false,
            in_app_purchases: false,
            last_update: 0,
            os: PLATFORM_ANDROID.to_owned(),
            requires_os_version: String::new(),
            current_software_version: String::new(),
            similar_apps: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Best-effort bot-challenge classification: when the page yields none
    /// of the three identity fields, the response was probably a captcha
    /// interstitial rather than a genuinely empty listing.
    ///
    /// This is inferred, not signaled by the page, so it is exposed as
    /// derived metadata instead of an error code in the serialized form.
    #[must_use]
    pub fn likely_blocked(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.developer_name.is_empty()
    }
}

/// Five-bucket rating distribution in integer percentages.
///
/// Values are derived from proportional bar widths on the page, never from
/// raw counts, and are rescaled so the buckets sum to 100 ± 1 per bucket
/// of rounding drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    #[serde(rename = "5")]
    pub five: i64,
    #[serde(rename = "4")]
    pub four: i64,
    #[serde(rename = "3")]
    pub three: i64,
    #[serde(rename = "2")]
    pub two: i64,
    #[serde(rename = "1")]
    pub one: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snapshot_is_zero_valued_except_identity() {
        let snapshot = AppSnapshot::new("com.example.app", 20260807);
        assert_eq!(snapshot.package_name, "com.example.app");
        assert_eq!(snapshot.date_crawled, 20260807);
        assert_eq!(snapshot.os, PLATFORM_ANDROID);
        assert!(snapshot.name.is_empty());
        assert!(snapshot.errors.is_empty());
        assert_eq!(snapshot.count_per_rating, RatingDistribution::default());
    }

    #[test]
    fn likely_blocked_when_all_identity_fields_empty() {
        let snapshot = AppSnapshot::new("com.example.app", 20260807);
        assert!(snapshot.likely_blocked());
    }

    #[test]
    fn not_blocked_when_any_identity_field_present() {
        let mut snapshot = AppSnapshot::new("com.example.app", 20260807);
        snapshot.description = "A calculator.".to_owned();
        assert!(!snapshot.likely_blocked());
    }

    #[test]
    fn serializes_with_wire_contract_field_names() {
        let mut snapshot = AppSnapshot::new("com.example.app", 20260807);
        snapshot.developer_name = "/store/apps/dev?id=123".to_owned();
        snapshot.in_app_purchases = true;
        snapshot.count_per_rating.five = 60;

        let value = serde_json::to_value(&snapshot).expect("snapshot serializes");
        assert_eq!(value["developer"], "/store/apps/dev?id=123");
        assert_eq!(value["in_app_purchase"], true);
        assert_eq!(value["count_per_rating"]["5"], 60);
        assert_eq!(value["package_name"], "com.example.app");
        assert_eq!(value["os"], "ANDROID");
    }

    #[test]
    fn round_trips_through_json() {
        let mut snapshot = AppSnapshot::new("com.example.app", 20260807);
        snapshot.similar_apps = vec!["com.a".to_owned(), "com.b".to_owned()];
        snapshot.errors = vec!["rating: missing".to_owned()];

        let json = serde_json::to_string(&snapshot).expect("serializes");
        let back: AppSnapshot = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, snapshot);
    }
}
