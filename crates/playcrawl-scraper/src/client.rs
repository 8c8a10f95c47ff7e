//! HTTP client for the storefront's app-details and cluster pages.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FetchError;

/// Locale appended to every details-page request; extraction rules assume
/// English labels and date formats.
const LANG: &str = "en";

const DETAILS_PATH: &str = "/store/apps/details";

/// HTTP client for storefront pages.
///
/// Carries explicit request and connect timeouts so a stalled upstream
/// can never pin a crawl, and a configurable base URL so tests can point
/// it at a local mock server. The inner `reqwest::Client` is pooled and
/// safe to share across concurrent crawls.
#[derive(Debug, Clone)]
pub struct PlayStoreClient {
    client: Client,
    base_url: Url,
}

impl PlayStoreClient {
    /// Creates a client with the given storefront root, timeout, and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` does not parse,
    /// or [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base_url })
    }

    /// Builds the details-page URL for a package,
    /// e.g. `https://play.google.com/store/apps/details?id=com.x&hl=en`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL cannot take the
    /// details path.
    pub fn app_page_url(&self, package: &str) -> Result<String, FetchError> {
        let mut url = self.base_url.join(DETAILS_PATH).map_err(|e| FetchError::InvalidUrl {
            url: self.base_url.to_string(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("id", package)
            .append_pair("hl", LANG);
        Ok(url.to_string())
    }

    /// Fetches and pre-processes the details page of one package.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] — network or TLS failure, or timeout.
    /// - [`FetchError::UnexpectedStatus`] — any non-2xx response.
    pub async fn fetch_app_page(&self, package: &str) -> Result<String, FetchError> {
        let url = self.app_page_url(package)?;
        let body = self.fetch(&url).await?;
        Ok(preprocess_markup(&body))
    }

    /// Fetches a linked listing page. `href` may be absolute or
    /// root-relative, as found on the details page.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_app_page`](Self::fetch_app_page), plus
    /// [`FetchError::InvalidUrl`] when the href cannot be resolved
    /// against the storefront root.
    pub async fn fetch_listing(&self, href: &str) -> Result<String, FetchError> {
        let url = self.base_url.join(href).map_err(|e| FetchError::InvalidUrl {
            url: href.to_owned(),
            reason: e.to_string(),
        })?;
        self.fetch(url.as_str()).await
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "fetching storefront page");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Pre-processing applied to the raw details-page markup before parsing:
/// `<br>` becomes a newline so release notes keep their line structure,
/// and bold tags are dropped so text nodes stay contiguous.
pub(crate) fn preprocess_markup(raw: &str) -> String {
    raw.replace("<br>", "\n").replace("<b>", "").replace("</b>", "")
}
