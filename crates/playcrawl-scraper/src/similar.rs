//! Similar-apps resolution: the pure tree-scanning half.
//!
//! The listing of suggested apps may be inlined on the details page or
//! live behind a link to a dedicated cluster page. Scanning and candidate
//! enumeration are pure functions here; the optional secondary fetch is
//! orchestrated by [`crate::Crawler`], which owns the HTTP client.

use scraper::{ElementRef, Html};

use crate::dom;
use crate::error::Fault;
use crate::selectors::Selectors;

pub(crate) const FIELD: &str = "similarApps";

/// Result of scanning the details page for the similar-apps region.
#[derive(Debug)]
pub(crate) struct SimilarScan<'a> {
    /// The similar-apps container on the details page.
    pub(crate) block: ElementRef<'a>,
    /// Target of the "see more" link, when present and non-empty. The
    /// orchestrator fetches this page and prefers its listing.
    pub(crate) listing_href: Option<String>,
}

/// Locates the similar-apps container and its optional listing link.
pub(crate) fn scan<'a>(doc: &'a Html, selectors: &Selectors) -> Result<SimilarScan<'a>, Fault> {
    let block = crate::locate::similar_block(doc, selectors, FIELD)?;
    let listing_href = dom::find_first(block, &selectors.any_link)
        .and_then(|link| link.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_owned);
    Ok(SimilarScan { block, listing_href })
}

/// Candidate entries of a listing container found anywhere in `doc`
/// (used on the fetched cluster page).
pub(crate) fn listing_children_in_doc<'a>(
    doc: &'a Html,
    selectors: &Selectors,
) -> Vec<ElementRef<'a>> {
    doc.select(&selectors.similar_listing)
        .next()
        .map(dom::child_elements)
        .unwrap_or_default()
}

/// Candidate entries of a listing container inside the similar-apps
/// block itself (the inline fallback).
pub(crate) fn listing_children_in<'a>(
    block: ElementRef<'a>,
    selectors: &Selectors,
) -> Vec<ElementRef<'a>> {
    dom::find_first(block, &selectors.similar_listing)
        .map(dom::child_elements)
        .unwrap_or_default()
}

/// Collects package identifiers from candidate entries: each entry's
/// first link, its `href` query string, the value of the `id` parameter.
/// Deduplicates preserving first-seen order. A defective candidate
/// (missing link, missing query string) contributes one aggregated fault
/// without aborting the scan.
pub(crate) fn collect_package_ids(
    candidates: &[ElementRef<'_>],
    selectors: &Selectors,
) -> (Vec<String>, Option<Fault>) {
    let mut ids: Vec<String> = Vec::new();
    let mut fault: Option<Fault> = None;

    for candidate in candidates {
        let Some(link) = dom::find_first(*candidate, &selectors.any_link) else {
            fault = Some(Fault::missing(
                FIELD,
                "an app suggestion doesn't contain a link to the app",
            ));
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            fault = Some(Fault::missing(
                FIELD,
                "the link to an app suggestion doesn't contain a \"href\" attribute",
            ));
            continue;
        };
        let Some((_, query)) = href.split_once('?') else {
            fault = Some(Fault::parse(
                FIELD,
                "the \"href\" attribute of the link to an app suggestion doesn't contain GET parameters",
            ));
            continue;
        };
        for parameter in query.split('&') {
            if let Some(("id", value)) = parameter.split_once('=') {
                if !value.is_empty() && !ids.iter().any(|known| known.as_str() == value) {
                    ids.push(value.to_owned());
                }
            }
        }
    }

    (ids, fault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::{SelectorTable, Selectors};

    fn selectors() -> Selectors {
        Selectors::compile(SelectorTable::default()).expect("default table compiles")
    }

    fn listing_doc(entries: &str) -> Html {
        Html::parse_document(&format!(
            "<div class=\"Ktdaqe\"><div class=\"ZmHEEd\">{entries}</div></div>"
        ))
    }

    #[test]
    fn collects_ids_deduplicated_in_first_seen_order() {
        let doc = listing_doc(
            r#"
            <div><a href="/store/apps/details?id=com.a"></a></div>
            <div><a href="/store/apps/details?id=com.b"></a></div>
            <div><a href="/store/apps/details?id=com.a"></a></div>
            "#,
        );
        let selectors = selectors();
        let children = listing_children_in_doc(&doc, &selectors);
        let (ids, fault) = collect_package_ids(&children, &selectors);
        assert_eq!(ids, vec!["com.a", "com.b"]);
        assert!(fault.is_none());
    }

    #[test]
    fn id_is_read_from_multi_parameter_query() {
        let doc = listing_doc(r#"<div><a href="/store/apps/details?hl=en&id=com.x"></a></div>"#);
        let selectors = selectors();
        let children = listing_children_in_doc(&doc, &selectors);
        let (ids, _) = collect_package_ids(&children, &selectors);
        assert_eq!(ids, vec!["com.x"]);
    }

    #[test]
    fn candidate_without_link_contributes_one_fault() {
        let doc = listing_doc(
            r#"
            <div><span>no link</span></div>
            <div><a href="/store/apps/details?id=com.a"></a></div>
            "#,
        );
        let selectors = selectors();
        let children = listing_children_in_doc(&doc, &selectors);
        let (ids, fault) = collect_package_ids(&children, &selectors);
        assert_eq!(ids, vec!["com.a"], "scan must continue past the defect");
        assert!(matches!(fault, Some(Fault::StructuralMissing { .. })));
    }

    #[test]
    fn href_without_query_contributes_a_parse_fault() {
        let doc = listing_doc(r#"<div><a href="/store/apps/details"></a></div>"#);
        let selectors = selectors();
        let children = listing_children_in_doc(&doc, &selectors);
        let (ids, fault) = collect_package_ids(&children, &selectors);
        assert!(ids.is_empty());
        assert!(matches!(fault, Some(Fault::ParseFailure { .. })));
    }

    #[test]
    fn scan_reports_missing_container() {
        let doc = Html::parse_document("<div class=\"other\"></div>");
        let err = scan(&doc, &selectors()).unwrap_err();
        assert!(matches!(err, Fault::StructuralMissing { field: "similarApps", .. }));
    }

    #[test]
    fn scan_finds_listing_link() {
        let doc = Html::parse_document(
            r#"<div class="Ktdaqe"><a href="/store/apps/collection/cluster?clp=abc">More</a></div>"#,
        );
        let found = scan(&doc, &selectors()).unwrap();
        assert_eq!(
            found.listing_href.as_deref(),
            Some("/store/apps/collection/cluster?clp=abc")
        );
    }

    #[test]
    fn scan_without_link_has_no_listing_href() {
        let doc = Html::parse_document(r#"<div class="Ktdaqe"><span>inline only</span></div>"#);
        let found = scan(&doc, &selectors()).unwrap();
        assert!(found.listing_href.is_none());
    }

    #[test]
    fn inline_listing_is_scoped_to_the_similar_block() {
        let doc = Html::parse_document(
            r#"
            <div class="Ktdaqe">
              <a href="/store/apps/collection/cluster?clp=abc">More</a>
              <div class="ZmHEEd">
                <div><a href="/store/apps/details?id=com.inline"></a></div>
              </div>
            </div>
            "#,
        );
        let selectors = selectors();
        let found = scan(&doc, &selectors).unwrap();
        let children = listing_children_in(found.block, &selectors);
        let (ids, fault) = collect_package_ids(&children, &selectors);
        assert_eq!(ids, vec!["com.inline"]);
        assert!(fault.is_none());
    }
}
