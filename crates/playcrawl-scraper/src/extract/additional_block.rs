//! Extractors for the additional-information grid.
//!
//! Every entry here is addressed by fixed child index (see
//! [`crate::selectors::Positions`]); the value is always the text of the
//! last span below the entry, because the first span holds the entry's
//! label.

use scraper::ElementRef;

use crate::dom;
use crate::error::{ExtractionOutcome, Fault};
use crate::locate;
use crate::normalize;
use crate::selectors::Selectors;

/// Text of the last span below an additional-information entry.
fn last_span_text(
    entry: ElementRef<'_>,
    selectors: &Selectors,
    field: &'static str,
    position: usize,
) -> ExtractionOutcome<String> {
    let spans: Vec<ElementRef<'_>> = entry.select(&selectors.any_span).collect();
    let last = spans.last().copied().ok_or_else(|| {
        Fault::missing(
            field,
            format!(
                "{}. child of <{}> should contain at least one span at lower levels",
                position + 1,
                selectors.table.additional_container
            ),
        )
    })?;
    Ok(dom::text_of(last))
}

pub(crate) fn download_estimate(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<i64> {
    const FIELD: &str = "estimatedDownloadNumber";
    let position = selectors.positions().additional_downloads;
    let entry = locate::additional_child(root, selectors, position, FIELD)?;
    let text = last_span_text(entry, selectors, FIELD, position)?;
    if text.is_empty() {
        return Err(Fault::empty(
            FIELD,
            "the downloads entry doesn't contain a number of downloads",
        ));
    }
    normalize::parse_grouped_int(&text).ok_or_else(|| {
        Fault::parse(
            FIELD,
            format!("the downloads entry doesn't contain a number of downloads, it contains \"{text}\""),
        )
    })
}

pub(crate) fn last_update(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<i64> {
    const FIELD: &str = "lastUpdate";
    let position = selectors.positions().additional_last_update;
    let entry = locate::additional_child(root, selectors, position, FIELD)?;
    let text = last_span_text(entry, selectors, FIELD, position)?;
    if text.is_empty() {
        return Err(Fault::empty(
            FIELD,
            "the update entry should contain a date but is empty",
        ));
    }
    normalize::parse_long_date(&text).ok_or_else(|| {
        Fault::parse(
            FIELD,
            format!("the update entry doesn't contain a date, it contains \"{text}\""),
        )
    })
}

/// Minimum OS version. The literal "varies" label passes through
/// unchanged; a versioned value keeps its first token and gains a `+`
/// when qualifier words follow (`"4.1 and up"` → `"4.1+"`).
pub(crate) fn min_os_version(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<String> {
    const FIELD: &str = "requiresOsVersion";
    let position = selectors.positions().additional_min_os;
    let entry = locate::additional_child(root, selectors, position, FIELD)?;
    let text = last_span_text(entry, selectors, FIELD, position)?;
    if text.is_empty() {
        return Err(Fault::empty(
            FIELD,
            "the required-OS entry should contain a version but is empty",
        ));
    }
    if text == selectors.labels().varies_with_device {
        return Ok(text);
    }
    let mut parts = text.split_whitespace();
    let mut version = parts.next().unwrap_or_default().to_owned();
    if parts.next().is_some() {
        version.push('+');
    }
    Ok(version)
}

pub(crate) fn current_version(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<String> {
    const FIELD: &str = "currentSoftwareVersion";
    let position = selectors.positions().additional_current_version;
    let entry = locate::additional_child(root, selectors, position, FIELD)?;
    let text = last_span_text(entry, selectors, FIELD, position)?;
    if text.is_empty() {
        // The page sometimes leaves this cell blank; that is a known
        // value, not a fault.
        return Ok(selectors.labels().unknown_version.clone());
    }
    Ok(text)
}

/// Link to the developer page, from the last entry of the grid.
pub(crate) fn developer_link(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<String> {
    const FIELD: &str = "developerName";
    let children = locate::additional_children(root, selectors, FIELD)?;
    let last = children.last().copied().ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "<{}> in main information block \"additional information\" has no children",
                selectors.table.additional_container
            ),
        )
    })?;
    let link = dom::find_first(last, &selectors.any_link).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "the last child of <{}> should contain a link at some lower levels",
                selectors.table.additional_container
            ),
        )
    })?;
    match link.value().attr("href") {
        Some(href) if !href.is_empty() => Ok(href.to_owned()),
        _ => Err(Fault::empty(
            FIELD,
            format!(
                "the link in the last child of <{}> doesn't have a \"href\" attribute or it is empty",
                selectors.table.additional_container
            ),
        )),
    }
}
