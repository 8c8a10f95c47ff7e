//! Extractors for the app-info block: identity, price, and badges.

use scraper::ElementRef;

use crate::dom::{self, ChildNode};
use crate::error::{ExtractionOutcome, Fault};
use crate::locate;
use crate::normalize::{self, ParsedPrice};
use crate::selectors::Selectors;

pub(crate) fn app_name(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<String> {
    const FIELD: &str = "appName";
    let block = locate::app_block(root, selectors, FIELD)?;
    let headline = dom::find_first(block, &selectors.app_name).ok_or_else(|| {
        Fault::missing(FIELD, format!("there is no <{}>", selectors.table.app_name))
    })?;
    let span = dom::find_first(headline, &selectors.any_span).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!("there is no span inside of <{}>", selectors.table.app_name),
        )
    })?;
    let name = dom::text_of(span);
    if name.is_empty() {
        return Err(Fault::empty(
            FIELD,
            format!("the span inside of <{}> is empty", selectors.table.app_name),
        ));
    }
    Ok(name)
}

pub(crate) fn category(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<String> {
    const FIELD: &str = "category";
    let block = locate::app_block(root, selectors, FIELD)?;
    let element = dom::find_first(block, &selectors.category).ok_or_else(|| {
        Fault::missing(FIELD, format!("there is no <{}>", selectors.table.category))
    })?;
    let category = dom::text_of(element);
    if category.is_empty() {
        return Err(Fault::empty(
            FIELD,
            format!("<{}> is empty", selectors.table.category),
        ));
    }
    Ok(category)
}

/// The age/content-rating label: the configured child of the badge region
/// must hold an image whose `alt` attribute carries the label.
pub(crate) fn content_rating(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<String> {
    const FIELD: &str = "usk";
    let block = locate::app_block(root, selectors, FIELD)?;
    let region = dom::find_first(block, &selectors.content_rating).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "there is no <{}> in main information block \"app\"",
                selectors.table.content_rating
            ),
        )
    })?;
    let badge_index = selectors.positions().content_rating_child;
    let badge = dom::child_elements(region)
        .get(badge_index)
        .copied()
        .ok_or_else(|| {
            Fault::missing(
                FIELD,
                format!(
                    "there should be at least {} children in <{}>",
                    badge_index + 1,
                    selectors.table.content_rating
                ),
            )
        })?;
    let image = dom::find_first(badge, &selectors.any_img).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "child {} of <{}> should contain an image some levels lower",
                badge_index + 1,
                selectors.table.content_rating
            ),
        )
    })?;
    let label = image.value().attr("alt").unwrap_or("").trim().to_owned();
    if label.is_empty() {
        return Err(Fault::empty(
            FIELD,
            format!(
                "the alt of the image in <{}> is empty",
                selectors.table.content_rating
            ),
        ));
    }
    Ok(label)
}

/// Price tier, amount, and currency symbol from the price meta tag's
/// `content` attribute. A missing attribute is a structural fault; an
/// unparseable amount is not — the tier is still reported.
pub(crate) fn price(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<ParsedPrice> {
    const FIELD: &str = "price";
    let block = locate::app_block(root, selectors, FIELD)?;
    let meta = dom::find_first(block, &selectors.price).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "there is no <{}> in main information block \"app\"",
                selectors.table.price
            ),
        )
    })?;
    let content = meta.value().attr("content").ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "<{}> should carry a \"content\" attribute",
                selectors.table.price
            ),
        )
    })?;
    Ok(normalize::parse_price_content(content))
}

/// Editor's-choice badge: presence of the marker element alone. A missing
/// app block is a fault; a missing marker is simply `false`.
pub(crate) fn top_developer(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<bool> {
    let block = locate::app_block(root, selectors, "topDeveloper")?;
    Ok(dom::find_first(block, &selectors.top_developer_badge).is_some())
}

pub(crate) fn contains_ads(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<bool> {
    badge_with_label(root, selectors, "containsAds", &selectors.labels().contains_ads)
}

pub(crate) fn in_app_purchases(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<bool> {
    badge_with_label(
        root,
        selectors,
        "inAppPurchases",
        &selectors.labels().in_app_purchases,
    )
}

/// Ads and in-app-purchase notices share one badge class and differ only
/// by their literal text. The badge container being absent is a fault;
/// the label being absent inside present badges is an ordinary `false` —
/// a badge is optional, the container is not.
fn badge_with_label(
    root: ElementRef<'_>,
    selectors: &Selectors,
    field: &'static str,
    label: &str,
) -> ExtractionOutcome<bool> {
    let block = locate::app_block(root, selectors, field)?;
    let badges: Vec<ElementRef<'_>> = block.select(&selectors.monetization_badge).collect();
    if badges.is_empty() {
        return Err(Fault::missing(
            field,
            format!(
                "there is no <{}> in main information block \"app\"",
                selectors.table.monetization_badge
            ),
        ));
    }

    for badge in badges {
        if dom::text_of(badge) == label {
            return Ok(true);
        }
        let matched = dom::children_with_text(badge).into_iter().any(|child| match child {
            ChildNode::Text(text) => text.trim() == label,
            ChildNode::Element(el) => dom::text_of(el) == label,
        });
        if matched {
            return Ok(true);
        }
    }
    Ok(false)
}
