//! Extractors for the review block: average rating, rating count, and the
//! five-bucket distribution.

use playcrawl_core::RatingDistribution;
use scraper::ElementRef;

use crate::dom;
use crate::error::{ExtractionOutcome, Fault};
use crate::locate::{self, MainBlock};
use crate::normalize;
use crate::selectors::Selectors;

pub(crate) fn rating(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<f64> {
    const FIELD: &str = "rating";
    let block = locate::main_block(root, selectors, MainBlock::Review, FIELD)?;
    let container = dom::find_first(block, &selectors.rating_value).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "there is no <{}> inside of main information block \"review\"",
                selectors.table.rating_value
            ),
        )
    })?;
    let text = dom::text_of(container);
    if text.is_empty() {
        return Err(Fault::empty(
            FIELD,
            format!("<{}> is empty", selectors.table.rating_value),
        ));
    }
    text.parse::<f64>().map_err(|_| {
        Fault::parse(
            FIELD,
            format!(
                "<{}> is not a number and contains \"{text}\"",
                selectors.table.rating_value
            ),
        )
    })
}

/// Total number of ratings: the second child of the count container holds
/// the grouped integer.
pub(crate) fn ratings_count(root: ElementRef<'_>, selectors: &Selectors) -> ExtractionOutcome<i64> {
    const FIELD: &str = "starsCount";
    let block = locate::main_block(root, selectors, MainBlock::Review, FIELD)?;
    let container = dom::find_first(block, &selectors.ratings_count).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "there is no <{}> inside of main information block \"review\"",
                selectors.table.ratings_count
            ),
        )
    })?;
    let value_element = dom::child_elements(container).get(1).copied().ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "<{}> should contain at least 2 children",
                selectors.table.ratings_count
            ),
        )
    })?;
    let text = dom::text_of(value_element);
    if text.is_empty() {
        return Err(Fault::empty(
            FIELD,
            format!("<{}> is empty", selectors.table.ratings_count),
        ));
    }
    normalize::parse_grouped_int(&text).ok_or_else(|| {
        Fault::parse(
            FIELD,
            format!(
                "<{}> is not an integer and contains \"{text}\"",
                selectors.table.ratings_count
            ),
        )
    })
}

/// The five-bucket distribution. Each bucket row names its star count in
/// the first cell and carries the proportional bar width in the second
/// cell's `style` attribute; the widths are rescaled into percentages.
/// All-zero widths would divide by zero in the rescaler, so that case is
/// reported as a fault and the field stays at its zero value.
pub(crate) fn rating_distribution(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<RatingDistribution> {
    const FIELD: &str = "countPerRating";
    let block = locate::main_block(root, selectors, MainBlock::Review, FIELD)?;
    let container = dom::find_first(block, &selectors.rating_distribution).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "there is no <{}> in main information block \"review\"",
                selectors.table.rating_distribution
            ),
        )
    })?;
    let rows = dom::child_elements(container);
    if rows.len() < selectors.positions().min_distribution_buckets {
        return Err(Fault::missing(
            FIELD,
            format!(
                "<{}> in main information block \"review\" should have at least {} children",
                selectors.table.rating_distribution,
                selectors.positions().min_distribution_buckets
            ),
        ));
    }

    let mut widths = [0_i64; 5];
    for row in rows {
        let cells = dom::child_elements(row);
        let (Some(label_cell), Some(bar_cell)) = (cells.first(), cells.get(1)) else {
            return Err(Fault::missing(
                FIELD,
                format!(
                    "child of <{}> in main information block \"review\" should have at least 2 children",
                    selectors.table.rating_distribution
                ),
            ));
        };
        let bucket = dom::text_of(*label_cell);
        if bucket.is_empty() {
            return Err(Fault::empty(FIELD, "a bucket row doesn't contain a star label"));
        }
        let Some(style) = bar_cell.value().attr("style") else {
            continue;
        };
        let Some(width) = normalize::parse_style_attribute(style)
            .into_iter()
            .find(|property| property.name == "width")
        else {
            continue;
        };
        match bucket.as_str() {
            "1" => widths[0] = width.value_as_int(),
            "2" => widths[1] = width.value_as_int(),
            "3" => widths[2] = width.value_as_int(),
            "4" => widths[3] = width.value_as_int(),
            "5" => widths[4] = width.value_as_int(),
            _ => {}
        }
    }

    if widths.iter().sum::<i64>() == 0 {
        return Err(Fault::empty(FIELD, "all rating bucket widths are zero"));
    }

    let percentages = normalize::scale_to_percentages(widths);
    Ok(RatingDistribution {
        one: percentages[0],
        two: percentages[1],
        three: percentages[2],
        four: percentages[3],
        five: percentages[4],
    })
}
