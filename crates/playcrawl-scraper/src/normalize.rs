//! Shared, stateless value normalizers.
//!
//! Everything the field extractors need to turn page text into typed
//! values lives here: the style-attribute tokenizer, the human-formatted
//! integer parser, the long-form date parser, the proportional percentage
//! rounder, and the currency-tagged price parser. All functions are pure
//! and unit-tested without any document structure.

use chrono::NaiveDate;

/// Units a style declaration value may carry. Order matters: `rem` must be
/// tried before `em` so `"1rem"` does not tokenize as unit `em`.
const STYLE_UNITS: [&str; 4] = ["%", "px", "rem", "em"];

/// One tokenized style declaration, e.g. `"width: 42px"` →
/// `name = "width"`, `value = "42"`, `unit = "px"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProperty {
    pub name: String,
    pub value: String,
    pub unit: String,
}

impl StyleProperty {
    /// The numeric value, or 0 when the value is not an integer.
    #[must_use]
    pub fn value_as_int(&self) -> i64 {
        self.value.parse::<i64>().unwrap_or(0)
    }
}

/// Tokenizes a single `name: value[unit]` declaration. Returns `None`
/// when there is no `:` separator.
#[must_use]
pub fn parse_style_declaration(declaration: &str) -> Option<StyleProperty> {
    let (name, raw_value) = declaration.trim().split_once(':')?;
    let mut value = raw_value.trim().to_owned();
    let mut unit = String::new();
    for candidate in STYLE_UNITS {
        if value.contains(candidate) {
            value = value.replace(candidate, "");
            unit = candidate.to_owned();
            break;
        }
    }
    Some(StyleProperty {
        name: name.trim().to_owned(),
        value: value.trim().to_owned(),
        unit,
    })
}

/// Splits a full `style` attribute on `;` and tokenizes each declaration.
#[must_use]
pub fn parse_style_attribute(style: &str) -> Vec<StyleProperty> {
    style
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .filter_map(parse_style_declaration)
        .collect()
}

/// Parses a human-formatted integer such as `"10,000+"` or `"1.234.567"`:
/// grouping separators (`,`, `.`) and a trailing `+` are dropped before
/// parsing. Returns `None` when no integer remains.
#[must_use]
pub fn parse_grouped_int(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('+')
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();
    cleaned.trim().parse::<i64>().ok()
}

/// Parses a long-form English date (`"January 2, 2020"`) into a
/// `YYYYMMDD` integer. Returns `None` for anything else.
#[must_use]
pub fn parse_long_date(raw: &str) -> Option<i64> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let date = NaiveDate::parse_from_str(&collapsed, "%B %e, %Y").ok()?;
    Some(date_to_yyyymmdd(date))
}

/// Formats a date as a `YYYYMMDD` integer. Computed numerically, so this
/// can never fail — the capture-date path must not be able to crash the
/// process.
#[must_use]
pub fn date_to_yyyymmdd(date: NaiveDate) -> i64 {
    use chrono::Datelike;
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

/// Rescales five proportional widths into integer percentages summing to
/// 100 ± 1 per bucket of rounding drift. A zero sum yields all-zero
/// buckets; the caller decides whether that is a fault.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn scale_to_percentages(widths: [i64; 5]) -> [i64; 5] {
    let sum: i64 = widths.iter().sum();
    if sum == 0 {
        return [0; 5];
    }
    widths.map(|width| (width as f64 / sum as f64 * 100.0).round() as i64)
}

/// Price tier labels used in the snapshot's `price` field.
pub const TIER_FREE: &str = "free";
pub const TIER_PAID: &str = "paid";

/// Parsed form of the price `content` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    /// `"free"` or `"paid"`.
    pub tier: String,
    pub value: f64,
    /// Currency symbol as displayed; empty for free apps.
    pub currency: String,
}

/// Parses the currency-tagged price attribute.
///
/// `"0"` means free. An empty attribute means paid-but-unpriced (the page
/// withholds the amount). Otherwise the first character is the currency
/// symbol, the remainder is read as the amount with comma decimal
/// separators tolerated; an unparseable amount degrades to 0 without
/// being a fault — the tier is still meaningful.
#[must_use]
pub fn parse_price_content(content: &str) -> ParsedPrice {
    if content == "0" {
        return ParsedPrice {
            tier: TIER_FREE.to_owned(),
            value: 0.0,
            currency: String::new(),
        };
    }
    if content.is_empty() {
        return ParsedPrice {
            tier: TIER_PAID.to_owned(),
            value: 0.0,
            currency: String::new(),
        };
    }

    let currency: String = content.chars().take(1).collect();
    let remainder = content.split(&currency).nth(1).unwrap_or("");
    let value = remainder.replace(',', ".").trim().parse::<f64>().unwrap_or(0.0);
    ParsedPrice {
        tier: TIER_PAID.to_owned(),
        value,
        currency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_style_declaration / parse_style_attribute
    // -----------------------------------------------------------------------

    #[test]
    fn style_declaration_with_px_unit() {
        let prop = parse_style_declaration("width: 42px").expect("parses");
        assert_eq!(prop.name, "width");
        assert_eq!(prop.value, "42");
        assert_eq!(prop.unit, "px");
        assert_eq!(prop.value_as_int(), 42);
    }

    #[test]
    fn style_declaration_with_percent_unit() {
        let prop = parse_style_declaration("width: 61%").expect("parses");
        assert_eq!(prop.unit, "%");
        assert_eq!(prop.value_as_int(), 61);
    }

    #[test]
    fn style_declaration_rem_is_not_tokenized_as_em() {
        let prop = parse_style_declaration("margin: 2rem").expect("parses");
        assert_eq!(prop.unit, "rem");
        assert_eq!(prop.value, "2");
    }

    #[test]
    fn style_declaration_without_unit() {
        let prop = parse_style_declaration("z-index: 3").expect("parses");
        assert_eq!(prop.unit, "");
        assert_eq!(prop.value_as_int(), 3);
    }

    #[test]
    fn style_declaration_without_colon_is_none() {
        assert!(parse_style_declaration("width").is_none());
    }

    #[test]
    fn style_declaration_non_numeric_value_is_zero() {
        let prop = parse_style_declaration("display: block").expect("parses");
        assert_eq!(prop.value_as_int(), 0);
    }

    #[test]
    fn style_attribute_splits_declarations() {
        let props = parse_style_attribute("width: 10px; height: 4px;");
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, "width");
        assert_eq!(props[1].name, "height");
    }

    // -----------------------------------------------------------------------
    // parse_grouped_int
    // -----------------------------------------------------------------------

    #[test]
    fn grouped_int_with_comma_and_plus() {
        assert_eq!(parse_grouped_int("10,000+"), Some(10_000));
    }

    #[test]
    fn grouped_int_large_value() {
        assert_eq!(parse_grouped_int("1,234,567+"), Some(1_234_567));
    }

    #[test]
    fn grouped_int_with_dot_separators() {
        assert_eq!(parse_grouped_int("1.234.567"), Some(1_234_567));
    }

    #[test]
    fn grouped_int_plain_number() {
        assert_eq!(parse_grouped_int("12345"), Some(12_345));
    }

    #[test]
    fn grouped_int_surrounding_whitespace() {
        assert_eq!(parse_grouped_int("  5,000+  "), Some(5_000));
    }

    #[test]
    fn grouped_int_no_numeric_content_is_none() {
        assert_eq!(parse_grouped_int("Varies with device"), None);
        assert_eq!(parse_grouped_int(""), None);
    }

    // -----------------------------------------------------------------------
    // parse_long_date / date_to_yyyymmdd
    // -----------------------------------------------------------------------

    #[test]
    fn long_date_parses_single_digit_day() {
        assert_eq!(parse_long_date("January 2, 2020"), Some(20_200_102));
    }

    #[test]
    fn long_date_parses_double_digit_day() {
        assert_eq!(parse_long_date("December 31, 2019"), Some(20_191_231));
    }

    #[test]
    fn long_date_tolerates_extra_whitespace() {
        assert_eq!(parse_long_date("  January  2,  2020 "), Some(20_200_102));
    }

    #[test]
    fn long_date_unparseable_is_none() {
        assert_eq!(parse_long_date("Updated recently"), None);
        assert_eq!(parse_long_date(""), None);
    }

    #[test]
    fn yyyymmdd_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(date_to_yyyymmdd(date), 20_260_807);
    }

    // -----------------------------------------------------------------------
    // scale_to_percentages
    // -----------------------------------------------------------------------

    #[test]
    fn percentages_already_summing_to_100_are_unchanged() {
        assert_eq!(
            scale_to_percentages([10, 20, 30, 25, 15]),
            [10, 20, 30, 25, 15]
        );
    }

    #[test]
    fn percentages_are_rescaled_to_100() {
        let scaled = scale_to_percentages([10, 20, 30, 25, 15].map(|w| w * 2));
        assert_eq!(scaled, [10, 20, 30, 25, 15]);
    }

    #[test]
    fn rescaled_sum_stays_within_rounding_drift() {
        let scaled = scale_to_percentages([1, 1, 1, 0, 0]);
        let sum: i64 = scaled.iter().sum();
        assert!((95..=105).contains(&sum), "sum {sum} outside drift bound");
    }

    #[test]
    fn zero_sum_yields_all_zero_buckets() {
        assert_eq!(scale_to_percentages([0; 5]), [0; 5]);
    }

    // -----------------------------------------------------------------------
    // parse_price_content
    // -----------------------------------------------------------------------

    #[test]
    fn price_zero_is_free() {
        let price = parse_price_content("0");
        assert_eq!(price.tier, TIER_FREE);
        assert_eq!(price.value, 0.0);
        assert_eq!(price.currency, "");
    }

    #[test]
    fn price_empty_is_paid_without_amount() {
        let price = parse_price_content("");
        assert_eq!(price.tier, TIER_PAID);
        assert_eq!(price.value, 0.0);
        assert_eq!(price.currency, "");
    }

    #[test]
    fn price_dollar_amount() {
        let price = parse_price_content("$4.99");
        assert_eq!(price.tier, TIER_PAID);
        assert_eq!(price.currency, "$");
        assert!((price.value - 4.99).abs() < f64::EPSILON);
    }

    #[test]
    fn price_euro_comma_decimal() {
        let price = parse_price_content("€4,99");
        assert_eq!(price.currency, "€");
        assert!((price.value - 4.99).abs() < f64::EPSILON);
    }

    #[test]
    fn price_unparseable_amount_degrades_to_zero() {
        let price = parse_price_content("$n/a");
        assert_eq!(price.tier, TIER_PAID);
        assert_eq!(price.currency, "$");
        assert_eq!(price.value, 0.0);
    }
}
