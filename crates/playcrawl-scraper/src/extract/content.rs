//! Extractors for free-text content: description and "what's new".

use scraper::ElementRef;

use crate::dom::{self, ChildNode};
use crate::error::{ExtractionOutcome, Fault};
use crate::locate::{self, MainBlock};
use crate::selectors::Selectors;

pub(crate) fn description(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<String> {
    const FIELD: &str = "description";
    let block = dom::find_first(root, &selectors.description).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!("there is no <{}>", selectors.table.description),
        )
    })?;
    let inner = dom::find_first(block, &selectors.any_div).ok_or_else(|| {
        Fault::missing(
            FIELD,
            format!(
                "<{}> should contain a div some levels lower",
                selectors.table.description
            ),
        )
    })?;
    let text = dom::text_of(inner);
    if text.is_empty() {
        return Err(Fault::empty(
            FIELD,
            format!(
                "the first div below <{}> is empty",
                selectors.table.description
            ),
        ));
    }
    Ok(text)
}

/// Release-note entries from the what's-new block: the direct children of
/// its first span, one entry per line. Line-break elements and blank
/// lines are dropped; the markup pre-processing has already turned `<br>`
/// into newlines.
pub(crate) fn whats_new(
    root: ElementRef<'_>,
    selectors: &Selectors,
) -> ExtractionOutcome<Vec<String>> {
    const FIELD: &str = "whatsNew";
    let block = locate::main_block(root, selectors, MainBlock::WhatsNew, FIELD)?;
    let container = dom::find_first(block, &selectors.any_span).ok_or_else(|| {
        Fault::missing(
            FIELD,
            "main information block \"whats new\" should contain a span at some level below",
        )
    })?;

    let mut entries = Vec::new();
    for child in dom::children_with_text(container) {
        match child {
            ChildNode::Element(el) if el.value().name() == "br" => {}
            ChildNode::Element(el) => push_lines(&mut entries, &dom::text_of(el)),
            ChildNode::Text(text) => push_lines(&mut entries, text),
        }
    }
    Ok(entries)
}

fn push_lines(entries: &mut Vec<String>, text: &str) {
    for line in text.split('\n') {
        let line = line.trim();
        if !line.is_empty() {
            entries.push(line.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::SelectorTable;
    use scraper::Html;

    fn selectors() -> Selectors {
        Selectors::compile(SelectorTable::default()).expect("default table compiles")
    }

    fn root_of<'a>(doc: &'a Html, selectors: &Selectors) -> ElementRef<'a> {
        crate::locate::page_root(doc, selectors).expect("page root present")
    }

    #[test]
    fn description_reads_inner_div() {
        let doc = Html::parse_document(
            "<div class=\"LXrl4c\"><div itemprop=\"description\"><div>Offline maps.</div></div></div>",
        );
        let selectors = selectors();
        let value = description(root_of(&doc, &selectors), &selectors).unwrap();
        assert_eq!(value, "Offline maps.");
    }

    #[test]
    fn description_missing_inner_div_is_a_fault() {
        let doc = Html::parse_document(
            "<div class=\"LXrl4c\"><div itemprop=\"description\">bare text</div></div>",
        );
        let selectors = selectors();
        let err = description(root_of(&doc, &selectors), &selectors).unwrap_err();
        assert!(matches!(err, Fault::StructuralMissing { field: "description", .. }));
    }

    #[test]
    fn whats_new_splits_entries_on_newlines() {
        let html = r#"
            <div class="LXrl4c">
              <div><div><h2 class="Rm6Gwb">Reviews</h2></div><div>r</div></div>
              <div><div><h2 class="Rm6Gwb">What's New</h2></div><div><span>Faster map loading
New offline packs</span></div></div>
              <div><div><h2 class="Rm6Gwb">Additional</h2></div><div>a</div></div>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let selectors = selectors();
        let entries = whats_new(root_of(&doc, &selectors), &selectors).unwrap();
        assert_eq!(entries, vec!["Faster map loading", "New offline packs"]);
    }

    #[test]
    fn whats_new_skips_br_elements() {
        let html = r#"
            <div class="LXrl4c">
              <div><div><h2 class="Rm6Gwb">Reviews</h2></div><div>r</div></div>
              <div><div><h2 class="Rm6Gwb">What's New</h2></div><div><span>First<br>Second</span></div></div>
              <div><div><h2 class="Rm6Gwb">Additional</h2></div><div>a</div></div>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let selectors = selectors();
        let entries = whats_new(root_of(&doc, &selectors), &selectors).unwrap();
        assert_eq!(entries, vec!["First", "Second"]);
    }

    #[test]
    fn whats_new_without_span_is_a_fault() {
        let html = r#"
            <div class="LXrl4c">
              <div><div><h2 class="Rm6Gwb">Reviews</h2></div><div>r</div></div>
              <div><div><h2 class="Rm6Gwb">What's New</h2></div><div><div>no span</div></div></div>
              <div><div><h2 class="Rm6Gwb">Additional</h2></div><div>a</div></div>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let selectors = selectors();
        let err = whats_new(root_of(&doc, &selectors), &selectors).unwrap_err();
        assert!(matches!(err, Fault::StructuralMissing { field: "whatsNew", .. }));
    }
}
