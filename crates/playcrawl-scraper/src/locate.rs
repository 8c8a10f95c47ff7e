//! Locates the structural containers every field extractor depends on.
//!
//! Two of the contracts here are positional rather than semantic: the
//! three heading-anchored blocks are assigned by document order, and the
//! additional-information entries are consumed by fixed child index. Both
//! are brittle against upstream reordering; the indices live in the
//! selector table so a rotation is a one-line fix.

use scraper::{ElementRef, Html};

use crate::dom;
use crate::error::Fault;
use crate::selectors::Selectors;

/// The three heading-anchored main information blocks, by page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MainBlock {
    Review,
    WhatsNew,
    Additional,
}

impl MainBlock {
    fn label(self) -> &'static str {
        match self {
            MainBlock::Review => "review",
            MainBlock::WhatsNew => "whats new",
            MainBlock::Additional => "additional information",
        }
    }

    fn index(self, selectors: &Selectors) -> usize {
        let positions = selectors.positions();
        match self {
            MainBlock::Review => positions.block_review,
            MainBlock::WhatsNew => positions.block_whats_new,
            MainBlock::Additional => positions.block_additional,
        }
    }
}

/// The top-level content container. Absence is the single condition that
/// short-circuits the whole extractor set.
pub(crate) fn page_root<'a>(doc: &'a Html, selectors: &Selectors) -> Result<ElementRef<'a>, Fault> {
    doc.select(&selectors.page_root).next().ok_or_else(|| {
        Fault::missing(
            "page",
            format!(
                "page content not found, looking for <{}>; the page_root entry in the selector table may be stale",
                selectors.table.page_root
            ),
        )
    })
}

/// The app-info block holding name/category/price/badges. Two nested
/// lookups; the fault names whichever nesting level was missing.
pub(crate) fn app_block<'a>(
    root: ElementRef<'a>,
    selectors: &Selectors,
    field: &'static str,
) -> Result<ElementRef<'a>, Fault> {
    let container = dom::find_first(root, &selectors.app_container).ok_or_else(|| {
        Fault::missing(
            field,
            format!(
                "main information block \"app\" couldn't be found, looking for <{}>",
                selectors.table.app_container
            ),
        )
    })?;
    dom::find_first(container, &selectors.app_block).ok_or_else(|| {
        Fault::missing(
            field,
            format!(
                "main information block \"app\" should contain <{}>",
                selectors.table.app_block
            ),
        )
    })
}

/// All heading-anchored blocks: each heading marker walked up the
/// configured number of ancestor levels, in document order.
fn main_blocks<'a>(root: ElementRef<'a>, selectors: &Selectors) -> Vec<ElementRef<'a>> {
    root.select(&selectors.block_headline)
        .filter_map(|headline| dom::ancestor(headline, selectors.positions().headline_ancestor_levels))
        .collect()
}

/// The content of one main information block: the block at the position
/// assigned to `block`, then its configured content child.
///
/// Fewer headings than `min_main_blocks` means the whole group is
/// considered missing — a partial match cannot be trusted positionally.
pub(crate) fn main_block<'a>(
    root: ElementRef<'a>,
    selectors: &Selectors,
    block: MainBlock,
    field: &'static str,
) -> Result<ElementRef<'a>, Fault> {
    let positions = selectors.positions();
    let blocks = main_blocks(root, selectors);
    if blocks.len() < positions.min_main_blocks {
        return Err(Fault::missing(
            field,
            format!(
                "main information blocks couldn't be found, looking {} levels above <{}>",
                positions.headline_ancestor_levels, selectors.table.block_headline
            ),
        ));
    }

    let container = blocks[block.index(selectors)];
    dom::child_elements(container)
        .get(positions.block_content_child)
        .copied()
        .ok_or_else(|| {
            Fault::missing(
                field,
                format!(
                    "main information block \"{}\" should contain at least {} children",
                    block.label(),
                    positions.block_content_child + 1
                ),
            )
        })
}

/// The entries of the additional-information grid. At least
/// `min_additional_children` entries are required before any positional
/// index into them is trusted.
pub(crate) fn additional_children<'a>(
    root: ElementRef<'a>,
    selectors: &Selectors,
    field: &'static str,
) -> Result<Vec<ElementRef<'a>>, Fault> {
    let block = main_block(root, selectors, MainBlock::Additional, field)?;
    let container = dom::find_first(block, &selectors.additional_container).ok_or_else(|| {
        Fault::missing(
            field,
            format!(
                "there is no <{}> in main information block \"additional information\"",
                selectors.table.additional_container
            ),
        )
    })?;
    let children = dom::child_elements(container);
    if children.len() < selectors.positions().min_additional_children {
        return Err(Fault::missing(
            field,
            format!(
                "<{}> in main information block \"additional information\" should contain at least {} children",
                selectors.table.additional_container,
                selectors.positions().min_additional_children
            ),
        ));
    }
    Ok(children)
}

/// One additional-information entry by fixed position.
pub(crate) fn additional_child<'a>(
    root: ElementRef<'a>,
    selectors: &Selectors,
    position: usize,
    field: &'static str,
) -> Result<ElementRef<'a>, Fault> {
    let children = additional_children(root, selectors, field)?;
    children.get(position).copied().ok_or_else(|| {
        Fault::missing(
            field,
            format!(
                "there is no {}. child in <{}> in main information block \"additional information\"",
                position + 1,
                selectors.table.additional_container
            ),
        )
    })
}

/// The similar-apps region. Located on the whole document rather than the
/// page root: on some page variants it sits outside the main container.
pub(crate) fn similar_block<'a>(
    doc: &'a Html,
    selectors: &Selectors,
    field: &'static str,
) -> Result<ElementRef<'a>, Fault> {
    doc.select(&selectors.similar_container).next().ok_or_else(|| {
        Fault::missing(
            field,
            format!(
                "main information block \"similar apps\" couldn't be found, looking for <{}>",
                selectors.table.similar_container
            ),
        )
    })
}
