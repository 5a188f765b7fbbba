//! # Pagination Driver
//!
//! Walks the document's authored pages and expands each into as many
//! physical pages as its content requires: resolve dynamic content for
//! the page number at hand, split the child list at the wrap boundary,
//! re-run flow layout on both halves, and repeat on the remainder until
//! nothing is left (or the page ceiling trips).
//!
//! Once every physical page exists, a second pass re-resolves dynamic
//! content with the final counts — total pages, and each page's position
//! within its authored page — so "Page 3 of 7" style content comes out
//! right without guessing during the first pass.

pub(crate) mod dynamic;

use log::warn;

use crate::error::PaginateError;
use crate::model::{Node, NodeKind, PageContext};
use crate::shape::{FlowLayout, TextShaper};
use crate::split::split_nodes;

use dynamic::{has_dynamic, resolve_dynamic};

/// Hard ceiling on physical pages produced from one authored page.
/// Guards against non-converging layouts looping forever.
pub const MAX_PAGES: usize = 1000;

/// A physical page plus its position within the authored page that
/// produced it. Only the driver needs this; the node tree never carries
/// it.
struct SubPage {
    node: Node,
    number: usize,
    total: usize,
}

fn page_height(page: &Node) -> f64 {
    page.style.height.unwrap_or(page.box_.height)
}

/// The cut line for page content: everything at or below it moves on.
/// Measured from the page origin, so only the bottom padding comes off.
fn wrap_area(page: &Node) -> f64 {
    page_height(page) - page.style.padding.bottom
}

/// Usable content height between the page's vertical padding. The
/// largest height any single unsplittable node can hope to occupy.
fn content_area(page: &Node) -> f64 {
    page_height(page) - page.style.padding.vertical()
}

/// Inner width available to page content.
fn content_width(page: &Node) -> f64 {
    let width = page.style.width.unwrap_or(page.box_.width);
    (width - page.style.padding.horizontal()).max(0.0)
}

/// Resolve the page's dynamic content for `ctx` and re-run layout, or
/// hand the page back untouched when nothing in it is dynamic.
///
/// `renumber` selects the lighter layout pass used by the final
/// numbering sweep.
fn resolve_dynamic_page(
    ctx: &PageContext,
    page: &Node,
    layout: &dyn FlowLayout,
    renumber: bool,
) -> Node {
    if !has_dynamic(page) {
        return page.clone();
    }
    let resolved = resolve_dynamic(ctx, page);
    let width = content_width(page);
    if renumber {
        layout.renumber(resolved, width)
    } else {
        layout.relayout(resolved, width)
    }
}

/// Split one page at its wrap boundary into the physical page that is
/// done and, when content remains, the page that continues it.
///
/// The continuation drops the bookmark (one outline entry per authored
/// page) and its resolved height, so layout recomputes it fresh. A
/// remainder consisting solely of `fixed` nodes is discarded — fixed
/// content exists to accompany real content, not to spawn pages of its
/// own.
fn split_page(
    page: &Node,
    page_number: usize,
    shaper: &dyn TextShaper,
    layout: &dyn FlowLayout,
) -> (Node, Option<Node>) {
    let wrap = wrap_area(page);
    let content = content_area(page);
    let width = content_width(page);
    let height = page_height(page);

    let ctx = PageContext {
        page_number,
        ..Default::default()
    };
    let resolved = resolve_dynamic_page(&ctx, page, layout, false);

    let (current_children, next_children) =
        split_nodes(wrap, content, resolved.children, shaper, Some(width));

    let mut current = page.with_children(current_children);
    current.box_.height = height;
    let current = layout.relayout(current, width);

    if next_children.is_empty() || next_children.iter().all(|n| n.is_fixed()) {
        return (current, None);
    }

    let mut next = page.with_children(next_children);
    next.box_.height = 0.0;
    next.props.bookmark = None;
    let next = layout.relayout(next, width);

    (current, Some(next))
}

/// Expand one authored page into its physical pages.
fn paginate_page(
    page: &Node,
    page_number: usize,
    shaper: &dyn TextShaper,
    layout: &dyn FlowLayout,
) -> Vec<Node> {
    if page.props.wrap == Some(false) {
        let ctx = PageContext {
            page_number,
            ..Default::default()
        };
        return vec![resolve_dynamic_page(&ctx, page, layout, false)];
    }

    let (first, mut remainder) = split_page(page, page_number, shaper, layout);
    let mut pages = vec![first];

    while let Some(next) = remainder {
        if pages.len() >= MAX_PAGES {
            warn!("max pages limit ({MAX_PAGES}) reached, stopping pagination");
            break;
        }
        let (current, rest) = split_page(&next, page_number + pages.len(), shaper, layout);
        pages.push(current);
        remainder = rest;
    }

    pages
}

fn validate(root: &Node) -> Result<(), PaginateError> {
    if !matches!(root.kind, NodeKind::Document) {
        return Err(PaginateError::NotADocument(root.kind_name()));
    }
    for (index, child) in root.children.iter().enumerate() {
        if !matches!(child.kind, NodeKind::Page) {
            return Err(PaginateError::ExpectedPage {
                index,
                kind: child.kind_name(),
            });
        }
        let height = content_area(child);
        if height < 0.0 {
            return Err(PaginateError::InvalidContentHeight { index, height });
        }
    }
    Ok(())
}

/// Paginate a laid-out document.
///
/// Consumes a `Document` whose children are `Page` nodes carrying
/// resolved geometry for their own content width, and returns a new
/// document whose children are the physical pages, with dynamic content
/// resolved against final page counts.
pub fn paginate(
    root: &Node,
    layout: &dyn FlowLayout,
    shaper: &dyn TextShaper,
) -> Result<Node, PaginateError> {
    validate(root)?;

    let mut sub_pages: Vec<SubPage> = Vec::new();
    let mut page_number = 1;

    for page in &root.children {
        let expanded = paginate_page(page, page_number, shaper, layout);
        page_number += expanded.len();
        let total = expanded.len();
        sub_pages.extend(
            expanded
                .into_iter()
                .enumerate()
                .map(|(i, node)| SubPage {
                    node,
                    number: i + 1,
                    total,
                }),
        );
    }

    let total_pages = sub_pages.len();
    let pages: Vec<Node> = sub_pages
        .into_iter()
        .enumerate()
        .map(|(i, sub)| {
            let ctx = PageContext {
                page_number: i + 1,
                total_pages: Some(total_pages),
                sub_page_number: Some(sub.number),
                sub_page_total_pages: Some(sub.total),
            };
            resolve_dynamic_page(&ctx, &sub.node, layout, true)
        })
        .collect();

    Ok(root.with_children(pages))
}
