//! # Node Splitting
//!
//! The recursive heart of pagination: given a vertical cut height, split
//! an arbitrary node (and its subtree) into the part that stays on the
//! current page and the part that continues on the next.
//!
//! One `split` operation serves both the page-level and the column-level
//! case, parameterized by an optional column-width override. Text leaves
//! delegate to the line-accurate text splitter; containers split their
//! shell cheaply and recurse into their children; multi-column
//! containers hand their children to the column distributor with this
//! same `split` bound as the distributor's split function, so nested
//! splittable content inside a column is itself recursively splittable.

pub(crate) mod columns;
pub(crate) mod text;

use log::{debug, warn};

use crate::geometry::horizontal_padding_border;
use crate::model::Node;
use crate::shape::TextShaper;
use crate::style::{AlignItems, FlexDirection};

use columns::{distribute_columns, wrap_columns};
use text::split_text;

/// Prevents splitting elements over sub-point float noise.
pub(crate) const SAFETY_THRESHOLD: f64 = 0.001;

/// Summed visible height of the following siblings that start above the
/// cut line, clamped at the cut. This is what "presence ahead" means for
/// `min_presence_ahead`: how much content would actually show up below a
/// node before the page ends.
fn presence_ahead(nodes: &[Node], height: f64) -> f64 {
    let mut result = 0.0;
    for node in nodes {
        if height > node.box_.top && node.box_.height > 0.0 {
            result += node.box_.height.min(height - node.box_.top);
        }
    }
    result
}

/// Should `child` be pushed past the boundary instead of being placed
/// or split here?
///
/// Fixed nodes never break. Otherwise: an explicit `break` prop, an
/// unsatisfied `min_presence_ahead`, or a straddling node that is not
/// allowed to wrap. The deferred copy always has its break flag cleared
/// by the caller, so a break is honored exactly once.
pub(crate) fn should_node_break(child: &Node, future: &[Node], height: f64) -> bool {
    if child.is_fixed() {
        return false;
    }
    let straddles = height < child.top() + child.box_.height;
    let can_wrap = child.wrappable();
    let presence = presence_ahead(future, height);
    let presence_short = presence < child.props.min_presence_ahead;

    child.props.break_before || presence_short || (straddles && !can_wrap)
}

/// Cheap positional split of a node shell: same node twice, with the
/// geometry divided at the cut and the decoration stripped on the cut
/// side. Children are left untouched; callers reassign them.
fn split_node_shell(node: &Node, height: f64) -> (Node, Node) {
    let node_top = node.top();

    let mut current = node.clone();
    current.box_.height = height - node_top;
    current.style = current.style.without_bottom_decoration();

    let mut next = node.clone();
    next.box_.top = 0.0;
    next.box_.height = node.box_.height - (height - node_top);
    next.style = next.style.without_top_decoration();

    (current, next)
}

/// Column width for a multi-column container, or 0 when no usable width
/// is known. A container narrower than its own gaps yields a
/// non-positive width, which callers treat as "skip columning".
fn column_width(node: &Node, container_width: Option<f64>, columns: usize, gap: f64) -> f64 {
    let parent_width = node.box_.width;
    let fallback = container_width.filter(|w| *w > 0.0).unwrap_or(0.0);
    let effective = if parent_width > 0.0 {
        parent_width
    } else {
        fallback
    };
    if effective > 0.0 {
        (effective - gap * (columns - 1) as f64) / columns as f64
    } else {
        0.0
    }
}

/// Rewrite a container as a horizontal row of its column wrappers.
fn into_column_row(base: Node, wrappers: Vec<Node>, gap: f64) -> Node {
    let mut row = base.with_children(wrappers);
    row.style.flex_direction = FlexDirection::Row;
    row.style.column_gap = gap;
    row.style.align_items = AlignItems::FlexStart;
    row
}

/// Distribute a fitting multi-column container into its column layout.
/// Used when the container does not overflow the boundary at all.
fn transform_view_to_columns(
    node: &Node,
    available_height: f64,
    content_area: f64,
    shaper: &dyn TextShaper,
    container_width: Option<f64>,
) -> Node {
    let columns = node.props.columns();
    let gap = node.props.column_gap();
    let col_width = column_width(node, container_width, columns, gap);
    if col_width <= 0.0 {
        return node.clone();
    }

    let mut split_fn = |child: &Node, h: f64, area: f64| {
        split(child, h, area, shaper, Some(col_width), Some(col_width))
    };
    let dist = distribute_columns(
        available_height,
        content_area,
        columns,
        col_width,
        node.children.clone(),
        &mut split_fn,
        shaper,
    );
    if !dist.overflow.is_empty() {
        debug!("column transform of a fitting container produced overflow");
    }

    into_column_row(node.clone(), wrap_columns(node, dist.columns, col_width), gap)
}

fn split_view(
    node: &Node,
    height: f64,
    content_area: f64,
    shaper: &dyn TextShaper,
    container_width: Option<f64>,
) -> (Node, Node) {
    let (current_shell, next_shell) = split_node_shell(node, height);

    let columns = node.props.columns();
    if node.is_view() && columns > 1 {
        let gap = node.props.column_gap();
        let col_width = column_width(node, container_width, columns, gap);
        if col_width > 0.0 {
            let available = height - node.top();
            let mut split_fn = |child: &Node, h: f64, area: f64| {
                split(child, h, area, shaper, Some(col_width), Some(col_width))
            };
            let dist = distribute_columns(
                available,
                content_area,
                columns,
                col_width,
                node.children.clone(),
                &mut split_fn,
                shaper,
            );

            let current =
                into_column_row(current_shell, wrap_columns(node, dist.columns, col_width), gap);
            let next = next_shell.with_children(dist.overflow);
            return (current, next);
        }
    }

    let available = height - node.top();
    let (current_children, next_children) =
        split_nodes(available, content_area, node.children.clone(), shaper, None);

    (
        current_shell.with_children(current_children),
        next_shell.with_children(next_children),
    )
}

/// Split `node` at the cut `height` into (current page part, next page
/// part).
///
/// `col_width` is set when splitting inside a column context: text is
/// then reshaped at the column width and `height` is already a relative
/// space rather than a cut line. At page level text splits against its
/// own content width and the cut is relative to the node's top.
pub(crate) fn split(
    node: &Node,
    height: f64,
    content_area: f64,
    shaper: &dyn TextShaper,
    col_width: Option<f64>,
    container_width: Option<f64>,
) -> (Node, Node) {
    if node.is_text() {
        return match col_width {
            Some(width) => split_text(node, width, height, shaper),
            None => {
                let content_width = (node.box_.width - horizontal_padding_border(node)).max(0.0);
                split_text(node, content_width, height - node.top(), shaper)
            }
        };
    }
    split_view(node, height, content_area, shaper, container_width)
}

/// Classify one page's child list against a cut line.
///
/// Walks the children in order, peeling everything above the cut into
/// the current list and everything below into the next, carrying `fixed`
/// siblings onto both sides of any cut and splitting whatever straddles
/// it. Returns (current children, next children).
pub(crate) fn split_nodes(
    height: f64,
    content_area: f64,
    nodes: Vec<Node>,
    shaper: &dyn TextShaper,
    container_width: Option<f64>,
) -> (Vec<Node>, Vec<Node>) {
    let mut current: Vec<Node> = Vec::new();
    let mut next: Vec<Node> = Vec::new();

    for i in 0..nodes.len() {
        let child = &nodes[i];
        let future = &nodes[i + 1..];
        let future_fixed: Vec<Node> = future.iter().filter(|n| n.is_fixed()).cloned().collect();

        let node_top = child.top();
        let node_height = child.box_.height;
        let is_outside = height <= node_top;
        let breaks = should_node_break(child, future, height);
        let straddles = height + SAFETY_THRESHOLD < node_top + node_height;
        let can_wrap = child.wrappable();
        let fits_inside_page = node_height <= content_area;

        if child.is_fixed() {
            next.push(child.clone());
            current.push(child.clone());
            continue;
        }

        if is_outside {
            next.push(child.shifted_up(height));
            continue;
        }

        if !fits_inside_page && !can_wrap {
            warn!("node is taller than the content area and can't wrap between pages; placing it anyway");
            current.push(child.clone());
            next.extend(future.iter().cloned());
            break;
        }

        if breaks {
            let mut deferred = child.shifted_up(height);
            deferred.props.wrap = Some(true);
            deferred.props.break_before = false;

            current.extend(future_fixed);
            next.push(deferred);
            next.extend(future.iter().cloned());
            break;
        }

        // Multi-column containers are handled before the generic split:
        // their pre-column box height overestimates the height they need
        // and would trigger premature page splits.
        if child.is_view() && child.props.columns() > 1 {
            let columns = child.props.columns();
            let gap = child.props.column_gap();
            let col_width = column_width(child, container_width, columns, gap);

            if col_width <= 0.0 {
                debug!("degenerate column width; laying container out as a single block");
                current.push(child.clone());
                continue;
            }

            let mut split_fn = |ch: &Node, h: f64, area: f64| {
                split(ch, h, area, shaper, Some(col_width), Some(col_width))
            };
            let dist = distribute_columns(
                height - node_top,
                content_area,
                columns,
                col_width,
                child.children.clone(),
                &mut split_fn,
                shaper,
            );

            if !dist.overflow.is_empty() {
                let current_view = into_column_row(
                    child.clone(),
                    wrap_columns(child, dist.columns, col_width),
                    gap,
                );
                let mut next_view = child.with_children(dist.overflow);
                next_view.box_.top = 0.0;

                current.push(current_view);
                current.extend(future_fixed);
                next.push(next_view);
                next.extend(future.iter().cloned());
                break;
            }

            current.push(transform_view_to_columns(
                child,
                height - node_top,
                content_area,
                shaper,
                container_width,
            ));
            continue;
        }

        if straddles {
            let (current_child, next_child) =
                split(child, height, content_area, shaper, None, container_width);

            // The split moved every child to the next page: an empty
            // shell on the current page helps nobody. Defer the whole
            // container — unless the page is otherwise empty, in which
            // case there is nowhere better for it.
            if !child.children.is_empty() && current_child.children.is_empty() {
                if current.is_empty() {
                    current.push(child.clone());
                    current.extend(future_fixed);
                    next.extend(future.iter().cloned());
                } else {
                    current.extend(future_fixed);
                    next.push(child.shifted_up(height));
                    next.extend(future.iter().cloned());
                }
                break;
            }

            current.push(current_child);
            next.push(next_child);
            continue;
        }

        current.push(child.clone());
    }

    (current, next)
}
