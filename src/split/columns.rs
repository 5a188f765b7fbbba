//! # Column Distribution
//!
//! Greedy first-fit distribution of sibling nodes into a fixed number of
//! equal-width columns, plus the builder that wraps each column's
//! content into a synthetic fixed-width container.
//!
//! Distribution is deliberately iterative: a work queue of pending
//! children and an array of per-column height accumulators, with a
//! cursor that only ever moves forward. Splitting pushes the leftover
//! fragment back onto the front of the queue targeting the next column,
//! so the queue only grows by strictly smaller remainders and the
//! algorithm always terminates.

use std::collections::VecDeque;

use log::warn;

use crate::geometry::vertical_spacing;
use crate::measure::height_at_width;
use crate::model::{Node, NodeKind};
use crate::shape::TextShaper;
use crate::style::FlexDirection;

use super::{should_node_break, SAFETY_THRESHOLD};

/// Result of distributing children into columns: per-column content in
/// fill order, plus whatever overflows past the last column.
#[derive(Debug, Default)]
pub struct Distribution {
    pub columns: Vec<Vec<Node>>,
    pub overflow: Vec<Node>,
}

/// Splits one child against a remaining space and a full column height,
/// returning the (current, continuation) fragments.
pub(crate) type SplitFn<'a> = dyn FnMut(&Node, f64, f64) -> (Node, Node) + 'a;

/// Distribute `nodes` into `columns` columns of `col_width`, filling
/// left to right and never revisiting a column once the cursor has moved
/// past it.
///
/// Heights are always measured at column width — the children arrive
/// from a full-width layout, and trusting their boxes here would
/// under-count. `fixed` children land in column 0 *and* in overflow so
/// they repeat in every resulting context. A `break` child terminates
/// distribution and sends everything remaining to overflow.
///
/// Every input child ends up in exactly one of {a column, overflow};
/// nothing is duplicated (beyond `fixed` repetition) or dropped.
pub(crate) fn distribute_columns(
    available_height: f64,
    _content_area: f64,
    columns: usize,
    col_width: f64,
    nodes: Vec<Node>,
    split_fn: &mut SplitFn,
    shaper: &dyn TextShaper,
) -> Distribution {
    let mut cols: Vec<Vec<Node>> = vec![Vec::new(); columns];
    let mut col_heights = vec![0.0_f64; columns];
    let mut overflow: Vec<Node> = Vec::new();

    let mut col_index = 0usize;
    let mut pending: VecDeque<Node> = nodes.into();

    while let Some(child) = pending.pop_front() {
        if child.is_fixed() {
            cols[0].push(child.clone());
            overflow.push(child);
            continue;
        }

        // Cursor ran past the last column (a continuation fragment from
        // a split there): everything else belongs to the next page.
        if col_index >= columns {
            overflow.push(child);
            continue;
        }

        let node_height = height_at_width(&child, col_width, shaper);

        let future = pending.make_contiguous();
        if should_node_break(&child, future, available_height) {
            let mut next = child.shifted_up(available_height);
            next.props.wrap = Some(true);
            next.props.break_before = false;
            overflow.push(next);

            // Fixed siblings still repeat on the current page.
            for node in pending.iter().filter(|node| node.is_fixed()) {
                cols[0].push(node.clone());
            }
            overflow.extend(pending.drain(..));
            break;
        }

        let mut placed = false;
        let mut c = col_index;
        while c < columns {
            let remaining = available_height - col_heights[c];

            if node_height <= remaining + SAFETY_THRESHOLD {
                col_heights[c] += node_height;
                cols[c].push(child.clone());
                col_index = c;
                placed = true;
                break;
            }

            if child.wrappable() {
                // Text splits against line space; the node's own spacing
                // is not available to lines.
                let split_space = if child.is_text() {
                    (remaining - vertical_spacing(&child)).max(0.0)
                } else {
                    remaining
                };
                let (current_part, next_part) = split_fn(&child, split_space, available_height);

                if current_part.box_.height > 0.0 {
                    col_heights[c] += height_at_width(&current_part, col_width, shaper);
                    cols[c].push(current_part);
                    placed = true;
                    if next_part.box_.height > 0.0 || !next_part.children.is_empty() {
                        pending.push_front(next_part);
                        col_index = c + 1;
                    }
                    break;
                }
                // Empty split (orphan rule left nothing): fall through
                // and retry the whole child in the next column, so a
                // non-fitting zero split is never attempted twice in
                // the same place.
            }

            if c == columns - 1 {
                warn!(
                    "node exceeds available column height and produced no placeable fragment; \
                     moving it whole to overflow"
                );
                overflow.push(child.clone());
                placed = true;
                break;
            }

            c += 1;
        }

        if !placed {
            overflow.push(child);
        }
    }

    Distribution {
        columns: cols,
        overflow,
    }
}

/// Wrap each column's children into a vertical container of fixed
/// width, ready to be laid out as one cell of a horizontal row.
///
/// Cached text lines in the subtree are invalidated so the next layout
/// pass reshapes at the column width. The wrapper copies the parent's
/// props and style minus everything that must not recurse: the column
/// props themselves (a column of columns would re-trigger distribution)
/// and the flex factors (fixed-width columns are not negotiable).
pub(crate) fn wrap_columns(parent: &Node, columns: Vec<Vec<Node>>, col_width: f64) -> Vec<Node> {
    columns
        .into_iter()
        .map(|children| {
            let children: Vec<Node> = children.into_iter().map(invalidate_text_lines).collect();

            let mut props = parent.props.clone();
            props.wrap = Some(true);
            props.columns = None;
            props.column_gap = None;

            let mut style = parent.style.clone();
            style.width = Some(col_width);
            style.flex_direction = FlexDirection::Column;
            style.flex_grow = None;
            style.flex_basis = None;
            style.flex_shrink = Some(0.0);

            let mut wrapper = Node::view(style, children);
            wrapper.props = props;
            wrapper
        })
        .collect()
}

fn invalidate_text_lines(node: Node) -> Node {
    if let NodeKind::Text { shaped } = &node.kind {
        let state = shaped.clone().invalidate();
        return node.with_text_state(state);
    }
    if node.children.is_empty() {
        return node;
    }
    let children = node
        .children
        .iter()
        .cloned()
        .map(invalidate_text_lines)
        .collect();
    node.with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;
    use crate::shape::{ShapeError, ShapedLine, TextState};
    use crate::style::Style;

    /// Leaf shaper for tests that never involve live reshaping.
    struct NoShaper;

    impl TextShaper for NoShaper {
        fn shape_text(
            &self,
            _node: &Node,
            _width: f64,
            _max_height: f64,
        ) -> Result<Vec<ShapedLine>, ShapeError> {
            Err(ShapeError("no shaping in this test".to_string()))
        }
    }

    fn block(id: &str, height: f64) -> Node {
        let mut node = Node::view(Style::default(), vec![]);
        node.props.id = Some(id.to_string());
        node.props.wrap = Some(false);
        node.box_ = Rect {
            top: 0.0,
            left: 0.0,
            width: 400.0,
            height,
        };
        node
    }

    fn no_split(_: &Node, _: f64, _: f64) -> (Node, Node) {
        panic!("split_fn must not be called for unsplittable children");
    }

    fn ids(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|n| n.props.id.clone())
            .collect()
    }

    #[test]
    fn fills_columns_in_order() {
        // Spec scenario: 5 blocks of 30 into 2 columns of height 100.
        let children: Vec<Node> = (1..=5).map(|i| block(&format!("c{i}"), 30.0)).collect();
        let dist = distribute_columns(
            100.0,
            100.0,
            2,
            100.0,
            children,
            &mut no_split,
            &NoShaper,
        );

        assert_eq!(ids(&dist.columns[0]), ["c1", "c2", "c3"]);
        assert_eq!(ids(&dist.columns[1]), ["c4", "c5"]);
        assert!(dist.overflow.is_empty());
    }

    #[test]
    fn no_child_skips_an_unfilled_earlier_column() {
        // Equal-height children, both columns tall enough for 2 each.
        let children: Vec<Node> = (1..=4).map(|i| block(&format!("c{i}"), 40.0)).collect();
        let dist =
            distribute_columns(80.0, 80.0, 2, 100.0, children, &mut no_split, &NoShaper);
        assert_eq!(ids(&dist.columns[0]), ["c1", "c2"]);
        assert_eq!(ids(&dist.columns[1]), ["c3", "c4"]);
    }

    #[test]
    fn overflow_past_last_column() {
        let children: Vec<Node> = (1..=5).map(|i| block(&format!("c{i}"), 60.0)).collect();
        let dist =
            distribute_columns(100.0, 100.0, 2, 100.0, children, &mut no_split, &NoShaper);
        assert_eq!(ids(&dist.columns[0]), ["c1"]);
        assert_eq!(ids(&dist.columns[1]), ["c2"]);
        assert_eq!(ids(&dist.overflow), ["c3", "c4", "c5"]);
    }

    #[test]
    fn conservation_no_loss_no_duplication() {
        let heights = [15.0, 80.0, 33.0, 70.0, 5.0, 120.0, 42.0];
        let children: Vec<Node> = heights
            .iter()
            .enumerate()
            .map(|(i, h)| block(&format!("c{i}"), *h))
            .collect();
        let dist =
            distribute_columns(90.0, 90.0, 3, 100.0, children, &mut no_split, &NoShaper);

        let mut seen: Vec<String> = dist.columns.iter().flat_map(|c| ids(c)).collect();
        seen.extend(ids(&dist.overflow));
        seen.sort();
        let mut expected: Vec<String> = (0..heights.len()).map(|i| format!("c{i}")).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn fixed_children_repeat_in_column_zero_and_overflow() {
        let mut header = block("header", 20.0);
        header.props.fixed = true;
        let children = vec![header, block("c1", 30.0), block("c2", 30.0)];
        let dist =
            distribute_columns(100.0, 100.0, 2, 100.0, children, &mut no_split, &NoShaper);
        assert_eq!(ids(&dist.columns[0]), ["header", "c1", "c2"]);
        assert_eq!(ids(&dist.overflow), ["header"]);
    }

    #[test]
    fn break_child_terminates_distribution() {
        let mut breaker = block("breaker", 30.0);
        breaker.props.break_before = true;
        let children = vec![block("c1", 30.0), breaker, block("c3", 30.0)];
        let dist =
            distribute_columns(100.0, 100.0, 2, 100.0, children, &mut no_split, &NoShaper);

        assert_eq!(ids(&dist.columns[0]), ["c1"]);
        assert!(dist.columns[1].is_empty());
        assert_eq!(ids(&dist.overflow), ["breaker", "c3"]);
        // The deferred copy must not re-break on the next pass.
        assert!(!dist.overflow[0].props.break_before);
        assert_eq!(dist.overflow[0].props.wrap, Some(true));
    }

    #[test]
    fn splittable_child_splits_across_columns() {
        // One splittable 90pt child into 2 columns of 50: the split_fn
        // hands back a 50/40 pair.
        let mut tall = block("tall", 90.0);
        tall.props.wrap = None; // splittable again
        let children = vec![tall];

        let mut split_calls = 0;
        let mut split_fn = |node: &Node, space: f64, _area: f64| {
            split_calls += 1;
            let mut current = node.clone();
            current.box_.height = space;
            current.props.id = Some("tall-a".to_string());
            let mut next = node.clone();
            next.box_.top = 0.0;
            next.box_.height = node.box_.height - space;
            next.props.id = Some("tall-b".to_string());
            (current, next)
        };

        let dist =
            distribute_columns(50.0, 50.0, 2, 100.0, children, &mut split_fn, &NoShaper);
        assert_eq!(split_calls, 1);
        assert_eq!(ids(&dist.columns[0]), ["tall-a"]);
        assert_eq!(ids(&dist.columns[1]), ["tall-b"]);
        assert!(dist.overflow.is_empty());
    }

    #[test]
    fn empty_split_falls_through_to_next_column() {
        // split_fn returns an empty current part (orphan rule): the
        // whole child must move on instead of looping in place.
        let mut stubborn = block("stubborn", 60.0);
        stubborn.props.wrap = None;
        let children = vec![block("c1", 30.0), stubborn];

        let mut split_fn = |node: &Node, _space: f64, _area: f64| {
            let mut empty = node.clone();
            empty.box_.height = 0.0;
            (empty.clone(), empty)
        };

        let dist =
            distribute_columns(60.0, 60.0, 2, 100.0, children, &mut split_fn, &NoShaper);
        assert_eq!(ids(&dist.columns[0]), ["c1"]);
        assert_eq!(ids(&dist.columns[1]), ["stubborn"]);
        assert!(dist.overflow.is_empty());
    }

    #[test]
    fn unplaceable_child_goes_whole_to_overflow() {
        let children = vec![block("giant", 500.0)];
        let dist =
            distribute_columns(100.0, 100.0, 2, 100.0, children, &mut no_split, &NoShaper);
        assert!(dist.columns.iter().all(|c| c.is_empty()));
        assert_eq!(ids(&dist.overflow), ["giant"]);
    }

    #[test]
    fn wrappers_fix_width_and_strip_column_props() {
        let mut parent = Node::view(
            Style {
                flex_grow: Some(1.0),
                ..Default::default()
            },
            vec![],
        );
        parent.props.columns = Some(2);
        parent.props.column_gap = Some(12.0);

        let wrappers = wrap_columns(&parent, vec![vec![block("a", 10.0)], vec![]], 150.0);
        assert_eq!(wrappers.len(), 2);
        for w in &wrappers {
            assert!(w.is_view());
            assert_eq!(w.style.width, Some(150.0));
            assert_eq!(w.style.flex_shrink, Some(0.0));
            assert_eq!(w.style.flex_grow, None);
            assert_eq!(w.props.columns, None);
            assert_eq!(w.props.column_gap, None);
            assert_eq!(w.props.wrap, Some(true));
        }
        assert_eq!(ids(&wrappers[0].children), ["a"]);
    }

    #[test]
    fn wrapping_invalidates_cached_lines() {
        let text = Node::text("body", Style::default()).with_text_state(TextState::ShapedAt {
            width: 400.0,
            lines: vec![ShapedLine {
                text: "body".to_string(),
                width: 20.0,
                height: 10.0,
            }],
        });
        let parent = Node::view(Style::default(), vec![]);
        let wrappers = wrap_columns(&parent, vec![vec![text]], 150.0);
        let state = wrappers[0].children[0].text_state().unwrap();
        assert!(matches!(state, TextState::Stale { .. }));
    }
}
