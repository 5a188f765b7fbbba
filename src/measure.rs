//! # Width-Aware Height Estimation
//!
//! Initial layout runs at the full container width. The moment content
//! is considered for a narrower column, every cached `box_.height` is an
//! underestimate: text wraps into more lines, and containers grow with
//! their text. Distributing columns against stale heights causes
//! premature or missing splits, so all column accounting goes through
//! `height_at_width`, which answers "how tall would this subtree be at
//! that width?" without mutating anything.

use log::debug;

use crate::geometry::{vertical_padding_border, vertical_spacing};
use crate::model::{Node, NodeKind};
use crate::shape::{lines_height, TextShaper};

/// Height `node` would occupy if laid out at `width`. Pure; the tree is
/// not touched.
///
/// - Text is reshaped at `width` (cached lines are reused when they were
///   shaped at exactly this width) and measured as the line heights plus
///   the node's own spacing.
/// - Containers sum their children plus row gaps and their own
///   padding/border. Margins are excluded for containers — the flow
///   engine collapses container spacing at the parent level, and only
///   leaves carry margin into this estimate.
/// - Other leaves answer with their last resolved box height.
pub fn height_at_width(node: &Node, width: f64, shaper: &dyn TextShaper) -> f64 {
    if node.box_.height <= 0.0 {
        return 0.0;
    }

    match &node.kind {
        NodeKind::Text { shaped } => {
            if let Some(lines) = shaped.lines_at(width) {
                return lines_height(lines) + vertical_spacing(node);
            }
            match shaper.shape_text(node, width, f64::INFINITY) {
                Ok(lines) => lines_height(&lines) + vertical_spacing(node),
                Err(err) => {
                    debug!("height estimate falling back for text node: {err}");
                    match shaped.any_lines() {
                        Some(lines) => lines_height(lines) + vertical_spacing(node),
                        None => node.box_.height,
                    }
                }
            }
        }

        NodeKind::View | NodeKind::Page if !node.children.is_empty() => {
            let row_gap = node.style.row_gap;
            let count = node.children.len();
            let content: f64 = node
                .children
                .iter()
                .map(|child| height_at_width(child, width, shaper))
                .sum();
            let gaps = if count > 1 {
                (count - 1) as f64 * row_gap
            } else {
                0.0
            };
            content + gaps + vertical_padding_border(node)
        }

        _ => node.box_.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;
    use crate::shape::{ShapeError, ShapedLine, TextState};
    use crate::style::{Edges, Style};

    /// Shaper with fixed 10pt line height and 5pt glyph advance.
    struct GridShaper;

    impl TextShaper for GridShaper {
        fn shape_text(
            &self,
            node: &Node,
            width: f64,
            _max_height: f64,
        ) -> Result<Vec<ShapedLine>, ShapeError> {
            if width <= 0.0 {
                return Err(ShapeError("non-positive width".to_string()));
            }
            let text = node.text_content();
            let per_line = ((width / 5.0).floor() as usize).max(1);
            let chars: Vec<char> = text.chars().collect();
            Ok(chars
                .chunks(per_line)
                .map(|chunk| ShapedLine {
                    text: chunk.iter().collect(),
                    width: chunk.len() as f64 * 5.0,
                    height: 10.0,
                })
                .collect())
        }
    }

    fn sized_text(content: &str) -> Node {
        let mut node = Node::text(content, Style::default());
        node.box_ = Rect {
            top: 0.0,
            left: 0.0,
            width: 500.0,
            height: 10.0,
        };
        node
    }

    #[test]
    fn zero_height_nodes_measure_zero() {
        let node = Node::text("anything", Style::default());
        assert_eq!(height_at_width(&node, 50.0, &GridShaper), 0.0);
    }

    #[test]
    fn text_grows_when_narrowed() {
        // 20 chars: one 100pt line at full width, four lines at 25pt.
        let node = sized_text("aaaaaaaaaaaaaaaaaaaa");
        assert_eq!(height_at_width(&node, 500.0, &GridShaper), 10.0);
        assert_eq!(height_at_width(&node, 25.0, &GridShaper), 40.0);
    }

    #[test]
    fn text_spacing_is_added() {
        let mut node = sized_text("aaaa");
        node.style.padding = Edges::uniform(2.0);
        node.style.margin = Edges::uniform(1.0);
        assert_eq!(height_at_width(&node, 500.0, &GridShaper), 10.0 + 4.0 + 2.0);
    }

    #[test]
    fn cached_lines_win_over_reshaping() {
        let mut node = sized_text("aaaa");
        node = node.with_text_state(TextState::ShapedAt {
            width: 25.0,
            lines: vec![ShapedLine {
                text: "aa".to_string(),
                width: 10.0,
                height: 7.0,
            }],
        });
        // The cache holds one 7pt line; reshaping would give 10pt.
        assert_eq!(height_at_width(&node, 25.0, &GridShaper), 7.0);
    }

    #[test]
    fn shaping_failure_falls_back_to_box_height() {
        let node = sized_text("aaaa");
        assert_eq!(height_at_width(&node, -1.0, &GridShaper), 10.0);
    }

    #[test]
    fn shaping_failure_prefers_stale_lines() {
        let mut node = sized_text("aaaa");
        node = node.with_text_state(TextState::Stale {
            lines: vec![
                ShapedLine {
                    text: "aa".to_string(),
                    width: 10.0,
                    height: 9.0,
                },
                ShapedLine {
                    text: "aa".to_string(),
                    width: 10.0,
                    height: 9.0,
                },
            ],
        });
        assert_eq!(height_at_width(&node, -1.0, &GridShaper), 18.0);
    }

    #[test]
    fn container_sums_children_and_gaps() {
        let mut container = Node::view(
            Style {
                row_gap: 4.0,
                padding: Edges::uniform(3.0),
                margin: Edges::uniform(50.0), // must not count
                ..Default::default()
            },
            vec![sized_text("aaaaaaaaaa"), sized_text("aaaaaaaaaa")],
        );
        container.box_ = Rect {
            top: 0.0,
            left: 0.0,
            width: 500.0,
            height: 26.0,
        };
        // Two 10-char texts at width 25 -> 2 lines each -> 20 + 20,
        // plus one 4pt gap, plus 6pt vertical padding.
        assert_eq!(height_at_width(&container, 25.0, &GridShaper), 50.0);
    }

    #[test]
    fn estimate_is_pure() {
        let node = sized_text("aaaaaaaaaaaaaaaaaaaa");
        let before = node.clone();
        let _ = height_at_width(&node, 25.0, &GridShaper);
        assert_eq!(node.box_, before.box_);
        assert_eq!(node.text_state(), before.text_state());
    }
}
