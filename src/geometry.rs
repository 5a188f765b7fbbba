//! Pure spacing accessors used for vertical space accounting.
//!
//! These read the resolved style only; they never touch box geometry, so
//! they stay valid across width changes.

use crate::model::Node;

/// Vertical padding + margin + border of a node. This is the spacing a
/// leaf contributes around its own content when measured at an arbitrary
/// width.
pub fn vertical_spacing(node: &Node) -> f64 {
    let style = &node.style;
    style.padding.vertical() + style.margin.vertical() + style.border_width.vertical()
}

/// Vertical padding + border only. Containers exclude margins from
/// width-aware estimates; the flow-layout engine accounts container
/// margins at the parent level.
pub fn vertical_padding_border(node: &Node) -> f64 {
    let style = &node.style;
    style.padding.vertical() + style.border_width.vertical()
}

/// Horizontal padding + border, used to derive a node's inner content
/// width from its box width.
pub fn horizontal_padding_border(node: &Node) -> f64 {
    let style = &node.style;
    style.padding.horizontal() + style.border_width.horizontal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::style::{Edges, Style};

    fn spaced_node() -> Node {
        Node::view(
            Style {
                padding: Edges::uniform(4.0),
                margin: Edges::uniform(3.0),
                border_width: Edges::uniform(1.0),
                ..Default::default()
            },
            vec![],
        )
    }

    #[test]
    fn vertical_spacing_sums_all_three() {
        assert_eq!(vertical_spacing(&spaced_node()), 8.0 + 6.0 + 2.0);
    }

    #[test]
    fn padding_border_excludes_margin() {
        assert_eq!(vertical_padding_border(&spaced_node()), 8.0 + 2.0);
        assert_eq!(horizontal_padding_border(&spaced_node()), 8.0 + 2.0);
    }
}
