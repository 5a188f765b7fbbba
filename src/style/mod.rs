//! # Style Model
//!
//! The box-model subset the paginator needs to reason about: explicit
//! sizes, spacing (padding/margin/border), gaps, and the handful of flex
//! properties that matter when a container is rewritten as a row of
//! columns. Full style resolution (inheritance, cascade, percentages)
//! belongs to the external flow-layout engine; by the time a tree
//! reaches pagination every value here is concrete.

use serde::{Deserialize, Serialize};

/// Edge values (top, right, bottom, left) used for margin, padding and
/// border widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Per-corner values for border radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corners {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl Corners {
    pub fn uniform(v: f64) -> Self {
        Self {
            top_left: v,
            top_right: v,
            bottom_right: v,
            bottom_left: v,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlexDirection {
    #[default]
    Column,
    Row,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

/// Resolved style properties carried by a node.
///
/// `width`/`height` are `None` when the flow-layout engine sizes the node
/// from its content. Spacing fields always hold concrete values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub width: Option<f64>,
    pub height: Option<f64>,

    pub padding: Edges,
    pub margin: Edges,
    pub border_width: Edges,
    pub border_radius: Corners,

    /// Vertical gap between stacked children.
    pub row_gap: f64,
    /// Horizontal gap between children laid out as a row. Set when a
    /// multi-column container is rewritten as a row of column views.
    pub column_gap: f64,

    pub flex_direction: FlexDirection,
    pub align_items: AlignItems,
    pub flex_grow: Option<f64>,
    pub flex_shrink: Option<f64>,
    pub flex_basis: Option<f64>,

    pub text_align: TextAlign,
}

impl Style {
    /// Zero out the bottom decoration so a split has no trailing visual
    /// edge on the first fragment.
    pub(crate) fn without_bottom_decoration(mut self) -> Self {
        self.margin.bottom = 0.0;
        self.padding.bottom = 0.0;
        self.border_width.bottom = 0.0;
        self.border_radius.bottom_left = 0.0;
        self.border_radius.bottom_right = 0.0;
        self
    }

    /// Zero out the top decoration so a continuation fragment starts
    /// flush at its new origin.
    pub(crate) fn without_top_decoration(mut self) -> Self {
        self.margin.top = 0.0;
        self.padding.top = 0.0;
        self.border_width.top = 0.0;
        self.border_radius.top_left = 0.0;
        self.border_radius.top_right = 0.0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_sums() {
        let e = Edges {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(e.horizontal(), 6.0);
        assert_eq!(e.vertical(), 4.0);
    }

    #[test]
    fn decoration_stripping_is_one_sided() {
        let style = Style {
            padding: Edges::uniform(5.0),
            margin: Edges::uniform(2.0),
            border_width: Edges::uniform(1.0),
            border_radius: Corners::uniform(3.0),
            ..Default::default()
        };

        let top = style.clone().without_bottom_decoration();
        assert_eq!(top.padding.top, 5.0);
        assert_eq!(top.padding.bottom, 0.0);
        assert_eq!(top.margin.bottom, 0.0);
        assert_eq!(top.border_width.bottom, 0.0);
        assert_eq!(top.border_radius.bottom_left, 0.0);
        assert_eq!(top.border_radius.top_left, 3.0);

        let bottom = style.without_top_decoration();
        assert_eq!(bottom.padding.bottom, 5.0);
        assert_eq!(bottom.padding.top, 0.0);
        assert_eq!(bottom.border_radius.top_right, 0.0);
    }
}
