//! # Shaping Interface
//!
//! Pagination never shapes glyphs itself. It consumes two external
//! collaborators through the traits defined here:
//!
//! - [`TextShaper`] — given a text node and a width, produce the ordered
//!   list of shaped lines with per-line metrics. Callers pass
//!   `f64::INFINITY` as the height limit when they want a full reflow and
//!   do the vertical cutting themselves.
//! - [`FlowLayout`] — re-run box layout for a subtree at a given
//!   container width. Must be idempotent.
//!
//! The crate also owns the *cache discipline* for shaped lines: a text
//! node's lines are only meaningful for the width they were shaped at,
//! so the cache is a tagged state ([`TextState`]) rather than a bare
//! `Vec` with a validity flag. Moving text into a narrower column turns
//! its state [`Stale`](TextState::Stale); nothing downstream can read
//! stale lines as authoritative by accident.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Node;

/// One shaped line of text.
///
/// Carries enough structure to re-measure its own width: the literal
/// text plus the measured extents the shaper produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapedLine {
    pub text: String,
    pub width: f64,
    pub height: f64,
}

/// Widths within this tolerance are treated as the same shaping context.
const WIDTH_TOLERANCE: f64 = 0.001;

/// Cached line-breaking state of a text node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TextState {
    /// No lines computed yet; the next layout pass must shape the text.
    #[default]
    Unshaped,
    /// Lines are authoritative for `width`. Consumers may slice them
    /// without reshaping.
    ShapedAt { width: f64, lines: Vec<ShapedLine> },
    /// Lines were shaped for a width this node is no longer guaranteed
    /// to be laid out at. They may serve as a height fallback when
    /// shaping fails, never as line-accurate content.
    Stale { lines: Vec<ShapedLine> },
}

impl TextState {
    /// Lines that are line-accurate for `width`, if any.
    pub fn lines_at(&self, width: f64) -> Option<&[ShapedLine]> {
        match self {
            TextState::ShapedAt { width: w, lines } if (w - width).abs() <= WIDTH_TOLERANCE => {
                Some(lines)
            }
            _ => None,
        }
    }

    /// Any cached lines, regardless of the width they were shaped at.
    pub fn any_lines(&self) -> Option<&[ShapedLine]> {
        match self {
            TextState::Unshaped => None,
            TextState::ShapedAt { lines, .. } | TextState::Stale { lines } => Some(lines),
        }
    }

    /// Demote the cache before the node is laid out at a different
    /// width. `ShapedAt` keeps its lines as a stale fallback; an already
    /// stale or unshaped cache is unchanged.
    pub fn invalidate(self) -> TextState {
        match self {
            TextState::ShapedAt { lines, .. } => TextState::Stale { lines },
            other => other,
        }
    }
}

/// Total height of a run of shaped lines.
pub(crate) fn lines_height(lines: &[ShapedLine]) -> f64 {
    lines.iter().map(|line| line.height).sum()
}

/// Shaping failed for a text node at the requested width.
#[derive(Debug, Clone, Error)]
#[error("text shaping failed: {0}")]
pub struct ShapeError(pub String);

/// The external text-shaping / line-breaking engine.
pub trait TextShaper {
    /// Shape the text content of `node` at `width`, producing lines in
    /// reading order. `max_height` bounds how much is shaped; pass
    /// `f64::INFINITY` for a full reflow.
    fn shape_text(
        &self,
        node: &Node,
        width: f64,
        max_height: f64,
    ) -> Result<Vec<ShapedLine>, ShapeError>;
}

/// The external flow-layout engine.
///
/// `relayout` computes fresh box geometry for a subtree at the given
/// container width. It must be idempotent and must not reuse text lines
/// whose [`TextState`] does not match the width it lays out at.
pub trait FlowLayout {
    fn relayout(&self, node: Node, width: f64) -> Node;

    /// The lighter pass used once final page counts are known: dynamic
    /// children have been re-resolved, but style and geometry resolution
    /// need not run again in full. Defaults to a full relayout.
    fn renumber(&self, node: Node, width: f64) -> Node {
        self.relayout(node, width)
    }
}
