//! # Folio
//!
//! Page splitting and column distribution for declarative document
//! trees.
//!
//! Most document renderers lay content out on an infinite vertical
//! canvas and then slice it into pages wherever the page height happens
//! to fall. That is how tables lose their headers, paragraphs strand a
//! single line at the top of a page, and multi-column layouts silently
//! overflow.
//!
//! Folio treats the page boundary as a first-class layout constraint.
//! It consumes a laid-out document tree and decides, node by node, what
//! stays on the current page, what splits, and what moves on — honoring
//! `fixed` repetition, forced breaks, orphan/widow minimums for text,
//! and greedy first-fit distribution into columns.
//!
//! ## Architecture
//!
//! ```text
//! Document tree (resolved geometry)
//!       ↓
//!   [paginate] — per-page driver: dynamic content, split, relayout
//!       ↓
//!   [split]    — recursive node splitting, columns, text line breaks
//!       ↓
//!   [measure]  — width-aware height estimation
//! ```
//!
//! Two pieces stay outside the crate, behind traits: the flow-layout
//! engine ([`FlowLayout`]) that computes box geometry, and the text
//! shaper ([`TextShaper`]) that turns content into measured lines.

pub mod error;
pub mod geometry;
pub mod measure;
pub mod model;
pub mod paginate;
pub mod shape;
pub mod style;

mod split;

pub use error::PaginateError;
pub use measure::height_at_width;
pub use model::{Node, NodeKind, PageContext, Props, Rect, RenderFn};
pub use paginate::{paginate, MAX_PAGES};
pub use shape::{FlowLayout, ShapeError, ShapedLine, TextShaper, TextState};
pub use style::{Edges, FlexDirection, Style};
