//! # Document Model
//!
//! The node tree the paginator consumes and produces. A document is a
//! tree of typed nodes, each carrying resolved style, behavioral props,
//! and the box geometry the external flow-layout engine computed for the
//! width context it last ran at.
//!
//! Two invariants shape everything in this module:
//!
//! - **Geometry is width-scoped.** `box_` is valid only for the width at
//!   which layout last ran. A node moved into a narrower column must be
//!   re-measured (and text re-shaped) before its box is trusted.
//! - **Copy-on-write.** Every split or resolve step builds new node
//!   values; no node referenced elsewhere is mutated in place. Cloning
//!   is cheap enough for a tree transformation that runs once per
//!   document, and it is what makes the splitting algorithm safe to
//!   reason about.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::shape::TextState;
use crate::style::Style;

/// Box geometry resolved by the flow-layout engine, relative to the
/// containing node's content origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Per-page context handed to dynamic render callbacks.
///
/// During the first resolution pass only `page_number` is known; the
/// remaining fields are filled in by the final renumber pass once the
/// whole document has been paginated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub page_number: usize,
    pub total_pages: Option<usize>,
    pub sub_page_number: Option<usize>,
    pub sub_page_total_pages: Option<usize>,
}

/// A caller-bound dynamic content callback. The paginator only ever
/// invokes the function value; converting whatever the authoring layer
/// renders into nodes happens on the caller's side of this boundary.
#[derive(Clone)]
pub struct RenderFn(pub Rc<dyn Fn(&PageContext) -> Vec<Node>>);

impl RenderFn {
    pub fn new(f: impl Fn(&PageContext) -> Vec<Node> + 'static) -> Self {
        RenderFn(Rc::new(f))
    }

    pub fn call(&self, ctx: &PageContext) -> Vec<Node> {
        (self.0)(ctx)
    }
}

impl fmt::Debug for RenderFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderFn")
    }
}

/// Behavioral flags controlling how a node participates in pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Props {
    /// Repeat this node unchanged on every resulting page/column.
    pub fixed: bool,

    /// Force a boundary before this node.
    #[serde(rename = "break")]
    pub break_before: bool,

    /// Whether this node may be split across boundaries. `None` means
    /// the kind's default (splittable for containers and text).
    pub wrap: Option<bool>,

    /// Minimum height of following-sibling content that must fit below
    /// this node on the same page; otherwise the node breaks.
    pub min_presence_ahead: f64,

    /// Minimum line count kept on the first fragment of a text split.
    pub orphans: Option<usize>,
    /// Minimum line count kept on the continuation fragment.
    pub widows: Option<usize>,

    /// Number of columns content flows into. Values above 1 turn the
    /// node into a multi-column container.
    pub columns: Option<usize>,
    /// Gap between columns in points.
    pub column_gap: Option<f64>,

    /// Destination identifier for links.
    pub id: Option<String>,
    /// Outline entry title.
    pub bookmark: Option<String>,

    /// Dynamic content callback, evaluated per physical page. A node
    /// carrying one is "dynamic": its children are replaced by the
    /// callback's output during resolution.
    #[serde(skip)]
    pub render: Option<RenderFn>,
}

pub const DEFAULT_ORPHANS: usize = 2;
pub const DEFAULT_WIDOWS: usize = 2;
pub const DEFAULT_COLUMN_GAP: f64 = 18.0;

impl Props {
    pub fn orphans(&self) -> usize {
        self.orphans.unwrap_or(DEFAULT_ORPHANS)
    }

    pub fn widows(&self) -> usize {
        self.widows.unwrap_or(DEFAULT_WIDOWS)
    }

    pub fn columns(&self) -> usize {
        self.columns.unwrap_or(1).max(1)
    }

    pub fn column_gap(&self) -> f64 {
        self.column_gap.unwrap_or(DEFAULT_COLUMN_GAP)
    }
}

/// The different kinds of nodes in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// The root. Children are pages.
    Document,
    /// One authored page; pagination may expand it into several
    /// physical pages.
    Page,
    /// A generic vertical container.
    View,
    /// A text block. Literal content lives in `TextInstance` children;
    /// shaped lines live in the width-scoped cache.
    Text {
        #[serde(skip)]
        shaped: TextState,
    },
    /// A literal string leaf inside a `Text` node.
    TextInstance { content: String },
}

/// A node in the document tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub kind: NodeKind,

    #[serde(default)]
    pub style: Style,

    #[serde(default)]
    pub props: Props,

    /// Geometry for the width context layout last ran at.
    #[serde(rename = "box", default)]
    pub box_: Rect,

    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Document, children)
    }

    pub fn page(style: Style, children: Vec<Node>) -> Self {
        let mut node = Self::new(NodeKind::Page, children);
        node.style = style;
        node
    }

    pub fn view(style: Style, children: Vec<Node>) -> Self {
        let mut node = Self::new(NodeKind::View, children);
        node.style = style;
        node
    }

    pub fn text(content: &str, style: Style) -> Self {
        let instance = Self::new(
            NodeKind::TextInstance {
                content: content.to_string(),
            },
            vec![],
        );
        let mut node = Self::new(
            NodeKind::Text {
                shaped: TextState::Unshaped,
            },
            vec![instance],
        );
        node.style = style;
        node
    }

    fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            style: Style::default(),
            props: Props::default(),
            box_: Rect::default(),
            children,
        }
    }

    /// Kind label for diagnostics and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Document => "Document",
            NodeKind::Page => "Page",
            NodeKind::View => "View",
            NodeKind::Text { .. } => "Text",
            NodeKind::TextInstance { .. } => "TextInstance",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    pub fn is_view(&self) -> bool {
        matches!(self.kind, NodeKind::View)
    }

    pub fn is_fixed(&self) -> bool {
        self.props.fixed
    }

    pub fn is_dynamic(&self) -> bool {
        self.props.render.is_some()
    }

    /// Can this node be split across a page or column boundary?
    pub fn wrappable(&self) -> bool {
        match self.kind {
            NodeKind::TextInstance { .. } => false,
            _ => self.props.wrap.unwrap_or(true),
        }
    }

    pub fn top(&self) -> f64 {
        self.box_.top
    }

    /// The text cache, for `Text` nodes.
    pub fn text_state(&self) -> Option<&TextState> {
        match &self.kind {
            NodeKind::Text { shaped } => Some(shaped),
            _ => None,
        }
    }

    /// Copy of this node with a replaced text cache. No-op for
    /// non-text nodes.
    pub(crate) fn with_text_state(&self, state: TextState) -> Node {
        let mut node = self.clone();
        if let NodeKind::Text { shaped } = &mut node.kind {
            *shaped = state;
        }
        node
    }

    /// Copy of this node with replaced children.
    pub(crate) fn with_children(&self, children: Vec<Node>) -> Node {
        let mut node = self.clone();
        node.children = children;
        node
    }

    /// Copy of this node shifted up by `dy`, for content moved past a
    /// cut line onto the next page.
    pub(crate) fn shifted_up(&self, dy: f64) -> Node {
        let mut node = self.clone();
        node.box_.top -= dy;
        node
    }

    /// Concatenated literal content of the `TextInstance` children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match &child.kind {
                NodeKind::TextInstance { content } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}
