//! # Dynamic Node Resolution
//!
//! Nodes carrying a render callback produce their children per physical
//! page: the callback receives the page context and returns fresh
//! subtrees. Resolution happens twice per page — once during splitting
//! with only the page number known, and once more after the whole
//! document is paginated, when total counts are available.

use crate::model::{Node, PageContext};
use crate::shape::TextState;

/// Does this subtree contain any node with a render callback?
pub(crate) fn has_dynamic(node: &Node) -> bool {
    node.is_dynamic() || node.children.iter().any(has_dynamic)
}

/// Re-evaluate every render callback in the subtree against `ctx`,
/// returning a new tree.
///
/// A dynamic node's children are replaced wholesale by the callback's
/// output (itself resolved recursively, so callbacks may return dynamic
/// nodes). Dynamic text gets its box height zeroed and its line cache
/// cleared, forcing the next layout pass to measure the fresh content
/// instead of trusting geometry from a previous page's rendering.
pub(crate) fn resolve_dynamic(ctx: &PageContext, node: &Node) -> Node {
    let children: Vec<Node> = match &node.props.render {
        Some(render) => render
            .call(ctx)
            .iter()
            .map(|child| resolve_dynamic(ctx, child))
            .collect(),
        None => node
            .children
            .iter()
            .map(|child| resolve_dynamic(ctx, child))
            .collect(),
    };

    let mut resolved = node.with_children(children);
    if node.is_dynamic() {
        if resolved.is_text() {
            resolved.box_.height = 0.0;
        }
        resolved = resolved.with_text_state(TextState::Unshaped);
    }
    resolved
}
