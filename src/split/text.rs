//! # Text Splitting
//!
//! Line-accurate splitting of a text block into a "fits here" fragment
//! and a "continues later" fragment, honoring orphan/widow policy.
//!
//! The split always works from a line list that is authoritative for the
//! target width: cached lines are used when they were shaped at exactly
//! that width, otherwise the text is reshaped. A shaping failure
//! degrades to a zero-height split instead of aborting — one malformed
//! text block must not take down pagination of the whole document.

use log::debug;

use crate::model::Node;
use crate::shape::{lines_height, ShapedLine, TextShaper, TextState};

/// Break index into `lines` such that lines `[0, k)` fit within
/// `height`, adjusted for orphan/widow policy:
///
/// - Fewer total lines than `orphans`: never split.
/// - A break that would leave fewer than `orphans` lines on the first
///   fragment — or a block too short to satisfy both minimums — relaxes
///   to a single-line split rather than evicting the whole block.
/// - Exactly `orphans + widows` lines: break at `orphans`.
/// - A break that would leave fewer than `widows` lines for the
///   continuation is pulled back so exactly `widows` remain.
pub(crate) fn line_break_index(
    lines: &[ShapedLine],
    height: f64,
    orphans: usize,
    widows: usize,
) -> usize {
    if lines.is_empty() {
        return 0;
    }

    let mut y = 0.0;
    let mut sliced = lines.len();
    for (i, line) in lines.iter().enumerate() {
        if line.height <= 0.0 {
            continue;
        }
        if y + line.height > height {
            sliced = i;
            break;
        }
        y += line.height;
    }

    let quantity = lines.len();

    if sliced == 0 {
        return 0;
    }
    if quantity < orphans {
        return quantity;
    }
    if sliced < orphans || quantity < orphans + widows {
        // Strict rules would push the entire block onward even though
        // at least one line fits; allow a minimal split instead.
        return 1;
    }
    if quantity == orphans + widows {
        return orphans;
    }
    if quantity - sliced < widows {
        return quantity - widows;
    }

    sliced
}

/// Split `node` at `width` into the fragment that fits within
/// `available_height` and the fragment that continues later.
///
/// Both fragments carry a `ShapedAt` cache for `width`, so downstream
/// layout trusts their lines as-is instead of reshaping a partial block.
/// The first fragment loses its bottom decoration, the continuation its
/// top decoration, so the visual cut is clean.
pub(crate) fn split_text(
    node: &Node,
    width: f64,
    available_height: f64,
    shaper: &dyn TextShaper,
) -> (Node, Node) {
    let lines: Vec<ShapedLine> = match node.text_state().and_then(|state| state.lines_at(width)) {
        Some(cached) => cached.to_vec(),
        None => match shaper.shape_text(node, width, f64::INFINITY) {
            Ok(lines) => lines,
            Err(err) => {
                debug!("split degraded to empty: {err}");
                return empty_split(node, width);
            }
        },
    };

    if lines.is_empty() {
        return empty_split(node, width);
    }

    let orphans = node.props.orphans();
    let widows = node.props.widows();
    let k = line_break_index(&lines, available_height, orphans, widows);

    let current_height = lines_height(&lines[..k]);
    let next_height = lines_height(&lines) - current_height;

    let mut current = node.with_text_state(TextState::ShapedAt {
        width,
        lines: lines[..k].to_vec(),
    });
    current.box_.height = current_height;
    current.style = current.style.without_bottom_decoration();

    let mut next = node.with_text_state(TextState::ShapedAt {
        width,
        lines: lines[k..].to_vec(),
    });
    next.box_.top = 0.0;
    next.box_.height = next_height;
    next.style = next.style.without_top_decoration();

    (current, next)
}

fn empty_split(node: &Node, width: f64) -> (Node, Node) {
    let mut empty = node.with_text_state(TextState::ShapedAt {
        width,
        lines: vec![],
    });
    empty.box_.height = 0.0;
    (empty.clone(), empty)
}
