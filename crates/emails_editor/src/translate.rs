//! Mapping between the host's node-space selection and token indices.
//!
//! Only root-level chips count as token positions. Separators and free
//! text nodes are transparent: a boundary anywhere among them resolves to
//! the number of chips before it.

use crate::chip;
use email_core::SelectionRange;
use surface::{Boundary, Id, NativeSelection, Surface};

/// Translate the native selection into a token-index range.
///
/// Returns `None` when the anchor lies outside `root`. A focus outside
/// `root` is treated as if it were the anchor.
pub fn capture<S: Surface + ?Sized>(surface: &S, root: Id) -> Option<SelectionRange> {
    let selection = surface.selection()?;
    let anchor = root_offset(surface, root, selection.anchor)?;
    let focus = root_offset(surface, root, selection.focus).unwrap_or(anchor);
    Some(SelectionRange::new(
        chips_before(surface, root, anchor),
        chips_before(surface, root, focus),
    ))
}

/// Collapse the native cursor immediately before chip `index`.
///
/// An index past the last chip lands before the trailing separator.
pub fn place_cursor<S: Surface + ?Sized>(surface: &mut S, root: Id, index: usize) {
    let offset = chip::chips(surface, root)
        .get(index)
        .and_then(|c| surface.child_index(root, *c))
        .unwrap_or_else(|| surface.children(root).len().saturating_sub(1));
    log::trace!(target: "emails_editor.selection", "cursor -> token {index} (child {offset})");
    surface.set_selection(Some(NativeSelection::collapsed(Boundary::new(root, offset))));
}

/// Whether the native anchor currently sits inside a separator marker.
pub fn is_on_separator<S: Surface + ?Sized>(surface: &S, root: Id) -> bool {
    surface
        .selection()
        .filter(|sel| sel.anchor.node != root)
        .and_then(|sel| surface.top_level_child(root, sel.anchor.node))
        .is_some_and(|top| chip::is_separator(surface, top))
}

/// Child offset within `root` of a boundary, walking nested boundaries up to
/// their root-level ancestor.
fn root_offset<S: Surface + ?Sized>(surface: &S, root: Id, boundary: Boundary) -> Option<usize> {
    if boundary.node == root {
        return Some(boundary.offset.min(surface.children(root).len()));
    }
    let top = surface.top_level_child(root, boundary.node)?;
    surface.child_index(root, top)
}

fn chips_before<S: Surface + ?Sized>(surface: &S, root: Id, offset: usize) -> usize {
    surface
        .children(root)
        .iter()
        .take(offset)
        .filter(|c| chip::is_chip(surface, **c))
        .count()
}
