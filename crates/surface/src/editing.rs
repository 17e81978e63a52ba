//! Plain-text editing primitives of the in-memory surface.
//!
//! These model what a host does natively for `insertText` and Backspace on a
//! content-editable region: text goes into text nodes only, and insertion
//! points inside a `contenteditable="false"` subtree are moved after it.

use crate::dom::DomSurface;
use crate::error::SurfaceError;
use crate::text::{clamp_to_char_boundary, prev_char_boundary};
use crate::traits::Surface;
use crate::types::{Boundary, Id, NativeSelection};

impl DomSurface {
    pub(crate) fn insert_text_at_selection(&mut self, text: &str) -> Result<(), SurfaceError> {
        let sel = self.selection.ok_or(SurfaceError::NoSelection)?;
        let point = if sel.is_collapsed() {
            sel.anchor
        } else {
            self.delete_range(sel)?
        };
        let point = self.editable_point(point);
        log::trace!(target: "surface.editing", "insert {text:?} at {point:?}");
        if text.is_empty() {
            self.set_caret(point.node, point.offset);
            return Ok(());
        }

        if self.is_text(point.node) {
            let mut value = self.text_content(point.node);
            let at = clamp_to_char_boundary(&value, point.offset);
            value.insert_str(at, text);
            self.set_text(point.node, &value)?;
            self.set_caret(point.node, at + text.len());
            return Ok(());
        }

        let children = self.children(point.node).to_vec();
        let at = point.offset.min(children.len());

        // Extend a neighbouring text node instead of fragmenting the run.
        if let Some(&prev) = at.checked_sub(1).and_then(|i| children.get(i))
            && self.is_text(prev)
        {
            let mut value = self.text_content(prev);
            value.push_str(text);
            self.set_text(prev, &value)?;
            self.set_caret(prev, value.len());
            return Ok(());
        }
        if let Some(&next) = children.get(at)
            && self.is_text(next)
        {
            let value = format!("{text}{}", self.text_content(next));
            self.set_text(next, &value)?;
            self.set_caret(next, text.len());
            return Ok(());
        }

        let node = self.create_text(text);
        match children.get(at) {
            Some(&before) => self.insert_before(point.node, node, before)?,
            None => self.append_child(point.node, node)?,
        }
        self.set_caret(node, text.len());
        Ok(())
    }

    pub(crate) fn delete_backward_at_selection(&mut self) -> Result<(), SurfaceError> {
        let sel = self.selection.ok_or(SurfaceError::NoSelection)?;
        if !sel.is_collapsed() {
            let at = self.delete_range(sel)?;
            self.set_caret(at.node, at.offset);
            return Ok(());
        }

        let mut point = self.editable_point(sel.anchor);
        if self.is_text(point.node) {
            if point.offset > 0 {
                let mut value = self.text_content(point.node);
                let end = clamp_to_char_boundary(&value, point.offset);
                let start = prev_char_boundary(&value, end);
                value.replace_range(start..end, "");
                if value.is_empty() && self.parent(point.node).is_some() {
                    // Selection collapses onto the vacated slot.
                    return self.remove(point.node);
                }
                self.set_text(point.node, &value)?;
                self.set_caret(point.node, start);
                return Ok(());
            }
            let Some(parent) = self.parent(point.node) else {
                return Ok(());
            };
            let index = self.child_index(parent, point.node).unwrap_or(0);
            point = Boundary::new(parent, index);
        }

        let Some(&prev) = point
            .offset
            .checked_sub(1)
            .and_then(|i| self.children(point.node).get(i))
        else {
            return Ok(());
        };
        if self.is_text(prev) {
            let mut value = self.text_content(prev);
            let start = prev_char_boundary(&value, value.len());
            value.truncate(start);
            if value.is_empty() {
                self.remove(prev)?;
                self.set_caret(point.node, point.offset - 1);
            } else {
                self.set_text(prev, &value)?;
                self.set_caret(prev, start);
            }
        } else {
            self.remove(prev)?;
            self.set_caret(point.node, point.offset - 1);
        }
        Ok(())
    }

    /// Move a point that lies inside a non-editable subtree to just after
    /// the outermost such subtree.
    fn editable_point(&self, point: Boundary) -> Boundary {
        let mut barrier = None;
        let mut current = Some(point.node);
        while let Some(node) = current {
            if self.attribute(node, "contenteditable") == Some("false") {
                barrier = Some(node);
            }
            current = self.parent(node);
        }
        let Some((node, parent)) = barrier.and_then(|b| self.parent(b).map(|p| (b, p))) else {
            return point;
        };
        let index = self.child_index(parent, node).map_or(0, |i| i + 1);
        Boundary::new(parent, index)
    }

    /// Delete the contents of a non-collapsed selection and return the
    /// collapsed point left behind.
    fn delete_range(&mut self, sel: NativeSelection) -> Result<Boundary, SurfaceError> {
        let (a, f) = (sel.anchor, sel.focus);
        if a.node == f.node {
            let (start, end) = (a.offset.min(f.offset), a.offset.max(f.offset));
            if self.is_text(a.node) {
                let mut value = self.text_content(a.node);
                let start = clamp_to_char_boundary(&value, start);
                let end = clamp_to_char_boundary(&value, end);
                value.replace_range(start..end, "");
                self.set_text(a.node, &value)?;
                return Ok(Boundary::new(a.node, start));
            }
            self.remove_children_in(a.node, start, end)?;
            return Ok(Boundary::new(a.node, start));
        }

        let Some(common) = self.common_ancestor(a.node, f.node) else {
            return Ok(a);
        };
        let (first, last) = if self.order_key(common, a) <= self.order_key(common, f) {
            (a, f)
        } else {
            (f, a)
        };

        let start = self.lift_start(common, first)?;
        let end = self.lift_end(common, last)?;
        if end > start {
            self.remove_children_in(common, start, end)?;
        }
        Ok(Boundary::new(common, start))
    }

    fn remove_children_in(&mut self, parent: Id, start: usize, end: usize) -> Result<(), SurfaceError> {
        let doomed: Vec<Id> = self
            .children(parent)
            .iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .copied()
            .collect();
        for child in doomed {
            self.remove(child)?;
        }
        Ok(())
    }

    fn common_ancestor(&self, a: Id, b: Id) -> Option<Id> {
        let mut ancestors = Vec::new();
        let mut current = Some(a);
        while let Some(node) = current {
            ancestors.push(node);
            current = self.parent(node);
        }
        let mut current = Some(b);
        while let Some(node) = current {
            if ancestors.contains(&node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Document-order key of `b` expressed in `common`'s child coordinates.
    fn order_key(&self, common: Id, b: Boundary) -> usize {
        if b.node == common {
            return b.offset * 2;
        }
        self.top_level_child(common, b.node)
            .and_then(|top| self.child_index(common, top))
            .map_or(0, |i| i * 2 + 1)
    }

    /// Child index where deletion starts. A start point inside a direct text
    /// child keeps the text before it.
    fn lift_start(&mut self, common: Id, b: Boundary) -> Result<usize, SurfaceError> {
        if b.node == common {
            return Ok(b.offset);
        }
        let Some(top) = self.top_level_child(common, b.node) else {
            return Ok(0);
        };
        let index = self.child_index(common, top).unwrap_or(0);
        if top == b.node && self.is_text(top) {
            let mut value = self.text_content(top);
            value.truncate(clamp_to_char_boundary(&value, b.offset));
            self.set_text(top, &value)?;
            return Ok(index + 1);
        }
        Ok(index)
    }

    /// Child index where deletion stops (exclusive). An end point inside a
    /// direct text child keeps the text after it.
    fn lift_end(&mut self, common: Id, b: Boundary) -> Result<usize, SurfaceError> {
        if b.node == common {
            return Ok(b.offset);
        }
        let Some(top) = self.top_level_child(common, b.node) else {
            return Ok(0);
        };
        let index = self.child_index(common, top).unwrap_or(0);
        if top == b.node && self.is_text(top) {
            let value = self.text_content(top);
            let at = clamp_to_char_boundary(&value, b.offset);
            self.set_text(top, &value[at..])?;
            return Ok(index);
        }
        Ok(index + 1)
    }
}
