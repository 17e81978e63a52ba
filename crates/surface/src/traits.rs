//! The rendering-surface capability interface.
//!
//! Everything the editor needs from its host environment goes through this
//! trait: node creation and tree edits, attribute and text access, the native
//! selection, the host's plain-text editing primitives, listener registration,
//! text measurement and animation-frame scheduling.
//!
//! # Design Principles
//!
//! - No ambient globals: the editor receives its surface at construction
//! - Node handles are plain [`Id`]s; the surface owns all node storage
//! - Provided methods are expressed purely in terms of the required ones, so a
//!   host only implements the primitives

use crate::error::SurfaceError;
use crate::types::{EventKind, FrameId, Id, NativeSelection, NodeKind};

pub trait Surface {
    // =========================================================================
    // Tree construction
    // =========================================================================

    /// Create a detached element node.
    fn create_element(&mut self, name: &str) -> Id;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> Id;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Id, child: Id) -> Result<(), SurfaceError>;

    /// Insert `child` immediately before `before`, which must be a child of `parent`.
    fn insert_before(&mut self, parent: Id, child: Id, before: Id) -> Result<(), SurfaceError>;

    /// Detach `node` from its parent and drop its whole subtree.
    ///
    /// Selection endpoints inside the removed subtree collapse onto the
    /// boundary where the node used to be.
    fn remove(&mut self, node: Id) -> Result<(), SurfaceError>;

    // =========================================================================
    // Tree queries
    // =========================================================================

    fn parent(&self, node: Id) -> Option<Id>;

    /// Children of `node` in document order; empty for text or unknown nodes.
    fn children(&self, node: Id) -> &[Id];

    fn node_kind(&self, node: Id) -> Option<NodeKind>;

    /// Lowercase tag name for elements, `None` otherwise.
    fn element_name(&self, node: Id) -> Option<&str>;

    // =========================================================================
    // Attributes & text
    // =========================================================================

    /// Attribute value; valueless attributes read as `Some("")`.
    fn attribute(&self, node: Id, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: Id, name: &str, value: &str) -> Result<(), SurfaceError>;

    /// Add a valueless (boolean) attribute such as `data-email`.
    fn set_flag(&mut self, node: Id, name: &str) -> Result<(), SurfaceError>;

    fn remove_attribute(&mut self, node: Id, name: &str) -> Result<(), SurfaceError>;

    /// Rendered text of a subtree. `<br>` elements read as `\n`.
    fn text_content(&self, node: Id) -> String;

    /// Replace the text of a text node.
    fn set_text(&mut self, node: Id, text: &str) -> Result<(), SurfaceError>;

    // =========================================================================
    // Selection & native editing
    // =========================================================================

    fn selection(&self) -> Option<NativeSelection>;

    fn set_selection(&mut self, selection: Option<NativeSelection>);

    /// The host's plain-text insertion at the current selection.
    ///
    /// Replaces a non-collapsed selection, never creates markup, and leaves a
    /// collapsed selection after the inserted text.
    fn insert_text(&mut self, text: &str) -> Result<(), SurfaceError>;

    /// The host's default Backspace action at the current selection.
    fn delete_backward(&mut self) -> Result<(), SurfaceError>;

    // =========================================================================
    // Events, measurement, scheduling
    // =========================================================================

    fn listen(&mut self, node: Id, kind: EventKind);

    fn has_listener(&self, node: Id, kind: EventKind) -> bool;

    fn measure_text(&self, text: &str) -> f32;

    /// Schedule a callback for the next animation frame.
    fn request_frame(&mut self) -> FrameId;

    fn cancel_frame(&mut self, frame: FrameId);

    // =========================================================================
    // Provided helpers
    // =========================================================================

    fn is_text(&self, node: Id) -> bool {
        self.node_kind(node) == Some(NodeKind::Text)
    }

    fn is_element_named(&self, node: Id, name: &str) -> bool {
        self.element_name(node)
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    fn has_attribute(&self, node: Id, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    fn has_class(&self, node: Id, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// `true` if `node` is `ancestor` or lies inside its subtree.
    fn contains(&self, ancestor: Id, node: Id) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn child_index(&self, parent: Id, child: Id) -> Option<usize> {
        self.children(parent).iter().position(|c| *c == child)
    }

    /// Walk up from `node` to the ancestor that is a direct child of `parent`.
    fn top_level_child(&self, parent: Id, node: Id) -> Option<Id> {
        let mut current = node;
        loop {
            let up = self.parent(current)?;
            if up == parent {
                return Some(current);
            }
            current = up;
        }
    }

    /// Remove every child of `node`.
    fn clear_children(&mut self, node: Id) -> Result<(), SurfaceError> {
        while let Some(&child) = self.children(node).last() {
            self.remove(child)?;
        }
        Ok(())
    }
}
