//! Arena-backed, in-memory [`Surface`] implementation.
//!
//! Node records live in a `Vec` addressed through a live map; removed nodes
//! drop out of the map and their handles become unknown. The surface also
//! stores the native selection, listener registrations and pending animation
//! frames so that the editor can be driven headlessly.

use crate::error::SurfaceError;
use crate::measure::{MonospaceMeasurer, TextMeasurer};
use crate::traits::Surface;
use crate::types::{Boundary, EventKind, FrameId, Id, NativeSelection, NodeId, NodeKind};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub struct DomSurface {
    pub(crate) arena: DomArena,
    body: Id,
    pub(crate) selection: Option<NativeSelection>,
    listeners: HashSet<(Id, EventKind)>,
    measurer: Box<dyn TextMeasurer>,
    next_frame: u64,
    pending_frames: Vec<FrameId>,
}

impl DomSurface {
    /// Create a surface containing a single, empty `<body>` element.
    pub fn new() -> Self {
        Self::with_measurer(MonospaceMeasurer::default())
    }

    pub fn with_measurer(measurer: impl TextMeasurer + 'static) -> Self {
        let mut arena = DomArena::new();
        let body = arena.insert_node(NodeData::element("body"));
        Self {
            arena,
            body,
            selection: None,
            listeners: HashSet::new(),
            measurer: Box::new(measurer),
            next_frame: 0,
            pending_frames: Vec::new(),
        }
    }

    /// The document body; hosts usually mount editors here.
    pub fn body(&self) -> Id {
        self.body
    }

    pub fn is_live(&self, node: Id) -> bool {
        self.arena.live.contains_key(&node)
    }

    /// Frames requested and not yet run or cancelled, oldest first.
    pub fn pending_frames(&self) -> &[FrameId] {
        &self.pending_frames
    }

    /// Drain the pending frames so the host can run their callbacks.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.pending_frames)
    }

    /// Place a collapsed caret.
    pub fn set_caret(&mut self, node: Id, offset: usize) {
        self.selection = Some(NativeSelection::collapsed(Boundary::new(node, offset)));
    }

    /// Collect every live descendant of `root` (inclusive) that matches `pred`,
    /// in document order.
    pub fn query_all(&self, root: Id, pred: impl Fn(&Self, Id) -> bool) -> Vec<Id> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if pred(self, node) {
                out.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Descendants of `root` carrying `class`, in document order.
    pub fn query_class(&self, root: Id, class: &str) -> Vec<Id> {
        self.query_all(root, |s, n| s.has_class(n, class))
    }

    /// Boundary fix-up after a child was inserted at `index` of `parent`.
    pub(crate) fn shift_selection_after_insert(&mut self, parent: Id, index: usize) {
        let fix = |b: Boundary| {
            if b.node == parent && b.offset > index {
                Boundary::new(parent, b.offset + 1)
            } else {
                b
            }
        };
        if let Some(sel) = self.selection.as_mut() {
            sel.anchor = fix(sel.anchor);
            sel.focus = fix(sel.focus);
        }
    }

    fn node_data(&self, node: Id) -> Option<&NodeData> {
        self.arena.record(node).ok().map(|r| &r.data)
    }
}

impl Default for DomSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for DomSurface {
    fn create_element(&mut self, name: &str) -> Id {
        self.arena.insert_node(NodeData::element(name))
    }

    fn create_text(&mut self, text: &str) -> Id {
        self.arena.insert_node(NodeData::Text {
            text: text.to_string(),
        })
    }

    fn append_child(&mut self, parent: Id, child: Id) -> Result<(), SurfaceError> {
        let index = self.arena.record(parent)?.children.len();
        self.arena.insert_child_at(parent, child, index)
    }

    fn insert_before(&mut self, parent: Id, child: Id, before: Id) -> Result<(), SurfaceError> {
        let index = self
            .child_index(parent, before)
            .ok_or(SurfaceError::InvalidSibling { parent, before })?;
        self.arena.insert_child_at(parent, child, index)?;
        self.shift_selection_after_insert(parent, index);
        Ok(())
    }

    fn remove(&mut self, node: Id) -> Result<(), SurfaceError> {
        self.arena.record(node)?;
        let slot = self
            .parent(node)
            .and_then(|p| self.child_index(p, node).map(|i| (p, i)));

        // Endpoints inside the removed subtree must be resolved before it goes away.
        if let Some(mut sel) = self.selection {
            let fix = |b: Boundary| -> Option<Boundary> {
                if self.contains(node, b.node) {
                    return slot.map(|(p, i)| Boundary::new(p, i));
                }
                match slot {
                    Some((p, i)) if b.node == p && b.offset > i => {
                        Some(Boundary::new(p, b.offset - 1))
                    }
                    _ => Some(b),
                }
            };
            self.selection = match (fix(sel.anchor), fix(sel.focus)) {
                (Some(a), Some(f)) => {
                    sel.anchor = a;
                    sel.focus = f;
                    Some(sel)
                }
                _ => None,
            };
        }

        self.arena.detach(node)?;
        let dropped = self.arena.drop_subtree(node);
        self.listeners.retain(|(id, _)| !dropped.contains(id));
        Ok(())
    }

    fn parent(&self, node: Id) -> Option<Id> {
        self.arena.record(node).ok().and_then(|r| r.parent)
    }

    fn children(&self, node: Id) -> &[Id] {
        self.arena
            .record(node)
            .map(|r| r.children.as_slice())
            .unwrap_or(&[])
    }

    fn node_kind(&self, node: Id) -> Option<NodeKind> {
        self.node_data(node).map(|d| match d {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text { .. } => NodeKind::Text,
        })
    }

    fn element_name(&self, node: Id) -> Option<&str> {
        match self.node_data(node)? {
            NodeData::Element { name, .. } => Some(&**name),
            NodeData::Text { .. } => None,
        }
    }

    fn attribute(&self, node: Id, name: &str) -> Option<&str> {
        let NodeData::Element { attributes, .. } = self.node_data(node)? else {
            return None;
        };
        attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    fn set_attribute(&mut self, node: Id, name: &str, value: &str) -> Result<(), SurfaceError> {
        self.arena.set_attribute(node, name, Some(value.to_string()))
    }

    fn set_flag(&mut self, node: Id, name: &str) -> Result<(), SurfaceError> {
        self.arena.set_attribute(node, name, None)
    }

    fn remove_attribute(&mut self, node: Id, name: &str) -> Result<(), SurfaceError> {
        match &mut self.arena.record_mut(node)?.data {
            NodeData::Element { attributes, .. } => {
                attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
                Ok(())
            }
            NodeData::Text { .. } => Err(SurfaceError::WrongNodeKind(node)),
        }
    }

    fn text_content(&self, node: Id) -> String {
        let mut out = String::new();
        self.arena.collect_text(node, &mut out);
        out
    }

    fn set_text(&mut self, node: Id, text: &str) -> Result<(), SurfaceError> {
        match &mut self.arena.record_mut(node)?.data {
            NodeData::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
            }
            NodeData::Element { .. } => return Err(SurfaceError::WrongNodeKind(node)),
        }
        let len = text.len();
        if let Some(sel) = self.selection.as_mut() {
            for b in [&mut sel.anchor, &mut sel.focus] {
                if b.node == node {
                    b.offset = b.offset.min(len);
                }
            }
        }
        Ok(())
    }

    fn selection(&self) -> Option<NativeSelection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<NativeSelection>) {
        self.selection = selection;
    }

    fn insert_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.insert_text_at_selection(text)
    }

    fn delete_backward(&mut self) -> Result<(), SurfaceError> {
        self.delete_backward_at_selection()
    }

    fn listen(&mut self, node: Id, kind: EventKind) {
        self.listeners.insert((node, kind));
    }

    fn has_listener(&self, node: Id, kind: EventKind) -> bool {
        self.listeners.contains(&(node, kind))
    }

    fn measure_text(&self, text: &str) -> f32 {
        self.measurer.measure(text)
    }

    fn request_frame(&mut self) -> FrameId {
        self.next_frame += 1;
        let frame = FrameId(self.next_frame);
        self.pending_frames.push(frame);
        frame
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.pending_frames.retain(|f| *f != frame);
    }
}

pub(crate) struct DomArena {
    nodes: Vec<NodeRecord>,
    live: HashMap<Id, usize>,
}

impl DomArena {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            live: HashMap::new(),
        }
    }

    fn insert_node(&mut self, data: NodeData) -> Id {
        let index = self.nodes.len();
        let id = Id(index as NodeId);
        self.nodes.push(NodeRecord {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.live.insert(id, index);
        id
    }

    pub(crate) fn record(&self, id: Id) -> Result<&NodeRecord, SurfaceError> {
        let index = *self.live.get(&id).ok_or(SurfaceError::UnknownNode(id))?;
        Ok(&self.nodes[index])
    }

    pub(crate) fn record_mut(&mut self, id: Id) -> Result<&mut NodeRecord, SurfaceError> {
        let index = *self.live.get(&id).ok_or(SurfaceError::UnknownNode(id))?;
        Ok(&mut self.nodes[index])
    }

    fn insert_child_at(&mut self, parent: Id, child: Id, index: usize) -> Result<(), SurfaceError> {
        if parent == child || self.is_descendant(child, parent) {
            return Err(SurfaceError::CycleDetected { parent, child });
        }
        if !self.record(parent)?.allows_children() {
            return Err(SurfaceError::InvalidParent(parent));
        }
        if self.record(child)?.parent.is_some() {
            return Err(SurfaceError::AlreadyAttached(child));
        }
        let siblings = &mut self.record_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn detach(&mut self, node: Id) -> Result<(), SurfaceError> {
        let Some(parent) = self.record_mut(node)?.parent.take() else {
            return Ok(());
        };
        if let Ok(record) = self.record_mut(parent) {
            record.children.retain(|k| *k != node);
        }
        Ok(())
    }

    /// Drop `node` and its descendants from the live map, returning the dropped ids.
    fn drop_subtree(&mut self, node: Id) -> HashSet<Id> {
        let mut dropped = HashSet::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(index) = self.live.remove(&current) else {
                continue;
            };
            let record = &mut self.nodes[index];
            stack.append(&mut record.children);
            record.parent = None;
            dropped.insert(current);
        }
        dropped
    }

    fn set_attribute(
        &mut self,
        node: Id,
        name: &str,
        value: Option<String>,
    ) -> Result<(), SurfaceError> {
        match &mut self.record_mut(node)?.data {
            NodeData::Element { attributes, .. } => {
                if let Some(slot) = attributes
                    .iter_mut()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                {
                    slot.1 = value;
                } else {
                    attributes.push((Arc::from(name.to_ascii_lowercase()), value));
                }
                Ok(())
            }
            NodeData::Text { .. } => Err(SurfaceError::WrongNodeKind(node)),
        }
    }

    fn collect_text(&self, node: Id, out: &mut String) {
        let Ok(record) = self.record(node) else {
            return;
        };
        match &record.data {
            NodeData::Text { text } => out.push_str(text),
            NodeData::Element { name, .. } if &**name == "br" => out.push('\n'),
            NodeData::Element { .. } => {
                for child in &record.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn is_descendant(&self, ancestor: Id, maybe_descendant: Id) -> bool {
        let Ok(record) = self.record(ancestor) else {
            return false;
        };
        let mut stack = record.children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Ok(child) = self.record(current) {
                stack.extend(child.children.iter().copied());
            }
        }
        false
    }
}

pub(crate) struct NodeRecord {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<Id>,
    pub(crate) children: Vec<Id>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }
}

pub(crate) enum NodeData {
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
    },
    Text {
        text: String,
    },
}

impl NodeData {
    fn element(name: &str) -> Self {
        NodeData::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div_with_texts(surface: &mut DomSurface, texts: &[&str]) -> (Id, Vec<Id>) {
        let div = surface.create_element("div");
        surface.append_child(surface.body(), div).unwrap();
        let ids = texts
            .iter()
            .map(|t| {
                let id = surface.create_text(t);
                surface.append_child(div, id).unwrap();
                id
            })
            .collect();
        (div, ids)
    }

    #[test]
    fn append_and_query_children() {
        let mut s = DomSurface::new();
        let (div, ids) = div_with_texts(&mut s, &["a", "b"]);
        assert_eq!(s.children(div), ids.as_slice());
        assert_eq!(s.parent(ids[0]), Some(div));
        assert_eq!(s.text_content(div), "ab");
        assert!(s.contains(s.body(), ids[1]));
    }

    #[test]
    fn appending_into_own_subtree_is_a_cycle() {
        let mut s = DomSurface::new();
        let outer = s.create_element("div");
        let inner = s.create_element("span");
        s.append_child(outer, inner).unwrap();
        assert_eq!(
            s.append_child(inner, outer),
            Err(SurfaceError::CycleDetected {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn attached_nodes_cannot_be_appended_twice() {
        let mut s = DomSurface::new();
        let (div, ids) = div_with_texts(&mut s, &["a"]);
        assert_eq!(
            s.append_child(div, ids[0]),
            Err(SurfaceError::AlreadyAttached(ids[0]))
        );
    }

    #[test]
    fn text_nodes_cannot_have_children() {
        let mut s = DomSurface::new();
        let t = s.create_text("x");
        let u = s.create_text("y");
        assert_eq!(s.append_child(t, u), Err(SurfaceError::InvalidParent(t)));
    }

    #[test]
    fn remove_drops_subtree_and_listeners() {
        let mut s = DomSurface::new();
        let (div, ids) = div_with_texts(&mut s, &["a", "b"]);
        s.listen(div, EventKind::Click);
        s.remove(div).unwrap();
        assert!(!s.is_live(div));
        assert!(!s.is_live(ids[0]));
        assert!(!s.has_listener(div, EventKind::Click));
        assert!(s.children(s.body()).is_empty());
    }

    #[test]
    fn removing_a_node_collapses_selection_inside_it() {
        let mut s = DomSurface::new();
        let (div, ids) = div_with_texts(&mut s, &["a", "b", "c"]);
        s.set_caret(ids[1], 1);
        s.remove(ids[1]).unwrap();
        assert_eq!(
            s.selection(),
            Some(NativeSelection::collapsed(Boundary::new(div, 1)))
        );
    }

    #[test]
    fn removing_an_earlier_sibling_shifts_element_offsets() {
        let mut s = DomSurface::new();
        let (div, ids) = div_with_texts(&mut s, &["a", "b", "c"]);
        s.set_caret(div, 3);
        s.remove(ids[0]).unwrap();
        assert_eq!(
            s.selection(),
            Some(NativeSelection::collapsed(Boundary::new(div, 2)))
        );
    }

    #[test]
    fn insert_before_shifts_later_offsets() {
        let mut s = DomSurface::new();
        let (div, ids) = div_with_texts(&mut s, &["a", "b"]);
        s.set_caret(div, 2);
        let x = s.create_text("x");
        s.insert_before(div, x, ids[0]).unwrap();
        assert_eq!(s.text_content(div), "xab");
        assert_eq!(
            s.selection(),
            Some(NativeSelection::collapsed(Boundary::new(div, 3)))
        );
    }

    #[test]
    fn attributes_are_case_insensitive_and_flags_read_empty() {
        let mut s = DomSurface::new();
        let el = s.create_element("SPAN");
        s.set_attribute(el, "Class", "a b").unwrap();
        s.set_flag(el, "data-email").unwrap();
        assert_eq!(s.element_name(el), Some("span"));
        assert_eq!(s.attribute(el, "class"), Some("a b"));
        assert_eq!(s.attribute(el, "data-email"), Some(""));
        assert!(s.has_class(el, "b"));
        assert!(!s.has_class(el, "c"));
        s.remove_attribute(el, "CLASS").unwrap();
        assert_eq!(s.attribute(el, "class"), None);
    }

    #[test]
    fn br_reads_as_newline() {
        let mut s = DomSurface::new();
        let (div, _) = div_with_texts(&mut s, &["a"]);
        let br = s.create_element("br");
        s.append_child(div, br).unwrap();
        assert_eq!(s.text_content(div), "a\n");
    }

    #[test]
    fn frames_can_be_cancelled() {
        let mut s = DomSurface::new();
        let f1 = s.request_frame();
        let f2 = s.request_frame();
        s.cancel_frame(f1);
        assert_eq!(s.pending_frames(), &[f2]);
        assert_eq!(s.take_frames(), vec![f2]);
        assert!(s.pending_frames().is_empty());
    }

    #[test]
    fn set_text_clamps_selection_offsets() {
        let mut s = DomSurface::new();
        let (_, ids) = div_with_texts(&mut s, &["hello"]);
        s.set_caret(ids[0], 5);
        s.set_text(ids[0], "hi").unwrap();
        assert_eq!(
            s.selection(),
            Some(NativeSelection::collapsed(Boundary::new(ids[0], 2)))
        );
    }
}
