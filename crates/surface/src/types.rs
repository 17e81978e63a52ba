pub type NodeId = u32;

/// Handle to a node owned by a [`Surface`](crate::Surface).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// Event kinds a node can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    KeyDown,
    Paste,
    Focus,
    Blur,
    Click,
    MouseDown,
}

/// Handle returned by [`Surface::request_frame`](crate::Surface::request_frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// A position in the node tree, with DOM range semantics.
///
/// For element nodes `offset` is a child index (the boundary *before*
/// `children[offset]`); for text nodes it is a byte offset into the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Boundary {
    pub node: Id,
    pub offset: usize,
}

impl Boundary {
    #[inline]
    pub const fn new(node: Id, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The host environment's selection: where it started (anchor) and where
/// it currently ends (focus). Not normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeSelection {
    pub anchor: Boundary,
    pub focus: Boundary,
}

impl NativeSelection {
    #[inline]
    pub const fn collapsed(at: Boundary) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    #[inline]
    pub const fn new(anchor: Boundary, focus: Boundary) -> Self {
        Self { anchor, focus }
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}
