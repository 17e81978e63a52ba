use surface::Id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    /// Any other key; the editor leaves it to native handling.
    Other(String),
}

/// Host events the editor consumes.
///
/// `Input` is sent *after* the host has applied a native edit (typing) to
/// the surface, mirroring the DOM `input` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    Focus,
    Blur,
    Input,
    KeyDown(Key),
    Paste(String),
    Click { target: Id },
    MouseDown { target: Id },
}

/// Whether the host should still run its default action for the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    PreventDefault,
}
