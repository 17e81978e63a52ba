//! Editor state machine and the re-tokenization pass.
//!
//! All state lives in [`EditorState`], which handlers receive explicitly
//! together with the surface. Handlers report whether the token sequence
//! changed; notifying listeners is the facade's job.

use crate::chip;
use crate::event::{EditorEvent, EventResult, Key};
use crate::translate;
use email_core::{SelectionRange, collapse_whitespace, has_separator, tokenize};
use surface::{EventKind, FrameId, Id, Surface, SurfaceError};

/// Root attribute the host styles as the placeholder text.
pub const PLACEHOLDER_ATTR: &str = "data-placeholder";

const ZERO_WIDTH_SPACE: char = '\u{200B}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Unfocused,
    Focused,
}

#[derive(Debug)]
pub(crate) struct EditorState {
    pub(crate) root: Id,
    /// Canonical token sequence; only passes and API calls replace it.
    pub(crate) tokens: Vec<String>,
    pub(crate) focus: Focus,
    /// The one outstanding stabilization frame while focused.
    pub(crate) pending_frame: Option<FrameId>,
    pub(crate) placeholder: String,
    pub(crate) add_more_placeholder: String,
}

impl EditorState {
    pub(crate) fn new(root: Id, placeholder: String, add_more_placeholder: String) -> Self {
        Self {
            root,
            tokens: Vec::new(),
            focus: Focus::Unfocused,
            pending_frame: None,
            placeholder,
            add_more_placeholder,
        }
    }

    pub(crate) fn is_focused(&self) -> bool {
        self.focus == Focus::Focused
    }

    fn current_placeholder(&self) -> &str {
        if self.tokens.is_empty() {
            &self.placeholder
        } else {
            &self.add_more_placeholder
        }
    }
}

/// Where the cursor goes after a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CursorHint {
    /// After the last edited free text, else the captured start.
    Auto,
    At(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) result: EventResult,
    pub(crate) changed: bool,
}

impl Outcome {
    fn proceed() -> Self {
        Self {
            result: EventResult::Continue,
            changed: false,
        }
    }

    fn prevented(changed: bool) -> Self {
        Self {
            result: EventResult::PreventDefault,
            changed,
        }
    }
}

// =============================================================================
// Derivation
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Derived {
    pub(crate) tokens: Vec<String>,
    /// Token index just after the last token produced from free text.
    pub(crate) after_last_edit: Option<usize>,
}

/// Accumulates runs of free text between chips.
#[derive(Default)]
struct Extractor {
    tokens: Vec<String>,
    run: String,
    run_edited: bool,
    after_last_edit: Option<usize>,
}

impl Extractor {
    fn text(&mut self, text: &str) {
        self.run.extend(text.chars().filter(|c| *c != ZERO_WIDTH_SPACE));
        self.run_edited = true;
    }

    fn boundary(&mut self) {
        self.tokens.extend(tokenize(&self.run));
        if self.run_edited {
            self.after_last_edit = Some(self.tokens.len());
        }
        self.run.clear();
        self.run_edited = false;
    }

    fn chip(&mut self, label: &str) {
        self.boundary();
        self.tokens.extend(tokenize(label));
    }

    fn finish(mut self) -> Derived {
        self.boundary();
        Derived {
            tokens: self.tokens,
            after_last_edit: self.after_last_edit,
        }
    }
}

/// Re-derive the token sequence from the root's current children.
///
/// Adjacent free text nodes concatenate before splitting; a chip always
/// stands as a whole token; separators contribute nothing.
pub(crate) fn derive_tokens<S: Surface + ?Sized>(surface: &S, root: Id) -> Derived {
    let mut extractor = Extractor::default();
    for &child in surface.children(root) {
        if chip::is_separator(surface, child) {
            continue;
        }
        if chip::is_chip(surface, child) {
            extractor.chip(&chip::chip_label(surface, child));
        } else {
            extractor.text(&surface.text_content(child));
        }
    }
    extractor.finish()
}

/// Lazy-formatting guard for `input`.
///
/// A pass is due once free text holds a separator character, or two `<br>`
/// elements sit next to each other (text nodes between them ignored).
pub(crate) fn needs_format<S: Surface + ?Sized>(surface: &S, root: Id) -> bool {
    let mut after_break = false;
    for &child in surface.children(root) {
        if surface.is_text(child) {
            if has_separator(&surface.text_content(child)) {
                return true;
            }
            continue;
        }
        if surface.is_element_named(child, "br") {
            if after_break {
                return true;
            }
            after_break = true;
            continue;
        }
        after_break = false;
        if !chip::is_chip(surface, child)
            && !chip::is_separator(surface, child)
            && has_separator(&surface.text_content(child))
        {
            return true;
        }
    }
    false
}

/// Uncommitted text among the root's children.
pub(crate) fn free_text<S: Surface + ?Sized>(surface: &S, root: Id) -> String {
    let mut out = String::new();
    for &child in surface.children(root) {
        if chip::is_chip(surface, child) || chip::is_separator(surface, child) {
            continue;
        }
        out.extend(
            surface
                .text_content(child)
                .chars()
                .filter(|c| *c != ZERO_WIDTH_SPACE),
        );
    }
    out
}

// =============================================================================
// Pass
// =============================================================================

/// Run one re-tokenization pass. Returns whether the token sequence changed.
pub(crate) fn run_pass<S: Surface>(
    state: &mut EditorState,
    surface: &mut S,
    hint: CursorHint,
) -> Result<bool, SurfaceError> {
    let captured = translate::capture(surface, state.root);
    let derived = derive_tokens(surface, state.root);
    let cursor = match hint {
        CursorHint::At(index) => Some(index),
        CursorHint::Auto => derived.after_last_edit.or(captured.map(|sel| sel.start)),
    };
    let changed = derived.tokens != state.tokens;
    log::debug!(
        target: "emails_editor.pass",
        "pass: {} -> {} tokens (changed: {changed}, cursor: {cursor:?})",
        state.tokens.len(),
        derived.tokens.len()
    );
    apply_tokens(state, surface, derived.tokens, cursor)?;
    Ok(changed)
}

/// Replace the token sequence and redraw the root from it.
pub(crate) fn apply_tokens<S: Surface>(
    state: &mut EditorState,
    surface: &mut S,
    tokens: Vec<String>,
    cursor: Option<usize>,
) -> Result<(), SurfaceError> {
    state.tokens = tokens;
    rebuild(surface, state.root, &state.tokens)?;
    if state.is_focused() {
        translate::place_cursor(surface, state.root, cursor.unwrap_or(state.tokens.len()));
    }
    refresh_chrome(state, surface)
}

/// Tear down the root's children and lay out `sep chip sep ... chip sep`.
fn rebuild<S: Surface>(surface: &mut S, root: Id, tokens: &[String]) -> Result<(), SurfaceError> {
    surface.clear_children(root)?;
    let leading = chip::render_separator(surface)?;
    surface.append_child(root, leading)?;
    for token in tokens {
        let rendered = chip::render_chip(surface, token)?;
        surface.append_child(root, rendered.node)?;
        surface.listen(rendered.remove_control, EventKind::Click);
        let separator = chip::render_separator(surface)?;
        surface.append_child(root, separator)?;
    }
    Ok(())
}

/// Placeholder text and free-text width.
pub(crate) fn refresh_chrome<S: Surface>(state: &EditorState, surface: &mut S) -> Result<(), SurfaceError> {
    let placeholder = state.current_placeholder();
    let width = surface
        .measure_text(&free_text(surface, state.root))
        .max(surface.measure_text(placeholder));
    surface.set_attribute(state.root, PLACEHOLDER_ATTR, placeholder)?;
    surface.set_attribute(state.root, "style", &format!("min-width: {width}px"))
}

/// Remove the chips spanning `range`, then run a pass.
pub(crate) fn remove_chips<S: Surface>(
    state: &mut EditorState,
    surface: &mut S,
    range: SelectionRange,
    cursor: Option<usize>,
) -> Result<bool, SurfaceError> {
    let doomed = range.slice(&chip::chips(surface, state.root)).to_vec();
    log::debug!(
        target: "emails_editor",
        "removing tokens {}..{} ({} chips)",
        range.start,
        range.end,
        doomed.len()
    );
    for node in doomed {
        surface.remove(node)?;
    }
    let hint = cursor.map_or(CursorHint::Auto, CursorHint::At);
    run_pass(state, surface, hint)
}

// =============================================================================
// Event handlers
// =============================================================================

pub(crate) fn dispatch<S: Surface>(
    state: &mut EditorState,
    surface: &mut S,
    event: &EditorEvent,
) -> Result<Outcome, SurfaceError> {
    log::trace!(target: "emails_editor.event", "{event:?} ({:?})", state.focus);
    match event {
        EditorEvent::Focus => Ok(focus(state, surface)),
        EditorEvent::Blur => blur(state, surface),
        EditorEvent::Input => Ok(Outcome {
            result: EventResult::Continue,
            changed: input(state, surface)?,
        }),
        EditorEvent::Paste(text) => paste(state, surface, text),
        EditorEvent::KeyDown(Key::Enter) => Ok(Outcome::prevented(run_pass(
            state,
            surface,
            CursorHint::Auto,
        )?)),
        EditorEvent::KeyDown(Key::Backspace) => backspace(state, surface),
        EditorEvent::KeyDown(Key::Other(_)) => Ok(Outcome::proceed()),
        EditorEvent::MouseDown { target } => Ok(mouse_down(state, surface, *target)),
        EditorEvent::Click { target } => click(state, surface, *target),
    }
}

fn focus<S: Surface>(state: &mut EditorState, surface: &mut S) -> Outcome {
    state.focus = Focus::Focused;
    if !selection_inside(surface, state.root) {
        translate::place_cursor(surface, state.root, state.tokens.len());
    }
    if state.pending_frame.is_none() {
        state.pending_frame = Some(surface.request_frame());
    }
    Outcome::proceed()
}

fn blur<S: Surface>(state: &mut EditorState, surface: &mut S) -> Result<Outcome, SurfaceError> {
    state.focus = Focus::Unfocused;
    if let Some(frame) = state.pending_frame.take() {
        surface.cancel_frame(frame);
    }
    let changed = run_pass(state, surface, CursorHint::Auto)?;
    Ok(Outcome {
        result: EventResult::Continue,
        changed,
    })
}

/// Stabilization frame: nudge the caret off separator markers.
pub(crate) fn frame<S: Surface>(state: &mut EditorState, surface: &mut S, frame: FrameId) {
    if state.pending_frame != Some(frame) {
        return;
    }
    state.pending_frame = None;
    if !state.is_focused() {
        return;
    }
    if translate::is_on_separator(surface, state.root)
        && let Some(sel) = translate::capture(surface, state.root)
    {
        translate::place_cursor(surface, state.root, sel.start);
    }
    state.pending_frame = Some(surface.request_frame());
}

fn input<S: Surface>(state: &mut EditorState, surface: &mut S) -> Result<bool, SurfaceError> {
    if needs_format(surface, state.root) {
        return run_pass(state, surface, CursorHint::Auto);
    }
    let changed = sync_chips(state, surface);
    refresh_chrome(state, surface)?;
    Ok(changed)
}

/// Drop tokens whose chips a native edit deleted, leaving free text
/// uncommitted. Returns whether the token sequence changed.
fn sync_chips<S: Surface + ?Sized>(state: &mut EditorState, surface: &S) -> bool {
    let labels: Vec<String> = chip::chips(surface, state.root)
        .into_iter()
        .map(|node| chip::chip_label(surface, node))
        .collect();
    if labels == state.tokens {
        return false;
    }
    log::debug!(
        target: "emails_editor",
        "native edit left {} of {} chips",
        labels.len(),
        state.tokens.len()
    );
    state.tokens = labels;
    true
}

fn paste<S: Surface>(state: &mut EditorState, surface: &mut S, text: &str) -> Result<Outcome, SurfaceError> {
    let text = collapse_whitespace(text);
    if !selection_inside(surface, state.root) {
        translate::place_cursor(surface, state.root, state.tokens.len());
    }
    surface.insert_text(&text)?;
    Ok(Outcome::prevented(input(state, surface)?))
}

fn backspace<S: Surface>(state: &mut EditorState, surface: &mut S) -> Result<Outcome, SurfaceError> {
    let root = state.root;
    let Some(selection) = surface.selection() else {
        return Ok(Outcome::proceed());
    };
    if !surface.contains(root, selection.anchor.node) {
        return Ok(Outcome::proceed());
    }

    if !selection.is_collapsed() {
        return ranged_backspace(state, surface);
    }

    let anchor = selection.anchor;
    let native = if anchor.node == root {
        anchor
            .offset
            .checked_sub(1)
            .and_then(|i| surface.children(root).get(i))
            .is_some_and(|prev| is_free_text(surface, root, *prev))
    } else {
        anchor.offset > 0 && is_free_text(surface, root, anchor.node)
    };
    if native {
        return Ok(Outcome::proceed());
    }

    let Some(range) = translate::capture(surface, root) else {
        return Ok(Outcome::proceed());
    };
    let Some(target) = range.backspace_target() else {
        return Ok(Outcome::prevented(false));
    };
    let changed = remove_chips(state, surface, target, Some(target.start))?;
    Ok(Outcome::prevented(changed))
}

/// Backspace over a non-collapsed native selection.
///
/// A range that spans no chip is plain text editing and stays native.
/// Otherwise the selected nodes and text go together and one pass follows.
fn ranged_backspace<S: Surface>(state: &mut EditorState, surface: &mut S) -> Result<Outcome, SurfaceError> {
    let Some(range) = translate::capture(surface, state.root).filter(|r| !r.is_collapsed()) else {
        return Ok(Outcome::proceed());
    };
    log::debug!(
        target: "emails_editor",
        "deleting selection over tokens {}..{}",
        range.start,
        range.end
    );
    surface.delete_backward()?;
    let changed = run_pass(state, surface, CursorHint::Auto)?;
    Ok(Outcome::prevented(changed))
}

fn mouse_down<S: Surface>(state: &mut EditorState, surface: &mut S, target: Id) -> Outcome {
    let root = state.root;
    if target == root || within_remove_control(surface, root, target) {
        return Outcome::proceed();
    }
    let Some(index) = chip::resolve_chip_index(surface, root, target) else {
        return Outcome::proceed();
    };
    translate::place_cursor(surface, root, index + 1);
    Outcome::prevented(false)
}

fn click<S: Surface>(state: &mut EditorState, surface: &mut S, target: Id) -> Result<Outcome, SurfaceError> {
    let root = state.root;
    let Some(handler) = listening_ancestor(surface, root, target, EventKind::Click) else {
        return Ok(Outcome::proceed());
    };
    if !chip::is_remove_control(surface, handler) {
        return Ok(Outcome::proceed());
    }
    let Some(index) = chip::resolve_chip_index(surface, root, handler) else {
        return Ok(Outcome::proceed());
    };
    let cursor = shifted_cursor(surface, root, index);
    let changed = remove_chips(state, surface, SelectionRange::new(index, index + 1), cursor)?;
    Ok(Outcome::prevented(changed))
}

/// Captured cursor start, adjusted for the removal of token `removed`.
pub(crate) fn shifted_cursor<S: Surface + ?Sized>(surface: &S, root: Id, removed: usize) -> Option<usize> {
    translate::capture(surface, root).map(|sel| {
        if sel.start > removed {
            sel.start - 1
        } else {
            sel.start
        }
    })
}

fn selection_inside<S: Surface + ?Sized>(surface: &S, root: Id) -> bool {
    surface
        .selection()
        .is_some_and(|sel| surface.contains(root, sel.anchor.node))
}

/// A text node outside any chip or separator.
fn is_free_text<S: Surface + ?Sized>(surface: &S, root: Id, node: Id) -> bool {
    surface.is_text(node)
        && surface
            .top_level_child(root, node)
            .is_some_and(|top| !chip::is_chip(surface, top) && !chip::is_separator(surface, top))
}

fn within_remove_control<S: Surface + ?Sized>(surface: &S, root: Id, node: Id) -> bool {
    let mut current = Some(node);
    while let Some(n) = current
        && n != root
    {
        if chip::is_remove_control(surface, n) {
            return true;
        }
        current = surface.parent(n);
    }
    false
}

/// Nearest node from `target` up to `root` listening for `kind`.
fn listening_ancestor<S: Surface + ?Sized>(surface: &S, root: Id, target: Id, kind: EventKind) -> Option<Id> {
    if !surface.contains(root, target) {
        return None;
    }
    let mut current = Some(target);
    while let Some(node) = current {
        if surface.has_listener(node, kind) {
            return Some(node);
        }
        if node == root {
            break;
        }
        current = surface.parent(node);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use surface::{Boundary, DomSurface, NativeSelection};

    fn setup(tokens: &[&str]) -> (DomSurface, EditorState) {
        let mut dom = DomSurface::new();
        let root = dom.create_element("div");
        let body = dom.body();
        dom.append_child(body, root).unwrap();
        let mut state = EditorState::new(root, "empty".into(), "more".into());
        let tokens = tokens.iter().map(|t| t.to_string()).collect();
        apply_tokens(&mut state, &mut dom, tokens, None).unwrap();
        (dom, state)
    }

    #[test]
    fn rebuild_frames_chips_with_separators() {
        let (dom, state) = setup(&["a@b.com", "x"]);
        let children = dom.children(state.root);
        assert_eq!(children.len(), 5);
        assert!(chip::is_separator(&dom, children[0]));
        assert!(chip::is_chip(&dom, children[1]));
        assert!(chip::is_separator(&dom, children[2]));
        assert!(chip::is_chip(&dom, children[3]));
        assert!(chip::is_separator(&dom, children[4]));

        let (empty, state) = setup(&[]);
        assert_eq!(empty.children(state.root).len(), 1);
    }

    #[test]
    fn remove_controls_listen_for_clicks() {
        let (dom, state) = setup(&["a@b.com"]);
        let chip = dom.children(state.root)[1];
        let control = dom.children(chip)[1];
        assert!(dom.has_listener(control, EventKind::Click));
        assert_eq!(
            listening_ancestor(&dom, state.root, control, EventKind::Click),
            Some(control)
        );
        assert_eq!(listening_ancestor(&dom, state.root, chip, EventKind::Click), None);
    }

    #[test]
    fn adjacent_text_nodes_merge_into_one_token() {
        let (mut dom, state) = setup(&["a@b.com"]);
        let root = state.root;
        let first = dom.create_text("ab");
        let second = dom.create_text("c@d.e");
        dom.append_child(root, first).unwrap();
        dom.append_child(root, second).unwrap();

        let derived = derive_tokens(&dom, root);
        assert_eq!(derived.tokens, vec!["a@b.com", "abc@d.e"]);
        assert_eq!(derived.after_last_edit, Some(2));
    }

    #[test]
    fn chips_split_free_text_runs() {
        let (mut dom, state) = setup(&["mid@x.y"]);
        let root = state.root;
        let chip = dom.children(root)[1];
        let before = dom.create_text("left");
        dom.insert_before(root, before, chip).unwrap();
        let derived = derive_tokens(&dom, root);
        assert_eq!(derived.tokens, vec!["left", "mid@x.y"]);
        assert_eq!(derived.after_last_edit, Some(1));
    }

    #[test]
    fn whitespace_only_text_marks_edit_position() {
        let (mut dom, state) = setup(&["a@b.c", "d@e.f"]);
        let root = state.root;
        let space = dom.create_text(" \u{200B}");
        let second_chip = dom.children(root)[3];
        dom.insert_before(root, space, second_chip).unwrap();
        let derived = derive_tokens(&dom, root);
        assert_eq!(derived.tokens, vec!["a@b.c", "d@e.f"]);
        assert_eq!(derived.after_last_edit, Some(1));
    }

    #[test]
    fn lazy_guard_waits_for_separator_or_double_break() {
        let (mut dom, state) = setup(&[]);
        let root = state.root;
        let text = dom.create_text("abc");
        dom.append_child(root, text).unwrap();
        assert!(!needs_format(&dom, root));

        let br = dom.create_element("br");
        dom.append_child(root, br).unwrap();
        assert!(!needs_format(&dom, root));
        let gap = dom.create_text("");
        dom.append_child(root, gap).unwrap();
        let br2 = dom.create_element("br");
        dom.append_child(root, br2).unwrap();
        assert!(needs_format(&dom, root));

        dom.remove(br2).unwrap();
        dom.set_text(text, "abc,").unwrap();
        assert!(needs_format(&dom, root));
    }

    #[test]
    fn pass_reports_change_and_places_cursor_after_edit() {
        let (mut dom, mut state) = setup(&["a@b.c"]);
        state.focus = Focus::Focused;
        let root = state.root;
        let text = dom.create_text("x@y.z ");
        let trailing = dom.children(root)[2];
        dom.insert_before(root, text, trailing).unwrap();
        dom.set_caret(text, 6);

        assert!(run_pass(&mut state, &mut dom, CursorHint::Auto).unwrap());
        assert_eq!(state.tokens, vec!["a@b.c", "x@y.z"]);
        assert_eq!(
            dom.selection(),
            Some(NativeSelection::collapsed(Boundary::new(root, 4)))
        );
        assert!(!run_pass(&mut state, &mut dom, CursorHint::Auto).unwrap());
    }

    #[test]
    fn placeholder_follows_token_count() {
        let (mut dom, mut state) = setup(&[]);
        let root = state.root;
        assert_eq!(dom.attribute(root, PLACEHOLDER_ATTR), Some("empty"));
        apply_tokens(&mut state, &mut dom, vec!["a@b.c".into()], None).unwrap();
        assert_eq!(dom.attribute(root, PLACEHOLDER_ATTR), Some("more"));
    }

    #[test]
    fn width_covers_free_text_or_placeholder() {
        let (mut dom, state) = setup(&[]);
        let root = state.root;
        assert_eq!(dom.attribute(root, "style"), Some("min-width: 40px"));
        let text = dom.create_text("a-much-longer-entry");
        dom.append_child(root, text).unwrap();
        refresh_chrome(&state, &mut dom).unwrap();
        assert_eq!(dom.attribute(root, "style"), Some("min-width: 152px"));
    }

    #[test]
    fn frame_is_ignored_unless_pending() {
        let (mut dom, mut state) = setup(&["a@b.c"]);
        let stale = dom.request_frame();
        frame(&mut state, &mut dom, stale);
        assert_eq!(state.pending_frame, None);
    }
}
