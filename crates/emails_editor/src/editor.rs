//! Public facade over the state machine.

use crate::config::EditorConfig;
use crate::dynamic;
use crate::error::EditorError;
use crate::event::{EditorEvent, EventResult};
use crate::machine::{self, EditorState};
use email_core::{EmailRecord, SelectionRange, records, tokenize, validate};
use serde_json::Value;
use surface::{EventKind, FrameId, Id, Surface};

type ChangeListener = Box<dyn FnMut(&[EmailRecord])>;

/// Events the root element listens for.
const ROOT_EVENTS: [EventKind; 6] = [
    EventKind::Input,
    EventKind::Paste,
    EventKind::MouseDown,
    EventKind::Focus,
    EventKind::Blur,
    EventKind::KeyDown,
];

/// An email chips editor mounted into a [`Surface`].
///
/// The editor owns its surface. Hosts apply native edits (typing, native
/// Backspace) through [`surface_mut`](Self::surface_mut) and report them with
/// [`handle_event`](Self::handle_event); they run animation frames by calling
/// [`on_frame`](Self::on_frame) with the ids the surface handed out.
///
/// # Example
///
/// ```
/// use emails_editor::{EditorEvent, EmailsEditor, Key};
/// use surface::{DomSurface, Surface};
///
/// let dom = DomSurface::new();
/// let host = dom.body();
/// let mut editor = EmailsEditor::builder(dom, host)
///     .initial_emails(["ann@example.com"])
///     .build()
///     .unwrap();
///
/// editor.handle_event(EditorEvent::Focus).unwrap();
/// editor.surface_mut().insert_text("bob@example").unwrap();
/// editor.handle_event(EditorEvent::Input).unwrap();
/// editor.handle_event(EditorEvent::KeyDown(Key::Enter)).unwrap();
///
/// let emails = editor.get_emails();
/// assert_eq!(emails.len(), 2);
/// assert!(emails[0].valid);
/// assert!(!emails[1].valid);
/// ```
pub struct EmailsEditor<S: Surface> {
    surface: S,
    state: EditorState,
    on_change: Option<ChangeListener>,
}

pub struct EmailsEditorBuilder<S: Surface> {
    surface: S,
    host: Id,
    config: EditorConfig,
    on_change: Option<ChangeListener>,
}

impl<S: Surface> EmailsEditorBuilder<S> {
    /// Replace every data option at once.
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.config.class_name = class_name.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    pub fn add_more_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.add_more_placeholder = placeholder.into();
        self
    }

    pub fn initial_emails<I, T>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.config.initial_emails = emails.into_iter().map(Into::into).collect();
        self
    }

    /// Listener invoked after each change to the token list.
    ///
    /// Never invoked for the initial seeding.
    pub fn on_change(mut self, listener: impl FnMut(&[EmailRecord]) + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    /// Create the root under `host` and render the initial emails.
    pub fn build(self) -> Result<EmailsEditor<S>, EditorError> {
        let EmailsEditorBuilder {
            mut surface,
            host,
            config,
            on_change,
        } = self;

        let root = surface.create_element("div");
        surface.set_attribute(root, "class", &config.root_class())?;
        surface.set_attribute(root, "contenteditable", "true")?;
        surface.set_attribute(root, "inputmode", "email")?;
        for kind in ROOT_EVENTS {
            surface.listen(root, kind);
        }
        surface.append_child(host, root)?;

        let tokens = config.initial_emails.iter().flat_map(|e| tokenize(e)).collect();
        let mut state = EditorState::new(root, config.placeholder, config.add_more_placeholder);
        machine::apply_tokens(&mut state, &mut surface, tokens, None)?;
        log::debug!(
            target: "emails_editor",
            "mounted editor {root:?} under {host:?} with {} emails",
            state.tokens.len()
        );

        Ok(EmailsEditor {
            surface,
            state,
            on_change,
        })
    }
}

impl<S: Surface> EmailsEditor<S> {
    pub fn builder(surface: S, host: Id) -> EmailsEditorBuilder<S> {
        EmailsEditorBuilder {
            surface,
            host,
            config: EditorConfig::default(),
            on_change: None,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The committed list, in order, duplicates preserved.
    ///
    /// Free text that no pass has committed yet is not included.
    pub fn get_emails(&self) -> Vec<EmailRecord> {
        records(&self.state.tokens)
    }

    /// Number of syntactically valid entries.
    pub fn valid_count(&self) -> usize {
        self.state.tokens.iter().filter(|t| validate(t)).count()
    }

    pub fn root(&self) -> Id {
        self.state.root
    }

    pub fn is_focused(&self) -> bool {
        self.state.is_focused()
    }

    /// The stabilization frame the editor is waiting on, if any.
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.state.pending_frame
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append the tokens found in `email`.
    ///
    /// Blank input is a no-op and notifies nobody.
    pub fn add_email(&mut self, email: &str) -> Result<(), EditorError> {
        self.add_emails([email])
    }

    pub fn add_emails<I, T>(&mut self, emails: I) -> Result<(), EditorError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let added: Vec<String> = emails
            .into_iter()
            .flat_map(|e| tokenize(e.as_ref()))
            .collect();
        if added.is_empty() {
            return Ok(());
        }
        let mut tokens = machine::derive_tokens(&self.surface, self.state.root).tokens;
        tokens.extend(added);
        self.commit(tokens)
    }

    /// Replace the whole list, uncommitted free text included.
    pub fn set_emails<I, T>(&mut self, emails: I) -> Result<(), EditorError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tokens = emails
            .into_iter()
            .flat_map(|e| tokenize(e.as_ref()))
            .collect();
        self.commit(tokens)
    }

    pub fn reset_emails(&mut self) -> Result<(), EditorError> {
        self.set_emails(std::iter::empty::<&str>())
    }

    pub fn remove_email_at_index(&mut self, index: usize) -> Result<(), EditorError> {
        let len = self.state.tokens.len();
        if index >= len {
            return Err(EditorError::IndexOutOfBounds { index, len });
        }
        let cursor = machine::shifted_cursor(&self.surface, self.state.root, index);
        machine::remove_chips(
            &mut self.state,
            &mut self.surface,
            SelectionRange::new(index, index + 1),
            cursor,
        )?;
        self.notify();
        Ok(())
    }

    /// [`add_emails`](Self::add_emails) for untyped host data: a string or an
    /// array of strings.
    pub fn add_email_value(&mut self, value: &Value) -> Result<(), EditorError> {
        let emails = dynamic::email_inputs(value)?;
        self.add_emails(emails)
    }

    /// [`set_emails`](Self::set_emails) for untyped host data: an array of
    /// strings.
    pub fn set_emails_value(&mut self, value: &Value) -> Result<(), EditorError> {
        let emails = dynamic::email_list(value)?;
        self.set_emails(emails)
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// Feed one host event through the state machine.
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<EventResult, EditorError> {
        let outcome = machine::dispatch(&mut self.state, &mut self.surface, &event)?;
        if outcome.changed {
            self.notify();
        }
        Ok(outcome.result)
    }

    /// Run the stabilization callback for `frame`. Stale frames are ignored.
    pub fn on_frame(&mut self, frame: FrameId) {
        machine::frame(&mut self.state, &mut self.surface, frame);
    }

    fn commit(&mut self, tokens: Vec<String>) -> Result<(), EditorError> {
        machine::apply_tokens(&mut self.state, &mut self.surface, tokens, None)?;
        log::debug!(target: "emails_editor", "api commit: {} emails", self.state.tokens.len());
        self.notify();
        Ok(())
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&records(&self.state.tokens));
        }
    }
}
