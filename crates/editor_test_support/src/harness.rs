//! Drives an [`EmailsEditor`] over a [`DomSurface`] the way a browser host
//! would: native edits go to the surface first, then the matching event is
//! reported to the editor.

use crate::{diff_lines, snapshot};
use email_core::EmailRecord;
use emails_editor::{EditorConfig, EditorEvent, EmailsEditor, EventResult, Key, chip};
use std::cell::RefCell;
use std::rc::Rc;
use surface::{DomSurface, Id, Surface};

pub struct Harness {
    editor: EmailsEditor<DomSurface>,
    changes: Rc<RefCell<Vec<Vec<EmailRecord>>>>,
}

impl Harness {
    pub fn new(config: EditorConfig) -> Self {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let dom = DomSurface::new();
        let host = dom.body();
        let editor = EmailsEditor::builder(dom, host)
            .config(config)
            .on_change(move |records| sink.borrow_mut().push(records.to_vec()))
            .build()
            .unwrap_or_else(|err| panic!("failed to build editor: {err}"));
        Self { editor, changes }
    }

    pub fn with_emails(emails: &[&str]) -> Self {
        Self::new(EditorConfig {
            initial_emails: emails.iter().map(|e| e.to_string()).collect(),
            ..EditorConfig::default()
        })
    }

    pub fn editor(&self) -> &EmailsEditor<DomSurface> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EmailsEditor<DomSurface> {
        &mut self.editor
    }

    pub fn dom(&self) -> &DomSurface {
        self.editor.surface()
    }

    pub fn root(&self) -> Id {
        self.editor.root()
    }

    /// Committed token values, in order.
    pub fn values(&self) -> Vec<String> {
        self.editor.get_emails().into_iter().map(|r| r.value).collect()
    }

    /// Every listener payload received so far.
    pub fn changes(&self) -> Vec<Vec<EmailRecord>> {
        self.changes.borrow().clone()
    }

    pub fn change_count(&self) -> usize {
        self.changes.borrow().len()
    }

    pub fn send(&mut self, event: EditorEvent) -> EventResult {
        let label = format!("{event:?}");
        self.editor
            .handle_event(event)
            .unwrap_or_else(|err| panic!("{label} failed: {err}"))
    }

    pub fn focus(&mut self) {
        self.send(EditorEvent::Focus);
    }

    pub fn blur(&mut self) {
        self.send(EditorEvent::Blur);
    }

    /// Type `text` one character at a time.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            let key = Key::Other(ch.to_string());
            if self.send(EditorEvent::KeyDown(key)) == EventResult::Continue {
                self.native_insert(&ch.to_string());
                self.send(EditorEvent::Input);
            }
        }
    }

    /// Press a key, applying the native action when the editor lets it through.
    pub fn press(&mut self, key: Key) -> EventResult {
        let result = self.send(EditorEvent::KeyDown(key.clone()));
        if result == EventResult::Continue {
            match key {
                Key::Backspace => {
                    self.editor
                        .surface_mut()
                        .delete_backward()
                        .unwrap_or_else(|err| panic!("native backspace failed: {err}"));
                    self.send(EditorEvent::Input);
                }
                Key::Enter => {
                    self.native_insert("\n");
                    self.send(EditorEvent::Input);
                }
                Key::Other(_) => {}
            }
        }
        result
    }

    pub fn enter(&mut self) -> EventResult {
        self.press(Key::Enter)
    }

    pub fn backspace(&mut self) -> EventResult {
        self.press(Key::Backspace)
    }

    pub fn paste(&mut self, text: &str) -> EventResult {
        let result = self.send(EditorEvent::Paste(text.to_string()));
        if result == EventResult::Continue {
            self.native_insert(text);
            self.send(EditorEvent::Input);
        }
        result
    }

    /// Removal controls in document order.
    pub fn remove_controls(&self) -> Vec<Id> {
        self.dom()
            .query_all(self.root(), |dom, node| chip::is_remove_control(dom, node))
    }

    pub fn chip_nodes(&self) -> Vec<Id> {
        chip::chips(self.dom(), self.root())
    }

    /// Press and release the pointer on the removal control of chip `index`.
    pub fn click_remove(&mut self, index: usize) -> EventResult {
        let target = self
            .remove_controls()
            .get(index)
            .copied()
            .unwrap_or_else(|| panic!("no removal control at index {index}"));
        self.send(EditorEvent::MouseDown { target });
        self.send(EditorEvent::Click { target })
    }

    /// Press the pointer on the label of chip `index`.
    pub fn mouse_down_on_chip(&mut self, index: usize) -> EventResult {
        let chip = self
            .chip_nodes()
            .get(index)
            .copied()
            .unwrap_or_else(|| panic!("no chip at index {index}"));
        let target = self.dom().children(chip)[0];
        self.send(EditorEvent::MouseDown { target })
    }

    /// Run every pending animation frame once.
    pub fn run_frames(&mut self) {
        let frames = self.editor.surface_mut().take_frames();
        for frame in frames {
            self.editor.on_frame(frame);
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        snapshot(self.dom(), self.root())
    }

    pub fn assert_snapshot(&self, expected: &[&str]) {
        let expected: Vec<String> = expected.iter().map(|l| l.to_string()).collect();
        let actual = self.snapshot();
        if expected != actual {
            panic!("surface snapshot mismatch\n{}", diff_lines(&expected, &actual));
        }
    }

    fn native_insert(&mut self, text: &str) {
        self.editor
            .surface_mut()
            .insert_text(text)
            .unwrap_or_else(|err| panic!("native insert of {text:?} failed: {err}"));
    }
}
