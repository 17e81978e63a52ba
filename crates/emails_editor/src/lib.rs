//! # emails_editor
//!
//! Text-to-chip conversion engine for an email list input.
//!
//! The editor watches raw input on a content-editable root (typing, paste,
//! key presses, focus changes, pointer clicks) and keeps three things
//! consistent at every step:
//! - the canonical ordered token list ([`EmailsEditor::get_emails`])
//! - the rendered chips under the root
//! - the caret, expressed in token positions
//!
//! ## Architecture
//!
//! - [`chip`]: chip and separator markup
//! - [`translate`]: node-space selection to token indices and back
//! - `machine`: explicit editor state, event handlers and the
//!   re-tokenization pass
//! - [`EmailsEditor`]: the facade hosts construct and drive
//!
//! Everything renders through an injected [`surface::Surface`], so the
//! engine runs headless against [`surface::DomSurface`].

pub mod chip;
mod config;
mod dynamic;
mod editor;
mod error;
mod event;
mod machine;
pub mod translate;

pub use config::EditorConfig;
pub use editor::{EmailsEditor, EmailsEditorBuilder};
pub use email_core::EmailRecord;
pub use error::EditorError;
pub use event::{EditorEvent, EventResult, Key};
pub use machine::PLACEHOLDER_ATTR;
