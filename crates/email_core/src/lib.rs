//! # email_core
//!
//! UI-agnostic token layer for the emails editor.
//!
//! This crate provides the pure building blocks the editor is assembled from:
//! - [`validate`]: syntactic classification of one token
//! - [`tokenize`]: splitting raw text on whitespace/comma runs
//! - [`EmailRecord`]: the `{ value, valid }` view handed to callers
//! - [`SelectionRange`]: a cursor or selection in token-index space
//!
//! ## Design Principles
//!
//! Nothing here knows about nodes, chips or events. Every function is pure,
//! so the engine's text rules can be tested without a rendering surface.

mod record;
mod selection;
mod tokenize;
mod validate;

pub use record::{EmailRecord, records};
pub use selection::SelectionRange;
pub use tokenize::{collapse_whitespace, has_separator, is_separator, tokenize, tokens};
pub use validate::validate;
