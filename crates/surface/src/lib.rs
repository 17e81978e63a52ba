//! # surface
//!
//! Rendering-surface capability layer for the emails editor.
//!
//! - [`Surface`]: the capability trait the editor draws into and reads from
//! - [`DomSurface`]: an arena-backed in-memory implementation used for tests,
//!   benches, fuzzing and the demo
//! - [`NativeSelection`] / [`Boundary`]: the host's selection, in node space
//!
//! ## Design Principles
//!
//! The editor never touches a global document. Everything it needs (tree
//! edits, text, selection, plain-text editing, listeners, measurement and
//! animation frames) comes through [`Surface`], so the whole engine runs
//! headless.

mod dom;
mod editing;
mod error;
mod measure;
mod serialize;
mod text;
mod traits;
mod types;

pub use dom::DomSurface;
pub use error::SurfaceError;
pub use measure::{MonospaceMeasurer, TextMeasurer};
pub use text::{clamp_to_char_boundary, escape_html, prev_char_boundary};
pub use traits::Surface;
pub use types::{Boundary, EventKind, FrameId, Id, NativeSelection, NodeId, NodeKind};
