use surface::SurfaceError;

/// Usage errors raised by the editor facade.
///
/// Every variant is raised before any state changes, so a failed call never
/// leaves a half-applied token sequence behind.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("expected an email string or an array of email strings, found {found}")]
    InvalidEmailValue { found: &'static str },
    /// `index` names the offending element when the value is an array.
    #[error("expected an array of email strings, found {found}{}", at_index(.index))]
    InvalidEmailList {
        index: Option<usize>,
        found: &'static str,
    },
    #[error("index {index} is out of bounds for {len} emails")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("invalid editor config: {0}")]
    Config(String),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

fn at_index(index: &Option<usize>) -> String {
    index.map(|i| format!(" at index {i}")).unwrap_or_default()
}
