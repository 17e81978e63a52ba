/// Measures the rendered width of a run of text.
///
/// Hosts backed by a real font stack provide their own implementation; the
/// in-memory surface defaults to [`MonospaceMeasurer`].
pub trait TextMeasurer {
    fn measure(&self, text: &str) -> f32;
}

/// Fixed advance per Unicode scalar value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance: f32,
}

impl MonospaceMeasurer {
    pub const DEFAULT_ADVANCE: f32 = 8.0;

    pub const fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADVANCE)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}
