//! Text output elements

/// Named text output element, such as the fps or frame count readout.
///
/// Writes replace the whole content.
pub trait TextField: Send + Sync {
    /// Replace the displayed text
    fn set_text_content(&self, text: &str);
    fn text_content(&self) -> String;
}
