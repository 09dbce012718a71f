//! Error types for the wheels core.

use thiserror::Error;

/// Errors produced at the fallible edges of a sketch: configuration,
/// palettes, colors and snapshot output.
///
/// Normal sketch operation (layout, frames, input) never produces an error;
/// an exhausted placement budget silently drops the motif instead.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Canvas width or height was zero or not finite.
    #[error("invalid dimensions: width and height must be positive")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// No built-in palette has the requested name.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// No sketch variant has the requested name.
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// A parameter was present but its value is unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_mentions_width_and_height() {
        let msg = SketchError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn unknown_palette_includes_name() {
        let msg = SketchError::UnknownPalette("sepia".into()).to_string();
        assert!(msg.contains("sepia"), "missing palette name in: {msg}");
    }

    #[test]
    fn unknown_variant_includes_name() {
        let msg = SketchError::UnknownVariant("deluxe".into()).to_string();
        assert!(msg.contains("deluxe"), "missing variant name in: {msg}");
    }

    #[test]
    fn invalid_param_includes_name_and_reason() {
        let err = SketchError::InvalidParam {
            name: "size_range".into(),
            reason: "start must not exceed end".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("size_range"), "missing param name in: {msg}");
        assert!(msg.contains("exceed"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = SketchError::InvalidColor("bad hex".into()).to_string();
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn sketch_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SketchError>();
    }

    #[test]
    fn sketch_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<SketchError>();
    }
}
