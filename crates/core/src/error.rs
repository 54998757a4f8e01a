//! Error types for the sketchbook core.

use thiserror::Error;

/// Errors produced while constructing canvases, colors, or sketches.
///
/// Per-frame operations never fail; everything that can go wrong is caught
/// when external values (dimensions, hex strings, text assets, names) enter
/// the kernel.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Width, height, or logical short side was zero, or the pixel count overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A sketch name was not found in the registry.
    #[error("unknown sketch: {0}")]
    UnknownSketch(String),

    /// Text assets handed to a sketch were empty or malformed.
    #[error("invalid text data: {0}")]
    InvalidText(String),

    /// Writing a snapshot or reading an asset failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let err = SketchError::InvalidDimensions;
        let msg = format!("{err}");
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_color_includes_message() {
        let err = SketchError::InvalidColor("bad hex".into());
        let msg = format!("{err}");
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn unknown_sketch_includes_name() {
        let err = SketchError::UnknownSketch("light-cones".into());
        let msg = format!("{err}");
        assert!(msg.contains("light-cones"), "missing name in: {msg}");
    }

    #[test]
    fn invalid_text_includes_message() {
        let err = SketchError::InvalidText("no sentences".into());
        assert!(err.to_string().contains("no sentences"));
    }

    #[test]
    fn io_includes_message() {
        let err = SketchError::Io("disk full".into());
        assert!(err.to_string().contains("disk full"));
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
