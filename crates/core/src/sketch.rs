//! The `Sketch` trait every animated sketch implements.
//!
//! The trait is object-safe so the registry and the CLI can drive any
//! sketch as `dyn Sketch`.

use serde_json::Value;

use crate::canvas::ScalableCanvas;
use crate::input::Input;
use crate::surface::Surface;

/// An animated sketch driven one frame at a time.
///
/// A frame runs in a fixed order: step every sprite, clean out the ones
/// flagged for removal, draw the survivors, then append newly spawned
/// sprites so they first appear on the next frame.
pub trait Sketch {
    /// Draws whatever the sketch needs before the first frame (backgrounds,
    /// one-shot compositions).
    fn setup(&mut self, surface: &mut dyn Surface);

    /// Advances and draws one frame.
    fn frame(&mut self, input: &Input, surface: &mut dyn Surface);

    fn canvas(&self) -> &ScalableCanvas;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Type, default, range, and description of each parameter.
    fn param_schema(&self) -> Value;

    /// Whether the sketch has stopped animating (frames become no-ops).
    fn is_paused(&self) -> bool {
        false
    }
}
