//! QR code rendering.
//!
//! A [`Renderer`] turns the scan URL of a record into image bytes. Renderers
//! are pure: they don't touch storage or the network.

pub mod error;
pub mod png;

pub use error::RenderError;
pub use png::{PngRenderer, PngSettings};

/// Trait for rendering a scannable code for a target URL.
pub trait Renderer: Send + Sync + 'static {
    /// Encodes `target` and returns the rendered image.
    ///
    /// Rendering the same target twice yields identical bytes.
    fn render(&self, target: &str) -> Result<Vec<u8>, RenderError>;
}
