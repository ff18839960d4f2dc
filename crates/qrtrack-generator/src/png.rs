use crate::error::RenderError;
use crate::Renderer;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct PngSettings {
    /// Error correction level of the symbol.
    #[builder(default = EcLevel::M)]
    ec_level: EcLevel,
    /// Edge length of a single module, in pixels.
    #[builder(default = 5)]
    module_size: u32,
    /// Whether to surround the symbol with the standard 4-module quiet zone.
    #[builder(default = true)]
    quiet_zone: bool,
}

impl Default for PngSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Renders QR codes as grayscale PNG images.
#[derive(Debug, Clone, Default)]
pub struct PngRenderer {
    settings: PngSettings,
}

impl PngRenderer {
    pub fn new(settings: PngSettings) -> Self {
        Self { settings }
    }
}

impl Renderer for PngRenderer {
    fn render(&self, target: &str) -> Result<Vec<u8>, RenderError> {
        let code = QrCode::with_error_correction_level(target.as_bytes(), self.settings.ec_level)?;

        let raster = code
            .render::<Luma<u8>>()
            .quiet_zone(self.settings.quiet_zone)
            .module_dimensions(self.settings.module_size, self.settings.module_size)
            .build();

        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(raster).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn renders_png() {
        let bytes = PngRenderer::default()
            .render("https://qr.example/scan/1")
            .unwrap();

        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = PngRenderer::default();

        let first = renderer.render("https://qr.example/scan/1").unwrap();
        let second = renderer.render("https://qr.example/scan/1").unwrap();
        let other = renderer.render("https://qr.example/scan/2").unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn image_is_square_and_scaled_by_module_size() {
        let renderer = PngRenderer::new(PngSettings::builder().module_size(4).build());
        let bytes = renderer.render("https://qr.example/scan/1").unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), decoded.height());
        assert_eq!(decoded.width() % 4, 0);
        // smallest symbol (21 modules) plus a 4-module quiet zone on each side
        assert!(decoded.width() >= (21 + 8) * 4);
    }

    #[test]
    fn oversized_target_fails() {
        let target = format!("https://qr.example/{}", "a".repeat(8_000));

        let err = PngRenderer::default().render(&target).unwrap_err();
        assert!(matches!(err, RenderError::Encode(_)));
    }
}
