//! Text-mode barcode renderer for terminals.

use qrcode::QrCode;
use uemoa_qr_service::{BarcodeRenderer, ImageSpec, ServiceError, ServiceResult};

/// Draws the code with block characters instead of pixels.
///
/// `spec.margin` switches the quiet zone on or off; size and format do not
/// apply to text output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl BarcodeRenderer for TerminalRenderer {
    fn render(&self, data: &str, spec: &ImageSpec) -> ServiceResult<Vec<u8>> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| ServiceError::RenderFailed(e.to_string()))?;
        let text = code
            .render::<char>()
            .quiet_zone(spec.margin > 0)
            .module_dimensions(2, 1)
            .build();
        Ok(text.into_bytes())
    }
}
