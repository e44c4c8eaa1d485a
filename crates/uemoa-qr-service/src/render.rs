//! # Barcode Rendering
//!
//! The seam between payload strings and image bytes. The service never
//! draws pixels itself; a front end attaches a [`BarcodeRenderer`].

use serde::{Deserialize, Serialize};

use crate::config::ImageFormat;
use crate::error::ServiceResult;

/// Rendering parameters taken from [`crate::config::ImageSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Side length in pixels.
    pub size: u32,
    /// Quiet zone in modules.
    pub margin: u32,
    /// Output format.
    pub format: ImageFormat,
}

impl Default for ImageSpec {
    fn default() -> Self {
        ImageSpec {
            size: 300,
            margin: 1,
            format: ImageFormat::Png,
        }
    }
}

/// Turns a payload string into encoded image bytes.
///
/// Implementations must be shareable across threads: one renderer serves
/// every request of a [`crate::QrService`].
pub trait BarcodeRenderer: Send + Sync {
    /// Renders `data` according to `spec`.
    fn render(&self, data: &str, spec: &ImageSpec) -> ServiceResult<Vec<u8>>;
}

impl<F> BarcodeRenderer for F
where
    F: Fn(&str, &ImageSpec) -> ServiceResult<Vec<u8>> + Send + Sync,
{
    fn render(&self, data: &str, spec: &ImageSpec) -> ServiceResult<Vec<u8>> {
        self(data, spec)
    }
}
