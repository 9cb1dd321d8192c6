//! How the add-product flow obtains a barcode, a photo and an expiry date.
//!
//! One add flow, parameterized by [`CaptureBackend`]. The terminal client
//! supports file upload and manual entry; live camera decoding is declared so
//! callers can ask for it and get a clear refusal.

use std::fmt;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Photos larger than this are rejected before encoding.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Errors from the capture backends.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{0} is not available in the terminal client")]
    Unavailable(CaptureBackend),

    #[error("cannot read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("image {path} is {size} bytes, limit is {MAX_IMAGE_BYTES}")]
    TooLarge { path: String, size: u64 },
}

/// Ways of capturing product data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureBackend {
    /// Read a photo from disk.
    FileUpload,
    /// Type the barcode or the date.
    ManualEntry,
    /// Decode a barcode from a live camera feed.
    LiveCamera,
}

impl CaptureBackend {
    #[must_use]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::LiveCamera)
    }

    /// Fail unless this backend can be used here.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::Unavailable` for the live camera.
    pub const fn ensure_available(self) -> Result<(), CaptureError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(CaptureError::Unavailable(self))
        }
    }
}

impl fmt::Display for CaptureBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FileUpload => "file upload",
            Self::ManualEntry => "manual entry",
            Self::LiveCamera => "live camera",
        })
    }
}

/// Mime type guessed from the file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Encode bytes as a `data:<mime>;base64,...` URL.
#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read a photo from disk into a data URL for the product's `image` field.
///
/// # Errors
///
/// Returns `CaptureError` if the file cannot be read or is too large.
pub fn image_from_file(path: &Path) -> Result<String, CaptureError> {
    let shown = path.display().to_string();
    let read_error = |source| CaptureError::Read {
        path: shown.clone(),
        source,
    };

    let size = std::fs::metadata(path).map_err(read_error)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(CaptureError::TooLarge {
            path: shown,
            size,
        });
    }

    let bytes = std::fs::read(path).map_err(read_error)?;
    tracing::debug!(path = %shown, size, "Photo attached");
    Ok(data_url(mime_for_path(path), &bytes))
}
