//! Errors surfaced at the crate boundary.

use thiserror::Error;

/// Errors that can occur while building or exporting a styled QR symbol.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller input rejected before any encoding work is attempted.
    ///
    /// Raised for empty or whitespace-only data, a type number outside
    /// `0..=40`, or data that cannot be represented in the requested
    /// encoding mode.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The data does not fit the requested type number / error correction
    /// level. Reduce the data size, raise the type number, or lower the
    /// error correction level.
    #[error(
        "data does not fit the requested symbol: {0}; \
         reduce the data size, raise the type number, or lower the error correction level"
    )]
    Capacity(String),

    /// The rasterizer was handed a document outside the SVG subset it
    /// understands. Never produced for composer output.
    #[error("render failed: {0}")]
    Render(String),

    /// Filesystem failure while exporting.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Bitmap encode/decode failure while exporting.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
