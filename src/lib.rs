//! # qrism
//!
//! A Rust library for rendering QR codes as styled vector graphics.
//!
//! `qrism` encodes text or URL data into a QR symbol and draws it as a
//! single compound SVG outline with parametric corner rounding, custom
//! colors, redrawn finder markers ("eyes"), an optional centered logo
//! overlay, and PNG rasterization of the produced document. The QR
//! error-correction math itself is delegated to the `qrcodegen` crate; this
//! library owns everything from the module matrix onward.
//!
//! ## Features
//!
//! - Corner rounding from sharp squares (`radius = 0.0`) to full
//!   quarter-circles (`radius = 1.0`), applied by a contour tracer that
//!   emits one evenodd outline per symbol.
//! - Custom foreground and background colors, with `"transparent"` as the
//!   no-background sentinel.
//! - Logo carve-out: the matrix center is cleared and an `<image>` overlay
//!   embedded, with local files inlined as data URIs.
//! - Deterministic output: identical input produces byte-identical SVG.
//! - PNG export through a built-in rasterizer for the emitted SVG subset.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrism = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a styled symbol and export it:
//!
//! ```rust
//! use qrism::{QrOptions, QrStyling};
//!
//! let options = QrOptions {
//!     radius: 0.5,
//!     background_color: String::from("#ffffff"),
//!     ..QrOptions::default()
//! };
//! let qr = QrStyling::new("https://example.com", options);
//!
//! let svg = qr.svg().unwrap();
//! assert!(svg.starts_with("<?xml"));
//!
//! let bitmap = qr.bitmap().unwrap();
//! assert_eq!(bitmap.dimensions(), (1000, 1000));
//! ```
//!
//! ## Modules
//!
//! - [`options`]: Symbol and styling options.
//! - [`matrix`]: Module-matrix construction and masking.
//! - [`moves`]: Corner move primitives and the per-radius cache.
//! - [`svg`]: Document composition.
//! - [`raster`]: Bitmap export.
//! - [`logo`]: Logo overlay and reference resolution.
//! - [`encoder`]: Adapter over the external QR encoder.

#![forbid(unsafe_code)]

pub mod encoder;
pub mod error;
mod eyes;
pub mod logo;
pub mod matrix;
pub mod moves;
pub mod options;
pub mod raster;
pub mod svg;
mod trace;

use std::fs;
use std::path::Path;

use image::RgbaImage;

pub use crate::encoder::ModuleSource;
pub use crate::error::Error;
pub use crate::logo::resolve_logo;
pub use crate::matrix::{build_matrix, Matrix};
pub use crate::moves::MoveCache;
pub use crate::options::{Ecc, Mode, QrOptions};
pub use crate::raster::{rasterize, RASTER_SIZE};
pub use crate::svg::generate_svg;

/// A configured QR styling pipeline: payload, options, and the per-radius
/// move cache shared across renders.
///
/// The cache makes repeated renders at the same radius cheap; independent
/// `QrStyling` values never share mutable state, so concurrent renders are
/// safe.
pub struct QrStyling {
    data: String,
    options: QrOptions,
    cache: MoveCache,
}

impl QrStyling {
    /// Creates a pipeline for `data`. The corner radius is clamped to
    /// `[0, 1]` on construction.
    pub fn new(data: impl Into<String>, mut options: QrOptions) -> Self {
        options.clamp_radius();
        QrStyling { data: data.into(), options, cache: MoveCache::new() }
    }

    /// The configured payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The configured options.
    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    /// Replaces the payload for subsequent renders.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Mutates the options in place; the corner radius is re-clamped
    /// afterwards, so out-of-range updates degrade instead of failing.
    pub fn update(&mut self, mutate: impl FnOnce(&mut QrOptions)) {
        mutate(&mut self.options);
        self.options.clamp_radius();
    }

    /// Renders the styled SVG document.
    ///
    /// A configured logo reference is resolved first: local files are
    /// inlined as data URIs, unresolvable references are embedded
    /// verbatim. Setting `logo_url` implies the carve-out even when
    /// `has_logo` was left false.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for rejected input, [`Error::Capacity`] when
    /// the data does not fit the requested symbol.
    pub fn svg(&self) -> Result<String, Error> {
        let mut options = self.options.clone();
        options.has_logo = options.has_logo || options.logo_url.is_some();
        if options.has_logo {
            if let Some(reference) = options.logo_url.as_deref() {
                options.logo_url = Some(resolve_logo(reference));
            }
        }
        generate_svg(&self.data, &options, &self.cache)
    }

    /// Renders the symbol into a [`RASTER_SIZE`]-pixel square bitmap.
    pub fn bitmap(&self) -> Result<RgbaImage, Error> {
        self.bitmap_sized(RASTER_SIZE)
    }

    /// Renders the symbol into a `size`-pixel square bitmap.
    pub fn bitmap_sized(&self, size: u32) -> Result<RgbaImage, Error> {
        rasterize(&self.svg()?, size)
    }

    /// Writes the symbol to `path`: PNG when the extension is `png`
    /// (case-insensitive), SVG otherwise.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            self.bitmap()?.save(path)?;
        } else {
            fs::write(path, self.svg()?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_clamped_on_construction_and_update() {
        let mut qr = QrStyling::new("x", QrOptions { radius: 7.0, ..QrOptions::default() });
        assert_eq!(qr.options().radius, 1.0);

        qr.update(|options| options.radius = -3.0);
        assert_eq!(qr.options().radius, 0.0);
    }

    #[test]
    fn logo_url_implies_the_carve_out() {
        let plain = QrStyling::new("payload", QrOptions::default());
        let with_logo = QrStyling::new(
            "payload",
            QrOptions {
                logo_url: Some(String::from("data:image/png;base64,QUJD")),
                ..QrOptions::default()
            },
        );
        let svg = with_logo.svg().unwrap();
        assert!(svg.contains("<image"));
        assert_ne!(svg, plain.svg().unwrap());
    }

    #[test]
    fn save_picks_the_format_from_the_extension() {
        let qr = QrStyling::new("hello", QrOptions::default());
        let dir = tempfile::tempdir().unwrap();

        let svg_path = dir.path().join("qr.svg");
        qr.save(&svg_path).unwrap();
        assert!(fs::read_to_string(&svg_path).unwrap().starts_with("<?xml"));

        let png_path = dir.path().join("qr.PNG");
        qr.save(&png_path).unwrap();
        let decoded = image::open(&png_path).unwrap();
        assert_eq!(decoded.to_rgba8().dimensions(), (RASTER_SIZE, RASTER_SIZE));
    }

    #[test]
    fn bitmap_honors_the_background_option() {
        let qr = QrStyling::new(
            "hello",
            QrOptions { background_color: String::from("#ff0000"), ..QrOptions::default() },
        );
        let img = qr.bitmap_sized(100).unwrap();
        // The quiet zone shows pure background.
        assert_eq!(img.get_pixel(1, 1), &image::Rgba([255, 0, 0, 255]));
    }
}
