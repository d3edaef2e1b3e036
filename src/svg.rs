//! Final document composition.
//!
//! Assembles the background rect, the traced body path, the three eyes and
//! the optional logo overlay into one SVG document string. The emitted
//! markup stays inside the subset contract the bitmap rasterizer parses:
//! root `viewBox`, zero-or-one `rect`, evenodd `path` elements, and an
//! optional `<g><image/></g>`.

use crate::error::Result;
use crate::eyes::eye_markup;
use crate::logo::logo_markup;
use crate::matrix::build_matrix;
use crate::moves::MoveCache;
use crate::options::QrOptions;
use crate::trace::trace_path;

/// Renders `data` as a styled SVG document.
///
/// The caller owns the move cache; passing the same cache across calls
/// reuses corner primitives per radius. Output is deterministic: identical
/// input yields a byte-identical document.
///
/// # Errors
///
/// [`Error::Validation`](crate::Error::Validation) and
/// [`Error::Capacity`](crate::Error::Capacity) as surfaced by matrix
/// construction.
pub fn generate_svg(data: &str, options: &QrOptions, cache: &MoveCache) -> Result<String> {
    let matrix = build_matrix(data, options)?;
    let size = matrix.size();
    let radius = options.effective_radius();

    let table = cache.table(radius);
    let body = trace_path(&matrix, &table);

    // Padding is configured in modules; the path grid doubles every module.
    let pad = 2 * i64::from(options.padding);
    let extent = (size as i64 + pad) * 2;
    let view_box = format!("{} {} {} {}", -pad, -pad, extent, extent);

    let background = if options.background_color != "transparent" {
        format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"{fill}\"/>",
            x = -pad,
            y = -pad,
            w = extent,
            h = extent,
            fill = options.background_color,
        )
    } else {
        String::new()
    };

    let eyes = eye_markup(size, &options.foreground_color, radius);
    let logo = if options.has_logo {
        logo_markup(size, options.logo_url.as_deref())
    } else {
        String::new()
    };

    Ok(format!(
        "<?xml version=\"1.0\"?><svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:svg=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"{view_box}\">{background}<g class=\"layer\">\n  <title>Layer 1</title><path d=\"{body}\" fill-rule=\"evenodd\" fill=\"{fill}\" id=\"svg_1\" /></g>{eyes}{logo}</svg>",
        fill = options.foreground_color,
    ))
}
