//! Logo overlay markup and reference resolution.
//!
//! The overlay is plain `<image>` markup centered over the symbol; whether
//! the reference inside it is a `data:` URI or an external URL is the
//! resolver's business. Resolution never fails a render: a reference that
//! cannot be inlined is kept verbatim (browsers may still fetch it; the
//! bitmap rasterizer will skip it with a warning).

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// The `<g><image/></g>` overlay for a symbol of `size` modules, or nothing
/// when there is no reference to show.
pub(crate) fn logo_markup(size: usize, logo_url: Option<&str>) -> String {
    let Some(url) = logo_url else {
        return String::new();
    };
    let logo_size = size as f64 / 2.0;
    let offset = size as f64 - logo_size / 2.0;
    format!(
        "<g>\n  <image href=\"{url}\" x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"xMidYMid meet\" />\n</g>",
        x = fmt_fixed(offset),
        y = fmt_fixed(offset),
        w = fmt_fixed(logo_size),
        h = fmt_fixed(logo_size),
    )
}

/// Two-decimal formatting for the overlay box.
fn fmt_fixed(v: f64) -> String {
    format!("{v:.2}")
}

/// Resolves a logo reference for embedding.
///
/// An already-inlined `data:` URI passes through untouched. A readable
/// local file is inlined as a base64 data URI with its media type guessed
/// from the extension. Anything else (remote URL, unreadable path) is
/// returned verbatim after a warning.
pub fn resolve_logo(reference: &str) -> String {
    if reference.starts_with("data:") {
        return reference.to_string();
    }

    let path = Path::new(reference);
    if path.is_file() {
        match fs::read(path) {
            Ok(bytes) => {
                let mime = mime_guess::from_path(path).first_or_octet_stream();
                return format!("data:{mime};base64,{}", BASE64.encode(&bytes));
            }
            Err(e) => {
                log::warn!("failed to read logo file {reference}: {e}; keeping the reference");
            }
        }
    }
    reference.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn no_reference_means_no_markup() {
        assert_eq!(logo_markup(25, None), "");
    }

    #[test]
    fn overlay_is_centered_and_aspect_preserving() {
        let markup = logo_markup(25, Some("logo.png"));
        assert!(markup.contains("href=\"logo.png\""));
        assert!(markup.contains("x=\"18.75\""));
        assert!(markup.contains("y=\"18.75\""));
        assert!(markup.contains("width=\"12.50\""));
        assert!(markup.contains("height=\"12.50\""));
        assert!(markup.contains("preserveAspectRatio=\"xMidYMid meet\""));
    }

    #[test]
    fn data_uris_pass_through() {
        let uri = "data:image/png;base64,QUJD";
        assert_eq!(resolve_logo(uri), uri);
    }

    #[test]
    fn local_files_are_inlined() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"ABC").unwrap();
        let resolved = resolve_logo(file.path().to_str().unwrap());
        assert_eq!(resolved, "data:image/png;base64,QUJD");
    }

    #[test]
    fn unresolvable_references_are_kept_verbatim() {
        assert_eq!(
            resolve_logo("https://example.com/logo.png"),
            "https://example.com/logo.png"
        );
        assert_eq!(resolve_logo("/no/such/file.png"), "/no/such/file.png");
    }
}
