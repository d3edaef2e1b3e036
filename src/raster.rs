//! Bitmap export.
//!
//! Re-parses a composer-produced document and paints it into an RGBA
//! buffer. The parser is deliberately literal: it understands exactly the
//! subset the composer emits — a root `viewBox`, zero-or-one `<rect>`
//! (treated as a full-canvas background), `<path>` elements whose data uses
//! absolute `M`, relative `h`/`v`/`a` (circular arcs) and `z`, an optional
//! `transform="translate(x,y)"`, and `<image>` elements whose `href` is a
//! base64 data URI. Anything else is rejected or skipped with a warning.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{imageops, Rgba, RgbaImage};
use regex::Regex;

use crate::error::{Error, Result};

/// Default output edge length in pixels.
pub const RASTER_SIZE: u32 = 1000;

fn viewbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"viewBox="([^"]+)""#).expect("viewBox pattern"))
}

fn rect_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<rect\s[^>]*>").expect("rect pattern"))
}

fn path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<path\s[^>]*>").expect("path pattern"))
}

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<image\s[^>]*>").expect("image pattern"))
}

fn translate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"translate\(([^)]+)\)").expect("translate pattern"))
}

/// Rasterizes an SVG document (composer subset) into a `size` x `size`
/// RGBA image. Pixels outside every shape stay fully transparent.
///
/// # Errors
///
/// [`Error::Render`] when the document falls outside the supported subset.
pub fn rasterize(svg: &str, size: u32) -> Result<RgbaImage> {
    let view_box = parse_view_box(svg)?;
    let scale = f64::from(size) / view_box.2.max(view_box.3);
    let mut img = RgbaImage::new(size, size);

    if let Some(rect) = rect_re().find(svg) {
        if let Some(fill) = attr(rect.as_str(), "fill").and_then(parse_color) {
            for pixel in img.pixels_mut() {
                *pixel = fill;
            }
        }
    }

    for element in path_re().find_iter(svg) {
        paint_path(&mut img, element.as_str(), view_box, scale)?;
    }

    for element in image_re().find_iter(svg) {
        paint_image(&mut img, element.as_str(), view_box, scale);
    }

    Ok(img)
}

fn parse_view_box(svg: &str) -> Result<(f64, f64, f64, f64)> {
    let capture = viewbox_re()
        .captures(svg)
        .ok_or_else(|| Error::Render(String::from("document has no viewBox")))?;
    let fields: Vec<f64> = capture[1]
        .split_whitespace()
        .map(f64::from_str)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::Render(String::from("malformed viewBox")))?;
    match fields[..] {
        [x, y, w, h] if w > 0.0 && h > 0.0 => Ok((x, y, w, h)),
        _ => Err(Error::Render(String::from("malformed viewBox"))),
    }
}

/// Pulls a quoted attribute value out of an element's text. The needle is
/// space-prefixed so `d=` never matches inside `id=`.
fn attr<'a>(element: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {name}=\"");
    let start = element.find(&needle)? + needle.len();
    let rest = &element[start..];
    Some(&rest[..rest.find('"')?])
}

fn parse_color(value: &str) -> Option<Rgba<u8>> {
    if value == "transparent" {
        return None;
    }
    if let Some(hex) = value.strip_prefix('#') {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut parts = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                if let (Some(Some(r)), Some(Some(g)), Some(Some(b))) =
                    (parts.next(), parts.next(), parts.next())
                {
                    return Some(Rgba([r, g, b, 255]));
                }
            }
            6 => {
                if let (Some(r), Some(g), Some(b)) =
                    (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]))
                {
                    return Some(Rgba([r, g, b, 255]));
                }
            }
            _ => {}
        }
    }
    log::warn!("unsupported color {value:?}, painting black");
    Some(Rgba([0, 0, 0, 255]))
}

fn parse_translate(element: &str) -> (f64, f64) {
    let Some(transform) = attr(element, "transform") else {
        return (0.0, 0.0);
    };
    let Some(capture) = translate_re().captures(transform) else {
        return (0.0, 0.0);
    };
    let coords: Vec<f64> =
        capture[1].split(',').filter_map(|c| c.trim().parse().ok()).collect();
    match coords[..] {
        [x, y] => (x, y),
        [x] => (x, 0.0),
        _ => (0.0, 0.0),
    }
}

fn paint_path(
    img: &mut RgbaImage,
    element: &str,
    view_box: (f64, f64, f64, f64),
    scale: f64,
) -> Result<()> {
    let (Some(d), Some(fill)) = (attr(element, "d"), attr(element, "fill")) else {
        return Ok(());
    };
    let Some(color) = parse_color(fill) else {
        return Ok(());
    };
    let (tx, ty) = parse_translate(element);

    let subpaths = parse_path_data(d)?;
    let canvas: Vec<Vec<(f64, f64)>> = subpaths
        .iter()
        .map(|subpath| {
            subpath
                .iter()
                .map(|&(x, y)| {
                    (((x + tx) - view_box.0) * scale, ((y + ty) - view_box.1) * scale)
                })
                .collect()
        })
        .collect();
    fill_even_odd(img, &canvas, color);
    Ok(())
}

/// Parses path data into flattened closed subpaths. Supported commands are
/// the composer's alphabet: absolute `M`, relative `h`, `v`, `a`, and `z`.
fn parse_path_data(d: &str) -> Result<Vec<Vec<(f64, f64)>>> {
    let mut subpaths: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut cursor = (0.0_f64, 0.0_f64);

    let bytes = d.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let c = bytes[pos] as char;
        if c.is_ascii_whitespace() || c == ',' {
            pos += 1;
            continue;
        }
        pos += 1;
        match c {
            'M' => {
                if current.len() > 1 {
                    subpaths.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                let x = next_number(bytes, &mut pos)?;
                let y = next_number(bytes, &mut pos)?;
                cursor = (x, y);
                current.push(cursor);
            }
            'h' => {
                cursor.0 += next_number(bytes, &mut pos)?;
                current.push(cursor);
            }
            'v' => {
                cursor.1 += next_number(bytes, &mut pos)?;
                current.push(cursor);
            }
            'a' => {
                let rx = next_number(bytes, &mut pos)?;
                let ry = next_number(bytes, &mut pos)?;
                let _rotation = next_number(bytes, &mut pos)?;
                let large = next_number(bytes, &mut pos)? != 0.0;
                let sweep = next_number(bytes, &mut pos)? != 0.0;
                let dx = next_number(bytes, &mut pos)?;
                let dy = next_number(bytes, &mut pos)?;
                if (rx - ry).abs() > 1e-9 {
                    return Err(Error::Render(String::from(
                        "only circular arcs are supported",
                    )));
                }
                let end = (cursor.0 + dx, cursor.1 + dy);
                flatten_arc(cursor, rx, large, sweep, end, &mut current);
                cursor = end;
            }
            'z' | 'Z' => {
                if let Some(&start) = current.first() {
                    cursor = start;
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
            other => {
                return Err(Error::Render(format!("unsupported path command {other:?}")));
            }
        }
    }
    if current.len() > 1 {
        subpaths.push(current);
    }
    Ok(subpaths)
}

fn next_number(bytes: &[u8], pos: &mut usize) -> Result<f64> {
    while *pos < bytes.len() && (bytes[*pos].is_ascii_whitespace() || bytes[*pos] == b',') {
        *pos += 1;
    }
    let start = *pos;
    if *pos < bytes.len() && (bytes[*pos] == b'-' || bytes[*pos] == b'+') {
        *pos += 1;
    }
    while *pos < bytes.len() && (bytes[*pos].is_ascii_digit() || bytes[*pos] == b'.') {
        *pos += 1;
    }
    std::str::from_utf8(&bytes[start..*pos])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Render(String::from("malformed number in path data")))
}

/// Flattens a circular arc into line segments, via the SVG
/// endpoint-to-center conversion specialized to equal radii and zero
/// rotation.
fn flatten_arc(
    from: (f64, f64),
    radius: f64,
    large: bool,
    sweep: bool,
    to: (f64, f64),
    out: &mut Vec<(f64, f64)>,
) {
    let chord = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
    if radius <= 1e-9 || chord <= 1e-12 {
        out.push(to);
        return;
    }

    let dx = (from.0 - to.0) / 2.0;
    let dy = (from.1 - to.1) / 2.0;
    let denom = dx * dx + dy * dy;
    let mut r = radius;
    if denom > r * r {
        r = denom.sqrt();
    }
    let mut coef = ((r * r - denom) / denom).max(0.0).sqrt();
    if large == sweep {
        coef = -coef;
    }
    let cx = coef * dy + (from.0 + to.0) / 2.0;
    let cy = -coef * dx + (from.1 + to.1) / 2.0;

    let theta_from = (from.1 - cy).atan2(from.0 - cx);
    let theta_to = (to.1 - cy).atan2(to.0 - cx);
    let mut delta = theta_to - theta_from;
    if sweep && delta < 0.0 {
        delta += std::f64::consts::TAU;
    } else if !sweep && delta > 0.0 {
        delta -= std::f64::consts::TAU;
    }

    const SEGMENTS: usize = 16;
    for i in 1..=SEGMENTS {
        let t = theta_from + delta * (i as f64 / SEGMENTS as f64);
        out.push((cx + r * t.cos(), cy + r * t.sin()));
    }
}

/// Scanline evenodd fill over flattened subpaths in canvas coordinates.
fn fill_even_odd(img: &mut RgbaImage, subpaths: &[Vec<(f64, f64)>], color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    let mut crossings: Vec<f64> = Vec::new();

    for py in 0..height {
        let yc = f64::from(py) + 0.5;
        crossings.clear();
        for subpath in subpaths {
            let count = subpath.len();
            if count < 2 {
                continue;
            }
            for i in 0..count {
                let (x1, y1) = subpath[i];
                let (x2, y2) = subpath[(i + 1) % count];
                if (y1 <= yc && yc < y2) || (y2 <= yc && yc < y1) {
                    crossings.push(x1 + (yc - y1) * (x2 - x1) / (y2 - y1));
                }
            }
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0) as u32;
            let end = ((span[1] - 0.5).ceil().max(0.0) as u32).min(width);
            for px in start..end {
                img.put_pixel(px, py, color);
            }
        }
    }
}

/// Paints one `<image>` element. Only base64 data URIs are paintable;
/// anything else is skipped so a missing logo never fails the export.
fn paint_image(img: &mut RgbaImage, element: &str, view_box: (f64, f64, f64, f64), scale: f64) {
    let Some(href) = attr(element, "href") else {
        return;
    };
    let Some(payload) = href.strip_prefix("data:").and_then(|r| r.split_once(";base64,")) else {
        log::warn!("skipping logo with non-inline href");
        return;
    };
    let Ok(bytes) = BASE64.decode(payload.1) else {
        log::warn!("skipping logo with undecodable data URI");
        return;
    };
    let Ok(logo) = image::load_from_memory(&bytes) else {
        log::warn!("skipping logo in an unsupported image format");
        return;
    };

    let number = |name: &str| attr(element, name).and_then(|v| v.parse::<f64>().ok());
    let (Some(x), Some(y), Some(w), Some(h)) =
        (number("x"), number("y"), number("width"), number("height"))
    else {
        return;
    };

    let target_w = ((w * scale).round() as u32).max(1);
    let target_h = ((h * scale).round() as u32).max(1);
    let scaled = imageops::resize(&logo.to_rgba8(), target_w, target_h, imageops::FilterType::Triangle);
    let px = ((x - view_box.0) * scale).round() as i64;
    let py = ((y - view_box.1) * scale).round() as i64;
    imageops::overlay(img, &scaled, px, py);
}
