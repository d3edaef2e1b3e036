//! Adapter over the external QR symbol encoder.
//!
//! The Reed-Solomon matrix construction itself is delegated to the
//! [`qrcodegen`] crate; everything downstream of this module only sees the
//! [`ModuleSource`] capability, so the encoder stays swappable and the
//! pipeline can be driven by synthetic grids in tests.

use qrcodegen::{QrCode, QrCodeEcc, QrSegment, Version};

use crate::error::{Error, Result};
use crate::options::{Ecc, Mode, QrOptions};

/// A square grid of dark and light modules, however it was produced.
pub trait ModuleSource {
    /// The width and height of the grid, in modules.
    fn module_count(&self) -> usize;

    /// Whether the module at the given row and column is dark.
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

impl ModuleSource for QrCode {
    fn module_count(&self) -> usize {
        self.size() as usize
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        // qrcodegen addresses modules as (x, y) = (column, row).
        self.get_module(col as i32, row as i32)
    }
}

/// The character set permitted in alphanumeric mode, per the QR standard.
const ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Encodes `data` into a QR symbol honoring the requested type number,
/// error correction level and mode.
///
/// Capacity failures from the underlying encoder are rewrapped as
/// [`Error::Capacity`]; mode/charset mismatches are [`Error::Validation`]
/// (the underlying crate would panic on them, so they are screened here).
pub(crate) fn encode(data: &str, options: &QrOptions) -> Result<QrCode> {
    let segments = make_segments(data, options.mode)?;
    let (min_version, max_version) = version_range(options.type_number);
    // Boost is disabled so the caller-visible level is exactly honored.
    QrCode::encode_segments_advanced(
        &segments,
        ecc_level(options.effective_ecc()),
        min_version,
        max_version,
        None,
        false,
    )
    .map_err(|e| Error::Capacity(e.to_string()))
}

fn ecc_level(ecc: Ecc) -> QrCodeEcc {
    match ecc {
        Ecc::Low => QrCodeEcc::Low,
        Ecc::Medium => QrCodeEcc::Medium,
        Ecc::Quartile => QrCodeEcc::Quartile,
        Ecc::High => QrCodeEcc::High,
    }
}

fn version_range(type_number: u8) -> (Version, Version) {
    if type_number == 0 {
        (Version::MIN, Version::MAX)
    } else {
        let v = Version::new(type_number);
        (v, v)
    }
}

fn make_segments(data: &str, mode: Mode) -> Result<Vec<QrSegment>> {
    match mode {
        Mode::Numeric => {
            if !data.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::Validation(String::from(
                    "numeric mode accepts ASCII digits only",
                )));
            }
            Ok(vec![QrSegment::make_numeric(data)])
        }
        Mode::Alphanumeric => {
            if !data.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c)) {
                return Err(Error::Validation(String::from(
                    "alphanumeric mode accepts digits, uppercase letters and \" $%*+-./:\" only",
                )));
            }
            Ok(vec![QrSegment::make_alphanumeric(data)])
        }
        // Kanji has no segment constructor in qrcodegen; byte segments
        // carry the UTF-8 payload instead.
        Mode::Byte | Mode::Kanji => Ok(vec![QrSegment::make_bytes(data.as_bytes())]),
    }
}
