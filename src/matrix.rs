//! Module-matrix construction and masking.
//!
//! The raw grid is copied from a [`ModuleSource`] and then reshaped by an
//! ordered list of masks: the eye zones are always cleared (the markers are
//! redrawn as separate shapes), and the center zone is cleared when a logo
//! will be overlaid.

use crate::encoder::{self, ModuleSource};
use crate::error::{Error, Result};
use crate::options::QrOptions;

/// A square grid of dark (`true`) and light (`false`) modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    size: usize,
    cells: Vec<bool>,
}

impl Matrix {
    /// Copies every module out of a source grid.
    pub fn from_modules(source: &dyn ModuleSource) -> Self {
        let size = source.module_count();
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(source.is_dark(row, col));
            }
        }
        Matrix { size, cells }
    }

    /// The side length in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at the given row and column is dark.
    /// Coordinates outside the grid are light.
    pub fn is_dark(&self, row: i32, col: i32) -> bool {
        0 <= row
            && row < self.size as i32
            && 0 <= col
            && col < self.size as i32
            && self.cells[row as usize * self.size + col as usize]
    }

    fn clear(&mut self, row: usize, col: usize) {
        self.cells[row * self.size + col] = false;
    }
}

/// Builds the masked module matrix for `data`.
///
/// # Errors
///
/// [`Error::Validation`] for empty or whitespace-only data, or a type
/// number above 40; [`Error::Capacity`] when the data does not fit the
/// requested symbol.
pub fn build_matrix(data: &str, options: &QrOptions) -> Result<Matrix> {
    if data.trim().is_empty() {
        return Err(Error::Validation(String::from("QR code data cannot be empty")));
    }
    if options.type_number > 40 {
        return Err(Error::Validation(String::from("type number must be between 0 and 40")));
    }

    let qr = encoder::encode(data, options)?;
    let mut matrix = Matrix::from_modules(&qr);
    mask_eyes(&mut matrix);
    if options.has_logo {
        mask_logo(&mut matrix);
    }
    Ok(matrix)
}

/// Clears the three fixed 7x7 finder zones. Applied unconditionally: the
/// eyes are redrawn as separate marker shapes, so the encoder's own finder
/// bits are discarded.
pub(crate) fn mask_eyes(matrix: &mut Matrix) {
    let n = matrix.size();
    for i in 0..7 {
        for j in 0..7 {
            matrix.clear(i, j); // top-left
            matrix.clear(i, n - 7 + j); // top-right
            matrix.clear(n - 7 + i, j); // bottom-left
        }
    }
}

/// Clears the center zone reserved for the logo overlay: rows and columns
/// both in `[round(n/3), round(2n/3))`.
pub(crate) fn mask_logo(matrix: &mut Matrix) {
    let n = matrix.size();
    let start = (n as f64 / 3.0).round() as usize;
    let end = (n as f64 * 2.0 / 3.0).round() as usize;
    for row in start..end {
        for col in start..end {
            matrix.clear(row, col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A synthetic all-dark grid, for exercising the masks in isolation.
    struct AllDark(usize);

    impl ModuleSource for AllDark {
        fn module_count(&self) -> usize {
            self.0
        }

        fn is_dark(&self, _row: usize, _col: usize) -> bool {
            true
        }
    }

    #[test]
    fn eye_zones_are_cleared_regardless_of_encoder_bits() {
        let mut m = Matrix::from_modules(&AllDark(21));
        mask_eyes(&mut m);
        for i in 0..7 {
            for j in 0..7 {
                assert!(!m.is_dark(i, j));
                assert!(!m.is_dark(i, 21 - 7 + j));
                assert!(!m.is_dark(21 - 7 + i, j));
            }
        }
        // The fourth corner is untouched.
        assert!(m.is_dark(20, 20));
    }

    #[test]
    fn logo_zone_is_cleared_only_by_the_logo_mask() {
        let mut m = Matrix::from_modules(&AllDark(25));
        mask_eyes(&mut m);
        assert!(m.is_dark(12, 12));

        mask_logo(&mut m);
        // round(25/3) = 8, round(50/3) = 17
        for row in 8..17 {
            for col in 8..17 {
                assert!(!m.is_dark(row as i32, col as i32));
            }
        }
        assert!(m.is_dark(7, 12));
        assert!(m.is_dark(12, 17));
    }

    #[test]
    fn out_of_range_coordinates_are_light() {
        let m = Matrix::from_modules(&AllDark(21));
        assert!(!m.is_dark(-1, 0));
        assert!(!m.is_dark(0, -1));
        assert!(!m.is_dark(21, 0));
        assert!(!m.is_dark(0, 21));
    }

    #[test]
    fn empty_data_is_rejected() {
        let options = QrOptions::default();
        assert!(matches!(build_matrix("", &options), Err(Error::Validation(_))));
        assert!(matches!(build_matrix("   \t\n", &options), Err(Error::Validation(_))));
    }

    #[test]
    fn type_number_out_of_range_is_rejected() {
        let options = QrOptions { type_number: 41, ..QrOptions::default() };
        assert!(matches!(build_matrix("hello", &options), Err(Error::Validation(_))));
    }

    #[test]
    fn built_matrix_masks_eyes_and_logo_zone() {
        let options = QrOptions { has_logo: true, ..QrOptions::default() };
        let m = build_matrix("https://example.com", &options).unwrap();
        let n = m.size() as i32;
        assert!(!m.is_dark(0, 0));
        assert!(!m.is_dark(0, n - 1));
        assert!(!m.is_dark(n - 1, 0));
        let mid = n / 2;
        assert!(!m.is_dark(mid, mid));
    }
}
