//! Styling and encoding options for a rendered symbol.

/// The error correction level in a QR Code symbol.
///
/// Higher levels tolerate more damage (or a larger logo carve-out) at the
/// cost of capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ecc {
    /// Tolerates about 7% erroneous codewords.
    Low,
    /// Tolerates about 15% erroneous codewords.
    Medium,
    /// Tolerates about 25% erroneous codewords.
    Quartile,
    /// Tolerates about 30% erroneous codewords.
    High,
}

/// The segment encoding mode requested for the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Decimal digits only. Densest packing.
    Numeric,
    /// Digits, uppercase letters and ` $%*+-./:`.
    Alphanumeric,
    /// Arbitrary bytes; the default.
    Byte,
    /// Accepted for API parity; encoded as bytes (see DESIGN notes).
    Kanji,
}

/// Options controlling symbol construction and styling.
///
/// `Default` matches the documented defaults: automatic type number, byte
/// mode, fully rounded corners, one module of padding, black on transparent,
/// no logo. The error correction level, when left unset, resolves to
/// [`Ecc::High`] if a logo is present and [`Ecc::Medium`] otherwise.
#[derive(Clone, Debug)]
pub struct QrOptions {
    /// Symbol version, 0 to 40. Zero lets the encoder pick the smallest
    /// version that fits the data.
    pub type_number: u8,
    /// Explicit error correction level; `None` derives it from `has_logo`.
    pub error_correction: Option<Ecc>,
    /// Segment encoding mode.
    pub mode: Mode,
    /// Corner rounding, 0.0 (sharp) to 1.0 (quarter-circle). Out-of-range
    /// values are clamped at the point of use, never rejected.
    pub radius: f64,
    /// Quiet-zone padding around the symbol, in module units.
    pub padding: u32,
    /// Fill color of the modules and eyes.
    pub foreground_color: String,
    /// Background color, or the sentinel `"transparent"` for none.
    pub background_color: String,
    /// Whether to carve out the center zone for a logo overlay.
    pub has_logo: bool,
    /// Logo reference: a `data:` URI, a local file path, or a remote URL.
    pub logo_url: Option<String>,
}

impl Default for QrOptions {
    fn default() -> Self {
        QrOptions {
            type_number: 0,
            error_correction: None,
            mode: Mode::Byte,
            radius: 1.0,
            padding: 1,
            foreground_color: String::from("#000"),
            background_color: String::from("transparent"),
            has_logo: false,
            logo_url: None,
        }
    }
}

impl QrOptions {
    /// The corner radius actually used for rendering, clamped to `[0, 1]`.
    /// Non-finite values fall back to the default of 1.
    pub fn effective_radius(&self) -> f64 {
        if self.radius.is_finite() {
            self.radius.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Clamps the stored radius in place. Called by the facade on
    /// construction and after every update.
    pub(crate) fn clamp_radius(&mut self) {
        self.radius = self.effective_radius();
    }

    /// The error correction level in effect: the explicit one if set,
    /// otherwise High with a logo and Medium without.
    pub fn effective_ecc(&self) -> Ecc {
        match self.error_correction {
            Some(ecc) => ecc,
            None if self.has_logo => Ecc::High,
            None => Ecc::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecc_defaults_to_high_with_logo() {
        let options = QrOptions { has_logo: true, ..QrOptions::default() };
        assert_eq!(options.effective_ecc(), Ecc::High);
    }

    #[test]
    fn ecc_defaults_to_medium_without_logo() {
        assert_eq!(QrOptions::default().effective_ecc(), Ecc::Medium);
    }

    #[test]
    fn explicit_ecc_wins_over_logo_default() {
        let options = QrOptions {
            has_logo: true,
            error_correction: Some(Ecc::Low),
            ..QrOptions::default()
        };
        assert_eq!(options.effective_ecc(), Ecc::Low);

        let options = QrOptions {
            has_logo: true,
            error_correction: Some(Ecc::Quartile),
            ..QrOptions::default()
        };
        assert_eq!(options.effective_ecc(), Ecc::Quartile);
    }

    #[test]
    fn radius_is_clamped_not_rejected() {
        let options = QrOptions { radius: 2.5, ..QrOptions::default() };
        assert_eq!(options.effective_radius(), 1.0);

        let options = QrOptions { radius: -0.5, ..QrOptions::default() };
        assert_eq!(options.effective_radius(), 0.0);

        let options = QrOptions { radius: f64::NAN, ..QrOptions::default() };
        assert_eq!(options.effective_radius(), 1.0);
    }
}
