//! Finder-pattern ("eye") markers.
//!
//! The encoder's native finder bits are masked out of the matrix and the
//! three eyes are redrawn here as concentric rounded squares: a 14x14 outer
//! ring with a punched 10x10 hole combined in one evenodd path, plus a 6x6
//! center dot. All geometry is in the doubled coordinate space, so an eye
//! spans the usual 7 modules.

use crate::moves::fmt_num;

/// Rounding used by the eyes for a given module rounding `radius`:
/// scaled threefold, floored at 0.5 so sharp symbols keep a hint of shape.
fn eye_radius(radius: f64) -> f64 {
    (radius * 3.0).max(0.5)
}

/// One eye: outer ring with hole, then the center dot, as a single
/// evenodd path data string anchored at `(x, y)`.
fn eye_path(x: f64, y: f64, r: f64) -> String {
    let side = 14.0 - 2.0 * r;
    let outer = format!(
        "M{mx},{my}h{side}a{r},{r} 0 0,1 {r},{r}v{side}a{r},{r} 0 0,1 -{r},{r}h-{side}a{r},{r} 0 0,1 -{r},-{r}v-{side}a{r},{r} 0 0,1 {r},-{r}z",
        mx = fmt_num(x + r),
        my = fmt_num(y),
        side = fmt_num(side),
        r = fmt_num(r),
    );

    let ir = r * 0.7;
    let iside = 10.0 - 2.0 * ir;
    let inner = format!(
        "M{mx},{my}a{ir},{ir} 0 0,0 -{ir},{ir}v{iside}a{ir},{ir} 0 0,0 {ir},{ir}h{iside}a{ir},{ir} 0 0,0 {ir},-{ir}v-{iside}a{ir},{ir} 0 0,0 -{ir},-{ir}h-{iside}z",
        mx = fmt_num(x + 2.0 + ir),
        my = fmt_num(y + 2.0),
        ir = fmt_num(ir),
        iside = fmt_num(iside),
    );

    let cr = r * 0.5;
    let cside = 6.0 - 2.0 * cr;
    let center = format!(
        "M{mx},{my}h{cside}a{cr},{cr} 0 0,1 {cr},{cr}v{cside}a{cr},{cr} 0 0,1 -{cr},{cr}h-{cside}a{cr},{cr} 0 0,1 -{cr},-{cr}v-{cside}a{cr},{cr} 0 0,1 {cr},-{cr}z",
        mx = fmt_num(x + 4.0 + cr),
        my = fmt_num(y + 4.0),
        cr = fmt_num(cr),
        cside = fmt_num(cside),
    );

    format!("{outer}{inner}{center}")
}

/// The three eye elements for a symbol of `size` modules: top-left,
/// top-right, bottom-left, in the foreground color.
pub(crate) fn eye_markup(size: usize, color: &str, radius: f64) -> String {
    let r = eye_radius(radius);
    let far = size as f64 * 2.0 - 14.0;
    let positions = [(0.0, 0.0), (far, 0.0), (0.0, far)];

    positions
        .iter()
        .map(|&(x, y)| {
            format!(
                "<path d=\"{}\" fill=\"{}\" fill-rule=\"evenodd\"/>",
                eye_path(x, y, r),
                color
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_three_evenodd_paths() {
        let markup = eye_markup(21, "#000", 1.0);
        assert_eq!(markup.matches("<path").count(), 3);
        assert_eq!(markup.matches("fill-rule=\"evenodd\"").count(), 3);
        assert_eq!(markup.matches("fill=\"#000\"").count(), 3);
    }

    #[test]
    fn eyes_sit_at_the_three_symbol_corners() {
        let markup = eye_markup(21, "#000", 1.0);
        // 2*21 - 14 = 28; full rounding gives eye radius 3.
        assert!(markup.contains("M3,0"));
        assert!(markup.contains("M31,0"));
        assert!(markup.contains("M3,28"));
    }

    #[test]
    fn eye_radius_is_floored_for_sharp_symbols() {
        assert_eq!(eye_radius(0.0), 0.5);
        assert_eq!(eye_radius(0.1), 0.5);
        assert_eq!(eye_radius(0.5), 1.5);
        assert_eq!(eye_radius(1.0), 3.0);
    }

    #[test]
    fn ring_hole_and_dot_are_concentric_subpaths() {
        let path = eye_path(0.0, 0.0, 3.0);
        assert_eq!(path.matches('M').count(), 3);
        // Outer ring edge 14-2r = 8, hole anchored at 2 + 0.7r, dot at 4 + 0.5r.
        assert!(path.starts_with("M3,0h8"));
        assert!(path.contains("M4.1,2"));
        assert!(path.contains("M5.5,4h3"));
    }

    #[test]
    fn radius_changes_the_eye_shape() {
        assert_ne!(eye_markup(21, "#000", 0.0), eye_markup(21, "#000", 1.0));
    }
}
