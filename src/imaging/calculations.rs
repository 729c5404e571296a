//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions of a shrink-only thumbnail that fits inside a box.
///
/// The result preserves the source aspect ratio, never exceeds either bound,
/// and meets at least one bound exactly. Sources that already fit inside the
/// box are returned unchanged: thumbnails are never upscaled.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (max width, max height)
///
/// # Examples
/// ```
/// # use live_gal::imaging::fit_within;
/// // 1000x500 into 100x80 → width is the tight axis
/// assert_eq!(fit_within((1000, 500), (100, 80)), (100, 50));
///
/// // Smaller than the box → untouched
/// assert_eq!(fit_within((50, 40), (100, 80)), (50, 40));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 || (src_w <= max_w && src_h <= max_h) {
        return source;
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the tight axis
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w, h.max(1).min(max_h))
    } else {
        // Height is the tight axis
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.max(1).min(max_w), max_h)
    }
}

/// Calculate the on-page display size of an image in the gallery grid.
///
/// Compares the source aspect ratio with the box's: wider sources are capped
/// on width, taller (or equal) sources on height, and the other axis follows
/// the aspect ratio. Fractional results are truncated, so the display size can
/// be a pixel short of [`fit_within`] for the same inputs.
///
/// # Examples
/// ```
/// # use live_gal::imaging::display_dimensions;
/// // 2:1 landscape in a 500x400 box → 500x250
/// assert_eq!(display_dimensions((1000, 500), (500, 400)), (500, 250));
///
/// // 1:2 portrait → 200x400
/// assert_eq!(display_dimensions((400, 800), (500, 400)), (200, 400));
/// ```
pub fn display_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 {
        return source;
    }

    let aspect = src_w as f64 / src_h as f64;
    let box_aspect = max_w as f64 / max_h as f64;

    let (width, height) = if aspect > box_aspect {
        let width = src_w.min(max_w) as f64;
        (width, width / aspect)
    } else {
        let height = src_h.min(max_h) as f64;
        (height * aspect, height)
    };

    ((width as u32).max(1), (height as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // fit_within tests
    // =========================================================================

    #[test]
    fn fit_landscape_width_is_tight() {
        assert_eq!(fit_within((1000, 500), (100, 80)), (100, 50));
    }

    #[test]
    fn fit_portrait_height_is_tight() {
        // 500x1000 into 100x80 → height 80, width 40
        assert_eq!(fit_within((500, 1000), (100, 80)), (40, 80));
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(fit_within((50, 40), (100, 80)), (50, 40));
        assert_eq!(fit_within((100, 80), (100, 80)), (100, 80));
    }

    #[test]
    fn fit_one_axis_already_inside() {
        // Only width exceeds: 150x60 into 100x80 → 100x40
        assert_eq!(fit_within((150, 60), (100, 80)), (100, 40));
    }

    #[test]
    fn fit_same_aspect_hits_both_bounds() {
        assert_eq!(fit_within((800, 640), (100, 80)), (100, 80));
    }

    #[test]
    fn fit_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within((10_000, 1), (100, 80)), (100, 1));
    }

    #[test]
    fn fit_properties_hold_across_sizes() {
        let bounds = [(100, 80), (500, 400), (64, 64), (300, 50)];
        let sources = [
            (1, 1),
            (37, 1200),
            (640, 480),
            (1920, 1080),
            (1080, 1920),
            (3000, 2999),
            (499, 401),
        ];
        for &(bw, bh) in &bounds {
            for &(sw, sh) in &sources {
                let (w, h) = fit_within((sw, sh), (bw, bh));
                assert!(w <= bw && h <= bh, "{sw}x{sh} in {bw}x{bh} gave {w}x{h}");
                assert!(w <= sw && h <= sh, "{sw}x{sh} upscaled to {w}x{h}");
                if sw > bw || sh > bh {
                    assert!(w == bw || h == bh, "{sw}x{sh} in {bw}x{bh} not tight");
                    let src_aspect = sw as f64 / sh as f64;
                    // One pixel of rounding on the short axis
                    let lo = (w as f64 - 0.5).max(0.5) / (h as f64 + 0.5);
                    let hi = (w as f64 + 0.5) / (h as f64 - 0.5).max(0.5);
                    assert!(
                        src_aspect >= lo && src_aspect <= hi,
                        "{sw}x{sh} aspect drifted to {w}x{h}"
                    );
                }
            }
        }
    }

    // =========================================================================
    // display_dimensions tests
    // =========================================================================

    #[test]
    fn display_wide_source_capped_on_width() {
        assert_eq!(display_dimensions((1000, 500), (500, 400)), (500, 250));
    }

    #[test]
    fn display_tall_source_capped_on_height() {
        assert_eq!(display_dimensions((400, 800), (500, 400)), (200, 400));
    }

    #[test]
    fn display_box_aspect_uses_height_branch() {
        // 1.25 is not strictly wider than the 500x400 box
        assert_eq!(display_dimensions((1000, 800), (500, 400)), (500, 400));
    }

    #[test]
    fn display_small_source_not_upscaled() {
        assert_eq!(display_dimensions((100, 50), (500, 400)), (100, 50));
        assert_eq!(display_dimensions((40, 80), (500, 400)), (40, 80));
    }

    #[test]
    fn display_truncates_fractions() {
        // 600x100 → width 500, height 83.33
        assert_eq!(display_dimensions((600, 100), (500, 400)), (500, 83));
        // 510x400 → width 500, height 392.15
        assert_eq!(display_dimensions((510, 400), (500, 400)), (500, 392));
    }

    #[test]
    fn display_fits_inside_box() {
        for &(sw, sh) in &[(1920, 1080), (1080, 1920), (4000, 3000), (501, 399), (7, 9000)] {
            let (w, h) = display_dimensions((sw, sh), (500, 400));
            assert!(w <= 500 && h <= 400, "{sw}x{sh} gave {w}x{h}");
            assert!(w == 500 || h == 400, "{sw}x{sh} not tight: {w}x{h}");
        }
    }
}
