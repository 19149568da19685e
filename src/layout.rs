//! Page composition geometry.
//!
//! Pure arithmetic over page points: no I/O, no codec, no document library,
//! so every placement is testable with literal pixel inputs and exact
//! expected rectangles. Coordinates are top-left origin; the document writer
//! converts to its own coordinate space.

/// A4 page size in points.
pub const A4_WIDTH_PT: f64 = 595.28;
pub const A4_HEIGHT_PT: f64 = 841.89;

/// Half-inch default page margin.
pub const DEFAULT_MARGIN_PT: f64 = 36.0;

/// A target area on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A computed draw rectangle for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Scale an image to fit inside `region` (shrunk by `padding` on all sides)
/// without distortion, centered in the region.
///
/// The scale is uniform on both axes: `min` of the per-axis ratios, so the
/// image always fits entirely. Degenerate image dimensions fall back to the
/// full padded region rather than dividing by zero.
pub fn fit_to_region(img_w_px: i64, img_h_px: i64, region: Region, padding: f64) -> Placement {
    let avail_w = region.w - 2.0 * padding;
    let avail_h = region.h - 2.0 * padding;

    if img_w_px <= 0 || img_h_px <= 0 {
        return Placement {
            x: region.x + padding,
            y: region.y + padding,
            w: avail_w,
            h: avail_h,
        };
    }

    let iw = img_w_px as f64;
    let ih = img_h_px as f64;
    let scale = (avail_w / iw).min(avail_h / ih);
    let draw_w = iw * scale;
    let draw_h = ih * scale;

    Placement {
        x: region.x + (region.w - draw_w) / 2.0,
        y: region.y + (region.h - draw_h) / 2.0,
        w: draw_w,
        h: draw_h,
    }
}

/// [`fit_to_region`] specialized to one full page with uniform margins.
pub fn fit_to_page(img_w_px: i64, img_h_px: i64, page_w: f64, page_h: f64, margin: f64) -> Placement {
    let page = Region {
        x: 0.0,
        y: 0.0,
        w: page_w,
        h: page_h,
    };
    fit_to_region(img_w_px, img_h_px, page, margin)
}

/// Partition the content area (page minus margins) into two vertically
/// stacked regions: the top takes `top_fraction` of the content height, the
/// bottom takes the remainder minus `gap`.
pub fn split_page_vertically(
    page_w: f64,
    page_h: f64,
    margin: f64,
    gap: f64,
    top_fraction: f64,
) -> (Region, Region) {
    let content_w = page_w - 2.0 * margin;
    let content_h = page_h - 2.0 * margin;
    let top_h = content_h * top_fraction;

    let top = Region {
        x: margin,
        y: margin,
        w: content_w,
        h: top_h,
    };
    let bottom = Region {
        x: margin,
        y: margin + top_h + gap,
        w: content_w,
        h: content_h - top_h - gap,
    };
    (top, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "expected {b}, got {a}");
    }

    #[test]
    fn scale_is_bounded_by_tighter_axis() {
        // Width scale 200/100 = 2, height scale 200/50 = 4; chosen scale 2.
        let region = Region { x: 0.0, y: 0.0, w: 200.0, h: 200.0 };
        let p = fit_to_region(100, 50, region, 0.0);
        assert_close(p.x, 0.0);
        assert_close(p.y, 50.0);
        assert_close(p.w, 200.0);
        assert_close(p.h, 100.0);
    }

    #[test]
    fn tall_image_bounded_by_height() {
        let region = Region { x: 0.0, y: 0.0, w: 200.0, h: 100.0 };
        let p = fit_to_region(50, 100, region, 0.0);
        assert_close(p.w, 50.0);
        assert_close(p.h, 100.0);
        assert_close(p.x, 75.0);
        assert_close(p.y, 0.0);
    }

    #[test]
    fn padding_shrinks_available_area() {
        let region = Region { x: 10.0, y: 20.0, w: 120.0, h: 120.0 };
        let p = fit_to_region(100, 100, region, 10.0);
        assert_close(p.w, 100.0);
        assert_close(p.h, 100.0);
        // Centered in the region, which here equals the padded interior.
        assert_close(p.x, 20.0);
        assert_close(p.y, 30.0);
    }

    #[test]
    fn degenerate_image_takes_full_padded_region() {
        let region = Region { x: 5.0, y: 5.0, w: 100.0, h: 50.0 };
        let p = fit_to_region(0, 240, region, 5.0);
        assert_close(p.x, 10.0);
        assert_close(p.y, 10.0);
        assert_close(p.w, 90.0);
        assert_close(p.h, 40.0);
    }

    #[test]
    fn page_fit_centers_on_page() {
        let p = fit_to_page(1000, 1000, A4_WIDTH_PT, A4_HEIGHT_PT, DEFAULT_MARGIN_PT);
        // Square image on A4 is width-bound: 595.28 - 72 points wide.
        assert_close(p.w, A4_WIDTH_PT - 2.0 * DEFAULT_MARGIN_PT);
        assert_close(p.h, p.w);
        assert_close(p.x, DEFAULT_MARGIN_PT);
        assert_close(p.y, (A4_HEIGHT_PT - p.h) / 2.0);
    }

    #[test]
    fn vertical_split_partitions_content_area() {
        let (top, bottom) = split_page_vertically(600.0, 800.0, 50.0, 20.0, 0.25);
        assert_close(top.x, 50.0);
        assert_close(top.y, 50.0);
        assert_close(top.w, 500.0);
        assert_close(top.h, 175.0);
        assert_close(bottom.x, 50.0);
        assert_close(bottom.y, 245.0);
        assert_close(bottom.w, 500.0);
        assert_close(bottom.h, 505.0);
        // Top + gap + bottom spans the whole content height.
        assert_close(top.h + 20.0 + bottom.h, 700.0);
    }
}
