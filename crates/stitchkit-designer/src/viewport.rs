//! Viewport geometry for the embroidery canvas.
//!
//! Computes the viewport rectangles used by zoom-to-fit and zoom-to-image.
//!
//! The viewport is a world-space rectangle. The rendering engine scales it
//! uniformly onto the canvas, so when the aspect ratios differ the visible
//! area extends past the rectangle on one axis.

pub mod controller;

use stitchkit_core::units::{dpi_to_px_per_world, px_to_world};
use stitchkit_core::{Point, Rect};

/// Inputs shared by the fit computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Breathing room around the content.
    pub margin: f64,
    /// Upper bound on magnification, as screen dpi. `None` means uncapped.
    pub max_dpi: Option<f64>,
}

impl FitParams {
    pub fn new(canvas_width: f64, canvas_height: f64, margin: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            margin,
            max_dpi: None,
        }
    }

    pub fn with_max_dpi(mut self, max_dpi: Option<f64>) -> Self {
        self.max_dpi = max_dpi;
        self
    }

    fn has_canvas(&self) -> bool {
        self.canvas_width > 0.0 && self.canvas_height > 0.0
    }

    /// Smallest allowed world-units-per-pixel.
    fn min_scale(&self) -> f64 {
        match self.max_dpi {
            Some(dpi) if dpi > 0.0 => 1.0 / dpi_to_px_per_world(dpi),
            _ => 0.0,
        }
    }
}

/// Viewport centered on the world origin showing the canvas at `dpi`.
pub fn initial_viewport(canvas_width: f64, canvas_height: f64, dpi: f64) -> Rect {
    Rect::centered(
        Point::origin(),
        px_to_world(canvas_width, dpi),
        px_to_world(canvas_height, dpi),
    )
}

/// Viewport that shows `content` whole, centered, with a margin.
///
/// The result has the canvas aspect ratio. The margin is honored both in
/// world units and in pixels, whichever is larger at the chosen scale.
/// Returns `None` for a missing canvas or degenerate content.
pub fn fit_to_content(content: &Rect, params: &FitParams) -> Option<Rect> {
    if !params.has_canvas() || content.width() < 0.0 || content.height() < 0.0 {
        return None;
    }
    let margin = params.margin.max(0.0);
    let padded = content.expanded(margin);
    if padded.is_empty() {
        return None;
    }

    let (cw, ch) = (params.canvas_width, params.canvas_height);
    let mut scale = (padded.width() / cw).max(padded.height() / ch);

    let (inner_w, inner_h) = (cw - 2.0 * margin, ch - 2.0 * margin);
    if inner_w > 0.0 && inner_h > 0.0 {
        scale = scale
            .max(content.width() / inner_w)
            .max(content.height() / inner_h);
    }
    scale = scale.max(params.min_scale());

    if !scale.is_finite() {
        return None;
    }
    Some(Rect::centered(content.center(), cw * scale, ch * scale))
}

/// Viewport that shows an image whole, keeping the aspect of `current`.
///
/// `current` is the viewport in effect before the zoom.
pub fn fit_to_image(image: &Rect, current: &Rect, params: &FitParams) -> Option<Rect> {
    if image.is_empty() || current.is_empty() {
        return None;
    }
    let padded = image.expanded(params.margin.max(0.0));
    let scale = (padded.width() / current.width()).max(padded.height() / current.height());
    let (mut width, mut height) = (current.width() * scale, current.height() * scale);

    if params.has_canvas() {
        let per_px = (width / params.canvas_width).max(height / params.canvas_height);
        let min_scale = params.min_scale();
        if per_px < min_scale {
            let grow = min_scale / per_px;
            width *= grow;
            height *= grow;
        }
    }

    Some(Rect::centered(image.center(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_content_example() {
        let content = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rect = fit_to_content(&content, &FitParams::new(200.0, 200.0, 10.0))
            .expect("fit");

        assert!(rect.approx_eq(&Rect::new(-10.0, -35.0, 110.0, 85.0), 1e-9));
        assert!(rect.contains_rect(&content.expanded(10.0)));
        assert!((rect.aspect_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_content_degenerate() {
        let params = FitParams::new(200.0, 100.0, 0.0);
        assert!(fit_to_content(&Rect::new(5.0, 5.0, 5.0, 5.0), &params).is_none());
        assert!(fit_to_content(&Rect::new(0.0, 0.0, 1.0, 1.0), &FitParams::new(0.0, 0.0, 1.0)).is_none());

        // a single point still gets a margin-sized window
        let point = fit_to_content(&Rect::new(5.0, 5.0, 5.0, 5.0), &FitParams::new(200.0, 100.0, 10.0))
            .expect("fit");
        assert_eq!(point.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_max_dpi_caps_magnification() {
        let content = Rect::new(0.0, 0.0, 10.0, 10.0);
        let params = FitParams::new(1000.0, 1000.0, 0.0).with_max_dpi(Some(254.0));
        let rect = fit_to_content(&content, &params).expect("fit");
        // at 254 dpi one world unit is one pixel
        assert!((rect.width() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_to_image_keeps_current_aspect() {
        let image = Rect::new(-100.0, -200.0, 100.0, 200.0);
        let current = Rect::new(0.0, 0.0, 300.0, 150.0);
        let rect = fit_to_image(&image, &current, &FitParams::new(600.0, 300.0, 10.0))
            .expect("fit");

        assert!((rect.aspect_ratio() - 2.0).abs() < 1e-9);
        assert!(rect.contains_rect(&image.expanded(10.0)));
        assert_eq!(rect.center(), Point::origin());
        assert!(fit_to_image(&Rect::empty(), &current, &FitParams::new(1.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_initial_viewport_from_canvas_dpi() {
        // 500 px at 96 dpi is 500 / 96 * 254 world units
        let rect = initial_viewport(500.0, 500.0, 96.0);
        assert_eq!(rect.center(), Point::origin());
        assert!((rect.width() - 500.0 / 96.0 * 254.0).abs() < 1e-9);
        assert!((rect.aspect_ratio() - 1.0).abs() < 1e-9);
    }
}
