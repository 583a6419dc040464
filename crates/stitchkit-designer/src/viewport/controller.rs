//! Viewport changes driven by the editor.
//!
//! Gesture-driven pans and zooms arrive through the interaction controller;
//! this module handles the programmatic ones (zoom-to-fit, zoom-to-image)
//! and stamps animated changes with a wall-clock start time.

use parking_lot::RwLock;
use std::sync::Arc;
use stitchkit_core::{ImageElement, Rect, Result};
use stitchkit_settings::ZoomSettings;
use tracing::debug;

use super::{fit_to_content, fit_to_image, FitParams};
use crate::actions::Action;
use crate::engine::{EngineSlot, SceneElement};
use crate::state::{AnimationParams, DocumentState};
use crate::store::DocumentStore;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Animation starting now, or `None` for an instant change.
pub fn animation_from(duration_ms: Option<u64>) -> Option<AnimationParams> {
    duration_ms
        .filter(|ms| *ms > 0)
        .map(|duration_ms| AnimationParams {
            duration_ms,
            start_time_ms: now_ms(),
        })
}

/// Applies programmatic viewport changes to the document.
pub struct ViewportController {
    store: Arc<DocumentStore>,
    engine: EngineSlot,
    zoom: ZoomSettings,
    canvas: RwLock<(f64, f64)>,
}

impl ViewportController {
    pub fn new(
        store: Arc<DocumentStore>,
        engine: EngineSlot,
        zoom: ZoomSettings,
        canvas_width: f64,
        canvas_height: f64,
    ) -> Self {
        Self {
            store,
            engine,
            zoom,
            canvas: RwLock::new((canvas_width, canvas_height)),
        }
    }

    /// Last known canvas size in pixels.
    pub fn canvas_size(&self) -> (f64, f64) {
        *self.canvas.read()
    }

    pub fn set_canvas_size(&self, width: f64, height: f64) {
        *self.canvas.write() = (width, height);
    }

    pub fn zoom_settings(&self) -> &ZoomSettings {
        &self.zoom
    }

    fn fit_params(&self) -> FitParams {
        let (width, height) = self.canvas_size();
        FitParams::new(width, height, self.zoom.margin).with_max_dpi(self.zoom.max_dpi)
    }

    /// Sets the viewport, animated over `duration_ms` when given.
    pub fn change_viewport(&self, rect: Rect, duration_ms: Option<u64>) -> DocumentState {
        self.store.dispatch(Action::ChangeViewport {
            rect,
            animation: animation_from(duration_ms),
        })
    }

    /// Frames the loaded design on a canvas of the given pixel size.
    ///
    /// Returns the new viewport, or `None` when there is no design to frame.
    pub fn zoom_to_fit(&self, canvas_width: f64, canvas_height: f64) -> Result<Option<Rect>> {
        self.set_canvas_size(canvas_width, canvas_height);

        let state = self.store.snapshot();
        let Some(design) = state.product.design.clone() else {
            debug!("Zoom to fit skipped: no design loaded");
            return Ok(None);
        };
        let engine = self.engine.require()?;
        let matrix = design.base_matrix();
        let bounds = engine.transformed_rect(&SceneElement::design(design, matrix))?;

        let Some(target) = fit_to_content(&bounds, &self.fit_params()) else {
            debug!("Zoom to fit skipped: degenerate bounds {}", bounds);
            return Ok(None);
        };
        self.change_viewport(target, Some(self.zoom.fit_animation_ms));
        Ok(Some(target))
    }

    /// Frames a freshly placed image, keeping the current viewport aspect.
    pub fn zoom_to_image(&self, image: &Arc<ImageElement>) -> Result<Option<Rect>> {
        let engine = self.engine.require()?;
        let matrix = image.base_matrix();
        let bounds = engine.transformed_rect(&SceneElement::image(Arc::clone(image), matrix))?;

        let current = self.store.snapshot().view.viewport;
        let Some(target) = fit_to_image(&bounds, &current, &self.fit_params()) else {
            debug!("Zoom to image skipped: degenerate bounds {}", bounds);
            return Ok(None);
        };
        self.change_viewport(target, self.zoom.image_animation_ms);
        Ok(Some(target))
    }
}

impl std::fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("zoom", &self.zoom)
            .field("canvas", &self.canvas_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchkit_settings::EditorConfig;

    #[test]
    fn test_zero_duration_is_instant() {
        assert_eq!(animation_from(Some(0)), None);
        assert_eq!(animation_from(None), None);

        let animation = animation_from(Some(250)).expect("animated");
        assert_eq!(animation.duration_ms, 250);
        assert!(animation.start_time_ms > 0);
    }

    #[test]
    fn test_change_viewport_records_animation() {
        let store = Arc::new(DocumentStore::from_config(&EditorConfig::default()));
        let controller =
            ViewportController::new(store.clone(), EngineSlot::new(), ZoomSettings::default(), 500.0, 500.0);

        let rect = Rect::new(-5.0, -5.0, 5.0, 5.0);
        let state = controller.change_viewport(rect, Some(300));
        assert_eq!(state.view.viewport, rect);
        assert_eq!(state.view.animation.map(|a| a.duration_ms), Some(300));
    }

    #[test]
    fn test_zoom_to_fit_without_design_or_engine() {
        let store = Arc::new(DocumentStore::from_config(&EditorConfig::default()));
        let controller =
            ViewportController::new(store, EngineSlot::new(), ZoomSettings::default(), 500.0, 500.0);

        // nothing loaded: not an error even without an engine
        assert!(matches!(controller.zoom_to_fit(640.0, 480.0), Ok(None)));
        assert_eq!(controller.canvas_size(), (640.0, 480.0));
    }
}
