//! Rendering and gesture engine interfaces
//!
//! The editor drives two external engines:
//! - [`RenderEngine`]: fetches and measures elements, draws the scene
//! - [`GestureEngine`]: turns pointer input into viewport and selection
//!   changes, reported back through [`GestureCallbacks`]
//!
//! The rendering engine may not exist yet when the editor starts. Components
//! that need it hold an [`EngineSlot`] and must cope with
//! [`EngineCapability::NotReady`].

mod types;

pub use types::{
    Corner, ElementHit, GestureSelection, RenderOptions, RenderScene, SceneElement,
    SelectedElement, SelectionBox, SelectionBoxHit, SelectionUpdate, UpdateType,
    WireframeLayer,
};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use stitchkit_core::{
    thread_safe_rw, DesignElement, EngineError, Error, ImageElement, Point, Rect, Result,
    ThreadSafeRw,
};

use crate::state::AnimationParams;

/// Result of an engine call.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Rendering/geometry engine
///
/// Async methods may suspend on network or decoding work. All other methods
/// must return promptly.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Fetches and parses a design.
    async fn create_design_element(&self, locator: &str) -> EngineResult<DesignElement>;

    /// Fetches and decodes an image. The returned element carries the pixel
    /// metadata; its placement is decided by the caller.
    async fn create_image_element(&self, locator: &str) -> EngineResult<ImageElement>;

    /// Makes sure a design's stitch data is resident before it is measured.
    async fn ensure_element_loaded(&self, element: &DesignElement) -> EngineResult<()>;

    /// Warms the alphabet used for lettering edits.
    async fn preload_alphabet(&self, _locator: &str) -> EngineResult<()> {
        Ok(())
    }

    /// Axis-aligned bounds of an element under its scene transform.
    fn transformed_rect(&self, element: &SceneElement) -> EngineResult<Rect>;

    fn hit_test_element(&self, element: &SceneElement, point: Point, threshold: f64) -> ElementHit;

    fn hit_test_selection_box(&self, point: Point) -> SelectionBoxHit;

    fn update_scene(&self, scene: &RenderScene);

    fn set_viewport(&self, viewport: Rect, animation: Option<AnimationParams>);

    fn set_render_options(&self, options: RenderOptions);

    fn set_wireframe(&self, layer: &WireframeLayer);
}

/// Pointer gesture engine
pub trait GestureEngine: Send + Sync {
    /// Installs the editor's callbacks. Replaces any previous registration.
    fn register(&self, callbacks: Arc<dyn GestureCallbacks>);

    fn set_enable_rotation(&self, enabled: bool);

    fn set_edit_mode(&self, enabled: bool);

    fn set_scene(&self, scene: &RenderScene);

    fn set_viewport(&self, viewport: Rect);

    fn set_selection(&self, selection: &GestureSelection);
}

/// Callbacks the gesture engine invokes on the editor.
pub trait GestureCallbacks: Send + Sync {
    /// The user panned or zoomed.
    fn on_viewport_change(&self, viewport: Rect);

    /// Selection, drag or rotate state changed.
    fn on_selection_update(&self, update: SelectionUpdate);

    fn hit_test_element(&self, element: &SceneElement, point: Point, threshold: f64) -> ElementHit;

    fn hit_test_selection_box(&self, point: Point) -> SelectionBoxHit;

    /// Last measured selection bounds.
    fn current_selection_rect(&self) -> Option<Rect>;
}

/// Whether a rendering engine is available.
#[derive(Clone, Default)]
pub enum EngineCapability {
    #[default]
    NotReady,
    Ready(Arc<dyn RenderEngine>),
}

impl EngineCapability {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineCapability::Ready(_))
    }
}

impl fmt::Debug for EngineCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCapability::NotReady => write!(f, "NotReady"),
            EngineCapability::Ready(_) => write!(f, "Ready"),
        }
    }
}

/// Shared, swappable handle to the rendering engine.
///
/// Clones observe the same slot, so attaching once makes the engine visible
/// to every component built from it.
#[derive(Clone, Default)]
pub struct EngineSlot {
    inner: ThreadSafeRw<EngineCapability>,
}

impl EngineSlot {
    pub fn new() -> Self {
        Self {
            inner: thread_safe_rw(EngineCapability::NotReady),
        }
    }

    /// Slot that starts out with an engine attached.
    pub fn ready(engine: Arc<dyn RenderEngine>) -> Self {
        let slot = Self::new();
        slot.attach(engine);
        slot
    }

    pub fn attach(&self, engine: Arc<dyn RenderEngine>) {
        *self.inner.write() = EngineCapability::Ready(engine);
        tracing::debug!("Rendering engine attached");
    }

    pub fn detach(&self) {
        *self.inner.write() = EngineCapability::NotReady;
        tracing::debug!("Rendering engine detached");
    }

    pub fn current(&self) -> EngineCapability {
        self.inner.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().is_ready()
    }

    /// The attached engine, or [`Error::EngineNotReady`].
    pub fn require(&self) -> Result<Arc<dyn RenderEngine>> {
        match &*self.inner.read() {
            EngineCapability::Ready(engine) => Ok(Arc::clone(engine)),
            EngineCapability::NotReady => Err(Error::EngineNotReady),
        }
    }
}

impl fmt::Debug for EngineSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EngineSlot").field(&self.current()).finish()
    }
}
