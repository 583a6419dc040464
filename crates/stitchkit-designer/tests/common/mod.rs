//! Scripted engines shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stitchkit_core::{
    DesignElement, ElementId, EngineError, ImageElement, ImageMetadata, LetteringParams, Point,
    Rect, ThreadColor,
};
use stitchkit_designer::{
    AnimationParams, DocumentStore, ElementHit, EngineResult, EngineSlot, GestureCallbacks,
    GestureEngine, GestureSelection, InteractionController, RenderEngine, RenderOptions,
    RenderScene, ResourceLoader, SceneElement, SelectionBoxHit, ViewportController,
    WireframeLayer,
};
use stitchkit_settings::EditorConfig;
use tokio::sync::oneshot;

/// Extent of every design the fake engine creates, before transformation.
pub const DESIGN_EXTENT: Rect = Rect::new(0.0, 0.0, 100.0, 50.0);

/// Rendering engine whose fetches and measurements can be held open and
/// released in any order.
pub struct FakeRenderEngine {
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    releases: Mutex<HashMap<String, oneshot::Sender<()>>>,
    measure_gate: Mutex<Option<oneshot::Receiver<()>>>,
    measure_release: Mutex<Option<oneshot::Sender<()>>>,
    failing: Mutex<HashSet<String>>,
    fetches: Mutex<Vec<String>>,
    created: Mutex<HashMap<ElementId, String>>,
    preloaded: Mutex<Vec<String>>,
    pub scenes: Mutex<Vec<RenderScene>>,
    pub viewports: Mutex<Vec<(Rect, Option<AnimationParams>)>>,
    pub wireframes: Mutex<Vec<WireframeLayer>>,
    pub options: Mutex<Vec<RenderOptions>>,
    pub image_metadata: ImageMetadata,
}

impl FakeRenderEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gates: Mutex::default(),
            releases: Mutex::default(),
            measure_gate: Mutex::default(),
            measure_release: Mutex::default(),
            failing: Mutex::default(),
            fetches: Mutex::default(),
            created: Mutex::default(),
            preloaded: Mutex::default(),
            scenes: Mutex::default(),
            viewports: Mutex::default(),
            wireframes: Mutex::default(),
            options: Mutex::default(),
            image_metadata: ImageMetadata {
                xdim: 1000,
                ydim: 1200,
            },
        })
    }

    /// Makes the next fetch of `locator` wait until [`release`](Self::release).
    pub fn hold(&self, locator: &str) {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(locator.to_string(), rx);
        self.releases.lock().insert(locator.to_string(), tx);
    }

    pub fn release(&self, locator: &str) {
        if let Some(tx) = self.releases.lock().remove(locator) {
            let _ = tx.send(());
        }
    }

    pub fn fail(&self, locator: &str) {
        self.failing.lock().insert(locator.to_string());
    }

    /// Makes the next `ensure_element_loaded` wait until
    /// [`release_measure`](Self::release_measure).
    pub fn hold_measure(&self) {
        let (tx, rx) = oneshot::channel();
        *self.measure_gate.lock() = Some(rx);
        *self.measure_release.lock() = Some(tx);
    }

    pub fn release_measure(&self) {
        if let Some(tx) = self.measure_release.lock().take() {
            let _ = tx.send(());
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().len()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }

    /// Locator an element was created from.
    pub fn locator_of(&self, uid: ElementId) -> Option<String> {
        self.created.lock().get(&uid).cloned()
    }

    pub fn preloaded(&self) -> Vec<String> {
        self.preloaded.lock().clone()
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.lock().len()
    }

    pub fn last_scene(&self) -> Option<RenderScene> {
        self.scenes.lock().last().cloned()
    }

    pub fn last_viewport(&self) -> Option<(Rect, Option<AnimationParams>)> {
        self.viewports.lock().last().copied()
    }

    async fn fetch(&self, locator: &str) -> EngineResult<()> {
        self.fetches.lock().push(locator.to_string());
        let gate = self.gates.lock().remove(locator);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing.lock().contains(locator) {
            return Err(EngineError::ResourceFetch {
                locator: locator.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RenderEngine for FakeRenderEngine {
    async fn create_design_element(&self, locator: &str) -> EngineResult<DesignElement> {
        self.fetch(locator).await?;
        let design = DesignElement::new(
            vec![ThreadColor::rgb(200, 0, 0), ThreadColor::rgb(0, 0, 200)],
            vec![LetteringParams {
                text: "Hello".to_string(),
                alphabet: None,
            }],
        );
        self.created.lock().insert(design.uid, locator.to_string());
        Ok(design)
    }

    async fn create_image_element(&self, locator: &str) -> EngineResult<ImageElement> {
        self.fetch(locator).await?;
        let image = ImageElement::new(Rect::empty(), Some(self.image_metadata));
        self.created.lock().insert(image.uid, locator.to_string());
        Ok(image)
    }

    async fn ensure_element_loaded(&self, _element: &DesignElement) -> EngineResult<()> {
        let gate = self.measure_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(())
    }

    async fn preload_alphabet(&self, locator: &str) -> EngineResult<()> {
        self.preloaded.lock().push(locator.to_string());
        Ok(())
    }

    fn transformed_rect(&self, element: &SceneElement) -> EngineResult<Rect> {
        Ok(match element {
            SceneElement::Design { matrix, .. } => matrix.transform_rect(&DESIGN_EXTENT),
            SceneElement::Image { element, matrix } => matrix.transform_rect(&element.rect),
        })
    }

    fn hit_test_element(&self, element: &SceneElement, point: Point, _threshold: f64) -> ElementHit {
        match self.transformed_rect(element) {
            Ok(rect) if rect.contains_point(&point) => ElementHit::Hit { distance: 0.0 },
            _ => ElementHit::Miss,
        }
    }

    fn hit_test_selection_box(&self, _point: Point) -> SelectionBoxHit {
        SelectionBoxHit::Body
    }

    fn update_scene(&self, scene: &RenderScene) {
        self.scenes.lock().push(scene.clone());
    }

    fn set_viewport(&self, viewport: Rect, animation: Option<AnimationParams>) {
        self.viewports.lock().push((viewport, animation));
    }

    fn set_render_options(&self, options: RenderOptions) {
        self.options.lock().push(options);
    }

    fn set_wireframe(&self, layer: &WireframeLayer) {
        self.wireframes.lock().push(layer.clone());
    }
}

/// Gesture engine that records what it is told.
#[derive(Default)]
pub struct FakeGestureEngine {
    callbacks: Mutex<Option<Arc<dyn GestureCallbacks>>>,
    pub rotation_enabled: Mutex<Option<bool>>,
    pub edit_modes: Mutex<Vec<bool>>,
    pub scenes: Mutex<Vec<RenderScene>>,
    pub viewports: Mutex<Vec<Rect>>,
    pub selections: Mutex<Vec<GestureSelection>>,
}

impl FakeGestureEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn callbacks(&self) -> Option<Arc<dyn GestureCallbacks>> {
        self.callbacks.lock().clone()
    }

    pub fn last_selection(&self) -> Option<GestureSelection> {
        self.selections.lock().last().cloned()
    }
}

impl GestureEngine for FakeGestureEngine {
    fn register(&self, callbacks: Arc<dyn GestureCallbacks>) {
        *self.callbacks.lock() = Some(callbacks);
    }

    fn set_enable_rotation(&self, enabled: bool) {
        *self.rotation_enabled.lock() = Some(enabled);
    }

    fn set_edit_mode(&self, enabled: bool) {
        self.edit_modes.lock().push(enabled);
    }

    fn set_scene(&self, scene: &RenderScene) {
        self.scenes.lock().push(scene.clone());
    }

    fn set_viewport(&self, viewport: Rect) {
        self.viewports.lock().push(viewport);
    }

    fn set_selection(&self, selection: &GestureSelection) {
        self.selections.lock().push(selection.clone());
    }
}

/// Store, controllers and a ready fake engine, without a session.
pub struct Harness {
    pub store: Arc<DocumentStore>,
    pub engine: Arc<FakeRenderEngine>,
    pub slot: EngineSlot,
    pub viewport: Arc<ViewportController>,
    pub loader: Arc<ResourceLoader>,
    pub interaction: Arc<InteractionController>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let store = Arc::new(DocumentStore::from_config(&config));
        let engine = FakeRenderEngine::new();
        let slot = EngineSlot::ready(engine.clone());
        let viewport = Arc::new(ViewportController::new(
            store.clone(),
            slot.clone(),
            config.zoom.clone(),
            f64::from(config.canvas.width_px),
            f64::from(config.canvas.height_px),
        ));
        let loader = Arc::new(ResourceLoader::new(
            store.clone(),
            slot.clone(),
            viewport.clone(),
        ));
        let interaction = Arc::new(InteractionController::new(store.clone(), slot.clone()));
        Self {
            store,
            engine,
            slot,
            viewport,
            loader,
            interaction,
        }
    }

    pub fn design_locator(&self, index: usize) -> String {
        self.store.catalog().designs[index].locator.clone()
    }

    pub fn image_locator(&self, index: usize) -> String {
        self.store.catalog().images[index].locator.clone()
    }
}

/// Lets spawned tasks on the current-thread runtime run to their next
/// suspension point.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
