//! Editor session
//!
//! Wires the document store to the loader, the viewport and interaction
//! controllers and, once engines are attached, the scene presenter. This is
//! the entry point an application embeds.

use parking_lot::Mutex;
use std::sync::Arc;
use stitchkit_core::{
    AppEvent, Color, EngineEvent, LetteringParams, Rect, Result, SubscriptionId, ThreadColor,
};
use stitchkit_settings::EditorConfig;
use tracing::{info, warn};

use crate::actions::{Action, DesignPatch};
use crate::engine::{EngineSlot, GestureEngine, RenderEngine};
use crate::interaction::InteractionController;
use crate::loader::{LoadOutcome, LoadTask, ResourceLoader};
use crate::presenter::ScenePresenter;
use crate::state::{DocumentState, EditMode};
use crate::store::DocumentStore;
use crate::viewport::controller::ViewportController;

struct Attachment {
    presenter: Arc<ScenePresenter>,
    subscription: SubscriptionId,
}

/// A running editor document with its controllers.
pub struct EditorSession {
    config: EditorConfig,
    store: Arc<DocumentStore>,
    engine: EngineSlot,
    viewport: Arc<ViewportController>,
    loader: Arc<ResourceLoader>,
    interaction: Arc<InteractionController>,
    attachment: Mutex<Option<Attachment>>,
}

impl EditorSession {
    /// Creates a session for a validated configuration. No engine is
    /// attached yet.
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(DocumentStore::from_config(&config));
        let engine = EngineSlot::new();
        let viewport = Arc::new(ViewportController::new(
            Arc::clone(&store),
            engine.clone(),
            config.zoom.clone(),
            f64::from(config.canvas.width_px),
            f64::from(config.canvas.height_px),
        ));
        let loader = Arc::new(ResourceLoader::new(
            Arc::clone(&store),
            engine.clone(),
            Arc::clone(&viewport),
        ));
        let interaction = Arc::new(InteractionController::new(Arc::clone(&store), engine.clone()));

        Ok(Self {
            config,
            store,
            engine,
            viewport,
            loader,
            interaction,
            attachment: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn snapshot(&self) -> DocumentState {
        self.store.snapshot()
    }

    pub fn engine(&self) -> &EngineSlot {
        &self.engine
    }

    pub fn loader(&self) -> &Arc<ResourceLoader> {
        &self.loader
    }

    pub fn viewport(&self) -> &Arc<ViewportController> {
        &self.viewport
    }

    pub fn interaction(&self) -> &Arc<InteractionController> {
        &self.interaction
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.lock().is_some()
    }

    /// Connects the engines and loads the current selection.
    ///
    /// Registers the interaction controller with the gesture engine, pushes
    /// the current document to both engines, then loads the selected design
    /// and image while the lettering alphabet preloads in the background.
    pub async fn attach_engines(
        &self,
        render: Arc<dyn RenderEngine>,
        gesture: Arc<dyn GestureEngine>,
    ) -> (Result<LoadOutcome>, Result<LoadOutcome>) {
        self.detach_engines();
        self.engine.attach(Arc::clone(&render));

        gesture.register(self.interaction.clone());
        gesture.set_enable_rotation(true);

        let presenter = Arc::new(ScenePresenter::new(
            Arc::clone(&self.store),
            Arc::clone(&render),
            gesture,
        ));
        presenter.push_all();
        let subscriber = Arc::clone(&presenter);
        let subscription = self.store.subscribe(move |_| subscriber.sync());
        *self.attachment.lock() = Some(Attachment {
            presenter,
            subscription,
        });

        self.store
            .events()
            .publish(AppEvent::Engine(EngineEvent::Attached));
        info!("Engines attached");

        let alphabet = self.store.catalog().alphabet_locator.clone();
        if !alphabet.is_empty() {
            tokio::spawn(async move {
                if let Err(e) = render.preload_alphabet(&alphabet).await {
                    warn!("Alphabet preload failed: {}", e);
                }
            });
        }

        self.loader.reload_all().await
    }

    /// Disconnects the engines. Loads started afterwards are deferred until
    /// the next attach.
    pub fn detach_engines(&self) {
        let Some(attachment) = self.attachment.lock().take() else {
            return;
        };
        self.store.unsubscribe(attachment.subscription);
        drop(attachment.presenter);
        self.engine.detach();
        self.store
            .events()
            .publish(AppEvent::Engine(EngineEvent::Detached));
        info!("Engines detached");
    }

    pub fn select_design(&self, index: usize) -> Result<LoadTask> {
        self.loader.select_design(index)
    }

    pub fn select_image(&self, index: usize) -> Result<LoadTask> {
        self.loader.select_image(index)
    }

    pub fn set_edit_mode(&self, mode: EditMode) -> DocumentState {
        self.store.dispatch(Action::SetEditMode { mode })
    }

    pub fn deselect_all(&self) -> DocumentState {
        self.store.dispatch(Action::DeselectAll)
    }

    pub fn toggle_3d(&self, enabled: bool) -> DocumentState {
        self.store.dispatch(Action::Toggle3d { enabled })
    }

    pub fn toggle_twists(&self, enabled: bool) -> DocumentState {
        self.store.dispatch(Action::ToggleTwists { enabled })
    }

    pub fn set_background(&self, color: Color) -> DocumentState {
        self.store.dispatch(Action::SetBackground { color })
    }

    /// Frames the design on a canvas of the given pixel size, animated with
    /// the configured fit duration.
    pub fn zoom_to_fit(&self, canvas_width: f64, canvas_height: f64) -> Result<Option<Rect>> {
        self.viewport.zoom_to_fit(canvas_width, canvas_height)
    }

    /// Applies `patch` to the loaded design, tagged with the current index.
    pub fn modify_design(&self, patch: DesignPatch) -> DocumentState {
        let idempotent_index = self.store.snapshot().product.design_index;
        self.store.dispatch(Action::ModifyDesign {
            idempotent_index,
            patch,
        })
    }

    /// Replaces one thread colour. Returns false when no design is loaded or
    /// the slot does not exist.
    pub fn recolor_design(&self, slot: usize, color: ThreadColor) -> bool {
        let state = self.store.snapshot();
        let Some(design) = &state.product.design else {
            return false;
        };
        if slot >= design.colors.len() {
            return false;
        }
        let mut colors = design.colors.clone();
        colors[slot] = color;
        self.store.dispatch(Action::ModifyDesign {
            idempotent_index: state.product.design_index,
            patch: DesignPatch::colors(colors),
        });
        true
    }

    /// Replaces the text of one lettering run, stitched with the catalog's
    /// alphabet. Returns false when no design is loaded or the slot does not
    /// exist.
    pub fn set_lettering_text(&self, slot: usize, text: impl Into<String>) -> bool {
        let state = self.store.snapshot();
        let Some(design) = &state.product.design else {
            return false;
        };
        if slot >= design.lettering.len() {
            return false;
        }
        let mut lettering = design.lettering.clone();
        lettering[slot] = LetteringParams {
            text: text.into(),
            alphabet: Some(self.store.catalog().alphabet_locator.clone()),
        };
        self.store.dispatch(Action::ModifyDesign {
            idempotent_index: state.product.design_index,
            patch: DesignPatch::lettering(lettering),
        });
        true
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if let Some(attachment) = self.attachment.get_mut().take() {
            self.store.unsubscribe(attachment.subscription);
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("engine", &self.engine)
            .field("attached", &self.is_attached())
            .finish()
    }
}
