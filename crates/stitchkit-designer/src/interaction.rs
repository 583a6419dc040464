//! Selection, drag and rotate handling.
//!
//! The gesture engine reports what the user is doing through
//! [`GestureCallbacks`]. [`InteractionController`] turns those reports into
//! document actions:
//!
//! - selection and rotate-mode changes are dispatched as they arrive
//! - while dragging, the drag transform is stored as a preview only
//! - when a drag ends, the preview is composed over the design's committed
//!   matrix and committed, then the selection bounds are re-measured
//!
//! Measuring the selection bounds needs the engine and may suspend, so it
//! runs on a spawned task. Its result is applied only if the design is still
//! selected when it arrives.

use std::sync::Arc;
use stitchkit_core::{Matrix, Point, Rect};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::actions::{Action, DesignPatch};
use crate::engine::{
    ElementHit, EngineCapability, EngineSlot, GestureCallbacks, SceneElement, SelectionBoxHit,
    SelectionUpdate,
};
use crate::state::{DocumentState, InteractionPhase};
use crate::store::DocumentStore;

/// Gesture-driven editing of the design element.
pub struct InteractionController {
    store: Arc<DocumentStore>,
    engine: EngineSlot,
}

impl InteractionController {
    pub fn new(store: Arc<DocumentStore>, engine: EngineSlot) -> Self {
        Self { store, engine }
    }

    /// Current phase, read from the latest snapshot.
    pub fn phase(&self) -> InteractionPhase {
        self.store.snapshot().editor.phase()
    }

    /// Re-measures the selected design's bounds on a spawned task.
    ///
    /// `matrix` overrides the design's committed transform, for callers that
    /// know the transform a pending commit is about to install. Returns
    /// `None` when there is no design or no engine; the task itself drops
    /// its result if the design was deselected or replaced in the meantime.
    pub fn recompute_selection_box(&self, matrix: Option<Matrix>) -> Option<JoinHandle<()>> {
        let design = self.store.snapshot().product.design.clone()?;
        let engine = match self.engine.require() {
            Ok(engine) => engine,
            Err(_) => {
                debug!("Selection box not measured: engine not ready");
                return None;
            }
        };
        let Ok(runtime) = Handle::try_current() else {
            warn!("Selection box not measured: no async runtime");
            return None;
        };
        let store = Arc::clone(&self.store);

        Some(runtime.spawn(async move {
            if let Err(e) = engine.ensure_element_loaded(&design).await {
                warn!("Selection box not measured for {}: {}", design.uid, e);
                return;
            }
            let matrix = matrix.unwrap_or_else(|| design.base_matrix());
            let rect = match engine.transformed_rect(&SceneElement::design(design.clone(), matrix))
            {
                Ok(rect) => rect,
                Err(e) => {
                    warn!("Selection box not measured for {}: {}", design.uid, e);
                    return;
                }
            };

            let current = store.snapshot();
            let same_design = current
                .product
                .design
                .as_ref()
                .is_some_and(|d| d.uid == design.uid);
            if !same_design || !current.editor.is_design_selected() {
                debug!("Dropping selection box for {}: selection moved on", design.uid);
                return;
            }
            store.dispatch(Action::ChangeSelectionRect { rect: Some(rect) });
        }))
    }

    /// Commits `drag ∘ base` for the design in `state` and re-measures it.
    ///
    /// Nothing is measured when the commit was dropped because the design
    /// changed after `state` was taken.
    fn commit_drag(
        &self,
        state: &DocumentState,
        drag_transform: Matrix,
    ) -> Option<JoinHandle<()>> {
        let design = state.product.design.as_ref()?;
        let new_matrix = drag_transform.multiply(&design.base_matrix());
        let after = self.store.dispatch(Action::ModifyDesign {
            idempotent_index: state.product.design_index,
            patch: DesignPatch::matrix(new_matrix),
        });

        let committed = after
            .product
            .design
            .as_ref()
            .is_some_and(|d| d.uid == design.uid && d.base_matrix() == new_matrix);
        if !committed {
            debug!("Drag commit for {} dropped: design replaced", design.uid);
            return None;
        }
        self.recompute_selection_box(Some(new_matrix))
    }
}

impl GestureCallbacks for InteractionController {
    fn on_viewport_change(&self, viewport: Rect) {
        self.store.dispatch(Action::ChangeViewport {
            rect: viewport,
            animation: None,
        });
    }

    fn on_selection_update(&self, update: SelectionUpdate) {
        let state = self.store.snapshot();
        let editor = &state.editor;

        let selected = state
            .product
            .design
            .as_ref()
            .is_some_and(|design| update.selected.contains(&design.uid));
        let was_selected = editor.is_design_selected();
        let was_dragging = editor.is_dragging();

        if selected != was_selected || update.rotating != editor.rotation_mode {
            self.store.dispatch(Action::ChangeSelection {
                design_selected: selected,
                rotation_mode: Some(update.rotating),
            });
        }

        let newly_selected = selected && !was_selected;
        let started_without_rect =
            update.dragging && !was_dragging && editor.selection_rect().is_none();
        if selected && (newly_selected || started_without_rect) {
            self.recompute_selection_box(None);
        }

        if update.dragging {
            self.store.dispatch(Action::UpdateDrag {
                transform: update.drag_transform,
                hit: update.drag_hit,
                update_type: update.update_type,
            });
        } else if was_dragging {
            self.store.dispatch(Action::EndDrag);
            if selected {
                self.commit_drag(&self.store.snapshot(), update.drag_transform);
            }
        }
    }

    fn hit_test_element(&self, element: &SceneElement, point: Point, threshold: f64) -> ElementHit {
        match self.engine.current() {
            EngineCapability::Ready(engine) => engine.hit_test_element(element, point, threshold),
            EngineCapability::NotReady => ElementHit::Miss,
        }
    }

    fn hit_test_selection_box(&self, point: Point) -> SelectionBoxHit {
        match self.engine.current() {
            EngineCapability::Ready(engine) => engine.hit_test_selection_box(point),
            EngineCapability::NotReady => SelectionBoxHit::Nothing,
        }
    }

    fn current_selection_rect(&self) -> Option<Rect> {
        self.store.snapshot().editor.selection_rect()
    }
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("phase", &self.phase())
            .field("engine", &self.engine)
            .finish()
    }
}
