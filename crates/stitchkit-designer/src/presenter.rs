//! Pushes document snapshots to the engines.
//!
//! The presenter remembers the last snapshot it pushed and, on every sync,
//! only re-sends the parts whose sub-trees were replaced since then.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

use crate::engine::{GestureEngine, RenderEngine};
use crate::projection;
use crate::state::DocumentState;
use crate::store::DocumentStore;

/// Keeps the rendering and gesture engines in step with the store.
pub struct ScenePresenter {
    store: Arc<DocumentStore>,
    render: Arc<dyn RenderEngine>,
    gesture: Arc<dyn GestureEngine>,
    last: Mutex<Option<DocumentState>>,
    pending: AtomicBool,
    full: AtomicBool,
}

impl ScenePresenter {
    pub fn new(
        store: Arc<DocumentStore>,
        render: Arc<dyn RenderEngine>,
        gesture: Arc<dyn GestureEngine>,
    ) -> Self {
        Self {
            store,
            render,
            gesture,
            last: Mutex::new(None),
            pending: AtomicBool::new(false),
            full: AtomicBool::new(true),
        }
    }

    /// Pushes everything, regardless of what was pushed before.
    pub fn push_all(&self) {
        self.full.store(true, Ordering::SeqCst);
        self.sync();
    }

    /// Pushes what changed since the previous push.
    ///
    /// Re-entrant: an engine that dispatches from inside a push gets its
    /// change presented by the outer call once the current push returns.
    ///
    /// A caller that finds another push in progress leaves its request in
    /// `pending`. The pushing caller re-checks the flag after releasing the
    /// lock, so a request raised while it was unlocking is not lost.
    pub fn sync(&self) {
        self.pending.store(true, Ordering::SeqCst);
        loop {
            {
                let Some(mut last) = self.last.try_lock() else {
                    return;
                };
                while self.pending.swap(false, Ordering::SeqCst) {
                    let previous = if self.full.swap(false, Ordering::SeqCst) {
                        None
                    } else {
                        last.clone()
                    };
                    let state = self.store.snapshot();
                    self.push(&state, previous.as_ref());
                    *last = Some(state);
                }
            }
            if !self.pending.load(Ordering::SeqCst) {
                return;
            }
        }
    }

    fn push(&self, state: &DocumentState, previous: Option<&DocumentState>) {
        let (product, view, editor) = match previous {
            Some(prev) => {
                let changes = state.changes_from(prev);
                (changes.product, changes.view, changes.editor)
            }
            None => (true, true, true),
        };
        trace!("Presenting product={} view={} editor={}", product, view, editor);

        let background_changed =
            previous.map_or(true, |prev| prev.view.background != state.view.background);
        if product || editor || background_changed {
            let scene = projection::scene(state);
            self.render.update_scene(&scene);
            self.gesture.set_scene(&scene);
        }

        if view {
            let options_changed = previous.map_or(true, |prev| {
                projection::render_options(&prev.view) != projection::render_options(&state.view)
            });
            if options_changed {
                self.render
                    .set_render_options(projection::render_options(&state.view));
            }

            let viewport_changed = previous.map_or(true, |prev| {
                prev.view.viewport != state.view.viewport
                    || prev.view.animation != state.view.animation
            });
            if viewport_changed {
                self.render
                    .set_viewport(state.view.viewport, state.view.animation);
                self.gesture.set_viewport(state.view.viewport);
            }
        }

        if product || editor {
            self.render.set_wireframe(&projection::wireframe(state));
            self.gesture
                .set_selection(&projection::gesture_selection(state));
        }
        if editor {
            let mode_changed =
                previous.map_or(true, |prev| prev.editor.edit_mode != state.editor.edit_mode);
            if mode_changed {
                self.gesture
                    .set_edit_mode(state.editor.edit_mode.is_select());
            }
        }
    }
}

impl std::fmt::Debug for ScenePresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenePresenter")
            .field("pushed", &self.last.lock().is_some())
            .finish()
    }
}
