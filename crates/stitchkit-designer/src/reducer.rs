//! Pure state transitions.
//!
//! [`reduce`] maps `(state, action)` to the next state. Each sub-tree is
//! rebuilt through [`update`], which returns the original `Arc` whenever the
//! mutation leaves the value unchanged. A no-op action therefore yields a
//! snapshot that shares every sub-tree with its input.

use std::sync::Arc;
use stitchkit_core::{Catalog, LoadStatus, ResourceKind};
use tracing::{debug, warn};

use crate::actions::Action;
use crate::state::{
    DocumentState, DragState, EditMode, EditorState, ProductState, SelectionState, ViewState,
};

/// Applies `action` to `state`.
pub fn reduce(state: &DocumentState, action: Action, catalog: &Catalog) -> DocumentState {
    match action {
        Action::ChangeDesign { index } => change_design(state, index, catalog),
        Action::ChangeImage { index } => change_image(state, index, catalog),
        Action::ResourceLoading {
            kind,
            idempotent_index,
        } => with_product(state, |p| {
            if is_current(p, kind, idempotent_index) {
                set_status(p, kind, LoadStatus::Loading);
            }
        }),
        Action::CommitDesign {
            idempotent_index,
            element,
        } => with_product(state, |p| {
            if is_current(p, ResourceKind::Design, idempotent_index) {
                p.design = element;
                p.design_status = Some(LoadStatus::Succeeded);
            }
        }),
        Action::CommitImage {
            idempotent_index,
            element,
        } => with_product(state, |p| {
            if is_current(p, ResourceKind::Image, idempotent_index) {
                p.image = element;
                p.image_status = Some(LoadStatus::Succeeded);
            }
        }),
        Action::ResourceFailed {
            kind,
            idempotent_index,
        } => with_product(state, |p| {
            if is_current(p, kind, idempotent_index) {
                match kind {
                    ResourceKind::Design => p.design = None,
                    ResourceKind::Image => p.image = None,
                }
                set_status(p, kind, LoadStatus::Failed);
            }
        }),
        Action::ModifyDesign {
            idempotent_index,
            patch,
        } => with_product(state, |p| {
            if !is_current(p, ResourceKind::Design, idempotent_index) {
                return;
            }
            if let Some(design) = &p.design {
                p.design = Some(Arc::new(patch.apply(design)));
            }
        }),
        Action::Toggle3d { enabled } => with_view(state, |v| v.enable_3d = enabled),
        Action::ToggleTwists { enabled } => with_view(state, |v| v.enable_twists = enabled),
        Action::SetBackground { color } => with_view(state, |v| v.background = color),
        Action::ChangeViewport { rect, animation } => with_view(state, |v| {
            v.viewport = rect;
            v.animation = animation;
        }),
        Action::SetEditMode { mode } => with_editor(state, |e| {
            e.edit_mode = mode;
            if mode == EditMode::PanZoom {
                deselect(e);
            }
        }),
        Action::ChangeSelection {
            design_selected,
            rotation_mode,
        } => with_editor(state, |e| {
            if let Some(rotation) = rotation_mode {
                e.rotation_mode = rotation;
            }
            if design_selected {
                e.selection.design_selected = true;
            } else {
                deselect(e);
            }
        }),
        Action::ChangeSelectionRect { rect } => with_editor(state, |e| {
            // A late measurement must not resurrect a cleared selection.
            if rect.is_some() && !e.selection.design_selected {
                debug!("Ignoring selection rect for unselected design");
                return;
            }
            e.selection.rect = rect;
        }),
        Action::DeselectAll => with_editor(state, deselect),
        Action::UpdateDrag {
            transform,
            hit,
            update_type,
        } => with_editor(state, |e| {
            if e.edit_mode.is_select() && e.selection.design_selected {
                e.drag = Some(DragState {
                    transform,
                    hit,
                    update_type,
                });
            }
        }),
        Action::EndDrag => with_editor(state, |e| e.drag = None),
    }
}

fn change_design(state: &DocumentState, index: usize, catalog: &Catalog) -> DocumentState {
    if !catalog.contains(ResourceKind::Design, index) {
        warn!("Ignoring design index {} outside the catalog", index);
        return state.clone();
    }
    if state.product.design_index == index {
        return state.clone();
    }
    let next = with_product(state, |p| {
        p.design_index = index;
        p.design = None;
        p.design_status = None;
    });
    with_editor(&next, deselect)
}

fn change_image(state: &DocumentState, index: usize, catalog: &Catalog) -> DocumentState {
    if !catalog.contains(ResourceKind::Image, index) {
        warn!("Ignoring image index {} outside the catalog", index);
        return state.clone();
    }
    if state.product.image_index == index {
        return state.clone();
    }
    with_product(state, |p| {
        p.image_index = index;
        p.image = None;
        p.image_status = None;
    })
}

fn is_current(product: &ProductState, kind: ResourceKind, idempotent_index: usize) -> bool {
    let current = product.index(kind);
    if current != idempotent_index {
        debug!(
            "Discarding {} result for index {} (current is {})",
            kind, idempotent_index, current
        );
        return false;
    }
    true
}

fn set_status(product: &mut ProductState, kind: ResourceKind, status: LoadStatus) {
    match kind {
        ResourceKind::Design => product.design_status = Some(status),
        ResourceKind::Image => product.image_status = Some(status),
    }
}

fn deselect(editor: &mut EditorState) {
    editor.selection = SelectionState::default();
    editor.drag = None;
}

fn with_product(state: &DocumentState, f: impl FnOnce(&mut ProductState)) -> DocumentState {
    DocumentState {
        product: update(&state.product, f),
        ..state.clone()
    }
}

fn with_view(state: &DocumentState, f: impl FnOnce(&mut ViewState)) -> DocumentState {
    DocumentState {
        view: update(&state.view, f),
        ..state.clone()
    }
}

fn with_editor(state: &DocumentState, f: impl FnOnce(&mut EditorState)) -> DocumentState {
    DocumentState {
        editor: update(&state.editor, f),
        ..state.clone()
    }
}

/// Copy-on-write update of one sub-tree.
///
/// Returns `current` itself when `f` leaves the value equal to it.
pub(crate) fn update<T, F>(current: &Arc<T>, f: F) -> Arc<T>
where
    T: Clone + PartialEq,
    F: FnOnce(&mut T),
{
    let mut next = T::clone(current);
    f(&mut next);
    if next == **current {
        Arc::clone(current)
    } else {
        Arc::new(next)
    }
}
