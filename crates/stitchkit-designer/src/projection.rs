//! Projection of a document snapshot onto engine inputs.
//!
//! These are pure functions of the snapshot; pushing the results to the
//! engines is the presenter's job.

use stitchkit_core::Matrix;

use crate::engine::{
    GestureSelection, RenderOptions, RenderScene, SceneElement, SelectedElement, SelectionBox,
    WireframeLayer,
};
use crate::state::{DocumentState, ViewState};

/// Transform the design is drawn with: the drag preview composed over the
/// committed matrix while a drag is in progress.
pub fn effective_design_matrix(state: &DocumentState) -> Option<Matrix> {
    let design = state.product.design.as_ref()?;
    let base = design.base_matrix();
    Some(match &state.editor.drag {
        Some(drag) => drag.transform.multiply(&base),
        None => base,
    })
}

/// Scene in draw order: background image first, then the design.
pub fn scene(state: &DocumentState) -> RenderScene {
    let mut elements = Vec::with_capacity(2);
    if let Some(image) = &state.product.image {
        elements.push(SceneElement::image(image.clone(), image.base_matrix()));
    }
    if let (Some(design), Some(matrix)) = (&state.product.design, effective_design_matrix(state)) {
        elements.push(SceneElement::design(design.clone(), matrix));
    }
    RenderScene {
        elements,
        background: state.view.background,
    }
}

/// Selection box overlay, shown only in select mode with the design selected.
pub fn wireframe(state: &DocumentState) -> WireframeLayer {
    let editor = &state.editor;
    let selection_box = match &state.product.design {
        Some(design) if editor.edit_mode.is_select() && editor.is_design_selected() => {
            Some(SelectionBox {
                selected: vec![design.uid],
                display: true,
                rotate: editor.rotation_mode,
                rect: editor.selection_rect(),
                matrix: editor.drag.map(|drag| drag.transform),
            })
        }
        _ => None,
    };
    WireframeLayer { selection_box }
}

pub fn render_options(view: &ViewState) -> RenderOptions {
    RenderOptions {
        enable_3d: view.enable_3d,
        enable_twists: view.enable_twists,
    }
}

/// Selection data the gesture engine needs to drive handles and drags.
pub fn gesture_selection(state: &DocumentState) -> GestureSelection {
    let editor = &state.editor;
    let selected = match &state.product.design {
        Some(design) if editor.is_design_selected() => vec![SelectedElement {
            scene_index: usize::from(state.product.image.is_some()),
            original_transform: design.base_matrix(),
        }],
        _ => Vec::new(),
    };

    let mut selection = GestureSelection {
        selected,
        dragging: editor.is_dragging(),
        rotating: editor.rotation_mode,
        drag_rect: editor.selection_rect(),
        ..Default::default()
    };
    if let Some(drag) = &editor.drag {
        selection.drag_transform = drag.transform;
        selection.drag_hit = drag.hit;
        selection.update_type = drag.update_type;
    }
    selection
}
