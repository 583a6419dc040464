//! Document state for the embroidery editor.
//!
//! The document is a persistent value split into three sub-trees:
//! - [`ProductState`]: which catalog design/image is selected, the loaded
//!   elements and their load status
//! - [`ViewState`]: render toggles, background, viewport and animation
//! - [`EditorState`]: edit mode, selection and in-progress drag
//!
//! Sub-trees are held behind `Arc`. A transition that does not touch a
//! sub-tree hands back the very same `Arc`, so consumers can detect changes
//! with [`Arc::ptr_eq`] instead of deep comparison.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stitchkit_core::{
    ChangeSet, Color, DesignElement, ImageElement, LoadStatus, Matrix, Rect, ResourceKind,
};
use stitchkit_settings::EditorConfig;

use crate::engine::{SelectionBoxHit, UpdateType};
use crate::viewport;

/// Catalog selection and loaded elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductState {
    pub design_index: usize,
    pub image_index: usize,
    pub design: Option<Arc<DesignElement>>,
    pub image: Option<Arc<ImageElement>>,
    /// `None` until a load for the current index has started.
    pub design_status: Option<LoadStatus>,
    pub image_status: Option<LoadStatus>,
}

impl ProductState {
    /// Currently selected catalog index for `kind`.
    pub fn index(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Design => self.design_index,
            ResourceKind::Image => self.image_index,
        }
    }

    /// Load status for `kind`.
    pub fn status(&self, kind: ResourceKind) -> Option<LoadStatus> {
        match kind {
            ResourceKind::Design => self.design_status,
            ResourceKind::Image => self.image_status,
        }
    }
}

/// Parameters of an animated viewport transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationParams {
    pub duration_ms: u64,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub start_time_ms: i64,
}

/// Render toggles and the visible world window.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub enable_3d: bool,
    pub enable_twists: bool,
    pub background: Color,
    pub viewport: Rect,
    /// Animation of the last viewport change, if it was animated.
    pub animation: Option<AnimationParams>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            enable_3d: true,
            enable_twists: false,
            background: Color::default(),
            viewport: Rect::new(-1000.0, -1000.0, 1000.0, 1000.0),
            animation: None,
        }
    }
}

/// How pointer gestures are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    /// Gestures pan and zoom the viewport.
    #[default]
    PanZoom,
    /// Gestures select, move, scale and rotate the design.
    Select,
}

impl EditMode {
    pub fn is_select(&self) -> bool {
        matches!(self, EditMode::Select)
    }
}

/// Selection of the design element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionState {
    pub design_selected: bool,
    /// Bounding rectangle of the selected design, once measured.
    pub rect: Option<Rect>,
}

/// An in-progress drag of the selected design.
///
/// The transform is preview only; the design keeps its committed matrix
/// until the drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub transform: Matrix,
    pub hit: SelectionBoxHit,
    pub update_type: UpdateType,
}

/// Phase of the interaction state machine, derived from [`EditorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Selected,
    Dragging,
}

/// Edit mode, selection and drag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub edit_mode: EditMode,
    /// Whether the selection box offers rotate handles.
    pub rotation_mode: bool,
    pub selection: SelectionState,
    /// Present only in select mode while the design is selected.
    pub drag: Option<DragState>,
}

impl EditorState {
    pub fn is_design_selected(&self) -> bool {
        self.selection.design_selected
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn selection_rect(&self) -> Option<Rect> {
        self.selection.rect
    }

    pub fn phase(&self) -> InteractionPhase {
        if self.drag.is_some() {
            InteractionPhase::Dragging
        } else if self.selection.design_selected {
            InteractionPhase::Selected
        } else {
            InteractionPhase::Idle
        }
    }
}

/// An immutable snapshot of the whole document.
///
/// Cloning is cheap: only the three `Arc`s are copied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentState {
    pub product: Arc<ProductState>,
    pub view: Arc<ViewState>,
    pub editor: Arc<EditorState>,
}

impl DocumentState {
    pub fn new(product: ProductState, view: ViewState, editor: EditorState) -> Self {
        Self {
            product: Arc::new(product),
            view: Arc::new(view),
            editor: Arc::new(editor),
        }
    }

    /// Initial document for a configuration.
    ///
    /// Starts on design 0 with no image. The viewport comes from the
    /// configuration, or is derived from the canvas size when the configured
    /// rectangle is empty.
    pub fn from_config(config: &EditorConfig) -> Self {
        let configured = config.view.initial_viewport;
        let viewport = if configured.is_empty() {
            viewport::initial_viewport(
                f64::from(config.canvas.width_px),
                f64::from(config.canvas.height_px),
                config.canvas.dpi,
            )
        } else {
            configured
        };

        Self::new(
            ProductState::default(),
            ViewState {
                enable_3d: config.view.enable_3d,
                enable_twists: config.view.enable_twists,
                background: config.view.background,
                viewport,
                animation: None,
            },
            EditorState::default(),
        )
    }

    /// Sub-trees that are not the same allocation as in `previous`.
    pub fn changes_from(&self, previous: &DocumentState) -> ChangeSet {
        ChangeSet {
            product: !Arc::ptr_eq(&self.product, &previous.product),
            view: !Arc::ptr_eq(&self.view, &previous.view),
            editor: !Arc::ptr_eq(&self.editor, &previous.editor),
        }
    }

    /// True when every sub-tree is shared with `other`.
    pub fn is_same(&self, other: &DocumentState) -> bool {
        self.changes_from(other).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchkit_core::Point;

    #[test]
    fn test_phase_follows_selection_and_drag() {
        let mut editor = EditorState::default();
        assert_eq!(editor.phase(), InteractionPhase::Idle);

        editor.selection.design_selected = true;
        assert_eq!(editor.phase(), InteractionPhase::Selected);

        editor.drag = Some(DragState {
            transform: Matrix::translation(1.0, 0.0),
            hit: SelectionBoxHit::Body,
            update_type: UpdateType::Translate,
        });
        assert_eq!(editor.phase(), InteractionPhase::Dragging);
    }

    #[test]
    fn test_from_config_derives_empty_viewport() {
        let mut config = EditorConfig::default();
        config.view.initial_viewport = Rect::empty();
        config.canvas.width_px = 96;
        config.canvas.height_px = 192;
        config.canvas.dpi = 96.0;

        let state = DocumentState::from_config(&config);
        let vp = state.view.viewport;
        assert!((vp.width() - 254.0).abs() < 1e-9);
        assert!((vp.height() - 508.0).abs() < 1e-9);
        assert_eq!(vp.center(), Point::origin());
    }

    #[test]
    fn test_changes_from_uses_identity() {
        let state = DocumentState::default();
        let copy = state.clone();
        assert!(copy.is_same(&state));

        let rebuilt = DocumentState {
            view: Arc::new(ViewState::clone(&state.view)),
            ..state.clone()
        };
        // equal by value, but a different allocation
        assert_eq!(rebuilt, state);
        let changes = rebuilt.changes_from(&state);
        assert!(changes.view && !changes.product && !changes.editor);
    }
}
