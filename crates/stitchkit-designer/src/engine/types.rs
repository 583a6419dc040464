//! Data exchanged with the rendering and gesture engines.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stitchkit_core::{Color, DesignElement, ElementId, ImageElement, Matrix, Rect};

/// One drawable element of the scene, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    Image {
        element: Arc<ImageElement>,
        matrix: Matrix,
    },
    Design {
        element: Arc<DesignElement>,
        /// Effective transform, including any drag preview.
        matrix: Matrix,
    },
}

impl SceneElement {
    pub fn design(element: Arc<DesignElement>, matrix: Matrix) -> Self {
        SceneElement::Design { element, matrix }
    }

    pub fn image(element: Arc<ImageElement>, matrix: Matrix) -> Self {
        SceneElement::Image { element, matrix }
    }

    pub fn uid(&self) -> ElementId {
        match self {
            SceneElement::Image { element, .. } => element.uid,
            SceneElement::Design { element, .. } => element.uid,
        }
    }

    pub fn matrix(&self) -> Matrix {
        match self {
            SceneElement::Image { matrix, .. } | SceneElement::Design { matrix, .. } => *matrix,
        }
    }

    pub fn is_design(&self) -> bool {
        matches!(self, SceneElement::Design { .. })
    }
}

/// Ordered element list drawn by the rendering engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderScene {
    pub elements: Vec<SceneElement>,
    pub background: Color,
}

impl RenderScene {
    pub fn design(&self) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.is_design())
    }

    /// Draw-order position of an element.
    pub fn position_of(&self, uid: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.uid() == uid)
    }
}

/// Shading toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub enable_3d: bool,
    pub enable_twists: bool,
}

/// The selection box overlay drawn on top of the scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionBox {
    pub selected: Vec<ElementId>,
    pub display: bool,
    pub rotate: bool,
    /// Measured bounds of the selection.
    pub rect: Option<Rect>,
    /// Drag preview transform applied to `rect`.
    pub matrix: Option<Matrix>,
}

/// Overlay layer drawn above the scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireframeLayer {
    pub selection_box: Option<SelectionBox>,
}

/// Part of the selection box under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionBoxHit {
    #[default]
    Nothing,
    /// Inside the box, away from any handle.
    Body,
    ScaleHandle(Corner),
    RotateHandle(Corner),
}

/// Corner handle of the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

/// What an in-progress drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateType {
    #[default]
    None,
    Translate,
    Scale,
    Rotate,
}

/// Result of hit-testing a scene element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementHit {
    Miss,
    /// Hit, with the distance from the nearest stitch.
    Hit { distance: f64 },
}

impl ElementHit {
    pub fn is_hit(&self) -> bool {
        matches!(self, ElementHit::Hit { .. })
    }
}

/// Selection report from the gesture engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionUpdate {
    pub selected: Vec<ElementId>,
    pub dragging: bool,
    pub rotating: bool,
    pub drag_hit: SelectionBoxHit,
    pub update_type: UpdateType,
    /// Transform accumulated since the drag started.
    pub drag_transform: Matrix,
}

/// A selected element as the gesture engine sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedElement {
    /// Draw-order position within the scene.
    pub scene_index: usize,
    /// Committed transform, before any drag preview.
    pub original_transform: Matrix,
}

/// Selection data pushed to the gesture engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureSelection {
    pub selected: Vec<SelectedElement>,
    pub dragging: bool,
    pub rotating: bool,
    pub drag_transform: Matrix,
    pub drag_hit: SelectionBoxHit,
    pub update_type: UpdateType,
    pub drag_rect: Option<Rect>,
}
