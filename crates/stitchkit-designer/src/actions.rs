//! Actions accepted by the document store.
//!
//! Every state transition is one [`Action`] variant. Resource results carry
//! the catalog index they were started for (the *idempotent index*) so the
//! reducer can drop results for a selection the user has since left.

use std::fmt;
use std::sync::Arc;
use stitchkit_core::{
    Color, DesignElement, ImageElement, LetteringParams, Matrix, Rect, ResourceKind, ThreadColor,
};

use crate::engine::{SelectionBoxHit, UpdateType};
use crate::state::{AnimationParams, EditMode};

/// Edits applied to the loaded design.
///
/// Fields left as `None` keep the design's current value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignPatch {
    pub matrix: Option<Matrix>,
    pub colors: Option<Vec<ThreadColor>>,
    pub lettering: Option<Vec<LetteringParams>>,
}

impl DesignPatch {
    /// Patch replacing the placement matrix.
    pub fn matrix(matrix: Matrix) -> Self {
        Self {
            matrix: Some(matrix),
            ..Default::default()
        }
    }

    /// Patch replacing the thread palette.
    pub fn colors(colors: Vec<ThreadColor>) -> Self {
        Self {
            colors: Some(colors),
            ..Default::default()
        }
    }

    /// Patch replacing the lettering runs.
    pub fn lettering(lettering: Vec<LetteringParams>) -> Self {
        Self {
            lettering: Some(lettering),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_none() && self.colors.is_none() && self.lettering.is_none()
    }

    /// New design value with the patch applied. The element identity is kept.
    pub fn apply(&self, design: &DesignElement) -> DesignElement {
        let mut next = design.clone();
        if let Some(matrix) = self.matrix {
            next.matrix = Some(matrix);
        }
        if let Some(colors) = &self.colors {
            next.colors = colors.clone();
        }
        if let Some(lettering) = &self.lettering {
            next.lettering = lettering.clone();
        }
        next
    }
}

/// A document transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Select a design catalog entry. Clears the loaded design and the selection.
    ChangeDesign { index: usize },
    /// Select an image catalog entry. Clears the loaded image.
    ChangeImage { index: usize },
    /// A fetch for `idempotent_index` has started.
    ResourceLoading {
        kind: ResourceKind,
        idempotent_index: usize,
    },
    /// Result of a design load. `None` means the entry has nothing to load.
    CommitDesign {
        idempotent_index: usize,
        element: Option<Arc<DesignElement>>,
    },
    /// Result of an image load. `None` means the entry has nothing to load.
    CommitImage {
        idempotent_index: usize,
        element: Option<Arc<ImageElement>>,
    },
    /// A fetch for `idempotent_index` failed.
    ResourceFailed {
        kind: ResourceKind,
        idempotent_index: usize,
    },
    /// Edit the loaded design if it still belongs to `idempotent_index`.
    ModifyDesign {
        idempotent_index: usize,
        patch: DesignPatch,
    },
    Toggle3d { enabled: bool },
    ToggleTwists { enabled: bool },
    SetBackground { color: Color },
    SetEditMode { mode: EditMode },
    ChangeViewport {
        rect: Rect,
        animation: Option<AnimationParams>,
    },
    /// Selection reported by the gesture engine.
    ChangeSelection {
        design_selected: bool,
        /// Updates the rotate-handle mode when present.
        rotation_mode: Option<bool>,
    },
    /// Measured bounding rectangle of the selected design.
    ChangeSelectionRect { rect: Option<Rect> },
    DeselectAll,
    /// Preview transform of an in-progress drag.
    UpdateDrag {
        transform: Matrix,
        hit: SelectionBoxHit,
        update_type: UpdateType,
    },
    EndDrag,
}

/// Discriminant of [`Action`], used for logging and change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ChangeDesign,
    ChangeImage,
    ResourceLoading,
    CommitDesign,
    CommitImage,
    ResourceFailed,
    ModifyDesign,
    Toggle3d,
    ToggleTwists,
    SetBackground,
    SetEditMode,
    ChangeViewport,
    ChangeSelection,
    ChangeSelectionRect,
    DeselectAll,
    UpdateDrag,
    EndDrag,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::ChangeDesign { .. } => ActionKind::ChangeDesign,
            Action::ChangeImage { .. } => ActionKind::ChangeImage,
            Action::ResourceLoading { .. } => ActionKind::ResourceLoading,
            Action::CommitDesign { .. } => ActionKind::CommitDesign,
            Action::CommitImage { .. } => ActionKind::CommitImage,
            Action::ResourceFailed { .. } => ActionKind::ResourceFailed,
            Action::ModifyDesign { .. } => ActionKind::ModifyDesign,
            Action::Toggle3d { .. } => ActionKind::Toggle3d,
            Action::ToggleTwists { .. } => ActionKind::ToggleTwists,
            Action::SetBackground { .. } => ActionKind::SetBackground,
            Action::SetEditMode { .. } => ActionKind::SetEditMode,
            Action::ChangeViewport { .. } => ActionKind::ChangeViewport,
            Action::ChangeSelection { .. } => ActionKind::ChangeSelection,
            Action::ChangeSelectionRect { .. } => ActionKind::ChangeSelectionRect,
            Action::DeselectAll => ActionKind::DeselectAll,
            Action::UpdateDrag { .. } => ActionKind::UpdateDrag,
            Action::EndDrag => ActionKind::EndDrag,
        }
    }

    /// Index carried by resource results and design edits.
    pub fn idempotent_index(&self) -> Option<usize> {
        match self {
            Action::ResourceLoading {
                idempotent_index, ..
            }
            | Action::CommitDesign {
                idempotent_index, ..
            }
            | Action::CommitImage {
                idempotent_index, ..
            }
            | Action::ResourceFailed {
                idempotent_index, ..
            }
            | Action::ModifyDesign {
                idempotent_index, ..
            } => Some(*idempotent_index),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
