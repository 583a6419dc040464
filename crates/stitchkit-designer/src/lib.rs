//! # StitchKit Designer
//!
//! Document state and interaction core of the embroidery editor. It owns the
//! model of what is on the canvas, mediates every change to it and keeps it
//! in step with two external collaborators: a rendering/geometry engine and
//! a pointer-gesture engine.
//!
//! ## Core Components
//!
//! - **State & Store**: persistent [`DocumentState`] snapshots, a pure
//!   [`reduce`] function over [`Action`]s and the [`DocumentStore`] that
//!   serializes dispatch and publishes change events
//! - **Resource Loader**: asynchronous design/image loading with
//!   index-guarded commits ([`ResourceLoader`])
//! - **Viewport**: initial framing, zoom-to-fit and zoom-to-image
//!   ([`fit_to_content`], [`ViewportController`])
//! - **Interaction**: the selection/drag/rotate state machine and the
//!   gesture callbacks ([`InteractionController`])
//!
//! ## Architecture
//!
//! ```text
//! EditorSession
//!   ├── DocumentStore (snapshot + reducer + event bus)
//!   ├── ResourceLoader ──────┐
//!   ├── ViewportController ──┼── EngineSlot (NotReady | Ready(RenderEngine))
//!   ├── InteractionController┘     ▲
//!   │        ▲                     │
//!   │        └── GestureEngine callbacks
//!   └── ScenePresenter (snapshot -> scene, wireframe, viewport)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stitchkit_designer::{EditorSession, EditMode};
//! use stitchkit_settings::EditorConfig;
//!
//! let session = EditorSession::new(EditorConfig::default())?;
//! session.attach_engines(render, gesture).await;
//! session.set_edit_mode(EditMode::Select);
//! let load = session.select_design(1)?;
//! ```

pub mod actions;
pub mod engine;
pub mod interaction;
pub mod loader;
pub mod presenter;
pub mod projection;
pub mod reducer;
pub mod session;
pub mod state;
pub mod store;
pub mod viewport;

pub use actions::{Action, ActionKind, DesignPatch};
pub use engine::{
    Corner, ElementHit, EngineCapability, EngineResult, EngineSlot, GestureCallbacks,
    GestureEngine, GestureSelection, RenderEngine, RenderOptions, RenderScene, SceneElement,
    SelectedElement, SelectionBox, SelectionBoxHit, SelectionUpdate, UpdateType, WireframeLayer,
};
pub use interaction::InteractionController;
pub use loader::{place_image, LoadOutcome, LoadTask, ResourceLoader};
pub use presenter::ScenePresenter;
pub use reducer::reduce;
pub use session::EditorSession;
pub use state::{
    AnimationParams, DocumentState, DragState, EditMode, EditorState, InteractionPhase,
    ProductState, SelectionState, ViewState,
};
pub use store::DocumentStore;
pub use viewport::controller::ViewportController;
pub use viewport::{fit_to_content, fit_to_image, initial_viewport, FitParams};
