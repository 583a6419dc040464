//! Asynchronous loading of catalog designs and images.
//!
//! Selecting a catalog entry updates the document synchronously, then a
//! spawned task fetches the element through the rendering engine. Every
//! action the task dispatches is tagged with the index it was started for,
//! so a result that arrives after the user picked something else is dropped
//! by the reducer instead of overwriting the newer selection.

use std::sync::Arc;
use stitchkit_core::{
    AppEvent, DesignElement, EngineError, Error, ImageDefinition, ImageElement, LoadError,
    LoadStatus, Point, Rect, ResourceEvent, ResourceKind, Result,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actions::Action;
use crate::engine::EngineSlot;
use crate::state::DocumentState;
use crate::store::DocumentStore;
use crate::viewport::controller::ViewportController;

/// How a load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The element was committed to the document.
    Committed,
    /// The catalog entry has nothing to fetch; committed as empty.
    Empty,
    /// The fetch failed and the document was marked `Failed`.
    Failed,
    /// The selection moved on before the result arrived; nothing changed.
    Stale,
    /// No rendering engine is attached; the load did not start.
    Deferred,
}

/// Handle to a spawned load.
pub type LoadTask = JoinHandle<Result<LoadOutcome>>;

fn runtime() -> Result<Handle> {
    Handle::try_current().map_err(|e| Error::other(format!("no async runtime: {e}")))
}

/// Places a decoded image in world space.
///
/// The image is `placement_width` wide, keeps its pixel aspect ratio and is
/// centered on the world origin, shifted so that `origin_offset` (measured
/// from the image centre) lands on the origin.
pub fn place_image(definition: &ImageDefinition, mut element: ImageElement) -> ImageElement {
    let width = definition.placement_width;
    let height = match element.metadata {
        Some(meta) if meta.xdim > 0 => f64::from(meta.ydim) / f64::from(meta.xdim) * width,
        _ => width,
    };
    let offset = definition.origin_offset.unwrap_or_default();
    element.rect = Rect::centered(Point::new(-offset.x, -offset.y), width, height);
    element
}

/// Loads catalog entries into the document.
pub struct ResourceLoader {
    store: Arc<DocumentStore>,
    engine: EngineSlot,
    viewport: Arc<ViewportController>,
}

impl ResourceLoader {
    pub fn new(
        store: Arc<DocumentStore>,
        engine: EngineSlot,
        viewport: Arc<ViewportController>,
    ) -> Self {
        Self {
            store,
            engine,
            viewport,
        }
    }

    /// Selects design `index` and starts loading it. Any selection of the
    /// previous element is cleared, even when `index` is already current.
    ///
    /// The selection is applied before this returns; the load runs on the
    /// tokio runtime this is called from. Fails without dispatching anything
    /// for an index outside the catalog.
    pub fn select_design(self: &Arc<Self>, index: usize) -> Result<LoadTask> {
        self.store.catalog().design(index)?;
        self.store.dispatch(Action::ChangeDesign { index });
        // re-picking the current entry reloads it, so the old selection goes
        self.store.dispatch(Action::DeselectAll);

        let runtime = runtime()?;
        let loader = Arc::clone(self);
        Ok(runtime.spawn(async move { loader.load_design(index).await }))
    }

    /// Selects image `index` and starts loading it.
    pub fn select_image(self: &Arc<Self>, index: usize) -> Result<LoadTask> {
        self.store.catalog().image(index)?;
        self.store.dispatch(Action::ChangeImage { index });

        let runtime = runtime()?;
        let loader = Arc::clone(self);
        Ok(runtime.spawn(async move { loader.load_image(index).await }))
    }

    /// Loads design `index`, committing the result if it is still current.
    pub async fn load_design(&self, index: usize) -> Result<LoadOutcome> {
        let definition = self.store.catalog().design(index)?.clone();
        if definition.is_empty() {
            let state = self.store.dispatch(Action::CommitDesign {
                idempotent_index: index,
                element: None,
            });
            return Ok(self.settle(ResourceKind::Design, index, &state, LoadOutcome::Empty));
        }

        let Ok(engine) = self.engine.require() else {
            debug!("Design {} load deferred: engine not ready", index);
            return Ok(LoadOutcome::Deferred);
        };

        self.begin(ResourceKind::Design, index);
        match engine.create_design_element(&definition.locator).await {
            Ok(element) => {
                let element = DesignElement {
                    matrix: element.matrix.or(definition.matrix),
                    ..element
                };
                let state = self.store.dispatch(Action::CommitDesign {
                    idempotent_index: index,
                    element: Some(Arc::new(element)),
                });
                Ok(self.settle(ResourceKind::Design, index, &state, LoadOutcome::Committed))
            }
            Err(source) => {
                self.report_failure(ResourceKind::Design, index, source);
                let state = self.store.dispatch(Action::ResourceFailed {
                    kind: ResourceKind::Design,
                    idempotent_index: index,
                });
                Ok(self.settle(ResourceKind::Design, index, &state, LoadOutcome::Failed))
            }
        }
    }

    /// Loads image `index`, placing it and zooming to it if it is still current.
    pub async fn load_image(&self, index: usize) -> Result<LoadOutcome> {
        let definition = self.store.catalog().image(index)?.clone();
        if definition.is_empty() {
            let state = self.store.dispatch(Action::CommitImage {
                idempotent_index: index,
                element: None,
            });
            return Ok(self.settle(ResourceKind::Image, index, &state, LoadOutcome::Empty));
        }

        let Ok(engine) = self.engine.require() else {
            debug!("Image {} load deferred: engine not ready", index);
            return Ok(LoadOutcome::Deferred);
        };

        self.begin(ResourceKind::Image, index);
        match engine.create_image_element(&definition.locator).await {
            Ok(element) => {
                let element = Arc::new(place_image(&definition, element));
                let state = self.store.dispatch(Action::CommitImage {
                    idempotent_index: index,
                    element: Some(Arc::clone(&element)),
                });
                let outcome =
                    self.settle(ResourceKind::Image, index, &state, LoadOutcome::Committed);
                if outcome == LoadOutcome::Committed {
                    if let Err(e) = self.viewport.zoom_to_image(&element) {
                        warn!("Zoom to image {} failed: {}", index, e);
                    }
                }
                Ok(outcome)
            }
            Err(source) => {
                self.report_failure(ResourceKind::Image, index, source);
                let state = self.store.dispatch(Action::ResourceFailed {
                    kind: ResourceKind::Image,
                    idempotent_index: index,
                });
                Ok(self.settle(ResourceKind::Image, index, &state, LoadOutcome::Failed))
            }
        }
    }

    /// Loads the currently selected design and image concurrently.
    pub async fn reload_all(&self) -> (Result<LoadOutcome>, Result<LoadOutcome>) {
        let state = self.store.snapshot();
        tokio::join!(
            self.load_design(state.product.design_index),
            self.load_image(state.product.image_index)
        )
    }

    fn begin(&self, kind: ResourceKind, index: usize) {
        self.store.dispatch(Action::ResourceLoading {
            kind,
            idempotent_index: index,
        });
        self.store
            .events()
            .publish(AppEvent::Resource(ResourceEvent::LoadStarted { kind, index }));
    }

    fn report_failure(&self, kind: ResourceKind, index: usize, source: EngineError) {
        let error = LoadError::LoadFailed {
            kind,
            index,
            source,
        };
        match std::error::Error::source(&error) {
            Some(cause) => warn!("{}: {}", error, cause),
            None => warn!("{}", error),
        }
    }

    /// Classifies a dispatched result as applied or stale and announces it.
    fn settle(
        &self,
        kind: ResourceKind,
        index: usize,
        state: &DocumentState,
        applied: LoadOutcome,
    ) -> LoadOutcome {
        let current = state.product.index(kind);
        let event = if current == index {
            let status = state.product.status(kind).unwrap_or(LoadStatus::Failed);
            info!("{} {} settled as {}", kind, index, status);
            ResourceEvent::Settled {
                kind,
                index,
                status,
            }
        } else {
            debug!("{} {} result discarded (current is {})", kind, index, current);
            ResourceEvent::StaleDiscarded {
                kind,
                index,
                current,
            }
        };
        self.store.events().publish(AppEvent::Resource(event));

        if current == index {
            applied
        } else {
            LoadOutcome::Stale
        }
    }
}

impl std::fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("engine", &self.engine)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchkit_core::ImageMetadata;

    #[test]
    fn test_place_image_keeps_aspect_and_offset() {
        let definition = ImageDefinition::new("Shirt", "shirt.png", 5080.0)
            .with_origin_offset(Point::new(-600.0, 800.0));
        let element = ImageElement::new(
            Rect::empty(),
            Some(ImageMetadata {
                xdim: 1000,
                ydim: 1200,
            }),
        );

        let placed = place_image(&definition, element);
        assert!((placed.rect.width() - 5080.0).abs() < 1e-9);
        assert!((placed.rect.height() - 6096.0).abs() < 1e-9);
        assert_eq!(placed.rect.center(), Point::new(600.0, -800.0));
    }

    #[test]
    fn test_place_image_without_metadata_is_square() {
        let definition = ImageDefinition::new("Plain", "plain.png", 100.0);
        let placed = place_image(&definition, ImageElement::new(Rect::empty(), None));
        assert_eq!(placed.rect, Rect::new(-50.0, -50.0, 50.0, 50.0));
    }
}
