//! Drivers that run canvas requests against a [`MarkerService`].
//!
//! The canvas is reached through [`CanvasAccess`] and only borrowed between
//! awaits, so the caller decides how it is shared (a Dioxus signal in the
//! browser, a plain `MapCanvas` in tests).

use crate::canvas::{MapCanvas, RequestOutcome};
use crate::editor::{MarkerRequest, PendingRequest};
use crate::error::MapError;
use crate::models::{Marker, MarkerId, MarkerInput};

/// Remote persistence for markers.
#[allow(async_fn_in_trait)]
pub trait MarkerService {
    async fn list_markers(&self) -> Result<Vec<Marker>, MapError>;
    async fn create_marker(&self, input: &MarkerInput) -> Result<Marker, MapError>;
    async fn update_marker(&self, marker: &Marker) -> Result<Marker, MapError>;
    async fn delete_marker(&self, id: &MarkerId) -> Result<(), MapError>;
}

/// Short-lived mutable access to a canvas that may be shared.
pub trait CanvasAccess {
    fn update<R>(&mut self, f: impl FnOnce(&mut MapCanvas) -> R) -> R;
}

impl CanvasAccess for MapCanvas {
    fn update<R>(&mut self, f: impl FnOnce(&mut MapCanvas) -> R) -> R {
        f(self)
    }
}

/// Send one request. Deletes resolve to `None`.
pub async fn execute<S: MarkerService>(
    service: &S,
    request: &MarkerRequest,
) -> Result<Option<Marker>, MapError> {
    match request {
        MarkerRequest::Create(input) => service.create_marker(input).await.map(Some),
        MarkerRequest::Update(marker) => service.update_marker(marker).await.map(Some),
        MarkerRequest::Delete(id) => service.delete_marker(id).await.map(|_| None),
    }
}

/// Fetch a full snapshot into the canvas. Returns whether it was applied.
pub async fn reload<C: CanvasAccess, S: MarkerService>(
    canvas: &mut C,
    service: &S,
) -> Result<bool, MapError> {
    let ticket = canvas.update(|c| c.begin_reload());
    let markers = service.list_markers().await?;
    tracing::debug!(count = markers.len(), "loaded markers");
    Ok(canvas.update(|c| c.finish_reload(ticket, markers)))
}

/// What a finished editor request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub outcome: RequestOutcome,
    /// Set when the follow-up reload failed; the mirror may be behind.
    pub reload_error: Option<MapError>,
}

async fn run<C: CanvasAccess, S: MarkerService>(
    canvas: &mut C,
    service: &S,
    pending: PendingRequest,
) -> Completion {
    let result = execute(service, &pending.request).await;
    let outcome = canvas.update(|c| c.finish_request(pending.ticket, result));
    let mut reload_error = None;
    if outcome.needs_reload() {
        if let Err(e) = reload(canvas, service).await {
            tracing::warn!(error = %e, "marker reload failed");
            reload_error = Some(e);
        }
    }
    Completion {
        outcome,
        reload_error,
    }
}

/// Validate and send the open editor. `Ok(None)` when nothing was sent.
///
/// A validation error is returned before any call and is also left on the
/// editor for inline display.
pub async fn submit_editor<C: CanvasAccess, S: MarkerService>(
    canvas: &mut C,
    service: &S,
) -> Result<Option<Completion>, MapError> {
    let Some(pending) = canvas.update(|c| c.begin_submit())? else {
        return Ok(None);
    };
    Ok(Some(run(canvas, service, pending).await))
}

pub async fn delete_from_editor<C: CanvasAccess, S: MarkerService>(
    canvas: &mut C,
    service: &S,
) -> Option<Completion> {
    let pending = canvas.update(|c| c.begin_delete())?;
    Some(run(canvas, service, pending).await)
}
