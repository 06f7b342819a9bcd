//! The map canvas as one state container.
//!
//! Owns the viewport, the marker mirror and the interaction state. The UI
//! feeds it pointer events and async results; it never talks to the network
//! itself. Requests go out as [`PendingRequest`]s and come back through
//! [`MapCanvas::finish_request`], keyed by ticket so that a response for an
//! editor that has since been closed or replaced is dropped.

use crate::editor::{MarkerEditor, PendingRequest, RequestKind, RequestTicket};
use crate::error::{MapError, ValidationError};
use crate::input::PointerEvent;
use crate::interaction::{InteractionController, Outcome};
use crate::models::Marker;
use crate::store::{MarkerStore, ReloadTicket};
use crate::viewport::{MapSize, Viewport};

/// Result of feeding a response back into the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The request succeeded and the editor was closed.
    Completed {
        kind: RequestKind,
        marker: Option<Marker>,
    },
    /// The request failed. The editor stays open unless the target is gone.
    Failed { error: MapError },
    /// Nobody is waiting for this ticket anymore.
    Stale { succeeded: bool },
}

impl RequestOutcome {
    /// Whether the marker mirror should be refreshed from the server.
    ///
    /// A successful mutation always warrants a reload, even one that arrived
    /// after its editor was dismissed.
    pub fn needs_reload(&self) -> bool {
        match self {
            RequestOutcome::Completed { .. } => true,
            RequestOutcome::Failed { error } => error.requires_reload(),
            RequestOutcome::Stale { succeeded } => *succeeded,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapCanvas {
    map_size: MapSize,
    viewport: Viewport,
    store: MarkerStore,
    controller: InteractionController,
    next_ticket: u64,
    in_flight: Option<(RequestTicket, RequestKind)>,
    mounted: bool,
}

impl MapCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_size(&self) -> MapSize {
        self.map_size
    }

    /// Only affects the next centering; the current view is left alone.
    pub fn set_map_size(&mut self, size: MapSize) {
        self.map_size = size;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Center the map in a container of the given size. Only the first call
    /// has an effect, so later layout changes do not undo the user's view.
    pub fn mount(&mut self, container_w: f64, container_h: f64) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.viewport = Viewport::centered(self.map_size, container_w, container_h);
        tracing::debug!(container_w, container_h, "map canvas mounted");
        true
    }

    /// Back to unit scale, centered.
    pub fn reset_view(&mut self, container_w: f64, container_h: f64) {
        self.mounted = true;
        self.viewport = Viewport::centered(self.map_size, container_w, container_h);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Outcome {
        self.controller
            .handle(event, &mut self.viewport, &self.store)
    }

    pub fn editor(&self) -> Option<&MarkerEditor> {
        self.controller.editor()
    }

    pub fn editor_mut(&mut self) -> Option<&mut MarkerEditor> {
        self.controller.editor_mut()
    }

    pub fn dismiss_editor(&mut self) -> bool {
        self.controller.dismiss_editor()
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        RequestTicket(self.next_ticket)
    }

    /// Validate the open editor and hand out the request to send.
    ///
    /// `Ok(None)` means there is nothing to send: no editor, a request
    /// already in flight, or a permission failure that blocks retries.
    pub fn begin_submit(&mut self) -> Result<Option<PendingRequest>, ValidationError> {
        if self.editor().is_none() {
            return Ok(None);
        }
        let ticket = self.issue_ticket();
        let pending = match self.controller.editor_mut() {
            Some(editor) => editor.begin_submit(ticket)?,
            None => None,
        };
        self.track(pending.as_ref());
        Ok(pending)
    }

    pub fn begin_delete(&mut self) -> Option<PendingRequest> {
        self.editor()?;
        let ticket = self.issue_ticket();
        let pending = self.controller.editor_mut()?.begin_delete(ticket);
        self.track(pending.as_ref());
        pending
    }

    fn track(&mut self, pending: Option<&PendingRequest>) {
        if let Some(pending) = pending {
            self.in_flight = Some((pending.ticket, pending.request.kind()));
        }
    }

    pub fn finish_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<Option<Marker>, MapError>,
    ) -> RequestOutcome {
        let Some(editor) = self
            .controller
            .editor_mut()
            .filter(|editor| editor.owns(ticket))
        else {
            tracing::debug!(?ticket, ok = result.is_ok(), "ignoring response for closed editor");
            return RequestOutcome::Stale {
                succeeded: result.is_ok(),
            };
        };

        let kind = match self.in_flight.take() {
            Some((t, kind)) if t == ticket => kind,
            _ if editor.is_create() => RequestKind::Create,
            _ => RequestKind::Update,
        };

        match result {
            Ok(marker) => {
                self.controller.dismiss_editor();
                RequestOutcome::Completed { kind, marker }
            }
            Err(error) => {
                tracing::warn!(error = %error, "marker request failed");
                if error.requires_reload() {
                    // The marker is gone; the editor has nothing left to edit.
                    self.controller.dismiss_editor();
                } else {
                    editor.fail(error.clone());
                }
                RequestOutcome::Failed { error }
            }
        }
    }

    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.store.begin_reload()
    }

    pub fn finish_reload(&mut self, ticket: ReloadTicket, markers: Vec<Marker>) -> bool {
        self.store.finish_reload(ticket, markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::MarkerRequest;
    use crate::models::{MapPoint, MarkerId, MarkerType, ScreenPoint};

    fn marker(id: &str, x: f64, y: f64) -> Marker {
        Marker {
            id: MarkerId::from(id),
            name: format!("Marker {}", id),
            marker_type: MarkerType::Mine,
            is_friendly: true,
            position: MapPoint::new(x, y),
            created_by: None,
            created_at: None,
        }
    }

    fn loaded(markers: Vec<Marker>) -> MapCanvas {
        let mut canvas = MapCanvas::new();
        let t = canvas.begin_reload();
        canvas.finish_reload(t, markers);
        canvas
    }

    #[test]
    fn test_mount_centers_once() {
        let mut canvas = MapCanvas::new();
        assert!(canvas.mount(1048.0, 848.0));
        assert_eq!(canvas.viewport().offset(), ScreenPoint::new(-500.0, -600.0));
        canvas.handle_pointer(PointerEvent::press(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::move_to(10.0, 0.0));
        canvas.handle_pointer(PointerEvent::release(10.0, 0.0));
        assert!(!canvas.mount(2000.0, 2000.0));
        assert_eq!(canvas.viewport().offset(), ScreenPoint::new(-490.0, -600.0));
    }

    #[test]
    fn test_reset_view_restores_unit_scale() {
        let mut canvas = MapCanvas::new();
        canvas.mount(2048.0, 2048.0);
        canvas.handle_pointer(PointerEvent::wheel(10.0, 10.0, -1.0));
        canvas.reset_view(2048.0, 2048.0);
        assert_eq!(canvas.viewport().scale(), 1.0);
        assert_eq!(canvas.viewport().offset(), ScreenPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_set_map_size_affects_centering() {
        let mut canvas = MapCanvas::new();
        canvas.set_map_size(MapSize {
            width: 1000.0,
            height: 500.0,
        });
        canvas.mount(1000.0, 1000.0);
        assert_eq!(canvas.viewport().offset(), ScreenPoint::new(0.0, 250.0));
    }

    #[test]
    fn test_submit_then_success_closes_editor() {
        let mut canvas = loaded(vec![]);
        canvas.handle_pointer(PointerEvent::context(300.0, 200.0));
        canvas.editor_mut().unwrap().set_name("Rhodes General Store");
        let pending = canvas.begin_submit().unwrap().unwrap();
        assert!(matches!(pending.request, MarkerRequest::Create(_)));
        assert!(canvas.editor().unwrap().is_submitting());

        let created = marker("1", 300.0, 200.0);
        let outcome = canvas.finish_request(pending.ticket, Ok(Some(created.clone())));
        assert_eq!(
            outcome,
            RequestOutcome::Completed {
                kind: RequestKind::Create,
                marker: Some(created)
            }
        );
        assert!(outcome.needs_reload());
        assert!(canvas.editor().is_none());
    }

    #[test]
    fn test_double_submit_sends_once() {
        let mut canvas = loaded(vec![]);
        canvas.handle_pointer(PointerEvent::context(1.0, 1.0));
        canvas.editor_mut().unwrap().set_name("x");
        assert!(canvas.begin_submit().unwrap().is_some());
        assert_eq!(canvas.begin_submit(), Ok(None));
    }

    #[test]
    fn test_empty_name_produces_no_request() {
        let mut canvas = loaded(vec![]);
        canvas.handle_pointer(PointerEvent::context(1.0, 1.0));
        canvas.editor_mut().unwrap().set_name("   ");
        assert_eq!(canvas.begin_submit(), Err(ValidationError::EmptyName));
        let editor = canvas.editor().unwrap();
        assert!(!editor.is_submitting());
        assert!(editor.error().is_some());
    }

    #[test]
    fn test_submit_without_editor_is_noop() {
        let mut canvas = MapCanvas::new();
        assert_eq!(canvas.begin_submit(), Ok(None));
        assert!(canvas.begin_delete().is_none());
    }

    #[test]
    fn test_delete_only_in_edit_mode() {
        let mut canvas = loaded(vec![marker("7", 100.0, 100.0)]);
        canvas.handle_pointer(PointerEvent::context(500.0, 500.0));
        assert!(canvas.begin_delete().is_none());

        canvas.handle_pointer(PointerEvent::context(100.0, 100.0));
        let pending = canvas.begin_delete().unwrap();
        assert_eq!(pending.request, MarkerRequest::Delete(MarkerId::from("7")));
        let outcome = canvas.finish_request(pending.ticket, Ok(None));
        assert_eq!(
            outcome,
            RequestOutcome::Completed {
                kind: RequestKind::Delete,
                marker: None
            }
        );
    }

    #[test]
    fn test_network_failure_keeps_editor_for_retry() {
        let mut canvas = loaded(vec![marker("7", 100.0, 100.0)]);
        canvas.handle_pointer(PointerEvent::context(100.0, 100.0));
        let pending = canvas.begin_submit().unwrap().unwrap();
        let outcome = canvas.finish_request(
            pending.ticket,
            Err(MapError::Network("connection reset".to_string())),
        );
        assert!(!outcome.needs_reload());
        let editor = canvas.editor().unwrap();
        assert!(matches!(editor.error(), Some(MapError::Network(_))));
        assert_eq!(editor.name(), "Marker 7");
        assert!(canvas.begin_submit().unwrap().is_some());
    }

    #[test]
    fn test_permission_failure_blocks_resubmit() {
        let mut canvas = loaded(vec![]);
        canvas.handle_pointer(PointerEvent::context(1.0, 1.0));
        canvas.editor_mut().unwrap().set_name("x");
        let pending = canvas.begin_submit().unwrap().unwrap();
        canvas.finish_request(pending.ticket, Err(MapError::Permission("forbidden".to_string())));
        assert!(canvas.editor().is_some());
        assert_eq!(canvas.begin_submit(), Ok(None));
    }

    #[test]
    fn test_not_found_closes_editor_and_reloads() {
        let mut canvas = loaded(vec![marker("7", 100.0, 100.0)]);
        canvas.handle_pointer(PointerEvent::context(100.0, 100.0));
        let pending = canvas.begin_submit().unwrap().unwrap();
        let outcome =
            canvas.finish_request(pending.ticket, Err(MapError::NotFound(MarkerId::from("7"))));
        assert!(outcome.needs_reload());
        assert!(canvas.editor().is_none());
    }

    #[test]
    fn test_late_response_after_dismiss_is_stale() {
        let mut canvas = loaded(vec![]);
        canvas.handle_pointer(PointerEvent::context(1.0, 1.0));
        canvas.editor_mut().unwrap().set_name("x");
        let pending = canvas.begin_submit().unwrap().unwrap();
        canvas.dismiss_editor();
        let outcome = canvas.finish_request(pending.ticket, Ok(Some(marker("1", 1.0, 1.0))));
        assert_eq!(outcome, RequestOutcome::Stale { succeeded: true });
        assert!(outcome.needs_reload());
        assert!(canvas.editor().is_none());
    }

    #[test]
    fn test_late_response_does_not_touch_replacement_editor() {
        let mut canvas = loaded(vec![]);
        canvas.handle_pointer(PointerEvent::context(1.0, 1.0));
        canvas.editor_mut().unwrap().set_name("first");
        let pending = canvas.begin_submit().unwrap().unwrap();

        canvas.handle_pointer(PointerEvent::context(50.0, 50.0));
        canvas.editor_mut().unwrap().set_name("second");

        let outcome = canvas.finish_request(
            pending.ticket,
            Err(MapError::Network("timeout".to_string())),
        );
        assert_eq!(outcome, RequestOutcome::Stale { succeeded: false });
        assert!(!outcome.needs_reload());
        let editor = canvas.editor().unwrap();
        assert_eq!(editor.name(), "second");
        assert!(editor.error().is_none());
    }

    #[test]
    fn test_rapid_context_triggers_leave_one_editor() {
        let mut canvas = loaded(vec![marker("7", 100.0, 100.0)]);
        canvas.handle_pointer(PointerEvent::context(100.0, 100.0));
        canvas.handle_pointer(PointerEvent::context(700.0, 700.0));
        let editor = canvas.editor().unwrap();
        assert!(editor.is_create());
    }

    #[test]
    fn test_context_while_dragging_opens_nothing() {
        let mut canvas = loaded(vec![marker("7", 100.0, 100.0)]);
        canvas.handle_pointer(PointerEvent::press(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::move_to(5.0, 5.0));
        assert_eq!(
            canvas.handle_pointer(PointerEvent::context(105.0, 105.0)),
            Outcome::Ignored
        );
        assert!(canvas.editor().is_none());
    }

    #[test]
    fn test_hit_test_follows_current_view() {
        let mut canvas = loaded(vec![marker("7", 100.0, 100.0)]);
        canvas.handle_pointer(PointerEvent::press(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::move_to(200.0, 0.0));
        canvas.handle_pointer(PointerEvent::release(200.0, 0.0));
        canvas.handle_pointer(PointerEvent::context(100.0, 100.0));
        assert!(canvas.editor().unwrap().is_create());
        canvas.handle_pointer(PointerEvent::context(300.0, 100.0));
        assert_eq!(
            canvas.editor().unwrap().marker_id(),
            Some(&MarkerId::from("7"))
        );
    }
}
