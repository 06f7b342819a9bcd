use dioxus::prelude::*;
use hunterdash_shared::canvas::MapCanvas;
use hunterdash_shared::remote::{self, CanvasAccess, Completion};
use hunterdash_shared::viewport::MapSize;

use crate::api::HttpMarkerService;
use crate::components::controls_panel::ControlsPanel;
use crate::components::map_view::{MapView, MAP_CONTAINER_ID};
use crate::components::marker_editor::MarkerEditorPanel;
use crate::components::toast::{error_message, outcome_toast, show_toast, ToastKind, ToastQueue, ToastStack};
use crate::coords;

/// Container size used before the map has been laid out.
const FALLBACK_CONTAINER: (f64, f64) = (1024.0, 768.0);

/// The page's canvas signal, written only between awaits.
struct SignalCanvas(Signal<MapCanvas>);

impl CanvasAccess for SignalCanvas {
    fn update<R>(&mut self, f: impl FnOnce(&mut MapCanvas) -> R) -> R {
        f(&mut self.0.write())
    }
}

/// Replace the marker mirror with a fresh server snapshot.
fn spawn_reload(canvas: Signal<MapCanvas>, service: HttpMarkerService, toasts: Signal<ToastQueue>) {
    spawn(async move {
        if let Err(e) = remote::reload(&mut SignalCanvas(canvas), &service).await {
            tracing::warn!(error = %e, "failed to load markers");
            show_toast(toasts, ToastKind::Error, error_message(&e));
        }
    });
}

fn report(toasts: Signal<ToastQueue>, done: Completion) {
    if let Some((kind, message)) = outcome_toast(&done.outcome) {
        show_toast(toasts, kind, message);
    }
    if let Some(e) = done.reload_error {
        show_toast(toasts, ToastKind::Error, error_message(&e));
    }
}

#[component]
pub fn MapPage() -> Element {
    let service = use_hook(HttpMarkerService::from_window);
    let mut canvas = use_signal(MapCanvas::new);
    let toasts = use_signal(ToastQueue::default);

    // Background image metadata; dimensions must be known before the first centering.
    let image_service = service.clone();
    let map_image = use_resource(move || {
        let service = image_service.clone();
        async move {
            let image = match service.fetch_map_image().await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, "map image metadata unavailable, using default size");
                    None
                }
            };
            let size = image.as_ref().map(MapSize::from).unwrap_or_default();
            canvas.write().set_map_size(size);
            image
        }
    });

    let load_service = service.clone();
    use_hook(move || spawn_reload(canvas, load_service, toasts));

    let submit_service = service.clone();
    let on_submit = move |_: ()| {
        let service = submit_service.clone();
        spawn(async move {
            // A validation error is already shown inline on the editor.
            if let Ok(Some(done)) = remote::submit_editor(&mut SignalCanvas(canvas), &service).await {
                report(toasts, done);
            }
        });
    };

    let delete_service = service.clone();
    let on_delete = move |_: ()| {
        let service = delete_service.clone();
        spawn(async move {
            if let Some(done) = remote::delete_from_editor(&mut SignalCanvas(canvas), &service).await {
                report(toasts, done);
            }
        });
    };

    let image_url = match &*map_image.read() {
        Some(Some(image)) => Some(format!("/static/{}", image.file_name)),
        Some(None) => Some("/static/map.png".to_string()),
        None => None,
    };

    let (zoom_percent, marker_count) = {
        let canvas = canvas.read();
        (canvas.viewport().zoom_percent(), canvas.markers().len())
    };
    let container = coords::container_size(MAP_CONTAINER_ID).unwrap_or(FALLBACK_CONTAINER);

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Map" }
            }

            div { class: "map-stage",
                if let Some(url) = image_url {
                    MapView { canvas: canvas, image_url: url }
                } else {
                    div { class: "map-loading", "Loading map..." }
                }

                MarkerEditorPanel {
                    canvas: canvas,
                    container_size: container,
                    on_submit: on_submit,
                    on_delete: on_delete,
                }

                ControlsPanel {
                    zoom_percent: zoom_percent,
                    marker_count: marker_count,
                    on_reset: move |_| {
                        let (w, h) = coords::container_size(MAP_CONTAINER_ID).unwrap_or(FALLBACK_CONTAINER);
                        canvas.write().reset_view(w, h);
                    },
                }

                ToastStack { toasts: toasts }
            }
        }
    }
}
