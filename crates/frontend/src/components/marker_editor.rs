use dioxus::prelude::*;
use hunterdash_shared::canvas::MapCanvas;
use hunterdash_shared::error::MapError;
use hunterdash_shared::models::{MarkerType, ScreenPoint};

use super::toast::error_message;

pub const PANEL_WIDTH: f64 = 300.0;
pub const PANEL_HEIGHT: f64 = 400.0;

/// Gap between the trigger point and the panel.
const PANEL_GAP: f64 = 12.0;

/// Top-left corner for the editor panel: beside the trigger point, flipped
/// to the other side when it would overflow, and kept inside the container.
pub fn editor_panel_position(anchor: ScreenPoint, container_w: f64, container_h: f64) -> ScreenPoint {
    let place = |a: f64, extent: f64, size: f64| {
        let after = a + PANEL_GAP;
        let preferred = if after + size > extent {
            a - PANEL_GAP - size
        } else {
            after
        };
        preferred.min(extent - size).max(0.0)
    };
    ScreenPoint::new(
        place(anchor.x, container_w, PANEL_WIDTH),
        place(anchor.y, container_h, PANEL_HEIGHT),
    )
}

#[component]
pub fn MarkerEditorPanel(
    canvas: Signal<MapCanvas>,
    container_size: (f64, f64),
    on_submit: EventHandler<()>,
    on_delete: EventHandler<()>,
) -> Element {
    let snapshot = {
        let canvas = canvas.read();
        canvas.editor().map(|editor| {
            let anchor = canvas.viewport().map_to_screen(editor.position());
            (editor.clone(), anchor)
        })
    };
    let Some((editor, anchor)) = snapshot else {
        return rsx! {};
    };

    let corner = editor_panel_position(anchor, container_size.0, container_size.1);
    let panel_style = format!(
        "left:{}px;top:{}px;width:{}px;max-height:{}px;",
        corner.x, corner.y, PANEL_WIDTH, PANEL_HEIGHT
    );
    let position = editor.position();
    let coords_text = format!("{:.0}, {:.0}", position.x, position.y);
    let error_text = editor.error().map(|e| match e {
        MapError::Validation(v) => v.to_string(),
        other => error_message(other),
    });
    let permission_denied = matches!(editor.error(), Some(MapError::Permission(_)));
    let submitting = editor.is_submitting();
    let can_submit = editor.can_submit();
    let can_delete = editor.can_delete();
    let is_create = editor.is_create();
    let current_type = editor.marker_type().to_string();
    let title = editor.title();
    let name = editor.name().to_string();
    let is_friendly = editor.is_friendly();

    rsx! {
        div {
            class: "marker-editor",
            style: "{panel_style}",
            onkeydown: move |evt: Event<KeyboardData>| {
                if evt.key() == Key::Escape {
                    canvas.write().dismiss_editor();
                }
            },

            h3 { "{title}" }
            div { class: "marker-editor-coords", "Map position: {coords_text}" }

            form {
                onsubmit: move |evt: Event<FormData>| {
                    evt.prevent_default();
                    on_submit.call(());
                },

                label { r#for: "marker-name", "Name" }
                input {
                    id: "marker-name",
                    r#type: "text",
                    placeholder: "Marker name...",
                    autofocus: true,
                    value: "{name}",
                    disabled: submitting,
                    oninput: move |evt: Event<FormData>| {
                        if let Some(editor) = canvas.write().editor_mut() {
                            editor.set_name(evt.value());
                        }
                    },
                }

                label { r#for: "marker-type", "Type" }
                select {
                    id: "marker-type",
                    value: "{current_type}",
                    disabled: submitting,
                    onchange: move |evt: Event<FormData>| {
                        if let Some(editor) = canvas.write().editor_mut() {
                            editor.set_marker_type(evt.value());
                        }
                    },
                    for t in MarkerType::ALL {
                        option {
                            value: t.as_str(),
                            selected: current_type == t.as_str(),
                            {t.label()}
                        }
                    }
                }

                label { class: "checkbox",
                    input {
                        r#type: "checkbox",
                        checked: is_friendly,
                        disabled: submitting,
                        onchange: move |evt: Event<FormData>| {
                            if let Some(editor) = canvas.write().editor_mut() {
                                editor.set_friendly(evt.checked());
                            }
                        },
                    }
                    "Friendly"
                }

                if let Some(text) = error_text {
                    div {
                        class: if permission_denied { "marker-editor-error permission" } else { "marker-editor-error" },
                        role: "alert",
                        "{text}"
                    }
                }

                div { class: "marker-editor-actions",
                    button {
                        r#type: "submit",
                        disabled: !can_submit,
                        if submitting { "Saving..." } else if is_create { "Create" } else { "Save" }
                    }
                    if !is_create {
                        button {
                            r#type: "button",
                            class: "danger",
                            disabled: !can_delete,
                            onclick: move |_| on_delete.call(()),
                            "Delete"
                        }
                    }
                    button {
                        r#type: "button",
                        class: "secondary",
                        onclick: move |_| {
                            canvas.write().dismiss_editor();
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}
