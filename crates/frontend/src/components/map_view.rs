use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use hunterdash_shared::canvas::MapCanvas;
use hunterdash_shared::input::{PointerButton, PointerEvent};
use hunterdash_shared::models::{Marker, ScreenPoint};
use hunterdash_shared::viewport::{MapSize, Viewport};

use crate::coords;

pub const MAP_CONTAINER_ID: &str = "hunterdash-map-container";

const MARKER_RADIUS: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 14.0;

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn pointer_button(button: Option<MouseButton>) -> PointerButton {
    match button {
        Some(MouseButton::Primary) => PointerButton::Primary,
        Some(MouseButton::Secondary) => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

fn event_point(evt: &Event<MouseData>) -> Option<ScreenPoint> {
    let client = evt.client_coordinates();
    coords::event_to_container(client.x, client.y, MAP_CONTAINER_ID)
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn build_marker(svg: &mut String, marker: &Marker) {
    let (x, y) = (marker.position.x, marker.position.y);
    let r = MARKER_RADIUS;
    let fill = marker.marker_type.color();
    let label_color = marker.label_color();
    let name = escape_xml(&marker.name);
    let type_label = marker.marker_type.label();
    let ty = y - r - 6.0;
    let fs = LABEL_FONT_SIZE;
    svg.push_str(&format!(
        r##"<g role="img"><title>{name} ({type_label})</title>"##
    ));
    svg.push_str(&format!(
        r##"<circle cx="{x}" cy="{y}" r="{r}" fill="{fill}" stroke="white" stroke-width="2"/>"##
    ));
    svg.push_str(&format!(
        r##"<text x="{x}" y="{ty}" fill="{label_color}" font-size="{fs}" font-family="sans-serif" font-weight="700" text-anchor="middle" stroke="rgba(0,0,0,0.7)" stroke-width="3" paint-order="stroke">{name}</text>"##
    ));
    svg.push_str("</g>");
}

/// SVG overlay in map space, sized to the background image.
pub fn build_markers_svg<'a>(markers: impl IntoIterator<Item = &'a Marker>, size: MapSize) -> String {
    let mut content = String::with_capacity(4096);
    for marker in markers {
        build_marker(&mut content, marker);
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="position:absolute;top:0;left:0;overflow:visible;pointer-events:none;">{content}</svg>"#,
        w = size.width,
        h = size.height,
    )
}

pub fn transform_style(viewport: &Viewport) -> String {
    let offset = viewport.offset();
    let scale = viewport.scale();
    format!(
        "transform: translate({}px, {}px) scale({}); transform-origin: 0 0;",
        offset.x, offset.y, scale
    )
}

#[component]
pub fn MapView(canvas: Signal<MapCanvas>, image_url: String) -> Element {
    // Pan and zoom leave the string unchanged, so the overlay is not re-rendered.
    let svg_html = use_memo(move || {
        let canvas = canvas.read();
        build_markers_svg(canvas.markers(), canvas.map_size())
    });

    let (style, size, container_class) = {
        let canvas = canvas.read();
        let class = if canvas.controller().is_panning() {
            "map-container dragging"
        } else {
            "map-container"
        };
        (transform_style(canvas.viewport()), canvas.map_size(), class)
    };
    let (img_w, img_h) = (size.width, size.height);

    let mut dispatch = move |event: PointerEvent| {
        canvas.write().handle_pointer(event);
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                if let Some((w, h)) = coords::container_size(MAP_CONTAINER_ID) {
                    canvas.write().mount(w, h);
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let client = evt.data().client_coordinates();
                let Some(position) =
                    coords::event_to_container(client.x, client.y, MAP_CONTAINER_ID)
                else {
                    return;
                };
                let delta_y = wheel_delta_y(evt.data().delta());
                dispatch(PointerEvent::Wheel { position, delta_y });
            },

            onmousedown: move |evt: Event<MouseData>| {
                let Some(position) = event_point(&evt) else { return };
                let button = pointer_button(evt.trigger_button());
                dispatch(PointerEvent::Press { button, position });
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !canvas.read().controller().is_panning() {
                    return;
                }
                let Some(position) = event_point(&evt) else { return };
                dispatch(PointerEvent::Move { position });
            },

            onmouseup: move |evt: Event<MouseData>| {
                let Some(position) = event_point(&evt) else { return };
                let button = pointer_button(evt.trigger_button());
                dispatch(PointerEvent::Release { button, position });
            },

            onmouseleave: move |_| {
                dispatch(PointerEvent::Leave);
            },

            oncontextmenu: move |evt: Event<MouseData>| {
                evt.prevent_default();
                let Some(position) = event_point(&evt) else { return };
                dispatch(PointerEvent::ContextTrigger { position });
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                if let Some((w, h)) = coords::container_size(MAP_CONTAINER_ID) {
                    canvas.write().reset_view(w, h);
                }
            },

            // CSS transform applies zoom/pan to map + overlay together
            div {
                class: "map-inner",
                style: "{style}",

                img {
                    src: "{image_url}",
                    draggable: "false",
                    style: "width:{img_w}px;height:{img_h}px;",
                }

                div {
                    dangerous_inner_html: "{svg_html}",
                    style: "position:absolute;top:0;left:0;pointer-events:none;",
                }
            }
        }
    }
}
