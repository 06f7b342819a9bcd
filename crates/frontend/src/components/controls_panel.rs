use dioxus::prelude::*;
use hunterdash_shared::models::{MarkerType, FRIENDLY_LABEL_COLOR, HOSTILE_LABEL_COLOR};

/// Legend rows in display order: (label, swatch color).
pub fn legend_entries() -> Vec<(&'static str, &'static str)> {
    MarkerType::ALL
        .iter()
        .map(|t| (t.label(), t.color()))
        .collect()
}

#[component]
pub fn ControlsPanel(zoom_percent: u32, marker_count: usize, on_reset: EventHandler<()>) -> Element {
    let mut collapsed = use_signal(|| false);

    rsx! {
        div { class: "controls-panel",
            div { class: "controls-header",
                h3 { "Map" }
                span { class: "zoom-readout", "{zoom_percent}%" }
                button {
                    class: "secondary",
                    title: "Reset view",
                    onclick: move |_| on_reset.call(()),
                    "Reset"
                }
                button {
                    class: "secondary",
                    onclick: move |_| {
                        let next = !*collapsed.read();
                        collapsed.set(next);
                    },
                    if *collapsed.read() { "Show" } else { "Hide" }
                }
            }

            if !*collapsed.read() {
                div { class: "shortcut-section",
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Drag" }
                        span { "Pan the map" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Scroll" }
                        span { "Zoom at the cursor" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Right-click" }
                        span { "Add a marker, or edit the one under the cursor" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", "Double-click" }
                        span { "Reset the view" }
                    }
                }

                div { class: "help-divider" }

                div { class: "legend",
                    for (label, color) in legend_entries() {
                        div { class: "legend-row",
                            span { class: "legend-swatch", style: "background:{color};" }
                            span { "{label}" }
                        }
                    }
                    div { class: "legend-row",
                        span { class: "legend-text", style: "color:{FRIENDLY_LABEL_COLOR};", "Name" }
                        span { "Friendly" }
                    }
                    div { class: "legend-row",
                        span { class: "legend-text", style: "color:{HOSTILE_LABEL_COLOR};", "Name" }
                        span { "Hostile" }
                    }
                }

                div { class: "marker-count", "{marker_count} markers" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_covers_every_type() {
        let entries = legend_entries();
        assert_eq!(
            entries,
            vec![
                ("Person", "#3b82f6"),
                ("Building", "#22c55e"),
                ("Buy point", "#eab308"),
                ("Mine", "#f97316"),
            ]
        );
    }
}
