pub mod controls_panel;
pub mod map_view;
pub mod marker_editor;
pub mod toast;
