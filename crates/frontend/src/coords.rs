use hunterdash_shared::models::ScreenPoint;

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> ScreenPoint {
    ScreenPoint::new(client_x - rect_left, client_y - rect_top)
}

fn element_rect(container_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    Some(element.get_bounding_client_rect())
}

/// Container-relative position of a mouse event, read from the live layout.
pub fn event_to_container(client_x: f64, client_y: f64, container_id: &str) -> Option<ScreenPoint> {
    let rect = element_rect(container_id)?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// Current width and height of the container.
pub fn container_size(container_id: &str) -> Option<(f64, f64)> {
    let rect = element_rect(container_id)?;
    Some((rect.width(), rect.height()))
}
