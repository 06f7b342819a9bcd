use serde::{Deserialize, Serialize};

/// Label color for friendly markers.
pub const FRIENDLY_LABEL_COLOR: &str = "#f4e8d0";
/// Label color for hostile markers.
pub const HOSTILE_LABEL_COLOR: &str = "#ef4444";

/// A position in map space: native pixels of the background image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        MapPoint { x, y }
    }

    /// Euclidean distance between two map points.
    pub fn distance(self, other: MapPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A position in screen space, relative to the top-left of the canvas container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn delta_from(self, origin: ScreenPoint) -> ScreenDelta {
        ScreenDelta {
            dx: self.x - origin.x,
            dy: self.y - origin.y,
        }
    }
}

/// A displacement in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenDelta {
    pub dx: f64,
    pub dy: f64,
}

impl ScreenDelta {
    pub fn new(dx: f64, dy: f64) -> Self {
        ScreenDelta { dx, dy }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerType {
    Person,
    #[serde(alias = "gebaeude")]
    Building,
    #[serde(alias = "ankauf")]
    BuyPoint,
    #[serde(alias = "abbau")]
    Mine,
}

impl MarkerType {
    /// Every marker type, in legend order.
    pub const ALL: [MarkerType; 4] = [
        MarkerType::Person,
        MarkerType::Building,
        MarkerType::BuyPoint,
        MarkerType::Mine,
    ];

    /// Wire value, also used as the form select value.
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerType::Person => "person",
            MarkerType::Building => "building",
            MarkerType::BuyPoint => "buy-point",
            MarkerType::Mine => "mine",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerType::Person => "Person",
            MarkerType::Building => "Building",
            MarkerType::BuyPoint => "Buy point",
            MarkerType::Mine => "Mine",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MarkerType::Person => "#3b82f6",
            MarkerType::Building => "#22c55e",
            MarkerType::BuyPoint => "#eab308",
            MarkerType::Mine => "#f97316",
        }
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MarkerType {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(MarkerType::Person),
            "building" | "gebaeude" => Ok(MarkerType::Building),
            "buy-point" | "ankauf" => Ok(MarkerType::BuyPoint),
            "mine" | "abbau" => Ok(MarkerType::Mine),
            other => Err(crate::error::ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Opaque marker identifier assigned by the marker service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub String);

impl MarkerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(feature = "uuid-support")]
    pub fn generate() -> Self {
        MarkerId(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerId {
    fn from(s: &str) -> Self {
        MarkerId(s.to_string())
    }
}

/// The writable fields of a marker. Body of `POST /map/markers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerInput {
    pub name: String,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    #[serde(default = "default_friendly")]
    pub is_friendly: bool,
    pub position: MapPoint,
}

fn default_friendly() -> bool {
    true
}

/// A saved marker as returned by the marker service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: MarkerId,
    pub name: String,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    pub is_friendly: bool,
    pub position: MapPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Marker {
    pub fn from_input(id: MarkerId, input: MarkerInput) -> Self {
        Marker {
            id,
            name: input.name,
            marker_type: input.marker_type,
            is_friendly: input.is_friendly,
            position: input.position,
            created_by: None,
            created_at: None,
        }
    }

    /// Overwrite the writable fields, keeping id and provenance.
    pub fn apply(&mut self, input: MarkerInput) {
        self.name = input.name;
        self.marker_type = input.marker_type;
        self.is_friendly = input.is_friendly;
        self.position = input.position;
    }

    pub fn label_color(&self) -> &'static str {
        if self.is_friendly {
            FRIENDLY_LABEL_COLOR
        } else {
            HOSTILE_LABEL_COLOR
        }
    }
}

/// Partial update body accepted by `PUT /map/markers/{id}`.
///
/// Absent fields keep their stored value. Extra fields such as `id` or
/// `createdBy` sent by a full-object update are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub marker_type: Option<MarkerType>,
    pub is_friendly: Option<bool>,
    pub position: Option<MapPoint>,
}

impl MarkerUpdate {
    pub fn apply_to(self, marker: &mut Marker) {
        if let Some(name) = self.name {
            marker.name = name;
        }
        if let Some(marker_type) = self.marker_type {
            marker.marker_type = marker_type;
        }
        if let Some(is_friendly) = self.is_friendly {
            marker.is_friendly = is_friendly;
        }
        if let Some(position) = self.position {
            marker.position = position;
        }
    }
}

/// Metadata of the static background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapImage {
    pub file_name: String,
    pub width: f64,
    pub height: f64,
}

/// Error body returned by the marker service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
