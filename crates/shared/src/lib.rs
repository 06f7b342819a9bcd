pub mod canvas;
pub mod editor;
pub mod error;
pub mod hit_test;
pub mod input;
pub mod interaction;
pub mod models;
pub mod remote;
pub mod store;
pub mod viewport;

pub use canvas::{MapCanvas, RequestOutcome};
pub use error::{MapError, ValidationError};
pub use models::{MapPoint, Marker, MarkerId, MarkerInput, MarkerType, ScreenPoint};
