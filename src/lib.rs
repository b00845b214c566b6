// Library interface for trailmark
// The desktop binary and the integration tests both build on these modules

pub mod config;
pub mod errors;
pub mod form;
pub mod geo;
pub mod storage;
pub mod store;
pub mod view;
pub mod workout;

// Re-export commonly used types
pub use errors::TrailmarkError;
pub use form::{ExtraField, FormController, FormState};
pub use geo::{FixedPositionGeolocator, Geolocator, MapSurface, MapView, Marker};
pub use storage::{FileBasedStorage, KeyValueStorage, MemoryStorage};
pub use store::{STORAGE_KEY, WorkoutStore};
pub use view::{ListEntry, ViewSynchronizer};
pub use workout::{Coordinates, Workout, WorkoutId, WorkoutKind};
