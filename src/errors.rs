// Error types for trailmark

use snafu::Snafu;
use std::io;

use crate::workout::WorkoutId;

#[derive(Debug, Snafu)]
pub enum TrailmarkError {
    // User input validation errors
    #[snafu(display("Invalid input for {field}: {reason}"))]
    InvalidInput { field: String, reason: String },
    #[snafu(display("Place a pin on the map before submitting a workout"))]
    NoPendingPin,

    // Record lookup errors
    #[snafu(display("No workout with id {id}"))]
    NotFound { id: WorkoutId },

    // Geolocation errors
    #[snafu(display("Could not get the current position: {reason}"))]
    GeolocationUnavailable { reason: String },

    // Persistence errors
    #[snafu(display("Persisted workout data is malformed: {reason}"))]
    MalformedPersistedData { reason: String },
    #[snafu(display("Could not find application data directory to store workouts"))]
    NoDataDir,
    #[snafu(display("Error accessing workout storage"))]
    StorageIOError { source: io::Error },
    #[snafu(display("Error serializing workouts"))]
    StorageSerializeError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application config directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // UI errors
    #[snafu(display("Could not start the workout log window: {reason}"))]
    UiError { reason: String },
}

impl TrailmarkError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        TrailmarkError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
