// Geolocation and map surface adapters

use log::debug;

use crate::errors::TrailmarkError;
use crate::workout::{Coordinates, WorkoutId, WorkoutKind};

/// Zoom level the map opens at
pub const DEFAULT_ZOOM: u8 = 13;
pub const MAX_ZOOM: u8 = 19;

/// Source of the user's current position
pub trait Geolocator {
    fn current_position(&self) -> Result<Coordinates, TrailmarkError>;
}

/// Geolocator resolving to a position known up front (command line or config file)
#[derive(Debug, Clone, Default)]
pub struct FixedPositionGeolocator {
    position: Option<Coordinates>,
}

impl FixedPositionGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl Geolocator for FixedPositionGeolocator {
    fn current_position(&self) -> Result<Coordinates, TrailmarkError> {
        let position = self
            .position
            .ok_or_else(|| TrailmarkError::GeolocationUnavailable {
                reason: "no start position configured, pass --lat and --lng".to_string(),
            })?;

        if !position.is_valid() {
            return Err(TrailmarkError::GeolocationUnavailable {
                reason: format!("{} is not a valid position", position),
            });
        }

        debug!("Resolved current position to {}", position);
        Ok(position)
    }
}

/// A marker placed on the map for one workout
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: WorkoutId,
    pub kind: WorkoutKind,
    pub coords: Coordinates,
    /// Icon followed by the workout description
    pub popup: String,
}

impl Marker {
    /// Popup style class, `running-popup` or `cycling-popup`
    pub fn class(&self) -> String {
        format!("{}-popup", self.kind.name())
    }
}

/// Operations the view layer needs from a map
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinates, zoom: u8);
    fn zoom(&self) -> u8;
    fn place_marker(&mut self, marker: Marker);
    fn clear_markers(&mut self);
}

/// Map state drawn by the UI: center, zoom and the placed markers
#[derive(Clone, Debug)]
pub struct MapView {
    center: Option<Coordinates>,
    zoom: u8,
    markers: Vec<Marker>,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MapView {
    pub fn new() -> Self {
        Self {
            center: None,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
        }
    }

    /// `None` until the map was initialized from a position
    pub fn center(&self) -> Option<Coordinates> {
        self.center
    }

    pub fn is_ready(&self) -> bool {
        self.center.is_some()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Degrees of longitude visible at the current zoom, halving with every level
    pub fn visible_span(&self) -> f64 {
        360. / 2f64.powi(i32::from(self.zoom))
    }

    /// South-west and north-east corners of the visible area
    pub fn bounds(&self) -> Option<(Coordinates, Coordinates)> {
        let center = self.center?;
        let half = self.visible_span() / 2.;
        Some((
            Coordinates::new(center.lat - half / 2., center.lng - half),
            Coordinates::new(center.lat + half / 2., center.lng + half),
        ))
    }
}

impl MapSurface for MapView {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom.min(MAX_ZOOM);
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn place_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }
}
