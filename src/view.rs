// Keeps the workout list and the map markers in step with the store

use std::fmt;

use itertools::Itertools;
use log::{debug, warn};

use crate::geo::{MapSurface, Marker};
use crate::storage::KeyValueStorage;
use crate::store::WorkoutStore;
use crate::workout::{Coordinates, DetailLine, Workout, WorkoutId, WorkoutKind};

/// One rendered entry of the workout list
#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
    pub id: WorkoutId,
    pub kind: WorkoutKind,
    pub title: String,
    /// Distance, duration, derived metric and variant detail, in that order
    pub lines: Vec<DetailLine>,
}

impl ListEntry {
    pub fn from_workout(workout: &Workout) -> Self {
        let variant = workout.variant();
        Self {
            id: workout.id(),
            kind: workout.kind(),
            title: workout.description().to_string(),
            lines: vec![
                workout.distance_line(),
                workout.duration_line(),
                variant.metric(),
                variant.detail(),
            ],
        }
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.title, self.lines.iter().join("  "))
    }
}

/// Marker for a workout: icon plus description in a popup styled by workout type
pub fn marker_for(workout: &Workout) -> Marker {
    Marker {
        id: workout.id(),
        kind: workout.kind(),
        coords: workout.coords(),
        popup: format!("{} {}", workout.variant().icon(), workout.description()),
    }
}

/// `ViewSynchronizer` renders workouts into the list and onto a [`MapSurface`].
///
/// Rendering right after a workout is created and rendering a restored snapshot go
/// through the same [`ViewSynchronizer::render`] path, so both produce identical
/// entries and markers. Entries are kept in render order, oldest first.
#[derive(Debug, Default)]
pub struct ViewSynchronizer {
    entries: Vec<ListEntry>,
    selected: Option<WorkoutId>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, workout: &Workout, map: &mut impl MapSurface) {
        debug!("Rendering workout {}", workout.id());
        self.entries.push(ListEntry::from_workout(workout));
        map.place_marker(marker_for(workout));
    }

    /// Render a restored sequence, oldest first
    pub fn render_all(&mut self, workouts: &[Workout], map: &mut impl MapSurface) {
        for workout in workouts {
            self.render(workout, map);
        }
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<WorkoutId> {
        self.selected
    }

    /// Handle a click on a list entry: center the map on the workout and count the
    /// interaction. Unknown ids are ignored.
    pub fn select<S: KeyValueStorage>(
        &mut self,
        id: WorkoutId,
        store: &mut WorkoutStore<S>,
        map: &mut impl MapSurface,
    ) -> Option<Coordinates> {
        let coords = match store.find_by_id(id) {
            Ok(workout) => workout.coords(),
            Err(e) => {
                warn!("Ignoring selection: {}", e);
                return None;
            }
        };

        let zoom = map.zoom();
        map.set_view(coords, zoom);
        if let Err(e) = store.record_interaction(id) {
            warn!("Could not count selection of workout {}: {}", id, e);
        }
        self.selected = Some(id);
        Some(coords)
    }

    /// Drop every entry and marker
    pub fn reset(&mut self, map: &mut impl MapSurface) {
        self.entries.clear();
        self.selected = None;
        map.clear_markers();
    }
}
