// Ordered workout collection with snapshot persistence

use std::collections::HashSet;

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};

use crate::errors::TrailmarkError;
use crate::storage::KeyValueStorage;
use crate::workout::{
    Coordinates, Workout, WorkoutId, WorkoutKind, validate_coordinates, validate_measurements,
};

/// Key the whole workout sequence is stored under
pub const STORAGE_KEY: &str = "workouts";

/// Issues millisecond-timestamp ids, bumped past the last issued one so two workouts
/// created within the same millisecond never share an id.
#[derive(Debug, Default)]
struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    fn next(&mut self, now: &DateTime<Local>) -> WorkoutId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        WorkoutId(id)
    }

    fn observe(&mut self, id: WorkoutId) {
        self.last = self.last.max(id.0);
    }
}

/// `WorkoutStore` owns the session's workouts in insertion order (oldest first) and
/// mirrors every mutation to its [`KeyValueStorage`] as a full snapshot.
///
/// A failed snapshot write never undoes the in-memory change: the error is logged and
/// kept until [`WorkoutStore::take_persist_error`] collects it.
pub struct WorkoutStore<S: KeyValueStorage> {
    storage: S,
    workouts: Vec<Workout>,
    ids: IdGenerator,
    persist_error: Option<TrailmarkError>,
}

impl<S: KeyValueStorage> WorkoutStore<S> {
    /// Create an empty store. Nothing is read from `storage` until [`WorkoutStore::restore`].
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            workouts: Vec::new(),
            ids: IdGenerator::default(),
            persist_error: None,
        }
    }

    /// Create a store and restore whatever snapshot `storage` holds
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.restore();
        store
    }

    /// Validate the measurements, then build, append and persist a new workout.
    ///
    /// `extra` is the cadence for running and the elevation gain for cycling.
    pub fn create(
        &mut self,
        kind: WorkoutKind,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        extra: f64,
    ) -> Result<Workout, TrailmarkError> {
        validate_measurements(kind, distance, duration, extra)?;
        validate_coordinates(coords)?;

        let date = Local::now();
        let id = self.ids.next(&date);
        let workout = Workout::of_kind(kind, id, date, coords, distance, duration, extra);
        info!("Created workout {}: {}", id, workout.description());

        self.workouts.push(workout.clone());
        self.persist_or_keep_error();
        Ok(workout)
    }

    /// All workouts, oldest first
    pub fn list(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn find_by_id(&self, id: WorkoutId) -> Result<&Workout, TrailmarkError> {
        self.workouts
            .iter()
            .find(|w| w.id() == id)
            .ok_or(TrailmarkError::NotFound { id })
    }

    /// Count one more selection of the workout and persist the new count.
    /// Returns the updated count.
    pub fn record_interaction(&mut self, id: WorkoutId) -> Result<u32, TrailmarkError> {
        let workout = self
            .workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or(TrailmarkError::NotFound { id })?;
        let clicks = workout.record_click();
        debug!("Workout {} selected {} times", id, clicks);

        self.persist_or_keep_error();
        Ok(clicks)
    }

    /// Write the full sequence under [`STORAGE_KEY`], replacing the previous snapshot
    pub fn persist(&mut self) -> Result<(), TrailmarkError> {
        let snapshot = to_snapshot(&self.workouts)?;
        self.storage.set_item(STORAGE_KEY, &snapshot)
    }

    /// Replace the in-memory sequence with the stored snapshot and return the number of
    /// restored workouts. Absent or malformed data leaves the store as it was.
    pub fn restore(&mut self) -> usize {
        let snapshot = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("No stored workouts found");
                return 0;
            }
            Err(e) => {
                warn!("Could not read stored workouts, starting empty: {}", e);
                return 0;
            }
        };

        match from_snapshot(&snapshot) {
            Ok(workouts) => {
                for workout in &workouts {
                    self.ids.observe(workout.id());
                }
                self.workouts = workouts;
                info!("Restored {} workouts", self.workouts.len());
                self.workouts.len()
            }
            Err(e) => {
                warn!("Ignoring stored workouts: {}", e);
                0
            }
        }
    }

    /// Drop the persisted snapshot, then every workout. If the snapshot cannot be
    /// removed the workouts stay in place.
    pub fn clear(&mut self) -> Result<(), TrailmarkError> {
        info!("Clearing {} workouts", self.workouts.len());
        self.storage.remove_item(STORAGE_KEY)?;
        self.workouts.clear();
        Ok(())
    }

    /// Take the last snapshot write failure, if any
    pub fn take_persist_error(&mut self) -> Option<TrailmarkError> {
        self.persist_error.take()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist_or_keep_error(&mut self) {
        if let Err(e) = self.persist() {
            error!("Error while saving workouts: {}", e);
            self.persist_error = Some(e);
        }
    }
}

/// Serialize workouts, in order, as one JSON array
pub fn to_snapshot(workouts: &[Workout]) -> Result<String, TrailmarkError> {
    serde_json::to_string(workouts).map_err(|e| TrailmarkError::StorageSerializeError { source: e })
}

/// Parse a snapshot produced by [`to_snapshot`], rejecting duplicated ids and records a
/// validated form could never have produced: unusable measurements or position, or a
/// derived metric or description that does not follow from the record's own fields.
pub fn from_snapshot(snapshot: &str) -> Result<Vec<Workout>, TrailmarkError> {
    let workouts: Vec<Workout> =
        serde_json::from_str(snapshot).map_err(|e| TrailmarkError::MalformedPersistedData {
            reason: format!("Failed to parse JSON: {}", e),
        })?;

    let mut seen = HashSet::new();
    for workout in &workouts {
        if !seen.insert(workout.id()) {
            return Err(TrailmarkError::MalformedPersistedData {
                reason: format!("Duplicate workout id {}", workout.id()),
            });
        }
        workout
            .validate()
            .map_err(|e| TrailmarkError::MalformedPersistedData {
                reason: format!("Workout {}: {}", workout.id(), e),
            })?;
    }

    Ok(workouts)
}
