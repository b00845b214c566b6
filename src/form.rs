// Workout input form: pin placement, raw input parsing and submission

use log::{debug, warn};

use crate::errors::TrailmarkError;
use crate::storage::KeyValueStorage;
use crate::store::WorkoutStore;
use crate::workout::{Coordinates, Workout, WorkoutKind, validate_coordinates};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormState {
    /// Form hidden
    Idle,
    /// Form visible, bound to the coordinate of the last pin placed on the map
    Composing { pending: Coordinates },
}

/// Which of the two variant-specific inputs is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtraField {
    Cadence,
    Elevation,
}

impl ExtraField {
    pub fn for_kind(kind: WorkoutKind) -> Self {
        match kind {
            WorkoutKind::Running => ExtraField::Cadence,
            WorkoutKind::Cycling => ExtraField::Elevation,
        }
    }
}

/// Raw text of the form inputs, exactly as typed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormInputs {
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl FormInputs {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// `FormController` drives the two-state input form.
///
/// A pin placed on the map opens the form (`Idle` → `Composing`); a successful submit or
/// a cancel closes it again and empties the inputs. A rejected submit keeps the form
/// open with the inputs untouched and an error message to show.
#[derive(Debug)]
pub struct FormController {
    state: FormState,
    kind: WorkoutKind,
    inputs: FormInputs,
    error_message: Option<String>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            state: FormState::Idle,
            kind: WorkoutKind::default(),
            inputs: FormInputs::default(),
            error_message: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, FormState::Composing { .. })
    }

    pub fn pending(&self) -> Option<Coordinates> {
        match self.state {
            FormState::Composing { pending } => Some(pending),
            FormState::Idle => None,
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: WorkoutKind) {
        self.kind = kind;
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub fn visible_extra_field(&self) -> ExtraField {
        ExtraField::for_kind(self.kind)
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut FormInputs {
        &mut self.inputs
    }

    /// Message describing the last rejected submit
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Open the form for `coords`. A second pin while composing moves the pending
    /// coordinate. Positions off the map are refused and leave the state unchanged.
    pub fn place_pin(&mut self, coords: Coordinates) -> Result<(), TrailmarkError> {
        validate_coordinates(coords)?;
        debug!("Pin placed at {}", coords);
        self.state = FormState::Composing { pending: coords };
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    /// Parse the inputs and create the workout at the pending coordinate.
    pub fn submit<S: KeyValueStorage>(
        &mut self,
        store: &mut WorkoutStore<S>,
    ) -> Result<Workout, TrailmarkError> {
        let FormState::Composing { pending } = self.state else {
            return Err(TrailmarkError::NoPendingPin);
        };

        let distance = parse_numeric(&self.inputs.distance);
        let duration = parse_numeric(&self.inputs.duration);
        let extra = match self.visible_extra_field() {
            ExtraField::Cadence => parse_numeric(&self.inputs.cadence),
            ExtraField::Elevation => parse_numeric(&self.inputs.elevation),
        };

        match store.create(self.kind, pending, distance, duration, extra) {
            Ok(workout) => {
                self.close();
                Ok(workout)
            }
            Err(e) => {
                warn!("Rejected workout input: {}", e);
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        self.state = FormState::Idle;
        self.inputs.clear();
        self.error_message = None;
    }
}

/// Convert raw input to a number. Blank input reads as zero and anything unparseable
/// becomes NaN, so validation reports it as non-finite.
pub fn parse_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::STORAGE_KEY;

    fn composing_form(distance: &str, duration: &str, cadence: &str) -> FormController {
        let mut form = FormController::new();
        form.place_pin(Coordinates::new(51.5, -0.1)).unwrap();
        form.inputs_mut().distance = distance.to_string();
        form.inputs_mut().duration = duration.to_string();
        form.inputs_mut().cadence = cadence.to_string();
        form
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("5"), 5.);
        assert_eq!(parse_numeric(" 12.5 "), 12.5);
        assert_eq!(parse_numeric(""), 0.);
        assert_eq!(parse_numeric("-40"), -40.);
        assert!(parse_numeric("abc").is_nan());
        assert!(parse_numeric("5km").is_nan());
    }

    #[test]
    fn test_pin_placement_opens_form() {
        let mut form = FormController::new();
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.pending(), None);

        form.place_pin(Coordinates::new(1., 2.)).unwrap();
        assert_eq!(
            form.state(),
            FormState::Composing {
                pending: Coordinates::new(1., 2.)
            }
        );

        form.place_pin(Coordinates::new(3., 4.)).unwrap();
        assert_eq!(form.pending(), Some(Coordinates::new(3., 4.)));
    }

    #[test]
    fn test_pin_outside_map_is_refused() {
        let mut form = FormController::new();
        assert!(form.place_pin(Coordinates::new(91., 0.)).is_err());
        assert!(form.place_pin(Coordinates::new(0., -180.5)).is_err());
        assert_eq!(form.state(), FormState::Idle);

        form.place_pin(Coordinates::new(1., 2.)).unwrap();
        assert!(form.place_pin(Coordinates::new(500., 1000.)).is_err());
        assert_eq!(form.pending(), Some(Coordinates::new(1., 2.)));
    }

    #[test]
    fn test_toggle_switches_visible_field_only() {
        let mut form = composing_form("5", "25", "180");
        assert_eq!(form.visible_extra_field(), ExtraField::Cadence);

        form.toggle_kind();
        assert_eq!(form.kind(), WorkoutKind::Cycling);
        assert_eq!(form.visible_extra_field(), ExtraField::Elevation);
        assert!(form.is_composing());
        assert_eq!(form.inputs().cadence, "180");

        form.set_kind(WorkoutKind::Running);
        assert_eq!(form.visible_extra_field(), ExtraField::Cadence);
    }

    #[test]
    fn test_valid_submit_creates_workout_and_closes_form() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let mut form = composing_form("5", "25", "180");

        let workout = form.submit(&mut store).unwrap();
        assert_eq!(workout.distance(), 5.);
        assert_eq!(workout.duration(), 25.);
        assert_eq!(workout.pace(), Some(5.));
        assert_eq!(workout.coords(), Coordinates::new(51.5, -0.1));

        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.inputs(), &FormInputs::default());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cycling_submit_reads_elevation() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let mut form = composing_form("20", "60", "");
        form.set_kind(WorkoutKind::Cycling);
        form.inputs_mut().elevation = "-35".to_string();

        let workout = form.submit(&mut store).unwrap();
        assert_eq!(workout.kind(), WorkoutKind::Cycling);
        assert_eq!(workout.speed(), Some(20.));
        assert_eq!(workout.variant().extra(), -35.);
    }

    #[test]
    fn test_non_numeric_distance_is_rejected() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let mut form = composing_form("abc", "25", "180");

        let err = form.submit(&mut store).unwrap_err();
        assert!(matches!(err, TrailmarkError::InvalidInput { ref field, .. } if field == "distance"));

        assert!(store.is_empty());
        assert_eq!(store.storage().get_item(STORAGE_KEY).unwrap(), None);
        assert!(form.is_composing());
        assert_eq!(form.inputs().distance, "abc");
        assert!(form.error_message().is_some());
    }

    #[test]
    fn test_missing_cadence_is_rejected() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let mut form = composing_form("5", "25", "");

        assert!(form.submit(&mut store).is_err());
        assert!(store.is_empty());
        assert!(form.is_composing());
    }

    #[test]
    fn test_error_clears_after_successful_submit() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let mut form = composing_form("5", "0", "180");

        assert!(form.submit(&mut store).is_err());
        assert!(form.error_message().unwrap().contains("duration"));

        form.inputs_mut().duration = "25".to_string();
        form.submit(&mut store).unwrap();
        assert!(form.error_message().is_none());
    }

    #[test]
    fn test_submit_without_pin() {
        let mut store = WorkoutStore::new(MemoryStorage::new());
        let mut form = FormController::new();
        form.inputs_mut().distance = "5".to_string();

        assert!(matches!(
            form.submit(&mut store),
            Err(TrailmarkError::NoPendingPin)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_cancel_clears_inputs() {
        let mut form = composing_form("5", "25", "180");
        form.cancel();

        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.inputs(), &FormInputs::default());
    }
}
