// Core data structures for logged workouts

use std::fmt;

use chrono::{DateTime, Datelike, Local, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::errors::TrailmarkError;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DURATION_ICON: &str = "⏱";
const METRIC_ICON: &str = "⚡️";

/// Latitude/longitude pair in decimal degrees, stored as `[lat, lng]`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude within ±90 and longitude within ±180
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(value: [f64; 2]) -> Self {
        Self {
            lat: value[0],
            lng: value[1],
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.lat, value.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Identifier of a workout, unique within a store and never reused
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct WorkoutId(pub u64);

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[default]
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Lowercase type name, as used in the snapshot and in popup classes
    pub fn name(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Type name with the first letter capitalized
    pub fn title(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        }
    }

    /// Name of the variant-specific input
    pub fn extra_field(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "cadence",
            WorkoutKind::Cycling => "elevation gain",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            WorkoutKind::Running => WorkoutKind::Cycling,
            WorkoutKind::Cycling => WorkoutKind::Running,
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

/// One icon/value/unit line of a rendered workout
#[derive(Clone, Debug, PartialEq)]
pub struct DetailLine {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl DetailLine {
    pub fn new(icon: &'static str, value: String, unit: &'static str) -> Self {
        Self { icon, value, unit }
    }
}

impl fmt::Display for DetailLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.icon, self.value, self.unit)
    }
}

/// Capabilities every workout variant supplies to the shared rendering code
pub trait WorkoutVariant {
    fn kind(&self) -> WorkoutKind;
    /// Icon shown next to the distance and in the map popup
    fn icon(&self) -> &'static str;
    /// Derived metric, one decimal place
    fn metric(&self) -> DetailLine;
    /// Variant-specific input value
    fn detail(&self) -> DetailLine;
    /// The raw variant-specific input, for validation
    fn extra(&self) -> f64;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunningDetails {
    /// Steps per minute
    pub cadence: f64,
    /// Minutes per kilometer
    pub pace: f64,
}

impl RunningDetails {
    fn new(distance: f64, duration: f64, cadence: f64) -> Self {
        Self {
            cadence,
            pace: duration / distance,
        }
    }
}

impl WorkoutVariant for RunningDetails {
    fn kind(&self) -> WorkoutKind {
        WorkoutKind::Running
    }

    fn icon(&self) -> &'static str {
        "🏃‍♂"
    }

    fn metric(&self) -> DetailLine {
        DetailLine::new(METRIC_ICON, format!("{:.1}", self.pace), "min/km")
    }

    fn detail(&self) -> DetailLine {
        DetailLine::new("🦶🏼", self.cadence.to_string(), "spm")
    }

    fn extra(&self) -> f64 {
        self.cadence
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CyclingDetails {
    /// Meters, may be zero or negative
    pub elevation_gain: f64,
    /// Kilometers per hour
    pub speed: f64,
}

impl CyclingDetails {
    fn new(distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self {
            elevation_gain,
            speed: distance / (duration / 60.),
        }
    }
}

impl WorkoutVariant for CyclingDetails {
    fn kind(&self) -> WorkoutKind {
        WorkoutKind::Cycling
    }

    fn icon(&self) -> &'static str {
        "🚴‍♀"
    }

    fn metric(&self) -> DetailLine {
        DetailLine::new(METRIC_ICON, format!("{:.1}", self.speed), "km/h")
    }

    fn detail(&self) -> DetailLine {
        DetailLine::new("⛰", self.elevation_gain.to_string(), "m")
    }

    fn extra(&self) -> f64 {
        self.elevation_gain
    }
}

/// Variant payload, tagged with `"type"` in the snapshot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running(RunningDetails),
    Cycling(CyclingDetails),
}

impl WorkoutDetails {
    pub fn variant(&self) -> &dyn WorkoutVariant {
        match self {
            WorkoutDetails::Running(details) => details as &dyn WorkoutVariant,
            WorkoutDetails::Cycling(details) => details,
        }
    }
}

/// A logged workout. Everything except the interaction counter is fixed at creation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    date: DateTime<Local>,
    coords: Coordinates,
    /// Kilometers
    distance: f64,
    /// Minutes
    duration: f64,
    description: String,
    #[serde(default)]
    clicks: u32,
    #[serde(flatten)]
    details: WorkoutDetails,
}

impl Workout {
    /// Build a running record. Inputs must have passed [`validate_measurements`].
    pub fn running(
        id: WorkoutId,
        date: DateTime<Local>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Self {
        let details = WorkoutDetails::Running(RunningDetails::new(distance, duration, cadence));
        Self::new(id, date, coords, distance, duration, details)
    }

    /// Build a cycling record. Inputs must have passed [`validate_measurements`].
    pub fn cycling(
        id: WorkoutId,
        date: DateTime<Local>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        let details =
            WorkoutDetails::Cycling(CyclingDetails::new(distance, duration, elevation_gain));
        Self::new(id, date, coords, distance, duration, details)
    }

    /// Build a record of the given kind from the variant-specific input
    pub fn of_kind(
        kind: WorkoutKind,
        id: WorkoutId,
        date: DateTime<Local>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        extra: f64,
    ) -> Self {
        match kind {
            WorkoutKind::Running => Self::running(id, date, coords, distance, duration, extra),
            WorkoutKind::Cycling => Self::cycling(id, date, coords, distance, duration, extra),
        }
    }

    fn new(
        id: WorkoutId,
        date: DateTime<Local>,
        coords: Coordinates,
        distance: f64,
        duration: f64,
        details: WorkoutDetails,
    ) -> Self {
        let description = month_day_description(details.variant().kind(), &date);
        Self {
            id,
            date,
            coords,
            distance,
            duration,
            description,
            clicks: 0,
            details,
        }
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn date(&self) -> &DateTime<Local> {
        &self.date
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of times the record was selected in the list
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        self.details.variant().kind()
    }

    pub fn variant(&self) -> &dyn WorkoutVariant {
        self.details.variant()
    }

    /// Minutes per kilometer, running only
    pub fn pace(&self) -> Option<f64> {
        match &self.details {
            WorkoutDetails::Running(details) => Some(details.pace),
            WorkoutDetails::Cycling(_) => None,
        }
    }

    /// Kilometers per hour, cycling only
    pub fn speed(&self) -> Option<f64> {
        match &self.details {
            WorkoutDetails::Running(_) => None,
            WorkoutDetails::Cycling(details) => Some(details.speed),
        }
    }

    pub fn distance_line(&self) -> DetailLine {
        DetailLine::new(self.variant().icon(), self.distance.to_string(), "km")
    }

    pub fn duration_line(&self) -> DetailLine {
        DetailLine::new(DURATION_ICON, self.duration.to_string(), "min")
    }

    pub(crate) fn record_click(&mut self) -> u32 {
        self.clicks = self.clicks.saturating_add(1);
        self.clicks
    }

    /// Re-check a record that did not come from a validated form: measurements and
    /// position must be usable, and the derived metric and description must be the
    /// ones its own fields produce.
    pub(crate) fn validate(&self) -> Result<(), TrailmarkError> {
        let kind = self.kind();
        validate_measurements(kind, self.distance, self.duration, self.variant().extra())?;
        validate_coordinates(self.coords)?;

        let rebuilt = Workout::of_kind(
            kind,
            self.id,
            self.date,
            self.coords,
            self.distance,
            self.duration,
            self.variant().extra(),
        );
        if rebuilt.details != self.details {
            let metric = match kind {
                WorkoutKind::Running => "pace",
                WorkoutKind::Cycling => "speed",
            };
            return Err(TrailmarkError::invalid_input(
                metric,
                "does not match distance and duration",
            ));
        }

        // The local calendar day can shift by one when the timezone changed since creation
        let described_day = [-1, 0, 1].into_iter().any(|days| {
            month_day_description(kind, &(self.date + TimeDelta::days(days))) == self.description
        });
        if !described_day {
            return Err(TrailmarkError::invalid_input(
                "description",
                format!("{:?} does not match the workout type and date", self.description),
            ));
        }

        Ok(())
    }
}

/// Build the `"<Type> on <Month> <day>"` description of a workout
pub fn month_day_description(kind: WorkoutKind, date: &DateTime<Local>) -> String {
    format!(
        "{} on {} {}",
        kind.title(),
        MONTHS[date.month0() as usize],
        date.day()
    )
}

/// Reject positions outside the valid latitude and longitude ranges
pub fn validate_coordinates(coords: Coordinates) -> Result<(), TrailmarkError> {
    if coords.is_valid() {
        Ok(())
    } else {
        Err(TrailmarkError::invalid_input(
            "coordinates",
            format!("{} is outside the map", coords),
        ))
    }
}

/// Check that distance, duration and the variant-specific value are usable.
///
/// All three must be finite, distance and duration strictly positive. Cadence must be
/// strictly positive as well, elevation gain may be zero or negative.
pub fn validate_measurements(
    kind: WorkoutKind,
    distance: f64,
    duration: f64,
    extra: f64,
) -> Result<(), TrailmarkError> {
    for (field, value) in [
        ("distance", distance),
        ("duration", duration),
        (kind.extra_field(), extra),
    ] {
        if !value.is_finite() {
            return Err(TrailmarkError::invalid_input(
                field,
                "must be a finite number",
            ));
        }
    }

    if distance <= 0. {
        return Err(TrailmarkError::invalid_input(
            "distance",
            "must be greater than zero",
        ));
    }
    if duration <= 0. {
        return Err(TrailmarkError::invalid_input(
            "duration",
            "must be greater than zero",
        ));
    }
    if kind == WorkoutKind::Running && extra <= 0. {
        return Err(TrailmarkError::invalid_input(
            kind.extra_field(),
            "must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn april_14() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 4, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_running_workout_creation() {
        let workout = Workout::running(
            WorkoutId(1),
            april_14(),
            Coordinates::new(51.5, -0.1),
            5.,
            25.,
            180.,
        );

        assert_eq!(workout.kind(), WorkoutKind::Running);
        assert_eq!(workout.pace(), Some(5.0));
        assert_eq!(workout.speed(), None);
        assert_eq!(workout.description(), "Running on April 14");
        assert_eq!(workout.clicks(), 0);
    }

    #[test]
    fn test_cycling_workout_creation() {
        let workout = Workout::cycling(
            WorkoutId(2),
            april_14(),
            Coordinates::new(51.5, -0.1),
            20.,
            60.,
            150.,
        );

        assert_eq!(workout.kind(), WorkoutKind::Cycling);
        assert_eq!(workout.speed(), Some(20.0));
        assert_eq!(workout.pace(), None);
        assert_eq!(workout.description(), "Cycling on April 14");
    }

    #[test]
    fn test_description_has_no_leading_zero() {
        let date = Local.with_ymd_and_hms(2026, 1, 3, 12, 0, 0).unwrap();
        assert_eq!(
            month_day_description(WorkoutKind::Cycling, &date),
            "Cycling on January 3"
        );
        let date = Local.with_ymd_and_hms(2026, 12, 31, 12, 0, 0).unwrap();
        assert_eq!(
            month_day_description(WorkoutKind::Running, &date),
            "Running on December 31"
        );
    }

    #[test]
    fn test_variant_lines() {
        let running = Workout::running(
            WorkoutId(1),
            april_14(),
            Coordinates::new(0., 0.),
            3.,
            20.,
            172.,
        );
        assert_eq!(running.variant().metric().value, "6.7");
        assert_eq!(running.variant().metric().unit, "min/km");
        assert_eq!(running.variant().detail().value, "172");
        assert_eq!(running.variant().detail().unit, "spm");

        let cycling = Workout::cycling(
            WorkoutId(2),
            april_14(),
            Coordinates::new(0., 0.),
            27.5,
            95.,
            -12.,
        );
        assert_eq!(cycling.variant().metric().value, "17.4");
        assert_eq!(cycling.variant().metric().unit, "km/h");
        assert_eq!(cycling.variant().detail().value, "-12");
        assert_eq!(cycling.distance_line().value, "27.5");
        assert_eq!(cycling.duration_line().unit, "min");
    }

    #[test]
    fn test_validation_rejects_non_finite() {
        let err = validate_measurements(WorkoutKind::Running, f64::NAN, 10., 170.).unwrap_err();
        assert!(matches!(err, TrailmarkError::InvalidInput { ref field, .. } if field == "distance"));

        let err =
            validate_measurements(WorkoutKind::Cycling, 10., 30., f64::INFINITY).unwrap_err();
        assert!(
            matches!(err, TrailmarkError::InvalidInput { ref field, .. } if field == "elevation gain")
        );
    }

    #[test]
    fn test_validation_rejects_non_positive() {
        assert!(validate_measurements(WorkoutKind::Running, 0., 10., 170.).is_err());
        assert!(validate_measurements(WorkoutKind::Running, 5., -1., 170.).is_err());

        let err = validate_measurements(WorkoutKind::Running, 5., 10., 0.).unwrap_err();
        assert!(matches!(err, TrailmarkError::InvalidInput { ref field, .. } if field == "cadence"));
    }

    #[test]
    fn test_validation_allows_flat_or_downhill_rides() {
        assert!(validate_measurements(WorkoutKind::Cycling, 12., 40., 0.).is_ok());
        assert!(validate_measurements(WorkoutKind::Cycling, 12., 40., -250.).is_ok());
    }

    #[test]
    fn test_snapshot_shape() {
        let workout = Workout::cycling(
            WorkoutId(7),
            april_14(),
            Coordinates::new(45.1, 7.6),
            20.,
            60.,
            150.,
        );
        let value = serde_json::to_value(&workout).unwrap();

        assert_eq!(value["type"], "cycling");
        assert_eq!(value["coords"], serde_json::json!([45.1, 7.6]));
        assert_eq!(value["elevationGain"], 150.);
        assert_eq!(value["speed"], 20.);
        assert_eq!(value["clicks"], 0);
    }

    #[test]
    fn test_kind_toggle() {
        assert_eq!(WorkoutKind::Running.toggled(), WorkoutKind::Cycling);
        assert_eq!(WorkoutKind::Cycling.toggled(), WorkoutKind::Running);
        assert_eq!(WorkoutKind::default(), WorkoutKind::Running);
    }

    #[test]
    fn test_validate_rejects_tampered_metric() {
        let workout = Workout::running(
            WorkoutId(1),
            april_14(),
            Coordinates::new(51.5, -0.1),
            5.,
            25.,
            180.,
        );
        assert!(workout.validate().is_ok());

        let mut value = serde_json::to_value(&workout).unwrap();
        value["pace"] = serde_json::json!(99.0);
        let tampered: Workout = serde_json::from_value(value).unwrap();
        let err = tampered.validate().unwrap_err();
        assert!(matches!(err, TrailmarkError::InvalidInput { ref field, .. } if field == "pace"));
    }

    #[test]
    fn test_validate_rejects_tampered_description() {
        let workout = Workout::cycling(
            WorkoutId(2),
            april_14(),
            Coordinates::new(51.5, -0.1),
            20.,
            60.,
            150.,
        );

        for description in ["Running on April 14", "Cycling on May 2", ""] {
            let mut value = serde_json::to_value(&workout).unwrap();
            value["description"] = serde_json::json!(description);
            let tampered: Workout = serde_json::from_value(value).unwrap();
            assert!(tampered.validate().is_err(), "description {:?}", description);
        }
    }

    #[test]
    fn test_validate_tolerates_day_shift_from_timezone() {
        let workout = Workout::running(
            WorkoutId(3),
            april_14(),
            Coordinates::new(51.5, -0.1),
            5.,
            25.,
            180.,
        );
        let mut value = serde_json::to_value(&workout).unwrap();
        value["description"] = serde_json::json!("Running on April 13");
        let shifted: Workout = serde_json::from_value(value).unwrap();
        assert!(shifted.validate().is_ok());
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates::new(90., -180.).is_valid());
        assert!(Coordinates::new(-33.9, 151.2).is_valid());
        assert!(!Coordinates::new(90.5, 0.).is_valid());
        assert!(!Coordinates::new(0., 180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.).is_valid());
        assert!(validate_coordinates(Coordinates::new(500., 1000.)).is_err());

        let workout = Workout::running(
            WorkoutId(4),
            april_14(),
            Coordinates::new(500., 1000.),
            5.,
            25.,
            180.,
        );
        let err = workout.validate().unwrap_err();
        assert!(
            matches!(err, TrailmarkError::InvalidInput { ref field, .. } if field == "coordinates")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_running_pace_is_duration_over_distance(
            distance in 0.01f64..500.0,
            duration in 0.01f64..1440.0,
            cadence in 1.0f64..260.0,
        ) {
            prop_assert!(validate_measurements(WorkoutKind::Running, distance, duration, cadence).is_ok());
            let workout = Workout::running(
                WorkoutId(1),
                Local::now(),
                Coordinates::new(51.5, -0.1),
                distance,
                duration,
                cadence,
            );
            prop_assert_eq!(workout.pace(), Some(duration / distance));
            prop_assert!(workout.description().contains("Running"));
        }

        #[test]
        fn prop_cycling_speed_ignores_elevation_sign(
            distance in 0.01f64..500.0,
            duration in 0.01f64..1440.0,
            elevation_gain in -3000.0f64..3000.0,
        ) {
            prop_assert!(validate_measurements(WorkoutKind::Cycling, distance, duration, elevation_gain).is_ok());
            let workout = Workout::cycling(
                WorkoutId(1),
                Local::now(),
                Coordinates::new(51.5, -0.1),
                distance,
                duration,
                elevation_gain,
            );
            prop_assert_eq!(workout.speed(), Some(distance / (duration / 60.)));
        }
    }
}
