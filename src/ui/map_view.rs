use egui::{Align2, RichText, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};
use itertools::{Either, Itertools};
use log::debug;

use trailmark::{Coordinates, WorkoutKind};

use super::{PALETTE_GREEN, PALETTE_ORANGE, PALETTE_RED, WorkoutLogApp, kind_color};

const MARKER_RADIUS: f32 = 6.;

impl WorkoutLogApp {
    /// Map drawn as a plot in longitude (x) / latitude (y) space
    pub(crate) fn map_view(&mut self, ui: &mut Ui) {
        let Some((south_west, north_east)) = self.map.bounds() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Map unavailable: current position unknown").weak());
            });
            return;
        };

        let (running, cycling): (Vec<_>, Vec<_>) = self
            .map
            .markers()
            .iter()
            .partition_map(|marker| {
                let point = [marker.coords.lng, marker.coords.lat];
                match marker.kind {
                    WorkoutKind::Running => Either::Left(point),
                    WorkoutKind::Cycling => Either::Right(point),
                }
            });
        let popups = self
            .map
            .markers()
            .iter()
            .map(|marker| {
                (
                    marker.class(),
                    marker.coords,
                    RichText::new(&marker.popup).color(kind_color(marker.kind)),
                )
            })
            .collect_vec();
        let pending = self.form.pending();
        let recenter = std::mem::take(&mut self.recenter);

        let plot_response = Plot::new("workout_map")
            .data_aspect(1.)
            .allow_double_click_reset(false)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .show_background(false)
            .show(ui, |plot_ui| {
                if recenter {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [south_west.lng, south_west.lat],
                        [north_east.lng, north_east.lat],
                    ));
                }

                plot_ui.points(
                    Points::new("Running", PlotPoints::new(running))
                        .color(PALETTE_GREEN)
                        .radius(MARKER_RADIUS),
                );
                plot_ui.points(
                    Points::new("Cycling", PlotPoints::new(cycling))
                        .color(PALETTE_ORANGE)
                        .radius(MARKER_RADIUS),
                );
                // Popups of one class share a plot item name
                for (class, coords, popup) in popups {
                    plot_ui.text(
                        Text::new(class, PlotPoint::new(coords.lng, coords.lat), popup)
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
                if let Some(pending) = pending {
                    plot_ui.points(
                        Points::new("Pin", PlotPoints::new(vec![[pending.lng, pending.lat]]))
                            .color(PALETTE_RED)
                            .radius(MARKER_RADIUS),
                    );
                }
            });

        if plot_response.response.clicked()
            && let Some(mouse_pos) = plot_response.response.interact_pointer_pos()
        {
            let point = plot_response.transform.value_from_position(mouse_pos);
            if let Err(e) = self.form.place_pin(Coordinates::new(point.y, point.x)) {
                debug!("Ignoring map click: {}", e);
            }
        }
    }
}
