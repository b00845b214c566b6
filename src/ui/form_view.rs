use egui::{Key, RichText, TextEdit, Ui};
use log::debug;

use trailmark::{ExtraField, WorkoutKind};

use super::{PALETTE_RED, WorkoutLogApp, kind_color};

const INPUT_WIDTH: f32 = 120.;

impl WorkoutLogApp {
    /// Input form, shown while a pin is pending
    pub(crate) fn form_view(&mut self, ui: &mut Ui) {
        let Some(pending) = self.form.pending() else {
            ui.label(RichText::new("Click on the map to log a workout").italics());
            return;
        };

        ui.label(RichText::new(format!("New workout at {}", pending)).strong());

        let mut kind = self.form.kind();
        let mut fields = Vec::with_capacity(3);
        egui::Grid::new("workout_form")
            .num_columns(2)
            .spacing([12., 6.])
            .show(ui, |ui| {
                ui.label("Type");
                egui::ComboBox::from_id_salt("workout_kind")
                    .selected_text(RichText::new(kind.title()).color(kind_color(kind)))
                    .show_ui(ui, |ui| {
                        for option in [WorkoutKind::Running, WorkoutKind::Cycling] {
                            ui.selectable_value(&mut kind, option, option.title());
                        }
                    });
                ui.end_row();

                let inputs = self.form.inputs_mut();
                ui.label("Distance");
                fields.push(ui.add(
                    TextEdit::singleline(&mut inputs.distance)
                        .hint_text("km")
                        .desired_width(INPUT_WIDTH),
                ));
                ui.end_row();

                ui.label("Duration");
                fields.push(ui.add(
                    TextEdit::singleline(&mut inputs.duration)
                        .hint_text("min")
                        .desired_width(INPUT_WIDTH),
                ));
                ui.end_row();

                match ExtraField::for_kind(kind) {
                    ExtraField::Cadence => {
                        ui.label("Cadence");
                        fields.push(ui.add(
                            TextEdit::singleline(&mut inputs.cadence)
                                .hint_text("step/min")
                                .desired_width(INPUT_WIDTH),
                        ));
                    }
                    ExtraField::Elevation => {
                        ui.label("Elev Gain");
                        fields.push(ui.add(
                            TextEdit::singleline(&mut inputs.elevation)
                                .hint_text("meters")
                                .desired_width(INPUT_WIDTH),
                        ));
                    }
                }
                ui.end_row();
            });
        if kind != self.form.kind() {
            self.form.set_kind(kind);
        }

        if let Some(error) = self.form.error_message() {
            ui.colored_label(PALETTE_RED, error);
        }

        // Enter only submits from a form field, a single-line edit drops focus on Enter
        let enter_pressed = fields.iter().any(|field| field.lost_focus())
            && ui.input(|i| i.key_pressed(Key::Enter));
        ui.horizontal(|ui| {
            if ui.button("OK").clicked() || enter_pressed {
                self.submit_form();
            }
            if ui.button("Cancel").clicked() {
                self.form.cancel();
            }
        });
    }

    fn submit_form(&mut self) {
        match self.form.submit(&mut self.store) {
            Ok(workout) => self.view.render(&workout, &mut self.map),
            Err(e) => debug!("Workout not created: {}", e),
        }
    }
}
