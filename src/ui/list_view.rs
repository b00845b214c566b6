use egui::{CornerRadius, Frame, Margin, RichText, ScrollArea, Sense, Stroke, Ui};

use super::{PALETTE_DARK, WorkoutLogApp, kind_color};

impl WorkoutLogApp {
    /// Logged workouts, newest on top
    pub(crate) fn list_view(&mut self, ui: &mut Ui) {
        if self.view.entries().is_empty() {
            ui.label(RichText::new("No workouts yet").weak());
            return;
        }

        let mut clicked = None;
        ScrollArea::vertical().show(ui, |ui| {
            for entry in self.view.entries().iter().rev() {
                let is_selected = self.view.selected() == Some(entry.id);
                let stroke_width = if is_selected { 2. } else { 1. };
                let response = Frame::new()
                    .fill(PALETTE_DARK)
                    .inner_margin(Margin::same(8))
                    .corner_radius(CornerRadius::same(5))
                    .stroke(Stroke::new(stroke_width, kind_color(entry.kind)))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(&entry.title).strong().size(15.));
                        ui.horizontal_wrapped(|ui| {
                            for line in &entry.lines {
                                ui.label(line.icon);
                                ui.label(RichText::new(&line.value).strong());
                                ui.label(RichText::new(line.unit).weak().small());
                                ui.add_space(6.);
                            }
                        });
                    })
                    .response
                    .interact(Sense::click());
                if response.clicked() {
                    clicked = Some(entry.id);
                }
                ui.add_space(6.);
            }
        });

        if let Some(id) = clicked
            && self.view.select(id, &mut self.store, &mut self.map).is_some()
        {
            self.recenter = true;
        }
    }
}
