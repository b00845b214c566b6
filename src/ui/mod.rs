mod form_view;
mod list_view;
mod map_view;

use egui::{Align2, Color32, Visuals, style::Widgets};
use log::{error, info};

use trailmark::{
    Coordinates, FileBasedStorage, FormController, Geolocator, MapSurface, MapView,
    ViewSynchronizer, WorkoutKind, WorkoutStore,
};

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_DARK: Color32 = Color32::from_rgb(42, 49, 55);
pub(crate) const PALETTE_GREEN: Color32 = Color32::from_rgb(57, 181, 74);
pub(crate) const PALETTE_ORANGE: Color32 = Color32::from_rgb(255, 181, 69);
pub(crate) const PALETTE_RED: Color32 = Color32::from_rgb(242, 97, 63);

pub(crate) fn kind_color(kind: WorkoutKind) -> Color32 {
    match kind {
        WorkoutKind::Running => PALETTE_GREEN,
        WorkoutKind::Cycling => PALETTE_ORANGE,
    }
}

/// `WorkoutLogApp` is the desktop surface of the workout log.
///
/// The side panel holds the input form and the workout list, the central panel the
/// map. Clicking the map places a pin and opens the form; clicking a list entry
/// centers the map on that workout.
pub(crate) struct WorkoutLogApp {
    store: WorkoutStore<FileBasedStorage>,
    form: FormController,
    view: ViewSynchronizer,
    map: MapView,
    /// Where the session started, used again after a reset
    home: Option<Coordinates>,
    zoom: u8,
    /// Set when the plot bounds must follow the map center on the next frame
    recenter: bool,
    geolocation_alert: Option<String>,
    status_message: Option<String>,
}

impl WorkoutLogApp {
    pub(crate) fn new(
        cc: &eframe::CreationContext<'_>,
        store: WorkoutStore<FileBasedStorage>,
        geolocator: &impl Geolocator,
        zoom: u8,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            faint_bg_color: PALETTE_DARK,
            panel_fill: PALETTE_BLACK,
            hyperlink_color: PALETTE_GREEN,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);
        Self::with_store(store, geolocator, zoom)
    }

    /// Session state without any window, resolving the position and rendering the
    /// stored workouts
    fn with_store(
        store: WorkoutStore<FileBasedStorage>,
        geolocator: &impl Geolocator,
        zoom: u8,
    ) -> Self {
        let mut map = MapView::new();
        let (home, geolocation_alert) = match geolocator.current_position() {
            Ok(position) => {
                map.set_view(position, zoom);
                (Some(position), None)
            }
            Err(e) => {
                error!("{}", e);
                (None, Some(e.to_string()))
            }
        };

        let mut view = ViewSynchronizer::new();
        view.render_all(store.list(), &mut map);
        info!("Rendered {} stored workouts", view.entries().len());

        Self {
            store,
            form: FormController::new(),
            view,
            map,
            home,
            zoom,
            recenter: true,
            geolocation_alert,
            status_message: None,
        }
    }

    /// Clear the log and start the session over from the home position
    fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            error!("Error while clearing workouts: {}", e);
            self.status_message = Some(e.to_string());
            return;
        }
        self.view.reset(&mut self.map);
        self.form.cancel();
        if let Some(home) = self.home {
            self.map.set_view(home, self.zoom);
            self.recenter = true;
        }
    }

    fn collect_persist_error(&mut self) {
        if let Some(e) = self.store.take_persist_error() {
            self.status_message = Some(format!("Workouts were not saved: {}", e));
        }
    }

    fn geolocation_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.geolocation_alert.clone() else {
            return;
        };

        egui::Window::new("Location unavailable")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0., 0.])
            .show(ctx, |ui| {
                ui.label(message);
                ui.label("Restart with --lat and --lng to enable the map.");
                if ui.button("OK").clicked() {
                    self.geolocation_alert = None;
                }
            });
    }
}

impl eframe::App for WorkoutLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls")
            .min_height(30.)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.heading("Trailmark");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Reset").clicked() {
                            self.reset();
                        }
                        if let Some(message) = &self.status_message {
                            ui.colored_label(PALETTE_RED, message);
                        }
                    });
                });
            });

        egui::SidePanel::left("workouts")
            .resizable(true)
            .default_width(340.)
            .show(ctx, |ui| {
                self.form_view(ui);
                ui.separator();
                self.list_view(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_view(ui);
        });

        self.geolocation_alert(ctx);
        self.collect_persist_error();
    }
}
