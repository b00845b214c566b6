mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use egui::Vec2;
use log::{info, warn};

use trailmark::config::AppConfig;
use trailmark::geo::MAX_ZOOM;
use trailmark::{
    Coordinates, FileBasedStorage, FixedPositionGeolocator, ListEntry, TrailmarkError,
    WorkoutStore,
};
use ui::WorkoutLogApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the workout log window
    Run {
        /// Latitude the map opens at
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,

        /// Longitude the map opens at
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,

        #[arg(short, long)]
        zoom: Option<u8>,

        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the stored workouts, oldest first
    List {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Delete every stored workout
    Reset {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn open_storage(
    data_dir: Option<PathBuf>,
    config: &AppConfig,
) -> Result<FileBasedStorage, TrailmarkError> {
    match data_dir.or_else(|| config.data_dir.clone()) {
        Some(dir) => FileBasedStorage::new(dir),
        None => FileBasedStorage::new_default(),
    }
}

fn run(
    position: Option<Coordinates>,
    zoom: Option<u8>,
    data_dir: Option<PathBuf>,
) -> Result<(), TrailmarkError> {
    let mut app_config = AppConfig::from_local_file().unwrap_or_default();
    if position.is_some() && position != app_config.start_position {
        app_config.start_position = position;
        if let Err(e) = app_config.save() {
            warn!("Could not remember start position: {}", e);
        }
    }

    let storage = open_storage(data_dir, &app_config)?;
    info!("Storing workouts in {:?}", storage.storage_path());
    let store = WorkoutStore::open(storage);

    let geolocator = FixedPositionGeolocator::new(position.or(app_config.start_position));
    let zoom = zoom.unwrap_or(app_config.zoom).min(MAX_ZOOM);

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options.viewport.with_inner_size(Vec2::new(
        app_config.window_width,
        app_config.window_height,
    ));

    eframe::run_native(
        "Trailmark",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(WorkoutLogApp::new(
                cc,
                store,
                &geolocator,
                zoom,
            )))
        }),
    )
    .map_err(|e| TrailmarkError::UiError {
        reason: e.to_string(),
    })
}

fn list(data_dir: Option<PathBuf>) -> Result<(), TrailmarkError> {
    let app_config = AppConfig::from_local_file().unwrap_or_default();
    let store = WorkoutStore::open(open_storage(data_dir, &app_config)?);
    if store.is_empty() {
        println!("No workouts logged");
        return Ok(());
    }

    for workout in store.list() {
        println!("{}  {}", workout.id(), ListEntry::from_workout(workout));
    }
    Ok(())
}

fn reset(data_dir: Option<PathBuf>) -> Result<(), TrailmarkError> {
    let app_config = AppConfig::from_local_file().unwrap_or_default();
    let mut store = WorkoutStore::open(open_storage(data_dir, &app_config)?);
    let count = store.len();
    store.clear()?;
    println!("Deleted {} workouts", count);
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    }) {
        warn!("Could not set Ctrl-C handler: {}", e);
    }

    let result = match cli.command {
        Commands::Run {
            lat,
            lng,
            zoom,
            data_dir,
        } => {
            let position = lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng));
            run(position, zoom, data_dir)
        }
        Commands::List { data_dir } => list(data_dir),
        Commands::Reset { data_dir } => reset(data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
