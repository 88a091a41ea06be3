//! Rocket launch visualization dashboard.
//!
//! Renders a rotating Earth with ambient satellites and debris, sends
//! launch parameters to a remote simulation backend, and plays the
//! returned trajectory back with telemetry charts alongside.

mod app;
mod charts;
mod config;
mod drawing;
mod earth;
mod math;
mod playback;
mod scene;
mod sim;
mod trajectory;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Launch Viz"),
        ..Default::default()
    };
    eframe::run_native(
        "Launch Viz",
        options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc)))),
    )
}
