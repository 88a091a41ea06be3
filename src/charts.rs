//! Telemetry charts built from the latest simulation response.

use crate::sim::TrajectoryPoint;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

fn series<F: Fn(&TrajectoryPoint) -> Option<f64>>(
    points: &[TrajectoryPoint],
    f: F,
) -> PlotPoints<'static> {
    points
        .iter()
        .filter_map(|p| f(p).map(|v| [p.time, v]))
        .collect()
}

/// Altitude, speed, and fuel against mission time.
pub fn draw_telemetry(ui: &mut egui::Ui, points: &[TrajectoryPoint], width: f32, height: f32) {
    Plot::new("flight_telemetry")
        .width(width)
        .height(height)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series(points, |p| Some(p.y)))
                    .color(egui::Color32::from_rgb(130, 202, 157))
                    .width(2.0)
                    .name("Altitude (m)"),
            );
            plot_ui.line(
                Line::new(series(points, |p| p.speed))
                    .color(egui::Color32::from_rgb(255, 115, 0))
                    .width(2.0)
                    .name("Speed (m/s)"),
            );
            plot_ui.line(
                Line::new(series(points, |p| p.fuel))
                    .color(egui::Color32::from_rgb(0, 136, 254))
                    .width(2.0)
                    .name("Fuel (%)"),
            );
        });
}

/// Speed against mission time, on its own axis scale.
pub fn draw_velocity(ui: &mut egui::Ui, points: &[TrajectoryPoint], width: f32, height: f32) {
    Plot::new("velocity_profile")
        .width(width)
        .height(height)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series(points, |p| p.speed))
                    .color(egui::Color32::from_rgb(255, 153, 0))
                    .width(2.5)
                    .name("Velocity (m/s)"),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_skips_points_without_telemetry() {
        let points = vec![
            TrajectoryPoint {
                time: 0.0,
                x: 0.0,
                y: 1.0,
                z: 0.0,
                speed: Some(5.0),
                fuel: None,
            },
            TrajectoryPoint {
                time: 1.0,
                x: 0.0,
                y: 2.0,
                z: 0.0,
                speed: None,
                fuel: None,
            },
        ];
        let pts = series(&points, |p| p.speed);
        assert_eq!(pts.points().len(), 1);
        assert_eq!(pts.points()[0].x, 0.0);
        assert_eq!(pts.points()[0].y, 5.0);
    }
}
