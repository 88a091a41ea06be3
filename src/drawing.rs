//! Scene projection and view rendering.
//!
//! Renders the main launch view and the wireframe minimap as egui_plot
//! plots: every scene point goes through the view rotation and an
//! orthographic projection, with points behind the Earth disc dimmed.
//! The main view owns drag-to-rotate and scroll-to-zoom; the minimap
//! sways on its own.

use crate::math::{occluded, project, rotation_from_drag};
use crate::playback::Playback;
use crate::scene::{exhaust_points, SceneState, EARTH_RADIUS, VIEW_MARGIN};
use crate::sim::RiskLevel;
use eframe::egui;
use egui_plot::{Line, Plot, PlotBounds, PlotImage, PlotPoint, PlotPoints, Points};
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

const MINIMAP_MARGIN: f64 = 140.0;

pub const COLOR_TRAJECTORY: egui::Color32 = egui::Color32::from_rgb(255, 255, 0);
pub const COLOR_ROCKET: egui::Color32 = egui::Color32::from_rgb(255, 40, 40);
pub const COLOR_EXHAUST: egui::Color32 = egui::Color32::from_rgb(255, 102, 0);
pub const COLOR_SATELLITE: egui::Color32 = egui::Color32::from_rgb(255, 255, 0);
pub const COLOR_DEBRIS: egui::Color32 = egui::Color32::from_rgb(170, 170, 170);
pub const COLOR_WIREFRAME: egui::Color32 = egui::Color32::from_rgb(0, 170, 255);

pub fn risk_color(risk: RiskLevel) -> egui::Color32 {
    match risk {
        RiskLevel::Safe => egui::Color32::from_rgb(50, 205, 50),
        RiskLevel::Caution => egui::Color32::from_rgb(255, 180, 0),
        RiskLevel::Risky => egui::Color32::from_rgb(255, 60, 60),
    }
}

pub fn dim_color(color: egui::Color32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        (color.r() as f32 * 0.4) as u8,
        (color.g() as f32 * 0.4) as u8,
        (color.b() as f32 * 0.4) as u8,
        200,
    )
}

fn circle_points(radius: f64) -> PlotPoints<'static> {
    (0..=100)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / 100.0;
            [radius * theta.cos(), radius * theta.sin()]
        })
        .collect()
}

/// Splits a projected polyline into occluded and visible runs. Each run
/// after the first starts with the previous run's last point, so every
/// segment is covered even when visibility flips point to point.
fn occlusion_runs(
    points: &[Vector3<f64>],
    rotation: &Matrix3<f64>,
    earth_r: f64,
) -> Vec<(bool, Vec<[f64; 2]>)> {
    let mut runs: Vec<(bool, Vec<[f64; 2]>)> = Vec::new();
    for &p in points {
        let (xy, depth) = project(p, rotation);
        let hidden = occluded(xy, depth, earth_r);
        match runs.last_mut() {
            Some((h, run)) if *h == hidden => run.push(xy),
            Some((_, run)) => {
                let mut next = Vec::new();
                if let Some(&boundary) = run.last() {
                    next.push(boundary);
                }
                next.push(xy);
                runs.push((hidden, next));
            }
            None => runs.push((hidden, vec![xy])),
        }
    }
    runs
}

/// Draws a polyline split into occluded (dimmed) and visible runs.
fn draw_occluded_polyline(
    plot_ui: &mut egui_plot::PlotUi,
    points: &[Vector3<f64>],
    rotation: &Matrix3<f64>,
    color: egui::Color32,
    width: f32,
    earth_r: f64,
) {
    for (hidden, run) in occlusion_runs(points, rotation, earth_r) {
        if run.len() > 1 {
            let c = if hidden { dim_color(color) } else { color };
            plot_ui.line(Line::new(PlotPoints::new(run)).color(c).width(width));
        }
    }
}

/// The main launch view. Returns the updated (rotation, zoom) after
/// applying drag and scroll input.
#[allow(clippy::too_many_arguments)]
pub fn draw_main_view(
    ui: &mut egui::Ui,
    id: &str,
    scene: &SceneState,
    playback: &Playback,
    rocket: Option<Vector3<f64>>,
    debris_markers: &[(Vector3<f64>, RiskLevel)],
    exhaust_visible: bool,
    mut rotation: Matrix3<f64>,
    mut zoom: f64,
    launch_pull: f64,
    earth_texture: Option<&egui::TextureHandle>,
    width: f32,
    height: f32,
) -> (Matrix3<f64>, f64) {
    let margin = (VIEW_MARGIN - launch_pull).max(80.0) / zoom;
    let visual_earth_r = EARTH_RADIUS * 0.95;

    let plot = Plot::new(id)
        .data_aspect(1.0)
        .width(width)
        .height(height)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .cursor_color(egui::Color32::TRANSPARENT);
    let response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([-margin, -margin], [margin, margin]));

        // Starfield, fixed to the view rather than the scene.
        let stars: PlotPoints = scene
            .stars
            .iter()
            .map(|s| [s[0] * VIEW_MARGIN * 4.0, s[1] * VIEW_MARGIN * 4.0])
            .collect();
        plot_ui.points(
            Points::new(stars)
                .color(egui::Color32::from_rgba_unmultiplied(220, 220, 230, 140))
                .radius(1.0),
        );

        // Debris ring, split by occlusion.
        let mut front: Vec<[f64; 2]> = Vec::new();
        let mut behind: Vec<[f64; 2]> = Vec::new();
        for d in &scene.debris {
            let (xy, depth) = project(d.position(), &rotation);
            if occluded(xy, depth, visual_earth_r) {
                behind.push(xy);
            } else {
                front.push(xy);
            }
        }
        plot_ui.points(
            Points::new(PlotPoints::new(behind))
                .color(dim_color(COLOR_DEBRIS))
                .radius(1.8),
        );

        // Earth disc (texture when ready, flat disc as fallback) plus
        // the atmosphere glow ring.
        if let Some(tex) = earth_texture {
            let size = egui::Vec2::splat(EARTH_RADIUS as f32 * 2.0);
            plot_ui.image(PlotImage::new(tex, PlotPoint::new(0.0, 0.0), size));
        } else {
            plot_ui.line(
                Line::new(circle_points(visual_earth_r))
                    .color(egui::Color32::from_rgb(30, 60, 120))
                    .width(2.0),
            );
        }
        plot_ui.line(
            Line::new(circle_points(EARTH_RADIUS * 1.08))
                .color(egui::Color32::from_rgba_unmultiplied(0, 170, 255, 60))
                .width(3.0),
        );

        plot_ui.points(
            Points::new(PlotPoints::new(front))
                .color(COLOR_DEBRIS)
                .radius(1.8),
        );

        // Satellites blink individually.
        for sat in &scene.satellites {
            let (xy, depth) = project(sat.position(), &rotation);
            let hidden = occluded(xy, depth, visual_earth_r);
            let alpha = (90.0 + 165.0 * sat.blink_intensity()) as u8;
            let color = if hidden {
                dim_color(COLOR_SATELLITE)
            } else {
                egui::Color32::from_rgba_unmultiplied(255, 255, 0, alpha)
            };
            plot_ui.points(Points::new(PlotPoints::new(vec![xy])).color(color).radius(3.5).filled(true));
        }

        // Backend-reported debris objects, colored by their risk class.
        for &(pos, risk) in debris_markers {
            let (xy, depth) = project(pos, &rotation);
            let color = if occluded(xy, depth, visual_earth_r) {
                dim_color(risk_color(risk))
            } else {
                risk_color(risk)
            };
            plot_ui.points(
                Points::new(PlotPoints::new(vec![xy]))
                    .color(color)
                    .radius(3.0)
                    .shape(egui_plot::MarkerShape::Diamond),
            );
        }

        // Flight path and the rocket itself.
        let path: Vec<Vector3<f64>> = playback.samples().iter().map(|s| s.position).collect();
        draw_occluded_polyline(plot_ui, &path, &rotation, COLOR_TRAJECTORY, 1.5, visual_earth_r);

        if let Some(pos) = rocket {
            if exhaust_visible {
                let cloud: PlotPoints = exhaust_points(pos, scene.frame)
                    .into_iter()
                    .map(|p| project(p, &rotation).0)
                    .collect();
                plot_ui.points(
                    Points::new(cloud)
                        .color(COLOR_EXHAUST.gamma_multiply(0.8))
                        .radius(1.5),
                );
            }

            let (xy, depth) = project(pos, &rotation);
            let hidden = occluded(xy, depth, visual_earth_r);
            if let Some(heading) = playback.heading() {
                let (tip, _) = project(pos + heading * 8.0, &rotation);
                let color = if hidden { dim_color(COLOR_ROCKET) } else { COLOR_ROCKET };
                plot_ui.line(Line::new(PlotPoints::new(vec![xy, tip])).color(color).width(2.0));
            }
            let color = if hidden { dim_color(COLOR_ROCKET) } else { COLOR_ROCKET };
            plot_ui.points(Points::new(PlotPoints::new(vec![xy])).color(color).radius(4.5).filled(true));
        }
    });

    if response.response.dragged() && !response.response.drag_started() {
        let drag = response.response.drag_delta();
        let delta_rot = rotation_from_drag(drag.x as f64 * 0.01, drag.y as f64 * 0.01);
        rotation = delta_rot * rotation;
    }

    if response.response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            let factor = 1.0 + scroll as f64 * 0.001;
            zoom = (zoom * factor).clamp(0.3, 5.0);
        }
        if let Some(touch) = ui.input(|i| i.multi_touch()) {
            let factor = touch.zoom_delta as f64;
            zoom = (zoom * factor).clamp(0.3, 5.0);
        }
    }

    (rotation, zoom)
}

/// Wireframe lat/lon rings of the hollow minimap Earth.
fn wireframe_rings() -> Vec<Vec<Vector3<f64>>> {
    let mut rings = Vec::new();
    for lat_deg in [-60.0f64, -30.0, 0.0, 30.0, 60.0] {
        let lat = lat_deg.to_radians();
        let ring = (0..=48)
            .map(|i| {
                let lon = 2.0 * PI * i as f64 / 48.0;
                Vector3::new(
                    EARTH_RADIUS * lat.cos() * lon.cos(),
                    EARTH_RADIUS * lat.sin(),
                    EARTH_RADIUS * lat.cos() * lon.sin(),
                )
            })
            .collect();
        rings.push(ring);
    }
    for lon_deg in [0.0f64, 45.0, 90.0, 135.0] {
        let lon = lon_deg.to_radians();
        let ring = (0..=48)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / 48.0;
                Vector3::new(
                    EARTH_RADIUS * theta.cos() * lon.cos(),
                    EARTH_RADIUS * theta.sin(),
                    EARTH_RADIUS * theta.cos() * lon.sin(),
                )
            })
            .collect();
        rings.push(ring);
    }
    rings
}

/// The minimap: hollow Earth, start/destination markers, the flight
/// path, and a marker driven by the same interpolator output as the
/// main rocket. The camera sways slowly on its own.
pub fn draw_minimap(
    ui: &mut egui::Ui,
    id: &str,
    scene: &SceneState,
    playback: &Playback,
    marker: Option<Vector3<f64>>,
    time: f64,
    width: f32,
    height: f32,
) {
    let rotation = rotation_from_drag((time * 0.1).sin() * 0.08, (time * 0.1).cos() * 0.04)
        * crate::math::spin_matrix(scene.earth_spin * 2.0);

    let plot = Plot::new(id)
        .data_aspect(1.0)
        .width(width)
        .height(height)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .cursor_color(egui::Color32::TRANSPARENT);
    plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max(
            [-MINIMAP_MARGIN, -MINIMAP_MARGIN],
            [MINIMAP_MARGIN, MINIMAP_MARGIN],
        ));

        let glow_alpha = (25.0 + 32.0 * ((time).sin() + 1.0)) as u8;
        plot_ui.line(
            Line::new(circle_points(EARTH_RADIUS * 1.08))
                .color(egui::Color32::from_rgba_unmultiplied(0, 170, 255, glow_alpha))
                .width(3.0),
        );

        for ring in wireframe_rings() {
            let pts: PlotPoints = ring.iter().map(|&p| project(p, &rotation).0).collect();
            plot_ui.line(
                Line::new(pts)
                    .color(egui::Color32::from_rgba_unmultiplied(0, 170, 255, 70))
                    .width(1.0),
            );
        }

        for d in &scene.mini_debris {
            let (xy, _) = project(d.position(), &rotation);
            plot_ui.points(Points::new(PlotPoints::new(vec![xy])).color(COLOR_DEBRIS).radius(1.5));
        }
        for sat in &scene.mini_satellites {
            let (xy, _) = project(sat.position(), &rotation);
            plot_ui.points(
                Points::new(PlotPoints::new(vec![xy]))
                    .color(COLOR_SATELLITE)
                    .radius(2.2)
                    .filled(true),
            );
        }

        let path: Vec<Vector3<f64>> = playback.samples().iter().map(|s| s.position).collect();
        if path.len() > 1 {
            let pts: PlotPoints = path.iter().map(|&p| project(p, &rotation).0).collect();
            plot_ui.line(Line::new(pts).color(COLOR_TRAJECTORY).width(1.0));
        }
        if let Some(&start) = path.first() {
            let (xy, _) = project(start, &rotation);
            plot_ui.points(
                Points::new(PlotPoints::new(vec![xy]))
                    .color(COLOR_WIREFRAME)
                    .radius(3.5)
                    .filled(true),
            );
        }
        if let Some(&end) = path.last() {
            let (xy, _) = project(end, &rotation);
            plot_ui.points(
                Points::new(PlotPoints::new(vec![xy]))
                    .color(egui::Color32::from_rgb(0, 255, 0))
                    .radius(3.5)
                    .filled(true),
            );
        }
        if let Some(pos) = marker {
            let (xy, _) = project(pos, &rotation);
            plot_ui.points(
                Points::new(PlotPoints::new(vec![xy]))
                    .color(COLOR_ROCKET)
                    .radius(3.0)
                    .filled(true),
            );
        }
    });
}
