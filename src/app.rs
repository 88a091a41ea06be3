//! Application shell and eframe integration.
//!
//! Owns all mutable state (no free globals) and drives the per-frame
//! loop: poll the simulation channel, advance the scene and playback
//! driver, refresh the Earth texture, then lay out the control panel,
//! the launch view, the minimap, and the telemetry charts.

use crate::charts;
use crate::config::{AppConfig, LaunchInputs, LaunchSite, OrbitTarget};
use crate::drawing::{draw_main_view, draw_minimap, risk_color};
use crate::earth::render_sphere;
use crate::math::spin_matrix;
use crate::playback::{Playback, PlaybackPhase};
use crate::scene::{map_response, SceneState, EARTH_RADIUS};
use crate::sim::{RiskLevel, SimClient, Summary, TrajectoryPoint};
use chrono::{DateTime, Utc};
use eframe::egui;
use nalgebra::{Matrix3, Vector3};

const EARTH_IMAGE_SIZE: usize = 256;
/// Earth self-rotation is quantized into buckets so the CPU texture is
/// only re-rendered a few times per second, not every frame.
const SPIN_BUCKETS: f64 = 96.0;

pub(crate) struct App {
    config: AppConfig,
    inputs: LaunchInputs,
    sim: SimClient,
    playback: Playback,
    scene: SceneState,
    rotation: Matrix3<f64>,
    zoom: f64,
    launch_pull: f64,
    exhaust_visible: bool,
    telemetry: Vec<TrajectoryPoint>,
    debris_markers: Vec<(Vector3<f64>, RiskLevel)>,
    summary: Option<Summary>,
    risk: RiskLevel,
    last_error: Option<String>,
    launched_at: Option<DateTime<Utc>>,
    earth_handle: Option<egui::TextureHandle>,
    last_render_key: Option<(i64, [u8; 72])>,
    dark_mode: bool,
}

impl App {
    pub(crate) fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::default();
        let sim = SimClient::new(config.backend_url.clone());
        Self {
            config,
            inputs: LaunchInputs::default(),
            sim,
            playback: Playback::idle(),
            scene: SceneState::new(0x5eed),
            rotation: Matrix3::identity(),
            zoom: 1.0,
            launch_pull: 0.0,
            exhaust_visible: false,
            telemetry: Vec::new(),
            debris_markers: Vec::new(),
            summary: None,
            risk: RiskLevel::Safe,
            last_error: None,
            launched_at: None,
            earth_handle: None,
            last_render_key: None,
            dark_mode: true,
        }
    }

    fn launch(&mut self, ctx: &egui::Context) {
        self.sim.set_base_url(self.config.backend_url.clone());
        self.sim.request(self.inputs.to_request(), ctx);
    }

    fn poll_simulation(&mut self, now: f64) {
        let Some(result) = self.sim.poll() else {
            return;
        };
        match result {
            Ok(response) => {
                let (samples, debris) = map_response(&response);
                log::info!(
                    "simulation response: {} samples, {} debris objects, risk {}",
                    samples.len(),
                    debris.len(),
                    response.risk_level().label()
                );
                self.risk = response.risk_level();
                self.summary = Some(response.summary.clone());
                self.telemetry = response.trajectory;
                self.debris_markers = debris;
                self.last_error = None;
                self.launched_at = Some(Utc::now());
                self.exhaust_visible = true;
                self.playback
                    .start(samples, self.config.playback_seconds, now);
            }
            Err(err) => {
                log::warn!("simulation failed: {}", err);
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Re-renders the Earth texture when the quantized spin or the view
    /// rotation changed since the last upload.
    fn refresh_earth_texture(&mut self, ctx: &egui::Context) {
        let spin_bucket =
            (self.scene.earth_spin / (2.0 * std::f64::consts::PI) * SPIN_BUCKETS) as i64;
        let mut rot_key = [0u8; 72];
        for (chunk, v) in rot_key.chunks_exact_mut(8).zip(self.rotation.iter()) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        let key = (spin_bucket, rot_key);
        if self.last_render_key == Some(key) && self.earth_handle.is_some() {
            return;
        }
        let quantized_spin =
            spin_bucket as f64 / SPIN_BUCKETS * 2.0 * std::f64::consts::PI;
        let render_rot = self.rotation * spin_matrix(quantized_spin);
        let image = render_sphere(EARTH_IMAGE_SIZE, &render_rot);
        self.earth_handle = Some(ctx.load_texture("earth", image, egui::TextureOptions::LINEAR));
        self.last_render_key = Some(key);
    }

    fn show_status_indicator(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Status:");
            for level in RiskLevel::ALL {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                let center = rect.center();
                let active = level == self.risk;
                let color = if active {
                    risk_color(level)
                } else {
                    risk_color(level).gamma_multiply(0.25)
                };
                ui.painter().circle_filled(center, 5.0, color);
                if active {
                    ui.painter().circle_stroke(
                        center,
                        6.5,
                        egui::Stroke::new(1.5, risk_color(level)),
                    );
                }
            }
            ui.label(self.risk.label());
        });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: f64) {
        ui.label(egui::RichText::new("Launch parameters").strong());

        ui.horizontal(|ui| {
            ui.label("Site:");
            egui::ComboBox::from_id_salt("launch_site")
                .selected_text(self.inputs.site.label())
                .show_ui(ui, |ui| {
                    for site in LaunchSite::ALL {
                        ui.selectable_value(&mut self.inputs.site, site, site.label());
                    }
                });
        });
        ui.horizontal(|ui| {
            ui.label("Velocity:");
            ui.add(
                egui::DragValue::new(&mut self.inputs.velocity)
                    .range(100.0..=20000.0)
                    .speed(50.0)
                    .suffix(" m/s"),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Angle:");
            ui.add(
                egui::DragValue::new(&mut self.inputs.angle)
                    .range(0.0..=90.0)
                    .speed(0.5)
                    .suffix("°"),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Orbit:");
            egui::ComboBox::from_id_salt("target_orbit")
                .selected_text(self.inputs.orbit.label())
                .show_ui(ui, |ui| {
                    for orbit in OrbitTarget::ALL {
                        ui.selectable_value(&mut self.inputs.orbit, orbit, orbit.label());
                    }
                });
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let launch = ui.add_enabled(!self.sim.in_flight(), egui::Button::new("Launch"));
            if launch.clicked() {
                self.launch(ctx);
            }
            if self.sim.in_flight() {
                ui.spinner();
                ui.label("Simulating...");
            }
        });

        if let Some(err) = &self.last_error {
            ui.colored_label(egui::Color32::RED, err);
        }

        ui.add_space(6.0);
        self.show_status_indicator(ui);

        match self.playback.phase() {
            PlaybackPhase::Idle => {}
            PlaybackPhase::Playing => {
                ui.add(egui::ProgressBar::new(self.playback.progress(now) as f32).show_percentage());
            }
            PlaybackPhase::Completed => {
                ui.label("Flight complete");
            }
        }

        if let Some(summary) = &self.summary {
            ui.add_space(6.0);
            ui.label(egui::RichText::new("Summary").strong());
            ui.label(format!("Max altitude: {:.0} m", summary.max_altitude));
            ui.label(format!("Final distance: {:.0} m", summary.final_distance));
            if let Some(at) = self.launched_at {
                ui.label(format!("Run at {}", at.format("%H:%M:%S UTC")));
            }
        }

        ui.add_space(10.0);
        ui.separator();
        ui.label(egui::RichText::new("Display").strong());
        ui.checkbox(&mut self.dark_mode, "Dark mode");
        ui.horizontal(|ui| {
            ui.label("Playback:");
            ui.add(
                egui::Slider::new(&mut self.config.playback_seconds, 2.0..=30.0).suffix(" s"),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Zoom:");
            ui.add(egui::Slider::new(&mut self.zoom, 0.3..=5.0).logarithmic(true));
        });
        if ui.button("Reset view").clicked() {
            self.rotation = Matrix3::identity();
            self.zoom = 1.0;
        }

        ui.add_space(10.0);
        ui.separator();
        ui.label("Backend:");
        ui.text_edit_singleline(&mut self.config.backend_url);

        ui.add_space(10.0);
        ui.label("Drag the launch view to rotate");
        ui.small(format!("build {}", env!("GIT_HASH")));
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let now = ctx.input(|i| i.time);
        let dt = ctx.input(|i| i.stable_dt) as f64;

        self.scene.advance(dt);
        self.poll_simulation(now);

        if self.playback.tick(now) {
            // One-shot Completed edge: exhaust off, camera framing back.
            log::info!("playback complete");
            self.exhaust_visible = false;
            self.launch_pull = 0.0;
        }

        let rocket = self.playback.position(now);
        if self.playback.is_playing() {
            if let Some(pos) = rocket {
                self.launch_pull = ((pos.y - EARTH_RADIUS) * 0.2).clamp(0.0, 50.0);
            }
        }

        self.refresh_earth_texture(ctx);

        egui::SidePanel::left("launch_controls").show(ctx, |ui| {
            ui.heading("Launch Viz");
            ui.separator();
            self.show_controls(ui, ctx, now);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let main_height = (available.y * 0.58).max(200.0);
            let bottom_height = (available.y - main_height - 16.0).max(120.0);
            let minimap_width = (available.x * 0.3).clamp(180.0, 360.0);
            let chart_width = ((available.x - minimap_width - 20.0) / 2.0).max(160.0);

            let (rotation, zoom) = draw_main_view(
                ui,
                "launch_view",
                &self.scene,
                &self.playback,
                rocket,
                &self.debris_markers,
                self.exhaust_visible && self.playback.is_playing(),
                self.rotation,
                self.zoom,
                self.launch_pull,
                self.earth_handle.as_ref(),
                available.x,
                main_height,
            );
            self.rotation = rotation;
            self.zoom = zoom;

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                draw_minimap(
                    ui,
                    "orbit_minimap",
                    &self.scene,
                    &self.playback,
                    rocket,
                    now,
                    minimap_width,
                    bottom_height,
                );
                ui.add_space(6.0);
                charts::draw_telemetry(ui, &self.telemetry, chart_width, bottom_height);
                charts::draw_velocity(ui, &self.telemetry, chart_width, bottom_height);
            });
        });

        // The starfield and orbiters animate continuously.
        ctx.request_repaint();
    }
}
