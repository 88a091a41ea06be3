//! Ambient scene population and coordinate mapping.
//!
//! Owns everything that moves on its own: orbiting satellites, the
//! debris ring, the starfield, and the rocket exhaust cloud. All
//! pseudo-randomness is derived from a splitmix-style hash of a seed,
//! so scene generation is deterministic and testable. Also maps backend
//! trajectory and debris coordinates into scene units.

use crate::sim::{DebrisObject, RiskLevel, SimResponse, TrajectoryPoint};
use crate::trajectory::TrajectorySample;
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Scene units: the Earth disc radius everything else is sized against.
pub const EARTH_RADIUS: f64 = 60.0;
/// Margin of the main view's plot bounds at zoom 1.
pub const VIEW_MARGIN: f64 = 200.0;
/// Downrange extent the longest trajectory axis is scaled to.
pub const LAUNCH_SPAN: f64 = 120.0;

pub const STAR_COUNT: usize = 3000;
pub const EXHAUST_PARTICLES: usize = 200;

pub(crate) fn simple_hash(seed: u64) -> f64 {
    let mut x = seed;
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51afd7ed558ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ceb9fe1a85ec53);
    x ^= x >> 33;
    (x as f64) / (u64::MAX as f64)
}

/// A body on a circular orbit around the scene origin.
#[derive(Clone)]
pub struct Orbiter {
    pub angle: f64,
    pub radius: f64,
    pub speed: f64,
    pub tilt: f64,
    pub blink: f64,
}

impl Orbiter {
    fn from_seed(seed: u64, radius_base: f64, radius_spread: f64, speed_base: f64, speed_spread: f64, tilt_max: f64) -> Self {
        Self {
            angle: simple_hash(seed) * 2.0 * PI,
            radius: radius_base + simple_hash(seed + 1) * radius_spread,
            speed: speed_base + simple_hash(seed + 2) * speed_spread,
            tilt: simple_hash(seed + 3) * tilt_max,
            blink: simple_hash(seed + 4) * 100.0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.angle += self.speed * dt;
        self.blink += 6.0 * dt;
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(
            self.angle.cos() * self.radius,
            self.tilt.sin() * self.radius * 0.3,
            self.angle.sin() * self.radius,
        )
    }

    /// Oscillating emissive intensity in [0, 1] for the blink effect.
    pub fn blink_intensity(&self) -> f64 {
        (self.blink.sin() + 1.0) / 2.0
    }
}

pub struct SceneState {
    pub stars: Vec<[f64; 2]>,
    pub satellites: Vec<Orbiter>,
    pub debris: Vec<Orbiter>,
    pub mini_satellites: Vec<Orbiter>,
    pub mini_debris: Vec<Orbiter>,
    pub earth_spin: f64,
    pub frame: u64,
}

impl SceneState {
    pub fn new(seed: u64) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|i| {
                let s = seed.wrapping_add(900_000).wrapping_add(i as u64 * 7);
                [simple_hash(s) - 0.5, simple_hash(s + 1) - 0.5]
            })
            .collect();

        let satellites = (0..4)
            .map(|i| Orbiter::from_seed(seed + i * 10, 100.0, 40.0, 0.06, 0.12, PI / 3.0))
            .collect();
        let debris = (0..80)
            .map(|i| Orbiter::from_seed(seed + 1000 + i * 10, 80.0, 40.0, 0.06, 0.18, 0.0))
            .collect();
        let mini_satellites = (0..3)
            .map(|i| Orbiter::from_seed(seed + 2000 + i * 10, 65.0, 20.0, 0.3, 0.3, PI / 4.0))
            .collect();
        let mini_debris = (0..18)
            .map(|i| Orbiter::from_seed(seed + 3000 + i * 10, 70.0, 18.0, 0.12, 0.3, PI / 6.0))
            .collect();

        Self {
            stars,
            satellites,
            debris,
            mini_satellites,
            mini_debris,
            earth_spin: 0.0,
            frame: 0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.earth_spin = (self.earth_spin + 0.12 * dt).rem_euclid(2.0 * PI);
        self.frame = self.frame.wrapping_add(1);
        for sat in &mut self.satellites {
            sat.advance(dt);
        }
        for d in &mut self.debris {
            d.advance(dt);
        }
        for sat in &mut self.mini_satellites {
            sat.advance(dt);
        }
        for d in &mut self.mini_debris {
            d.advance(dt);
        }
    }
}

/// Exhaust particle cloud jittered below the rocket. Re-seeded from the
/// frame counter each tick so the cloud flickers without any RNG state.
pub fn exhaust_points(origin: Vector3<f64>, frame: u64) -> Vec<Vector3<f64>> {
    (0..EXHAUST_PARTICLES)
        .map(|i| {
            let s = frame.wrapping_mul(1000).wrapping_add(i as u64 * 3);
            Vector3::new(
                origin.x + (simple_hash(s) - 0.5) * 1.2,
                origin.y - 2.5 - simple_hash(s + 1) * 1.5,
                origin.z + (simple_hash(s + 2) - 0.5) * 1.2,
            )
        })
        .collect()
}

/// Uniform scale factor mapping the backend's coordinate range into
/// scene units. Zero when every coordinate is zero.
fn trajectory_scale(points: &[TrajectoryPoint]) -> f64 {
    let max_extent = points
        .iter()
        .flat_map(|p| [p.x.abs(), p.y.abs(), p.z.abs()])
        .fold(0.0f64, f64::max);
    if max_extent > 0.0 {
        LAUNCH_SPAN / max_extent
    } else {
        0.0
    }
}

fn map_point(x: f64, y: f64, z: f64, scale: f64) -> Vector3<f64> {
    // Launch pad sits at the top of the Earth disc; backend y is
    // altitude above it, x downrange, z lateral deviation.
    Vector3::new(x * scale, EARTH_RADIUS + y * scale, z * scale)
}

/// Maps a simulation response into scene-space playback samples plus
/// debris markers, sharing one scale factor so they stay consistent.
pub fn map_response(response: &SimResponse) -> (Vec<TrajectorySample>, Vec<(Vector3<f64>, RiskLevel)>) {
    let scale = trajectory_scale(&response.trajectory);
    let samples = response
        .trajectory
        .iter()
        .map(|p| TrajectorySample {
            speed: p.speed,
            fuel: p.fuel,
            altitude: Some(p.y),
            ..TrajectorySample::new(p.time, map_point(p.x, p.y, p.z, scale))
        })
        .collect();
    let debris = response
        .debris
        .iter()
        .map(|d: &DebrisObject| (map_point(d.x, d.y, d.z, scale), d.risk))
        .collect();
    (samples, debris)
}
