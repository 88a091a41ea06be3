//! CPU rendering of the Earth disc.
//!
//! Ray-casts a sphere per pixel, converts the surface point to lat/lon
//! through the inverse view rotation, and samples a procedural palette
//! (ocean, value-noise continents, polar ice) with limb shading. The
//! result is uploaded as an egui texture and only re-rendered when the
//! quantized view rotation changes.

use crate::scene::simple_hash;
use eframe::egui;
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

const OCEAN_DEEP: [f64; 3] = [12.0, 44.0, 96.0];
const OCEAN_SHALLOW: [f64; 3] = [24.0, 84.0, 150.0];
const LAND_LOW: [f64; 3] = [52.0, 110.0, 56.0];
const LAND_HIGH: [f64; 3] = [140.0, 126.0, 80.0];
const ICE: [f64; 3] = [228.0, 236.0, 244.0];

/// Smoothed value noise on the lat/lon grid, in [0, 1].
fn continent_noise(lat: f64, lon: f64) -> f64 {
    let u = (lon + PI).rem_euclid(2.0 * PI) / (2.0 * PI) * 12.0;
    let v = (lat + PI / 2.0) / PI * 6.0;
    let (iu, iv) = (u.floor(), v.floor());
    let (fu, fv) = (u - iu, v - iv);
    // Smoothstep the cell fractions before the bilinear blend.
    let su = fu * fu * (3.0 - 2.0 * fu);
    let sv = fv * fv * (3.0 - 2.0 * fv);

    let corner = |du: f64, dv: f64| {
        let cu = ((iu + du).rem_euclid(12.0)) as u64;
        let cv = (iv + dv).clamp(0.0, 6.0) as u64;
        simple_hash(cu.wrapping_mul(73_856_093).wrapping_add(cv.wrapping_mul(19_349_663)))
    };

    let top = corner(0.0, 0.0) * (1.0 - su) + corner(1.0, 0.0) * su;
    let bottom = corner(0.0, 1.0) * (1.0 - su) + corner(1.0, 1.0) * su;
    top * (1.0 - sv) + bottom * sv
}

fn mix(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn surface_color(lat: f64, lon: f64) -> [f64; 3] {
    if lat.abs() > 66.0f64.to_radians() {
        return ICE;
    }
    let n = continent_noise(lat, lon);
    if n > 0.55 {
        let h = ((n - 0.55) / 0.45).clamp(0.0, 1.0);
        mix(LAND_LOW, LAND_HIGH, h)
    } else {
        let d = (n / 0.55).clamp(0.0, 1.0);
        mix(OCEAN_DEEP, OCEAN_SHALLOW, d)
    }
}

/// Renders the shaded Earth disc under the given view rotation.
pub fn render_sphere(size: usize, rot: &Matrix3<f64>) -> egui::ColorImage {
    let mut pixels = vec![egui::Color32::TRANSPARENT; size * size];
    let center = size as f64 / 2.0;
    let radius = center * 0.95;
    let inv_rot = rot.transpose();

    for py in 0..size {
        for px in 0..size {
            let dx = px as f64 - center;
            let dy = py as f64 - center;
            let dist_sq = dx * dx + dy * dy;

            if dist_sq < radius * radius {
                let z = (radius * radius - dist_sq).sqrt();
                let x = dx / radius;
                let y = -dy / radius;
                let z = z / radius;

                let v = inv_rot * Vector3::new(x, y, z);

                let lat = v.y.asin();
                let lon = v.z.atan2(-v.x);

                let [r, g, b] = surface_color(lat, lon);

                let shade = 0.3 + 0.7 * z.max(0.0);
                pixels[py * size + px] = egui::Color32::from_rgb(
                    (r * shade) as u8,
                    (g * shade) as u8,
                    (b * shade) as u8,
                );
            }
        }
    }

    egui::ColorImage {
        size: [size, size],
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poles_are_ice() {
        assert_eq!(surface_color(80.0f64.to_radians(), 0.0), ICE);
        assert_eq!(surface_color(-80.0f64.to_radians(), 1.0), ICE);
    }

    #[test]
    fn disc_corners_stay_transparent() {
        let img = render_sphere(64, &Matrix3::identity());
        assert_eq!(img.pixels[0], egui::Color32::TRANSPARENT);
        assert_eq!(img.pixels[63], egui::Color32::TRANSPARENT);
        let center = img.pixels[32 * 64 + 32];
        assert_ne!(center, egui::Color32::TRANSPARENT);
    }

    #[test]
    fn noise_is_continuous_across_the_seam() {
        let a = continent_noise(0.3, PI - 1e-9);
        let b = continent_noise(0.3, -PI + 1e-9);
        assert!((a - b).abs() < 1e-3);
    }
}
