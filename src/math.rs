//! 3D rotation and projection helpers.
//!
//! Matrix operations for the view rotation, drag-based rotation from
//! mouse input, and the orthographic projection used by both views.

use nalgebra::{Matrix3, Vector3};

/// Projects a scene point through the view rotation. Returns the plot
/// coordinates and the rotated depth (negative z is behind the screen).
pub fn project(p: Vector3<f64>, rot: &Matrix3<f64>) -> ([f64; 2], f64) {
    let v = rot * p;
    ([v.x, v.y], v.z)
}

/// True when a rotated point is hidden by a sphere of `radius` centered
/// at the origin: behind the screen plane and inside the sphere's disc.
pub fn occluded(projected: [f64; 2], depth: f64, radius: f64) -> bool {
    depth < 0.0 && projected[0] * projected[0] + projected[1] * projected[1] < radius * radius
}

pub fn rotation_from_drag(dx: f64, dy: f64) -> Matrix3<f64> {
    let rot_y = Matrix3::new(
        dx.cos(), 0.0, dx.sin(),
        0.0, 1.0, 0.0,
        -dx.sin(), 0.0, dx.cos(),
    );
    let rot_x = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, dy.cos(), -dy.sin(),
        0.0, dy.sin(), dy.cos(),
    );
    rot_x * rot_y
}

pub fn spin_matrix(angle: f64) -> Matrix3<f64> {
    Matrix3::new(
        angle.cos(), 0.0, angle.sin(),
        0.0, 1.0, 0.0,
        -angle.sin(), 0.0, angle.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_projection_keeps_xy() {
        let (xy, z) = project(Vector3::new(3.0, -2.0, 7.0), &Matrix3::identity());
        assert_eq!(xy, [3.0, -2.0]);
        assert_eq!(z, 7.0);
    }

    #[test]
    fn occlusion_requires_negative_depth_inside_disc() {
        assert!(occluded([1.0, 1.0], -5.0, 10.0));
        assert!(!occluded([1.0, 1.0], 5.0, 10.0));
        assert!(!occluded([20.0, 0.0], -5.0, 10.0));
    }

    #[test]
    fn drag_rotation_preserves_length() {
        let rot = rotation_from_drag(0.3, -0.7);
        let v = rot * Vector3::new(1.0, 2.0, 3.0);
        let len = (1.0f64 + 4.0 + 9.0).sqrt();
        assert!((v.norm() - len).abs() < 1e-12);
    }

    #[test]
    fn spin_rotates_about_y() {
        let rot = spin_matrix(std::f64::consts::FRAC_PI_2);
        let v = rot * Vector3::new(1.0, 5.0, 0.0);
        assert!((v.y - 5.0).abs() < 1e-12);
        assert!(v.x.abs() < 1e-12);
        assert!((v.z + 1.0).abs() < 1e-12);
    }
}
