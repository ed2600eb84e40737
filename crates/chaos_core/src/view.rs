//! Rotating orthographic view of the trajectory.

use crate::lorenz::TrajectoryPoint;
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// A projected point in attractor units (before fitting to the display).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The persistent view angle, kept in `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewState {
    theta: f32,
}

impl ViewState {
    pub fn new(theta: f32) -> Self {
        Self {
            theta: wrap_angle(theta),
        }
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Turns the view by `delta` radians. Called once per cycle.
    pub fn advance(&mut self, delta: f32) {
        self.theta = wrap_angle(self.theta + delta);
    }

    /// Builds the projector for the current angle. Every point of one frame
    /// goes through the same projector.
    pub fn projector(&self) -> Projector {
        Projector::new(self.theta)
    }
}

fn wrap_angle(theta: f32) -> f32 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Rotation about the vertical (y) axis followed by dropping depth.
///
/// Maps `x' = x·cosθ − z·sinθ`, `y' = y`.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    rotation: Rotation3<f32>,
}

impl Projector {
    pub fn new(theta: f32) -> Self {
        // nalgebra's right-handed y rotation sends x to x·cosθ + z·sinθ;
        // the watch face turns the other way.
        Self {
            rotation: Rotation3::from_axis_angle(&Vector3::y_axis(), -theta),
        }
    }

    /// Rotates `p` into view space, depth in `z`.
    pub fn rotate(&self, p: TrajectoryPoint) -> Vector3<f32> {
        self.rotation * Vector3::new(p.x, p.y, p.z)
    }

    pub fn project(&self, p: TrajectoryPoint) -> Point2D {
        let v = self.rotate(p);
        Point2D::new(v.x, v.y)
    }
}

/// Projects one point at angle `theta`.
pub fn project(p: TrajectoryPoint, theta: f32) -> Point2D {
    Projector::new(theta).project(p)
}

#[cfg(test)]
mod tests {
    use super::{project, Point2D, Projector, ViewState};
    use crate::lorenz::TrajectoryPoint;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn assert_close(a: Point2D, b: Point2D) {
        assert!(
            (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn zero_angle_drops_z() {
        let p = TrajectoryPoint::new(3.0, -2.0, 17.0);
        assert_close(project(p, 0.0), Point2D::new(3.0, -2.0));
    }

    #[test]
    fn quarter_turn_brings_z_forward() {
        let p = TrajectoryPoint::new(3.0, -2.0, 17.0);
        assert_close(project(p, FRAC_PI_2), Point2D::new(-17.0, -2.0));
    }

    #[test]
    fn projection_matches_closed_form() {
        let p = TrajectoryPoint::new(-7.5, 4.25, 30.0);
        for theta in [0.2f32, 1.0, 2.5, 4.0, 6.0] {
            let expected = Point2D::new(p.x * theta.cos() - p.z * theta.sin(), p.y);
            assert_close(project(p, theta), expected);
        }
    }

    #[test]
    fn depth_follows_rotation() {
        let p = TrajectoryPoint::new(1.0, 0.0, 2.0);
        let theta = 0.7f32;
        let v = Projector::new(theta).rotate(p);
        let depth = p.x * theta.sin() + p.z * theta.cos();
        assert!((v.z - depth).abs() < 1e-5);
    }

    #[test]
    fn reprojection_is_idempotent() {
        let p = TrajectoryPoint::new(12.0, 9.0, 33.0);
        let projector = Projector::new(1.3);
        let a = projector.project(p);
        let b = projector.project(p);
        assert_eq!(a, b);
        assert_eq!(p, TrajectoryPoint::new(12.0, 9.0, 33.0));
    }

    #[test]
    fn rotation_wraps_into_range() {
        let mut view = ViewState::default();
        for _ in 0..32 {
            view.advance(0.2);
            assert!((0.0..TAU).contains(&view.theta()));
        }
        let expected = 6.4 - 2.0 * std::f64::consts::PI;
        assert!(
            (view.theta() as f64 - expected).abs() < 1e-4,
            "theta = {}",
            view.theta()
        );
    }

    #[test]
    fn negative_angles_normalise() {
        let view = ViewState::new(-PI / 2.0);
        assert!((view.theta() - 1.5 * PI).abs() < 1e-5);
        let view = ViewState::new(-1e-9);
        assert!((0.0..TAU).contains(&view.theta()));
    }
}
