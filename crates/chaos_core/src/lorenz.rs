//! The Lorenz flow and the per-step integrator built on it.

use crate::solvers::RK4;
use crate::traits::{DynamicalSystem, Scalar, Steppable};
use serde::{Deserialize, Serialize};

/// A position in Lorenz phase space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One captured integration step. Stored points are never mutated.
pub type TrajectoryPoint = State3;

impl State3 {
    /// Start position. The origin is a fixed point of the flow, so the seed
    /// sits just off it.
    pub const SEED: State3 = State3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Classical Lorenz coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    pub sigma: f32,
    pub rho: f32,
    pub beta: f32,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

/// The Lorenz vector field `(σ(y−x), x(ρ−z)−y, xy−βz)`.
#[derive(Debug, Clone, Copy)]
pub struct Lorenz<T: Scalar> {
    pub sigma: T,
    pub rho: T,
    pub beta: T,
}

impl<T: Scalar> Lorenz<T> {
    pub fn new(sigma: T, rho: T, beta: T) -> Self {
        Self { sigma, rho, beta }
    }
}

impl From<LorenzParams> for Lorenz<f32> {
    fn from(params: LorenzParams) -> Self {
        Lorenz::new(params.sigma, params.rho, params.beta)
    }
}

impl<T: Scalar> DynamicalSystem<T, 3> for Lorenz<T> {
    fn apply(&self, s: &[T; 3]) -> [T; 3] {
        let [x, y, z] = *s;
        [
            self.sigma * (y - x),
            x * (self.rho - z) - y,
            x * y - self.beta * z,
        ]
    }
}

/// Advances `state` by one RK4 step of size `dt`.
///
/// Pure: identical arguments always produce identical output. Parameters far
/// outside the chaotic regime can make the state blow up; that is not checked.
pub fn step(state: State3, dt: f32, params: &LorenzParams) -> State3 {
    let system = Lorenz::from(*params);
    State3::from_array(RK4.step(&system, &state.to_array(), dt))
}

#[cfg(test)]
mod tests {
    use super::{step, Lorenz, LorenzParams, State3};
    use crate::solvers::RK4;
    use crate::traits::{DynamicalSystem, Steppable};

    const DT: f32 = 0.05;

    #[test]
    fn vector_field_matches_formula() {
        let system = Lorenz::new(10.0f64, 28.0, 8.0 / 3.0);
        let out = system.apply(&[1.0, 2.0, 3.0]);
        assert!((out[0] - 10.0).abs() < 1e-12);
        assert!((out[1] - 23.0).abs() < 1e-12);
        assert!((out[2] - (2.0 - 8.0)).abs() < 1e-12);
    }

    #[test]
    fn origin_is_a_fixed_point() {
        let next = step(State3::default(), DT, &LorenzParams::default());
        assert_eq!(next, State3::default());
    }

    #[test]
    fn step_is_deterministic() {
        let params = LorenzParams::default();
        let s = State3::new(-3.2, 4.5, 21.0);
        let a = step(s, DT, &params);
        let b = step(s, DT, &params);
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }

    #[test]
    fn seed_step_matches_reference_values() {
        let next = step(State3::SEED, DT, &LorenzParams::default());
        let expected = [1.291_449_1, 2.393_933_3, 0.963_455_6];
        for (got, want) in next.to_array().iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "got {got}, expected {want}");
        }
    }

    #[test]
    fn f32_step_tracks_f64_step() {
        let params = LorenzParams::default();
        let system = Lorenz::new(10.0f64, 28.0, 8.0 / 3.0);
        let mut wide = [1.0f64, 1.0, 1.0];
        let mut narrow = State3::SEED;
        for _ in 0..10 {
            wide = RK4.step(&system, &wide, 0.05);
            narrow = step(narrow, DT, &params);
        }
        for (n, w) in narrow.to_array().iter().zip(wide) {
            assert!((*n as f64 - w).abs() < 1e-2, "f32 {n} drifted from f64 {w}");
        }
    }

    #[test]
    fn trajectory_stays_on_attractor() {
        let params = LorenzParams::default();
        let mut s = State3::SEED;
        for _ in 0..2000 {
            s = step(s, DT, &params);
            assert!(s.x.abs() < 30.0 && s.y.abs() < 40.0 && s.z > -1.0 && s.z < 60.0);
        }
    }
}
