use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4;

impl<T: Scalar, const N: usize> Steppable<T, N> for RK4 {
    fn step(&self, system: &impl DynamicalSystem<T, N>, state: &[T; N], dt: T) -> [T; N] {
        let two = T::one() + T::one();
        let half = T::one() / two;
        let sixth = T::one() / (two + two + two);

        let mut tmp = [T::zero(); N];

        // k1 = f(y)
        let k1 = system.apply(state);

        // k2 = f(y + dt*k1/2)
        for i in 0..N {
            tmp[i] = state[i] + k1[i] * dt * half;
        }
        let k2 = system.apply(&tmp);

        // k3 = f(y + dt*k2/2)
        for i in 0..N {
            tmp[i] = state[i] + k2[i] * dt * half;
        }
        let k3 = system.apply(&tmp);

        // k4 = f(y + dt*k3)
        for i in 0..N {
            tmp[i] = state[i] + k3[i] * dt;
        }
        let k4 = system.apply(&tmp);

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        let mut next = *state;
        for i in 0..N {
            next[i] = state[i] + (k1[i] + two * k2[i] + two * k3[i] + k4[i]) * dt * sixth;
        }
        next
    }
}
