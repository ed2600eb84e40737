use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point};
use num_traits::{Float, FromPrimitive};
use std::convert::Infallible;
use std::fmt::Debug;
use std::iter;

/// A trait for types that can be used as scalars in the integrator.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// An autonomous flow on an `N`-dimensional state space.
pub trait DynamicalSystem<T: Scalar, const N: usize> {
    /// Evaluates the vector field at `x`.
    fn apply(&self, x: &[T; N]) -> [T; N];
}

/// A fixed-step solver that advances a system by one step.
pub trait Steppable<T: Scalar, const N: usize> {
    /// Returns the state one step of size `dt` after `state`.
    /// Implementations hold no state between calls.
    fn step(&self, system: &impl DynamicalSystem<T, N>, state: &[T; N], dt: T) -> [T; N];
}

/// A bilevel pixel grid the rasterizer writes into.
///
/// Any embedded-graphics `DrawTarget` over `BinaryColor` whose writes cannot
/// fail gets this for free, so e-paper driver buffers plug in directly.
pub trait PixelSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Sets one pixel. `BinaryColor::On` is ink.
    /// Coordinates outside the grid are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor);

    /// Fills the whole grid with one color.
    fn clear(&mut self, color: BinaryColor);
}

impl<D> PixelSurface for D
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible> + OriginDimensions,
{
    fn width(&self) -> u32 {
        self.size().width
    }

    fn height(&self) -> u32 {
        self.size().height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        match self.draw_iter(iter::once(Pixel(Point::new(x, y), color))) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn clear(&mut self, color: BinaryColor) {
        match DrawTarget::clear(self, color) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}
