pub mod config;
pub mod cycle;
pub mod fit;
pub mod lorenz;
pub mod persist;
pub mod raster;
pub mod solvers;
pub mod surface;
/// The `chaos_core` crate is the engine behind the Chaos watch face: every wake
/// it advances a Lorenz trajectory and draws a slowly turning projection of it
/// on a 1-bit display.
///
/// Key components:
/// - **Traits**: `Scalar`, `DynamicalSystem`, `Steppable` (solver seam) and `PixelSurface` (display seam).
/// - **Lorenz / Solvers**: the vector field and a fixed-step RK4.
/// - **Trajectory**: the ring buffer of recent points kept in retained memory.
/// - **View / Fit / Raster**: rotation, orthographic projection, auto-fit and Bresenham drawing.
/// - **Persist / Cycle**: the retained-memory layout and the once-per-wake pipeline.
pub mod traits;
pub mod trajectory;
pub mod view;
