//! One wake of the watch face, from retained state to a drawn frame.

use crate::config::FaceConfig;
use crate::fit::fit_frame;
use crate::lorenz;
use crate::persist::{region_size, PersistError, PersistentState};
use crate::traits::PixelSurface;
use anyhow::Result;
use embedded_graphics::pixelcolor::BinaryColor;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// True when the state was (re)seeded at the start of this cycle.
    pub seeded: bool,
    pub points: usize,
    pub theta: f32,
    /// False only when there was nothing to draw.
    pub drawn: bool,
}

#[derive(Debug, Clone)]
pub struct CycleOrchestrator {
    config: FaceConfig,
}

impl CycleOrchestrator {
    pub fn new(config: FaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    /// A never-run state sized for this configuration.
    pub fn blank_state(&self) -> PersistentState {
        PersistentState::new(self.config.buffer_capacity)
    }

    /// Runs integrate → append → rotate → fit → rasterize on `state`.
    ///
    /// The surface is cleared to paper (`BinaryColor::Off`) first. The caller
    /// owns getting `state` into and out of retained memory; see
    /// [`Self::run_wake`].
    pub fn run_cycle(
        &self,
        state: &mut PersistentState,
        surface: &mut impl PixelSurface,
    ) -> CycleReport {
        let config = &self.config;
        let mut seeded = false;
        if state.trajectory.capacity() != config.buffer_capacity {
            warn!(
                "stored buffer capacity {} differs from configured {}; reseeding",
                state.trajectory.capacity(),
                config.buffer_capacity
            );
            *state = self.blank_state();
        }
        if !state.initialized {
            state.seed();
            seeded = true;
            info!(
                "seeded trajectory at {:?} with capacity {}",
                state.position, config.buffer_capacity
            );
        }

        surface.clear(BinaryColor::Off);

        for _ in 0..config.points_per_update {
            state.position = lorenz::step(state.position, config.dt, &config.params);
            state.trajectory.append(state.position);
        }
        state.view.advance(config.rotation_increment);

        let projector = state.view.projector();
        let drawn = match fit_frame(&state.trajectory, &projector, config.fit_region()) {
            Some(frame) => {
                config.raster.draw(surface, &frame.points);
                true
            }
            None => false,
        };

        let report = CycleReport {
            seeded,
            points: state.trajectory.len(),
            theta: state.view.theta(),
            drawn,
        };
        debug!(
            "cycle done: {} points, theta {:.4}, drawn {}",
            report.points, report.theta, report.drawn
        );
        report
    }

    /// Full wake: load from `region`, run one cycle, write back.
    ///
    /// A region that cannot be decoded is reseeded rather than aborting the
    /// wake. Only a region too small for the configured buffer is an error.
    pub fn run_wake(
        &self,
        region: &mut [u8],
        surface: &mut impl PixelSurface,
    ) -> Result<CycleReport, PersistError> {
        let capacity = self.config.buffer_capacity;
        let needed = region_size(capacity);
        if region.len() < needed {
            return Err(PersistError::RegionTooSmall {
                needed,
                actual: region.len(),
            });
        }
        let mut state = PersistentState::load_from(region, capacity).unwrap_or_else(|err| {
            warn!("discarding persisted state: {err}");
            self.blank_state()
        });
        let report = self.run_cycle(&mut state, surface);
        state.save_to(region)?;
        Ok(report)
    }
}
