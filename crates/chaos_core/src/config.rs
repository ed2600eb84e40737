use crate::fit::FitRegion;
use crate::lorenz::LorenzParams;
use crate::raster::Rasterizer;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Every tunable of the watch face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    pub params: LorenzParams,
    pub dt: f32,
    /// Integration steps (and stored points) per wake.
    pub points_per_update: usize,
    pub buffer_capacity: usize,
    /// Radians the view turns each wake.
    pub rotation_increment: f32,
    pub target_span: f32,
    pub margin: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub raster: Rasterizer,
    /// Seconds between wakes. Read by the platform scheduler only.
    pub wake_interval: f32,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            params: LorenzParams::default(),
            dt: 0.05,
            points_per_update: 50,
            buffer_capacity: 300,
            rotation_increment: 0.2,
            target_span: 80.0,
            margin: 5,
            display_width: 200,
            display_height: 200,
            raster: Rasterizer::default(),
            wake_interval: 3.0,
        }
    }
}

impl FaceConfig {
    /// Settings used on the watch itself: a slow trickle of points into a
    /// long buffer and a 3° turn every 30 s wake.
    pub fn watchy() -> Self {
        Self {
            points_per_update: 5,
            buffer_capacity: 500,
            rotation_increment: 0.052_359_88,
            wake_interval: 30.0,
            ..Self::default()
        }
    }

    pub fn fit_region(&self) -> FitRegion {
        FitRegion::for_display(
            self.display_width,
            self.display_height,
            self.margin,
            self.target_span,
        )
    }

    /// Rejects settings that cannot produce a frame at all.
    ///
    /// The Lorenz coefficients are only required to be finite: values away
    /// from the classical ones may diverge, which is allowed.
    pub fn validate(&self) -> Result<()> {
        let LorenzParams { sigma, rho, beta } = self.params;
        if !(sigma.is_finite() && rho.is_finite() && beta.is_finite()) {
            bail!("Lorenz parameters must be finite.");
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            bail!("Step size dt must be positive.");
        }
        if self.buffer_capacity == 0 {
            bail!("Buffer capacity must be at least 1.");
        }
        if u32::try_from(self.buffer_capacity).is_err() {
            bail!("Buffer capacity {} does not fit the persistent layout.", self.buffer_capacity);
        }
        if !self.rotation_increment.is_finite() {
            bail!("Rotation increment must be finite.");
        }
        if !self.target_span.is_finite() || self.target_span <= 0.0 {
            bail!("Target span must be positive.");
        }
        if self.display_width == 0 || self.display_height == 0 {
            bail!("Display dimensions must be positive.");
        }
        if self.margin.saturating_mul(2) >= self.display_width.min(self.display_height) {
            bail!(
                "Margin {} leaves no drawing area on a {}x{} display.",
                self.margin,
                self.display_width,
                self.display_height
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FaceConfig;
    use crate::view::Point2D;

    fn assert_err_contains(config: &FaceConfig, needle: &str) {
        let err = config.validate().expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn defaults_are_valid() {
        FaceConfig::default().validate().expect("default config");
        FaceConfig::watchy().validate().expect("watchy config");
    }

    #[test]
    fn watchy_preset_turns_three_degrees() {
        let config = FaceConfig::watchy();
        assert!((config.rotation_increment - 3f32.to_radians()).abs() < 1e-6);
        assert_eq!(config.buffer_capacity, 500);
    }

    #[test]
    fn default_region_matches_reference_display() {
        let region = FaceConfig::default().fit_region();
        assert_eq!(region.center, Point2D::new(100.0, 100.0));
        assert_eq!(region.max, Point2D::new(195.0, 195.0));
        assert_eq!(region.target_span, 80.0);
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        let base = FaceConfig::default();
        assert_err_contains(&FaceConfig { dt: 0.0, ..base.clone() }, "dt");
        assert_err_contains(
            &FaceConfig {
                buffer_capacity: 0,
                ..base.clone()
            },
            "capacity",
        );
        assert_err_contains(
            &FaceConfig {
                target_span: -1.0,
                ..base.clone()
            },
            "span",
        );
        assert_err_contains(&FaceConfig { margin: 100, ..base.clone() }, "Margin");
        let mut nan = base;
        nan.params.rho = f32::NAN;
        assert_err_contains(&nan, "finite");
    }

    #[test]
    fn validate_accepts_non_chaotic_parameters() {
        let mut config = FaceConfig::default();
        config.params.rho = 500.0;
        config.params.sigma = -3.0;
        config.validate().expect("divergent parameters are allowed");
    }
}
