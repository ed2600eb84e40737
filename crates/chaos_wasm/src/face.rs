//! Simulated watch: retained memory, a 1-bit panel and one cycle per tick.

use chaos_core::config::FaceConfig;
use chaos_core::cycle::CycleOrchestrator;
use chaos_core::persist::{region_size, PersistentState};
use chaos_core::surface::Framebuffer;
use chaos_core::traits::PixelSurface;
use embedded_graphics::pixelcolor::BinaryColor;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize, Deserialize)]
struct TrajectorySnapshot {
    position: [f32; 3],
    theta: f32,
    points: Vec<[f32; 3]>,
}

#[wasm_bindgen]
pub struct WasmWatchFace {
    orchestrator: CycleOrchestrator,
    region: Vec<u8>,
    panel: Framebuffer,
}

impl WasmWatchFace {
    pub(crate) fn from_config(config: FaceConfig) -> anyhow::Result<Self> {
        let orchestrator = CycleOrchestrator::new(config)?;
        let config = orchestrator.config();
        let region = vec![0; region_size(config.buffer_capacity)];
        let panel = Framebuffer::new(config.display_width, config.display_height);
        Ok(Self {
            orchestrator,
            region,
            panel,
        })
    }

    fn load_state(&self) -> anyhow::Result<PersistentState> {
        let capacity = self.orchestrator.config().buffer_capacity;
        Ok(PersistentState::load_from(&self.region, capacity)?)
    }
}

#[wasm_bindgen]
impl WasmWatchFace {
    /// Builds a face from a (possibly partial) config object; missing fields
    /// take their defaults. Pass `undefined` for the reference settings.
    #[wasm_bindgen(constructor)]
    pub fn new(config_val: JsValue) -> Result<WasmWatchFace, JsValue> {
        console_error_panic_hook::set_once();

        let config: FaceConfig = if config_val.is_undefined() || config_val.is_null() {
            FaceConfig::default()
        } else {
            from_value(config_val)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Self::from_config(config).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// The on-device preset.
    pub fn watchy() -> Result<WasmWatchFace, JsValue> {
        console_error_panic_hook::set_once();
        Self::from_config(FaceConfig::watchy()).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Simulates one wake and returns its report.
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        let report = self
            .orchestrator
            .run_wake(&mut self.region, &mut self.panel)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        to_value(&report)
            .map_err(|err| JsValue::from_str(&format!("Failed to serialize report: {err}")))
    }

    /// Forgets everything, as if retained memory had lost power.
    pub fn reset(&mut self) {
        self.region.fill(0);
        self.panel.clear(BinaryColor::Off);
    }

    pub fn width(&self) -> u32 {
        self.panel.width()
    }

    pub fn height(&self) -> u32 {
        self.panel.height()
    }

    /// Packed 1-bit rows, MSB first.
    pub fn frame_bits(&self) -> Vec<u8> {
        self.panel.as_bytes().to_vec()
    }

    /// RGBA pixels ready for `ImageData`.
    pub fn frame_rgba(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.panel.to_rgba().as_slice())
    }

    /// Raw retained-memory bytes.
    pub fn region_bytes(&self) -> Vec<u8> {
        self.region.clone()
    }

    pub fn point_count(&self) -> Result<usize, JsValue> {
        let state = self
            .load_state()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(state.trajectory.len())
    }

    /// Position, view angle and stored points (oldest first).
    pub fn trajectory(&self) -> Result<JsValue, JsValue> {
        let state = self
            .load_state()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let snapshot = TrajectorySnapshot {
            position: state.position.to_array(),
            theta: state.view.theta(),
            points: state.trajectory.iter().map(|p| p.to_array()).collect(),
        };
        to_value(&snapshot)
            .map_err(|err| JsValue::from_str(&format!("Failed to serialize trajectory: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_face() -> WasmWatchFace {
        WasmWatchFace::from_config(FaceConfig {
            points_per_update: 10,
            buffer_capacity: 25,
            ..FaceConfig::default()
        })
        .expect("face should build")
    }

    fn tick_native(face: &mut WasmWatchFace) {
        face.orchestrator
            .run_wake(&mut face.region, &mut face.panel)
            .expect("wake");
    }

    #[test]
    fn from_config_rejects_invalid_settings() {
        let result = WasmWatchFace::from_config(FaceConfig {
            buffer_capacity: 0,
            ..FaceConfig::default()
        });
        assert!(result.is_err(), "expected capacity error");
    }

    #[test]
    fn region_is_sized_for_capacity() {
        let face = small_face();
        assert_eq!(face.region_bytes().len(), 12 + 12 * 25 + 13);
        assert_eq!(face.width(), 200);
        assert_eq!(face.height(), 200);
        assert_eq!(face.frame_bits().len(), 25 * 200);
    }

    #[test]
    fn wakes_accumulate_until_capacity() {
        let mut face = small_face();
        assert_eq!(face.point_count().ok(), Some(0));
        tick_native(&mut face);
        assert_eq!(face.point_count().ok(), Some(10));
        tick_native(&mut face);
        tick_native(&mut face);
        assert_eq!(face.point_count().ok(), Some(25));
        assert!(face.panel.count_set() > 0);
    }

    #[test]
    fn reset_forgets_trajectory() {
        let mut face = small_face();
        tick_native(&mut face);
        face.reset();
        assert_eq!(face.point_count().ok(), Some(0));
        assert_eq!(face.panel.count_set(), 0);
    }
}
