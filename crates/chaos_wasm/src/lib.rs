//! WASM bridge for previewing the Chaos watch face in a browser.

mod face;

pub use face::WasmWatchFace;
