//! State carried between wakes and its byte layout in retained memory.
//!
//! Layout (little endian, no padding):
//!
//! | field         | size    |
//! |---------------|---------|
//! | position xyz  | 3 × f32 |
//! | buffer slots  | C × 3 × f32 |
//! | write index   | u32     |
//! | count         | u32     |
//! | rotation θ    | f32     |
//! | initialized   | u8      |
//!
//! Retained memory comes up zeroed, so a zero flag byte means "never ran".

use crate::lorenz::{State3, TrajectoryPoint};
use crate::trajectory::TrajectoryStore;
use crate::view::ViewState;
use thiserror::Error;

const POINT_BYTES: usize = 12;
const FLAG_SET: u8 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersistError {
    #[error("persistent region holds {actual} bytes but {needed} are required")]
    RegionTooSmall { needed: usize, actual: usize },
    #[error("stored cursor (index {index}, count {count}) is invalid for capacity {capacity}")]
    InconsistentCursor {
        index: u32,
        count: u32,
        capacity: usize,
    },
    #[error("unrecognised initialized flag {0:#04x}")]
    InvalidFlag(u8),
    #[error("stored {0} is not finite")]
    NonFinite(&'static str),
}

/// Bytes needed to persist a buffer of `capacity` points.
pub const fn region_size(capacity: usize) -> usize {
    POINT_BYTES + capacity * POINT_BYTES + 4 + 4 + 4 + 1
}

/// Everything the face remembers from one wake to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistentState {
    pub position: State3,
    pub trajectory: TrajectoryStore,
    pub view: ViewState,
    pub initialized: bool,
}

impl PersistentState {
    /// A state that has never run. The orchestrator seeds it on first use.
    pub fn new(capacity: usize) -> Self {
        Self {
            position: State3::default(),
            trajectory: TrajectoryStore::new(capacity),
            view: ViewState::default(),
            initialized: false,
        }
    }

    /// Resets to the seed position, an empty buffer and θ = 0.
    pub fn seed(&mut self) {
        self.position = State3::SEED;
        self.trajectory = TrajectoryStore::new(self.trajectory.capacity());
        self.view = ViewState::default();
        self.initialized = true;
    }

    pub fn encoded_len(&self) -> usize {
        region_size(self.trajectory.capacity())
    }

    /// Writes the state into `region`. Bytes past the layout are untouched.
    pub fn save_to(&self, region: &mut [u8]) -> Result<(), PersistError> {
        let needed = self.encoded_len();
        if region.len() < needed {
            return Err(PersistError::RegionTooSmall {
                needed,
                actual: region.len(),
            });
        }
        let mut w = Writer {
            buf: &mut region[..needed],
            pos: 0,
        };
        w.point(self.position);
        for &slot in self.trajectory.slots() {
            w.point(slot);
        }
        // Capacity is validated to fit in u32 by FaceConfig::validate.
        w.u32(self.trajectory.write_index() as u32);
        w.u32(self.trajectory.len() as u32);
        w.f32(self.view.theta());
        w.u8(if self.initialized { FLAG_SET } else { 0 });
        Ok(())
    }

    /// Reads a state for a buffer of `capacity` points.
    pub fn load_from(region: &[u8], capacity: usize) -> Result<Self, PersistError> {
        let capacity = capacity.max(1);
        let needed = region_size(capacity);
        if region.len() < needed {
            return Err(PersistError::RegionTooSmall {
                needed,
                actual: region.len(),
            });
        }
        let mut r = Reader {
            buf: &region[..needed],
            pos: 0,
        };
        let position = r.point();
        let slots: Box<[TrajectoryPoint]> = (0..capacity).map(|_| r.point()).collect();
        let index = r.u32();
        let count = r.u32();
        let theta = r.f32();
        match r.u8() {
            0 => Ok(Self::new(capacity)),
            FLAG_SET => {
                if !position.to_array().iter().all(|v| v.is_finite()) {
                    return Err(PersistError::NonFinite("position"));
                }
                if !theta.is_finite() {
                    return Err(PersistError::NonFinite("rotation"));
                }
                let trajectory =
                    TrajectoryStore::from_raw_parts(slots, index as usize, count as usize)
                        .ok_or(PersistError::InconsistentCursor {
                            index,
                            count,
                            capacity,
                        })?;
                Ok(Self {
                    position,
                    trajectory,
                    view: ViewState::new(theta),
                    initialized: true,
                })
            }
            other => Err(PersistError::InvalidFlag(other)),
        }
    }
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn u8(&mut self, v: u8) {
        self.put(&[v]);
    }

    fn u32(&mut self, v: u32) {
        self.put(&v.to_le_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.put(&v.to_le_bytes());
    }

    fn point(&mut self, p: State3) {
        for v in p.to_array() {
            self.f32(v);
        }
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }

    fn point(&mut self) -> State3 {
        State3::new(self.f32(), self.f32(), self.f32())
    }
}
