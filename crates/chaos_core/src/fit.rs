//! Auto-fit of the projected trajectory into the drawing region.

use crate::trajectory::TrajectoryStore;
use crate::view::{Point2D, Projector};
use serde::{Deserialize, Serialize};

/// Smallest span an axis of the bounding box may have before scaling.
pub const MIN_RANGE: f32 = 0.1;

/// An integer display coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Where on the display the trajectory is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRegion {
    /// Extent, in display units, the longer bounding-box axis is scaled to.
    pub target_span: f32,
    pub center: Point2D,
    /// Inclusive inset bounds every mapped point is clamped into.
    pub min: Point2D,
    pub max: Point2D,
}

impl FitRegion {
    /// Region centred on a `width`×`height` display, inset by `margin`.
    pub fn for_display(width: u32, height: u32, margin: u32, target_span: f32) -> Self {
        let (w, h, m) = (width as f32, height as f32, margin as f32);
        Self {
            target_span,
            center: Point2D::new(w / 2.0, h / 2.0),
            min: Point2D::new(m, m),
            max: Point2D::new((w - m).max(m), (h - m).max(m)),
        }
    }
}

/// Axis-aligned bounds of a projected point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// `None` for an empty set.
    pub fn of(points: impl IntoIterator<Item = Point2D>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    min_x: p.x,
                    max_x: p.x,
                    min_y: p.y,
                    max_y: p.y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(p.x),
                    max_x: b.max_x.max(p.x),
                    min_y: b.min_y.min(p.y),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Width and height, each at least [`MIN_RANGE`].
    pub fn ranges(&self) -> (f32, f32) {
        (
            (self.max_x - self.min_x).max(MIN_RANGE),
            (self.max_y - self.min_y).max(MIN_RANGE),
        )
    }
}

/// Uniform scale and offset taking projected points to display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFit {
    pub scale: f32,
    pub source_center: Point2D,
    pub region: FitRegion,
}

impl FrameFit {
    pub fn new(bounds: &Bounds, region: FitRegion) -> Self {
        let (range_x, range_y) = bounds.ranges();
        let scale = (region.target_span / range_x).min(region.target_span / range_y);
        Self {
            scale,
            source_center: bounds.center(),
            region,
        }
    }

    /// Maps into display units, clamped to the region's inset bounds.
    ///
    /// A diverged trajectory can produce NaN here; it lands on the region's
    /// minimum corner so the result is always inside the inset.
    pub fn map(&self, p: Point2D) -> Point2D {
        let r = &self.region;
        let x = (p.x - self.source_center.x) * self.scale + r.center.x;
        let y = (p.y - self.source_center.y) * self.scale + r.center.y;
        Point2D::new(clamp_into(x, r.min.x, r.max.x), clamp_into(y, r.min.y, r.max.y))
    }

    /// Maps to an integer pixel, truncating the fractional part.
    pub fn to_screen(&self, p: Point2D) -> ScreenPoint {
        let mapped = self.map(p);
        ScreenPoint::new(mapped.x as i32, mapped.y as i32)
    }
}

fn clamp_into(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        lo
    } else {
        v.clamp(lo, hi)
    }
}

/// One cycle's fitted frame: the screen positions of every live point,
/// oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub fit: FrameFit,
    pub points: Vec<ScreenPoint>,
}

/// Projects and fits the whole store. Returns `None` when there is nothing
/// to draw.
pub fn fit_frame(
    store: &TrajectoryStore,
    projector: &Projector,
    region: FitRegion,
) -> Option<Frame> {
    let projected: Vec<Point2D> = store.iter().map(|p| projector.project(p)).collect();
    let bounds = Bounds::of(projected.iter().copied())?;
    let fit = FrameFit::new(&bounds, region);
    let points = projected.iter().map(|&p| fit.to_screen(p)).collect();
    Some(Frame { fit, points })
}
