//! Horizontal zoom and pan for the line chart.
//!
//! The model follows the usual wheel/drag zoom conventions: a transform
//! `(k, x)` maps a base pixel `p` to `p * k + x`; wheel gestures scale about
//! the pointer and every update is constrained so the view never leaves the
//! plot extent.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scale::LinearScale;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, x: 0.0 };

    pub fn apply_x(&self, pixel: f64) -> f64 {
        pixel * self.k + self.x
    }

    pub fn invert_x(&self, pixel: f64) -> f64 {
        (pixel - self.x) / self.k
    }

    /// Shifts by `dx` base pixels, scaled by `k`.
    pub fn translate(&self, dx: f64) -> Self {
        Self {
            k: self.k,
            x: self.x + self.k * dx,
        }
    }

    /// The scale whose domain is what's currently visible through this transform.
    pub fn rescale_x(&self, base: &LinearScale) -> LinearScale {
        let (r0, r1) = base.range;
        let d0 = base.invert(self.invert_x(r0));
        let d1 = base.invert(self.invert_x(r1));
        base.with_domain((d0, d1))
    }

    pub fn is_zoomed(&self) -> bool {
        self.k > 1.0 + 1e-9
    }
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    fn factor(self) -> f64 {
        match self {
            DeltaMode::Pixel => 0.002,
            DeltaMode::Line => 0.05,
            DeltaMode::Page => 1.0,
        }
    }
}

/// Smallest zoom-in limit for `distinct` x values, or `None` when there are
/// too few values to zoom at all.
pub fn max_zoom_for(distinct: usize) -> Option<f64> {
    if distinct < 3 {
        None
    } else {
        Some((distinct - 1) as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBehavior {
    /// Plot area in pixels, `(left, right)`.
    pub extent: (f64, f64),
    pub scale_extent: (f64, f64),
    pub transform: ZoomTransform,
}

impl ZoomBehavior {
    pub fn new(extent: (f64, f64), max_k: f64) -> Self {
        Self {
            extent,
            scale_extent: (1.0, max_k.max(1.0)),
            transform: ZoomTransform::IDENTITY,
        }
    }

    pub fn enabled(&self) -> bool {
        self.scale_extent.1 > 1.0
    }

    fn constrain(&self, t: ZoomTransform) -> ZoomTransform {
        let (left, right) = self.extent;
        let dx0 = t.invert_x(left) - left;
        let dx1 = t.invert_x(right) - right;
        let shift = if dx1 > dx0 {
            (dx0 + dx1) / 2.0
        } else {
            let low = dx0.min(0.0);
            if low != 0.0 {
                low
            } else {
                dx1.max(0.0)
            }
        };
        t.translate(shift)
    }

    /// Sets the scale keeping the base point under `pointer` fixed.
    pub fn scale_to(&mut self, k: f64, pointer: f64) -> bool {
        if !self.enabled() {
            return false;
        }
        let k = k.clamp(self.scale_extent.0, self.scale_extent.1);
        let anchor = self.transform.invert_x(pointer);
        let next = self.constrain(ZoomTransform {
            k,
            x: pointer - anchor * k,
        });
        self.update(next)
    }

    pub fn wheel(&mut self, pointer: f64, delta_y: f64, mode: DeltaMode) -> bool {
        let k = self.transform.k * 2f64.powf(-delta_y * mode.factor());
        self.scale_to(k, pointer)
    }

    pub fn pan(&mut self, dx: f64) -> bool {
        if !self.enabled() {
            return false;
        }
        let next = self.constrain(ZoomTransform {
            k: self.transform.k,
            x: self.transform.x + dx,
        });
        self.update(next)
    }

    pub fn reset(&mut self) -> bool {
        self.update(ZoomTransform::IDENTITY)
    }

    fn update(&mut self, next: ZoomTransform) -> bool {
        let changed = next != self.transform;
        self.transform = next;
        changed
    }
}

/// The x-window currently visible in a zoomed chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub axis_key: String,
    pub min: f64,
    pub max: f64,
}

impl VisibleRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn snap(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() < 1e-9 {
        nearest
    } else {
        value
    }
}

/// `Some` with the whole axis values in view while zoomed, `None` at k = 1.
pub fn visible_range(
    axis_key: &str,
    base: &LinearScale,
    transform: &ZoomTransform,
) -> Option<VisibleRange> {
    if !transform.is_zoomed() {
        return None;
    }
    let (b0, b1) = base.domain;
    let (lo_bound, hi_bound) = (b0.min(b1).ceil(), b0.max(b1).floor());
    let domain = transform.rescale_x(base).domain;
    let (d0, d1) = (domain.0.min(domain.1), domain.0.max(domain.1));
    let mut min = snap(d0).ceil().max(lo_bound);
    let mut max = snap(d1).floor().min(hi_bound);
    if min > max {
        let centre = ((d0 + d1) / 2.0).round().clamp(lo_bound, hi_bound);
        min = centre;
        max = centre;
    }
    debug!(axis_key, min, max, k = transform.k, "zoom range");
    Some(VisibleRange {
        axis_key: axis_key.to_string(),
        min,
        max,
    })
}
