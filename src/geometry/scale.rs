use super::rect::{Rect, Size};

// ============================================================================
// Device <-> viewport scale transform
// ============================================================================

/// Linear mapping between device-native pixels and a rendering viewport.
///
/// Each axis scales independently; no aspect-ratio correction is applied.
/// When the device size is unknown (no scan yet) the transform is the
/// identity and `is_identity()` reports it so callers can skip positioning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleTransform {
    pub device: Size,
    pub viewport: Size,
}

impl ScaleTransform {
    pub fn new(device: Size, viewport: Size) -> Self {
        Self { device, viewport }
    }

    /// True when the device size is degenerate.
    pub fn is_identity(&self) -> bool {
        self.device.is_degenerate()
    }

    /// Called synchronously on every viewport resize.
    pub fn resize_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn scale(&self) -> (f64, f64) {
        if self.is_identity() {
            return (1.0, 1.0);
        }
        (
            self.viewport.w / self.device.w,
            self.viewport.h / self.device.h,
        )
    }

    pub fn to_viewport(&self, rect: &Rect) -> Rect {
        to_viewport(rect, self.device, self.viewport)
    }

    pub fn to_device(&self, rect: &Rect) -> Rect {
        to_device(rect, self.device, self.viewport)
    }

    /// Map a viewport point (e.g. a click) back to device pixels.
    pub fn point_to_device(&self, x: f64, y: f64) -> (f64, f64) {
        let r = self.to_device(&Rect::new(x, y, 0.0, 0.0));
        (r.x, r.y)
    }
}

pub fn to_viewport(rect: &Rect, device: Size, viewport: Size) -> Rect {
    if device.is_degenerate() {
        return *rect;
    }
    let sx = viewport.w / device.w;
    let sy = viewport.h / device.h;
    Rect {
        x: rect.x * sx,
        y: rect.y * sy,
        w: rect.w * sx,
        h: rect.h * sy,
    }
}

/// Inverse of `to_viewport`. A degenerate viewport also yields the identity,
/// since there is nothing to divide by.
pub fn to_device(rect: &Rect, device: Size, viewport: Size) -> Rect {
    if device.is_degenerate() || viewport.is_degenerate() {
        return *rect;
    }
    let sx = viewport.w / device.w;
    let sy = viewport.h / device.h;
    Rect {
        x: rect.x / sx,
        y: rect.y / sy,
        w: rect.w / sx,
        h: rect.h / sy,
    }
}
