use crate::error::ViewError;
use crate::geometry::rect::{Rect, Size};
use crate::geometry::scale::ScaleTransform;
use crate::scan::scan_model::{Element, ElementId};

use super::renderer::ViewRenderer;

/// Bounding box drawn over the screen capture.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBox {
    pub element_id: ElementId,
    /// One-based number shown in the box corner.
    pub label: String,
    pub device: Rect,
    /// Viewport placement; `None` until a device size is known.
    pub position: Option<Rect>,
    pub active: bool,
}

/// Overlay of element boxes on the screen capture.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    transform: ScaleTransform,
    boxes: Vec<OverlayBox>,
    active: Option<ElementId>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_device_size(&mut self, device: Size) {
        self.transform.device = device;
        self.update_all_positions();
    }

    /// Resize is the only event that invalidates box positions.
    pub fn resize_viewport(&mut self, viewport: Size) {
        self.transform.resize_viewport(viewport);
        self.update_all_positions();
    }

    pub fn transform(&self) -> &ScaleTransform {
        &self.transform
    }

    pub fn boxes(&self) -> &[OverlayBox] {
        &self.boxes
    }

    pub fn box_for(&self, id: ElementId) -> Option<&OverlayBox> {
        self.boxes.iter().find(|b| b.element_id == id)
    }

    /// Smallest box containing the viewport point, so nested elements win
    /// over the containers around them.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ElementId> {
        self.boxes
            .iter()
            .filter_map(|b| b.position.map(|p| (b.element_id, p)))
            .filter(|(_, p)| p.contains(x, y))
            .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
            .map(|(id, _)| id)
    }

    fn update_all_positions(&mut self) {
        let transform = self.transform;
        for b in &mut self.boxes {
            b.position = place(&transform, &b.device);
        }
    }
}

fn place(transform: &ScaleTransform, device: &Rect) -> Option<Rect> {
    if transform.is_identity() || transform.viewport.is_degenerate() {
        return None;
    }
    Some(transform.to_viewport(device))
}

impl ViewRenderer for OverlayRenderer {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn render(&mut self, elements: &[Element]) -> Result<(), ViewError> {
        self.boxes = elements
            .iter()
            .filter(|el| !el.deleted)
            .filter_map(|el| {
                el.bounds.map(|bounds| OverlayBox {
                    element_id: el.id,
                    label: (el.id.0 + 1).to_string(),
                    device: bounds,
                    position: None,
                    active: self.active == Some(el.id),
                })
            })
            .collect();

        if let Some(active) = self.active {
            if self.box_for(active).is_none() {
                self.active = None;
            }
        }

        self.update_all_positions();
        Ok(())
    }

    fn on_selection_changed(
        &mut self,
        new: Option<ElementId>,
        _old: Option<ElementId>,
    ) -> Result<(), ViewError> {
        for b in self.boxes.iter_mut().filter(|b| b.active) {
            b.active = false;
        }
        self.active = None;

        let Some(id) = new else {
            return Ok(());
        };

        let transform = self.transform;
        // Elements without bounds have no box.
        if let Some(b) = self.boxes.iter_mut().find(|b| b.element_id == id) {
            b.active = true;
            b.position = place(&transform, &b.device);
            self.active = Some(id);
        }
        Ok(())
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn clear(&mut self) {
        self.boxes.clear();
        self.active = None;
    }
}
