use crate::error::ViewError;
use crate::scan::scan_model::{Element, ElementId};

use super::renderer::ViewRenderer;

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub element_id: ElementId,
    /// `#01`, `#02`, ...
    pub index_label: String,
    pub badge: &'static str,
    pub display_name: String,
    pub locator_expression: String,
    pub text: Option<String>,
    pub active: bool,
    /// One-shot highlight applied when the row is scrolled to.
    pub flash: bool,
}

/// Scrollable itemized element panel.
#[derive(Debug)]
pub struct ListRenderer {
    rows: Vec<ListRow>,
    visible: bool,
    active: Option<ElementId>,
    scrolled_to: Option<ElementId>,
    rendered: bool,
}

impl Default for ListRenderer {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            visible: true,
            active: None,
            scrolled_to: None,
            rendered: false,
        }
    }
}

impl ListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn row_for(&self, id: ElementId) -> Option<&ListRow> {
        self.rows.iter().find(|r| r.element_id == id)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last row scrolled into view.
    pub fn scrolled_to(&self) -> Option<ElementId> {
        self.scrolled_to
    }
}

impl ViewRenderer for ListRenderer {
    fn name(&self) -> &'static str {
        "list"
    }

    fn render(&mut self, elements: &[Element]) -> Result<(), ViewError> {
        self.rows = elements
            .iter()
            .filter(|el| !el.deleted)
            .map(|el| ListRow {
                element_id: el.id,
                index_label: format!("#{:02}", el.id.0 + 1),
                badge: el.strategy.badge(),
                display_name: el.display_name.clone(),
                locator_expression: el.locator_expression.clone(),
                text: el.text.clone(),
                active: self.active == Some(el.id),
                flash: false,
            })
            .collect();

        if let Some(active) = self.active {
            if self.row_for(active).is_none() {
                self.active = None;
            }
        }
        self.rendered = true;
        Ok(())
    }

    fn on_selection_changed(
        &mut self,
        new: Option<ElementId>,
        _old: Option<ElementId>,
    ) -> Result<(), ViewError> {
        for row in self.rows.iter_mut().filter(|r| r.active || r.flash) {
            row.active = false;
            row.flash = false;
        }
        self.active = None;

        let Some(id) = new else {
            return Ok(());
        };

        let visible = self.visible;
        match self.rows.iter_mut().find(|r| r.element_id == id) {
            Some(row) => {
                row.active = true;
                if visible {
                    row.flash = true;
                    self.scrolled_to = Some(id);
                }
                self.active = Some(id);
                Ok(())
            }
            // Every live element has a row once rendered.
            None if self.rendered => Err(ViewError::MissingUnit { view: "list", id }),
            None => Ok(()),
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.active = None;
        self.scrolled_to = None;
        self.rendered = false;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
