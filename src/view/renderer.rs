use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ViewError;
use crate::scan::scan_model::{Element, ElementId};
use crate::selection::store::{SelectionStore, StoreChange, StoreField, SubscriptionId};

/// Capability shared by the overlay, list and tree views.
pub trait ViewRenderer {
    fn name(&self) -> &'static str;

    /// Rebuild visual units from the element collection.
    fn render(&mut self, elements: &[Element]) -> Result<(), ViewError>;

    /// Move the active marker from `old` to `new`, revealing `new` when the
    /// panel is visible. Must not touch any other view.
    fn on_selection_changed(
        &mut self,
        new: Option<ElementId>,
        old: Option<ElementId>,
    ) -> Result<(), ViewError>;

    /// Element whose unit currently carries the active marker.
    fn active_element(&self) -> Option<ElementId>;

    /// Drop every visual unit.
    fn clear(&mut self);

    fn set_visible(&mut self, _visible: bool) {}
}

/// Subscribe a renderer to both store fields. The renderer is borrowed only
/// for the duration of each callback.
pub fn attach<R>(store: &mut SelectionStore, renderer: &Rc<RefCell<R>>) -> [SubscriptionId; 2]
where
    R: ViewRenderer + 'static,
{
    let on_select = Rc::clone(renderer);
    let selected = store.subscribe(StoreField::Selected, move |change| {
        let StoreChange::Selected { new, old } = *change else {
            return Ok(());
        };
        let mut view = borrow_view(&on_select)?;
        view.on_selection_changed(new, old)
    });

    let on_elements = Rc::clone(renderer);
    let elements = store.subscribe(StoreField::Elements, move |change| {
        let StoreChange::Elements(elements) = *change else {
            return Ok(());
        };
        let mut view = borrow_view(&on_elements)?;
        view.render(elements)
    });

    [selected, elements]
}

fn borrow_view<R: ViewRenderer>(renderer: &Rc<RefCell<R>>) -> Result<std::cell::RefMut<'_, R>, ViewError> {
    renderer.try_borrow_mut().map_err(|_| ViewError::Render {
        view: "renderer",
        message: "view is already borrowed (re-entrant update)".to_string(),
    })
}
