use tracing::{debug, warn};

use crate::error::{CoreError, ViewError};
use crate::scan::scan_model::{Element, ElementId};

// ============================================================================
// Selection store: single source of truth for the selected element
// ============================================================================

/// Store field a subscriber watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreField {
    Selected,
    Elements,
}

/// Change delivered to subscribers of the matching field.
#[derive(Debug, Clone, Copy)]
pub enum StoreChange<'a> {
    Selected {
        new: Option<ElementId>,
        old: Option<ElementId>,
    },
    Elements(&'a [Element]),
}

impl StoreChange<'_> {
    pub fn field(&self) -> StoreField {
        match self {
            StoreChange::Selected { .. } => StoreField::Selected,
            StoreChange::Elements(_) => StoreField::Elements,
        }
    }
}

pub type StoreCallback = Box<dyn FnMut(&StoreChange<'_>) -> Result<(), ViewError>>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    field: StoreField,
    callback: StoreCallback,
}

/// Borrowed view of the store state.
#[derive(Debug, Clone, Copy)]
pub struct SelectionSnapshot<'a> {
    pub elements: &'a [Element],
    pub selected: Option<ElementId>,
}

impl SelectionSnapshot<'_> {
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected?;
        self.elements.iter().find(|el| el.id == id)
    }
}

/// Holds the element collection and the selected id, and notifies
/// subscribers synchronously, in registration order, on every change.
///
/// Invariant: `selected`, when set, names a present, non-deleted element.
pub struct SelectionStore {
    elements: Vec<Element>,
    selected: Option<ElementId>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl SelectionStore {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            selected: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn get(&self) -> SelectionSnapshot<'_> {
        SelectionSnapshot {
            elements: &self.elements,
            selected: self.selected,
        }
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn active_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| !el.deleted)
    }

    pub fn subscribe<F>(&mut self, field: StoreField, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange<'_>) -> Result<(), ViewError> + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            field,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Change the selection. Setting the current value again is a no-op and
    /// returns `Ok(false)`; otherwise every `Selected` subscriber has run by
    /// the time this returns `Ok(true)`.
    pub fn set_selected(&mut self, id: Option<ElementId>) -> Result<bool, CoreError> {
        if id == self.selected {
            return Ok(false);
        }

        if let Some(id) = id {
            match self.element(id) {
                None => return Err(CoreError::UnknownElement(id)),
                Some(el) if el.deleted => return Err(CoreError::DeletedElement(id)),
                Some(_) => {}
            }
        }

        let old = self.selected;
        self.selected = id;
        debug!(new = ?id, old = ?old, "selection changed");
        notify(
            &mut self.subscribers,
            &StoreChange::Selected { new: id, old },
        );
        Ok(true)
    }

    /// Flag an element as deleted. A deleted element that was selected is
    /// deselected first, so the store never points at a deleted element.
    /// Returns `Ok(false)` if it was already deleted.
    pub fn delete_element(&mut self, id: ElementId) -> Result<bool, CoreError> {
        let element = self
            .elements
            .iter_mut()
            .find(|el| el.id == id)
            .ok_or(CoreError::UnknownElement(id))?;
        if element.deleted {
            return Ok(false);
        }
        element.deleted = true;

        if self.selected == Some(id) {
            self.selected = None;
            notify(
                &mut self.subscribers,
                &StoreChange::Selected {
                    new: None,
                    old: Some(id),
                },
            );
        }

        notify(&mut self.subscribers, &StoreChange::Elements(&self.elements));
        Ok(true)
    }

    /// Drop all elements and the selection.
    pub fn clear(&mut self) {
        if let Some(old) = self.selected.take() {
            notify(
                &mut self.subscribers,
                &StoreChange::Selected {
                    new: None,
                    old: Some(old),
                },
            );
        }
        if !self.elements.is_empty() {
            self.elements.clear();
            notify(&mut self.subscribers, &StoreChange::Elements(&self.elements));
        }
    }
}

/// Run every subscriber of the change's field. A failing subscriber is
/// logged and skipped; the rest still run. Returns the failure count.
fn notify(subscribers: &mut [Subscriber], change: &StoreChange<'_>) -> usize {
    let field = change.field();
    let mut failures = 0;

    for sub in subscribers.iter_mut().filter(|s| s.field == field) {
        if let Err(e) = (sub.callback)(change) {
            failures += 1;
            warn!(subscription = sub.id.0, field = ?field, error = %e, "store subscriber failed");
        }
    }

    failures
}
