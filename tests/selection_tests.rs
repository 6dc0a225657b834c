use std::cell::{Cell, RefCell};
use std::rc::Rc;

use red_pather::error::{CoreError, ViewError};
use red_pather::scan::scan_model::ElementId;
use red_pather::selection::store::{SelectionStore, StoreChange, StoreField};

use crate::common::fixtures::three_elements;

mod common;

fn counting(store: &mut SelectionStore, field: StoreField) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    store.subscribe(field, move |_| {
        c.set(c.get() + 1);
        Ok(())
    });
    count
}

// ============================================================================
// Selection changes
// ============================================================================

#[test]
fn setting_same_value_twice_notifies_once() {
    let mut store = SelectionStore::new(three_elements());
    let calls = counting(&mut store, StoreField::Selected);

    assert!(store.set_selected(Some(ElementId(1))).unwrap());
    assert!(!store.set_selected(Some(ElementId(1))).unwrap(), "second set is a no-op");
    assert_eq!(calls.get(), 1);
}

#[test]
fn subscribers_receive_new_and_old_values_in_order() {
    let mut store = SelectionStore::new(three_elements());
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();

    for name in ["first", "second"] {
        let log = Rc::clone(&seen);
        store.subscribe(StoreField::Selected, move |change| {
            if let StoreChange::Selected { new, old } = *change {
                log.borrow_mut().push(format!("{}:{:?}->{:?}", name, old, new));
            }
            Ok(())
        });
    }

    store.set_selected(Some(ElementId(0))).unwrap();
    store.set_selected(Some(ElementId(2))).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            "first:None->Some(ElementId(0))",
            "second:None->Some(ElementId(0))",
            "first:Some(ElementId(0))->Some(ElementId(2))",
            "second:Some(ElementId(0))->Some(ElementId(2))",
        ]
    );
}

#[test]
fn failing_subscriber_does_not_stop_the_others() {
    let mut store = SelectionStore::new(three_elements());
    store.subscribe(StoreField::Selected, |_| {
        Err(ViewError::Render {
            view: "broken",
            message: "boom".to_string(),
        })
    });
    let calls = counting(&mut store, StoreField::Selected);

    assert!(store.set_selected(Some(ElementId(0))).unwrap());
    assert_eq!(calls.get(), 1, "later subscriber still ran");
    assert_eq!(store.selected(), Some(ElementId(0)));
}

#[test]
fn subscribers_only_hear_their_field() {
    let mut store = SelectionStore::new(three_elements());
    let selected_calls = counting(&mut store, StoreField::Selected);
    let element_calls = counting(&mut store, StoreField::Elements);

    store.set_selected(Some(ElementId(0))).unwrap();
    assert_eq!(selected_calls.get(), 1);
    assert_eq!(element_calls.get(), 0);
}

#[test]
fn unsubscribed_callbacks_stop_running() {
    let mut store = SelectionStore::new(three_elements());
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let id = store.subscribe(StoreField::Selected, move |_| {
        c.set(c.get() + 1);
        Ok(())
    });

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id), "already removed");
    store.set_selected(Some(ElementId(0))).unwrap();
    assert_eq!(count.get(), 0);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn unknown_id_is_rejected_without_change() {
    let mut store = SelectionStore::new(three_elements());
    let calls = counting(&mut store, StoreField::Selected);

    let err = store.set_selected(Some(ElementId(9))).unwrap_err();
    assert!(matches!(err, CoreError::UnknownElement(ElementId(9))), "got {:?}", err);
    assert_eq!(store.selected(), None);
    assert_eq!(calls.get(), 0);
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn deleting_the_selected_element_clears_the_selection() {
    let mut store = SelectionStore::new(three_elements());
    let changes: Rc<RefCell<Vec<(Option<ElementId>, Option<ElementId>)>>> = Rc::default();
    let log = Rc::clone(&changes);
    store.subscribe(StoreField::Selected, move |change| {
        if let StoreChange::Selected { new, old } = *change {
            log.borrow_mut().push((new, old));
        }
        Ok(())
    });
    let element_calls = counting(&mut store, StoreField::Elements);

    store.set_selected(Some(ElementId(1))).unwrap();
    assert!(store.delete_element(ElementId(1)).unwrap());

    assert_eq!(store.selected(), None);
    assert_eq!(changes.borrow().last(), Some(&(None, Some(ElementId(1)))));
    assert_eq!(element_calls.get(), 1);
    assert!(store.element(ElementId(1)).unwrap().deleted);
    assert_eq!(store.active_elements().count(), 2);
}

#[test]
fn deleted_element_cannot_be_selected() {
    let mut store = SelectionStore::new(three_elements());
    store.delete_element(ElementId(0)).unwrap();

    let err = store.set_selected(Some(ElementId(0))).unwrap_err();
    assert!(matches!(err, CoreError::DeletedElement(_)), "got {:?}", err);
    assert!(!store.delete_element(ElementId(0)).unwrap(), "second delete is a no-op");
}

#[test]
fn ids_are_not_reused_after_deletion() {
    let mut store = SelectionStore::new(three_elements());
    store.delete_element(ElementId(0)).unwrap();

    let ids: Vec<_> = store.active_elements().map(|e| e.id).collect();
    assert_eq!(ids, vec![ElementId(1), ElementId(2)]);
    assert_eq!(store.get().elements.len(), 3, "deleted elements stay in the collection");
}

#[test]
fn clear_drops_selection_and_elements() {
    let mut store = SelectionStore::new(three_elements());
    store.set_selected(Some(ElementId(2))).unwrap();
    let selected_calls = counting(&mut store, StoreField::Selected);

    store.clear();
    assert_eq!(store.selected(), None);
    assert!(store.elements().is_empty());
    assert_eq!(selected_calls.get(), 1);
}
