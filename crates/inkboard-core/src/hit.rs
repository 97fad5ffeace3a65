//! Hit testing: world point → element lookup.
//!
//! Reverse-walks the store (front-to-back) so the most recently inserted
//! element under the point wins.

use crate::element::{Element, ElementId};
use crate::store::ElementStore;
use kurbo::Point;

/// Find the topmost element whose bounding box contains `point`.
/// Returns `None` if the point is over empty canvas.
pub fn hit_test(store: &ElementStore, point: Point) -> Option<&Element> {
    store.elements().iter().rev().find(|e| e.contains(point))
}

/// Find every element under `point`, topmost first.
pub fn hit_test_all(store: &ElementStore, point: Point) -> Vec<&ElementId> {
    store
        .elements()
        .iter()
        .rev()
        .filter(|e| e.contains(point))
        .map(|e| &e.id)
        .collect()
}
