//! Ordered element storage.
//!
//! The store is a plain vector: insertion order is paint order, so the last
//! element is drawn on top and is hit-tested first.

use crate::element::{Element, ElementId, ElementPatch};
use kurbo::Rect;
use std::collections::HashSet;
use thiserror::Error;

/// Errors from store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Element already exists: {0}")]
    DuplicateId(ElementId),
    #[error("Element not found: {0}")]
    NotFound(ElementId),
}

/// Errors from reading or writing a JSON snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Duplicate element id in snapshot: {0}")]
    DuplicateId(ElementId),
    #[error("Element {0} has negative or non-finite geometry")]
    InvalidGeometry(ElementId),
}

/// Insertion-ordered collection of elements with unique ids.
///
/// Callers only ever get shared references; every mutation goes through
/// [`create`](Self::create), [`update`](Self::update),
/// [`delete`](Self::delete) or [`clear`](Self::clear) and bumps the
/// [`revision`](Self::revision).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStore {
    elements: Vec<Element>,
    revision: u64,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element on top of the z-order.
    pub fn create(&mut self, element: Element) -> Result<(), StoreError> {
        if self.contains(&element.id) {
            return Err(StoreError::DuplicateId(element.id));
        }
        self.elements.push(element);
        self.revision += 1;
        Ok(())
    }

    /// Merge the fields present in `patch` into the element with `id`.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> Result<&Element, StoreError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.revision += 1;
        let element = &mut self.elements[index];
        element.apply(patch);
        Ok(element)
    }

    /// Remove the element with `id`, returning it.
    pub fn delete(&mut self, id: &ElementId) -> Result<Element, StoreError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.revision += 1;
        Ok(self.elements.remove(index))
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.revision += 1;
    }

    /// Replace the contents with another store's elements.
    pub(crate) fn replace_with(&mut self, other: ElementStore) {
        self.elements = other.elements;
        self.revision += 1;
    }

    /// Get an element by id.
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of an element in the z-order (0 = bottom).
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    /// Elements in z-order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Counter that changes on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get the bounding box of all elements.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .map(Element::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Serialize the elements to a pretty JSON array.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(&self.elements).map_err(SnapshotError::Serialize)
    }

    /// Parse and validate a JSON array of elements.
    ///
    /// Fails on malformed JSON, duplicate ids and negative or non-finite
    /// geometry; a store is only produced when every element is valid.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let elements: Vec<Element> = serde_json::from_str(json).map_err(SnapshotError::Parse)?;

        let mut seen = HashSet::with_capacity(elements.len());
        for element in &elements {
            if !seen.insert(&element.id) {
                return Err(SnapshotError::DuplicateId(element.id.clone()));
            }
            if !element.has_valid_geometry() {
                return Err(SnapshotError::InvalidGeometry(element.id.clone()));
            }
        }

        Ok(Self {
            elements,
            revision: 0,
        })
    }
}

impl<'a> IntoIterator for &'a ElementStore {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, StickyColor};
    use kurbo::{Point, Size};

    fn rect(id: &str, x: f64, y: f64) -> Element {
        Element::new(
            ElementId::new(id),
            ElementKind::Rectangle,
            Point::new(x, y),
            Size::new(100.0, 100.0),
        )
    }

    #[test]
    fn test_store_creation() {
        let store = ElementStore::new();
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_create_appends_in_order() {
        let mut store = ElementStore::new();
        store.create(rect("a", 0.0, 0.0)).unwrap();
        store.create(rect("b", 50.0, 50.0)).unwrap();

        let ids: Vec<_> = store.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.index_of(&ElementId::new("b")), Some(1));
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let mut store = ElementStore::new();
        store.create(rect("a", 0.0, 0.0)).unwrap();
        let err = store.create(rect("a", 5.0, 5.0)).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(ElementId::new("a")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&ElementId::new("a")).unwrap().origin(), Point::ZERO);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = ElementStore::new();
        store.create(rect("a", 0.0, 0.0)).unwrap();
        let before = store.revision();

        let updated = store
            .update(&ElementId::new("a"), &ElementPatch::position(Point::new(3.0, 4.0)))
            .unwrap();
        assert_eq!(updated.origin(), Point::new(3.0, 4.0));
        assert_eq!(updated.size(), Size::new(100.0, 100.0));
        assert!(store.revision() > before);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = ElementStore::new();
        store.create(rect("a", 0.0, 0.0)).unwrap();
        let snapshot = store.clone();

        let err = store
            .update(&ElementId::new("ghost"), &ElementPatch::content("x"))
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(ElementId::new("ghost")));
        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_delete() {
        let mut store = ElementStore::new();
        store.create(rect("a", 0.0, 0.0)).unwrap();
        store.create(rect("b", 0.0, 0.0)).unwrap();

        let removed = store.delete(&ElementId::new("a")).unwrap();
        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.delete(&ElementId::new("a")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut store = ElementStore::new();
        store.create(rect("a", 0.0, 0.0)).unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_bounds() {
        let mut store = ElementStore::new();
        assert!(store.bounds().is_none());
        store.create(rect("a", 0.0, 0.0)).unwrap();
        store.create(rect("b", 50.0, -20.0)).unwrap();
        assert_eq!(store.bounds(), Some(Rect::new(0.0, -20.0, 150.0, 100.0)));
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let mut store = ElementStore::new();
        store.create(rect("z", 0.0, 0.0)).unwrap();
        store
            .create(Element::sticky(
                ElementId::new("a"),
                Point::new(1.0, 1.0),
                Size::new(150.0, 150.0),
                "hi",
                StickyColor::Green,
            ))
            .unwrap();

        let json = store.to_json().unwrap();
        let loaded = ElementStore::from_json(&json).unwrap();
        assert_eq!(loaded.elements(), store.elements());
    }

    #[test]
    fn test_from_json_accepts_original_shape() {
        let json = r#"[
            {"id":"k3j2h1g9f","type":"text","x":10,"y":20,"width":200,"height":40,"content":"New text"},
            {"id":"p0o9i8u7y","type":"sticky","x":0,"y":0,"width":150,"height":150,
             "content":"New sticky note","color":"sticky-orange"}
        ]"#;
        let store = ElementStore::from_json(json).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.elements()[1].color, Some(StickyColor::Orange));
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            ElementStore::from_json("not json"),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            ElementStore::from_json(r#"{"id":"a"}"#),
            Err(SnapshotError::Parse(_))
        ));
        assert!(matches!(
            ElementStore::from_json(
                r#"[{"id":"a","type":"hexagon","x":0,"y":0,"width":1,"height":1}]"#
            ),
            Err(SnapshotError::Parse(_))
        ));

        let dup = r#"[
            {"id":"a","type":"circle","x":0,"y":0,"width":1,"height":1},
            {"id":"a","type":"circle","x":0,"y":0,"width":1,"height":1}
        ]"#;
        assert!(matches!(
            ElementStore::from_json(dup),
            Err(SnapshotError::DuplicateId(_))
        ));

        let negative = r#"[{"id":"a","type":"circle","x":0,"y":0,"width":-1,"height":1}]"#;
        assert!(matches!(
            ElementStore::from_json(negative),
            Err(SnapshotError::InvalidGeometry(_))
        ));
    }
}
