//! Content editing for text and sticky elements.
//!
//! While an [`EditSession`] is open the typed text lives only in its buffer;
//! the store is written once, on commit. Commit and cancel are the only ways
//! out of a session.

use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::store::ElementStore;
use thiserror::Error;

/// Keyboard key for content editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextKey {
    Character(String),
    Backspace,
    Delete,
    Enter,
    Left,
    Right,
    Home,
    End,
    Escape,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl TextModifiers {
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Result of handling a key while editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditResult {
    /// Key was handled, the buffer or cursor may have changed.
    Handled,
    /// The user confirmed; the session should be committed.
    Commit,
    /// The user aborted; the session should be cancelled.
    Cancel,
    /// No session is open.
    NotHandled,
}

/// Errors when entering edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Element not found: {0}")]
    NotFound(ElementId),
    #[error("Element {0} has no editable content")]
    NotEditable(ElementId),
}

/// Local edit state for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    id: ElementId,
    kind: ElementKind,
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    /// Content at the time editing started.
    original: String,
}

impl EditSession {
    fn new(element: &Element) -> Self {
        let buffer = element.content.clone().unwrap_or_default();
        Self {
            id: element.id.clone(),
            kind: element.kind,
            cursor: buffer.len(),
            original: buffer.clone(),
            buffer,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last committed content, shown again if the session is cancelled.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Insert text at the cursor. Single-line elements turn newlines into spaces.
    pub fn insert(&mut self, text: &str) {
        let text = if self.kind.is_multiline() {
            text.to_string()
        } else {
            text.replace(['\r', '\n'], " ")
        };
        self.buffer.insert_str(self.cursor, &text);
        self.cursor += text.len();
    }

    /// Insert a line break regardless of element kind.
    fn insert_newline(&mut self) {
        self.buffer.insert(self.cursor, '\n');
        self.cursor += 1;
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.buffer.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.buffer.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    /// Replace the whole buffer, cursor at the end.
    pub fn set_buffer(&mut self, text: &str) {
        self.buffer.clear();
        self.cursor = 0;
        self.insert(text);
    }
}

/// Owns at most one [`EditSession`].
#[derive(Debug, Clone, Default)]
pub struct ContentEditor {
    session: Option<EditSession>,
}

impl ContentEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Check if a specific element is being edited.
    pub fn is_editing_element(&self, id: &ElementId) -> bool {
        self.session.as_ref().is_some_and(|s| &s.id == id)
    }

    /// Open a session on `id`, copying its content into the buffer.
    ///
    /// An open session on a different element is committed first. Opening
    /// the element that is already being edited keeps the current buffer.
    pub fn begin(&mut self, store: &mut ElementStore, id: &ElementId) -> Result<(), EditError> {
        if self.is_editing_element(id) {
            return Ok(());
        }
        let element = store.get(id).ok_or_else(|| EditError::NotFound(id.clone()))?;
        if !element.kind.has_content() {
            return Err(EditError::NotEditable(id.clone()));
        }
        let session = EditSession::new(element);
        self.commit(store);
        log::debug!("Editing content of {}", id);
        self.session = Some(session);
        Ok(())
    }

    /// Handle a key. Returns what the caller should do next; `Commit` and
    /// `Cancel` have already been applied when they are returned.
    pub fn handle_key(
        &mut self,
        store: &mut ElementStore,
        key: &TextKey,
        modifiers: TextModifiers,
    ) -> TextEditResult {
        let Some(session) = self.session.as_mut() else {
            return TextEditResult::NotHandled;
        };
        match key {
            TextKey::Character(text) => session.insert(text),
            TextKey::Backspace => session.backspace(),
            TextKey::Delete => session.delete_forward(),
            TextKey::Left => session.move_left(),
            TextKey::Right => session.move_right(),
            TextKey::Home => session.cursor = 0,
            TextKey::End => session.cursor = session.buffer.len(),
            TextKey::Enter if modifiers.shift => session.insert_newline(),
            TextKey::Enter => {
                self.commit(store);
                return TextEditResult::Commit;
            }
            TextKey::Escape => {
                self.cancel();
                return TextEditResult::Cancel;
            }
        }
        TextEditResult::Handled
    }

    /// Write the buffer back to the store and close the session.
    ///
    /// Returns the committed element id. A session whose element has been
    /// removed meanwhile is closed without writing.
    pub fn commit(&mut self, store: &mut ElementStore) -> Option<ElementId> {
        let session = self.session.take()?;
        match store.update(&session.id, &ElementPatch::content(session.buffer)) {
            Ok(_) => Some(session.id),
            Err(err) => {
                log::warn!("Dropping edit: {}", err);
                None
            }
        }
    }

    /// Discard the buffer and close the session without touching the store.
    pub fn cancel(&mut self) -> Option<EditSession> {
        let session = self.session.take();
        if let Some(s) = &session {
            log::debug!("Cancelled edit of {}", s.id);
        }
        session
    }

    /// Drop the session if it targets `id` (used when the element goes away).
    pub(crate) fn forget(&mut self, id: &ElementId) {
        if self.is_editing_element(id) {
            self.session = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::StickyColor;
    use kurbo::{Point, Size};

    fn setup() -> ElementStore {
        let mut store = ElementStore::new();
        store
            .create(Element::text(
                ElementId::new("t"),
                Point::ZERO,
                Size::new(200.0, 40.0),
                "New text",
            ))
            .unwrap();
        store
            .create(Element::sticky(
                ElementId::new("s"),
                Point::ZERO,
                Size::new(150.0, 150.0),
                "New sticky note",
                StickyColor::Yellow,
            ))
            .unwrap();
        store
            .create(Element::new(
                ElementId::new("r"),
                ElementKind::Rectangle,
                Point::ZERO,
                Size::new(10.0, 10.0),
            ))
            .unwrap();
        store
    }

    fn key(c: &str) -> TextKey {
        TextKey::Character(c.to_string())
    }

    fn content(store: &ElementStore, id: &str) -> String {
        store
            .get(&ElementId::new(id))
            .and_then(|e| e.content.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_begin_copies_content_without_mutation() {
        let mut store = setup();
        let revision = store.revision();
        let mut editor = ContentEditor::new();

        editor.begin(&mut store, &ElementId::new("t")).unwrap();
        let session = editor.session().unwrap();
        assert_eq!(session.buffer(), "New text");
        assert_eq!(session.cursor(), "New text".len());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_begin_rejects_shapes_and_missing() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        assert_eq!(
            editor.begin(&mut store, &ElementId::new("r")),
            Err(EditError::NotEditable(ElementId::new("r")))
        );
        assert_eq!(
            editor.begin(&mut store, &ElementId::new("zz")),
            Err(EditError::NotFound(ElementId::new("zz")))
        );
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_typing_and_commit() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("t")).unwrap();

        for _ in 0.."text".len() {
            editor.handle_key(&mut store, &TextKey::Backspace, TextModifiers::default());
        }
        editor.handle_key(&mut store, &key("idea"), TextModifiers::default());
        assert_eq!(content(&store, "t"), "New text");

        let result = editor.handle_key(&mut store, &TextKey::Enter, TextModifiers::default());
        assert_eq!(result, TextEditResult::Commit);
        assert!(!editor.is_editing());
        assert_eq!(content(&store, "t"), "New idea");
    }

    #[test]
    fn test_escape_cancels_without_mutation() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("s")).unwrap();
        editor.handle_key(&mut store, &key("!!!"), TextModifiers::default());
        let before = store.clone();

        let result = editor.handle_key(&mut store, &TextKey::Escape, TextModifiers::default());
        assert_eq!(result, TextEditResult::Cancel);
        assert!(!editor.is_editing());
        assert_eq!(store, before);
        assert_eq!(content(&store, "s"), "New sticky note");
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("s")).unwrap();
        editor.session_mut().unwrap().set_buffer("line one");

        let result = editor.handle_key(&mut store, &TextKey::Enter, TextModifiers::SHIFT);
        assert_eq!(result, TextEditResult::Handled);
        editor.handle_key(&mut store, &key("line two"), TextModifiers::default());
        editor.commit(&mut store);
        assert_eq!(content(&store, "s"), "line one\nline two");
    }

    #[test]
    fn test_text_elements_flatten_pasted_newlines() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("t")).unwrap();
        editor.session_mut().unwrap().set_buffer("a\nb");
        assert_eq!(editor.session().unwrap().buffer(), "a b");

        editor.begin(&mut store, &ElementId::new("s")).unwrap();
        editor.session_mut().unwrap().set_buffer("a\nb");
        assert_eq!(editor.session().unwrap().buffer(), "a\nb");
    }

    #[test]
    fn test_cursor_movement_unicode() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("t")).unwrap();
        editor.session_mut().unwrap().set_buffer("héllo");

        let m = TextModifiers::default();
        editor.handle_key(&mut store, &TextKey::Home, m);
        editor.handle_key(&mut store, &TextKey::Right, m);
        editor.handle_key(&mut store, &TextKey::Delete, m);
        assert_eq!(editor.session().unwrap().buffer(), "hllo");

        editor.handle_key(&mut store, &TextKey::End, m);
        editor.handle_key(&mut store, &TextKey::Left, m);
        editor.handle_key(&mut store, &key("é"), m);
        assert_eq!(editor.session().unwrap().buffer(), "hlléo");

        editor.handle_key(&mut store, &TextKey::Home, m);
        editor.handle_key(&mut store, &TextKey::Backspace, m);
        editor.handle_key(&mut store, &TextKey::Left, m);
        assert_eq!(editor.session().unwrap().cursor(), 0);
    }

    #[test]
    fn test_begin_other_commits_previous() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("t")).unwrap();
        editor.session_mut().unwrap().set_buffer("first");

        editor.begin(&mut store, &ElementId::new("s")).unwrap();
        assert_eq!(content(&store, "t"), "first");
        assert!(editor.is_editing_element(&ElementId::new("s")));
    }

    #[test]
    fn test_commit_after_element_removed() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        editor.begin(&mut store, &ElementId::new("t")).unwrap();
        store.delete(&ElementId::new("t")).unwrap();

        assert_eq!(editor.commit(&mut store), None);
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_keys_without_session() {
        let mut store = setup();
        let mut editor = ContentEditor::new();
        let result = editor.handle_key(&mut store, &TextKey::Enter, TextModifiers::default());
        assert_eq!(result, TextEditResult::NotHandled);
    }
}
