//! Inkboard Core Library
//!
//! Platform-agnostic interaction engine for an infinite whiteboard canvas:
//! the element store, viewport, tools, selection and in-place content
//! editing. Rendering and windowing live elsewhere and consume
//! [`Canvas::view`].

pub mod camera;
pub mod canvas;
pub mod commands;
pub mod config;
pub mod editor;
pub mod element;
pub mod hit;
pub mod id;
pub mod input;
pub mod storage;
pub mod store;
pub mod tools;

pub use camera::{Camera, to_screen, to_world};
pub use canvas::{Canvas, RenderView};
pub use commands::{Command, CommandError, CommandOutcome};
pub use config::{ConfigError, EditorConfig};
pub use editor::{ContentEditor, EditError, EditSession, TextEditResult, TextKey, TextModifiers};
pub use element::{Element, ElementId, ElementKind, ElementPatch, StickyColor};
pub use hit::hit_test;
pub use id::{IdAllocator, SequentialIds, UuidIds};
pub use input::{InputState, MouseButton, PointerEvent};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{ElementStore, SnapshotError, StoreError};
pub use tools::{CursorIcon, ToolKind, ToolManager, ToolState};
