//! Element id generation.

use crate::element::ElementId;
use uuid::Uuid;

/// Source of fresh element ids.
pub trait IdAllocator: std::fmt::Debug {
    /// Produce the next id. Ids from one allocator never repeat.
    fn next_id(&mut self) -> ElementId;
}

/// Monotonic counter producing `el-1`, `el-2`, ...
///
/// Deterministic, which keeps interaction sequences reproducible in tests.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting after `n` (the first id will be `el-{n + 1}`).
    pub fn starting_after(n: u64) -> Self {
        Self { next: n }
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> ElementId {
        self.next += 1;
        ElementId::new(format!("el-{}", self.next))
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdAllocator for UuidIds {
    fn next_id(&mut self) -> ElementId {
        ElementId::new(Uuid::new_v4().to_string())
    }
}
