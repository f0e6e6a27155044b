//! Request and response types for search index operations.

/// Outcome of ensuring the search index exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The index was missing and has been created with the fixed mapping.
    Created,
    /// The index was already present (including when a concurrent caller created it).
    AlreadyExists,
}

/// A single document that the backend refused inside an otherwise accepted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertFailure {
    /// The record ID of the rejected document.
    pub id: i64,
    /// The backend's reason for rejecting it.
    pub reason: String,
}

/// Summary of a bulk upsert.
///
/// Per-item failures are collected here instead of failing the whole batch,
/// so callers can log partial failures and carry on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertStats {
    /// Number of documents written successfully.
    pub written: usize,
    /// Documents the backend rejected.
    pub errors: Vec<UpsertFailure>,
}

impl UpsertStats {
    /// Stats for a batch where nothing was submitted.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of documents submitted.
    pub fn total(&self) -> usize {
        self.written + self.errors.len()
    }

    /// Whether any document in the batch failed.
    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }
}
