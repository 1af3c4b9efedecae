//! Pagination utilities for the list endpoint
//!
//! Provides a simple limit/offset `Pagination` struct and a helper to
//! normalize raw query inputs.

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// items per page, clamped to 1..=100
    pub limit: u64,
    /// rows skipped before the page starts
    pub offset: u64,
}

impl Pagination {
    /// Build from optional query inputs, clamping to sane bounds.
    pub fn from_query(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: limit.unwrap_or(50).clamp(1, 100),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { limit: 50, offset: 0 } }
}
