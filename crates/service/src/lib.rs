//! Service layer providing business-oriented catalogue operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod catalog;
pub mod errors;
pub mod import;
pub mod query;
pub mod repository;
#[cfg(test)]
pub mod test_support;
