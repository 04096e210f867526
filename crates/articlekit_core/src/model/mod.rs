//! Article domain model and validated attribute fields.
//!
//! # Responsibility
//! - Define the `Article` entity and its identity/edit bookkeeping.
//! - Provide the reusable `ValidatedField` abstraction for any owner type.
//!
//! # Invariants
//! - Article ids come from an explicit counter, never from global state.
//! - Validated field values live in each owner's own `FieldStore`.

pub mod article;
pub mod field;
pub mod repr;
