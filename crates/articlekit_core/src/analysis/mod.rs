//! Pure text analysis over article content.
//!
//! # Responsibility
//! - Derive previews and word statistics from a content string.
//! - Stay free of entity state so callers can reuse the helpers directly.
//!
//! # Invariants
//! - Every function here is a pure function of its inputs.

pub mod content;
