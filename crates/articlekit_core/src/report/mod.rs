//! Plain-text test report rendering.
//!
//! # Responsibility
//! - Lay out check outcomes in fixed-width console text.
//! - Keep per-section pass/fail bookkeeping for the summary table.
//! - Run grouped checks and time the whole suite.
//!
//! # Invariants
//! - No output line exceeds the configured maximum width, except summary
//!   table rows, which have a fixed layout.
//! - Sections and checks are reported in the order they were run.

pub mod results;
pub mod runner;
pub mod stream;
