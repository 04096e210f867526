//! Core domain logic for articlekit.
//! Articles with content analysis, type-validated fields, and the plain-text
//! report harness used to present check results.

pub mod analysis;
pub mod config;
pub mod logging;
pub mod model;
pub mod report;

pub use analysis::content::{most_common_words, short_introduction, WordCounts};
pub use config::{default_log_level, ConfigError, CoreConfig, LoggingConfig, ReportConfig};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::article::{
    sort_by_publication, Article, ArticleId, ArticleIds, Clock, OrderingUnsupported, Publication,
    SystemClock,
};
pub use model::field::{
    FieldError, FieldOwner, FieldRead, FieldResult, FieldStore, FieldValue, Instance, OwnerClass,
    TypeTag, ValidatedField, ValueData,
};
pub use report::results::{SectionSummary, SuiteResults};
pub use report::runner::{shorten, Check, CheckOutcome, CheckSection, ReportRunner};
pub use report::stream::{CheckFailure, ReportStream};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
