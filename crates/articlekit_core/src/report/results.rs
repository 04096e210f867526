//! Per-section pass/fail bookkeeping.

use indexmap::IndexMap;
use serde::Serialize;

/// Section used when a result is recorded before any section was opened.
pub const UNGROUPED_SECTION: &str = "Ungrouped checks";

/// Outcome of every check, grouped by section in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteResults {
    sections: IndexMap<String, IndexMap<String, bool>>,
    /// Index of the section receiving results.
    #[serde(skip)]
    current: Option<usize>,
}

/// Aggregate counts for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub name: String,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl SectionSummary {
    pub fn verdict(&self) -> &'static str {
        if self.failed == 0 {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

impl SuiteResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `title` as the section that receives subsequent results.
    ///
    /// Reopening an existing section clears it and keeps its position.
    pub fn begin_section(&mut self, title: impl Into<String>) {
        let (index, _) = self.sections.insert_full(title.into(), IndexMap::new());
        self.current = Some(index);
    }

    /// Records one check in the current section.
    pub fn record(&mut self, description: impl Into<String>, passed: bool) {
        if self.current.is_none() {
            self.begin_section(UNGROUPED_SECTION);
        }
        let current = self.current.and_then(|index| self.sections.get_index_mut(index));
        if let Some((_, checks)) = current {
            checks.insert(description.into(), passed);
        }
    }

    pub fn section(&self, title: &str) -> Option<&IndexMap<String, bool>> {
        self.sections.get(title)
    }

    pub fn summaries(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|(name, checks)| {
                let total = checks.len();
                let passed = checks.values().filter(|passed| **passed).count();
                SectionSummary {
                    name: name.clone(),
                    passed,
                    failed: total - passed,
                    total,
                }
            })
            .collect()
    }

    pub fn total(&self) -> usize {
        self.sections.values().map(IndexMap::len).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.sections
            .values()
            .all(|checks| checks.values().all(|passed| *passed))
    }
}

#[cfg(test)]
mod tests {
    use super::{SuiteResults, UNGROUPED_SECTION};

    #[test]
    fn summaries_follow_section_order() {
        let mut results = SuiteResults::new();
        results.begin_section("Basic");
        results.record("repr", true);
        results.record("len", false);
        results.begin_section("Advanced");
        results.record("descriptor", true);

        let summaries = results.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "Basic");
        assert_eq!((summaries[0].passed, summaries[0].failed, summaries[0].total), (1, 1, 2));
        assert_eq!(summaries[0].verdict(), "FAIL");
        assert_eq!(summaries[1].verdict(), "PASS");
        assert_eq!(results.total(), 3);
        assert!(!results.all_passed());
    }

    #[test]
    fn reopened_section_keeps_its_position_and_starts_empty() {
        let mut results = SuiteResults::new();
        results.begin_section("A");
        results.record("first", false);
        results.begin_section("B");
        results.record("second", true);
        results.begin_section("A");
        results.record("again", true);

        let names: Vec<String> = results.summaries().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["A", "B"]);
        let reopened = results.section("A").unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get("again"), Some(&true));
        assert_eq!(results.section("B").map(|s| s.len()), Some(1));
        assert!(results.all_passed());
    }

    #[test]
    fn records_without_section_go_to_ungrouped() {
        let mut results = SuiteResults::new();
        results.record("lonely", true);
        assert_eq!(results.section(UNGROUPED_SECTION).map(|s| s.len()), Some(1));
        assert!(results.all_passed());
    }
}
