use articlekit_core::{
    Article, ArticleIds, Check, CheckFailure, CheckOutcome, CheckSection, ReportConfig,
    ReportRunner,
};
use chrono::NaiveDate;

fn expect_eq<T: PartialEq + std::fmt::Debug>(expected: T, actual: T) -> CheckOutcome {
    if expected == actual {
        Ok(())
    } else {
        Err(vec![CheckFailure::Failed(format!(
            "{expected:?} != {actual:?}"
        ))])
    }
}

fn sample_article() -> Article {
    let date = NaiveDate::from_ymd_opt(1837, 4, 7)
        .unwrap()
        .and_hms_opt(12, 15, 0)
        .unwrap();
    Article::new(
        &ArticleIds::new(),
        "The emperor's new clothes",
        "Hans Christian Andersen",
        date,
        "'But he has nothing at all on!' at last cried out all the people.",
    )
}

fn qualifier_sections() -> Vec<CheckSection> {
    vec![
        CheckSection::new("Tests for the basic requirements.")
            .with_check(Check::new("Using len(article) returns the content length.", || {
                let article = sample_article();
                expect_eq(article.content().chars().count(), article.length())
            }))
            .with_check(Check::new("short_introduction truncates at a space.", || {
                expect_eq(
                    "'But he has nothing".to_string(),
                    sample_article().short_introduction(20),
                )
            })),
        CheckSection::new("Tests for the advanced requirements.")
            .with_check(Check::new("Deliberately wrong expectation.", || {
                expect_eq(3, sample_article().most_common_words(5).len())
            }))
            .with_check(Check::skipped(
                "Descriptor checks.",
                "The field type is not a data descriptor.",
            )),
    ]
}

#[test]
fn report_groups_outcomes_and_summarizes_sections() {
    let mut runner = ReportRunner::new(Vec::new(), &ReportConfig::default());
    let results = runner.run(&qualifier_sections()).unwrap();
    let output = String::from_utf8(runner.into_inner()).unwrap();

    let summaries = results.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "Tests for the basic requirements");
    assert_eq!(summaries[0].verdict(), "PASS");
    assert_eq!((summaries[1].passed, summaries[1].failed), (0, 2));
    assert!(!results.all_passed());

    assert!(output.starts_with(&format!(
        "{rule}\nArticle Qualifier Test Results\n{rule}\nDate: ",
        rule = "=".repeat(100)
    )));
    assert!(output.contains(&format!(
        "{:<92}[ PASS ]\n",
        "Using len(article) returns the content length"
    )));
    assert!(output.contains(&format!("{:<92}[ FAIL ]\n", "Deliberately wrong expectation")));
    assert!(output.contains("  AssertionError: 3 != 5"));
    assert!(output.contains("  SkippedTest: The field type is not a data descriptor."));
    assert!(output.contains("Total running time: "));
}

#[test]
fn report_lines_respect_configured_width() {
    let config = ReportConfig {
        max_width: 40,
        ..ReportConfig::default()
    };
    let mut runner = ReportRunner::new(Vec::new(), &config);
    runner.run(&qualifier_sections()).unwrap();
    let output = String::from_utf8(runner.into_inner()).unwrap();

    let summary_start = output.find("Test Suite Summary").unwrap();
    // Failure details are indented and written unbounded.
    for line in output[..summary_start]
        .lines()
        .filter(|line| !line.starts_with("  "))
    {
        assert!(line.chars().count() <= 40, "line too wide: {line:?}");
    }
    assert!(output.contains(&format!("{:<32}[ PASS ]\n", "Using len(article) returns the")));
}
