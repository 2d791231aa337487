//! End-to-end pipeline tests: change-set in, three-bucket report out.

use gavel_core::{
    create_reporter, review, review_all, ChangeSet, RuleSet, Severity,
};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();
}

fn sample_change() -> ChangeSet {
    ChangeSet::new("pr-42")
        .with_source(
            "src/main/java/OrderService.java",
            "@Service\npublic class OrderService {\n    @Autowired\n    private OrderRepository repo;\n}\n",
        )
        .with_source(
            "src/main/java/Money.java",
            "public class Money {\n    private final String currency;\n    private final long amount;\n    Money(String c, long a) { currency = c; amount = a; }\n    public boolean equals(Object o) { return o instanceof Money; }\n}\n",
        )
        .with_source(
            "src/test/java/OrderServiceTest.java",
            "class OrderServiceTest {\n    @Test\n    void placesOrder() { service.place(1L); }\n}\n",
        )
}

#[test]
fn full_review_produces_expected_buckets() -> anyhow::Result<()> {
    init_tracing();
    let rules = RuleSet::load()?;
    let outcome = review(&rules, &sample_change())?;

    let report = &outcome.report;
    assert!(outcome.file_errors.is_empty());
    assert_eq!(outcome.files_analyzed, 3);

    // Field injection and equals-without-hashCode block the merge.
    let blocking_ids: Vec<&str> = report.blocking.iter().map(|f| f.rule_id.as_str()).collect();
    assert!(blocking_ids.contains(&"R-SDI-110"));
    assert!(blocking_ids.contains(&"R-CTR-110"));
    assert!(!report.mergeable());

    // The assertion-free test is a suggestion.
    assert!(report.suggested.iter().any(|f| f.rule_id == "R-TST-110"));

    // Money is an explicit positive, not an inferred one.
    assert!(report.positive.iter().any(|f| f.rule_id == "R-IMM-190"));

    // Nothing dropped, nothing duplicated.
    assert_eq!(
        report.total(),
        report.blocking.len() + report.suggested.len() + report.positive.len()
    );
    Ok(())
}

#[test]
fn field_injection_finding_cites_the_field() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let change = ChangeSet::new("pr-di").with_source(
        "OrderService.java",
        "public class OrderService {\n    @Autowired\n    private OrderRepository repo;\n}\n",
    );
    let outcome = review(&rules, &change)?;

    let di: Vec<_> = outcome
        .report
        .blocking
        .iter()
        .filter(|f| f.rule_id == "R-SDI-110")
        .collect();
    assert_eq!(di.len(), 1);
    assert!(di[0].message.contains("'repo'"));
    assert!(di[0].message.contains("OrderService"));
    assert_eq!(di[0].location().file, "OrderService.java");
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let change = sample_change();
    let first = review(&rules, &change)?;
    let second = review(&rules, &change)?;
    assert_eq!(first.report, second.report);
    Ok(())
}

#[test]
fn diff_input_reports_new_file_lines() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let patch = "\
--- /dev/null
+++ b/OrderService.java
@@ -0,0 +1,4 @@
+public class OrderService {
+    @Autowired
+    private OrderRepository repo;
+}
";
    let change = ChangeSet::new("pr-patch").with_patch("OrderService.java", patch);
    let outcome = review(&rules, &change)?;

    let f = outcome
        .report
        .blocking
        .iter()
        .find(|f| f.rule_id == "R-SDI-110")
        .expect("field injection finding");
    assert_eq!(f.location().line, 2);
    Ok(())
}

#[test]
fn zero_fact_change_yields_empty_report() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let change = ChangeSet::new("pr-clean").with_source(
        "Tidy.java",
        "public class Tidy { public int add(int a, int b) { return a + b; } }\n",
    );
    let outcome = review(&rules, &change)?;
    assert!(outcome.report.is_empty());
    assert!(outcome.report.mergeable());
    assert!(outcome.file_errors.is_empty());
    Ok(())
}

#[test]
fn unparseable_file_surfaces_as_file_error_not_failure() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let change = ChangeSet::new("pr-broken")
        .with_source("Broken.java", ")))) not java ((((")
        .with_source("Fine.java", "public class Fine { }\n");
    let outcome = review(&rules, &change)?;

    assert_eq!(outcome.file_errors.len(), 1);
    assert_eq!(outcome.file_errors[0].path, "Broken.java");
    assert!(outcome.file_errors[0].reason.contains("could not analyze"));
    assert_eq!(outcome.files_analyzed, 1);
    Ok(())
}

#[test]
fn parallel_runs_share_the_rule_set() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let changes: Vec<ChangeSet> = (0..8)
        .map(|i| {
            ChangeSet::new(format!("pr-{}", i)).with_source(
                "OrderService.java",
                "public class OrderService {\n    @Autowired\n    private OrderRepository repo;\n}\n",
            )
        })
        .collect();

    let outcomes = review_all(&rules, &changes);
    assert_eq!(outcomes.len(), 8);
    for (i, outcome) in outcomes.iter().enumerate() {
        let outcome = outcome.as_ref().expect("run succeeds");
        assert_eq!(outcome.change_id, format!("pr-{}", i));
        assert_eq!(outcome.report.blocking.len(), 1);
    }
    Ok(())
}

#[test]
fn markdown_report_renders_the_output_contract() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    let outcome = review(&rules, &sample_change())?;

    let reporter = create_reporter("markdown").expect("markdown reporter");
    let text = reporter.generate(&outcome.report)?;

    assert!(text.contains("## Required Changes (Blocking)"));
    assert!(text.contains("## Suggested Improvements (Non-blocking)"));
    assert!(text.contains("## Positive Feedback"));
    assert!(text.contains("R-SDI-110"));
    Ok(())
}

#[test]
fn positive_bucket_needs_an_explicit_positive_match() -> anyhow::Result<()> {
    let rules = RuleSet::load()?;
    // A clean file has no negatives, and that alone earns no praise.
    let change = ChangeSet::new("pr-quiet").with_source(
        "Quiet.java",
        "public class Quiet { public int id() { return 7; } }\n",
    );
    let outcome = review(&rules, &change)?;
    assert!(outcome.report.positive.is_empty());

    // All blocking findings carry Blocking severity, nothing else does.
    let big = review(&rules, &sample_change())?;
    assert!(big.report.blocking.iter().all(|f| f.severity == Severity::Blocking));
    assert!(big.report.positive.iter().all(|f| f.severity == Severity::Positive));
    Ok(())
}
