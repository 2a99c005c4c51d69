use crate::{
    detect_pattern, AnalysisReport, Block, NumberingAnalyzer, PatternId, PatternRegistry,
};

fn analyze(texts: &[&str]) -> AnalysisReport {
    NumberingAnalyzer::new().analyze(&Block::from_texts(texts))
}

fn issue_summary(report: &AnalysisReport) -> Vec<(usize, String, String)> {
    report
        .issues
        .iter()
        .map(|i| (i.index, i.actual_marker.clone(), i.expected_marker.clone()))
        .collect()
}

#[test]
fn skipped_section_and_letter_are_both_reported() {
    let report = analyze(&[
        "ARTICLE I Definitions",
        "1.1 Scope",
        "1.3 Term",
        "(a) First",
        "(c) Second",
    ]);

    assert_eq!(
        issue_summary(&report),
        vec![
            (2, "1.3".to_string(), "1.2".to_string()),
            (4, "(c)".to_string(), "(b)".to_string()),
        ]
    );
    assert_eq!(report.issues[0].replacement_text(), "1.2 Term");
    assert_eq!(report.issues[1].replacement_text(), "(b) Second");
    assert_eq!(report.issues[1].pattern_id, PatternId::ParenLetter);
}

#[test]
fn outline_marks_issues() {
    let report = analyze(&[
        "ARTICLE I Definitions",
        "1.1 Scope",
        "1.3 Term",
        "(a) First",
        "(c) Second",
    ]);
    insta::assert_snapshot!(report.tree.to_string(), @r###"
    ARTICLE I Definitions
      1.1 Scope
      1.3 Term  [expected 1.2]
        (a) First
        (c) Second  [expected (b)]
    "###);
}

#[test]
fn higher_priority_grammar_wins() {
    let cases = [
        ("ARTICLE IV Payment", PatternId::ArticleRoman),
        ("Article 4 Payment", PatternId::ArticleNumber),
        ("Section 4 Fees", PatternId::SectionWord),
        ("1.2.3.4 Deep", PatternId::Decimal4),
        ("1.2.3 Deeper", PatternId::Decimal3),
        ("1.2 Shallow", PatternId::Decimal2),
        ("1. Top", PatternId::Decimal1),
        ("IV. Roman", PatternId::RomanDotted),
        ("B. Upper", PatternId::UpperLetterDotted),
        ("(iv) roman", PatternId::ParenRoman),
        ("(h) letter", PatternId::ParenLetter),
        ("(B) upper", PatternId::ParenUpperLetter),
        ("(2) number", PatternId::ParenNumber),
        ("b. lower", PatternId::LowerLetterDotted),
    ];

    for (text, expected) in cases.iter() {
        let detection = detect_pattern(text).unwrap_or_else(|| panic!("no match for {:?}", text));
        assert_eq!(detection.pattern_id, *expected, "{:?}", text);
    }
    assert_eq!(PatternRegistry::shared().len(), cases.len());
}

#[test]
fn unnumbered_text_is_ignored() {
    let report = analyze(&["Recitals", "WHEREAS the parties agree", "1. Scope", "2. Term"]);
    assert_eq!(report.stats.total_blocks, 4);
    assert_eq!(report.stats.numbered_blocks, 2);
    assert!(!report.has_issues());
}

#[test]
fn nested_items_reset_under_each_parent() {
    let report = analyze(&[
        "1. Services",
        "(a) Design",
        "(i) Drafts",
        "(ii) Finals",
        "(b) Build",
        "(i) Alpha",
        "(iii) Beta",
        "2. Fees",
        "(b) Invoices",
    ]);
    assert_eq!(
        issue_summary(&report),
        vec![
            (6, "(iii)".to_string(), "(ii)".to_string()),
            (8, "(b)".to_string(), "(a)".to_string()),
        ]
    );
}

#[test]
fn level_jump_starts_fresh_counter() {
    let report = analyze(&["1. Services", "(i) Drafts", "(ii) Finals"]);
    assert!(!report.has_issues());
    let child = report.tree.find_by_index(1).unwrap();
    assert_eq!(report.tree.parent(child.id).unwrap().index(), 0);
}

#[test]
fn keyword_spelling_is_preserved() {
    let report = analyze(&["Article I - Scope", "Article III - Term"]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].expected_marker, "Article II");
    assert_eq!(report.issues[0].replacement_text(), "Article II - Term");
}

#[test]
fn analysis_is_deterministic() {
    let texts = [
        "ARTICLE I Definitions",
        "Section 1 Terms",
        "(a) One",
        "(c) Two",
        "ARTICLE III Payment",
        "Section 3 Fees",
    ];
    let first = analyze(&texts);
    let second = analyze(&texts);
    assert_eq!(first.tree, second.tree);
    assert_eq!(first.issues, second.issues);
}

#[test]
fn json_export_carries_issues_and_stats() {
    let report = analyze(&["1. Scope", "3. Term"]);
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["issues"][0]["index"], 1);
    assert_eq!(value["issues"][0]["pattern_id"], "decimal_1");
    assert_eq!(value["stats"]["issue_count"], 1);
    assert_eq!(value["stats"]["by_pattern"]["decimal_1"], 2);
    assert!(value.get("cache_decision").is_none());
}
