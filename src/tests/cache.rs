use crate::{
    AnalyzerConfig, Block, CacheDecision, Fingerprint, FullRebuildReason, NumberingAnalyzer,
    NumberingCache,
};

fn document() -> Vec<Block> {
    Block::from_texts(&[
        "ARTICLE I Definitions",
        "1.1 Scope",
        "1.2 Term",
        "(a) Initial",
        "(b) Renewal",
        "ARTICLE II Payment",
        "2.1 Fees",
        "2.2 Invoices",
        "(a) Monthly",
        "(b) Disputes",
    ])
}

#[test]
fn first_pass_is_full_then_reused() {
    let analyzer = NumberingAnalyzer::new();
    let mut cache = NumberingCache::new();
    let blocks = document();

    let first = analyzer.analyze_with_cache(&blocks, &mut cache);
    assert_eq!(
        first.cache_decision,
        Some(CacheDecision::Full(FullRebuildReason::Empty))
    );
    assert!(!cache.is_empty());

    let second = analyzer.analyze_with_cache(&blocks, &mut cache);
    assert_eq!(second.cache_decision, Some(CacheDecision::Reuse));
    assert_eq!(first.tree, second.tree);
    assert_eq!(first.issues, second.issues);
}

#[test]
fn single_edit_changes_one_fingerprint_and_matches_fresh_run() {
    let analyzer = NumberingAnalyzer::new();
    let mut cache = NumberingCache::new();
    let mut blocks = document();
    analyzer.analyze_with_cache(&blocks, &mut cache);
    let before = cache.fingerprints().to_vec();

    blocks[7].text = "2.4 Invoices".to_string();
    let partial = analyzer.analyze_with_cache(&blocks, &mut cache);

    match &partial.cache_decision {
        Some(CacheDecision::Partial(changes)) => assert_eq!(changes.modified, vec![7]),
        other => panic!("expected partial rebuild, got {:?}", other),
    }
    let changed: Vec<usize> = before
        .iter()
        .zip(cache.fingerprints())
        .enumerate()
        .filter(|(_, (old, new))| old != new)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(changed, vec![7]);
    assert_eq!(cache.fingerprint(7), Some(Fingerprint::of(&blocks[7])));

    let fresh = analyzer.analyze(&blocks);
    assert_eq!(partial.tree, fresh.tree);
    assert_eq!(partial.issues, fresh.issues);
    assert_eq!(partial.issues[0].expected_marker, "2.2");
}

#[test]
fn appended_block_is_detected() {
    let analyzer = NumberingAnalyzer::new();
    let mut cache = NumberingCache::new();
    let mut blocks = document();
    analyzer.analyze_with_cache(&blocks, &mut cache);

    blocks.push(Block::new(10, "(d) Late fees"));
    let report = analyzer.analyze_with_cache(&blocks, &mut cache);

    match &report.cache_decision {
        Some(CacheDecision::Partial(changes)) => assert_eq!(changes.added, vec![10]),
        other => panic!("expected partial rebuild, got {:?}", other),
    }
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].expected_marker, "(c)");
}

#[test]
fn rewriting_most_blocks_forces_full_rebuild() {
    let analyzer = NumberingAnalyzer::new();
    let mut cache = NumberingCache::new();
    analyzer.analyze_with_cache(&Block::from_texts(&["1. A", "2. B", "3. C"]), &mut cache);

    let report =
        analyzer.analyze_with_cache(&Block::from_texts(&["1. X", "2. Y", "3. C"]), &mut cache);
    assert_eq!(
        report.cache_decision,
        Some(CacheDecision::Full(FullRebuildReason::TooManyChanges {
            changed: 2,
            previous: 3,
        }))
    );
}

#[test]
fn expired_cache_is_rebuilt() {
    let analyzer = NumberingAnalyzer::with_config(AnalyzerConfig {
        freshness_secs: 0,
        ..AnalyzerConfig::default()
    });
    let mut cache = NumberingCache::new();
    let blocks = document();
    analyzer.analyze_with_cache(&blocks, &mut cache);

    let report = analyzer.analyze_with_cache(&blocks, &mut cache);
    assert_eq!(
        report.cache_decision,
        Some(CacheDecision::Full(FullRebuildReason::Expired))
    );
}
