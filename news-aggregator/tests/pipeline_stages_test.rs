mod common;

use common::article;
use news_aggregator::dedup::title_prefix;
use news_aggregator::ranking::parse_published_at;
use news_aggregator::{rank_by_recency, Deduplicator, LocalityConfig, RelevanceClassifier};

fn titles(articles: &[news_aggregator::Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
}

#[test]
fn test_relevance_requires_a_locality_keyword() {
    let classifier = RelevanceClassifier::new(&LocalityConfig::butuan());

    let local = article("Flooding along the Agusan River", "Google News Butuan", "", "");
    let landmark = article("Concert tonight", "Bombo Radyo Butuan", "Held at Guingona Park", "");
    let shouting = article("BUTUAN WINS REGIONAL MEET", "Brigada News Butuan", "", "");
    let elsewhere = article("Cebu traffic update", "Google News Butuan", "Manila bound flights", "");

    assert!(classifier.is_relevant(&local));
    assert!(classifier.is_relevant(&landmark));
    assert!(classifier.is_relevant(&shouting));
    assert!(!classifier.is_relevant(&elsewhere));
}

#[test]
fn test_relevance_filter_keeps_order() {
    let classifier = RelevanceClassifier::new(&LocalityConfig::butuan());
    let kept = classifier.filter(vec![
        article("Butuan first", "A", "", ""),
        article("Davao news", "A", "", ""),
        article("Ampayon second", "B", "", ""),
    ]);
    assert_eq!(titles(&kept), vec!["Butuan first", "Ampayon second"]);
}

#[test]
fn test_dedup_collapses_identical_ids_keeping_first() {
    let first = article("Butuan port expansion", "MindaNews Butuan", "first copy", "2024-01-01");
    let second = article("Butuan port expansion", "MindaNews Butuan", "second copy", "2024-01-02");
    assert_eq!(first.id, second.id);

    let unique = Deduplicator::new().dedupe(vec![first, second]);
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].description, "first copy");
}

#[test]
fn test_dedup_collapses_matching_title_prefix_across_sources() {
    let a = article("Butuan City Hall Reopens", "Bombo Radyo Butuan", "", "");
    let b = article("butuan city hall reopens ", "Google News Butuan", "", "");
    assert_ne!(a.id, b.id);

    let unique = Deduplicator::new().dedupe(vec![a, b]);
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].source, "Bombo Radyo Butuan");
}

#[test]
fn test_dedup_keeps_titles_that_diverge_before_prefix_cutoff() {
    let a = article("Butuan City Hall Reopens", "Bombo Radyo Butuan", "", "");
    let b = article("Butuan City Hall Reopens Today", "Google News Butuan", "", "");
    assert_ne!(title_prefix(&a.title), title_prefix(&b.title));

    let unique = Deduplicator::new().dedupe(vec![a, b]);
    assert_eq!(unique.len(), 2);
}

#[test]
fn test_dedup_merges_long_titles_sharing_first_50_chars() {
    let shared = "Butuan City council approves the 2024 annual budget";
    assert!(shared.chars().count() > 50);

    let a = article(&format!("{} after long debate", shared), "MindaNews Butuan", "", "");
    let b = article(&format!("{} in special session", shared), "Mindanaogoldstardaily", "", "");

    let unique = Deduplicator::new().dedupe(vec![a, b]);
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].source, "MindaNews Butuan");
}

#[test]
fn test_dedup_merges_distinct_stories_with_same_headline() {
    // Two outlets, two different stories, one headline: the title key wins
    // and only the first survives. Kept on purpose for cross-source reposts.
    let a = article("Butuan Weather Update", "Bombo Radyo Butuan", "Rain in Libertad", "");
    let b = article("Butuan Weather Update", "Brigada News Butuan", "Heat in Ampayon", "");

    let unique = Deduplicator::new().dedupe(vec![a, b]);
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].description, "Rain in Libertad");
}

#[test]
fn test_dedup_drops_empty_and_removed_titles() {
    let unique = Deduplicator::new().dedupe(vec![
        article("", "NewsAPI", "Butuan", ""),
        article("   ", "NewsAPI", "Butuan", ""),
        article("[Removed]", "NewsAPI", "Butuan", ""),
        article("Butuan market fire", "NewsAPI", "", ""),
    ]);
    assert_eq!(titles(&unique), vec!["Butuan market fire"]);
}

#[test]
fn test_parse_published_at_accepts_iso_variants() {
    let zulu = parse_published_at("2024-01-05T08:30:00Z").unwrap();
    let offset = parse_published_at("2024-01-05T16:30:00+08:00").unwrap();
    assert_eq!(zulu, offset);

    assert!(parse_published_at("2024-01-05T08:30:00.123456").is_some());
    assert!(parse_published_at("2024-01-05 08:30:00").is_some());
    assert!(parse_published_at("2024-01-05").is_some());

    assert!(parse_published_at("").is_none());
    assert!(parse_published_at("yesterday").is_none());
    assert!(parse_published_at("Fri, 05 Jan 2024 08:30:00 +0000").is_none());
}

#[test]
fn test_rank_sinks_malformed_dates() {
    let ranked = rank_by_recency(vec![
        article("Butuan third of jan", "A", "", "2024-01-03"),
        article("Butuan bad date", "A", "", "not a date"),
        article("Butuan fifth of jan", "A", "", "2024-01-05"),
    ]);

    assert_eq!(
        titles(&ranked),
        vec!["Butuan fifth of jan", "Butuan third of jan", "Butuan bad date"]
    );
}

#[test]
fn test_rank_is_stable_for_ties() {
    let ranked = rank_by_recency(vec![
        article("Butuan one", "A", "", "2024-01-05T08:00:00Z"),
        article("Butuan broken one", "A", "", ""),
        article("Butuan two", "B", "", "2024-01-05T16:00:00+08:00"),
        article("Butuan broken two", "B", "", "???"),
        article("Butuan newest", "C", "", "2024-02-01T00:00:00Z"),
    ]);

    assert_eq!(
        titles(&ranked),
        vec![
            "Butuan newest",
            "Butuan one",
            "Butuan two",
            "Butuan broken one",
            "Butuan broken two",
        ]
    );
}
