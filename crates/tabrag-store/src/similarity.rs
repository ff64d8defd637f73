//! Cosine ranking shared by the store adapters

use std::collections::HashSet;

use tabrag_core::models::{IndexEntry, ScoredDocument};

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank `entries` against `query` and keep the top `k`
///
/// The sort is stable, so equal scores keep storage order.
pub fn rank(entries: &[IndexEntry], query: &[f32], k: usize) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = entries
        .iter()
        .map(|entry| ScoredDocument {
            document: entry.document.clone(),
            score: cosine_similarity(query, &entry.vector),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Drop entries whose id was already seen
pub(crate) fn dedup_by_id(entries: Vec<IndexEntry>) -> Vec<IndexEntry> {
    let mut seen = HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabrag_core::models::{Document, EntryId};

    fn entry(id: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: EntryId(id.to_string()),
            document: Document::new(id),
            vector,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_score() {
        let entries = vec![
            entry("far", vec![0.0, 1.0]),
            entry("near", vec![1.0, 0.1]),
            entry("mid", vec![1.0, 1.0]),
        ];

        let ranked = rank(&entries, &[1.0, 0.0], 2);
        let contents: Vec<&str> = ranked.iter().map(|s| s.document.content.as_str()).collect();
        assert_eq!(contents, vec!["near", "mid"]);
    }

    #[test]
    fn test_rank_ties_keep_storage_order() {
        let entries = vec![entry("a", vec![1.0]), entry("b", vec![1.0]), entry("c", vec![1.0])];
        let ranked = rank(&entries, &[1.0], 3);
        let contents: Vec<&str> = ranked.iter().map(|s| s.document.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let entries = vec![entry("a", vec![1.0]), entry("a", vec![2.0]), entry("b", vec![3.0])];
        let deduped = dedup_by_id(entries);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].vector, vec![1.0]);
    }
}
