//! Search behaviour of the vector store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use minirag::{
    Corpus, EmbeddingProvider, HashEmbeddingProvider, MiniRagError, VectorRecord, VectorStore,
    cosine_similarity,
};
use proptest::prelude::*;

/// Returns fixed vectors for known texts and fails on anything else.
struct StubEmbedder {
    vectors: HashMap<&'static str, Vec<f32>>,
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> minirag::Result<Vec<f32>> {
        self.vectors.get(text).cloned().ok_or_else(|| MiniRagError::VectorizationFailed {
            provider: "stub".into(),
            message: format!("unknown text {text:?}"),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn stub(entries: &[(&'static str, Vec<f32>)]) -> Arc<StubEmbedder> {
    let dimensions = entries.first().map_or(0, |(_, v)| v.len());
    Arc::new(StubEmbedder { vectors: entries.iter().cloned().collect(), dimensions })
}

fn three_record_corpus() -> Corpus {
    Corpus::new(vec![
        VectorRecord::new("x", "along x", vec![1.0, 0.0, 0.0]),
        VectorRecord::new("y", "along y", vec![0.0, 1.0, 0.0]),
        VectorRecord::new("xy", "between x and y", vec![1.0, 1.0, 0.0]),
    ])
}

#[tokio::test]
async fn returns_top_k_in_descending_order() {
    let store = VectorStore::from_corpus(three_record_corpus())
        .unwrap()
        .with_embedder(stub(&[("mostly x", vec![0.9, 0.1, 0.0])]));

    let results = store.search("mostly x", 2).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "x");
    assert_eq!(results[0].content, "along x");
    assert_eq!(results[1].id, "xy");
    assert!(results[0].score >= results[1].score);
}

#[tokio::test]
async fn top_k_larger_than_corpus_returns_everything() {
    let store = VectorStore::from_corpus(three_record_corpus())
        .unwrap()
        .with_embedder(stub(&[("q", vec![0.0, 1.0, 0.0])]));

    let results = store.search("q", 10).await.unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["y", "xy", "x"]);
}

#[tokio::test]
async fn top_k_zero_returns_nothing() {
    let store = VectorStore::from_corpus(three_record_corpus())
        .unwrap()
        .with_embedder(stub(&[("q", vec![0.0, 1.0, 0.0])]));

    assert!(store.search("q", 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_corpus_returns_nothing() {
    let store = VectorStore::from_corpus(Corpus::default())
        .unwrap()
        .with_embedder(Arc::new(HashEmbeddingProvider::new(32).unwrap()));

    assert!(store.search("anything at all", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn store_without_corpus_behaves_as_empty() {
    let embedder = Arc::new(HashEmbeddingProvider::new(32).unwrap());
    let store = VectorStore::new().with_embedder(embedder);
    assert!(store.corpus().is_none());
    assert!(store.search("anything", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_provider_is_unavailable() {
    let store = VectorStore::from_corpus(three_record_corpus()).unwrap();
    let err = store.search("q", 1).await.unwrap_err();
    assert!(matches!(err, MiniRagError::EmbeddingUnavailable(_)));
}

#[tokio::test]
async fn unembeddable_query_fails_vectorization() {
    let store = VectorStore::from_corpus(three_record_corpus())
        .unwrap()
        .with_embedder(stub(&[("q", vec![0.0, 1.0, 0.0])]));

    let err = store.search("not in the stub", 1).await.unwrap_err();
    assert!(matches!(err, MiniRagError::VectorizationFailed { .. }));
}

#[tokio::test]
async fn provider_dimension_mismatch_fails_fast() {
    let store = VectorStore::from_corpus(three_record_corpus())
        .unwrap()
        .with_embedder(stub(&[("q", vec![1.0, 0.0])]));

    let err = store.search("q", 1).await.unwrap_err();
    assert!(matches!(err, MiniRagError::DimensionMismatch { expected: 3, actual: 2 }));
}

#[tokio::test]
async fn semantically_closer_document_ranks_first() {
    let embedder = Arc::new(HashEmbeddingProvider::new(512).unwrap());
    let docs = [("a", "TuristAgent es una app"), ("b", "precios desde $50,000")];

    let mut records = Vec::new();
    for (id, content) in docs {
        records.push(VectorRecord::new(id, content, embedder.embed(content).await.unwrap()));
    }
    let store = VectorStore::from_corpus(Corpus::new(records)).unwrap().with_embedder(embedder);

    let results = store.search("¿Qué es TuristAgent?", 1).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "a");
}

#[tokio::test]
async fn search_does_not_mutate_corpus() {
    let corpus = three_record_corpus();
    let store = VectorStore::from_corpus(corpus.clone())
        .unwrap()
        .with_embedder(stub(&[("q", vec![0.0, 1.0, 0.0])]));

    store.search("q", 3).await.unwrap();
    assert_eq!(store.corpus(), Some(&corpus));
}

/// Generate a non-zero embedding of the given dimension.
fn arb_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
        .prop_filter("non-zero embedding", |v| v.iter().map(|x| x * x).sum::<f32>() > 1e-6)
}

/// Generate an embedding drawn from the whole normal `f32` range.
fn arb_wide_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(prop::num::f32::NORMAL, dim)
}

mod prop_search_ordering {
    use super::*;

    const DIM: usize = 8;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_sorted_and_bounded(
            embeddings in proptest::collection::vec(arb_embedding(DIM), 0..20),
            query in arb_embedding(DIM),
            top_k in 0usize..25,
        ) {
            let corpus: Corpus = embeddings
                .into_iter()
                .enumerate()
                .map(|(i, e)| VectorRecord::new(format!("r{i}"), format!("doc {i}"), e))
                .collect();
            let count = corpus.len();
            let store = VectorStore::from_corpus(corpus).unwrap();

            let results = store.search_by_embedding(&query, top_k).unwrap();

            prop_assert_eq!(results.len(), top_k.min(count));
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
            for r in &results {
                prop_assert!((-1.0..=1.0).contains(&r.score));
            }
        }

        #[test]
        fn self_similarity_is_one_and_negation_is_minus_one(v in arb_embedding(DIM)) {
            let neg: Vec<f32> = v.iter().map(|x| -x).collect();
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
            prop_assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-4);
        }

        #[test]
        fn wide_magnitudes_keep_scores_finite_and_sorted(
            embeddings in proptest::collection::vec(arb_wide_embedding(DIM), 1..10),
            query in arb_wide_embedding(DIM),
        ) {
            let corpus: Corpus = embeddings
                .into_iter()
                .enumerate()
                .map(|(i, e)| VectorRecord::new(format!("r{i}"), format!("doc {i}"), e))
                .collect();
            let count = corpus.len();
            let store = VectorStore::from_corpus(corpus).unwrap();

            let results = store.search_by_embedding(&query, count).unwrap();

            prop_assert_eq!(results.len(), count);
            for r in &results {
                prop_assert!(r.score.is_finite() && (-1.0..=1.0).contains(&r.score));
            }
            for window in results.windows(2) {
                prop_assert!(window[0].score >= window[1].score);
            }
        }

        #[test]
        fn self_similarity_holds_across_magnitudes(v in arb_wide_embedding(DIM)) {
            let neg: Vec<f32> = v.iter().map(|x| -x).collect();
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
            prop_assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-4);
        }
    }
}
