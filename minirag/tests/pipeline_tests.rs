//! End-to-end retrieve/ask over a hashed corpus.

use std::sync::Arc;

use minirag::{
    HashEmbeddingProvider, MiniRagError, RagPipeline, RetrievalConfig, StaticSynthesizer,
    VectorPreprocessor,
};

const DOCS: [&str; 4] = [
    "TuristAgent es una app para planear viajes",
    "Los precios de los paquetes van desde $50,000",
    "El soporte atiende de lunes a viernes",
    "Los viajes incluyen hotel y transporte",
];

async fn build(synthesizer: Option<Arc<StaticSynthesizer>>) -> RagPipeline {
    let embedder = Arc::new(HashEmbeddingProvider::new(512).unwrap());
    let outcome = VectorPreprocessor::new(embedder.clone()).generate(&DOCS).await.unwrap();

    let mut builder = RagPipeline::builder()
        .config(RetrievalConfig::builder().top_k(2).build().unwrap())
        .embedding_provider(embedder)
        .corpus(outcome.corpus);
    if let Some(synthesizer) = synthesizer {
        builder = builder.synthesizer(synthesizer);
    }
    builder.build().unwrap()
}

#[tokio::test]
async fn retrieve_uses_configured_top_k() {
    let pipeline = build(None).await;
    let results = pipeline.retrieve("¿Qué es TuristAgent?").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].content, DOCS[0]);
}

#[tokio::test]
async fn ask_without_synthesizer_returns_sources_only() {
    let pipeline = build(None).await;
    let answer = pipeline.ask("precios de los paquetes").await.unwrap();

    assert!(answer.answer.is_none());
    assert_eq!(answer.sources[0].content, DOCS[1]);
}

#[tokio::test]
async fn ask_forwards_ranked_context_to_synthesizer() {
    let synthesizer = Arc::new(StaticSynthesizer::new("Desde $50,000."));
    let pipeline = build(Some(synthesizer.clone())).await;

    let answer = pipeline.ask("precios de los paquetes").await.unwrap();

    assert_eq!(answer.answer.as_deref(), Some("Desde $50,000."));
    let prompts = synthesizer.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(&format!("1. {}", answer.sources[0].content)));
    assert!(prompts[0].contains(&format!("2. {}", answer.sources[1].content)));
    assert!(prompts[0].contains("Question: precios de los paquetes"));
}

#[tokio::test]
async fn builder_requires_provider_and_corpus() {
    let err = RagPipeline::builder().build().err().unwrap();
    assert!(matches!(
        err,
        MiniRagError::ConfigError(ref msg) if msg.contains("embedding_provider")
    ));

    let err = RagPipeline::builder()
        .embedding_provider(Arc::new(HashEmbeddingProvider::new(8).unwrap()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, MiniRagError::ConfigError(ref msg) if msg.contains("corpus")));
}
