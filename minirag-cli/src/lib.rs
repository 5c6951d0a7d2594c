//! Command-line front end for minirag.
//!
//! ```text
//! minirag preprocess --input docs.txt --output corpus.json
//! minirag search --corpus corpus.json --top-k 3 "¿Qué es TuristAgent?"
//! minirag ask --corpus corpus.json "¿Cuánto cuesta?"
//! ```

pub mod telemetry;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use minirag::{
    ChatCompletionSynthesizer, ChatConfig, Corpus, EmbeddingConfig, EmbeddingProvider,
    HashEmbeddingProvider, OpenAIEmbeddingProvider, RagPipeline, RetrievalConfig, SearchResult,
    VectorPreprocessor, VectorStore, load_documents,
};
use tracing::info;

/// Default vector length for the offline hash embedder.
pub const DEFAULT_HASH_DIMENSIONS: usize = 256;

/// Build and query retrieval corpora.
#[derive(Debug, Parser)]
#[command(name = "minirag", version, about)]
pub struct Cli {
    /// Embedding backend; both preprocessing and querying must use the same one.
    #[arg(long, value_enum, default_value_t = EmbedderKind::Hash, global = true)]
    pub embedder: EmbedderKind,

    /// Embedding dimensions (hash: bucket count, openai: truncation override).
    #[arg(long, global = true)]
    pub dimensions: Option<usize>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
    /// Offline token hashing.
    Hash,
    /// OpenAI-compatible embeddings API (needs OPENAI_API_KEY).
    Openai,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Embed raw documents and write a corpus file.
    Preprocess {
        /// Documents: a JSON array of strings, or one document per line.
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the corpus.
        #[arg(short, long, default_value = "corpus.json")]
        output: PathBuf,
    },
    /// Rank corpus documents against a query.
    Search {
        /// Corpus file produced by `preprocess`.
        #[arg(short, long, default_value = "corpus.json")]
        corpus: PathBuf,
        /// Number of results.
        #[arg(short = 'k', long, default_value_t = 3)]
        top_k: usize,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
        /// The query text.
        query: String,
    },
    /// Retrieve context and ask the chat model for an answer.
    Ask {
        /// Corpus file produced by `preprocess`.
        #[arg(short, long, default_value = "corpus.json")]
        corpus: PathBuf,
        /// Number of context snippets.
        #[arg(short = 'k', long, default_value_t = 3)]
        top_k: usize,
        /// The question.
        question: String,
    },
}

impl Cli {
    /// Construct the embedding provider selected on the command line.
    pub fn embedder(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        match self.embedder {
            EmbedderKind::Hash => {
                let dimensions = self.dimensions.unwrap_or(DEFAULT_HASH_DIMENSIONS);
                Ok(Arc::new(HashEmbeddingProvider::new(dimensions)?))
            }
            EmbedderKind::Openai => {
                let mut config = EmbeddingConfig::from_env()?;
                if let Some(dimensions) = self.dimensions {
                    config = config.with_dimensions(dimensions);
                }
                Ok(Arc::new(OpenAIEmbeddingProvider::new(config)?))
            }
        }
    }
}

/// Execute the parsed command, writing user-facing output to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let embedder = cli.embedder()?;
    info!(embedder = embedder.name(), "starting");

    match cli.command {
        Command::Preprocess { input, output } => preprocess(embedder, input, output, out).await,
        Command::Search { corpus, top_k, json, query } => {
            let mut store = VectorStore::new().with_embedder(embedder);
            store.load(&corpus)?;
            let results = store.search(&query, top_k).await?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &results)?;
                writeln!(out)?;
            } else {
                print_results(&results, out)?;
            }
            Ok(())
        }
        Command::Ask { corpus, top_k, question } => {
            let config = RetrievalConfig::builder().top_k(top_k).build()?;
            let synthesizer = ChatCompletionSynthesizer::new(ChatConfig::from_env()?)?;
            let pipeline = RagPipeline::builder()
                .config(config)
                .embedding_provider(embedder)
                .corpus(Corpus::load(&corpus)?)
                .synthesizer(Arc::new(synthesizer))
                .build()?;

            let answer = pipeline.ask(&question).await?;
            writeln!(out, "{}", answer.answer.unwrap_or_default().trim())?;
            writeln!(out, "\nSources:")?;
            print_results(&answer.sources, out)?;
            Ok(())
        }
    }
}

async fn preprocess(
    embedder: Arc<dyn EmbeddingProvider>,
    input: PathBuf,
    output: PathBuf,
    out: &mut impl Write,
) -> Result<()> {
    let documents = load_documents(&input)?;
    writeln!(out, "Embedding {} document(s) from {}...", documents.len(), input.display())?;

    let outcome = VectorPreprocessor::new(embedder).generate(&documents).await?;
    for skipped in &outcome.skipped {
        writeln!(out, "  skipped #{}: {}", skipped.index, skipped.reason)?;
    }
    if outcome.corpus.is_empty() && !documents.is_empty() {
        bail!("none of the {} documents could be embedded", documents.len());
    }

    outcome
        .corpus
        .save(&output)
        .with_context(|| format!("failed to write corpus to {}", output.display()))?;
    writeln!(
        out,
        "Wrote {} record(s) to {} ({} skipped)",
        outcome.corpus.len(),
        output.display(),
        outcome.skipped.len()
    )?;
    Ok(())
}

/// Print ranked results, one per line.
pub fn print_results(results: &[SearchResult], out: &mut impl Write) -> Result<()> {
    if results.is_empty() {
        writeln!(out, "  (no results)")?;
    }
    for (i, result) in results.iter().enumerate() {
        let rank = i + 1;
        writeln!(out, "  {rank}. [score={:.4}] {} | {}", result.score, result.id, result.content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "minirag", "search", "-k", "5", "--dimensions", "64", "-vv", "hello there",
        ])
        .unwrap();

        assert_eq!(cli.embedder, EmbedderKind::Hash);
        assert_eq!(cli.dimensions, Some(64));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Search { top_k, query, json, .. } => {
                assert_eq!(top_k, 5);
                assert_eq!(query, "hello there");
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_top_k_is_rejected() {
        assert!(Cli::try_parse_from(["minirag", "search", "-k", "-1", "q"]).is_err());
    }

    #[test]
    fn print_results_numbers_lines() {
        let mut buf = Vec::new();
        let results = vec![SearchResult { id: "a".into(), content: "alpha".into(), score: 0.5 }];
        print_results(&results, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "  1. [score=0.5000] a | alpha\n");
    }
}
