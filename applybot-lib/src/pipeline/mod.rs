//! Question answering pipeline
//!
//! Built once at start-up (fetch -> extract -> index), then answers any
//! number of questions (retrieve -> assemble prompt -> generate). Answering
//! never fails: every error comes back as a readable message instead.
//!
//! # Usage
//!
//! ```ignore
//! use applybot_lib::{config::Config, pipeline::DefaultPipeline};
//!
//! let pipeline = DefaultPipeline::from_config(&Config::load()?)?;
//! println!("{}", pipeline.answer("What makes you a good fit for this position?"));
//! ```

use crate::config::Config;
use crate::embed::{Embedder, OpenAiEmbedder};
use crate::extract::extract_pairs;
use crate::fetch::PageFetcher;
use crate::generate::{Generator, OpenAiGenerator};
use crate::index::QaIndex;
use crate::prompt::assemble;
use crate::retrieve::Retriever;
use crate::store::{MemoryStore, VectorStore};
use crate::{Error, Result};

/// Pipeline wired to the remote OpenAI-compatible services.
pub type DefaultPipeline = Pipeline<Box<dyn Embedder>, MemoryStore, Box<dyn Generator>>;

/// Whether start-up produced something to retrieve from.
///
/// Decided once in [`Pipeline::initialize`] and never changes afterwards.
pub enum IndexState<E: Embedder, S: VectorStore> {
    Ready(Retriever<E, S>),
    NotReady(String),
}

pub struct Pipeline<E: Embedder, S: VectorStore, G: Generator> {
    state: IndexState<E, S>,
    generator: G,
}

impl<E: Embedder, S: VectorStore, G: Generator> Pipeline<E, S, G> {
    /// Wrap an already-decided index state.
    #[must_use]
    pub fn new(state: IndexState<E, S>, generator: G) -> Self {
        Self { state, generator }
    }

    /// Fetch the source page, pair up its questions and answers, and index
    /// them. Failures leave the pipeline not ready instead of erroring.
    pub fn initialize(
        fetcher: &PageFetcher,
        url: &str,
        embedder: E,
        store: S,
        generator: G,
        k: usize,
    ) -> Self {
        let fragments = fetcher.fetch(url);
        if fragments.is_empty() {
            tracing::error!("No documents were loaded from {url}");
            return Self::new(
                IndexState::NotReady(format!("no content could be loaded from {url}")),
                generator,
            );
        }

        let pairs = extract_pairs(&fragments);
        tracing::info!("Extracted {} question/answer pairs", pairs.len());
        if pairs.is_empty() {
            return Self::new(
                IndexState::NotReady(format!("no question/answer pairs found at {url}")),
                generator,
            );
        }

        let state = match QaIndex::build(embedder, store, &pairs, Some(url)) {
            Ok(index) => {
                tracing::info!("vectorstore created");
                IndexState::Ready(Retriever::new(index, k))
            }
            Err(e) => {
                tracing::error!("vectorstore creation failed: {e}");
                IndexState::NotReady(e.to_string())
            }
        };

        Self::new(state, generator)
    }

    /// Answer `question` in the applicant's voice.
    ///
    /// Errors are returned as `"An error occurred: ..."` rather than raised.
    pub fn answer(&self, question: &str) -> String {
        self.try_answer(question)
            .unwrap_or_else(|e| format!("An error occurred: {e}"))
    }

    /// Answer `question`, returning any failure to the caller.
    pub fn try_answer(&self, question: &str) -> Result<String> {
        let retriever = match &self.state {
            IndexState::Ready(retriever) => retriever,
            IndexState::NotReady(reason) => return Err(Error::NotReady(reason.clone())),
        };

        let documents = retriever.retrieve(question)?;
        tracing::debug!("returned {} documents", documents.len());

        let prompt = assemble(&documents, question);
        self.generator.generate(&prompt)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, IndexState::Ready(_))
    }

    /// Returns the number of indexed documents (0 when not ready).
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.state {
            IndexState::Ready(retriever) => retriever.index().len(),
            IndexState::NotReady(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

impl DefaultPipeline {
    /// Build the pipeline against the services named in `config`.
    ///
    /// Only client construction can fail here; fetch and index failures
    /// produce a not-ready pipeline.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = PageFetcher::from_config(config)?;
        let embedder: Box<dyn Embedder> = Box::new(OpenAiEmbedder::from_config(config)?);
        let generator: Box<dyn Generator> = Box::new(OpenAiGenerator::from_config(config)?);

        Ok(Self::initialize(
            &fetcher,
            &config.source_url,
            embedder,
            MemoryStore::new(),
            generator,
            config.top_k,
        ))
    }

    /// Like [`from_config`](Self::from_config) but with a caller-supplied
    /// embedder (e.g. a local model).
    pub fn with_embedder(config: &Config, embedder: Box<dyn Embedder>) -> Result<Self> {
        let fetcher = PageFetcher::from_config(config)?;
        let generator: Box<dyn Generator> = Box::new(OpenAiGenerator::from_config(config)?);

        Ok(Self::initialize(
            &fetcher,
            &config.source_url,
            embedder,
            MemoryStore::new(),
            generator,
            config.top_k,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::embed::Embedding;
    use crate::extract::QaPair;
    use crate::retrieve::DEFAULT_TOP_K;
    use crate::testing::{EchoGenerator, FailingEmbedder, FailingGenerator, WordEmbedder};

    fn pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("Why do you want this job?", "I love building tools for developers."),
            QaPair::new("What is your greatest strength?", "Persistence."),
            QaPair::new(
                "Tell us about a project you are proud of.",
                "A compiler for a toy language.",
            ),
        ]
    }

    fn ready<G: Generator>(generator: G) -> Pipeline<WordEmbedder, MemoryStore, G> {
        let index =
            QaIndex::build(WordEmbedder::default(), MemoryStore::new(), &pairs(), None).unwrap();
        Pipeline::new(IndexState::Ready(Retriever::new(index, DEFAULT_TOP_K)), generator)
    }

    /// Gives every third document a vector whose similarity to any query
    /// cannot be ranked.
    struct UnrankableEmbedder {
        component: f32,
    }

    impl Embedder for UnrankableEmbedder {
        fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
            Ok((0..texts.len())
                .map(|i| {
                    if i % 3 == 0 {
                        vec![self.component, self.component]
                    } else {
                        vec![1.0, 0.0]
                    }
                })
                .collect())
        }

        fn embed_query(&self, _text: &str) -> Result<Embedding> {
            Ok(vec![1.0, 1.0])
        }

        fn model_name(&self) -> &str {
            "unrankable"
        }
    }

    fn page_of(n: usize) -> String {
        (0..n)
            .map(|i| format!("<h3>Question {i}?</h3><p>Answer {i}.</p>"))
            .collect()
    }

    fn fetcher() -> PageFetcher {
        PageFetcher::new("applybot-test/1.0", Duration::from_secs(5)).unwrap()
    }

    /// Serve `body` as HTML to one request.
    fn serve_page(body: &str) -> (String, thread::JoinHandle<()>) {
        let body = body.to_string();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).unwrap();
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        (url, handle)
    }

    #[test]
    fn test_answer_uses_retrieved_context() {
        let pipeline = ready(EchoGenerator);

        let answer = pipeline.answer("Why do you want this job?");

        assert!(answer.contains("Qa_pair: Q: Why do you want this job?\nA: I love building tools"));
        assert!(answer.contains("Question: Why do you want this job?"));
    }

    #[test]
    fn test_generator_failure_becomes_message() {
        let pipeline = ready(FailingGenerator);

        let answer = pipeline.answer("x");

        assert!(answer.starts_with("An error occurred:"));
        assert!(answer.contains("model unavailable"));
    }

    #[test]
    fn test_retrieval_failure_becomes_message() {
        let index = QaIndex::build(FailingEmbedder, MemoryStore::new(), &[], None).unwrap();
        let pipeline = Pipeline::new(IndexState::Ready(Retriever::new(index, 4)), EchoGenerator);

        let answer = pipeline.answer("x");

        assert!(answer.starts_with("An error occurred: retrieval error"));
    }

    #[test]
    fn test_not_ready_answers_with_message() {
        let pipeline: Pipeline<WordEmbedder, MemoryStore, _> =
            Pipeline::new(IndexState::NotReady("source unreachable".into()), EchoGenerator);

        let answer = pipeline.answer("x");

        assert!(!pipeline.is_ready());
        assert_eq!(pipeline.len(), 0);
        assert_eq!(answer, "An error occurred: index not ready: source unreachable");
    }

    #[test]
    fn test_answer_is_idempotent() {
        let pipeline = ready(EchoGenerator);

        let first = pipeline.answer("What is your greatest strength?");
        let second = pipeline.answer("What is your greatest strength?");

        assert_eq!(first, second);
    }

    #[test]
    fn test_initialize_unreachable_source_is_not_ready() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let pipeline = Pipeline::initialize(
            &fetcher(),
            &format!("http://127.0.0.1:{port}/"),
            WordEmbedder::default(),
            MemoryStore::new(),
            EchoGenerator,
            DEFAULT_TOP_K,
        );

        assert!(!pipeline.is_ready());
        assert!(pipeline.answer("x").starts_with("An error occurred: index not ready"));
    }

    #[test]
    fn test_initialize_builds_index_from_page() {
        let (url, server) = serve_page(
            "<h3>Why this role?</h3><p>It matches my experience.</p>\
             <h3>Salary expectations?</h3><p>Negotiable.</p>",
        );

        let pipeline = Pipeline::initialize(
            &fetcher(),
            &url,
            WordEmbedder::default(),
            MemoryStore::new(),
            EchoGenerator,
            DEFAULT_TOP_K,
        );
        server.join().unwrap();

        assert!(pipeline.is_ready());
        assert_eq!(pipeline.len(), 2);
        assert!(pipeline.answer("Why this role?").contains("It matches my experience."));
    }

    #[test]
    fn test_initialize_page_without_pairs_is_not_ready() {
        let (url, server) = serve_page("<h1>Nothing here</h1>");

        let pipeline = Pipeline::initialize(
            &fetcher(),
            &url,
            WordEmbedder::default(),
            MemoryStore::new(),
            EchoGenerator,
            DEFAULT_TOP_K,
        );
        server.join().unwrap();

        assert!(!pipeline.is_ready());
    }

    #[test]
    fn test_initialize_embedding_failure_is_not_ready() {
        let (url, server) = serve_page("<h3>Q?</h3><p>A.</p>");

        let pipeline = Pipeline::initialize(
            &fetcher(),
            &url,
            FailingEmbedder,
            MemoryStore::new(),
            EchoGenerator,
            DEFAULT_TOP_K,
        );
        server.join().unwrap();

        assert!(!pipeline.is_ready());
        assert!(pipeline.answer("Q?").contains("index build error"));
    }

    #[test]
    fn test_infinite_vectors_leave_pipeline_not_ready() {
        let page = page_of(64);
        let (url, server) = serve_page(&page);

        let pipeline = Pipeline::initialize(
            &fetcher(),
            &url,
            UnrankableEmbedder { component: f32::INFINITY },
            MemoryStore::new(),
            EchoGenerator,
            DEFAULT_TOP_K,
        );
        server.join().unwrap();

        assert!(!pipeline.is_ready());
        assert!(pipeline.answer("x").starts_with("An error occurred: index not ready"));
    }

    #[test]
    fn test_nan_similarities_still_answer() {
        // Finite components whose dot product and norms overflow to inf
        let page = page_of(64);
        let (url, server) = serve_page(&page);

        let pipeline = Pipeline::initialize(
            &fetcher(),
            &url,
            UnrankableEmbedder { component: f32::MAX },
            MemoryStore::new(),
            EchoGenerator,
            DEFAULT_TOP_K,
        );
        server.join().unwrap();

        let answer = pipeline.answer("x");

        assert!(pipeline.is_ready());
        assert!(!answer.starts_with("An error occurred"), "{answer}");
        assert!(answer.contains("Q: Question 1?\nA: Answer 1."));
    }
}
