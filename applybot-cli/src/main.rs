//! ApplyBot CLI - inspect the pipeline, ask a question, or run the web form
//!
//! # Commands
//!
//! ```bash
//! # Show the headers and paragraphs scraped from the source page
//! applybot fetch
//!
//! # Show the question/answer pairs that get indexed
//! applybot pairs
//!
//! # Embed text and show vector stats
//! applybot embed "Why do you want this job?"
//!
//! # Answer one question
//! applybot ask "What makes you a good fit for this position?"
//!
//! # Serve the question form on 127.0.0.1:5000
//! applybot serve
//! ```

mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use applybot_lib::{
    config::Config,
    embed::{Embedder, OpenAiEmbedder},
    extract::extract_pairs,
    fetch::PageFetcher,
    pipeline::DefaultPipeline,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "applybot")]
#[command(about = "Answer job-application questions in your own voice")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./applybot.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Embed with the local BGE model instead of the remote service
    #[cfg(feature = "local-embed")]
    #[arg(long, global = true)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the source page and list its question and answer fragments
    Fetch {
        /// Page to fetch instead of the configured source
        #[arg(long)]
        url: Option<String>,
    },

    /// Fetch the source page and list the extracted question/answer pairs
    Pairs {
        /// Page to fetch instead of the configured source
        #[arg(long)]
        url: Option<String>,
    },

    /// Embed text and show vector info
    Embed {
        /// Text to embed
        text: String,

        /// Treat as query (uses query prompt prefix where the model has one)
        #[arg(short, long)]
        query: bool,
    },

    /// Answer a single question
    Ask {
        /// The application question
        #[arg(default_value = "What makes you a good fit for this position?")]
        question: String,
    },

    /// Serve the question form over HTTP
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };
    Ok(config)
}

fn make_embedder(config: &Config, cli: &Cli) -> Result<Box<dyn Embedder>> {
    #[cfg(feature = "local-embed")]
    if cli.local {
        println!("Loading BGE model (first run downloads ~1.2GB)...");
        return Ok(Box::new(applybot_lib::embed::BgeEmbedder::new()?));
    }
    #[cfg(not(feature = "local-embed"))]
    let _ = cli;

    Ok(Box::new(OpenAiEmbedder::from_config(config)?))
}

fn build_pipeline(config: &Config, cli: &Cli) -> Result<DefaultPipeline> {
    let embedder = make_embedder(config, cli)?;
    let pipeline = DefaultPipeline::with_embedder(config, embedder)?;
    if pipeline.is_ready() {
        println!("Indexed {} question/answer pairs", pipeline.len());
    } else {
        println!("Index could not be built; questions will be answered with an error");
    }
    Ok(pipeline)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Fetch { url } => {
            let url = url.as_deref().unwrap_or(&config.source_url);
            let fetcher = PageFetcher::from_config(&config)?;
            let fragments = fetcher.try_fetch(url)?;

            println!("Fetched {} fragments from {url}:\n", fragments.len());
            for (i, fragment) in fragments.iter().enumerate() {
                let preview: String = fragment.text.chars().take(200).collect();
                let ellipsis = if fragment.text.chars().count() > 200 { "..." } else { "" };
                println!("{:>3}. {:?}: {preview}{ellipsis}", i + 1, fragment.kind);
            }
        }

        Commands::Pairs { url } => {
            let url = url.as_deref().unwrap_or(&config.source_url);
            let fetcher = PageFetcher::from_config(&config)?;
            let pairs = extract_pairs(&fetcher.try_fetch(url)?);

            println!("Extracted {} question/answer pairs from {url}:\n", pairs.len());
            for (i, pair) in pairs.iter().enumerate() {
                println!("--- Pair {} ---", i + 1);
                println!("{}\n", pair.render());
            }
        }

        Commands::Embed { text, query } => {
            let embedder = make_embedder(&config, &cli)?;

            let embedding = if *query {
                println!("Embedding as query: {text}");
                embedder.embed_query(text)?
            } else {
                println!("Embedding as document: {text}");
                embedder
                    .embed_documents(&[text.as_str()])?
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("embedder returned no vectors"))?
            };

            println!("\nEmbedding stats ({}):", embedder.model_name());
            println!("  Dimensions: {}", embedding.len());
            println!("  First 5 values: {:?}", &embedding[..embedding.len().min(5)]);
            println!("  Min: {:.4}", embedding.iter().cloned().fold(f32::INFINITY, f32::min));
            println!("  Max: {:.4}", embedding.iter().cloned().fold(f32::NEG_INFINITY, f32::max));
        }

        Commands::Ask { question } => {
            let pipeline = build_pipeline(&config, &cli)?;
            println!("\nQ: {question}\n");
            println!("{}", pipeline.answer(question));
        }

        Commands::Serve { bind } => {
            let bind = bind.clone().unwrap_or_else(|| config.server.bind.clone());
            // Build before the runtime starts: the blocking HTTP clients must
            // not be created or dropped on an async worker thread.
            let pipeline = Arc::new(build_pipeline(&config, &cli)?);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(Arc::clone(&pipeline), &bind))?;
        }
    }

    Ok(())
}
