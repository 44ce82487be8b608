use std::collections::HashSet;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use askdocs_core::config::{self, AppConfig};
use askdocs_embed::get_default_embedder;
use askdocs_index::{store, FlatIndex};
use askdocs_ingest::DataProcessor;
use askdocs_rag::completion::GroqClient;
use askdocs_rag::retriever::{Retriever, DEFAULT_TOP_K};
use askdocs_rag::QaEngine;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {prog} <ingest|ask> [args...]");
        eprintln!("  ingest [pdf_dir]     build the index from a directory of PDFs");
        eprintln!("  ask [\"question\"]     answer one question, or start the interactive loop");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    config::load_dotenv();

    let config = AppConfig::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ingest" => ingest(&config, args.first().map(PathBuf::from)),
        "ask" => ask(&config, args.first().cloned()),
        _ => {
            eprintln!("Unknown command: {cmd}");
            std::process::exit(1)
        }
    }
}

/// One-shot batch job: PDFs -> chunks -> embeddings -> index + metadata.
/// Both artifacts are rewritten whole; there is no incremental merge.
fn ingest(config: &AppConfig, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let data_dir = data_dir.unwrap_or_else(|| config.pdf_dir());
    println!("Ingesting from {}", data_dir.display());

    let processor = DataProcessor::new(config.chunking);
    let chunks = processor.process_directory(&data_dir)?;
    if chunks.is_empty() {
        anyhow::bail!("no PDF documents found in {}", data_dir.display());
    }

    let embedder = get_default_embedder(&config.embed)?;
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks")?
            .progress_chars("#>-"),
    );

    let mut vectors = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let vector = embedder
            .embed_batch(std::slice::from_ref(&chunk.text))?
            .pop()
            .context("embedder returned no vector")?;
        vectors.push(vector);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let index = FlatIndex::build(&vectors)?;
    index.save(&config.index_path())?;
    store::save_chunks(&chunks, &config.chunks_path())?;

    let documents: HashSet<&str> = chunks.iter().map(|c| c.source.as_str()).collect();
    println!("Indexed {} chunks from {} documents.", chunks.len(), documents.len());
    Ok(())
}

/// Serving path. Credential and artifact checks happen up front, before
/// any question is accepted; missing either halts with a diagnostic.
fn ask(config: &AppConfig, question: Option<String>) -> anyhow::Result<()> {
    let api_key = config::completion_api_key()?;

    let embedder = get_default_embedder(&config.embed)?;
    let (index, chunks) = store::load_pair(
        &config.index_path(),
        &config.chunks_path(),
        Some(embedder.dim()),
    )
    .context("index artifacts unavailable; run `askdocs ingest` first")?;
    tracing::info!(chunks = chunks.len(), dim = index.dim(), "index loaded");

    let retriever = Retriever::new(embedder, index, chunks)?;
    let completion = GroqClient::new(api_key, config.completion.clone())?;
    let engine = QaEngine::new(retriever, Box::new(completion));

    let runtime = tokio::runtime::Runtime::new()?;
    match question {
        Some(q) => runtime.block_on(answer_one(&engine, &q)),
        None => runtime.block_on(interactive_loop(&engine)),
    }
}

async fn answer_one(engine: &QaEngine, question: &str) -> anyhow::Result<()> {
    if question.trim().is_empty() {
        println!("Please enter a valid question before searching.");
        return Ok(());
    }
    let answer = engine.ask(question, DEFAULT_TOP_K).await;
    println!("\nAnswer:\n{}", answer.text);
    if !answer.evidence.is_empty() {
        println!("\nSources used:");
        for chunk in &answer.evidence {
            println!(
                "\nFrom {} (distance {:.4}):\n{}",
                chunk.source, chunk.distance, chunk.text
            );
        }
    }
    Ok(())
}

async fn interactive_loop(engine: &QaEngine) -> anyhow::Result<()> {
    println!("AskDocs — ask a question about your documents (empty line to quit).");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }
        answer_one(engine, question).await?;
    }
    Ok(())
}
