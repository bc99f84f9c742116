// Interactive MedExplain session over stdin.
//
// Usage:
//   medexplain                    answer one question per stdin line
//   medexplain seed <records.json>  index a JSON array of drug records
//
// Environment: MEDEXPLAIN_DB (default medexplain.db), MEDEXPLAIN_CONFIG
// (optional JSON pipeline config), MEDEXPLAIN_* overrides, RUST_LOG.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use medexplain_core::{
    DrugRecord, MedExplainRag, PipelineConfig, SessionRegistry, SqliteDrugStore, VectorStore,
};
use medexplain_llm::{OllamaConfig, OllamaGenerator};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medexplain=info,warn")),
        )
        .with_writer(io::stderr)
        .init();

    let db_path = std::env::var("MEDEXPLAIN_DB").unwrap_or_else(|_| "medexplain.db".to_string());
    let store = SqliteDrugStore::open(&db_path)
        .with_context(|| format!("failed to open drug store at {}", db_path))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_session(&store),
        [cmd, path] if cmd == "seed" => seed(&store, path),
        _ => bail!("usage: medexplain [seed <records.json>]"),
    }
}

fn load_config() -> Result<PipelineConfig> {
    let config = match std::env::var("MEDEXPLAIN_CONFIG") {
        Ok(path) => PipelineConfig::from_json_file(&path)
            .with_context(|| format!("failed to load pipeline config from {}", path))?,
        Err(_) => PipelineConfig::default(),
    };
    config
        .with_env_overrides()
        .context("invalid MEDEXPLAIN_* override")
}

fn seed(store: &SqliteDrugStore, path: &str) -> Result<()> {
    let json = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let records: Vec<DrugRecord> =
        serde_json::from_str(&json).with_context(|| format!("{} is not a JSON array of drug records", path))?;

    let mut indexed = 0;
    for record in &records {
        if store
            .add(record)
            .with_context(|| format!("failed to index {}", record.name))?
        {
            indexed += 1;
        } else {
            tracing::warn!(drug = %record.name, "record has no sections, skipped");
        }
    }

    let stats = store.stats()?;
    tracing::info!(
        indexed,
        total_documents = stats.total_documents,
        total_drugs = stats.total_drugs,
        "seeding complete"
    );
    Ok(())
}

fn run_session(store: &SqliteDrugStore) -> Result<()> {
    let config = load_config()?;
    let ollama = OllamaConfig::from_env();
    let generator = OllamaGenerator::new(&ollama).context("failed to build answer generator")?;
    let translation =
        OllamaGenerator::for_translation(&ollama).context("failed to build translation generator")?;

    tracing::info!(
        model = generator.model(),
        translation_model = translation.model(),
        "MedExplain starting v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut sessions = SessionRegistry::with_limits(config.context_timeout_secs, config.context_capacity);
    let rag = MedExplainRag::new(store, &generator)
        .with_translation_generator(&translation)
        .with_config(config);
    let session = sessions.create();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let context = sessions
            .get_mut(&session)
            .context("session disappeared")?;
        let response = rag.query(question, true, context);

        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    sessions.remove(&session);
    Ok(())
}
