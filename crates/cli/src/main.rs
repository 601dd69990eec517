mod config;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::TuneConfig;
use ingest::DocSelection;
use prompt_tune::{
    create_community_summarization_prompt, generate_community_reporter_examples,
    generate_entity_relationship_examples, Docs, OllamaChat, COMMUNITY_SUMMARIZATION_FILENAME,
};

/// Generate a tuned community report summarization prompt from sample documents.
#[derive(Parser, Debug)]
#[command(name = "prompt-tune", version)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long, env = "PROMPT_TUNE_CONFIG")]
    config: Option<PathBuf>,

    /// File or directory with .txt/.md input documents
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Directory the generated prompt is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, env = "OLLAMA_MODEL")]
    model: Option<String>,

    #[arg(long, env = "OLLAMA_BASE_URL")]
    base_url: Option<String>,

    #[arg(long)]
    language: Option<String>,

    /// Ask the model for JSON formatted answers
    #[arg(long)]
    json_mode: bool,

    /// Number of chunks kept by the top/random selection
    #[arg(long)]
    limit: Option<usize>,

    /// all, top or random
    #[arg(long)]
    selection: Option<DocSelection>,

    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(self, mut config: TuneConfig) -> TuneConfig {
        if let Some(root) = self.root {
            config.input.root = root;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.llm.base_url = base_url;
        }
        if let Some(language) = self.language {
            config.prompt.language = language;
        }
        if self.json_mode {
            config.prompt.json_mode = true;
        }
        if let Some(limit) = self.limit {
            config.input.load.limit = limit;
        }
        if let Some(selection) = self.selection {
            config.input.load.selection = selection;
        }
        if let Some(seed) = self.seed {
            config.input.load.seed = seed;
        }
        config
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_json);

    match run(args).await {
        Ok(path) => {
            info!(path = %path.display(), "Prompt tuning finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "Prompt tuning failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<PathBuf> {
    let config = match &args.config {
        Some(path) => TuneConfig::from_file(path)?,
        None => TuneConfig::default(),
    };
    let config = args.apply(config);

    let docs = ingest::load_docs(&config.input.root, &config.input.load)
        .await
        .context("Failed to load input documents")?;
    info!(docs = docs.len(), root = ?config.input.root, "Loaded documents");
    let docs = Docs::from(docs);

    let model = OllamaChat::with_timeout(
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        Duration::from_secs(config.llm.request_timeout_secs),
    )?;

    let prompt = &config.prompt;
    let entity_types = prompt.entity_types();

    info!(model = model.model(), "Generating entity/relationship examples");
    let extractions = generate_entity_relationship_examples(
        &model,
        &prompt.persona,
        entity_types.as_ref(),
        &docs,
        &prompt.language,
        prompt.json_mode,
    )
    .await
    .context("Failed to generate entity/relationship examples")?;

    info!(examples = extractions.len(), "Generating community report examples");
    let mut rng = StdRng::seed_from_u64(config.input.load.seed);
    let examples = generate_community_reporter_examples(
        &model,
        &prompt.persona,
        &extractions,
        Some(prompt.community_reporter_role.as_str()),
        Some(prompt.report_rating_description.as_str()),
        &docs,
        &prompt.language,
        prompt.json_mode,
        &mut rng,
    )
    .await
    .context("Failed to generate community report examples")?;

    create_community_summarization_prompt(
        &prompt.persona,
        &prompt.community_reporter_role,
        &prompt.report_rating_description,
        &examples,
        &prompt.language,
        Some(config.output_dir.as_path()),
    )?;

    Ok(config.output_dir.join(COMMUNITY_SUMMARIZATION_FILENAME))
}
