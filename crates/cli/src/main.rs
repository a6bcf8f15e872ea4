use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexSet;
use sequencer_engine::{
    EditSession, EditSessionState, JsonFileCollectionSource, PreviewTarget, RemoteCollectionSource, SessionAction, SessionDriver,
    SessionEvent, SessionPhase, ShortUniqueLabeler,
};
use sequencer_types::SequenceRecord;
use sequencer_util::{SequencerSettings, expand_tilde};
use serde::Serialize;
use tracing::{Level, info, warn};

/// Inspect and edit a sequence collection.
#[derive(Parser, Debug)]
#[command(name = "sequencer", version, about)]
struct Args {
    /// Collection file to use instead of the configured one
    #[arg(long, global = true)]
    collection: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ids of every sequence
    List,
    /// Print one sequence as JSON
    Show { id: String },
    /// Replay a YAML or JSON list of session actions and print the final state
    Run {
        script: PathBuf,

        /// Source key offered when adding inputs (repeatable); defaults to every key
        /// the collection already mentions
        #[arg(long = "source-key")]
        source_keys: Vec<String>,
    },
}

/// Final state printed by `run`.
#[derive(Debug, Serialize)]
struct RunReport {
    phase: SessionPhase,
    sequence_ids: Vec<String>,
    /// Highlighted row of the input list, 0 being the "none selected" row
    selected_row: usize,
    preview: PreviewTarget,
    state: EditSessionState,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let Args { collection, command } = Args::parse();

    let settings = SequencerSettings::load().context("failed to load settings")?;
    let collection_path = collection.unwrap_or_else(|| settings.collection_path());
    let source = Arc::new(
        JsonFileCollectionSource::open(&collection_path)
            .await
            .with_context(|| format!("failed to open collection {}", collection_path.display()))?,
    );

    match command {
        Command::List => {
            for record in source.collection().await? {
                println!("{}", record.id);
            }
        }
        Command::Show { id } => {
            let record = source
                .collection()
                .await?
                .into_iter()
                .find(|record| record.id == id)
                .with_context(|| format!("no sequence named '{id}'"))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Run { script, source_keys } => {
            let report = run_script(&settings, source, &script, source_keys).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_script(
    settings: &SequencerSettings,
    source: Arc<JsonFileCollectionSource>,
    script: &Path,
    source_keys: Vec<String>,
) -> Result<RunReport> {
    let script = expand_tilde(&script.to_string_lossy());
    let actions = load_script(&script)?;
    info!(path = %script.display(), actions = actions.len(), "replaying script");

    let mut session = EditSession::with_settings(Arc::new(ShortUniqueLabeler), settings).context("invalid candidate pattern")?;
    let collection = source.collection().await?;
    session.set_source_keys(if source_keys.is_empty() {
        known_keys(&collection)
    } else {
        source_keys
    });

    let (mut driver, _state_rx) = SessionDriver::new(session, source);
    driver.sync().await?;
    for (step, action) in actions.into_iter().enumerate() {
        if let Err(error) = driver.handle(SessionEvent::Action(action)).await {
            warn!(step, error = %error, "action rejected");
        }
    }
    driver.sync().await?;

    let session = driver.into_session();
    Ok(RunReport {
        phase: session.phase(),
        sequence_ids: session.sequence_ids().into_iter().map(str::to_string).collect(),
        selected_row: session.state().selected_row(),
        preview: session.preview_target(),
        state: session.snapshot(),
    })
}

/// Parses a script file. JSON is valid YAML, so one parser covers both.
fn load_script(path: &Path) -> Result<Vec<SessionAction>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse script {}", path.display()))
}

/// Every input and output key mentioned by the collection, first occurrence first.
fn known_keys(collection: &[SequenceRecord]) -> Vec<String> {
    let mut keys = IndexSet::new();
    for record in collection {
        for input in &record.inputs {
            keys.insert(input.source_key.clone());
        }
        keys.insert(record.output_key.clone());
    }
    keys.into_iter().collect()
}
