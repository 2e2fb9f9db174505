use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::info;

use swingcoach::engine::{CoachingEngine, SessionInput};
use swingcoach::models::session::generate_session_id;
use swingcoach::outcomes::{top_effective_drills, JsonOutcomeStore, OutcomeStore};

/// Analyze one stroke session against a reference and emit coaching
/// recommendations.
#[derive(Parser)]
#[command(name = "swingcoach", version, about)]
struct Cli {
    /// Session input JSON (frame table, phase spans, phase metric tables).
    #[arg(long)]
    input: PathBuf,

    /// Output root holding per-session directories and the outcome store.
    #[arg(long, default_value = "outputs")]
    output_root: PathBuf,

    /// Session id; defaults to a timestamp for the current time.
    #[arg(long)]
    session_id: Option<String>,

    /// How many historically effective drills to list.
    #[arg(long, default_value_t = 5)]
    top_drills: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let contents = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input from {}", cli.input.display()))?;
    let input: SessionInput = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse input at {}", cli.input.display()))?;

    let session_id = cli
        .session_id
        .unwrap_or_else(|| generate_session_id(Utc::now()));

    let engine = CoachingEngine::new(&cli.output_root);
    let analysis = engine.analyze(&session_id, &input)?;

    let session_dir = cli.output_root.join(&session_id);
    fs::create_dir_all(&session_dir)
        .with_context(|| format!("failed to create {}", session_dir.display()))?;
    let analysis_path = session_dir.join("analysis.json");
    fs::write(&analysis_path, serde_json::to_string_pretty(&analysis)?)
        .with_context(|| format!("failed to write {}", analysis_path.display()))?;

    info!(
        "session {session_id}: {} issue(s), {} critical / {} priority / {} maintenance drill(s), {} suppressed",
        analysis.issues.len(),
        analysis.recommendations.critical.len(),
        analysis.recommendations.priority.len(),
        analysis.recommendations.maintenance.len(),
        analysis.recommendations.suppressed_count,
    );

    let store = JsonOutcomeStore::new(&cli.output_root);
    for (name, confidence) in top_effective_drills(&store.load(), cli.top_drills) {
        info!(
            "drill {name}: confidence {:.2} ({:?}) over {} use(s)",
            confidence.confidence_score, confidence.confidence_level, confidence.usage_count
        );
    }

    println!("{}", analysis_path.display());
    Ok(())
}
