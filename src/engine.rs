//! Single-session orchestration.
//!
//! Runs the full decision path for one analyzed stroke session: annotate
//! metrics with reliability and stability, score the session, compare
//! against the previous session, detect/score/classify issues, prescribe
//! drills, then record drill outcomes for the previous session's
//! prescriptions. Everything past input validation degrades to smaller
//! output instead of failing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::drills::{recommend, DrillCatalog};
use crate::issues::detect_issues;
use crate::models::drill::{DrillPrescription, RecommendationSet};
use crate::models::issue::ClassifiedIssue;
use crate::models::metric::{FrameTable, PhaseMetricTable};
use crate::models::outcome::DrillConfidence;
use crate::models::phase::{Phase, PhaseMap, PhaseSpan};
use crate::models::session::{SessionScores, SessionSummary};
use crate::outcomes::{confidence_scores, track_outcomes, JsonOutcomeStore, OutcomeStore};
use crate::priority::{classify, compute_priority, IssueSignals, PriorityConfig};
use crate::progress::{self, Baseline, BaselineStatus, ProgressDeltas};
use crate::reliability::{assess_all, ReliabilityAssessment, ReliabilityLevel};
use crate::scores::session_scores;
use crate::stability::{analyze_phases, PhaseStability};

pub const RECOMMENDATIONS_FILE: &str = "drill_recommendations.json";

/// Defaults used when a metric or phase has no annotation of its own.
const DEFAULT_RELIABILITY: ReliabilityLevel = ReliabilityLevel::Medium;
const DEFAULT_STABILITY: f64 = 75.0;

/// Everything the upstream pose/feature/segmentation stages hand over for
/// one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInput {
    pub frames: FrameTable,
    /// Raw phase boundaries; validated into a `PhaseMap` during analysis.
    pub phase_spans: BTreeMap<Phase, PhaseSpan>,
    pub user_phase_metrics: PhaseMetricTable,
    pub ref_phase_metrics: PhaseMetricTable,
    pub user_impact_metrics: BTreeMap<String, f64>,
    pub ref_impact_metrics: BTreeMap<String, f64>,
}

/// Full analysis output for one session, the contract consumed by the
/// report stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub session_id: String,
    pub scores: SessionScores,
    pub reliability: BTreeMap<String, ReliabilityAssessment>,
    pub stability: BTreeMap<Phase, PhaseStability>,
    pub baseline: BaselineStatus,
    pub progress: ProgressDeltas,
    /// All issues, priority score descending.
    pub issues: Vec<ClassifiedIssue>,
    pub recommendations: RecommendationSet,
    /// Historical drill effectiveness, first-appearance order. Read-only
    /// diagnostics; not an input to this session's recommendations.
    pub drill_confidence: Vec<(String, DrillConfidence)>,
    /// Outcome records appended for the previous session's drills.
    pub outcomes_recorded: usize,
}

pub struct CoachingEngine {
    output_root: PathBuf,
    config: PriorityConfig,
    catalog: DrillCatalog,
}

impl CoachingEngine {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            config: PriorityConfig::default(),
            catalog: DrillCatalog::default(),
        }
    }

    pub fn with_config(mut self, config: PriorityConfig) -> Self {
        self.config = config;
        self
    }

    /// Analyze one session end to end. Fails only on structurally invalid
    /// input; persistence and tracking problems are logged and absorbed.
    pub fn analyze(&self, session_id: &str, input: &SessionInput) -> Result<SessionAnalysis> {
        let phases = PhaseMap::new(input.phase_spans.clone()).context("invalid phase map")?;

        let reliability = assess_all(&input.frames);
        let stability = analyze_phases(&input.frames, &phases);
        let scores = session_scores(
            &input.user_impact_metrics,
            &input.ref_impact_metrics,
            &input.user_phase_metrics,
            &input.ref_phase_metrics,
        );

        let baseline = progress::load_baseline(&self.output_root, session_id);
        let deltas = match baseline.summary() {
            Some(summary) => progress::compute_deltas(&scores, &summary.scores),
            None => ProgressDeltas::default(),
        };

        let issues = self.classify_issues(input, &reliability, &stability, &deltas);
        let recommendations = recommend(&issues, &self.catalog);

        self.persist_session(session_id, &scores, input, &recommendations);
        let outcomes_recorded =
            self.record_outcomes(session_id, &baseline, input, &reliability);

        let store = JsonOutcomeStore::new(&self.output_root);
        let drill_confidence = confidence_scores(&store.load());

        Ok(SessionAnalysis {
            session_id: session_id.to_string(),
            scores,
            reliability,
            stability,
            baseline: BaselineStatus::from(&baseline),
            progress: deltas,
            issues,
            recommendations,
            drill_confidence,
            outcomes_recorded,
        })
    }

    fn classify_issues(
        &self,
        input: &SessionInput,
        reliability: &BTreeMap<String, ReliabilityAssessment>,
        stability: &BTreeMap<Phase, PhaseStability>,
        deltas: &ProgressDeltas,
    ) -> Vec<ClassifiedIssue> {
        let mut classified: Vec<ClassifiedIssue> =
            detect_issues(&input.user_phase_metrics, &input.ref_phase_metrics)
                .into_iter()
                .map(|issue| {
                    let level = reliability
                        .get(&issue.metric)
                        .map(|a| a.level)
                        .unwrap_or(DEFAULT_RELIABILITY);
                    let phase_stability = stability
                        .get(&issue.phase)
                        .map(|s| s.overall_score)
                        .unwrap_or(DEFAULT_STABILITY);
                    let progress_delta = deltas.phase_delta(issue.phase);

                    let score = compute_priority(
                        &issue.metric,
                        issue.deviation,
                        issue.phase,
                        level,
                        phase_stability,
                        progress_delta,
                        &self.config,
                    );
                    let signals = IssueSignals::derive(
                        &issue.metric,
                        issue.deviation,
                        level,
                        phase_stability,
                        progress_delta,
                        &self.config,
                    );
                    let (classification, advice) = classify(&signals);

                    ClassifiedIssue {
                        issue,
                        score,
                        classification,
                        advice: advice.to_string(),
                        reliability: level,
                        phase_stability,
                        progress_delta,
                    }
                })
                .collect();

        // Stable sort: equal scores keep detection order.
        classified.sort_by(|a, b| {
            b.score
                .total
                .partial_cmp(&a.score.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        classified
    }

    /// Persist this session's summary and prescriptions for the next run.
    /// Failures degrade the next session's progress/outcome data, not this
    /// session's analysis.
    fn persist_session(
        &self,
        session_id: &str,
        scores: &SessionScores,
        input: &SessionInput,
        recommendations: &RecommendationSet,
    ) {
        let summary = SessionSummary {
            session_id: session_id.to_string(),
            recorded_at: Utc::now(),
            scores: scores.clone(),
            phase_metrics: input.user_phase_metrics.clone(),
        };
        if let Err(err) = progress::save_summary(&self.output_root, &summary) {
            warn!("could not persist session summary: {err:#}");
        }

        let prescriptions: Vec<&DrillPrescription> = recommendations.all().collect();
        if let Err(err) = self.write_recommendations(session_id, &prescriptions) {
            warn!("could not persist drill recommendations: {err:#}");
        }
    }

    fn write_recommendations(
        &self,
        session_id: &str,
        prescriptions: &[&DrillPrescription],
    ) -> Result<()> {
        let dir = self.output_root.join(session_id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create session dir {}", dir.display()))?;
        let path = dir.join(RECOMMENDATIONS_FILE);
        let serialized = serde_json::to_string_pretty(prescriptions)?;
        fs::write(&path, serialized)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn load_previous_recommendations(&self, session_id: &str) -> Option<Vec<DrillPrescription>> {
        let path = self
            .output_root
            .join(session_id)
            .join(RECOMMENDATIONS_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("could not read {}: {err}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(prescriptions) => Some(prescriptions),
            Err(err) => {
                warn!("ignoring unparseable recommendations at {}: {err}", path.display());
                None
            }
        }
    }

    /// Record outcomes for the previous session's drills. Observation
    /// only; the current session's analysis is already complete.
    fn record_outcomes(
        &self,
        session_id: &str,
        baseline: &Baseline,
        input: &SessionInput,
        reliability: &BTreeMap<String, ReliabilityAssessment>,
    ) -> usize {
        let Some(previous) = baseline.summary() else {
            return 0;
        };
        let Some(prescriptions) = self.load_previous_recommendations(&previous.session_id) else {
            return 0;
        };

        let outcomes = track_outcomes(
            &previous.session_id,
            session_id,
            &prescriptions,
            &previous.phase_metrics,
            &input.user_phase_metrics,
            reliability,
            Utc::now(),
        );
        if outcomes.is_empty() {
            return 0;
        }

        let store = JsonOutcomeStore::new(&self.output_root);
        match store.append(&outcomes) {
            Ok(total) => {
                info!(
                    "recorded {} drill outcome(s), history now {total}",
                    outcomes.len()
                );
                outcomes.len()
            }
            Err(err) => {
                // Tracking must never take the pipeline down with it.
                warn!("could not append drill outcomes: {err:#}");
                0
            }
        }
    }
}
