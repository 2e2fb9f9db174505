use std::collections::BTreeMap;
use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Stroke phases in temporal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preparation,
    Load,
    Contact,
    FollowThrough,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Preparation,
        Phase::Load,
        Phase::Contact,
        Phase::FollowThrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Preparation => "preparation",
            Phase::Load => "load",
            Phase::Contact => "contact",
            Phase::FollowThrough => "follow_through",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive frame range for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpan {
    pub start: usize,
    pub end: usize,
}

/// Phase boundaries for one stroke, produced once per session by the
/// segmentation stage and immutable afterward. Only constructible through
/// validation.
#[derive(Debug, Clone)]
pub struct PhaseMap {
    spans: BTreeMap<Phase, PhaseSpan>,
}

impl PhaseMap {
    /// Build a validated map. Requires all four phases, each span ordered
    /// within itself and strictly after the previous phase's span.
    pub fn new(spans: BTreeMap<Phase, PhaseSpan>) -> Result<Self> {
        let mut prev_end: Option<usize> = None;
        for phase in Phase::ALL {
            let span = spans
                .get(&phase)
                .ok_or_else(|| anyhow!("phase map is missing {phase}"))?;
            if span.end < span.start {
                return Err(anyhow!(
                    "phase {phase} has inverted range {}..{}",
                    span.start,
                    span.end
                ));
            }
            if let Some(end) = prev_end {
                if span.start <= end {
                    return Err(anyhow!(
                        "phase {phase} starts at {} but the previous phase ends at {end}",
                        span.start
                    ));
                }
            }
            prev_end = Some(span.end);
        }
        Ok(Self { spans })
    }

    pub fn span(&self, phase: Phase) -> PhaseSpan {
        // Validated at construction, all four phases are present.
        self.spans[&phase]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Phase, PhaseSpan)> + '_ {
        Phase::ALL.into_iter().map(|p| (p, self.spans[&p]))
    }
}
