//! Static drill knowledge base.
//!
//! Modeled as an immutable data table (category -> ordered drill list)
//! rather than inline conditionals, so recommendation policy can be tested
//! and tuned without touching scoring logic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::drill::Intensity;

/// Issue categories a metric can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillCategory {
    HipRotation,
    ElbowAngles,
    KneeStability,
    StanceWidth,
    SpineLean,
    ShoulderStability,
    GeneralTechnique,
}

impl DrillCategory {
    /// Substring match on the metric name, first match wins.
    pub fn for_metric(metric_name: &str) -> Self {
        let name = metric_name.to_ascii_lowercase();
        if name.contains("hip") && name.contains("rotation") {
            DrillCategory::HipRotation
        } else if name.contains("elbow") {
            DrillCategory::ElbowAngles
        } else if name.contains("knee") {
            DrillCategory::KneeStability
        } else if name.contains("stance") || name.contains("width") {
            DrillCategory::StanceWidth
        } else if name.contains("spine") || name.contains("lean") {
            DrillCategory::SpineLean
        } else if name.contains("shoulder") {
            DrillCategory::ShoulderStability
        } else {
            DrillCategory::GeneralTechnique
        }
    }
}

/// One drill with its three intensity prescriptions.
#[derive(Debug, Clone)]
pub struct Drill {
    pub name: &'static str,
    pub description: &'static str,
    pub rationale: &'static str,
    pub light: &'static str,
    pub moderate: &'static str,
    pub intensive: &'static str,
}

impl Drill {
    pub fn prescription(&self, intensity: Intensity) -> &'static str {
        match intensity {
            Intensity::Light => self.light,
            Intensity::Moderate => self.moderate,
            Intensity::Intensive => self.intensive,
        }
    }
}

/// The loaded catalog. Construction is infallible; every category has at
/// least one drill.
#[derive(Debug, Clone)]
pub struct DrillCatalog {
    drills: BTreeMap<DrillCategory, Vec<Drill>>,
}

impl Default for DrillCatalog {
    fn default() -> Self {
        let mut drills = BTreeMap::new();
        drills.insert(
            DrillCategory::HipRotation,
            vec![
                Drill {
                    name: "Medicine Ball Rotational Throws",
                    description: "Stand sideways to a wall, rotate hips explosively to throw a medicine ball",
                    rationale: "Builds rotational power and hip coiling mechanics",
                    light: "2 sets x 8 reps, 4-6 lbs ball",
                    moderate: "3 sets x 10 reps, 6-8 lbs ball",
                    intensive: "4 sets x 12 reps, 8-10 lbs ball, daily",
                },
                Drill {
                    name: "Hip Rotation Shadow Swings",
                    description: "Practice the stroke focusing solely on hip rotation, exaggerate the movement",
                    rationale: "Isolates hip rotation to build muscle memory",
                    light: "50 reps, slow tempo",
                    moderate: "100 reps, match tempo",
                    intensive: "200 reps daily, with resistance band",
                },
            ],
        );
        drills.insert(
            DrillCategory::ElbowAngles,
            vec![
                Drill {
                    name: "Wall Contact Drill",
                    description: "Stand close to a wall, practice the stroke keeping elbows compact and close to the body",
                    rationale: "Enforces proper elbow position and compact arm structure",
                    light: "3 sets x 10 reps",
                    moderate: "5 sets x 15 reps",
                    intensive: "10 sets x 20 reps, add resistance bands",
                },
                Drill {
                    name: "Elbow-to-Body Connection",
                    description: "Hold a small towel between elbow and torso during shadow strokes",
                    rationale: "Creates kinesthetic awareness of proper elbow position",
                    light: "50 reps",
                    moderate: "100 reps",
                    intensive: "200 reps, progress to live balls",
                },
            ],
        );
        drills.insert(
            DrillCategory::KneeStability,
            vec![Drill {
                name: "Split-Step to Stance Drill",
                description: "Practice a split-step followed by a balanced backhand stance, hold for 3 seconds",
                rationale: "Builds lower body stability and balance",
                light: "2 sets x 10 reps",
                moderate: "3 sets x 15 reps",
                intensive: "5 sets x 20 reps with weights",
            }],
        );
        drills.insert(
            DrillCategory::StanceWidth,
            vec![
                Drill {
                    name: "Ladder Footwork Drill",
                    description: "Use an agility ladder, practice split-stepping into a consistent stance width",
                    rationale: "Develops consistent footwork and stance positioning",
                    light: "3 minutes",
                    moderate: "5 minutes",
                    intensive: "10 minutes with shadow strokes",
                },
                Drill {
                    name: "Cone Placement Training",
                    description: "Place cones at optimal foot positions, practice hitting from the marked stance",
                    rationale: "Provides visual feedback for proper stance width",
                    light: "20 balls",
                    moderate: "50 balls",
                    intensive: "100 balls across multiple sessions",
                },
            ],
        );
        drills.insert(
            DrillCategory::SpineLean,
            vec![Drill {
                name: "Mirror Posture Check",
                description: "Practice the stroke in front of a mirror, focus on maintaining proper spine angle",
                rationale: "Visual feedback for posture correction",
                light: "5 minutes daily",
                moderate: "10 minutes daily",
                intensive: "15 minutes 2x daily with video recording",
            }],
        );
        drills.insert(
            DrillCategory::ShoulderStability,
            vec![Drill {
                name: "Resistance Band Shoulder Rotations",
                description: "Use resistance bands to strengthen shoulder stability through the stroke motion",
                rationale: "Builds shoulder strength and stability",
                light: "2 sets x 10 reps, light band",
                moderate: "3 sets x 15 reps, medium band",
                intensive: "4 sets x 20 reps, heavy band",
            }],
        );
        drills.insert(
            DrillCategory::GeneralTechnique,
            vec![
                Drill {
                    name: "Slow-Motion Shadow Strokes",
                    description: "Execute the full stroke in slow motion, focus on feeling each phase",
                    rationale: "Builds muscle memory and movement awareness",
                    light: "25 reps",
                    moderate: "50 reps",
                    intensive: "100 reps with video analysis",
                },
                Drill {
                    name: "Video Review Sessions",
                    description: "Record yourself, compare side-by-side with a pro reference",
                    rationale: "Provides objective feedback on progress",
                    light: "1x per week",
                    moderate: "2x per week",
                    intensive: "3x per week with detailed notes",
                },
            ],
        );
        Self { drills }
    }
}

impl DrillCatalog {
    /// Drills for a category, most relevant first.
    pub fn drills_for(&self, category: DrillCategory) -> &[Drill] {
        self.drills.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}
