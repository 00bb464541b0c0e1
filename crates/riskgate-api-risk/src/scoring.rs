//! Change-management risk scoring.
//!
//! A pure additive model: each of the four inputs contributes 1 to 3
//! points, the sum maps to a tier. The confidence value carries a random
//! component but is cosmetic; it never influences the tier. The mitigation
//! list is a fixed contract: five strings, stable order, independent of
//! input.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of change being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    SoftwareUpdate,
    ServerMigration,
    SecurityPatch,
}

impl ChangeType {
    fn contribution(self) -> u8 {
        match self {
            ChangeType::ServerMigration => 3,
            ChangeType::SecurityPatch => 2,
            ChangeType::SoftwareUpdate => 1,
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::SoftwareUpdate => write!(f, "software-update"),
            ChangeType::ServerMigration => write!(f, "server-migration"),
            ChangeType::SecurityPatch => write!(f, "security-patch"),
        }
    }
}

/// How urgently the change must land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    fn contribution(self) -> u8 {
        match self {
            Urgency::High => 3,
            Urgency::Medium => 2,
            Urgency::Low => 1,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::High => write!(f, "high"),
        }
    }
}

/// How hard the change is to roll back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RollbackComplexity {
    Easy,
    Medium,
    Hard,
}

impl RollbackComplexity {
    fn contribution(self) -> u8 {
        match self {
            RollbackComplexity::Hard => 3,
            RollbackComplexity::Medium => 2,
            RollbackComplexity::Easy => 1,
        }
    }
}

impl std::fmt::Display for RollbackComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollbackComplexity::Easy => write!(f, "easy"),
            RollbackComplexity::Medium => write!(f, "medium"),
            RollbackComplexity::Hard => write!(f, "hard"),
        }
    }
}

/// Risk tier derived from the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

/// The four inputs of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentInput {
    pub change_type: ChangeType,
    pub affected_systems: u32,
    pub urgency: Urgency,
    pub rollback_complexity: RollbackComplexity,
}

/// The derived result of an assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResult {
    pub raw_score: u8,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub mitigation_strategies: Vec<String>,
}

/// Fixed mitigation guidance, returned verbatim for every assessment.
/// Order and content are an externally visible contract.
pub const MITIGATION_STRATEGIES: [&str; 5] = [
    "Create a full backup and verified restore point before the change window",
    "Schedule the change during a low-traffic maintenance window",
    "Document a step-by-step rollback plan and assign an owner",
    "Notify stakeholders and dependent teams before execution",
    "Run post-change verification against critical user journeys",
];

fn affected_contribution(affected_systems: u32) -> u8 {
    if affected_systems > 10 {
        3
    } else if affected_systems > 5 {
        2
    } else {
        1
    }
}

/// Compute the raw additive score, always in [4, 12].
#[must_use]
pub fn raw_score(input: &AssessmentInput) -> u8 {
    input.change_type.contribution()
        + affected_contribution(input.affected_systems)
        + input.urgency.contribution()
        + input.rollback_complexity.contribution()
}

/// Map a raw score to a tier. Evaluated high-to-low, first match wins.
#[must_use]
pub fn tier(score: u8) -> RiskLevel {
    if score > 10 {
        RiskLevel::Critical
    } else if score > 8 {
        RiskLevel::High
    } else if score > 6 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Run a full assessment.
///
/// The confidence draw is the only non-deterministic part and never affects
/// the tier.
#[must_use]
pub fn assess(input: &AssessmentInput) -> AssessmentResult {
    use rand::Rng;

    let score = raw_score(input);
    let confidence = 85.0 + rand::thread_rng().gen_range(0.0..10.0);

    AssessmentResult {
        raw_score: score,
        risk_level: tier(score),
        confidence,
        mitigation_strategies: MITIGATION_STRATEGIES
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGE_TYPES: [ChangeType; 3] = [
        ChangeType::SoftwareUpdate,
        ChangeType::SecurityPatch,
        ChangeType::ServerMigration,
    ];
    const URGENCIES: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];
    const ROLLBACKS: [RollbackComplexity; 3] = [
        RollbackComplexity::Easy,
        RollbackComplexity::Medium,
        RollbackComplexity::Hard,
    ];
    const AFFECTED_BUCKETS: [u32; 3] = [1, 6, 12];

    #[test]
    fn worst_case_is_critical() {
        let input = AssessmentInput {
            change_type: ChangeType::ServerMigration,
            affected_systems: 12,
            urgency: Urgency::High,
            rollback_complexity: RollbackComplexity::Hard,
        };
        assert_eq!(raw_score(&input), 12);
        assert_eq!(tier(12), RiskLevel::Critical);
    }

    #[test]
    fn best_case_is_low() {
        let input = AssessmentInput {
            change_type: ChangeType::SoftwareUpdate,
            affected_systems: 1,
            urgency: Urgency::Low,
            rollback_complexity: RollbackComplexity::Easy,
        };
        assert_eq!(raw_score(&input), 4);
        assert_eq!(tier(4), RiskLevel::Low);
    }

    #[test]
    fn all_twos_is_medium() {
        // Score 8 is not > 8, so it stays Medium.
        let input = AssessmentInput {
            change_type: ChangeType::SecurityPatch,
            affected_systems: 6,
            urgency: Urgency::Medium,
            rollback_complexity: RollbackComplexity::Medium,
        };
        assert_eq!(raw_score(&input), 8);
        assert_eq!(tier(8), RiskLevel::Medium);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier(6), RiskLevel::Low);
        assert_eq!(tier(7), RiskLevel::Medium);
        assert_eq!(tier(8), RiskLevel::Medium);
        assert_eq!(tier(9), RiskLevel::High);
        assert_eq!(tier(10), RiskLevel::High);
        assert_eq!(tier(11), RiskLevel::Critical);
    }

    #[test]
    fn score_in_range_for_all_combinations() {
        for ct in CHANGE_TYPES {
            for affected in AFFECTED_BUCKETS {
                for urgency in URGENCIES {
                    for rollback in ROLLBACKS {
                        let input = AssessmentInput {
                            change_type: ct,
                            affected_systems: affected,
                            urgency,
                            rollback_complexity: rollback,
                        };
                        let score = raw_score(&input);
                        assert!((4..=12).contains(&score), "score {score} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn tier_is_monotonic_in_each_input() {
        // Raising any single input's severity never lowers the tier.
        for ct_idx in 0..CHANGE_TYPES.len() {
            for a_idx in 0..AFFECTED_BUCKETS.len() {
                for u_idx in 0..URGENCIES.len() {
                    for r_idx in 0..ROLLBACKS.len() {
                        let base = AssessmentInput {
                            change_type: CHANGE_TYPES[ct_idx],
                            affected_systems: AFFECTED_BUCKETS[a_idx],
                            urgency: URGENCIES[u_idx],
                            rollback_complexity: ROLLBACKS[r_idx],
                        };
                        let base_tier = tier(raw_score(&base));

                        if ct_idx + 1 < CHANGE_TYPES.len() {
                            // ChangeType severity order: update < patch < migration
                            let mut bumped = base;
                            bumped.change_type = CHANGE_TYPES[ct_idx + 1];
                            assert!(tier(raw_score(&bumped)) >= base_tier);
                        }
                        if a_idx + 1 < AFFECTED_BUCKETS.len() {
                            let mut bumped = base;
                            bumped.affected_systems = AFFECTED_BUCKETS[a_idx + 1];
                            assert!(tier(raw_score(&bumped)) >= base_tier);
                        }
                        if u_idx + 1 < URGENCIES.len() {
                            let mut bumped = base;
                            bumped.urgency = URGENCIES[u_idx + 1];
                            assert!(tier(raw_score(&bumped)) >= base_tier);
                        }
                        if r_idx + 1 < ROLLBACKS.len() {
                            let mut bumped = base;
                            bumped.rollback_complexity = ROLLBACKS[r_idx + 1];
                            assert!(tier(raw_score(&bumped)) >= base_tier);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn affected_systems_buckets() {
        assert_eq!(affected_contribution(1), 1);
        assert_eq!(affected_contribution(5), 1);
        assert_eq!(affected_contribution(6), 2);
        assert_eq!(affected_contribution(10), 2);
        assert_eq!(affected_contribution(11), 3);
        assert_eq!(affected_contribution(1000), 3);
    }

    #[test]
    fn confidence_in_range() {
        let input = AssessmentInput {
            change_type: ChangeType::SoftwareUpdate,
            affected_systems: 1,
            urgency: Urgency::Low,
            rollback_complexity: RollbackComplexity::Easy,
        };
        for _ in 0..100 {
            let result = assess(&input);
            assert!(result.confidence >= 85.0 && result.confidence < 95.0);
        }
    }

    #[test]
    fn confidence_never_changes_tier() {
        let input = AssessmentInput {
            change_type: ChangeType::ServerMigration,
            affected_systems: 7,
            urgency: Urgency::Medium,
            rollback_complexity: RollbackComplexity::Easy,
        };
        let expected = tier(raw_score(&input));
        for _ in 0..20 {
            assert_eq!(assess(&input).risk_level, expected);
        }
    }

    #[test]
    fn mitigation_list_is_fixed() {
        let low = assess(&AssessmentInput {
            change_type: ChangeType::SoftwareUpdate,
            affected_systems: 1,
            urgency: Urgency::Low,
            rollback_complexity: RollbackComplexity::Easy,
        });
        let critical = assess(&AssessmentInput {
            change_type: ChangeType::ServerMigration,
            affected_systems: 50,
            urgency: Urgency::High,
            rollback_complexity: RollbackComplexity::Hard,
        });

        assert_eq!(low.mitigation_strategies.len(), 5);
        assert_eq!(low.mitigation_strategies, critical.mitigation_strategies);
        assert_eq!(low.mitigation_strategies[0], MITIGATION_STRATEGIES[0]);
    }

    #[test]
    fn serde_wire_values() {
        assert_eq!(
            serde_json::to_string(&ChangeType::ServerMigration).unwrap(),
            "\"server-migration\""
        );
        assert_eq!(serde_json::to_string(&Urgency::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&RollbackComplexity::Easy).unwrap(),
            "\"easy\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"Critical\""
        );
    }
}
