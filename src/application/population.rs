//! Population summary over a batch of member records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{TierLevel, TierTable};

/// Members at this level or above count as high risk.
const HIGH_RISK_LEVEL: TierLevel = TierLevel::High;

/// Aggregate view of a scored batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationSummary {
    pub member_count: usize,
    /// Mean composite score; 0 for an empty batch
    pub mean_score: f64,
    /// Members per tier name, every configured tier present
    pub tier_counts: BTreeMap<String, usize>,
    pub total_predicted_cost: u64,
    /// Members at HIGH or above
    pub high_risk_count: usize,
}

/// Incremental builder used by the engine while scoring a batch.
#[derive(Debug)]
pub(crate) struct PopulationAccumulator {
    score_sum: f64,
    summary: PopulationSummary,
}

impl PopulationAccumulator {
    pub(crate) fn new(tiers: &TierTable) -> Self {
        Self {
            score_sum: 0.0,
            summary: PopulationSummary {
                member_count: 0,
                mean_score: 0.0,
                tier_counts: tiers.tiers().iter().map(|t| (t.name.clone(), 0)).collect(),
                total_predicted_cost: 0,
                high_risk_count: 0,
            },
        }
    }

    pub(crate) fn add(&mut self, score: f64, tier_name: &str, level: TierLevel, cost: u64) {
        self.score_sum += score;
        self.summary.member_count += 1;
        *self
            .summary
            .tier_counts
            .entry(tier_name.to_string())
            .or_insert(0) += 1;
        self.summary.total_predicted_cost += cost;
        if level >= HIGH_RISK_LEVEL {
            self.summary.high_risk_count += 1;
        }
    }

    pub(crate) fn finish(mut self) -> PopulationSummary {
        if self.summary.member_count > 0 {
            self.summary.mean_score = self.score_sum / self.summary.member_count as f64;
        }
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        let summary = PopulationAccumulator::new(&TierTable::default()).finish();
        assert_eq!(summary.member_count, 0);
        assert!(summary.mean_score.abs() < f64::EPSILON);
        assert_eq!(summary.tier_counts.len(), 5);
        assert!(summary.tier_counts.values().all(|&c| c == 0));
    }

    #[test]
    fn test_accumulates() {
        let mut acc = PopulationAccumulator::new(&TierTable::default());
        acc.add(0.1, "VERY_LOW", TierLevel::VeryLow, 21_000);
        acc.add(0.7, "HIGH", TierLevel::High, 57_000);
        acc.add(0.9, "VERY_HIGH", TierLevel::VeryHigh, 69_000);
        let summary = acc.finish();

        assert_eq!(summary.member_count, 3);
        assert!((summary.mean_score - 1.7 / 3.0).abs() < 1e-9);
        assert_eq!(summary.tier_counts["HIGH"], 1);
        assert_eq!(summary.tier_counts["MEDIUM"], 0);
        assert_eq!(summary.total_predicted_cost, 147_000);
        assert_eq!(summary.high_risk_count, 2);
    }
}
