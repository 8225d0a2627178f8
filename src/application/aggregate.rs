//! Risk aggregator.

use crate::domain::{CompositeRiskScore, EngineConfig, MemberRecord, RiskBreakdown};

use super::factors;

/// Compute every sub-score and the clamped composite.
#[must_use]
pub fn score_breakdown(record: &MemberRecord, config: &EngineConfig) -> RiskBreakdown {
    let demographic = factors::demographic(record);
    let condition = factors::condition(record, &config.condition_weights, &config.comorbidity);
    let utilization = factors::utilization(record);
    let medication = factors::medication(record);
    let vitals = factors::vitals(record);

    let raw_total = demographic + condition.value + utilization + medication + vitals;
    let composite = CompositeRiskScore::clamped(raw_total, config.score_ceiling);

    RiskBreakdown {
        demographic,
        condition: condition.value,
        utilization,
        medication,
        vitals,
        raw_total,
        composite,
        defaulted_conditions: condition.defaulted,
    }
}
