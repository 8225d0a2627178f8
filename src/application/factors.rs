//! Factor calculators.
//!
//! Pure functions of a member record. Each returns a non-negative sub-score;
//! malformed vitals are replaced by their defaults before bracketing.

use crate::domain::{ComorbidityRule, ConditionWeightTable, MemberRecord};

/// Every member starts with this demographic baseline.
pub const DEMOGRAPHIC_BASE: f64 = 0.20;

// Bracket tables: (inclusive lower threshold, points), highest threshold first.
const ED_VISIT_BRACKETS: [(u32, f64); 3] = [(4, 0.20), (2, 0.12), (1, 0.06)];
const HOSPITALIZATION_BRACKETS: [(u32, f64); 3] = [(3, 0.25), (2, 0.15), (1, 0.08)];
const MEDICATION_BRACKETS: [(u32, f64); 4] = [(10, 0.12), (7, 0.09), (5, 0.06), (3, 0.03)];
const BMI_BRACKETS: [(f64, f64); 3] = [(35.0, 0.10), (30.0, 0.07), (27.0, 0.04)];
const SYSTOLIC_BP_BRACKETS: [(f64, f64); 3] = [(160.0, 0.12), (140.0, 0.08), (130.0, 0.04)];
const GLUCOSE_BRACKETS: [(f64, f64); 3] = [(200.0, 0.10), (150.0, 0.06), (126.0, 0.03)];
const CHOLESTEROL_BRACKETS: [(f64, f64); 2] = [(240.0, 0.06), (200.0, 0.03)];

/// Points for the highest bracket `value` reaches, or 0.
fn highest_bracket<T: PartialOrd + Copy>(value: T, brackets: &[(T, f64)]) -> f64 {
    brackets
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(0.0, |(_, points)| *points)
}

/// Baseline plus the single highest age bracket.
#[must_use]
pub fn demographic(record: &MemberRecord) -> f64 {
    let age_points = match record.age {
        a if a > 75 => 0.15,
        a if a > 65 => 0.10,
        a if a > 55 => 0.05,
        _ => 0.0,
    };
    DEMOGRAPHIC_BASE + age_points
}

/// Condition sub-score with the names that fell back to the default weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionScore {
    pub value: f64,
    pub defaulted: Vec<String>,
}

/// Sum of condition weights times the comorbidity multiplier.
#[must_use]
pub fn condition(
    record: &MemberRecord,
    weights: &ConditionWeightTable,
    comorbidity: &ComorbidityRule,
) -> ConditionScore {
    let mut sum = 0.0;
    let mut defaulted = Vec::new();

    for name in &record.conditions {
        let weight = weights.lookup(name);
        if weight.is_defaulted() {
            tracing::debug!(
                "Condition not in weight table, using default {:.2}",
                weight.value()
            );
            defaulted.push(name.clone());
        }
        sum += weight.value();
    }

    ConditionScore {
        value: sum * comorbidity.multiplier(record.conditions.len()),
        defaulted,
    }
}

/// ED visit and hospitalization brackets, added independently.
#[must_use]
pub fn utilization(record: &MemberRecord) -> f64 {
    highest_bracket(record.ed_visits, &ED_VISIT_BRACKETS)
        + highest_bracket(record.hospitalizations, &HOSPITALIZATION_BRACKETS)
}

#[must_use]
pub fn medication(record: &MemberRecord) -> f64 {
    highest_bracket(record.medication_count, &MEDICATION_BRACKETS)
}

/// BMI, systolic BP, glucose and cholesterol brackets summed.
#[must_use]
pub fn vitals(record: &MemberRecord) -> f64 {
    let v = record.vitals();
    highest_bracket(v.bmi, &BMI_BRACKETS)
        + highest_bracket(v.systolic_bp, &SYSTOLIC_BP_BRACKETS)
        + highest_bracket(v.glucose, &GLUCOSE_BRACKETS)
        + highest_bracket(v.cholesterol, &CHOLESTEROL_BRACKETS)
}

/// Vital readings that earned points, labelled for display.
#[must_use]
pub fn elevated_vitals(record: &MemberRecord) -> Vec<(&'static str, f64)> {
    let v = record.vitals();
    [
        ("BMI", v.bmi, &BMI_BRACKETS[..]),
        ("systolic BP", v.systolic_bp, &SYSTOLIC_BP_BRACKETS[..]),
        ("glucose", v.glucose, &GLUCOSE_BRACKETS[..]),
        ("cholesterol", v.cholesterol, &CHOLESTEROL_BRACKETS[..]),
    ]
    .into_iter()
    .filter(|(_, reading, brackets)| highest_bracket(*reading, brackets) > 0.0)
    .map(|(label, reading, _)| (label, reading))
    .collect()
}
