//! Explanation generator.
//!
//! Works from the aggregator's breakdown only, so attributed values can never
//! drift from the scored ones.

use std::cmp::Ordering;

use crate::domain::{Attribution, Direction, Explanation, Factor, MemberRecord, RiskBreakdown};

use super::factors;

/// Conditions named in the detail line before the rest are counted.
const LISTED_CONDITIONS: usize = 2;

/// Build the ranked attribution for a scored record.
#[must_use]
pub fn explain(record: &MemberRecord, breakdown: &RiskBreakdown) -> Explanation {
    let composite = breakdown.composite.value();

    // Entries must sum to the composite, so a capped total is shared out pro rata.
    let scale = if breakdown.is_capped() && breakdown.raw_total > 0.0 {
        composite / breakdown.raw_total
    } else {
        1.0
    };

    let mut entries: Vec<Attribution> = Factor::ALL
        .into_iter()
        .filter_map(|factor| {
            let raw = breakdown.factor(factor);
            (raw != 0.0).then(|| {
                let contribution = raw * scale;
                let baseline = match factor {
                    Factor::Demographic => factors::DEMOGRAPHIC_BASE.min(raw) * scale,
                    _ => 0.0,
                };
                Attribution {
                    factor,
                    detail: detail(factor, record),
                    contribution,
                    raw_contribution: raw,
                    baseline,
                    direction: Direction::of(contribution),
                }
            })
        })
        .collect();

    entries.sort_by(rank);

    let summary = summary(composite, &entries);
    Explanation {
        score: composite,
        entries,
        summary,
    }
}

/// The demographic baseline is shared by every member, so it does not count
/// towards a factor's rank.
fn rank(a: &Attribution, b: &Attribution) -> Ordering {
    b.driver()
        .abs()
        .total_cmp(&a.driver().abs())
        .then_with(|| a.factor.priority().cmp(&b.factor.priority()))
}

fn plural(count: u32, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn detail(factor: Factor, record: &MemberRecord) -> String {
    match factor {
        Factor::Demographic => format!("Age {}", record.age),
        Factor::Condition => {
            let listed: Vec<&str> = record
                .conditions
                .iter()
                .take(LISTED_CONDITIONS)
                .map(String::as_str)
                .collect();
            let rest = record.conditions.len().saturating_sub(LISTED_CONDITIONS);
            if rest > 0 {
                format!("{} (+{rest} more)", listed.join(" + "))
            } else {
                listed.join(" + ")
            }
        }
        Factor::Utilization => format!(
            "{}, {}",
            plural(record.ed_visits, "ED visit", "ED visits"),
            plural(record.hospitalizations, "hospitalization", "hospitalizations")
        ),
        Factor::Medication => plural(record.medication_count, "medication", "medications"),
        Factor::Vitals => factors::elevated_vitals(record)
            .into_iter()
            .map(|(label, reading)| format!("{label} {reading}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn summary(score: f64, entries: &[Attribution]) -> String {
    let lead = format!(
        "This member has a {:.0}% risk score.",
        (score * 100.0).round()
    );
    let named = |e: &Attribution| format!("{} ({})", e.factor, e.detail);

    match entries {
        [] => format!("{lead} No individual factor contributed."),
        [only] => format!("{lead} The primary contributor is {}.", named(only)),
        [first, second, ..] => format!(
            "{lead} The primary contributors are {} and {}.",
            named(first),
            named(second)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::aggregate::score_breakdown;
    use crate::domain::{CompositeRiskScore, EngineConfig};

    fn worked_example() -> MemberRecord {
        let mut record =
            MemberRecord::new(70).with_conditions(["Diabetes Type 2", "Hypertension"]);
        record.ed_visits = 1;
        record.medication_count = 2;
        record
    }

    #[test]
    fn test_worked_example_ranking() {
        let record = worked_example();
        let breakdown = score_breakdown(&record, &EngineConfig::default());
        let explanation = explain(&record, &breakdown);

        let factors: Vec<Factor> = explanation.entries.iter().map(|e| e.factor).collect();
        assert_eq!(
            factors,
            vec![Factor::Condition, Factor::Demographic, Factor::Utilization]
        );
        assert!((explanation.total() - 0.6245).abs() < 1e-9);
        assert_eq!(explanation.entries[0].detail, "Diabetes Type 2 + Hypertension");
        assert_eq!(explanation.entries[1].detail, "Age 70");
        assert!((explanation.entries[1].contribution - 0.30).abs() < 1e-9);
        assert!((explanation.entries[1].baseline - 0.20).abs() < 1e-9);
        assert_eq!(explanation.entries[2].detail, "1 ED visit, 0 hospitalizations");
        assert!(explanation
            .entries
            .iter()
            .all(|e| e.direction == Direction::IncreasesRisk));
    }

    #[test]
    fn test_baseline_only_demographic_ranks_last() {
        let mut record = worked_example();
        record.age = 40;
        let breakdown = score_breakdown(&record, &EngineConfig::default());
        let explanation = explain(&record, &breakdown);

        let primary = explanation.primary().expect("Should have entries");
        assert_eq!(primary.factor, Factor::Condition);
        assert_eq!(
            explanation.entries.last().map(|e| e.factor),
            Some(Factor::Demographic)
        );
        assert_eq!(
            explanation.summary,
            "This member has a 52% risk score. The primary contributors are \
             condition (Diabetes Type 2 + Hypertension) and \
             utilization (1 ED visit, 0 hospitalizations)."
        );
    }

    #[test]
    fn test_capped_scores_are_shared_out() {
        let mut record =
            MemberRecord::new(80).with_conditions(["CHF", "Diabetes Type 2", "Hypertension"]);
        record.ed_visits = 4;
        record.hospitalizations = 3;
        record.medication_count = 10;
        record.bmi = 35.0;
        record.systolic_bp = 160.0;
        record.glucose = 200.0;
        record.cholesterol = 240.0;

        let breakdown = score_breakdown(&record, &EngineConfig::default());
        let explanation = explain(&record, &breakdown);

        assert_eq!(explanation.entries.len(), 5);
        assert!((explanation.total() - 0.95).abs() < 1e-9);
        for entry in &explanation.entries {
            assert_eq!(entry.raw_contribution, breakdown.factor(entry.factor));
            assert!(entry.contribution < entry.raw_contribution);
        }
        assert_eq!(
            explanation.entries[0].detail,
            "CHF + Diabetes Type 2 (+1 more)"
        );
        assert_eq!(
            explanation.entries.last().map(|e| e.factor),
            Some(Factor::Medication)
        );
    }

    #[test]
    fn test_ties_break_by_factor_priority() {
        let breakdown = RiskBreakdown {
            demographic: 0.20,
            condition: 0.0,
            utilization: 0.20,
            medication: 0.20,
            vitals: 0.20,
            raw_total: 0.80,
            composite: CompositeRiskScore::clamped(0.80, 0.95),
            defaulted_conditions: Vec::new(),
        };
        let explanation = explain(&MemberRecord::new(30), &breakdown);
        let factors: Vec<Factor> = explanation.entries.iter().map(|e| e.factor).collect();
        assert_eq!(
            factors,
            vec![
                Factor::Utilization,
                Factor::Medication,
                Factor::Vitals,
                Factor::Demographic
            ]
        );
    }

    #[test]
    fn test_summary_variants() {
        let single = RiskBreakdown {
            demographic: 0.20,
            condition: 0.0,
            utilization: 0.0,
            medication: 0.0,
            vitals: 0.0,
            raw_total: 0.20,
            composite: CompositeRiskScore::clamped(0.20, 0.95),
            defaulted_conditions: Vec::new(),
        };
        let explanation = explain(&MemberRecord::new(30), &single);
        assert_eq!(
            explanation.summary,
            "This member has a 20% risk score. The primary contributor is demographic (Age 30)."
        );

        let empty = RiskBreakdown {
            demographic: 0.0,
            raw_total: 0.0,
            composite: CompositeRiskScore::clamped(0.0, 0.95),
            ..single
        };
        let explanation = explain(&MemberRecord::new(30), &empty);
        assert!(explanation.entries.is_empty());
        assert!(explanation.summary.ends_with("No individual factor contributed."));
    }

    #[test]
    fn test_is_deterministic() {
        let record = worked_example();
        let breakdown = score_breakdown(&record, &EngineConfig::default());
        assert_eq!(explain(&record, &breakdown), explain(&record, &breakdown));
    }
}
