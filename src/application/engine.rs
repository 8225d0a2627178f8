//! Risk engine: the synchronous facade over the calculators.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{
    CompositeRiskScore, ConfigError, EngineConfig, Explanation, Horizon, HorizonPredictions,
    MemberRecord, RiskBreakdown, RiskTier, DEFAULT_SCORE_CEILING,
};
use crate::ports::{HorizonContext, HorizonModel};

use super::aggregate;
use super::cost::{self, InterventionEstimate};
use super::explain;
use super::population::{PopulationAccumulator, PopulationSummary};

/// Scores differing by less than this are treated as the same score.
const SCORE_TOLERANCE: f64 = 1e-9;

/// Everything the engine can say about one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub score: CompositeRiskScore,
    pub breakdown: RiskBreakdown,
    pub tier: RiskTier,
    pub predicted_cost: u64,
    pub explanation: Explanation,
    pub horizons: HorizonPredictions,
    pub intervention: InterventionEstimate,
}

/// Stateless risk engine.
///
/// Immutable after construction; clone it or share it behind an `Arc`.
/// Every method is a pure function of its inputs and the configuration.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: Arc<EngineConfig>,
    horizon_model: Arc<dyn HorizonModel>,
}

impl RiskEngine {
    /// Build an engine from a configuration and a horizon model.
    ///
    /// `crate::engine_from_config` picks the model the configuration selects.
    ///
    /// # Errors
    /// Returns a `ConfigError` if any table is invalid; no scoring is possible
    /// with a bad configuration.
    pub fn new(
        config: EngineConfig,
        horizon_model: Arc<dyn HorizonModel>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if (config.score_ceiling - DEFAULT_SCORE_CEILING).abs() > f64::EPSILON {
            tracing::warn!(
                "Score ceiling set to {} instead of {}; composite scores are capped there",
                config.score_ceiling,
                DEFAULT_SCORE_CEILING
            );
        }

        tracing::info!(
            "Risk engine ready: {} tiers, {} condition weights, ceiling {}, {} horizons",
            config.tiers.tiers().len(),
            config.condition_weights.weights.len(),
            config.score_ceiling,
            horizon_model.name()
        );

        Ok(Self {
            config: Arc::new(config),
            horizon_model,
        })
    }

    /// Replace the configured horizon model.
    #[must_use]
    pub fn with_horizon_model(mut self, model: Arc<dyn HorizonModel>) -> Self {
        self.horizon_model = model;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Composite score in `[0, ceiling]`.
    #[must_use]
    pub fn score_member(&self, record: &MemberRecord) -> CompositeRiskScore {
        self.score_breakdown(record).composite
    }

    /// Composite score with every factor's sub-score.
    #[must_use]
    pub fn score_breakdown(&self, record: &MemberRecord) -> RiskBreakdown {
        let breakdown = aggregate::score_breakdown(record, &self.config);
        tracing::debug!(
            "Scored member: composite={} raw={:.4} conditions={} defaulted={}",
            breakdown.composite,
            breakdown.raw_total,
            record.conditions.len(),
            breakdown.defaulted_conditions.len()
        );
        breakdown
    }

    /// Tier whose window contains `score`; the lowest tier for anything unmatched.
    #[must_use]
    pub fn classify_tier(&self, score: impl Into<f64>) -> &RiskTier {
        self.config.tiers.classify(score.into())
    }

    /// Predicted annual cost for a score.
    #[must_use]
    pub fn predict_cost(&self, score: impl Into<f64>) -> u64 {
        cost::predict_cost(score.into(), &self.config.cost)
    }

    /// Ranked factor attribution.
    ///
    /// Entries always describe the record's own score. A `score` that does not
    /// match it is ignored with a warning.
    #[must_use]
    pub fn explain(&self, record: &MemberRecord, score: impl Into<f64>) -> Explanation {
        let breakdown = self.score_breakdown(record);
        let score = score.into();
        if (score - breakdown.composite.value()).abs() > SCORE_TOLERANCE {
            tracing::warn!(
                "Explain called with score {:.4}, record scores {}; using the record's score",
                score,
                breakdown.composite
            );
        }
        explain::explain(record, &breakdown)
    }

    /// Independent 30/60/90-day views of the record.
    #[must_use]
    pub fn predict_horizons(&self, record: &MemberRecord) -> HorizonPredictions {
        let score = self.score_member(record);
        self.horizons_for(score)
    }

    /// Economics of enrolling the member in their tier's program.
    #[must_use]
    pub fn estimate_intervention(&self, record: &MemberRecord) -> InterventionEstimate {
        let score = self.score_member(record).value();
        InterventionEstimate::compute(
            self.classify_tier(score),
            self.predict_cost(score),
            &self.config.cost,
        )
    }

    /// Score, tier, cost, explanation, horizons and intervention in one pass.
    #[must_use]
    pub fn assess(&self, record: &MemberRecord) -> Assessment {
        let breakdown = self.score_breakdown(record);
        let score = breakdown.composite;
        let tier = self.classify_tier(score);
        let predicted_cost = self.predict_cost(score);

        Assessment {
            member_id: record.id.clone(),
            score,
            explanation: explain::explain(record, &breakdown),
            horizons: self.horizons_for(score),
            intervention: InterventionEstimate::compute(tier, predicted_cost, &self.config.cost),
            tier: tier.clone(),
            predicted_cost,
            breakdown,
        }
    }

    /// Score every record and aggregate the results.
    #[must_use]
    pub fn summarize_population(&self, records: &[MemberRecord]) -> PopulationSummary {
        let mut acc = PopulationAccumulator::new(&self.config.tiers);
        for record in records {
            let score = self.score_member(record).value();
            let tier = self.classify_tier(score);
            acc.add(score, &tier.name, tier.level, self.predict_cost(score));
        }
        let summary = acc.finish();

        tracing::info!(
            "Summarized {} members: mean {:.4}, {} high risk",
            summary.member_count,
            summary.mean_score,
            summary.high_risk_count
        );
        summary
    }

    fn horizons_for(&self, score: CompositeRiskScore) -> HorizonPredictions {
        let ctx = HorizonContext {
            score,
            annual_cost: self.predict_cost(score),
            ceiling: self.config.score_ceiling,
            tiers: &self.config.tiers,
        };
        Horizon::ALL
            .into_iter()
            .map(|h| (h, self.horizon_model.predict(h, &ctx)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Factor, FixedHorizonTable, HorizonPrediction, HorizonSettings, TierLevel};

    fn engine() -> RiskEngine {
        crate::engine_from_config(EngineConfig::default()).expect("Should build default engine")
    }

    fn worked_example() -> MemberRecord {
        let mut record =
            MemberRecord::new(70).with_conditions(["Diabetes Type 2", "Hypertension"]);
        record.ed_visits = 1;
        record.medication_count = 2;
        record
    }

    fn maxed_record() -> MemberRecord {
        let mut record =
            MemberRecord::new(80).with_conditions(["CHF", "Diabetes Type 2", "Hypertension"]);
        record.ed_visits = 4;
        record.hospitalizations = 3;
        record.medication_count = 10;
        record.bmi = 35.0;
        record.systolic_bp = 160.0;
        record.glucose = 200.0;
        record.cholesterol = 240.0;
        record
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RiskEngine>();
    }

    #[test]
    fn test_worked_example() {
        let engine = engine();
        let record = worked_example();

        let score = engine.score_member(&record);
        assert!((score.value() - 0.6245).abs() < 1e-9);
        assert_eq!(engine.classify_tier(score).level, TierLevel::High);

        let explanation = engine.explain(&record, score);
        assert!((explanation.total() - 0.6245).abs() < 1e-9);
        assert_eq!(
            explanation.primary().map(|e| e.factor),
            Some(Factor::Condition)
        );
    }

    #[test]
    fn test_ceiling_record() {
        let engine = engine();
        let record = maxed_record();

        let score = engine.score_member(&record);
        assert_eq!(score.value(), 0.95);
        assert_eq!(engine.classify_tier(score).level, TierLevel::VeryHigh);
        assert_eq!(engine.predict_cost(score), 72_000);
        assert!((engine.explain(&record, score).total() - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_explanation_matches_breakdown() {
        let engine = engine();
        for record in [worked_example(), maxed_record(), MemberRecord::new(60)] {
            let breakdown = engine.score_breakdown(&record);
            let explanation = engine.explain(&record, breakdown.composite);
            for factor in Factor::ALL {
                let raw = explanation
                    .entries
                    .iter()
                    .find(|e| e.factor == factor)
                    .map_or(0.0, |e| e.raw_contribution);
                assert_eq!(raw, breakdown.factor(factor));
            }
        }
    }

    #[test]
    fn test_estimate_intervention_for_worked_example() {
        let estimate = engine().estimate_intervention(&worked_example());

        assert_eq!(estimate.tier, TierLevel::High);
        assert_eq!(estimate.tier_name, "HIGH");
        assert_eq!(estimate.baseline_cost, 52_470);
        assert_eq!(estimate.intervention_cost, 1200);
        assert!(estimate.net_benefit > 0);
        assert!(estimate.roi_percent.is_some());
    }

    #[test]
    fn test_engine_uses_injected_model() {
        let model = crate::adapters::horizons::from_settings(&HorizonSettings::Fixed(
            FixedHorizonTable::default(),
        ))
        .expect("Should build fixed model");
        let engine =
            RiskEngine::new(EngineConfig::default(), model).expect("Should build engine");

        let horizons = engine.predict_horizons(&maxed_record());
        assert_eq!(horizons[&Horizon::Days30].cost_impact, 250);
    }

    #[test]
    fn test_mismatched_score_uses_record_score() {
        let engine = engine();
        let record = worked_example();
        let explanation = engine.explain(&record, 0.1);
        assert!((explanation.score - 0.6245).abs() < 1e-9);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let engine = engine();
        let record = maxed_record();
        let first = engine.assess(&record);
        for _ in 0..10 {
            assert_eq!(engine.assess(&record), first);
        }
    }

    #[test]
    fn test_tier_boundaries() {
        let engine = engine();
        assert_eq!(engine.classify_tier(0.8).level, TierLevel::VeryHigh);
        assert_eq!(engine.classify_tier(0.79999).level, TierLevel::High);
        assert_eq!(engine.classify_tier(0.0).level, TierLevel::VeryLow);
        assert_eq!(engine.classify_tier(-0.3).level, TierLevel::VeryLow);
        assert_eq!(engine.classify_tier(f64::NAN).level, TierLevel::VeryLow);
    }

    #[test]
    fn test_every_score_has_exactly_one_tier() {
        let engine = engine();
        for i in 0..=95 {
            let s = f64::from(i) / 100.0;
            let matching = engine
                .config()
                .tiers
                .tiers()
                .iter()
                .filter(|t| t.contains(s) || (t.level == TierLevel::VeryHigh && s >= t.min_score))
                .count();
            assert_eq!(matching, 1, "score {s}");
        }
    }

    #[test]
    fn test_override_weight_changes_condition_factor() {
        let record = worked_example();
        let base = engine().score_breakdown(&record).condition;

        let mut config = EngineConfig::default();
        config.override_weight("Hypertension", 0.20);
        let tuned = crate::engine_from_config(config).expect("Should build tuned engine");

        let condition = tuned.score_breakdown(&record).condition;
        assert!((condition - (0.15 + 0.20) * 1.15).abs() < 1e-9);
        assert!(condition > base);
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = EngineConfig {
            score_ceiling: 1.2,
            ..EngineConfig::default()
        };
        assert_eq!(
            crate::engine_from_config(config).expect_err("Should reject ceiling"),
            ConfigError::InvalidCeiling(1.2)
        );

        let mut config = EngineConfig::default();
        let mut tiers = config.tiers.tiers().to_vec();
        tiers[2].min_score = 0.45;
        assert!(config.override_tier_boundaries(tiers).is_err());
    }

    #[test]
    fn test_scaled_horizons_by_default() {
        let horizons = engine().predict_horizons(&worked_example());
        assert_eq!(horizons.len(), 3);

        let scores: Vec<f64> = Horizon::ALL.iter().map(|h| horizons[h].risk_score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(horizons[&Horizon::Days90].risk_level, "High");
    }

    #[test]
    fn test_fixed_horizons_ignore_input() {
        let config = EngineConfig {
            horizons: HorizonSettings::Fixed(FixedHorizonTable::default()),
            ..EngineConfig::default()
        };
        let engine = crate::engine_from_config(config).expect("Should build fixed engine");

        let a = engine.predict_horizons(&MemberRecord::new(20));
        let b = engine.predict_horizons(&maxed_record());
        assert_eq!(a, b);
        assert_eq!(a[&Horizon::Days60].cost_impact, 750);
        assert_eq!(a[&Horizon::Days60].roi_value, 2800);
    }

    #[derive(Debug)]
    struct FlatModel;

    impl HorizonModel for FlatModel {
        fn name(&self) -> &'static str {
            "flat"
        }

        fn predict(&self, _horizon: Horizon, ctx: &HorizonContext<'_>) -> HorizonPrediction {
            let tier = ctx.tiers.classify(ctx.score.value());
            HorizonPrediction {
                risk_level: tier.label.clone(),
                tier: tier.level,
                risk_score: ctx.score.value(),
                cost_impact: 0,
                roi_value: 0,
            }
        }
    }

    #[test]
    fn test_custom_horizon_model() {
        let engine = engine().with_horizon_model(Arc::new(FlatModel));
        let horizons = engine.predict_horizons(&worked_example());
        assert!(horizons
            .values()
            .all(|p| (p.risk_score - 0.6245).abs() < 1e-9 && p.cost_impact == 0));
    }

    #[test]
    fn test_assess_bundles_everything() {
        let mut record = worked_example();
        record.id = Some("MBR-0001".to_string());
        let assessment = engine().assess(&record);

        assert_eq!(assessment.member_id.as_deref(), Some("MBR-0001"));
        assert_eq!(assessment.tier.name, "HIGH");
        assert_eq!(assessment.predicted_cost, 52_470);
        assert_eq!(assessment.intervention.tier, TierLevel::High);
        assert_eq!(assessment.horizons.len(), 3);

        let json = serde_json::to_value(&assessment).expect("Should serialize");
        assert_eq!(json["memberId"], "MBR-0001");
        assert!(json["horizons"]["30-day"]["riskScore"].is_number());
    }

    #[test]
    fn test_population_summary() {
        let engine = engine();
        let records = vec![
            MemberRecord::new(30),
            worked_example(),
            maxed_record(),
            MemberRecord::new(60).with_conditions(["COPD"]),
        ];

        let summary = engine.summarize_population(&records);
        assert_eq!(summary.member_count, 4);
        assert_eq!(summary.tier_counts.values().sum::<usize>(), 4);
        assert_eq!(summary.high_risk_count, 2);
        assert_eq!(
            summary.total_predicted_cost,
            records
                .iter()
                .map(|r| engine.predict_cost(engine.score_member(r)))
                .sum::<u64>()
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.score_member(&MemberRecord::new(50 + i * 10)))
            })
            .collect();

        for handle in handles {
            let score = handle.join().expect("Should join scoring thread");
            assert!(score.value() >= 0.20);
        }
    }
}
