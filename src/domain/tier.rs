//! Risk tiers and the tier table.
//!
//! A `TierTable` can only be built from tiers that partition [0, 1)
//! contiguously, so classification always lands on exactly one tier.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Ordered tier level, 1 (lowest risk) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TierLevel {
    VeryLow = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    VeryHigh = 5,
}

impl TierLevel {
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TierLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::VeryLow),
            2 => Ok(Self::Low),
            3 => Ok(Self::Medium),
            4 => Ok(Self::High),
            5 => Ok(Self::VeryHigh),
            other => Err(format!("tier level must be 1-5, got {other}")),
        }
    }
}

impl From<TierLevel> for u8 {
    fn from(level: TierLevel) -> Self {
        level.as_u8()
    }
}

impl std::fmt::Display for TierLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryLow => write!(f, "VERY_LOW"),
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::VeryHigh => write!(f, "VERY_HIGH"),
        }
    }
}

/// Annual care-management economics for members in a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionEconomics {
    /// Yearly program cost per member
    pub annual_cost: u64,
    /// Expected fraction of preventable cost avoided (0.0 to 1.0)
    pub reduction_rate: f64,
}

impl InterventionEconomics {
    /// Default program economics for a tier level.
    #[must_use]
    pub fn for_level(level: TierLevel) -> Self {
        let (annual_cost, reduction_rate) = match level {
            TierLevel::VeryHigh => (2500, 0.30),
            TierLevel::High => (1200, 0.25),
            TierLevel::Medium => (600, 0.20),
            TierLevel::Low => (200, 0.10),
            TierLevel::VeryLow => (0, 0.0),
        };
        Self {
            annual_cost,
            reduction_rate,
        }
    }
}

/// One discrete risk category with its display and care-management metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskTier {
    pub level: TierLevel,
    /// Machine name, e.g. `VERY_HIGH`
    pub name: String,
    /// Display label, e.g. `Very High`
    pub label: String,
    /// Hex display color
    pub color: String,
    pub icon: String,
    /// Inclusive lower bound
    pub min_score: f64,
    /// Exclusive upper bound (ignored for the top tier)
    pub max_score: f64,
    pub description: String,
    /// Recommended actions, in priority order
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention: Option<InterventionEconomics>,
}

impl RiskTier {
    /// Whether `score` lies in `[min_score, max_score)`.
    #[must_use]
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min_score && score < self.max_score
    }

    /// Intervention economics, falling back to the level defaults.
    #[must_use]
    pub fn economics(&self) -> InterventionEconomics {
        self.intervention
            .unwrap_or_else(|| InterventionEconomics::for_level(self.level))
    }
}

#[allow(clippy::too_many_arguments)]
fn tier(
    level: TierLevel,
    label: &str,
    color: &str,
    icon: &str,
    min_score: f64,
    max_score: f64,
    description: &str,
    actions: &[&str],
) -> RiskTier {
    RiskTier {
        level,
        name: level.to_string(),
        label: label.to_string(),
        color: color.to_string(),
        icon: icon.to_string(),
        min_score,
        max_score,
        description: description.to_string(),
        actions: actions.iter().map(|a| (*a).to_string()).collect(),
        intervention: Some(InterventionEconomics::for_level(level)),
    }
}

/// Validated tier table, held in ascending score order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RiskTier>", into = "Vec<RiskTier>")]
pub struct TierTable {
    tiers: Vec<RiskTier>,
}

impl TierTable {
    /// Build a table from tiers in any order.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the tiers leave a gap, overlap, are not
    /// ordered by level, or fail to cover [0, 1).
    pub fn new(mut tiers: Vec<RiskTier>) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::EmptyTierTable);
        }

        for t in &tiers {
            if !t.min_score.is_finite() || !t.max_score.is_finite() || t.min_score >= t.max_score {
                return Err(ConfigError::InvalidTierBounds {
                    name: t.name.clone(),
                    min: t.min_score,
                    max: t.max_score,
                });
            }
        }

        tiers.sort_by(|a, b| a.min_score.total_cmp(&b.min_score));

        let mut seen = [false; 6];
        for t in &tiers {
            let idx = usize::from(t.level.as_u8());
            if seen[idx] {
                return Err(ConfigError::DuplicateTierLevel(t.level.as_u8()));
            }
            seen[idx] = true;
        }

        let lowest = &tiers[0];
        if lowest.min_score != 0.0 {
            return Err(ConfigError::LowestTierNotAtZero {
                name: lowest.name.clone(),
                min: lowest.min_score,
            });
        }

        let top = &tiers[tiers.len() - 1];
        if top.max_score < 1.0 {
            return Err(ConfigError::TopTierBelowOne {
                name: top.name.clone(),
                max: top.max_score,
            });
        }

        for pair in tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.max_score < upper.min_score {
                return Err(ConfigError::TierGap {
                    lower: lower.name.clone(),
                    lower_max: lower.max_score,
                    upper: upper.name.clone(),
                    upper_min: upper.min_score,
                });
            }
            if lower.max_score > upper.min_score {
                return Err(ConfigError::TierOverlap {
                    lower: lower.name.clone(),
                    lower_max: lower.max_score,
                    upper: upper.name.clone(),
                    upper_min: upper.min_score,
                });
            }
            if lower.level >= upper.level {
                return Err(ConfigError::NonMonotonicTiers {
                    lower: lower.name.clone(),
                    lower_level: lower.level.as_u8(),
                    upper: upper.name.clone(),
                    upper_level: upper.level.as_u8(),
                });
            }
        }

        Ok(Self { tiers })
    }

    /// Classify a score.
    ///
    /// Scans from the highest boundary down. The top tier has no upper edge;
    /// anything that matches nothing (negative, NaN) falls to the lowest tier.
    #[must_use]
    pub fn classify(&self, score: f64) -> &RiskTier {
        let top_index = self.tiers.len() - 1;
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(i, t)| score >= t.min_score && (*i == top_index || score < t.max_score))
            .map_or(&self.tiers[0], |(_, t)| t)
    }

    /// Tiers in ascending score order.
    #[must_use]
    pub fn tiers(&self) -> &[RiskTier] {
        &self.tiers
    }

    #[must_use]
    pub fn lowest(&self) -> &RiskTier {
        &self.tiers[0]
    }

    /// Tier with the given level, if configured.
    #[must_use]
    pub fn by_level(&self, level: TierLevel) -> Option<&RiskTier> {
        self.tiers.iter().find(|t| t.level == level)
    }
}

impl TryFrom<Vec<RiskTier>> for TierTable {
    type Error = ConfigError;

    fn try_from(tiers: Vec<RiskTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<TierTable> for Vec<RiskTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

impl Default for TierTable {
    fn default() -> Self {
        let tiers = vec![
            tier(
                TierLevel::VeryLow,
                "Very Low",
                "#10b981",
                "🟢",
                0.0,
                0.2,
                "Maintain current health",
                &[
                    "Annual wellness visits",
                    "Preventive screenings",
                    "Wellness program participation",
                ],
            ),
            tier(
                TierLevel::Low,
                "Low",
                "#fbbf24",
                "🟡",
                0.2,
                0.4,
                "Routine monitoring",
                &[
                    "Quarterly wellness checks",
                    "Preventive care reminders",
                    "Health education materials",
                ],
            ),
            tier(
                TierLevel::Medium,
                "Medium",
                "#f59e0b",
                "🟠",
                0.4,
                0.6,
                "Monitor closely",
                &[
                    "Monthly check-ins",
                    "Disease management program enrollment",
                    "Medication reconciliation",
                    "Preventive care recommendations",
                ],
            ),
            tier(
                TierLevel::High,
                "High",
                "#dc2626",
                "🔴",
                0.6,
                0.8,
                "Requires urgent attention",
                &[
                    "Care coordinator assignment within 48h",
                    "Specialist consultation within 1 week",
                    "Weekly monitoring",
                    "Care plan development",
                ],
            ),
            tier(
                TierLevel::VeryHigh,
                "Very High",
                "#1a1a1a",
                "⚫",
                0.8,
                1.0,
                "Requires immediate intervention",
                &[
                    "Immediate care coordinator assignment",
                    "Specialist consultation within 24h",
                    "Daily monitoring for 2 weeks",
                    "Intensive disease management enrollment",
                ],
            ),
        ];

        Self { tiers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(table: &TierTable) -> Vec<RiskTier> {
        table.tiers().to_vec()
    }

    #[test]
    fn test_default_table_is_valid() {
        let tiers = bounds(&TierTable::default());
        let rebuilt = TierTable::new(tiers).expect("Default tiers should validate");
        assert_eq!(rebuilt.tiers().len(), 5);
        assert_eq!(rebuilt.lowest().level, TierLevel::VeryLow);
    }

    #[test]
    fn test_classify_boundaries() {
        let table = TierTable::default();

        assert_eq!(table.classify(0.0).level, TierLevel::VeryLow);
        assert_eq!(table.classify(0.19999).level, TierLevel::VeryLow);
        assert_eq!(table.classify(0.2).level, TierLevel::Low);
        assert_eq!(table.classify(0.4).level, TierLevel::Medium);
        assert_eq!(table.classify(0.6).level, TierLevel::High);
        assert_eq!(table.classify(0.79999).level, TierLevel::High);
        assert_eq!(table.classify(0.8).level, TierLevel::VeryHigh);
        assert_eq!(table.classify(0.95).level, TierLevel::VeryHigh);
    }

    #[test]
    fn test_top_tier_is_unbounded_and_fallback_is_lowest() {
        let table = TierTable::default();

        assert_eq!(table.classify(1.0).level, TierLevel::VeryHigh);
        assert_eq!(table.classify(7.5).level, TierLevel::VeryHigh);
        assert_eq!(table.classify(-0.1).level, TierLevel::VeryLow);
        assert_eq!(table.classify(f64::NAN).level, TierLevel::VeryLow);
    }

    #[test]
    fn test_every_score_matches_exactly_one_tier() {
        let table = TierTable::default();
        for step in 0..=950 {
            let score = f64::from(step) / 1000.0;
            let matches = table
                .tiers()
                .iter()
                .filter(|t| t.contains(score))
                .count();
            assert_eq!(matches, 1, "score {score} matched {matches} tiers");
            assert!(table.classify(score).contains(score));
        }
    }

    #[test]
    fn test_rejects_gap() {
        let mut tiers = bounds(&TierTable::default());
        tiers[1].max_score = 0.35;
        assert!(matches!(
            TierTable::new(tiers),
            Err(ConfigError::TierGap { .. })
        ));
    }

    #[test]
    fn test_rejects_overlap() {
        let mut tiers = bounds(&TierTable::default());
        tiers[2].max_score = 0.65;
        assert!(matches!(
            TierTable::new(tiers),
            Err(ConfigError::TierOverlap { .. })
        ));
    }

    #[test]
    fn test_rejects_non_monotonic_levels() {
        let mut tiers = bounds(&TierTable::default());
        tiers[3].level = TierLevel::VeryHigh;
        tiers[4].level = TierLevel::High;
        assert!(matches!(
            TierTable::new(tiers),
            Err(ConfigError::NonMonotonicTiers { .. })
        ));
    }

    #[test]
    fn test_rejects_incomplete_coverage() {
        let mut tiers = bounds(&TierTable::default());
        tiers.remove(0);
        assert!(matches!(
            TierTable::new(tiers),
            Err(ConfigError::LowestTierNotAtZero { .. })
        ));

        let mut tiers = bounds(&TierTable::default());
        tiers[4].max_score = 0.9;
        assert!(matches!(
            TierTable::new(tiers),
            Err(ConfigError::TopTierBelowOne { .. })
        ));

        assert_eq!(TierTable::new(Vec::new()), Err(ConfigError::EmptyTierTable));
    }

    #[test]
    fn test_rejects_inverted_bounds_and_duplicate_levels() {
        let mut tiers = bounds(&TierTable::default());
        tiers[0].max_score = 0.0;
        assert!(matches!(
            TierTable::new(tiers),
            Err(ConfigError::InvalidTierBounds { .. })
        ));

        let mut tiers = bounds(&TierTable::default());
        tiers[1].level = TierLevel::VeryLow;
        assert_eq!(
            TierTable::new(tiers),
            Err(ConfigError::DuplicateTierLevel(1))
        );
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let mut tiers = bounds(&TierTable::default());
        tiers.reverse();
        let table = TierTable::new(tiers).expect("Order should not matter");
        assert_eq!(table.tiers()[0].level, TierLevel::VeryLow);
        assert_eq!(table.classify(0.5).level, TierLevel::Medium);
    }

    #[test]
    fn test_three_tier_table() {
        let defaults = TierTable::default();
        let mut low = defaults.tiers()[0].clone();
        low.max_score = 0.5;
        let mut high = defaults.tiers()[3].clone();
        high.min_score = 0.5;
        high.max_score = 0.9;
        let mut top = defaults.tiers()[4].clone();
        top.min_score = 0.9;

        let table = TierTable::new(vec![low, high, top]).expect("Should validate");
        assert_eq!(table.classify(0.49).level, TierLevel::VeryLow);
        assert_eq!(table.classify(0.5).level, TierLevel::High);
        assert_eq!(table.classify(0.95).level, TierLevel::VeryHigh);
        assert!(table.by_level(TierLevel::Medium).is_none());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r##"[
            {"level": 1, "name": "VERY_LOW", "label": "Very Low", "color": "#10b981",
             "icon": "g", "minScore": 0.0, "maxScore": 0.3, "description": "d"},
            {"level": 5, "name": "VERY_HIGH", "label": "Very High", "color": "#1a1a1a",
             "icon": "b", "minScore": 0.5, "maxScore": 1.0, "description": "d"}
        ]"##;
        let parsed: Result<TierTable, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_economics_fall_back_to_level_defaults() {
        let mut tier = TierTable::default().tiers()[4].clone();
        tier.intervention = None;
        let econ = tier.economics();
        assert_eq!(econ.annual_cost, 2500);
        assert!((econ.reduction_rate - 0.30).abs() < f64::EPSILON);
    }
}
