//! Member record types for risk scoring.
//!
//! A `MemberRecord` is the only input the engine scores. Every numeric field
//! has a documented default so partially filled assessments still score.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Default body-mass index used when the field is missing or not finite.
pub const DEFAULT_BMI: f64 = 25.0;

/// Default systolic blood pressure in mmHg.
pub const DEFAULT_SYSTOLIC_BP: f64 = 120.0;

/// Default fasting glucose in mg/dL.
pub const DEFAULT_GLUCOSE: f64 = 100.0;

/// Default total cholesterol in mg/dL.
pub const DEFAULT_CHOLESTEROL: f64 = 180.0;

/// Recorded gender. Carried through but not weighted in any factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

/// Demographic, clinical and utilization inputs for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    /// Member identifier (opaque, never used in scoring)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Age in whole years
    #[serde(default)]
    pub age: u32,

    #[serde(default)]
    pub gender: Gender,

    /// Chronic condition names, matched exactly against the weight table
    #[serde(default)]
    pub conditions: BTreeSet<String>,

    /// Emergency department visits in the look-back period
    #[serde(default, deserialize_with = "count_or_zero")]
    pub ed_visits: u32,

    /// Inpatient admissions in the look-back period
    #[serde(default, deserialize_with = "count_or_zero")]
    pub hospitalizations: u32,

    /// Number of active medications
    #[serde(default, alias = "medications", deserialize_with = "count_or_zero")]
    pub medication_count: u32,

    #[serde(default = "default_bmi", deserialize_with = "bmi_or_default")]
    pub bmi: f64,

    /// Systolic blood pressure in mmHg
    #[serde(
        rename = "systolicBP",
        alias = "systolicBp",
        default = "default_systolic_bp",
        deserialize_with = "systolic_bp_or_default"
    )]
    pub systolic_bp: f64,

    /// Glucose in mg/dL
    #[serde(default = "default_glucose", deserialize_with = "glucose_or_default")]
    pub glucose: f64,

    /// Total cholesterol in mg/dL
    #[serde(default = "default_cholesterol", deserialize_with = "cholesterol_or_default")]
    pub cholesterol: f64,
}

fn default_bmi() -> f64 {
    DEFAULT_BMI
}

fn default_systolic_bp() -> f64 {
    DEFAULT_SYSTOLIC_BP
}

fn default_glucose() -> f64 {
    DEFAULT_GLUCOSE
}

fn default_cholesterol() -> f64 {
    DEFAULT_CHOLESTEROL
}

// An explicit `null` is an unfilled field and takes the same default as a missing key.
fn null_or<'de, D, T>(deserializer: D, fallback: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or(fallback))
}

fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    null_or(deserializer, 0)
}

fn bmi_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    null_or(deserializer, DEFAULT_BMI)
}

fn systolic_bp_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    null_or(deserializer, DEFAULT_SYSTOLIC_BP)
}

fn glucose_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    null_or(deserializer, DEFAULT_GLUCOSE)
}

fn cholesterol_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    null_or(deserializer, DEFAULT_CHOLESTEROL)
}

/// Vital signs with non-finite readings replaced by their defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub bmi: f64,
    pub systolic_bp: f64,
    pub glucose: f64,
    pub cholesterol: f64,
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

impl Default for MemberRecord {
    fn default() -> Self {
        Self {
            id: None,
            age: 0,
            gender: Gender::Unknown,
            conditions: BTreeSet::new(),
            ed_visits: 0,
            hospitalizations: 0,
            medication_count: 0,
            bmi: DEFAULT_BMI,
            systolic_bp: DEFAULT_SYSTOLIC_BP,
            glucose: DEFAULT_GLUCOSE,
            cholesterol: DEFAULT_CHOLESTEROL,
        }
    }
}

impl MemberRecord {
    /// Create a record with the given age and every other field defaulted.
    #[must_use]
    pub fn new(age: u32) -> Self {
        Self {
            age,
            ..Self::default()
        }
    }

    /// Builder-style helper for attaching conditions.
    #[must_use]
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// Vital signs as scored, with malformed readings substituted.
    #[must_use]
    pub fn vitals(&self) -> Vitals {
        Vitals {
            bmi: finite_or(self.bmi, DEFAULT_BMI),
            systolic_bp: finite_or(self.systolic_bp, DEFAULT_SYSTOLIC_BP),
            glucose: finite_or(self.glucose, DEFAULT_GLUCOSE),
            cholesterol: finite_or(self.cholesterol, DEFAULT_CHOLESTEROL),
        }
    }

    /// Validate that all fields are within plausible clinical ranges.
    ///
    /// The engine never calls this; it exists for the intake layer that
    /// decides whether a record is admissible at all.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.age > 120 {
            errors.push(format!("Age {} out of range [0, 120]", self.age));
        }
        if self.ed_visits > 365 {
            errors.push(format!("ED visits {} out of range [0, 365]", self.ed_visits));
        }
        if self.hospitalizations > 365 {
            errors.push(format!(
                "Hospitalizations {} out of range [0, 365]",
                self.hospitalizations
            ));
        }
        if self.medication_count > 100 {
            errors.push(format!(
                "Medication count {} out of range [0, 100]",
                self.medication_count
            ));
        }
        if !(10.0..=100.0).contains(&self.bmi) {
            errors.push(format!("BMI {} out of range [10, 100]", self.bmi));
        }
        if !(50.0..=300.0).contains(&self.systolic_bp) {
            errors.push(format!(
                "Systolic BP {} out of range [50, 300]",
                self.systolic_bp
            ));
        }
        if !(20.0..=1000.0).contains(&self.glucose) {
            errors.push(format!("Glucose {} out of range [20, 1000]", self.glucose));
        }
        if !(50.0..=1000.0).contains(&self.cholesterol) {
            errors.push(format!(
                "Cholesterol {} out of range [50, 1000]",
                self.cholesterol
            ));
        }
        if self.conditions.iter().any(|c| c.trim().is_empty()) {
            errors.push("Condition names must not be blank".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
