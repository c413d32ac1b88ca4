use serde::{Deserialize, Serialize};

use super::numeric::{coerce_score, NumericInput};

pub const DEFAULT_PRE_FINAL_WEIGHT: f64 = 70.0;
pub const DEFAULT_PASSING_GRADE: f64 = 60.0;
pub const DEFAULT_EXEMPTION_FLOOR: f64 = 77.0;
pub const DEFAULT_COMPONENT_FLOOR: f64 = 60.0;
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.1;

/// Exam shares at or below this cannot move the final grade.
pub const NEGLIGIBLE_EXAM_WEIGHT: f64 = 0.01;

/// Grading policy constants.
///
/// Every field is optional; missing fields fall back to the `DEFAULT_*`
/// constants. Request settings may override the blend (`pre_final_weight`,
/// `passing_grade`) but never the exemption floors.
///
/// Example YAML:
/// ```yaml
/// grading:
///   pre_final_weight: 70
///   passing_grade: 60
///   exemption_floor: 77
///   component_floor: 60
///   weight_tolerance: 0.1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradingPolicy {
    /// Share of the final grade carried by the pre-final grade, in percent
    #[serde(default)]
    pub pre_final_weight: Option<f64>,

    /// Final grade needed to pass
    #[serde(default)]
    pub passing_grade: Option<f64>,

    /// Minimum pre-final grade for exemption from the final exam
    #[serde(default)]
    pub exemption_floor: Option<f64>,

    /// A component averaging below this blocks exemption
    #[serde(default)]
    pub component_floor: Option<f64>,

    /// Allowed distance of the weight total from 100
    #[serde(default)]
    pub weight_tolerance: Option<f64>,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            pre_final_weight: Some(DEFAULT_PRE_FINAL_WEIGHT),
            passing_grade: Some(DEFAULT_PASSING_GRADE),
            exemption_floor: Some(DEFAULT_EXEMPTION_FLOOR),
            component_floor: Some(DEFAULT_COMPONENT_FLOOR),
            weight_tolerance: Some(DEFAULT_WEIGHT_TOLERANCE),
        }
    }
}

impl GradingPolicy {
    pub fn pre_final_weight(&self) -> f64 {
        self.pre_final_weight.unwrap_or(DEFAULT_PRE_FINAL_WEIGHT)
    }

    pub fn passing_grade(&self) -> f64 {
        self.passing_grade.unwrap_or(DEFAULT_PASSING_GRADE)
    }

    pub fn exemption_floor(&self) -> f64 {
        self.exemption_floor.unwrap_or(DEFAULT_EXEMPTION_FLOOR)
    }

    pub fn component_floor(&self) -> f64 {
        self.component_floor.unwrap_or(DEFAULT_COMPONENT_FLOOR)
    }

    pub fn weight_tolerance(&self) -> f64 {
        self.weight_tolerance.unwrap_or(DEFAULT_WEIGHT_TOLERANCE)
    }

    /// Fill every unset field with its default, for display.
    pub fn resolved(&self) -> Self {
        Self {
            pre_final_weight: Some(self.pre_final_weight()),
            passing_grade: Some(self.passing_grade()),
            exemption_floor: Some(self.exemption_floor()),
            component_floor: Some(self.component_floor()),
            weight_tolerance: Some(self.weight_tolerance()),
        }
    }
}

/// Per-request blend settings, as sent alongside the components.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeSettings {
    /// Pre-final share of the final grade, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_final_weight: Option<NumericInput>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_grade: Option<NumericInput>,
}

impl GradeSettings {
    pub fn new(pre_final_weight: Option<f64>, passing_grade: Option<f64>) -> Self {
        Self {
            pre_final_weight: pre_final_weight.map(NumericInput::Number),
            passing_grade: passing_grade.map(NumericInput::Number),
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(&self, other: &GradeSettings) -> Self {
        Self {
            pre_final_weight: other
                .pre_final_weight
                .clone()
                .or_else(|| self.pre_final_weight.clone()),
            passing_grade: other
                .passing_grade
                .clone()
                .or_else(|| self.passing_grade.clone()),
        }
    }
}

/// Blend parameters after request settings are laid over the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    /// Pre-final share as a fraction (0.7 for 70%)
    pub pre_final_weight: f64,
    pub exam_weight: f64,
    pub passing_grade: f64,
}

impl Blend {
    /// Unparseable request values fall through to the policy value.
    pub fn resolve(settings: Option<&GradeSettings>, policy: &GradingPolicy) -> Self {
        let pre_final_pct = settings
            .and_then(|s| s.pre_final_weight.as_ref())
            .and_then(coerce_score)
            .unwrap_or_else(|| policy.pre_final_weight());
        let passing_grade = settings
            .and_then(|s| s.passing_grade.as_ref())
            .and_then(coerce_score)
            .unwrap_or_else(|| policy.passing_grade());

        let pre_final_weight = pre_final_pct / 100.0;
        Self {
            pre_final_weight,
            exam_weight: 1.0 - pre_final_weight,
            passing_grade,
        }
    }

    /// Whether the final exam carries enough weight to change the grade.
    pub fn exam_counts(&self) -> bool {
        self.exam_weight > NEGLIGIBLE_EXAM_WEIGHT
    }
}
