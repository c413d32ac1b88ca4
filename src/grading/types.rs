use serde::{Deserialize, Serialize};

use super::numeric::NumericInput;

/// A named, weighted category of assessment holding raw scores.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GradeComponent {
    #[serde(default)]
    pub name: String,

    /// Percentage points of the pre-final grade
    #[serde(default)]
    pub weight: NumericInput,

    #[serde(default)]
    pub scores: Vec<NumericInput>,
}

impl GradeComponent {
    pub fn new(name: &str, weight: f64, scores: Vec<NumericInput>) -> Self {
        Self {
            name: name.to_string(),
            weight: NumericInput::Number(weight),
            scores,
        }
    }
}

/// Per-component line of an evaluation. Weight and scores are echoed back
/// exactly as submitted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ComponentResult {
    pub name: String,
    pub weight: NumericInput,
    pub scores: Vec<NumericInput>,
    /// Rounded to 2 decimals
    pub average: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub pre_final_grade: f64,
    pub is_exempt: bool,
    /// `None` exactly when the student is exempt
    pub required_final_exam_score: Option<f64>,
    pub breakdown: Vec<ComponentResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_parse_with_missing_fields() {
        let component: GradeComponent = serde_json::from_str(r#"{"name": "Quizzes"}"#).unwrap();
        assert_eq!(component.name, "Quizzes");
        assert_eq!(component.weight, NumericInput::default());
        assert!(component.scores.is_empty());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = EvaluationResult {
            pre_final_grade: 70.5,
            is_exempt: false,
            required_final_exam_score: Some(35.5),
            breakdown: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["preFinalGrade"], 70.5);
        assert_eq!(json["isExempt"], false);
        assert_eq!(json["requiredFinalExamScore"], 35.5);
        assert!(json["breakdown"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_exempt_result_serializes_null_score() {
        let result = EvaluationResult {
            pre_final_grade: 87.0,
            is_exempt: true,
            required_final_exam_score: None,
            breakdown: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["requiredFinalExamScore"].is_null());
    }
}
