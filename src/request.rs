use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grading::{
    evaluate_with_policy, EvaluationResult, GradeComponent, GradeError, GradeSettings,
    GradingPolicy,
};

/// A grade calculation request as received over the wire.
///
/// ```json
/// {
///   "components": [{ "name": "Quizzes", "weight": 20, "scores": [90, "85", ""] }],
///   "settings": { "preFinalWeight": 70, "passingGrade": 60 }
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EvaluationRequest {
    pub components: Vec<GradeComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<GradeSettings>,
}

/// Parse a request body. Anything other than a non-empty `components`
/// array is an input error; a malformed `settings` value is ignored.
pub fn parse_request(body: &str) -> Result<EvaluationRequest, GradeError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GradeError::Input(format!("Request body is not valid JSON ({}).", e)))?;

    let items = match value.get("components") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(GradeError::missing_components()),
    };

    let components = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<GradeComponent>(item.clone())
                .map_err(|e| GradeError::Input(format!("components[{}]: {}", i, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let settings = value
        .get("settings")
        .filter(|s| s.is_object())
        .and_then(|s| serde_json::from_value::<GradeSettings>(s.clone()).ok());

    Ok(EvaluationRequest {
        components,
        settings,
    })
}

/// The request's own settings with `overrides` laid on top
/// (command-line flags win over the request body).
pub fn resolved_settings(request: &EvaluationRequest, overrides: &GradeSettings) -> GradeSettings {
    request
        .settings
        .clone()
        .unwrap_or_default()
        .merged_with(overrides)
}

/// Evaluate a parsed request under its [`resolved_settings`].
pub fn evaluate_request(
    request: &EvaluationRequest,
    overrides: &GradeSettings,
    policy: &GradingPolicy,
) -> Result<EvaluationResult, GradeError> {
    let settings = resolved_settings(request, overrides);
    evaluate_with_policy(&request.components, Some(&settings), policy)
}

/// Response envelope: `{ success: true, data }` or `{ error, kind }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ApiResponse {
    Success {
        success: bool,
        data: EvaluationResult,
    },
    Failure {
        error: String,
        kind: &'static str,
    },
}

impl ApiResponse {
    pub fn from_outcome(outcome: &Result<EvaluationResult, GradeError>) -> Self {
        match outcome {
            Ok(data) => ApiResponse::Success {
                success: true,
                data: data.clone(),
            },
            Err(e) => ApiResponse::Failure {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::NumericInput;

    const SAMPLE: &str = r#"{
        "components": [
            { "name": "Exercises", "weight": 20, "scores": [90] },
            { "name": "Quizzes", "weight": 5, "scores": [90] },
            { "name": "Project", "weight": 15, "scores": ["90"] },
            { "name": "Long Exams", "weight": 60, "scores": [80, 85, 90, ""] }
        ]
    }"#;

    #[test]
    fn test_parse_sample_request() {
        let request = parse_request(SAMPLE).unwrap();
        assert_eq!(request.components.len(), 4);
        assert_eq!(request.components[2].scores, vec![NumericInput::from("90")]);
        assert!(request.settings.is_none());
    }

    #[test]
    fn test_missing_components() {
        assert_eq!(parse_request("{}"), Err(GradeError::missing_components()));
    }

    #[test]
    fn test_components_not_a_list() {
        let result = parse_request(r#"{"components": {"name": "Quizzes"}}"#);
        assert_eq!(result, Err(GradeError::missing_components()));
    }

    #[test]
    fn test_empty_components() {
        let result = parse_request(r#"{"components": []}"#);
        assert_eq!(result, Err(GradeError::missing_components()));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_request("{ not json").unwrap_err();
        assert_eq!(err.kind(), "input");
    }

    #[test]
    fn test_component_not_an_object() {
        let err = parse_request(r#"{"components": [42]}"#).unwrap_err();
        assert_eq!(err.kind(), "input");
        assert!(err.to_string().contains("components[0]"));
    }

    #[test]
    fn test_settings_parsed() {
        let body = r#"{
            "components": [{ "name": "All", "weight": 100, "scores": [50] }],
            "settings": { "preFinalWeight": 100 }
        }"#;
        let request = parse_request(body).unwrap();
        let settings = request.settings.unwrap();
        assert_eq!(settings.pre_final_weight, Some(NumericInput::Number(100.0)));
        assert!(settings.passing_grade.is_none());
    }

    #[test]
    fn test_malformed_settings_ignored() {
        let body = r#"{
            "components": [{ "name": "All", "weight": 100, "scores": [50] }],
            "settings": "strict"
        }"#;
        let request = parse_request(body).unwrap();
        assert!(request.settings.is_none());
    }

    #[test]
    fn test_overrides_win_over_request_settings() {
        let body = r#"{
            "components": [{ "name": "All", "weight": 100, "scores": [50] }],
            "settings": { "preFinalWeight": 50, "passingGrade": 75 }
        }"#;
        let request = parse_request(body).unwrap();

        let result =
            evaluate_request(&request, &GradeSettings::default(), &GradingPolicy::default())
                .unwrap();
        // (75 - 25) / 0.5
        assert_eq!(result.required_final_exam_score, Some(100.0));

        let overrides = GradeSettings::new(None, Some(60.0));
        let result = evaluate_request(&request, &overrides, &GradingPolicy::default()).unwrap();
        // (60 - 25) / 0.5
        assert_eq!(result.required_final_exam_score, Some(70.0));
    }

    #[test]
    fn test_resolved_settings_without_request_settings() {
        let request = parse_request(SAMPLE).unwrap();
        let overrides = GradeSettings::new(Some(100.0), None);
        let settings = resolved_settings(&request, &overrides);
        assert_eq!(settings, overrides);

        let none = resolved_settings(&request, &GradeSettings::default());
        assert_eq!(none, GradeSettings::default());
    }

    #[test]
    fn test_success_envelope() {
        let request = parse_request(SAMPLE).unwrap();
        let outcome =
            evaluate_request(&request, &GradeSettings::default(), &GradingPolicy::default());
        let json = serde_json::to_value(ApiResponse::from_outcome(&outcome)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["preFinalGrade"], 87.0);
        assert_eq!(json["data"]["isExempt"], true);
        assert!(json["data"]["requiredFinalExamScore"].is_null());
        assert_eq!(json["data"]["breakdown"][3]["average"], 85.0);
        assert_eq!(json["data"]["breakdown"][3]["scores"][3], "");
    }

    #[test]
    fn test_weight_failure_envelope() {
        let body = r#"{"components": [{ "name": "A", "weight": 85, "scores": [90] }]}"#;
        let request = parse_request(body).unwrap();
        let outcome =
            evaluate_request(&request, &GradeSettings::default(), &GradingPolicy::default());
        let json = serde_json::to_value(ApiResponse::from_outcome(&outcome)).unwrap();

        assert_eq!(json["error"], "Total weight must be exactly 100%. Current: 85%");
        assert_eq!(json["kind"], "weight");
        assert!(json.get("success").is_none());
    }
}
