use super::config::{Blend, GradeSettings, GradingPolicy};
use super::error::GradeError;
use super::numeric::{coerce_score, coerce_weight, round2, NumericInput};
use super::types::{ComponentResult, EvaluationResult, GradeComponent};
use super::validation::validate_weights;

/// Mean of the scores that parse as finite numbers, unrounded.
/// A component with no usable scores averages 0.
pub fn average_of(scores: &[NumericInput]) -> f64 {
    let valid: Vec<f64> = scores.iter().filter_map(coerce_score).collect();
    if valid.is_empty() {
        return 0.0;
    }
    valid.iter().sum::<f64>() / valid.len() as f64
}

/// Evaluate components under the default grading policy.
pub fn evaluate(
    components: &[GradeComponent],
    settings: Option<&GradeSettings>,
) -> Result<EvaluationResult, GradeError> {
    evaluate_with_policy(components, settings, &GradingPolicy::default())
}

pub fn evaluate_with_policy(
    components: &[GradeComponent],
    settings: Option<&GradeSettings>,
    policy: &GradingPolicy,
) -> Result<EvaluationResult, GradeError> {
    validate_weights(components, policy.weight_tolerance())?;

    let mut pre_final_grade: f64 = 0.0;
    let mut has_failing_component = false;
    let mut breakdown = Vec::with_capacity(components.len());

    for component in components {
        let average = average_of(&component.scores);
        pre_final_grade += average * (coerce_weight(&component.weight) / 100.0);

        if average < policy.component_floor() {
            has_failing_component = true;
        }

        breakdown.push(ComponentResult {
            name: component.name.clone(),
            weight: component.weight.clone(),
            scores: component.scores.clone(),
            average: round2(average),
        });
    }

    if !pre_final_grade.is_finite() {
        return Err(GradeError::Computation(format!(
            "pre-final grade is not a finite number ({})",
            pre_final_grade
        )));
    }

    let is_exempt = pre_final_grade >= policy.exemption_floor() && !has_failing_component;

    let required_final_exam_score = if is_exempt {
        None
    } else {
        Some(required_exam_score(
            pre_final_grade,
            &Blend::resolve(settings, policy),
        )?)
    };

    Ok(EvaluationResult {
        pre_final_grade: round2(pre_final_grade),
        is_exempt,
        required_final_exam_score: required_final_exam_score.map(round2),
        breakdown,
    })
}

/// Solve `passing = pre_final * w + exam * (1 - w)` for `exam`.
/// The result is not clamped: below 0 means already passing, above 100
/// means out of reach.
fn required_exam_score(pre_final_grade: f64, blend: &Blend) -> Result<f64, GradeError> {
    if !blend.exam_counts() {
        return Ok(0.0);
    }

    let required = (blend.passing_grade - pre_final_grade * blend.pre_final_weight)
        / blend.exam_weight;

    if required.is_finite() {
        Ok(required)
    } else {
        Err(GradeError::Computation(format!(
            "required final exam score is not a finite number ({})",
            required
        )))
    }
}
