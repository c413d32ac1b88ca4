use super::config::GradingPolicy;
use super::error::GradeError;
use super::numeric::coerce_weight;
use super::types::GradeComponent;

/// Check that component weights add up to 100 within `tolerance`.
/// Returns the coerced total on success.
pub fn validate_weights(components: &[GradeComponent], tolerance: f64) -> Result<f64, GradeError> {
    if components.is_empty() {
        return Err(GradeError::missing_components());
    }

    let total = components
        .iter()
        .fold(0.0_f64, |sum, component| sum + coerce_weight(&component.weight));

    // NaN totals fail here too
    if (total - 100.0).abs() <= tolerance {
        Ok(total)
    } else {
        Err(GradeError::Weight { total })
    }
}

/// Validate grading policy at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_policy(policy: &GradingPolicy) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(weight) = policy.pre_final_weight {
        if !(0.0..=100.0).contains(&weight) {
            errors.push(format!(
                "grading.pre_final_weight: must be between 0 and 100, got {}",
                weight
            ));
        }
    }

    let non_negative = [
        ("passing_grade", policy.passing_grade),
        ("exemption_floor", policy.exemption_floor),
        ("component_floor", policy.component_floor),
        ("weight_tolerance", policy.weight_tolerance),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                errors.push(format!(
                    "grading.{}: must be a non-negative number, got {}",
                    field, v
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
