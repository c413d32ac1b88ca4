/// Failures the grade evaluator reports to its caller.
///
/// None of these are transient; the evaluator performs no I/O, so there is
/// nothing to retry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GradeError {
    /// The components collection is missing, empty or not a list.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Component weights do not add up to 100 within tolerance.
    #[error("Total weight must be exactly 100%. Current: {total}%")]
    Weight { total: f64 },

    /// The arithmetic produced something that is not a finite number.
    #[error("Computation failed: {0}")]
    Computation(String),
}

impl GradeError {
    pub fn missing_components() -> Self {
        GradeError::Input("Components array is required.".to_string())
    }

    /// Short machine-readable label used in JSON responses.
    pub fn kind(&self) -> &'static str {
        match self {
            GradeError::Input(_) => "input",
            GradeError::Weight { .. } => "weight",
            GradeError::Computation(_) => "computation",
        }
    }
}
