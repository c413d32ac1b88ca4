pub mod config;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod types;
pub mod validation;

pub use config::*;
pub use engine::{average_of, evaluate, evaluate_with_policy};
pub use error::GradeError;
pub use numeric::{coerce_score, coerce_weight, parse_float, round2, NumericInput};
pub use types::{ComponentResult, EvaluationResult, GradeComponent};
pub use validation::{validate_policy, validate_weights};
