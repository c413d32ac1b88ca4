pub mod formatter;

pub use formatter::{
    format_age, format_breakdown, format_evaluation, format_grade, format_history,
    format_required_score, format_summary, should_use_colors,
};
