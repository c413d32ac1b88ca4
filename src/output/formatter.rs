use std::io::IsTerminal;
use chrono::{Duration, Utc};
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::grading::{coerce_weight, Blend, ComponentResult, EvaluationResult, NumericInput};
use crate::history::HistoryEntry;

const WEIGHT_WIDTH: usize = 7;
const AVERAGE_WIDTH: usize = 8;
const MIN_NAME_WIDTH: usize = 12;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Grades always show two decimals ("87.00")
pub fn format_grade(grade: f64) -> String {
    format!("{:.2}", grade)
}

/// Describe the required final exam score, flagging values outside 0..=100.
/// When the exam carries no weight under `blend` the number means nothing.
pub fn format_required_score(score: Option<f64>, blend: &Blend) -> String {
    match score {
        None => "not required (exempt)".to_string(),
        Some(_) if !blend.exam_counts() => "n/a (final exam carries no weight)".to_string(),
        Some(s) if s <= 0.0 => format!("{} (already passing)", format_grade(s)),
        Some(s) if s > 100.0 => format!("{} (out of reach)", format_grade(s)),
        Some(s) => format_grade(s),
    }
}

fn format_scores(scores: &[NumericInput]) -> String {
    if scores.is_empty() {
        return "-".to_string();
    }
    scores
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format the per-component breakdown as a table:
/// Component, Weight, Average, Scores.
/// Averages below `component_floor` are highlighted when colored.
pub fn format_breakdown(
    breakdown: &[ComponentResult],
    component_floor: f64,
    use_colors: bool,
) -> String {
    if breakdown.is_empty() {
        return "No components.".to_string();
    }

    let longest = breakdown
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Component".len());

    // Name column gives way first on narrow terminals
    let fixed_width = WEIGHT_WIDTH + AVERAGE_WIDTH + 6 + 20;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + MIN_NAME_WIDTH => longest.min(width - fixed_width),
        Some(_) => longest.min(MIN_NAME_WIDTH),
        None => longest,
    };

    let header = format!(
        "{:<name_width$}  {:>weight_width$}  {:>average_width$}  Scores",
        "Component",
        "Weight",
        "Average",
        name_width = name_width,
        weight_width = WEIGHT_WIDTH,
        average_width = AVERAGE_WIDTH
    );

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for component in breakdown {
        let name = truncate_name(&component.name, name_width);
        let weight = format!("{}%", coerce_weight(&component.weight));
        let weight = format!("{:>1$}", weight, WEIGHT_WIDTH);
        let average = format!("{:>1$}", format_grade(component.average), AVERAGE_WIDTH);
        let scores = format_scores(&component.scores);

        let line = if use_colors {
            let average = if component.average < component_floor {
                average.red().to_string()
            } else {
                average.green().to_string()
            };
            format!(
                "{:<name_width$}  {}  {}  {}",
                name,
                weight.cyan(),
                average,
                scores.dimmed(),
                name_width = name_width
            )
        } else {
            format!(
                "{:<name_width$}  {}  {}  {}",
                name,
                weight,
                average,
                scores,
                name_width = name_width
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format the grade summary under the breakdown table
pub fn format_summary(result: &EvaluationResult, blend: &Blend, use_colors: bool) -> String {
    let grade = format_grade(result.pre_final_grade);
    let required = format_required_score(result.required_final_exam_score, blend);

    if use_colors {
        let status = if result.is_exempt {
            "EXEMPT from the final exam".green().bold().to_string()
        } else {
            "not exempt".yellow().to_string()
        };
        format!(
            "Pre-final grade: {}\nStatus: {}\nRequired final exam score: {}",
            grade.bold(),
            status,
            required
        )
    } else {
        let status = if result.is_exempt {
            "EXEMPT from the final exam"
        } else {
            "not exempt"
        };
        format!(
            "Pre-final grade: {}\nStatus: {}\nRequired final exam score: {}",
            grade, status, required
        )
    }
}

/// Format the full evaluation: breakdown table, blank line, summary
pub fn format_evaluation(
    result: &EvaluationResult,
    blend: &Blend,
    component_floor: f64,
    use_colors: bool,
) -> String {
    format!(
        "{}\n\n{}",
        format_breakdown(&result.breakdown, component_floor, use_colors),
        format_summary(result, blend, use_colors)
    )
}

/// Format history entries, one line each:
/// "{age}  {pre-final}  {exempt | required score}  {components}"
pub fn format_history(entries: &[&HistoryEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No recorded evaluations.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let age = format!("{:>4}", format_age(Utc::now() - entry.recorded_at));
            let grade = format!("{:>6}", format_grade(entry.pre_final_grade));
            let outcome = match entry.required_final_exam_score {
                None => "exempt".to_string(),
                Some(s) => format!("needs {}", format_grade(s)),
            };
            let components = entry
                .components
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            if use_colors {
                let outcome = if entry.is_exempt {
                    outcome.green().to_string()
                } else {
                    outcome.yellow().to_string()
                };
                format!(
                    "{}  {}  {}  {}",
                    age.dimmed(),
                    grade.bold(),
                    outcome,
                    components.dimmed()
                )
            } else {
                format!("{}  {}  {}  {}", age, grade, outcome, components)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
