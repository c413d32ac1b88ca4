use serde::{Deserialize, Serialize};
use std::fmt;

/// A loosely typed numeric token as submitted by a caller.
///
/// Scores and weights arrive as JSON numbers, numeric strings, empty strings
/// or whatever else a form happened to send. Deserialization accepts any of
/// them; turning a token into a number is the job of [`coerce_score`] and
/// [`coerce_weight`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for NumericInput {
    fn default() -> Self {
        NumericInput::Other(serde_json::Value::Null)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Number(n) => write!(f, "{}", n),
            NumericInput::Text(s) if s.is_empty() => write!(f, "-"),
            NumericInput::Text(s) => write!(f, "{}", s),
            NumericInput::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Parse the longest decimal prefix of `input`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"85abc"`
/// yields 85 and `"1e"` yields 1. Returns `None` when no digits lead the
/// string or the value is not finite (`"Infinity"`, `"1e999"`).
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_len = count_digits(&bytes[pos..]);
    let int_part = &s[pos..pos + int_len];
    pos += int_len;

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_len = count_digits(&bytes[pos + 1..]);
        if int_len > 0 || frac_len > 0 {
            frac_part = &s[pos + 1..pos + 1 + frac_len];
            pos += 1 + frac_len;
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut exp_part = String::new();
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        let mut exp_sign = "";
        if let Some(sign @ (b'+' | b'-')) = bytes.get(exp_pos) {
            exp_sign = if *sign == b'-' { "-" } else { "" };
            exp_pos += 1;
        }
        let exp_len = count_digits(&bytes[exp_pos..]);
        if exp_len > 0 {
            exp_part = format!("e{}{}", exp_sign, &s[exp_pos..exp_pos + exp_len]);
        }
    }

    let normalized = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exp_part
    );

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Coerce a score token. Empty strings, unparseable text and non-numeric
/// JSON values are absent.
pub fn coerce_score(token: &NumericInput) -> Option<f64> {
    match token {
        NumericInput::Number(n) if n.is_finite() => Some(*n),
        NumericInput::Number(_) => None,
        NumericInput::Text(s) if s.is_empty() => None,
        NumericInput::Text(s) => parse_float(s),
        NumericInput::Other(_) => None,
    }
}

/// Coerce a weight token; anything that is not a number counts as 0.
pub fn coerce_weight(token: &NumericInput) -> f64 {
    coerce_score(token).unwrap_or(0.0)
}

/// Round to two decimal places, rounding on the exact binary value and
/// breaking exact ties away from zero (0.125 -> 0.13, -0.125 -> -0.13).
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // Only multiples of 1/8 can sit exactly on a .xx5 tie.
    let scaled = value * 100.0;
    let rounded = if (value * 8.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        (scaled.abs() + 0.5).floor().copysign(value) / 100.0
    } else {
        format!("{:.2}", value).parse().unwrap_or(value)
    };

    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_float("85"), Some(85.0));
        assert_eq!(parse_float("-12.5"), Some(-12.5));
        assert_eq!(parse_float("+3"), Some(3.0));
        assert_eq!(parse_float("  42  "), Some(42.0));
    }

    #[test]
    fn test_parse_partial_forms() {
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("5."), Some(5.0));
        assert_eq!(parse_float("1e2"), Some(100.0));
        assert_eq!(parse_float("2.5E-1"), Some(0.25));
        assert_eq!(parse_float("5.e1"), Some(50.0));
    }

    #[test]
    fn test_parse_ignores_trailing_garbage() {
        assert_eq!(parse_float("85abc"), Some(85.0));
        assert_eq!(parse_float("90 pts"), Some(90.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float("1e+"), Some(1.0));
        assert_eq!(parse_float("0x10"), Some(0.0));
        assert_eq!(parse_float("12.5.3"), Some(12.5));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("   "), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("Infinity"), None);
        assert_eq!(parse_float("NaN"), None);
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(parse_float("1e999"), None);
    }

    #[test]
    fn test_coerce_score_tokens() {
        assert_eq!(coerce_score(&NumericInput::Number(80.0)), Some(80.0));
        assert_eq!(coerce_score(&NumericInput::from("90")), Some(90.0));
        assert_eq!(coerce_score(&NumericInput::from("")), None);
        assert_eq!(coerce_score(&NumericInput::from("abc")), None);
        assert_eq!(coerce_score(&NumericInput::Other(serde_json::Value::Null)), None);
        assert_eq!(coerce_score(&NumericInput::Other(serde_json::Value::Bool(true))), None);
    }

    #[test]
    fn test_coerce_weight_defaults_to_zero() {
        assert_eq!(coerce_weight(&NumericInput::Number(20.0)), 20.0);
        assert_eq!(coerce_weight(&NumericInput::from("15")), 15.0);
        assert_eq!(coerce_weight(&NumericInput::from("heavy")), 0.0);
        assert_eq!(coerce_weight(&NumericInput::default()), 0.0);
    }

    #[test]
    fn test_tokens_deserialize_from_mixed_json() {
        let tokens: Vec<NumericInput> =
            serde_json::from_str(r#"[80, "90", "", null, true, 1.5]"#).unwrap();
        assert_eq!(tokens[0], NumericInput::Number(80.0));
        assert_eq!(tokens[1], NumericInput::Text("90".to_string()));
        assert_eq!(tokens[2], NumericInput::Text(String::new()));
        assert_eq!(tokens[3], NumericInput::Other(serde_json::Value::Null));
        assert_eq!(tokens[4], NumericInput::Other(serde_json::Value::Bool(true)));
        assert_eq!(tokens[5], NumericInput::Number(1.5));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(87.0), 87.0);
        assert_eq!(round2(176.66666666666669), 176.67);
        assert_eq!(round2(83.333333), 83.33);
        assert_eq!(round2(1.005), 1.0); // 1.005 is stored slightly below
        assert_eq!(round2(-2.555555), -2.56);
    }

    #[test]
    fn test_round2_ties_go_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.375), 2.38);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(-2.375), -2.38);
    }

    #[test]
    fn test_round2_normalizes_negative_zero() {
        let rounded = round2(-0.001);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
    }
}
