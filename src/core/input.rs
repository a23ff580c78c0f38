//! Conversion of raw form and voice-parser values into game counts.
//!
//! Non-integral values are rejected, never rounded. The one coercion kept
//! is blank to zero, which the form relies on for an unplayed third set.

use serde_json::Value;

pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

pub fn parse_games(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }

    // "6.0" 之類的整數小數也接受
    let value = trimmed.parse::<f64>().ok()?;
    integral(value)
}

pub fn games_from_json(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral)),
        Value::String(text) if !is_blank(text) => parse_games(text),
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_games() {
        assert_eq!(parse_games("6"), Some(6));
        assert_eq!(parse_games(" 7 "), Some(7));
        assert_eq!(parse_games("6.0"), Some(6));
        assert_eq!(parse_games(""), Some(0));
        assert_eq!(parse_games("   "), Some(0));
        assert_eq!(parse_games("-2"), Some(-2));
        assert_eq!(parse_games("6.5"), None);
        assert_eq!(parse_games("six"), None);
        assert_eq!(parse_games("inf"), None);
        assert_eq!(parse_games("NaN"), None);
    }

    #[test]
    fn test_games_from_json() {
        assert_eq!(games_from_json(&json!(6)), Some(6));
        assert_eq!(games_from_json(&json!(7.0)), Some(7));
        assert_eq!(games_from_json(&json!("4")), Some(4));
        assert_eq!(games_from_json(&json!(4.5)), None);
        assert_eq!(games_from_json(&json!(null)), None);
        assert_eq!(games_from_json(&json!(true)), None);
        assert_eq!(games_from_json(&json!("")), None);
        assert_eq!(games_from_json(&json!("abc")), None);
    }
}
