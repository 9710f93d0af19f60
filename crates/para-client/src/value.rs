//! Coercion of user-typed values into JSON

use serde_json::{Number, Value};

/// Largest integer an f64 represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Turn raw user input into the JSON value sent to the control service.
///
/// `true`/`false` become booleans, text that parses completely as a finite
/// number becomes a number and everything else (the empty string included)
/// is sent as a string.
pub fn coerce_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "" => Value::String(String::new()),
        _ => parse_number(raw).unwrap_or_else(|| Value::String(raw.to_string())),
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::from(int));
    }

    let float: f64 = raw.parse().ok()?;
    if !float.is_finite() {
        return None;
    }
    // 42.0 goes out as 42
    if float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER {
        return Some(Value::from(float as i64));
    }
    Number::from_f64(float).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booleans() {
        assert_eq!(coerce_value("true"), json!(true));
        assert_eq!(coerce_value("false"), json!(false));
        assert_eq!(coerce_value("TRUE"), json!("TRUE"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce_value("42"), json!(42));
        assert_eq!(coerce_value("-7"), json!(-7));
        assert_eq!(coerce_value("3.5"), json!(3.5));
        assert_eq!(coerce_value("42.0"), json!(42));
        assert_eq!(coerce_value("1e3"), json!(1000));
    }

    #[test]
    fn test_strings() {
        assert_eq!(coerce_value(""), json!(""));
        assert_eq!(coerce_value("hello"), json!("hello"));
        assert_eq!(coerce_value("12abc"), json!("12abc"));
        assert_eq!(coerce_value("NaN"), json!("NaN"));
        assert_eq!(coerce_value("inf"), json!("inf"));
    }
}
