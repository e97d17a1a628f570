use serde::{Deserialize, Serialize};
use std::fmt;

/// The most specific type a payload token could be read as.
///
/// Integers win over floats, and anything that is neither stays as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Numeric view of the value. Integers widen to `f64`; text yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int(i) => Some(*i as f64),
            ScalarValue::Float(f) => Some(*f),
            ScalarValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x:e}"),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(text: &str) -> Self {
        convert(text)
    }
}

/// Converts a raw token into a [`ScalarValue`].
///
/// Surrounding whitespace is ignored for the numeric attempts, but a token that
/// is not numeric is returned exactly as given. This never fails.
pub fn convert(text: &str) -> ScalarValue {
    let token = text.trim();
    if let Ok(i) = token.parse::<i64>() {
        return ScalarValue::Int(i);
    }
    if let Ok(f) = token.parse::<f64>() {
        return ScalarValue::Float(f);
    }
    ScalarValue::Text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_preferred() {
        assert_eq!(convert("42"), ScalarValue::Int(42));
        assert_eq!(convert("-7"), ScalarValue::Int(-7));
        assert_eq!(convert(" 3 "), ScalarValue::Int(3));
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(convert("1e-06"), ScalarValue::Float(1e-6));
        assert_eq!(convert("0.5"), ScalarValue::Float(0.5));
        assert_eq!(convert("-2.5E+03"), ScalarValue::Float(-2500.0));
        // An integer token with a fractional part is a float.
        assert_eq!(convert("3.0"), ScalarValue::Float(3.0));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        assert_eq!(convert("success"), ScalarValue::Text("success".into()));
        assert_eq!(convert(""), ScalarValue::Text(String::new()));
        assert_eq!(convert("1.0.0"), ScalarValue::Text("1.0.0".into()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ScalarValue::Int(2).as_f64(), Some(2.0));
        assert_eq!(ScalarValue::Float(2.5).as_i64(), None);
        assert_eq!(ScalarValue::Text("x".into()).as_str(), Some("x"));
        assert_eq!(ScalarValue::Text("x".into()).as_f64(), None);
    }
}
