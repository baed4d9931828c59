use serde::{Deserialize, Serialize};

/// Terminal property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PropertyValue {
    String(String),
    Number(f64),
    Boolean(bool),

    /// Points at another instance by its assigned id. Resolution is
    /// deferred; a dangling target is a diagnostic, not an error.
    Reference(String),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::Boolean(_) => ValueKind::Boolean,
            PropertyValue::Reference(_) => ValueKind::Reference,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        PropertyValue::String(value.into())
    }

    pub fn reference(target: impl Into<String>) -> Self {
        PropertyValue::Reference(target.into())
    }
}

/// Type tag for scalar properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Reference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert_eq!(PropertyValue::string("hi").kind(), ValueKind::String);
        assert_eq!(PropertyValue::Number(1.5).kind(), ValueKind::Number);
        assert_eq!(PropertyValue::Boolean(true).kind(), ValueKind::Boolean);
        assert_eq!(PropertyValue::reference("header").kind(), ValueKind::Reference);
    }

    #[test]
    fn test_value_serialization_round_trip() {
        let value = PropertyValue::Number(42.0);
        let json = serde_json::to_string(&value).unwrap();
        let back: PropertyValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
