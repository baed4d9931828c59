//! # Class and property metadata
//!
//! Declarative description of what a class can hold. Declaration order is
//! significant: it drives the serialized property order, the visitor walk,
//! and the main-slot resolution used by drop gestures.

use crate::value::{PropertyValue, ValueKind};
use serde::{Deserialize, Serialize};

/// How many children a slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most one child; inserting into an occupied slot fails
    Single,

    /// An ordered list of children
    Many,
}

/// Which classes a slot accepts as children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Accepts {
    /// Any registered class
    Any,

    /// Only the listed classes
    Classes(Vec<String>),
}

impl Accepts {
    pub fn allows(&self, class_name: &str) -> bool {
        match self {
            Accepts::Any => true,
            Accepts::Classes(names) => names.iter().any(|n| n == class_name),
        }
    }
}

/// What a property holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PropertyKind {
    /// Scalar value configured through a setter on the live object
    Value {
        value_kind: ValueKind,
        default: Option<PropertyValue>,
    },

    /// Slot holding child instances
    Slot { accepts: Accepts },
}

/// One declared property of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMeta {
    pub name: String,
    pub cardinality: Cardinality,
    pub kind: PropertyKind,
}

impl PropertyMeta {
    /// Scalar property, no default
    pub fn value(name: impl Into<String>, value_kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Single,
            kind: PropertyKind::Value {
                value_kind,
                default: None,
            },
        }
    }

    /// Slot accepting an ordered list of any children
    pub fn slot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Many,
            kind: PropertyKind::Slot {
                accepts: Accepts::Any,
            },
        }
    }

    /// Slot accepting at most one child
    pub fn single_slot(name: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::Single,
            ..Self::slot(name)
        }
    }

    pub fn with_default(mut self, value: PropertyValue) -> Self {
        if let PropertyKind::Value { ref mut default, .. } = self.kind {
            *default = Some(value);
        }
        self
    }

    pub fn accepting(mut self, classes: &[&str]) -> Self {
        if let PropertyKind::Slot { ref mut accepts } = self.kind {
            *accepts = Accepts::Classes(classes.iter().map(|c| c.to_string()).collect());
        }
        self
    }

    pub fn is_slot(&self) -> bool {
        matches!(self.kind, PropertyKind::Slot { .. })
    }

    pub fn default_value(&self) -> Option<&PropertyValue> {
        match &self.kind {
            PropertyKind::Value { default, .. } => default.as_ref(),
            PropertyKind::Slot { .. } => None,
        }
    }
}

/// One constructible class: name plus properties in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMeta {
    pub name: String,
    pub properties: Vec<PropertyMeta>,
}

impl ClassMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyMeta) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMeta> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Position of a property in declaration order
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// The slot drop gestures target by default: the first slot declared
    /// on the class that accepts child instances. Declaration order is the
    /// tie-break.
    pub fn main_slot(&self) -> Option<&PropertyMeta> {
        self.properties.iter().find(|p| p.is_slot())
    }
}
