//! # Live objects
//!
//! A `LiveObject` is the constructed runtime counterpart of an attached
//! instance node. The editor core does not render; it maintains the object
//! and its configured values so a renderer can consume them. Configured
//! values are always derivable by re-walking the owning instance's
//! property nodes.

use crate::value::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Constructed runtime object mirrored by an instance node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveObject {
    pub class_name: String,
    values: HashMap<String, PropertyValue>,
}

impl LiveObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            values: HashMap::new(),
        }
    }

    /// Apply a property value, replacing any previous one. This is the
    /// setter-call the document regenerates when a property node changes.
    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    pub fn clear(&mut self, name: &str) {
        self.values.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &HashMap<String, PropertyValue> {
        &self.values
    }

    pub fn with_value(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.set(name, value);
        self
    }
}
