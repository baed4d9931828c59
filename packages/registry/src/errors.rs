//! Error types for the registry

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Class not registered: {0}")]
    UnresolvedClass(String),

    #[error("Unknown property '{property}' on class '{class}'")]
    UnknownProperty { class: String, property: String },
}
