//! # Easel Registry
//!
//! Metadata registry for constructible classes.
//!
//! The registry is the single source of truth for *what can be built*:
//! which classes exist, which properties each class declares (in
//! declaration order), how many children a slot accepts, and how to
//! construct a live object for a class. Everything else in the editor
//! consumes it read-only.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ registry: ClassMeta + factory table           │
//! │  - property metadata, declaration order       │
//! │  - cardinality + slot acceptance constraints  │
//! │  - class name → LiveObject factory closure    │
//! └───────────────────────────────────────────────┘
//!                      ↓ (read-only, Arc-shared)
//! ┌───────────────────────────────────────────────┐
//! │ document / jobs / dnd                         │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Construction goes through an explicit capability table: each class is
//! paired with a factory closure at registration time, so there is no
//! runtime reflection anywhere in the editor.

mod errors;
mod live;
mod meta;
mod registry;
mod value;

pub use errors::RegistryError;
pub use live::LiveObject;
pub use meta::{Accepts, Cardinality, ClassMeta, PropertyKind, PropertyMeta};
pub use registry::{ConstructorArgs, Factory, Registry};
pub use value::{PropertyValue, ValueKind};
