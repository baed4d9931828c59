//! # Registry
//!
//! Class table plus factory table. Registering a class installs a default
//! factory that constructs a `LiveObject` and applies the declared default
//! values; a custom factory can be supplied for classes whose construction
//! needs more than defaults (wrapped toolkit widgets, computed values).
//!
//! The registry is populated once at startup and shared read-only across
//! documents behind an `Arc`.

use crate::errors::RegistryError;
use crate::live::LiveObject;
use crate::meta::{ClassMeta, PropertyKind, PropertyMeta};
use crate::value::PropertyValue;
use std::collections::HashMap;

/// Constructor arguments: property name → value pairs, in the order the
/// caller supplies them
pub type ConstructorArgs = Vec<(String, PropertyValue)>;

/// Factory closure producing a live object for one class
pub type Factory = Box<dyn Fn(&ConstructorArgs) -> LiveObject + Send + Sync>;

pub struct Registry {
    classes: HashMap<String, ClassMeta>,
    factories: HashMap<String, Factory>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            factories: HashMap::new(),
        }
    }

    /// Register a class with the default factory (applies declared
    /// defaults, then constructor args)
    pub fn register(&mut self, meta: ClassMeta) {
        let defaults: Vec<(String, PropertyValue)> = meta
            .properties
            .iter()
            .filter_map(|p| p.default_value().map(|v| (p.name.clone(), v.clone())))
            .collect();
        let class_name = meta.name.clone();

        let factory: Factory = Box::new(move |args: &ConstructorArgs| {
            let mut live = LiveObject::new(class_name.clone());
            for (name, value) in &defaults {
                live.set(name.clone(), value.clone());
            }
            for (name, value) in args {
                live.set(name.clone(), value.clone());
            }
            live
        });

        self.register_with_factory(meta, factory);
    }

    /// Register a class with a custom factory
    pub fn register_with_factory(&mut self, meta: ClassMeta, factory: Factory) {
        self.factories.insert(meta.name.clone(), factory);
        self.classes.insert(meta.name.clone(), meta);
    }

    pub fn class(&self, name: &str) -> Option<&ClassMeta> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Look up a declared property, distinguishing "class missing" from
    /// "property missing"
    pub fn property(&self, class: &str, property: &str) -> Result<&PropertyMeta, RegistryError> {
        let meta = self
            .classes
            .get(class)
            .ok_or_else(|| RegistryError::UnresolvedClass(class.to_string()))?;

        meta.property(property)
            .ok_or_else(|| RegistryError::UnknownProperty {
                class: class.to_string(),
                property: property.to_string(),
            })
    }

    /// Construct a live object for a class. Validates the class and every
    /// constructor-arg property name before invoking the factory.
    pub fn construct(
        &self,
        class_name: &str,
        args: &ConstructorArgs,
    ) -> Result<LiveObject, RegistryError> {
        let meta = self
            .classes
            .get(class_name)
            .ok_or_else(|| RegistryError::UnresolvedClass(class_name.to_string()))?;

        for (name, _) in args {
            let property = meta
                .property(name)
                .ok_or_else(|| RegistryError::UnknownProperty {
                    class: class_name.to_string(),
                    property: name.clone(),
                })?;
            if matches!(property.kind, PropertyKind::Slot { .. }) {
                return Err(RegistryError::UnknownProperty {
                    class: class_name.to_string(),
                    property: name.clone(),
                });
            }
        }

        let factory = self
            .factories
            .get(class_name)
            .ok_or_else(|| RegistryError::UnresolvedClass(class_name.to_string()))?;

        Ok(factory(args))
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(|k| k.as_str())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}
