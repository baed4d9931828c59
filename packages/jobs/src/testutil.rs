//! Shared fixtures for job tests

use easel_document::Document;
use easel_document::NodeId;
use easel_registry::{ClassMeta, PropertyMeta, PropertyValue, Registry, ValueKind};
use std::sync::Arc;

pub fn test_registry() -> Arc<Registry> {
    let mut registry = Registry::new();
    registry.register(
        ClassMeta::new("Label").with_property(
            PropertyMeta::value("text", ValueKind::String).with_default(PropertyValue::string("")),
        ),
    );
    registry.register(
        ClassMeta::new("Stack")
            .with_property(PropertyMeta::value("spacing", ValueKind::Number))
            .with_property(PropertyMeta::slot("children")),
    );
    registry.register(
        ClassMeta::new("Card")
            .with_property(PropertyMeta::value("title", ValueKind::String))
            .with_property(PropertyMeta::single_slot("header"))
            .with_property(PropertyMeta::slot("body")),
    );
    Arc::new(registry)
}

/// Fresh document with a root Stack
pub fn doc_with_stack() -> (Document, NodeId) {
    let mut doc = Document::new("/main.esl", test_registry());
    let stack = doc.create_instance("Stack", vec![]).unwrap();
    doc.set_root(stack).unwrap();
    (doc, stack)
}

/// Detached Label with the given text
pub fn label_in(doc: &mut Document, text: &str) -> NodeId {
    doc.create_instance(
        "Label",
        vec![("text".to_string(), PropertyValue::string(text))],
    )
    .unwrap()
}
