//! Visitor pattern for traversing the document tree immutably
//!
//! Walk order is depth-first in property declaration order, the order a
//! markup serializer writes. Default implementations walk the entire
//! tree; override specific visit_* methods to act on nodes.

use crate::document::Document;
use crate::node::{DocumentNode, InstanceNode, LiteralNode, NodeId, PropertyNode, ReferenceNode};

pub trait Visitor: Sized {
    fn visit_instance(&mut self, doc: &Document, id: NodeId, instance: &InstanceNode) {
        let _ = id;
        walk_instance(self, doc, instance);
    }

    fn visit_property(&mut self, doc: &Document, id: NodeId, property: &PropertyNode) {
        let _ = id;
        walk_property(self, doc, property);
    }

    fn visit_reference(&mut self, _doc: &Document, _id: NodeId, _reference: &ReferenceNode) {
        // Leaf node, no children to walk
    }

    fn visit_literal(&mut self, _doc: &Document, _id: NodeId, _literal: &LiteralNode) {
        // Leaf node, no children to walk
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    if let Some(root) = doc.root() {
        walk_node(visitor, doc, root);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, doc: &Document, id: NodeId) {
    match doc.node(id) {
        Some(DocumentNode::Instance(instance)) => visitor.visit_instance(doc, id, instance),
        Some(DocumentNode::Property(property)) => visitor.visit_property(doc, id, property),
        Some(DocumentNode::Reference(reference)) => visitor.visit_reference(doc, id, reference),
        Some(DocumentNode::Literal(literal)) => visitor.visit_literal(doc, id, literal),
        None => {}
    }
}

pub fn walk_instance<V: Visitor>(visitor: &mut V, doc: &Document, instance: &InstanceNode) {
    for prop_id in &instance.properties {
        walk_node(visitor, doc, *prop_id);
    }
}

pub fn walk_property<V: Visitor>(visitor: &mut V, doc: &Document, property: &PropertyNode) {
    for child in &property.children {
        walk_node(visitor, doc, *child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_registry::{ClassMeta, PropertyMeta, PropertyValue, Registry, ValueKind};
    use std::sync::Arc;

    struct Collector {
        seen: Vec<String>,
    }

    impl Visitor for Collector {
        fn visit_instance(&mut self, doc: &Document, _id: NodeId, instance: &InstanceNode) {
            self.seen.push(format!("instance:{}", instance.class_name));
            walk_instance(self, doc, instance);
        }

        fn visit_property(&mut self, doc: &Document, _id: NodeId, property: &PropertyNode) {
            self.seen.push(format!("property:{}", property.name));
            walk_property(self, doc, property);
        }

        fn visit_literal(&mut self, _doc: &Document, _id: NodeId, literal: &LiteralNode) {
            self.seen.push(format!("literal:{:?}", literal.value));
        }
    }

    #[test]
    fn test_walk_is_depth_first_in_declaration_order() {
        let mut registry = Registry::new();
        registry.register(
            ClassMeta::new("Label").with_property(PropertyMeta::value("text", ValueKind::String)),
        );
        registry.register(
            ClassMeta::new("Card")
                .with_property(PropertyMeta::value("title", ValueKind::String))
                .with_property(PropertyMeta::slot("body")),
        );
        let mut doc = Document::new("/main.esl", Arc::new(registry));

        let card = doc.create_instance("Card", vec![]).unwrap();
        doc.set_root(card).unwrap();
        let label = doc.create_instance("Label", vec![]).unwrap();
        // Insert the child first, then the title: the walk must still
        // visit title before body
        doc.insert_child(card, "body", label, 0).unwrap();
        doc.set_property(card, "title", PropertyValue::string("News"))
            .unwrap();

        let mut collector = Collector { seen: Vec::new() };
        walk_document(&mut collector, &doc);

        assert_eq!(
            collector.seen,
            vec![
                "instance:Card".to_string(),
                "property:title".to_string(),
                "literal:String(\"News\")".to_string(),
                "property:body".to_string(),
                "instance:Label".to_string(),
            ]
        );
    }
}
