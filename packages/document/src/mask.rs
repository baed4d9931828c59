//! # Hierarchy mask
//!
//! Read-only query façade over one document, answering hierarchy
//! questions without exposing the node kinds behind them: which slot do
//! drops land in, how many sub-components sit under a slot, where does a
//! child sit. Queries run while hovering during a drag, so a missing slot
//! or a non-instance node answers with an empty result, never an error.

use crate::document::Document;
use crate::node::NodeId;

pub struct HierarchyMask<'a> {
    doc: &'a Document,
}

impl<'a> HierarchyMask<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    /// The slot drop gestures target by default: first slot in the
    /// class's declaration order that accepts child instances
    pub fn main_slot(&self, instance: NodeId) -> Option<&'a str> {
        let inst = self.doc.node(instance)?.as_instance()?;
        let meta = self.doc.registry().class(&inst.class_name)?;
        meta.main_slot().map(|p| p.name.as_str())
    }

    /// Declared slots of an instance, in declaration order
    pub fn slots(&self, instance: NodeId) -> Vec<&'a str> {
        let Some(inst) = self.doc.node(instance).and_then(|n| n.as_instance()) else {
            return Vec::new();
        };
        let Some(meta) = self.doc.registry().class(&inst.class_name) else {
            return Vec::new();
        };
        meta.properties
            .iter()
            .filter(|p| p.is_slot())
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Child node ids under a slot, in the order the renderer shows them
    pub fn children(&self, instance: NodeId, slot: &str) -> Vec<NodeId> {
        self.doc
            .find_property(instance, slot)
            .and_then(|prop_id| self.doc.node(prop_id))
            .and_then(|node| node.as_property())
            .map(|prop| prop.children.clone())
            .unwrap_or_default()
    }

    /// Number of sub-components under a slot. With `include_detached`
    /// false, only children reachable from the document root count, so a
    /// detached subtree reports zero.
    pub fn sub_component_count(
        &self,
        instance: NodeId,
        slot: &str,
        include_detached: bool,
    ) -> usize {
        if !include_detached && !self.doc.is_attached(instance) {
            return 0;
        }
        self.children(instance, slot).len()
    }

    pub fn sub_component_at(
        &self,
        instance: NodeId,
        slot: &str,
        index: usize,
        include_detached: bool,
    ) -> Option<NodeId> {
        if !include_detached && !self.doc.is_attached(instance) {
            return None;
        }
        self.children(instance, slot).get(index).copied()
    }

    /// Where a child sits: (parent instance, slot name, index)
    pub fn index_of(&self, child: NodeId) -> Option<(NodeId, String, usize)> {
        let prop_id = self.doc.node(child)?.parent()?;
        let prop = self.doc.node(prop_id)?.as_property()?;
        let index = prop.children.iter().position(|c| *c == child)?;
        Some((prop.owner, prop.name.clone(), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_registry::{ClassMeta, PropertyMeta, PropertyValue, Registry, ValueKind};
    use std::sync::Arc;

    fn test_registry() -> Arc<Registry> {
        let mut registry = Registry::new();
        registry.register(
            ClassMeta::new("Label")
                .with_property(PropertyMeta::value("text", ValueKind::String)),
        );
        registry.register(
            ClassMeta::new("Card")
                .with_property(PropertyMeta::value("title", ValueKind::String))
                .with_property(PropertyMeta::single_slot("header"))
                .with_property(PropertyMeta::slot("body")),
        );
        Arc::new(registry)
    }

    #[test]
    fn test_main_slot_first_declared_wins() {
        let mut doc = Document::new("/main.esl", test_registry());
        let card = doc.create_instance("Card", vec![]).unwrap();

        let mask = HierarchyMask::new(&doc);
        assert_eq!(mask.main_slot(card), Some("header"));
        assert_eq!(mask.slots(card), vec!["header", "body"]);
    }

    #[test]
    fn test_missing_slot_answers_empty() {
        let mut doc = Document::new("/main.esl", test_registry());
        let label = doc.create_instance("Label", vec![]).unwrap();

        let mask = HierarchyMask::new(&doc);
        assert_eq!(mask.main_slot(label), None);
        assert_eq!(mask.sub_component_count(label, "body", true), 0);
        assert_eq!(mask.sub_component_at(label, "body", 0, true), None);
    }

    #[test]
    fn test_counts_respect_attachment() {
        let mut doc = Document::new("/main.esl", test_registry());
        let card = doc.create_instance("Card", vec![]).unwrap();
        let label = doc.create_instance("Label", vec![]).unwrap();
        doc.insert_child(card, "body", label, 0).unwrap();

        // card itself is detached: visible only when detached nodes count
        let mask = HierarchyMask::new(&doc);
        assert_eq!(mask.sub_component_count(card, "body", true), 1);
        assert_eq!(mask.sub_component_count(card, "body", false), 0);
    }

    #[test]
    fn test_index_of_matches_insertion_order() {
        let mut doc = Document::new("/main.esl", test_registry());
        let card = doc.create_instance("Card", vec![]).unwrap();
        doc.set_root(card).unwrap();
        let a = doc.create_instance("Label", vec![]).unwrap();
        let b = doc.create_instance("Label", vec![]).unwrap();
        doc.insert_child(card, "body", a, 0).unwrap();
        doc.insert_child(card, "body", b, 1).unwrap();
        doc.set_property(a, "text", PropertyValue::string("first"))
            .unwrap();

        let mask = HierarchyMask::new(&doc);
        assert_eq!(mask.index_of(b), Some((card, "body".to_string(), 1)));
        assert_eq!(mask.sub_component_at(card, "body", 0, false), Some(a));
    }
}
