//! # Selection model
//!
//! Tracks the selected subset of one document and the navigation between
//! siblings. Nodes that are not attached to the document are silently
//! dropped from every request: selecting mid-drag payloads or stale ids
//! is an expected no-op, not an error.
//!
//! Sibling navigation deliberately does **not** wrap: stepping past the
//! last sibling keeps the current selection and reports false.

use crate::group::SelectionGroup;
use easel_document::{Document, HierarchyMask, NodeId};
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct SelectionModel {
    group: SelectionGroup,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self {
            group: SelectionGroup::empty(),
        }
    }

    pub fn group(&self) -> &SelectionGroup {
        &self.group
    }

    /// Replace the selection. Unattached nodes are dropped; the hit node
    /// falls back to the first attached node in the given order.
    pub fn select(
        &mut self,
        doc: &Document,
        nodes: &[NodeId],
        hit: Option<NodeId>,
    ) -> &SelectionGroup {
        let attached: BTreeSet<NodeId> = nodes
            .iter()
            .copied()
            .filter(|n| doc.is_attached(*n))
            .collect();
        let hit = hit
            .filter(|h| attached.contains(h))
            .or_else(|| nodes.iter().copied().find(|n| attached.contains(n)));
        let ancestor = common_ancestor(doc, &attached);
        self.group = SelectionGroup::new(attached, hit, ancestor);
        &self.group
    }

    pub fn clear(&mut self) -> &SelectionGroup {
        self.group = SelectionGroup::empty();
        &self.group
    }

    /// Symmetric difference with the current members: toggled nodes leave
    /// if present and join if not
    pub fn toggle(&mut self, doc: &Document, nodes: &[NodeId]) -> &SelectionGroup {
        let mut members: BTreeSet<NodeId> = self.group.nodes().collect();
        let mut last_added = None;
        for node in nodes.iter().copied().filter(|n| doc.is_attached(*n)) {
            if members.contains(&node) {
                members.remove(&node);
            } else {
                members.insert(node);
                last_added = Some(node);
            }
        }
        let members: Vec<NodeId> = members.into_iter().collect();
        let hit = last_added
            .or(self.group.hit_node().filter(|h| members.contains(h)))
            .or_else(|| members.first().copied());
        self.select(doc, &members, hit)
    }

    /// Select the next sibling in child order. Defined only when every
    /// member shares one parent slot; at the last sibling the selection
    /// stays put and false is returned.
    pub fn select_next(&mut self, doc: &Document) -> bool {
        let Some((_, _, children)) = self.sibling_context(doc) else {
            return false;
        };
        let Some(max) = self.member_positions(&children).into_iter().max() else {
            return false;
        };
        if max + 1 >= children.len() {
            return false;
        }
        let next = children[max + 1];
        self.select(doc, &[next], Some(next));
        true
    }

    /// Select the previous sibling in child order; no wrap-around
    pub fn select_previous(&mut self, doc: &Document) -> bool {
        let Some((_, _, children)) = self.sibling_context(doc) else {
            return false;
        };
        let Some(min) = self.member_positions(&children).into_iter().min() else {
            return false;
        };
        if min == 0 {
            return false;
        }
        let previous = children[min - 1];
        self.select(doc, &[previous], Some(previous));
        true
    }

    /// Select every sibling of the hit node; with an empty selection, all
    /// children of the root's main slot
    pub fn select_all(&mut self, doc: &Document) -> &SelectionGroup {
        if let Some((_, _, children)) = self.sibling_context(doc) {
            let hit = self.group.hit_node();
            return self.select(doc, &children, hit);
        }
        let mask = HierarchyMask::new(doc);
        let children: Vec<NodeId> = doc
            .root()
            .and_then(|root| mask.main_slot(root).map(|slot| mask.children(root, slot)))
            .unwrap_or_default();
        self.select(doc, &children, children.first().copied())
    }

    /// Drop members that are no longer attached; the repair entry point
    /// run after every edit
    pub fn retain_attached(&mut self, doc: &Document) -> &SelectionGroup {
        let members: Vec<NodeId> = self.group.nodes().filter(|n| doc.is_attached(*n)).collect();
        let hit = self.group.hit_node().filter(|h| members.contains(h));
        self.select(doc, &members, hit)
    }

    /// Drop specific members without consulting the document; used by
    /// jobs mid-edit, when the tree is not to be re-walked. The common
    /// ancestor is conservatively reset until the next full recompute.
    pub fn remove_members(&mut self, nodes: &[NodeId]) {
        let members: BTreeSet<NodeId> = self
            .group
            .nodes()
            .filter(|n| !nodes.contains(n))
            .collect();
        let hit = self
            .group
            .hit_node()
            .filter(|h| members.contains(h))
            .or_else(|| members.iter().next().copied());
        self.group = SelectionGroup::new(members, hit, None);
    }

    fn member_positions(&self, children: &[NodeId]) -> Vec<usize> {
        self.group
            .nodes()
            .filter_map(|n| children.iter().position(|c| *c == n))
            .collect()
    }

    /// The shared (parent, slot, children) of all members, when they are
    /// siblings
    fn sibling_context(&self, doc: &Document) -> Option<(NodeId, String, Vec<NodeId>)> {
        let mask = HierarchyMask::new(doc);
        let mut members = self.group.nodes();
        let first = members.next()?;
        let (parent, slot, _) = mask.index_of(first)?;
        for node in members {
            let (p, s, _) = mask.index_of(node)?;
            if p != parent || s != slot {
                return None;
            }
        }
        let children = mask.children(parent, &slot);
        Some((parent, slot, children))
    }
}

/// Nearest instance that is an ancestor of every node in the set; None
/// for an empty set (the whole document) and for the root itself
fn common_ancestor(doc: &Document, nodes: &BTreeSet<NodeId>) -> Option<NodeId> {
    let mut members = nodes.iter();
    let first = members.next()?;

    // Root-first ancestor path, shrunk to the shared prefix
    let mut path: Vec<NodeId> = doc.ancestors(*first);
    path.reverse();
    for node in members {
        let mut other: Vec<NodeId> = doc.ancestors(*node);
        other.reverse();
        let shared = path
            .iter()
            .zip(other.iter())
            .take_while(|(a, b)| a == b)
            .count();
        path.truncate(shared);
    }

    path.into_iter()
        .rev()
        .find(|id| doc.node(*id).map(|n| n.as_instance().is_some()).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_document::{ClassMeta, PropertyMeta, PropertyValue, Registry, ValueKind};
    use std::sync::Arc;

    fn registry() -> Arc<Registry> {
        let mut registry = Registry::new();
        registry.register(
            ClassMeta::new("Label").with_property(PropertyMeta::value("text", ValueKind::String)),
        );
        registry.register(ClassMeta::new("Stack").with_property(PropertyMeta::slot("children")));
        Arc::new(registry)
    }

    /// Root stack with three labels
    fn fixture() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new("/main.esl", registry());
        let stack = doc.create_instance("Stack", vec![]).unwrap();
        doc.set_root(stack).unwrap();
        let mut labels = Vec::new();
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            let label = doc
                .create_instance(
                    "Label",
                    vec![("text".to_string(), PropertyValue::string(*text))],
                )
                .unwrap();
            doc.insert_child(stack, "children", label, i).unwrap();
            labels.push(label);
        }
        (doc, stack, labels)
    }

    #[test]
    fn test_unattached_nodes_are_silently_dropped() {
        let (mut doc, _stack, labels) = fixture();
        let loose = doc.create_instance("Label", vec![]).unwrap();

        let mut model = SelectionModel::new();
        let group = model.select(&doc, &[labels[0], loose], None);

        assert_eq!(group.len(), 1);
        assert!(group.contains(labels[0]));
        assert_eq!(group.hit_node(), Some(labels[0]));
    }

    #[test]
    fn test_common_ancestor_of_siblings_is_parent() {
        let (doc, stack, labels) = fixture();
        let mut model = SelectionModel::new();
        let group = model.select(&doc, &[labels[0], labels[2]], None);
        assert_eq!(group.common_ancestor(), Some(stack));
    }

    #[test]
    fn test_root_selection_means_whole_document() {
        let (doc, stack, _labels) = fixture();
        let mut model = SelectionModel::new();
        let group = model.select(&doc, &[stack], None);
        assert_eq!(group.common_ancestor(), None);
    }

    #[test]
    fn test_nested_common_ancestor() {
        let (mut doc, stack, labels) = fixture();
        let inner = doc.create_instance("Stack", vec![]).unwrap();
        doc.insert_child(stack, "children", inner, 3).unwrap();
        let deep = doc.create_instance("Label", vec![]).unwrap();
        doc.insert_child(inner, "children", deep, 0).unwrap();

        let mut model = SelectionModel::new();
        // A top-level label and a nested one share only the root stack
        let group = model.select(&doc, &[labels[0], deep], None);
        assert_eq!(group.common_ancestor(), Some(stack));
    }

    #[test]
    fn test_toggle_is_symmetric_difference() {
        let (doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[0], labels[1]], None);

        let group = model.toggle(&doc, &[labels[1], labels[2]]);
        assert!(group.contains(labels[0]));
        assert!(!group.contains(labels[1]));
        assert!(group.contains(labels[2]));
        assert_eq!(group.hit_node(), Some(labels[2]));
    }

    #[test]
    fn test_next_walks_siblings_in_order() {
        let (doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[0]], None);

        assert!(model.select_next(&doc));
        assert!(model.group().contains(labels[1]));
        assert!(model.select_next(&doc));
        assert!(model.group().contains(labels[2]));
    }

    #[test]
    fn test_next_stops_at_last_sibling() {
        let (doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[2]], None);

        // No wrap-around: the selection stays on the last sibling
        assert!(!model.select_next(&doc));
        assert!(model.group().contains(labels[2]));
        assert_eq!(model.group().len(), 1);
    }

    #[test]
    fn test_previous_stops_at_first_sibling() {
        let (doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[0]], None);

        assert!(!model.select_previous(&doc));
        assert!(model.group().contains(labels[0]));
    }

    #[test]
    fn test_navigation_undefined_across_parents() {
        let (mut doc, stack, labels) = fixture();
        let inner = doc.create_instance("Stack", vec![]).unwrap();
        doc.insert_child(stack, "children", inner, 3).unwrap();
        let deep = doc.create_instance("Label", vec![]).unwrap();
        doc.insert_child(inner, "children", deep, 0).unwrap();

        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[0], deep], None);
        assert!(!model.select_next(&doc));
        assert!(!model.select_previous(&doc));
    }

    #[test]
    fn test_select_all_expands_to_siblings() {
        let (doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[1]], None);

        let group = model.select_all(&doc);
        assert_eq!(group.len(), 3);
        assert_eq!(group.hit_node(), Some(labels[1]));
    }

    #[test]
    fn test_select_all_from_empty_takes_root_children() {
        let (doc, _stack, _labels) = fixture();
        let mut model = SelectionModel::new();
        let group = model.select_all(&doc);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_retain_attached_drops_detached_members() {
        let (mut doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[0], labels[1]], Some(labels[1]));

        doc.detach(labels[1]).unwrap();
        let group = model.retain_attached(&doc);

        assert_eq!(group.len(), 1);
        assert!(group.contains(labels[0]));
        assert_eq!(group.hit_node(), Some(labels[0]));
    }

    #[test]
    fn test_remove_members_without_document() {
        let (doc, _stack, labels) = fixture();
        let mut model = SelectionModel::new();
        model.select(&doc, &[labels[0], labels[1]], Some(labels[1]));

        model.remove_members(&[labels[1]]);
        assert_eq!(model.group().len(), 1);
        assert_eq!(model.group().hit_node(), Some(labels[0]));
    }
}
