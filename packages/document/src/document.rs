//! # Document
//!
//! The in-memory tree being edited, mirrored by live objects.
//!
//! Nodes live in a flat arena keyed by `NodeId`; the tree shape is the id
//! links between them. A node is *attached* when it is reachable from the
//! document root and *detached* otherwise (freshly created, or mid-drag).
//! Every attached instance has exactly one live object whose configured
//! values can be re-derived by walking the instance's property nodes.
//!
//! ## Mutation discipline
//!
//! Every mutating operation validates before it writes: a returned error
//! means the tree is exactly as it was. Each successful mutation bumps the
//! revision counter and queues a `DocumentEvent`; events are drained with
//! [`Document::take_events`] after the edit completes, never mid-mutation.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::errors::DocumentError;
use crate::events::{DocumentChange, DocumentEvent};
use crate::ids::{document_id, IdGenerator};
use crate::node::{
    DetachedHandle, DetachedSlot, DocumentNode, InstanceNode, LiteralNode, NodeId, PropertyNode,
    ReferenceNode,
};
use easel_registry::{
    Cardinality, ConstructorArgs, LiveObject, PropertyValue, Registry, RegistryError,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Document {
    document_id: String,
    registry: Arc<Registry>,

    nodes: HashMap<NodeId, DocumentNode>,
    root: Option<NodeId>,

    /// Live-object mirror, one entry per constructed instance
    live: HashMap<NodeId, LiveObject>,

    /// Incremented on every structural or property mutation
    revision: u64,

    pending_events: Vec<DocumentEvent>,
    diagnostics: Vec<Diagnostic>,
    ids: IdGenerator,

    /// Edit lock taken by the command engine around execute/undo/redo
    editing: bool,
}

impl Document {
    pub fn new(path: &str, registry: Arc<Registry>) -> Self {
        Self {
            document_id: document_id(path),
            registry,
            nodes: HashMap::new(),
            root: None,
            live: HashMap::new(),
            revision: 0,
            pending_events: Vec::new(),
            diagnostics: Vec::new(),
            ids: IdGenerator::new(),
            editing: false,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DocumentNode> {
        self.nodes.get(&id)
    }

    pub fn live_object(&self, instance: NodeId) -> Option<&LiveObject> {
        self.live.get(&instance)
    }

    // ---- construction ---------------------------------------------------

    /// Construct a new, detached instance. Fails without touching the tree
    /// when the registry cannot construct the class or rejects a
    /// constructor-arg property name. Constructor args are mirrored as
    /// property nodes so the live values stay derivable from the tree.
    pub fn create_instance(
        &mut self,
        class_name: &str,
        args: ConstructorArgs,
    ) -> Result<NodeId, DocumentError> {
        let live = self.registry.construct(class_name, &args)?;

        let id = self.ids.next_id();
        self.nodes.insert(
            id,
            DocumentNode::Instance(InstanceNode {
                class_name: class_name.to_string(),
                assigned_id: None,
                properties: Vec::new(),
                parent: None,
            }),
        );
        self.live.insert(id, live);

        for (name, value) in args {
            self.write_value_child(id, &name, value)?;
        }

        debug!(instance = %id, class = class_name, "created instance");
        Ok(id)
    }

    /// Create a detached reference node pointing at an assigned id
    pub fn create_reference(&mut self, target: impl Into<String>) -> NodeId {
        let id = self.ids.next_id();
        self.nodes.insert(
            id,
            DocumentNode::Reference(ReferenceNode {
                target: target.into(),
                parent: None,
            }),
        );
        id
    }

    // ---- scalar properties ----------------------------------------------

    /// Replace a scalar property value and regenerate the live object's
    /// setter call. Slots are edited through [`Document::insert_child`] /
    /// [`Document::detach`] instead.
    pub fn set_property(
        &mut self,
        instance: NodeId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), DocumentError> {
        let class_name = self.instance(instance)?.class_name.clone();
        let meta = self.registry.property(&class_name, name)?;
        if meta.is_slot() {
            return Err(DocumentError::NotAValue {
                class: class_name,
                property: name.to_string(),
            });
        }

        self.write_value_child(instance, name, value.clone())?;
        if let Some(live) = self.live.get_mut(&instance) {
            live.set(name, value);
        }
        self.touch(DocumentChange::Property {
            instance,
            property: name.to_string(),
        });
        Ok(())
    }

    /// Remove a scalar property entirely; the exact inverse of a
    /// first-time `set_property`.
    pub fn clear_property(&mut self, instance: NodeId, name: &str) -> Result<(), DocumentError> {
        let class_name = self.instance(instance)?.class_name.clone();
        let meta = self.registry.property(&class_name, name)?;
        if meta.is_slot() {
            return Err(DocumentError::NotAValue {
                class: class_name,
                property: name.to_string(),
            });
        }

        if let Some(prop_id) = self.find_property(instance, name) {
            let children = self.property_node(prop_id)?.children.clone();
            for child in children {
                self.nodes.remove(&child);
            }
            self.nodes.remove(&prop_id);
            self.instance_mut(instance)?.properties.retain(|p| *p != prop_id);
        }
        if let Some(live) = self.live.get_mut(&instance) {
            live.clear(name);
        }
        self.touch(DocumentChange::Property {
            instance,
            property: name.to_string(),
        });
        Ok(())
    }

    /// Current scalar value as written in the tree
    pub fn get_property(&self, instance: NodeId, name: &str) -> Option<PropertyValue> {
        let prop_id = self.find_property(instance, name)?;
        let prop = self.nodes.get(&prop_id)?.as_property()?;
        let child = prop.children.first()?;
        match self.nodes.get(child)? {
            DocumentNode::Literal(literal) => Some(literal.value.clone()),
            DocumentNode::Reference(reference) => {
                Some(PropertyValue::Reference(reference.target.clone()))
            }
            _ => None,
        }
    }

    pub fn assigned_id(&self, instance: NodeId) -> Result<Option<String>, DocumentError> {
        Ok(self.instance(instance)?.assigned_id.clone())
    }

    /// Set or clear the markup-visible id; returns the previous one
    pub fn set_assigned_id(
        &mut self,
        instance: NodeId,
        id: Option<String>,
    ) -> Result<Option<String>, DocumentError> {
        let inst = self.instance_mut(instance)?;
        let previous = std::mem::replace(&mut inst.assigned_id, id);
        self.touch(DocumentChange::Property {
            instance,
            property: "id".to_string(),
        });
        Ok(previous)
    }

    // ---- structure ------------------------------------------------------

    /// All `insert_child` checks without the mutation; used by job
    /// preconditions and the drop resolver.
    pub fn can_insert_child(
        &self,
        parent: NodeId,
        slot: &str,
        child: NodeId,
        _index: usize,
    ) -> Result<(), DocumentError> {
        let class_name = self.instance(parent)?.class_name.clone();
        let meta = self.registry.property(&class_name, slot)?;
        if !meta.is_slot() {
            return Err(DocumentError::NotASlot {
                class: class_name,
                property: slot.to_string(),
            });
        }

        let child_node = self
            .nodes
            .get(&child)
            .ok_or(DocumentError::NodeNotFound(child))?;
        if matches!(child_node, DocumentNode::Property(_)) {
            return Err(DocumentError::NotAnInstance(child));
        }

        // The tree must stay acyclic: a node can never move under itself.
        // Checked before attachment so an ancestor always reports a cycle.
        if child == parent || self.is_ancestor(child, parent) {
            return Err(DocumentError::Cycle { child, parent });
        }

        if child_node.parent().is_some() || self.root == Some(child) {
            return Err(DocumentError::AlreadyAttached(child));
        }

        if meta.cardinality == Cardinality::Single {
            if let Some(prop_id) = self.find_property(parent, slot) {
                if !self.property_node(prop_id)?.children.is_empty() {
                    return Err(DocumentError::Cardinality {
                        class: class_name,
                        property: slot.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Insert a detached node into a slot. The index clamps to the current
    /// child count.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        slot: &str,
        child: NodeId,
        index: usize,
    ) -> Result<(), DocumentError> {
        self.can_insert_child(parent, slot, child, index)?;

        let prop_id = match self.find_property(parent, slot) {
            Some(prop_id) => prop_id,
            None => self.materialize_property(parent, slot)?,
        };
        {
            let prop = self.property_node_mut(prop_id)?;
            let at = index.min(prop.children.len());
            prop.children.insert(at, child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.set_parent(Some(prop_id));
        }
        self.ensure_live_subtree(child)?;
        self.touch(DocumentChange::Structure { parent });
        debug!(%parent, slot, %child, index, "inserted child");
        Ok(())
    }

    /// Remove a node from its parent without destroying it. The returned
    /// handle records the exact slot for later reattachment.
    pub fn detach(&mut self, node: NodeId) -> Result<DetachedHandle, DocumentError> {
        if self.root == Some(node) {
            self.root = None;
            self.touch(DocumentChange::Root);
            debug!(%node, "detached document root");
            return Ok(DetachedHandle {
                node,
                slot: DetachedSlot::Root,
            });
        }

        let parent_prop = self
            .nodes
            .get(&node)
            .ok_or(DocumentError::NodeNotFound(node))?
            .parent()
            .ok_or(DocumentError::NotAttached(node))?;

        let (owner, slot_name, index) = {
            let prop = self.property_node(parent_prop)?;
            let index = prop
                .children
                .iter()
                .position(|c| *c == node)
                .ok_or(DocumentError::NotAttached(node))?;
            (prop.owner, prop.name.clone(), index)
        };

        self.property_node_mut(parent_prop)?.children.remove(index);
        if let Some(doc_node) = self.nodes.get_mut(&node) {
            doc_node.set_parent(None);
        }

        // Slots with no children left are pruned; reattachment
        // re-materializes them at declaration-order position
        if self.property_node(parent_prop)?.children.is_empty() {
            self.nodes.remove(&parent_prop);
            self.instance_mut(owner)?.properties.retain(|p| *p != parent_prop);
        }

        self.touch(DocumentChange::Structure { parent: owner });
        debug!(%node, parent = %owner, slot = %slot_name, index, "detached node");
        Ok(DetachedHandle {
            node,
            slot: DetachedSlot::Property {
                parent: owner,
                slot: slot_name,
                index,
            },
        })
    }

    /// Put a detached node back into the slot recorded by `detach`
    pub fn reattach(&mut self, handle: DetachedHandle) -> Result<(), DocumentError> {
        match handle.slot {
            DetachedSlot::Root => self.set_root(handle.node),
            DetachedSlot::Property {
                parent,
                slot,
                index,
            } => self.insert_child(parent, &slot, handle.node, index),
        }
    }

    /// Attach a detached instance as the document root
    pub fn set_root(&mut self, node: NodeId) -> Result<(), DocumentError> {
        if self.root.is_some() {
            return Err(DocumentError::RootOccupied);
        }
        let doc_node = self
            .nodes
            .get(&node)
            .ok_or(DocumentError::NodeNotFound(node))?;
        if doc_node.as_instance().is_none() {
            return Err(DocumentError::NotAnInstance(node));
        }
        if doc_node.parent().is_some() {
            return Err(DocumentError::AlreadyAttached(node));
        }
        self.root = Some(node);
        self.ensure_live_subtree(node)?;
        self.touch(DocumentChange::Root);
        Ok(())
    }

    /// Free a detached subtree's arena entries and live objects. Only the
    /// command engine calls this, when a job reaches its terminal state.
    /// The attached tree is untouched, so no event is queued.
    pub fn discard_subtree(&mut self, node: NodeId) -> Result<(), DocumentError> {
        let doc_node = self
            .nodes
            .get(&node)
            .ok_or(DocumentError::NodeNotFound(node))?;
        if doc_node.parent().is_some() || self.root == Some(node) {
            return Err(DocumentError::AlreadyAttached(node));
        }
        for id in self.collect_subtree(node) {
            self.nodes.remove(&id);
            self.live.remove(&id);
        }
        debug!(%node, "discarded detached subtree");
        Ok(())
    }

    // ---- live mirror ----------------------------------------------------

    /// Re-synthesize the live object from scratch: fresh construction plus
    /// replay of every scalar assignment in declaration order. Used after
    /// bulk structural changes where incremental patching is unsafe.
    pub fn rebuild_live_object(&mut self, instance: NodeId) -> Result<(), DocumentError> {
        self.rebuild_live_internal(instance)?;
        self.touch(DocumentChange::Structure { parent: instance });
        Ok(())
    }

    fn rebuild_live_internal(&mut self, instance: NodeId) -> Result<(), DocumentError> {
        let class_name = self.instance(instance)?.class_name.clone();
        let mut live = self.registry.construct(&class_name, &Vec::new())?;

        let properties = self.instance(instance)?.properties.clone();
        for prop_id in properties {
            let (name, children) = {
                let prop = self.property_node(prop_id)?;
                (prop.name.clone(), prop.children.clone())
            };
            let is_slot = self
                .registry
                .property(&class_name, &name)
                .map(|m| m.is_slot())
                .unwrap_or(true);
            if is_slot {
                continue;
            }
            if let Some(child) = children.first() {
                let value = match self.nodes.get(child) {
                    Some(DocumentNode::Literal(literal)) => Some(literal.value.clone()),
                    Some(DocumentNode::Reference(reference)) => {
                        Some(PropertyValue::Reference(reference.target.clone()))
                    }
                    _ => None,
                };
                if let Some(value) = value {
                    live.set(name, value);
                }
            }
        }
        self.live.insert(instance, live);
        Ok(())
    }

    fn ensure_live_subtree(&mut self, node: NodeId) -> Result<(), DocumentError> {
        let missing: Vec<NodeId> = self
            .collect_subtree(node)
            .into_iter()
            .filter(|id| matches!(self.nodes.get(id), Some(DocumentNode::Instance(_))))
            .filter(|id| !self.live.contains_key(id))
            .collect();
        for id in missing {
            self.rebuild_live_internal(id)?;
        }
        Ok(())
    }

    // ---- queries --------------------------------------------------------

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if Some(current) == self.root {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.parent()) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// True when `ancestor` lies on `node`'s parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent());
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent());
        }
        false
    }

    /// All ancestor node ids, nearest first
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(&node).and_then(|n| n.parent());
        while let Some(id) = current {
            out.push(id);
            current = self.nodes.get(&id).and_then(|n| n.parent());
        }
        out
    }

    /// Nearest ancestor that is an instance
    pub fn parent_instance(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .into_iter()
            .find(|id| matches!(self.nodes.get(id), Some(DocumentNode::Instance(_))))
    }

    /// Attached instances in depth-first, property-declaration order
    pub fn attached_instances(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match self.nodes.get(&id) {
                Some(DocumentNode::Instance(inst)) => {
                    out.push(id);
                    for prop in inst.properties.iter().rev() {
                        stack.push(*prop);
                    }
                }
                Some(DocumentNode::Property(prop)) => {
                    for child in prop.children.iter().rev() {
                        stack.push(*child);
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Attached reference nodes in document order
    pub fn attached_references(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match self.nodes.get(&id) {
                Some(DocumentNode::Instance(inst)) => {
                    for prop in inst.properties.iter().rev() {
                        stack.push(*prop);
                    }
                }
                Some(DocumentNode::Property(prop)) => {
                    for child in prop.children.iter().rev() {
                        stack.push(*child);
                    }
                }
                Some(DocumentNode::Reference(_)) => out.push(id),
                _ => {}
            }
        }
        out
    }

    /// Resolve an assigned id against the attached tree. Absence is a
    /// plain `None`; many lookups run before the target exists.
    pub fn resolve_assigned_id(&self, target: &str) -> Option<NodeId> {
        self.attached_instances().into_iter().find(|id| {
            self.nodes
                .get(id)
                .and_then(|n| n.as_instance())
                .and_then(|i| i.assigned_id.as_deref())
                == Some(target)
        })
    }

    /// Recompute the non-fatal diagnostics for the attached tree
    pub fn refresh_diagnostics(&mut self) -> &[Diagnostic] {
        let mut found = Vec::new();
        for id in self.attached_references() {
            if let Some(DocumentNode::Reference(reference)) = self.nodes.get(&id) {
                if self.resolve_assigned_id(&reference.target).is_none() {
                    found.push(Diagnostic {
                        node: id,
                        kind: DiagnosticKind::UnresolvedReference {
                            target: reference.target.clone(),
                        },
                    });
                }
            }
        }
        self.diagnostics = found;
        &self.diagnostics
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Every node id in the subtree rooted at `node`, including `node`
    pub fn collect_subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            match self.nodes.get(&id) {
                Some(DocumentNode::Instance(inst)) => {
                    stack.extend(inst.properties.iter().copied());
                }
                Some(DocumentNode::Property(prop)) => {
                    stack.extend(prop.children.iter().copied());
                }
                _ => {}
            }
        }
        out
    }

    /// Property node holding `name` on an instance, if materialized
    pub fn find_property(&self, instance: NodeId, name: &str) -> Option<NodeId> {
        let inst = self.nodes.get(&instance)?.as_instance()?;
        inst.properties.iter().copied().find(|prop_id| {
            self.nodes
                .get(prop_id)
                .and_then(|n| n.as_property())
                .map(|p| p.name == name)
                .unwrap_or(false)
        })
    }

    // ---- events + edit lock ---------------------------------------------

    /// Drain queued change notifications; called after an edit completes
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Take the edit lock; false when an edit is already running
    pub fn try_begin_edit(&mut self) -> bool {
        if self.editing {
            false
        } else {
            self.editing = true;
            true
        }
    }

    pub fn end_edit(&mut self) {
        self.editing = false;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    // ---- internals ------------------------------------------------------

    pub(crate) fn instance(&self, id: NodeId) -> Result<&InstanceNode, DocumentError> {
        self.nodes
            .get(&id)
            .ok_or(DocumentError::NodeNotFound(id))?
            .as_instance()
            .ok_or(DocumentError::NotAnInstance(id))
    }

    fn instance_mut(&mut self, id: NodeId) -> Result<&mut InstanceNode, DocumentError> {
        match self.nodes.get_mut(&id) {
            Some(DocumentNode::Instance(inst)) => Ok(inst),
            Some(_) => Err(DocumentError::NotAnInstance(id)),
            None => Err(DocumentError::NodeNotFound(id)),
        }
    }

    pub(crate) fn property_node(&self, id: NodeId) -> Result<&PropertyNode, DocumentError> {
        self.nodes
            .get(&id)
            .ok_or(DocumentError::NodeNotFound(id))?
            .as_property()
            .ok_or(DocumentError::NotAProperty(id))
    }

    fn property_node_mut(&mut self, id: NodeId) -> Result<&mut PropertyNode, DocumentError> {
        match self.nodes.get_mut(&id) {
            Some(DocumentNode::Property(prop)) => Ok(prop),
            Some(_) => Err(DocumentError::NotAProperty(id)),
            None => Err(DocumentError::NodeNotFound(id)),
        }
    }

    /// Write a scalar child (literal or reference) under a property node,
    /// replacing any previous value. Callers validate the property kind.
    fn write_value_child(
        &mut self,
        instance: NodeId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), DocumentError> {
        let prop_id = match self.find_property(instance, name) {
            Some(prop_id) => prop_id,
            None => self.materialize_property(instance, name)?,
        };
        let old = self.property_node(prop_id)?.children.clone();
        for child in old {
            self.nodes.remove(&child);
        }

        let child_id = self.ids.next_id();
        let node = match value {
            PropertyValue::Reference(target) => DocumentNode::Reference(ReferenceNode {
                target,
                parent: Some(prop_id),
            }),
            other => DocumentNode::Literal(LiteralNode {
                value: other,
                parent: Some(prop_id),
            }),
        };
        self.nodes.insert(child_id, node);
        self.property_node_mut(prop_id)?.children = vec![child_id];
        Ok(())
    }

    /// Create the property node for `name`, inserted at its
    /// declaration-order position among the already-materialized ones
    fn materialize_property(&mut self, instance: NodeId, name: &str) -> Result<NodeId, DocumentError> {
        let class_name = self.instance(instance)?.class_name.clone();
        let (cardinality, decl_index) = {
            let meta = self.registry.property(&class_name, name)?;
            let class = self
                .registry
                .class(&class_name)
                .ok_or_else(|| RegistryError::UnresolvedClass(class_name.clone()))?;
            (
                meta.cardinality,
                class.property_index(name).unwrap_or(usize::MAX),
            )
        };

        let existing = self.instance(instance)?.properties.clone();
        let mut position = existing.len();
        for (i, prop_id) in existing.iter().enumerate() {
            let prop_name = self.property_node(*prop_id)?.name.clone();
            let idx = self
                .registry
                .class(&class_name)
                .and_then(|c| c.property_index(&prop_name))
                .unwrap_or(usize::MAX);
            if idx > decl_index {
                position = i;
                break;
            }
        }

        let id = self.ids.next_id();
        self.nodes.insert(
            id,
            DocumentNode::Property(PropertyNode {
                name: name.to_string(),
                cardinality,
                children: Vec::new(),
                owner: instance,
            }),
        );
        self.instance_mut(instance)?.properties.insert(position, id);
        Ok(id)
    }

    fn touch(&mut self, change: DocumentChange) {
        self.revision += 1;
        self.pending_events.push(DocumentEvent {
            revision: self.revision,
            change,
        });
    }
}
