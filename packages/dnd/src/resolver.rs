//! # Drop-target resolution
//!
//! Given a pointer position and a drag payload, work out where a drop
//! would land: the target parent, the slot, and the insertion gap. The
//! resolver only reads: it returns a computed [`DropTarget`] plus, on
//! request, an uncommitted job the caller runs through the job manager.
//! When nothing under the pointer accepts the payload the answer is
//! `None`, never a guess.
//!
//! Geometry comes in through [`LayoutProbe`], the capability the renderer
//! adapter implements: hit-testing, per-node bounds, layout axis. Child
//! order in the document is the rendered order, so gap indices computed
//! from probe bounds line up with tree indices.

use crate::geometry::{insert_position, Bounds, InsertPosition, LayoutAxis};
use crate::payload::DragSource;
use easel_document::{Document, DocumentNode, HierarchyMask, NodeId};
use easel_jobs::{CompositeJob, InsertJob, Job, MoveJob};
use easel_registry::{Cardinality, PropertyKind};
use tracing::debug;

/// Geometry supplied by the renderer adapter
pub trait LayoutProbe {
    /// Bounding box of a rendered node, in shared canvas coordinates
    fn bounds_of(&self, node: NodeId) -> Option<Bounds>;

    /// Axis the instance lays its children out along
    fn axis_of(&self, instance: NodeId) -> LayoutAxis;

    /// Topmost attached instance under the pointer
    fn instance_at(&self, x: f64, y: f64) -> Option<NodeId>;
}

/// A computed drop location; never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub parent: NodeId,
    pub slot: String,
    pub position: InsertPosition,
}

pub struct DropTargetResolver<'a> {
    doc: &'a Document,
    probe: &'a dyn LayoutProbe,
}

impl<'a> DropTargetResolver<'a> {
    pub fn new(doc: &'a Document, probe: &'a dyn LayoutProbe) -> Self {
        Self { doc, probe }
    }

    /// Resolve the drop location under the pointer, walking candidate
    /// parents upward from the hit instance until one accepts the
    /// payload. Fails closed: no accepting candidate means no target.
    pub fn compute_drop_target(
        &self,
        source: &DragSource,
        x: f64,
        y: f64,
    ) -> Option<DropTarget> {
        if source.is_empty() {
            return None;
        }
        let mut candidate = self.probe.instance_at(x, y);
        while let Some(instance) = candidate {
            if let Some(target) = self.try_target(instance, source, x, y) {
                debug!(parent = %target.parent, slot = %target.slot, "resolved drop target");
                return Some(target);
            }
            candidate = self.doc.parent_instance(instance);
        }
        None
    }

    fn try_target(
        &self,
        instance: NodeId,
        source: &DragSource,
        x: f64,
        y: f64,
    ) -> Option<DropTarget> {
        let mask = HierarchyMask::new(self.doc);
        let slot = mask.main_slot(instance)?;
        if !self.accept_drag_source(instance, slot, source) {
            return None;
        }

        let children = mask.children(instance, slot);
        let axis = self.probe.axis_of(instance);
        let mut bounds: Vec<Bounds> = Vec::with_capacity(children.len());
        for child in &children {
            match self.probe.bounds_of(*child) {
                Some(b) => bounds.push(b),
                // A child the renderer has no box for breaks the gap
                // math; fall back to appending
                None => {
                    return Some(DropTarget {
                        parent: instance,
                        slot: slot.to_string(),
                        position: InsertPosition::Append,
                    })
                }
            }
        }

        let pointer = match axis {
            LayoutAxis::Horizontal => x,
            LayoutAxis::Vertical => y,
        };
        Some(DropTarget {
            parent: instance,
            slot: slot.to_string(),
            position: insert_position(&bounds, axis, pointer),
        })
    }

    /// Whether a slot accepts the payload: cardinality (dragged nodes
    /// already in the slot don't count against it), ancestry, and the
    /// slot's class constraints.
    pub fn accept_drag_source(&self, target: NodeId, slot: &str, source: &DragSource) -> bool {
        if source.is_empty() {
            return false;
        }
        let Some(instance) = self.doc.node(target).and_then(|n| n.as_instance()) else {
            return false;
        };
        let Ok(meta) = self.doc.registry().property(&instance.class_name, slot) else {
            return false;
        };
        let PropertyKind::Slot { accepts } = &meta.kind else {
            return false;
        };

        if meta.cardinality == Cardinality::Single {
            let mask = HierarchyMask::new(self.doc);
            let occupied = mask
                .children(target, slot)
                .iter()
                .filter(|child| !source.nodes.contains(child))
                .count();
            if occupied + source.nodes.len() > 1 {
                return false;
            }
        }

        for node in &source.nodes {
            // A node can never land under itself
            if *node == target || self.doc.is_ancestor(*node, target) {
                return false;
            }
            match self.doc.node(*node) {
                Some(DocumentNode::Instance(dragged)) => {
                    if !accepts.allows(&dragged.class_name) {
                        return false;
                    }
                }
                // References resolve to instances; class checks happen
                // against the resolved target, which may not exist yet
                Some(DocumentNode::Reference(_)) => {}
                _ => return false,
            }
        }
        true
    }

    /// Build the uncommitted job performing the drop: moves for attached
    /// payloads, inserts for detached ones, a composite for multi-node
    /// drags. The caller pushes it through the job manager.
    pub fn job_for(&self, target: &DropTarget, source: &DragSource) -> Option<Box<dyn Job>> {
        let mask = HierarchyMask::new(self.doc);
        let base = target
            .position
            .resolve(mask.children(target.parent, &target.slot).len());

        let mut jobs: Vec<Box<dyn Job>> = Vec::new();
        for (offset, node) in source.nodes.iter().enumerate() {
            let job: Box<dyn Job> = if self.doc.is_attached(*node) {
                Box::new(MoveJob::new(
                    *node,
                    target.parent,
                    target.slot.clone(),
                    base + offset,
                ))
            } else {
                Box::new(InsertJob::new(
                    target.parent,
                    target.slot.clone(),
                    *node,
                    base + offset,
                ))
            };
            jobs.push(job);
        }

        match jobs.len() {
            0 => None,
            1 => jobs.pop(),
            n => {
                let mut composite = CompositeJob::new(format!("Drop {} objects", n));
                for job in jobs {
                    composite.push(job);
                }
                Some(Box::new(composite))
            }
        }
    }
}
