//! Drop resolution against a stubbed renderer: hit-testing, acceptance,
//! gap selection, and the preview/commit flow.

use easel_dnd::{
    Bounds, DragOrigin, DragSource, DropTargetResolver, GhostPreview, InsertPosition, LayoutAxis,
    LayoutProbe,
};
use easel_document::{Document, HierarchyMask, NodeId};
use easel_jobs::JobManager;
use easel_registry::{ClassMeta, PropertyMeta, PropertyValue, Registry, ValueKind};
use std::collections::HashMap;
use std::sync::Arc;

fn registry() -> Arc<Registry> {
    let mut registry = Registry::new();
    registry.register(
        ClassMeta::new("Label").with_property(PropertyMeta::value("text", ValueKind::String)),
    );
    registry.register(
        ClassMeta::new("Button")
            .with_property(PropertyMeta::value("text", ValueKind::String))
            .with_property(PropertyMeta::single_slot("graphic")),
    );
    registry.register(ClassMeta::new("Stack").with_property(PropertyMeta::slot("children")));
    registry.register(
        ClassMeta::new("Toolbar")
            .with_property(PropertyMeta::slot("items").accepting(&["Button", "Label"])),
    );
    registry.register(
        ClassMeta::new("Card")
            .with_property(PropertyMeta::value("title", ValueKind::String))
            .with_property(PropertyMeta::single_slot("header")),
    );
    Arc::new(registry)
}

/// Fixed geometry for the test canvas; `order` is hit-test priority,
/// topmost first
#[derive(Default)]
struct StubProbe {
    bounds: HashMap<NodeId, Bounds>,
    axes: HashMap<NodeId, LayoutAxis>,
    order: Vec<NodeId>,
}

impl StubProbe {
    fn place(&mut self, node: NodeId, bounds: Bounds) {
        self.bounds.insert(node, bounds);
        self.order.insert(0, node);
    }

    fn axis(&mut self, node: NodeId, axis: LayoutAxis) {
        self.axes.insert(node, axis);
    }
}

impl LayoutProbe for StubProbe {
    fn bounds_of(&self, node: NodeId) -> Option<Bounds> {
        self.bounds.get(&node).copied()
    }

    fn axis_of(&self, instance: NodeId) -> LayoutAxis {
        self.axes
            .get(&instance)
            .copied()
            .unwrap_or(LayoutAxis::Horizontal)
    }

    fn instance_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.order.iter().copied().find(|n| {
            self.bounds
                .get(n)
                .map(|b| b.contains(x, y))
                .unwrap_or(false)
        })
    }
}

/// Root stack holding three labels laid out in a row
fn row_fixture() -> (Document, NodeId, Vec<NodeId>, StubProbe) {
    let mut doc = Document::new("/main.esl", registry());
    let stack = doc.create_instance("Stack", vec![]).unwrap();
    doc.set_root(stack).unwrap();

    let mut probe = StubProbe::default();
    probe.place(stack, Bounds::new(0.0, 0.0, 100.0, 20.0));
    probe.axis(stack, LayoutAxis::Horizontal);

    let mut labels = Vec::new();
    for (i, span) in [(0.0, 10.0), (10.0, 15.0), (25.0, 15.0)].iter().enumerate() {
        let label = doc.create_instance("Label", vec![]).unwrap();
        doc.insert_child(stack, "children", label, i).unwrap();
        probe.place(label, Bounds::new(span.0, 0.0, span.1, 10.0));
        labels.push(label);
    }
    (doc, stack, labels, probe)
}

#[test]
fn resolves_gap_under_pointer() {
    let (mut doc, stack, _labels, probe) = row_fixture();
    let payload = doc.create_instance("Label", vec![]).unwrap();

    let resolver = DropTargetResolver::new(&doc, &probe);
    let source = DragSource::single(payload, DragOrigin::Library);

    let target = resolver.compute_drop_target(&source, 17.0, 5.0).unwrap();
    assert_eq!(target.parent, stack);
    assert_eq!(target.slot, "children");
    assert_eq!(target.position, InsertPosition::At(1));

    let target = resolver.compute_drop_target(&source, 90.0, 5.0).unwrap();
    assert_eq!(target.position, InsertPosition::Append);
}

#[test]
fn drop_job_inserts_detached_payload() {
    let (mut doc, stack, _labels, probe) = row_fixture();
    let payload = doc.create_instance("Label", vec![]).unwrap();

    let resolver = DropTargetResolver::new(&doc, &probe);
    let source = DragSource::single(payload, DragOrigin::Library);
    let target = resolver.compute_drop_target(&source, 17.0, 5.0).unwrap();
    let job = resolver.job_for(&target, &source).unwrap();
    drop(resolver);

    let mut manager = JobManager::new();
    manager.push(&mut doc, job).unwrap();

    let mask = HierarchyMask::new(&doc);
    assert_eq!(
        mask.index_of(payload),
        Some((stack, "children".to_string(), 1))
    );
}

#[test]
fn drop_job_moves_attached_payload() {
    let (mut doc, stack, labels, probe) = row_fixture();

    let resolver = DropTargetResolver::new(&doc, &probe);
    let source = DragSource::single(labels[0], DragOrigin::Document);
    let target = resolver.compute_drop_target(&source, 90.0, 5.0).unwrap();
    assert_eq!(target.position, InsertPosition::Append);
    let job = resolver.job_for(&target, &source).unwrap();
    drop(resolver);

    let mut manager = JobManager::new();
    manager.push(&mut doc, job).unwrap();

    let mask = HierarchyMask::new(&doc);
    // After the move the former first label sits last
    assert_eq!(
        mask.index_of(labels[0]),
        Some((stack, "children".to_string(), 2))
    );
}

#[test]
fn rejects_payload_the_slot_cannot_accept() {
    let mut doc = Document::new("/main.esl", registry());
    let toolbar = doc.create_instance("Toolbar", vec![]).unwrap();
    doc.set_root(toolbar).unwrap();

    let mut probe = StubProbe::default();
    probe.place(toolbar, Bounds::new(0.0, 0.0, 100.0, 20.0));

    let payload = doc.create_instance("Stack", vec![]).unwrap();
    let button = doc.create_instance("Button", vec![]).unwrap();

    // A Stack is not in the toolbar's accepted classes; nothing above the
    // toolbar can take it either, so the resolver reports no target
    let resolver = DropTargetResolver::new(&doc, &probe);
    let source = DragSource::single(payload, DragOrigin::Library);
    assert!(resolver.compute_drop_target(&source, 50.0, 10.0).is_none());

    // A Button is accepted
    let source = DragSource::single(button, DragOrigin::Library);
    let target = resolver.compute_drop_target(&source, 50.0, 10.0).unwrap();
    assert_eq!(target.parent, toolbar);
    assert_eq!(target.slot, "items");
}

#[test]
fn never_drops_a_node_into_itself() {
    let mut doc = Document::new("/main.esl", registry());
    let outer = doc.create_instance("Stack", vec![]).unwrap();
    doc.set_root(outer).unwrap();
    let inner = doc.create_instance("Stack", vec![]).unwrap();
    doc.insert_child(outer, "children", inner, 0).unwrap();

    let mut probe = StubProbe::default();
    probe.place(outer, Bounds::new(0.0, 0.0, 100.0, 100.0));
    probe.place(inner, Bounds::new(10.0, 10.0, 50.0, 50.0));

    let resolver = DropTargetResolver::new(&doc, &probe);
    // Dragging the root over its own descendant finds no legal parent
    let source = DragSource::single(outer, DragOrigin::Document);
    assert!(resolver.compute_drop_target(&source, 20.0, 20.0).is_none());
}

#[test]
fn occupied_single_slot_rejects_new_child_but_allows_reposition() {
    let mut doc = Document::new("/main.esl", registry());
    let card = doc.create_instance("Card", vec![]).unwrap();
    doc.set_root(card).unwrap();
    let occupant = doc.create_instance("Label", vec![]).unwrap();
    doc.insert_child(card, "header", occupant, 0).unwrap();

    let mut probe = StubProbe::default();
    probe.place(card, Bounds::new(0.0, 0.0, 100.0, 100.0));
    probe.place(occupant, Bounds::new(10.0, 10.0, 30.0, 10.0));

    let newcomer = doc.create_instance("Label", vec![]).unwrap();
    let resolver = DropTargetResolver::new(&doc, &probe);

    let source = DragSource::single(newcomer, DragOrigin::Library);
    assert!(resolver.compute_drop_target(&source, 50.0, 50.0).is_none());

    // The occupant itself may be re-dropped into its own slot
    let source = DragSource::single(occupant, DragOrigin::Document);
    assert!(resolver.compute_drop_target(&source, 50.0, 50.0).is_some());
}

#[test]
fn preview_applies_and_rolls_back_without_history() {
    let (mut doc, _stack, _labels, probe) = row_fixture();
    let payload = doc.create_instance("Label", vec![]).unwrap();
    let before = doc.snapshot();

    let source = DragSource::single(payload, DragOrigin::Library);
    let mut preview = GhostPreview::new();

    // Hover at one gap, then another: the ghost is cleared before each
    // new target is resolved against the settled tree
    for pointer in [5.0, 17.0, 90.0] {
        preview.hide(&mut doc).unwrap();
        let resolver = DropTargetResolver::new(&doc, &probe);
        let target = resolver.compute_drop_target(&source, pointer, 5.0).unwrap();
        let job = resolver.job_for(&target, &source).unwrap();
        drop(resolver);

        preview.show(&mut doc, job).unwrap();
        assert!(preview.is_showing());
        assert!(doc.is_attached(payload));
    }

    // Pointer leaves every legal target: the document is back to where
    // it started and nothing entered history
    preview.hide(&mut doc).unwrap();
    assert_eq!(doc.snapshot(), before);

    // The final drop is a fresh job pushed for real
    let resolver = DropTargetResolver::new(&doc, &probe);
    let target = resolver.compute_drop_target(&source, 17.0, 5.0).unwrap();
    let job = resolver.job_for(&target, &source).unwrap();
    drop(resolver);

    let mut manager = JobManager::new();
    manager.push(&mut doc, job).unwrap();
    assert!(manager.can_undo());
    assert!(doc.is_attached(payload));
}
