//! Scalar edits: property values and assigned ids.
//!
//! Both jobs capture the previous value at execute time; undo writes it
//! back (or clears the property when there was none). Redo re-applies the
//! new value through the execute path.

use crate::job::{require_state, Job, JobError, JobState};
use easel_document::{Document, NodeId};
use easel_registry::PropertyValue;

pub struct SetPropertyJob {
    instance: NodeId,
    property: String,
    value: PropertyValue,

    /// Outer None until execute captures; inner None means the property
    /// was unset before
    previous: Option<Option<PropertyValue>>,
    state: JobState,
}

impl SetPropertyJob {
    pub fn new(instance: NodeId, property: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            instance,
            property: property.into(),
            value,
            previous: None,
            state: JobState::Created,
        }
    }
}

impl Job for SetPropertyJob {
    fn description(&self) -> String {
        format!("Set '{}'", self.property)
    }

    fn state(&self) -> JobState {
        self.state
    }

    fn is_executable(&self, doc: &Document) -> bool {
        let Some(instance) = doc.node(self.instance).and_then(|n| n.as_instance()) else {
            return false;
        };
        doc.registry()
            .property(&instance.class_name, &self.property)
            .map(|meta| !meta.is_slot())
            .unwrap_or(false)
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "set-property job")?;
        let previous = doc.get_property(self.instance, &self.property);
        doc.set_property(self.instance, &self.property, self.value.clone())?;
        self.previous = Some(previous);
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "set-property job")?;
        match self.previous.clone() {
            Some(Some(value)) => doc.set_property(self.instance, &self.property, value)?,
            Some(None) => doc.clear_property(self.instance, &self.property)?,
            None => {
                return Err(JobError::precondition(
                    "set-property job captured no prior value",
                ))
            }
        }
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "set-property job")?;
        doc.set_property(self.instance, &self.property, self.value.clone())?;
        self.state = JobState::Executed;
        Ok(())
    }
}

pub struct SetAssignedIdJob {
    instance: NodeId,
    id: Option<String>,
    previous: Option<Option<String>>,
    state: JobState,
}

impl SetAssignedIdJob {
    pub fn new(instance: NodeId, id: Option<String>) -> Self {
        Self {
            instance,
            id,
            previous: None,
            state: JobState::Created,
        }
    }
}

impl Job for SetAssignedIdJob {
    fn description(&self) -> String {
        match &self.id {
            Some(id) => format!("Set id '{}'", id),
            None => "Clear id".to_string(),
        }
    }

    fn state(&self) -> JobState {
        self.state
    }

    fn is_executable(&self, doc: &Document) -> bool {
        doc.node(self.instance)
            .map(|n| n.as_instance().is_some())
            .unwrap_or(false)
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "set-id job")?;
        let previous = doc.set_assigned_id(self.instance, self.id.clone())?;
        self.previous = Some(previous);
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "set-id job")?;
        let previous = self
            .previous
            .clone()
            .ok_or_else(|| JobError::precondition("set-id job captured no prior value"))?;
        doc.set_assigned_id(self.instance, previous)?;
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "set-id job")?;
        doc.set_assigned_id(self.instance, self.id.clone())?;
        self.state = JobState::Executed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{doc_with_stack, label_in};

    #[test]
    fn test_set_property_round_trip() {
        let (mut doc, stack) = doc_with_stack();
        let label = label_in(&mut doc, "old");
        doc.insert_child(stack, "children", label, 0).unwrap();

        let mut job = SetPropertyJob::new(label, "text", PropertyValue::string("new"));
        job.execute(&mut doc).unwrap();
        assert_eq!(
            doc.get_property(label, "text"),
            Some(PropertyValue::string("new"))
        );

        job.undo(&mut doc).unwrap();
        assert_eq!(
            doc.get_property(label, "text"),
            Some(PropertyValue::string("old"))
        );

        job.redo(&mut doc).unwrap();
        assert_eq!(
            doc.get_property(label, "text"),
            Some(PropertyValue::string("new"))
        );
    }

    #[test]
    fn test_undo_of_first_set_clears_property() {
        let (mut doc, stack) = doc_with_stack();

        let mut job = SetPropertyJob::new(stack, "spacing", PropertyValue::Number(12.0));
        job.execute(&mut doc).unwrap();
        job.undo(&mut doc).unwrap();

        assert_eq!(doc.get_property(stack, "spacing"), None);
        assert!(doc.live_object(stack).unwrap().get("spacing").is_none());
    }

    #[test]
    fn test_unknown_property_leaves_tree_unchanged() {
        let (mut doc, stack) = doc_with_stack();
        let before = doc.snapshot();
        let revision = doc.revision();

        let mut job = SetPropertyJob::new(stack, "padding", PropertyValue::Number(4.0));
        assert!(!job.is_executable(&doc));
        assert!(job.execute(&mut doc).is_err());
        assert_eq!(doc.snapshot(), before);
        assert_eq!(doc.revision(), revision);
    }

    #[test]
    fn test_assigned_id_round_trip() {
        let (mut doc, stack) = doc_with_stack();
        let label = label_in(&mut doc, "a");
        doc.insert_child(stack, "children", label, 0).unwrap();

        let mut job = SetAssignedIdJob::new(label, Some("hero".to_string()));
        job.execute(&mut doc).unwrap();
        assert_eq!(doc.resolve_assigned_id("hero"), Some(label));

        job.undo(&mut doc).unwrap();
        assert_eq!(doc.resolve_assigned_id("hero"), None);
    }
}
