//! All-or-nothing sequences of sub-jobs.
//!
//! `execute` succeeds only if every sub-job succeeds; on a failed step
//! every completed sub-job is undone in reverse order before the single
//! aggregate failure is reported. Redo re-runs every sub-job's redo in
//! order.

use crate::job::{require_state, Job, JobError, JobState};
use easel_document::Document;
use tracing::warn;

pub struct CompositeJob {
    description: String,
    jobs: Vec<Box<dyn Job>>,
    state: JobState,
}

impl CompositeJob {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            jobs: Vec::new(),
            state: JobState::Created,
        }
    }

    pub fn with(mut self, job: Box<dyn Job>) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn push(&mut self, job: Box<dyn Job>) {
        self.jobs.push(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn aggregate(&self, step: usize, source: JobError) -> JobError {
        JobError::Composite {
            description: self.description.clone(),
            step,
            source: Box::new(source),
        }
    }
}

impl Job for CompositeJob {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn state(&self) -> JobState {
        self.state
    }

    /// Later sub-jobs may depend on earlier effects, so only the first
    /// one can be probed against the current tree
    fn is_executable(&self, doc: &Document) -> bool {
        match self.jobs.first() {
            Some(first) => first.is_executable(doc),
            None => false,
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Created, "composite job")?;
        if self.jobs.is_empty() {
            return Err(JobError::precondition("composite job has no sub-jobs"));
        }

        for i in 0..self.jobs.len() {
            if let Err(e) = self.jobs[i].execute(doc) {
                // Unwind completed sub-jobs in reverse order
                for j in (0..i).rev() {
                    if let Err(undo_err) = self.jobs[j].undo(doc) {
                        warn!(step = j, error = %undo_err, "composite unwind failed");
                        return Err(self.aggregate(j, undo_err));
                    }
                }
                return Err(self.aggregate(i, e));
            }
        }
        self.state = JobState::Executed;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Executed, "composite job")?;
        for i in (0..self.jobs.len()).rev() {
            self.jobs[i]
                .undo(doc)
                .map_err(|e| self.aggregate(i, e))?;
        }
        self.state = JobState::Undone;
        Ok(())
    }

    fn redo(&mut self, doc: &mut Document) -> Result<(), JobError> {
        require_state(self.state, JobState::Undone, "composite job")?;
        for i in 0..self.jobs.len() {
            self.jobs[i]
                .redo(doc)
                .map_err(|e| self.aggregate(i, e))?;
        }
        self.state = JobState::Executed;
        Ok(())
    }

    fn dispose(&mut self, doc: &mut Document) {
        for job in &mut self.jobs {
            job.dispose(doc);
        }
        self.state = JobState::Discarded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modify::SetPropertyJob;
    use crate::testutil::{doc_with_stack, label_in};
    use easel_registry::PropertyValue;

    #[test]
    fn test_empty_composite_is_rejected() {
        let (mut doc, _stack) = doc_with_stack();
        let mut job = CompositeJob::new("Nothing");
        assert!(job.execute(&mut doc).is_err());
    }

    #[test]
    fn test_all_sub_jobs_apply_in_order() {
        let (mut doc, stack) = doc_with_stack();
        let label = label_in(&mut doc, "a");
        doc.insert_child(stack, "children", label, 0).unwrap();

        let mut job = CompositeJob::new("Retitle")
            .with(Box::new(SetPropertyJob::new(
                label,
                "text",
                PropertyValue::string("first"),
            )))
            .with(Box::new(SetPropertyJob::new(
                label,
                "text",
                PropertyValue::string("second"),
            )));

        job.execute(&mut doc).unwrap();
        assert_eq!(
            doc.get_property(label, "text"),
            Some(PropertyValue::string("second"))
        );

        job.undo(&mut doc).unwrap();
        assert_eq!(
            doc.get_property(label, "text"),
            Some(PropertyValue::string("a"))
        );
    }
}
