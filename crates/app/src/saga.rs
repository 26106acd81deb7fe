//! Step records for writes that span more than one backend service.

use std::fmt;

/// Outcome of one step within a multi-step write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Failed(String),
    Skipped(String),
}

/// One named step of a [`SagaReport`], in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaStep {
    pub name: &'static str,
    pub outcome: StepOutcome,
}

/// Record of a write that touches two independently owned services.
///
/// There is no compensation between the services: a completed first step
/// followed by a failed later step leaves them disagreeing. Callers inspect
/// [`SagaReport::is_split_brain`] to detect that state and schedule repair
/// instead of treating the whole operation as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaReport {
    label: &'static str,
    steps: Vec<SagaStep>,
}

impl SagaReport {
    #[must_use]
    pub fn begin(label: &'static str) -> Self {
        Self {
            label,
            steps: Vec::new(),
        }
    }

    pub fn completed(&mut self, step: &'static str) {
        self.steps.push(SagaStep {
            name: step,
            outcome: StepOutcome::Completed,
        });
    }

    pub fn failed(&mut self, step: &'static str, message: impl Into<String>) {
        self.steps.push(SagaStep {
            name: step,
            outcome: StepOutcome::Failed(message.into()),
        });
    }

    pub fn skipped(&mut self, step: &'static str, reason: impl Into<String>) {
        self.steps.push(SagaStep {
            name: step,
            outcome: StepOutcome::Skipped(reason.into()),
        });
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn steps(&self) -> &[SagaStep] {
        &self.steps
    }

    pub fn all_completed(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.outcome == StepOutcome::Completed)
    }

    /// True when the leading step landed but a later one failed, leaving the
    /// services involved with different views of the write.
    pub fn is_split_brain(&self) -> bool {
        let mut steps = self.steps.iter();

        let Some(first) = steps.next() else {
            return false;
        };

        first.outcome == StepOutcome::Completed
            && steps.any(|step| matches!(step.outcome, StepOutcome::Failed(_)))
    }
}

impl fmt::Display for SagaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.label)?;

        for step in &self.steps {
            match &step.outcome {
                StepOutcome::Completed => write!(f, " {}=ok", step.name)?,
                StepOutcome::Failed(message) => write!(f, " {}=failed ({message})", step.name)?,
                StepOutcome::Skipped(reason) => write!(f, " {}=skipped ({reason})", step.name)?,
            }
        }

        Ok(())
    }
}
