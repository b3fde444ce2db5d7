//! Result of a passing conformance run.

use super::Step;
use crate::backend::{BackendProfile, Capabilities};
use crate::state::StateSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Passed,
    /// The capability the step needs is not provided by the backend
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub capabilities: Capabilities,
    pub profile: BackendProfile,
    pub steps: Vec<StepRecord>,
    /// State read from the backend after the last step
    pub final_state: StateSnapshot,
}

impl ConformanceReport {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            profile: capabilities.profile(),
            steps: Vec::with_capacity(Step::ALL.len()),
            final_state: StateSnapshot::new(),
        }
    }

    pub fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepRecord { step, outcome });
    }

    pub fn outcome(&self, step: Step) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| record.outcome)
    }

    pub fn passed(&self) -> usize {
        self.count(StepOutcome::Passed)
    }

    pub fn skipped(&self) -> usize {
        self.count(StepOutcome::Skipped)
    }

    /// Every step ran and passed, i.e. the backend provides all capabilities.
    pub fn all_passed(&self) -> bool {
        self.steps.len() == Step::ALL.len() && self.skipped() == 0
    }

    fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|r| r.outcome == outcome).count()
    }
}
