//! Conformance Harness
//!
//! Runs one fixed scenario against any backend value and checks that the
//! capabilities it provides honor their contracts:
//!
//! 1. the subject must be a reader,
//! 2. refresh once if it can,
//! 3. the state matches the initial reference,
//! 4. a write is immediately and exactly visible (writers only),
//! 5. persist, then refresh if possible, preserves content (persisters only).
//!
//! Capabilities the subject lacks are skipped. The first failure aborts the
//! run. The serial is excluded from every comparison by normalizing it before
//! the diff.

pub mod report;

pub use report::{ConformanceReport, StepOutcome};

use crate::backend::{Capabilities, StateBackend};
use crate::error::{ConformanceError, StateError};
use crate::state::{ModuleState, SnapshotDiff, StateSnapshot};
use crate::types::module_path;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info};

/// Steps of the conformance scenario, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    InitialRefresh,
    InitialState,
    WriteVisibility,
    PersistRoundTrip,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::InitialRefresh,
        Step::InitialState,
        Step::WriteVisibility,
        Step::PersistRoundTrip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::InitialRefresh => "initial refresh",
            Step::InitialState => "initial state",
            Step::WriteVisibility => "write visibility",
            Step::PersistRoundTrip => "persist round trip",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Harness options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessOptions {
    /// Require the serial observed after persist/refresh to be no lower than
    /// the one observed at the initial state check.
    #[serde(default)]
    pub strict_serial: bool,
}

/// The fixed initial reference: one module `root.child` with `foo = bar`.
pub fn initial_state() -> StateSnapshot {
    let mut state = StateSnapshot::new();
    state.add_module(ModuleState::new(module_path(&["root", "child"])).with_output("foo", "bar"));
    state
}

/// Module appended by the write-visibility step.
fn written_module() -> ModuleState {
    ModuleState::new(module_path(&["root"])).with_output("bar", "baz")
}

#[derive(Debug, Clone, Default)]
pub struct ConformanceHarness {
    options: HarnessOptions,
}

impl ConformanceHarness {
    pub fn new(options: HarnessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    pub fn run<B: StateBackend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<ConformanceReport, ConformanceError> {
        let capabilities = Capabilities::detect(backend);
        let profile = capabilities.profile();
        if !capabilities.read {
            error!(?profile, "subject is not a state reader");
            return Err(ConformanceError::Setup);
        }
        info!(?profile, %capabilities, "starting conformance run");
        let mut report = ConformanceReport::new(capabilities);

        // Initial refresh
        match backend.as_refresher() {
            Some(refresher) => {
                refresher
                    .refresh_state()
                    .map_err(|e| backend_failure(Step::InitialRefresh, e))?;
                pass(&mut report, Step::InitialRefresh);
            }
            None => skip(&mut report, Step::InitialRefresh),
        }

        // Initial state; adopt the subject's serial on the reference
        let mut current = initial_state();
        let observed = read(&*backend)?;
        current.serial = observed.serial;
        let initial_serial = observed.serial;
        assert_matches(Step::InitialState, &current, &observed)?;
        pass(&mut report, Step::InitialState);

        // Write visibility
        match backend.as_writer() {
            Some(writer) => {
                current.add_module(written_module());
                writer
                    .write_state(&current)
                    .map_err(|e| backend_failure(Step::WriteVisibility, e))?;
                let actual = read(&*backend)?;
                assert_matches(Step::WriteVisibility, &current, &actual)?;
                pass(&mut report, Step::WriteVisibility);
            }
            None => skip(&mut report, Step::WriteVisibility),
        }

        // Persist round trip
        match backend.as_persister() {
            Some(persister) => {
                persister
                    .persist_state()
                    .map_err(|e| backend_failure(Step::PersistRoundTrip, e))?;
                if let Some(refresher) = backend.as_refresher() {
                    refresher
                        .refresh_state()
                        .map_err(|e| backend_failure(Step::PersistRoundTrip, e))?;
                }
                let actual = read(&*backend)?;
                if self.options.strict_serial && actual.serial < initial_serial {
                    error!(
                        before = initial_serial,
                        after = actual.serial,
                        "serial regressed"
                    );
                    return Err(ConformanceError::SerialRegressed {
                        step: Step::PersistRoundTrip,
                        before: initial_serial,
                        after: actual.serial,
                    });
                }
                assert_matches(Step::PersistRoundTrip, &current, &actual)?;
                pass(&mut report, Step::PersistRoundTrip);
            }
            None => skip(&mut report, Step::PersistRoundTrip),
        }

        report.final_state = read(&*backend)?;
        info!(
            passed = report.passed(),
            skipped = report.skipped(),
            serial = report.final_state.serial,
            "conformance run passed"
        );
        Ok(report)
    }
}

/// Run the conformance scenario with default options.
pub fn run_conformance_test<B: StateBackend + ?Sized>(
    backend: &mut B,
) -> Result<ConformanceReport, ConformanceError> {
    ConformanceHarness::default().run(backend)
}

/// Run the conformance scenario and panic with the full failure message.
///
/// Meant to be called directly from a `#[test]` function.
pub fn assert_conformance<B: StateBackend + ?Sized>(backend: &mut B) -> ConformanceReport {
    match run_conformance_test(backend) {
        Ok(report) => report,
        Err(e) => panic!("state backend failed conformance: {}", e),
    }
}

fn read<B: StateBackend + ?Sized>(backend: &B) -> Result<StateSnapshot, ConformanceError> {
    backend
        .as_reader()
        .map(|reader| reader.state())
        .ok_or(ConformanceError::Setup)
}

/// Normalize the actual serial to the expected one, then diff.
fn assert_matches(
    step: Step,
    expected: &StateSnapshot,
    actual: &StateSnapshot,
) -> Result<(), ConformanceError> {
    let normalized = actual.normalized(expected.serial);
    let diff = SnapshotDiff::between(expected, &normalized);
    if diff.is_empty() {
        return Ok(());
    }
    error!(%step, differences = diff.len(), "contract violation\n{}", diff);
    Err(ConformanceError::ContractViolation {
        step,
        expected: expected.clone(),
        actual: actual.clone(),
        diff,
    })
}

fn backend_failure(step: Step, source: StateError) -> ConformanceError {
    error!(%step, error = %source, "backend operation failed");
    ConformanceError::Backend { step, source }
}

fn pass(report: &mut ConformanceReport, step: Step) {
    info!(%step, "step passed");
    report.record(step, StepOutcome::Passed);
}

fn skip(report: &mut ConformanceReport, step: Step) {
    debug!(%step, "step skipped, capability not provided");
    report.record(step, StepOutcome::Skipped);
}
