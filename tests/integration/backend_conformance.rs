use statecheck::backend::{
    Capabilities, InmemClient, InmemState, LocalState, ReadOnly, RemoteState, SledClient,
};
use statecheck::harness::{ConformanceHarness, HarnessOptions, Step, StepOutcome};
use statecheck::state::Difference;
use statecheck::types::module_path;
use statecheck::{
    assert_conformance, initial_state, run_conformance_test, ConformanceError, ModuleState,
    StateReader, StateRefresher, StateWriter, StatePersister,
};
use tempfile::TempDir;

use crate::integration::support::{write_initial_state_file, LossyWriter};

fn final_reference() -> statecheck::StateSnapshot {
    let mut expected = initial_state();
    expected.add_module(ModuleState::new(module_path(&["root"])).with_output("bar", "baz"));
    expected
}

#[test]
fn local_state_passes_full_scenario() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("terraform.tfstate");
    write_initial_state_file(&path);

    let mut backend = LocalState::new(&path);
    let report = assert_conformance(&mut backend);

    assert!(report.all_passed());
    assert!(report.final_state.content_eq(&final_reference()));
    assert_eq!(report.final_state.modules[0].path, module_path(&["root", "child"]));
    assert_eq!(report.final_state.modules[1].path, module_path(&["root"]));

    // a fresh instance observes what the run persisted
    let mut other = LocalState::new(&path);
    other.refresh_state().unwrap();
    assert!(other.state().content_eq(&final_reference()));
}

#[test]
fn local_state_with_seed_and_no_file_passes() {
    let temp = TempDir::new().unwrap();
    let mut backend =
        LocalState::with_state(temp.path().join("state.json"), initial_state()).unwrap();
    assert_conformance(&mut backend);
}

#[test]
fn inmem_remote_state_passes_full_scenario() {
    let client = InmemClient::new();
    let mut seeder = RemoteState::new(client.clone());
    seeder.write_state(&initial_state()).unwrap();
    seeder.persist_state().unwrap();

    let mut backend = RemoteState::new(client.clone());
    let report = assert_conformance(&mut backend);
    assert!(report.all_passed());

    seeder.refresh_state().unwrap();
    assert!(seeder.state().content_eq(&final_reference()));
}

#[test]
fn sled_remote_state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("db");
    {
        let client = SledClient::open(&db_path, "state", "default").unwrap();
        let mut seeder = RemoteState::new(client);
        seeder.write_state(&initial_state()).unwrap();
        seeder.persist_state().unwrap();

        let mut backend = RemoteState::new(seeder.client().clone());
        assert_conformance(&mut backend);
    }

    let client = SledClient::open(&db_path, "state", "default").unwrap();
    let mut reopened = RemoteState::new(client);
    reopened.refresh_state().unwrap();
    assert!(reopened.state().content_eq(&final_reference()));
}

#[test]
fn reader_only_backend_skips_write_and_persist() {
    let mut backend = ReadOnly::new(InmemState::with_state(initial_state()).unwrap());
    let report = run_conformance_test(&mut backend).unwrap();

    assert_eq!(report.outcome(Step::InitialState), Some(StepOutcome::Passed));
    assert_eq!(report.outcome(Step::WriteVisibility), Some(StepOutcome::Skipped));
    assert_eq!(report.outcome(Step::PersistRoundTrip), Some(StepOutcome::Skipped));
    assert!(report.final_state.content_eq(&initial_state()));
}

#[test]
fn read_only_view_of_local_state_never_touches_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    let mut backend = ReadOnly::new(LocalState::with_state(&path, initial_state()).unwrap());

    let caps = Capabilities::detect(&mut backend);
    assert!(caps.read && !caps.refresh && !caps.persist);
    run_conformance_test(&mut backend).unwrap();
    assert!(!path.exists());
}

#[test]
fn lossy_writer_is_reported_with_missing_key() {
    let mut backend = LossyWriter::seeded("bar");
    let err = run_conformance_test(&mut backend).unwrap_err();

    match &err {
        ConformanceError::ContractViolation {
            step,
            diff,
            actual,
            ..
        } => {
            assert_eq!(*step, Step::WriteVisibility);
            assert!(diff.iter().any(|d| matches!(
                d,
                Difference::MissingOutput { key, .. } if key == "bar"
            )));
            assert!(actual.module(&module_path(&["root"])).unwrap().outputs.is_empty());
        }
        other => panic!("expected a contract violation, got {}", other),
    }
}

#[test]
fn unseeded_local_state_fails_initial_check() {
    let temp = TempDir::new().unwrap();
    let mut backend = LocalState::new(temp.path().join("missing.json"));
    let err = run_conformance_test(&mut backend).unwrap_err();
    assert_eq!(err.step(), Some(Step::InitialState));
}

#[test]
fn corrupt_state_file_fails_initial_refresh() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    std::fs::write(&path, r#"{"version": 1, "modules": [}"#).unwrap();

    let mut backend = LocalState::new(&path);
    let err = run_conformance_test(&mut backend).unwrap_err();
    assert!(matches!(
        err,
        ConformanceError::Backend {
            step: Step::InitialRefresh,
            ..
        }
    ));
}

#[test]
fn strict_serial_passes_for_local_state() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    write_initial_state_file(&path);

    let harness = ConformanceHarness::new(HarnessOptions {
        strict_serial: true,
    });
    let report = harness.run(&mut LocalState::new(&path)).unwrap();
    assert_eq!(report.final_state.serial, 1);
}

#[test]
fn boxed_backends_are_backends() {
    let mut backend: Box<dyn statecheck::StateBackend> =
        Box::new(InmemState::with_state(initial_state()).unwrap());
    assert_conformance(&mut backend);
}
