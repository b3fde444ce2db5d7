use proptest::prelude::*;
use statecheck::backend::{InmemClient, InmemState, LocalState, RemoteState};
use statecheck::{ModuleState, StatePersister, StateReader, StateRefresher, StateSnapshot, StateWriter};
use std::collections::HashSet;
use tempfile::TempDir;

fn arb_valid_snapshot() -> impl Strategy<Value = StateSnapshot> {
    let module = (
        prop::collection::vec("[a-z][a-z0-9_]{0,5}", 1..4),
        prop::collection::btree_map("[a-z_]{1,6}", ".{0,8}", 0..4),
    )
        .prop_map(|(path, outputs)| ModuleState { path, outputs });

    (any::<u64>(), prop::collection::vec(module, 0..5)).prop_map(|(serial, modules)| {
        let mut seen = HashSet::new();
        StateSnapshot {
            serial,
            modules: modules
                .into_iter()
                .filter(|m| seen.insert(m.path.clone()))
                .collect(),
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn write_is_visible_to_next_read(state in arb_valid_snapshot()) {
        let mut backend = InmemState::new();
        backend.write_state(&state).unwrap();
        prop_assert!(backend.state().content_eq(&state));
    }

    #[test]
    fn local_round_trip_preserves_content(state in arb_valid_snapshot()) {
        let temp = TempDir::new().unwrap();
        let mut backend = LocalState::new(temp.path().join("state.json"));

        backend.write_state(&state).unwrap();
        backend.persist_state().unwrap();
        backend.refresh_state().unwrap();
        prop_assert!(backend.state().content_eq(&state));
    }

    #[test]
    fn remote_round_trip_preserves_content_across_instances(
        first in arb_valid_snapshot(),
        second in arb_valid_snapshot(),
    ) {
        let client = InmemClient::new();
        let mut writer = RemoteState::new(client.clone());
        writer.write_state(&first).unwrap();
        writer.persist_state().unwrap();
        let first_serial = {
            let mut reader = RemoteState::new(client.clone());
            reader.refresh_state().unwrap();
            prop_assert!(reader.state().content_eq(&first));
            reader.state().serial
        };

        writer.write_state(&second).unwrap();
        writer.persist_state().unwrap();
        let mut reader = RemoteState::new(client);
        reader.refresh_state().unwrap();
        prop_assert!(reader.state().content_eq(&second));
        prop_assert!(reader.state().serial > first_serial);
    }
}
