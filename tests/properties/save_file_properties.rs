use proptest::prelude::*;
use tempfile::tempdir;

use slipday::roster::{PersonRecord, RosterState};
use slipday::storage;

fn state_strategy() -> impl Strategy<Value = RosterState> {
    prop::collection::btree_map(
        1000u32..2000,
        (any::<bool>(), 0u32..10, "[a-zA-Z ,.\"é]{0,30}", any::<bool>(), 0u32..40),
        0..10,
    )
    .prop_map(|people| {
        let mut state = RosterState {
            last_csv_name: "export.csv".to_string(),
            ..RosterState::default()
        };
        for (id, (tracked, used, notes, dropped, attended)) in people {
            let key = format!("id:{id}");
            let record = PersonRecord {
                tracked,
                used,
                notes: notes.trim().to_string(),
                dropped,
                attendance_confirmed: attended,
                earned: attended / 5,
                ..PersonRecord::new(key.clone(), format!("Person {id}"), id.to_string())
            };
            state.roster_keys_in_order.push(key.clone());
            state.records.insert(key, record);
        }
        state
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_save_then_load_is_identity(state in state_strategy()) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.txt");
        storage::save(&path, &state).unwrap();
        let loaded = storage::load(&path).unwrap().unwrap();
        prop_assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_is_byte_stable(state in state_strategy()) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.txt");
        storage::save(&path, &state).unwrap();
        let first = std::fs::read(&path).unwrap();
        let reloaded = storage::load(&path).unwrap().unwrap();
        storage::save(&path, &reloaded).unwrap();
        prop_assert_eq!(first, std::fs::read(&path).unwrap());
    }
}
