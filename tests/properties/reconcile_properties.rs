use std::collections::BTreeSet;

use proptest::prelude::*;

use slipday::roster::{Extractor, Snapshot, reconcile};

const HEADER: &str = "Student,SIS User ID,1-10 (1),1-12 (2),1-17 (3),1-19 (4),1-24 (5),1-26 (6)";

/// `(last, first, id, attended)` rows; ids unique when present.
fn people() -> impl Strategy<Value = Vec<(String, String, Option<u32>, usize)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["Doe", "Roe", "Able", "Baker", "Cole"]),
            prop::sample::select(vec!["Jane", "Rick", "Ann", "Ben"]),
            prop::option::of(1000u32..1100),
            0usize..=6,
        ),
        0..12,
    )
    .prop_map(|rows| {
        let mut seen = BTreeSet::new();
        rows.into_iter()
            .map(|(last, first, id, attended)| {
                let id = id.filter(|id| seen.insert(*id));
                (last.to_string(), first.to_string(), id, attended)
            })
            .collect()
    })
}

fn csv_for(rows: &[(String, String, Option<u32>, usize)]) -> String {
    let mut csv = format!("{HEADER}\n");
    for (last, first, id, attended) in rows {
        let id = id.map(|id| id.to_string()).unwrap_or_default();
        let cells: Vec<&str> = (0..6).map(|day| if day < *attended { "1" } else { "0" }).collect();
        csv.push_str(&format!("\"{last}, {first}\",{id},{}\n", cells.join(",")));
    }
    csv
}

fn extract(csv: &str) -> Snapshot {
    Extractor::default()
        .extract_reader(csv.as_bytes(), "export.csv")
        .unwrap()
}

proptest! {
    #[test]
    fn test_row_order_does_not_change_identity(
        rows in people(),
        seed in any::<u64>(),
    ) {
        // id-less duplicates are numbered by row order, so only permute id rows
        // relative to each other and keep id-less rows in place
        let mut shuffled = rows.clone();
        let id_rows: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].2.is_some()).collect();
        if id_rows.len() > 1 {
            let rotate = usize::try_from(seed % id_rows.len() as u64).unwrap();
            for (offset, &slot) in id_rows.iter().enumerate() {
                shuffled[slot] = rows[id_rows[(offset + rotate) % id_rows.len()]].clone();
            }
        }

        let a = extract(&csv_for(&rows));
        let b = extract(&csv_for(&shuffled));
        prop_assert_eq!(a.keys_in_order, b.keys_in_order);
        prop_assert_eq!(a.confirmed, b.confirmed);
    }

    #[test]
    fn test_reconcile_is_idempotent(rows in people(), pick in any::<u64>()) {
        let snapshot = extract(&csv_for(&rows));
        let selection: BTreeSet<String> = snapshot
            .keys_in_order
            .iter()
            .enumerate()
            .filter(|(idx, _)| (pick >> (idx % 64)) & 1 == 1)
            .map(|(_, key)| key.clone())
            .collect();

        let first = reconcile(&snapshot, None, Some(&selection), 5);
        let second = reconcile(&snapshot, Some(&first), None, 5);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.tracked_keys(), selection);
    }

    #[test]
    fn test_used_is_clamped_when_attendance_drops(
        rows in people(),
        prior_used in prop::collection::vec(0u32..4, 12),
        lost in prop::collection::vec(0usize..=6, 12),
    ) {
        let before = extract(&csv_for(&rows));
        let mut prior = reconcile(&before, None, None, 1);
        for (key, used) in before.keys_in_order.iter().zip(&prior_used) {
            if let Some(record) = prior.get_mut(key) {
                record.used = (*used).min(record.earned);
            }
        }

        let shrunk: Vec<_> = rows
            .iter()
            .zip(&lost)
            .map(|((last, first, id, attended), lost)| {
                (last.clone(), first.clone(), *id, attended.saturating_sub(*lost))
            })
            .collect();
        let after = extract(&csv_for(&shrunk));
        let state = reconcile(&after, Some(&prior), None, 1);

        for (key, record) in &state.records {
            prop_assert!(record.used <= record.earned);
            let carried = prior.get(key).map_or(0, |p| p.used);
            prop_assert_eq!(record.used, carried.min(record.earned));
        }
    }

    #[test]
    fn test_every_snapshot_key_has_one_record(rows in people()) {
        let snapshot = extract(&csv_for(&rows));
        let state = reconcile(&snapshot, None, None, 5);
        prop_assert_eq!(&state.roster_keys_in_order, &snapshot.keys_in_order);
        let keys: BTreeSet<&String> = state.records.keys().collect();
        let in_order: BTreeSet<&String> = snapshot.keys_in_order.iter().collect();
        prop_assert_eq!(keys, in_order);
        for record in state.records.values() {
            prop_assert_eq!(record.earned, record.attendance_confirmed / 5);
        }
    }
}
