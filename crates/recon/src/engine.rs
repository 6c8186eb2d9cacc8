use std::collections::HashSet;

use parkmatch_core::{Dataset, MatchStatus};

/// Classifies every record of both datasets against the opposite dataset.
///
/// Single pass, deterministic, pure: each record is normalized and keyed,
/// both aggregate key-sets are built in full, and only then is membership
/// tested. A record matches when *any* key in its tolerance window appears
/// in the opposite set — existence of a compatible counterpart, not a
/// unique pairing. Overlapping windows of near-simultaneous entries with
/// the same plate can therefore all report Matched; multiplicities are
/// deliberately not reconciled.
pub fn reconcile(
    mut dataset_a: Dataset,
    mut dataset_b: Dataset,
    tolerance_minutes: i64,
) -> (Dataset, Dataset) {
    let kind_a = dataset_a.kind;
    let kind_b = dataset_b.kind;
    for record in &mut dataset_a.records {
        record.derive_keys(kind_a, tolerance_minutes);
    }
    for record in &mut dataset_b.records {
        record.derive_keys(kind_b, tolerance_minutes);
    }

    let keyset_a = collect_keys(&dataset_a);
    let keyset_b = collect_keys(&dataset_b);

    classify(&mut dataset_a, &keyset_b);
    classify(&mut dataset_b, &keyset_a);

    (dataset_a, dataset_b)
}

/// Union of every tolerance-window key reachable from the dataset.
fn collect_keys(dataset: &Dataset) -> HashSet<String> {
    dataset
        .records
        .iter()
        .flat_map(|r| r.keys.window.iter().cloned())
        .collect()
}

fn classify(dataset: &mut Dataset, opposite_keys: &HashSet<String>) {
    for record in &mut dataset.records {
        let status = if record.keys.is_empty() {
            MatchStatus::Unmatched
        } else if record.keys.window.iter().any(|k| opposite_keys.contains(k)) {
            MatchStatus::Matched
        } else {
            MatchStatus::Unmatched
        };
        record.status = Some(status);
    }
}
