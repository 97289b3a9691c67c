mod filters;

use crate::scc::{SccConfig, TarjanScc};
use crate::storage::{Decomposition, StateBlock, StateSet};

/// Run the decomposition to completion, collecting all blocks.
pub fn collect_sccs(config: SccConfig<'_, f64>, subsystem: &StateSet) -> Decomposition<StateBlock> {
    TarjanScc::configure(config, subsystem)
        .computation::<Decomposition<StateBlock>>()
        .compute()
        .unwrap()
}

/// Verify that the found components match the expected components exactly,
/// ignoring the (deterministic but irrelevant) block order.
pub fn verify_sccs(found: &Decomposition<StateBlock>, expected: &[&[usize]]) {
    let mut found_sets: Vec<Vec<usize>> = found
        .iter()
        .map(|block| block.iter().collect::<Vec<usize>>())
        .collect();
    let mut expected_sets: Vec<Vec<usize>> = expected
        .iter()
        .map(|block| {
            let mut sorted = block.to_vec();
            sorted.sort_unstable();
            sorted
        })
        .collect();

    found_sets.sort_by_cached_key(|s| (s.len(), s.clone()));
    expected_sets.sort_by_cached_key(|s| (s.len(), s.clone()));

    assert_eq!(
        found_sets.len(),
        expected_sets.len(),
        "Expected {} components, but found {}: {:?}",
        expected_sets.len(),
        found_sets.len(),
        found_sets
    );
    for (i, (found, expected)) in found_sets.iter().zip(expected_sets.iter()).enumerate() {
        assert_eq!(
            found, expected,
            "Component {} mismatch: expected {:?}, found {:?}",
            i, expected, found
        );
    }
}
