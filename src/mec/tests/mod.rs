mod scenarios;

use crate::mec::{MecConfig, MecDecomposition};
use crate::storage::{Decomposition, MaximalEndComponent, StateSet};

/// Run the decomposition to completion, collecting all end components.
pub fn collect_mecs(
    config: MecConfig<'_, f64>,
    subsystem: &StateSet,
) -> Decomposition<MaximalEndComponent> {
    MecDecomposition::configure(config, subsystem)
        .computation::<Decomposition<MaximalEndComponent>>()
        .compute()
        .unwrap()
}

/// Normalize a decomposition into a sorted list of `(state, choices)` lists
/// for order-insensitive comparison.
pub fn normalize(
    decomposition: &Decomposition<MaximalEndComponent>,
) -> Vec<Vec<(usize, Vec<usize>)>> {
    let mut result: Vec<Vec<(usize, Vec<usize>)>> = decomposition
        .iter()
        .map(|mec| {
            mec.iter()
                .map(|(state, choices)| (state, choices.to_vec()))
                .collect()
        })
        .collect();
    result.sort();
    result
}

/// Verify that the found end components match the expected
/// `(state, retained choices)` maps exactly, ignoring the block order.
pub fn verify_mecs(
    found: &Decomposition<MaximalEndComponent>,
    expected: &[&[(usize, &[usize])]],
) {
    let found_maps = normalize(found);
    let mut expected_maps: Vec<Vec<(usize, Vec<usize>)>> = expected
        .iter()
        .map(|mec| {
            mec.iter()
                .map(|(state, choices)| (*state, choices.to_vec()))
                .collect()
        })
        .collect();
    expected_maps.sort();

    assert_eq!(
        found_maps, expected_maps,
        "End components differ from the expected ones."
    );
}
