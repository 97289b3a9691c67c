//! Behavior of the `drop_trivial` and `only_bottom` filters, including the
//! corner cases around self-loops and edges into already-closed components.

use crate::scc::SccConfig;
use crate::scc::tests::{collect_sccs, verify_sccs};
use crate::storage::StateSet;
use crate::test_utils::{TestSystem, init_logger};

#[test]
fn drop_trivial_keeps_self_loops() {
    init_logger();
    // Line graph ending in a self-loop: only {2} is non-trivial.
    let model = TestSystem::deterministic(3, &[(0, 1), (1, 2), (2, 2)]);
    let subsystem = StateSet::full(3);

    let all = collect_sccs(SccConfig::new(model.system()), &subsystem);
    verify_sccs(&all, &[&[0], &[1], &[2]]);

    let non_trivial = collect_sccs(SccConfig::new(model.system()).drop_trivial(), &subsystem);
    verify_sccs(&non_trivial, &[&[2]]);
}

#[test]
fn drop_trivial_ignores_zero_weight_self_loops() {
    init_logger();
    // State 1 carries an explicit zero-weight self-entry; that is not an
    // edge, so {1} stays trivial.
    let model = TestSystem::mdp(2, &[&[&[(0, 1.0)]], &[&[(1, 0.0), (0, 1.0)]]]);
    let subsystem = StateSet::full(2);
    let non_trivial = collect_sccs(SccConfig::new(model.system()).drop_trivial(), &subsystem);
    verify_sccs(&non_trivial, &[&[0]]);
}

#[test]
fn only_bottom_removes_components_with_exits() {
    init_logger();
    // 0 <-> 1, 1 -> 2, 2 -> 2: the cycle {0, 1} can escape into {2}.
    let model = TestSystem::deterministic(3, &[(0, 1), (1, 0), (1, 2), (2, 2)]);
    let subsystem = StateSet::full(3);

    let all = collect_sccs(SccConfig::new(model.system()), &subsystem);
    verify_sccs(&all, &[&[0, 1], &[2]]);

    let bottom = collect_sccs(SccConfig::new(model.system()).only_bottom(), &subsystem);
    verify_sccs(&bottom, &[&[2]]);
}

#[test]
fn only_bottom_detects_exits_through_cross_edges() {
    init_logger();
    // State 0 closes its component first; the later singleton {1} exits
    // through a cross edge into it and must not count as bottom.
    let model = TestSystem::deterministic(2, &[(0, 0), (1, 0), (1, 1)]);
    let subsystem = StateSet::full(2);
    let bottom = collect_sccs(SccConfig::new(model.system()).only_bottom(), &subsystem);
    verify_sccs(&bottom, &[&[0]]);
}

#[test]
fn only_bottom_keeps_a_component_explored_in_several_descents() {
    init_logger();
    // {0, 1, 2, 3} is one bottom component, but the search enters the
    // sub-cycle through 1 first and reaches 2 again through 3; the second
    // descent must not be mistaken for an exit.
    let model = TestSystem::deterministic(4, &[(0, 1), (0, 3), (1, 2), (2, 0), (3, 2)]);
    let subsystem = StateSet::full(4);
    let bottom = collect_sccs(SccConfig::new(model.system()).only_bottom(), &subsystem);
    verify_sccs(&bottom, &[&[0, 1, 2, 3]]);
}

#[test]
fn only_bottom_is_evaluated_inside_the_subsystem() {
    init_logger();
    // {0, 1} leaks into state 2 only; with 2 outside the subsystem the leak
    // does not exist and {0, 1} is bottom.
    let model = TestSystem::deterministic(3, &[(0, 1), (1, 0), (1, 2), (2, 2)]);
    let subsystem = StateSet::from_indices(3, [0, 1].iter().copied());
    let bottom = collect_sccs(SccConfig::new(model.system()).only_bottom(), &subsystem);
    verify_sccs(&bottom, &[&[0, 1]]);
}

#[test]
fn combined_filters() {
    init_logger();
    // {2} is bottom and non-trivial; {0, 1} is non-trivial but not bottom;
    // {3} is trivial.
    let model = TestSystem::deterministic(4, &[(0, 1), (1, 0), (1, 2), (2, 2), (3, 0)]);
    let subsystem = StateSet::full(4);
    let filtered = collect_sccs(
        SccConfig::new(model.system()).drop_trivial().only_bottom(),
        &subsystem,
    );
    verify_sccs(&filtered, &[&[2]]);
}
