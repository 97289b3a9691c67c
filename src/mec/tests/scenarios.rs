//! End component detection on small hand-checked models.

use crate::mec::MecConfig;
use crate::mec::tests::{collect_mecs, verify_mecs};
use crate::storage::StateSet;
use crate::test_utils::{TestSystem, init_logger};

#[test]
fn two_isolated_cycles() {
    init_logger();
    let model = TestSystem::deterministic(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
    let subsystem = StateSet::full(4);
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(
        &mecs,
        &[&[(0, &[0]), (1, &[1])], &[(2, &[2]), (3, &[3])]],
    );
}

#[test]
fn line_graph_keeps_only_the_absorbing_state() {
    init_logger();
    let model = TestSystem::deterministic(3, &[(0, 1), (1, 2), (2, 2)]);
    let subsystem = StateSet::full(3);
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(&mecs, &[&[(2, &[2])]]);
}

#[test]
fn leaking_choice_does_not_split_the_component() {
    init_logger();
    // State 0 can stay put or move to 1; state 1 mixes between both. Every
    // choice stays inside {0, 1}, so all of them are retained.
    let model = TestSystem::mdp(
        2,
        &[&[&[(0, 1.0)], &[(1, 1.0)]], &[&[(0, 0.5), (1, 0.5)]]],
    );
    let subsystem = StateSet::full(2);
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(&mecs, &[&[(0, &[0, 1]), (1, &[2])]]);
}

#[test]
fn choice_with_an_exit_is_not_retained() {
    init_logger();
    // {0, 1} cycles through rows 0 and 1; row 2 would leave into the
    // absorbing state 2 and must be excluded from the retained choices.
    let model = TestSystem::mdp(
        3,
        &[
            &[&[(1, 1.0)]],
            &[&[(0, 1.0)], &[(2, 1.0)]],
            &[&[(2, 1.0)]],
        ],
    );
    let subsystem = StateSet::full(3);
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(&mecs, &[&[(0, &[0]), (1, &[1])], &[(2, &[3])]]);
}

#[test]
fn parallel_choices_are_all_retained() {
    init_logger();
    // State 1 has two distinct choices that both return to 0; neither state
    // has a self-choice, but the pair still forms an end component.
    let model = TestSystem::mdp(
        2,
        &[&[&[(1, 1.0)]], &[&[(0, 1.0)], &[(0, 1.0)]]],
    );
    let subsystem = StateSet::full(2);
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(&mecs, &[&[(0, &[0]), (1, &[1, 2])]]);
}

#[test]
fn subsystem_restriction_drops_components_that_need_outside_states() {
    init_logger();
    // Restricted to {0, 1}, the absorbing state 2 is unavailable: row 2 (the
    // exit of state 1) leaks outside, and {2} itself is not reported.
    let model = TestSystem::mdp(
        3,
        &[
            &[&[(1, 1.0)]],
            &[&[(0, 1.0)], &[(2, 1.0)]],
            &[&[(2, 1.0)]],
        ],
    );
    let subsystem = StateSet::from_indices(3, [0, 1].iter().copied());
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(&mecs, &[&[(0, &[0]), (1, &[1])]]);
}

#[test]
fn probabilistic_branching_inside_one_component() {
    init_logger();
    // A three-state model where every distribution spreads over the whole
    // component; everything is retained.
    let model = TestSystem::mdp(
        3,
        &[
            &[&[(1, 0.5), (2, 0.5)]],
            &[&[(0, 1.0)]],
            &[&[(0, 0.25), (1, 0.75)]],
        ],
    );
    let subsystem = StateSet::full(3);
    let mecs = collect_mecs(MecConfig::new(model.system()), &subsystem);
    verify_mecs(&mecs, &[&[(0, &[0]), (1, &[1]), (2, &[2])]]);
}
