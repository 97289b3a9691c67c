use crate::algorithm::{Completable, GeneratorStep, Incomplete};
use crate::mec::MecConfig;
use crate::scc::{Advance, TarjanScratch};
use crate::storage::{MaximalEndComponent, StateBlock, StateSet, TransitionSystem, Weight};
use log::{debug, info};
use std::collections::VecDeque;

/// Internal state of the candidate refinement loop.
///
/// Candidate blocks wait in a FIFO queue; every scratch structure is
/// allocated once, sized by the number of states, and reset sparsely between
/// refinement passes.
pub struct RefinementState {
    queue: VecDeque<StateBlock>,
    /// Bit view of the candidate currently undergoing component
    /// decomposition; cleared member-by-member after each run.
    candidate: StateSet,
    tarjan: TarjanScratch,
    to_check: ScratchSet,
    to_remove: ScratchSet,
}

/// Step implementation for the candidate refinement loop.
///
/// Each step takes one candidate block through a full refinement pass:
/// component decomposition followed by the leak prune. An unchanged
/// candidate is a confirmed maximal end component and is yielded with its
/// retained choices; a changed candidate is replaced by its refined parts.
/// Steps are the only interruption points, so a cancelled run never exposes
/// a partially refined decomposition.
pub struct RefinementStep;

impl From<&StateSet> for RefinementState {
    fn from(value: &StateSet) -> Self {
        let capacity = value.capacity();
        let mut queue = VecDeque::new();
        let initial = StateBlock::from(value);
        if !initial.is_empty() {
            queue.push_back(initial);
        }
        RefinementState {
            queue,
            candidate: StateSet::new(capacity),
            tarjan: TarjanScratch::new(capacity),
            to_check: ScratchSet::new(capacity),
            to_remove: ScratchSet::new(capacity),
        }
    }
}

impl From<StateSet> for RefinementState {
    fn from(value: StateSet) -> Self {
        RefinementState::from(&value)
    }
}

impl<'a, W: Weight> GeneratorStep<MecConfig<'a, W>, RefinementState, MaximalEndComponent>
    for RefinementStep
{
    fn step(
        context: &MecConfig<'a, W>,
        state: &mut RefinementState,
    ) -> Completable<Option<MaximalEndComponent>> {
        let system = context.system;
        let Some(candidate) = state.queue.pop_front() else {
            return Ok(None);
        };

        // Decompose the candidate into strongly connected components. No
        // filters here: the change test below must see every component,
        // including trivial singletons.
        for member in candidate.iter() {
            state.candidate.insert(member);
        }
        state.tarjan.reset();
        let mut components: Vec<StateBlock> = Vec::new();
        loop {
            match state.tarjan.advance(system, &state.candidate, false, false) {
                Advance::Component(block) => components.push(block),
                Advance::Filtered => continue,
                Advance::Done => break,
            }
        }
        for member in candidate.iter() {
            state.candidate.remove(member);
        }

        let mut changed = components.len() > 1;

        // Prune every component down to states that can stay inside it.
        for component in components.iter_mut() {
            changed |= prune_leaking_states(
                system,
                component,
                &mut state.to_check,
                &mut state.to_remove,
            );
        }

        if changed {
            let waiting = state.queue.len();
            let mut queued = 0;
            for component in components {
                if !component.is_empty() {
                    state.queue.push_back(component);
                    queued += 1;
                }
            }
            debug!(
                "Candidate of {} state(s) was refined into {} new candidate(s); {} already waiting.",
                candidate.len(),
                queued,
                waiting
            );
            Err(Incomplete::Working)
        } else {
            // The candidate survived a full pass unchanged; it is a maximal
            // end component. Materialize the retained choices.
            let component = components
                .into_iter()
                .next()
                .expect("Correctness violation: a nonempty candidate produced no component.");
            let mec = materialize(system, &component);
            info!(
                "Confirmed maximal end component with {} state(s) and {} choice(s); {} candidate(s) waiting.",
                mec.state_count(),
                mec.choice_count(),
                state.queue.len()
            );
            Ok(Some(mec))
        }
    }
}

/// Iteratively remove states whose every choice can leak out of the
/// component, re-checking states that lost a successor, until no removal
/// happens. Returns true if any state was removed.
fn prune_leaking_states<W: Weight>(
    system: TransitionSystem<W>,
    component: &mut StateBlock,
    to_check: &mut ScratchSet,
    to_remove: &mut ScratchSet,
) -> bool {
    let mut changed = false;

    for state in component.iter() {
        to_check.insert(state);
    }

    while !to_check.is_empty() {
        for state in to_check.iter() {
            let can_stay = system.choice_range(state).any(|choice| {
                system
                    .choice_successors(choice)
                    .all(|(successor, weight)| {
                        !weight.is_positive() || component.contains(successor)
                    })
            });
            if !can_stay {
                to_remove.insert(state);
            }
        }
        to_check.clear();

        if to_remove.is_empty() {
            break;
        }
        changed = true;
        component.erase_set(to_remove.as_set());

        // Removed successors may strand the remaining states: re-check every
        // state that still reaches a removed one.
        for state in component.iter() {
            if system
                .state_successors(state)
                .any(|successor| to_remove.as_set().contains(successor))
            {
                to_check.insert(state);
            }
        }
        to_remove.clear();
    }

    changed
}

/// Build the end component output for a confirmed block: every member keeps
/// exactly the choices whose positive-weight successors all stay inside the
/// block.
fn materialize<W: Weight>(
    system: TransitionSystem<W>,
    block: &StateBlock,
) -> MaximalEndComponent {
    let mut mec = MaximalEndComponent::new();
    for state in block.iter() {
        let mut retained = Vec::new();
        for choice in system.choice_range(state) {
            let contained = system
                .choice_successors(choice)
                .all(|(successor, weight)| !weight.is_positive() || block.contains(successor));
            if contained {
                retained.push(choice);
            }
        }
        mec.add_state(state, retained);
    }
    mec
}

/// A state set that remembers its members, so that clearing only touches the
/// cells that were actually used. Iteration follows ascending state order.
struct ScratchSet {
    set: StateSet,
    members: Vec<usize>,
}

impl ScratchSet {
    fn new(capacity: usize) -> ScratchSet {
        ScratchSet {
            set: StateSet::new(capacity),
            members: Vec::new(),
        }
    }

    fn insert(&mut self, state: usize) {
        if !self.set.contains(state) {
            self.set.insert(state);
            self.members.push(state);
        }
    }

    fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn as_set(&self) -> &StateSet {
        &self.set
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.set.iter()
    }

    fn clear(&mut self) {
        for state in self.members.drain(..) {
            self.set.remove(state);
        }
    }
}
