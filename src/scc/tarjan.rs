use crate::algorithm::{Completable, GeneratorStep, Incomplete};
use crate::scc::SccConfig;
use crate::storage::{StateBlock, StateSet, TransitionSystem, Weight};
use log::debug;

/// Internal state of the iterative Tarjan decomposition.
///
/// Holds the subsystem the search is restricted to and all scratch buffers.
/// Every buffer is allocated once, sized by the number of states, when the
/// state is created.
pub struct TarjanState {
    subsystem: StateSet,
    scratch: TarjanScratch,
}

/// Step implementation for the iterative Tarjan decomposition.
///
/// Each step advances the depth-first search until the next component
/// closes; components removed by the configured filters report progress
/// without producing an item.
pub struct TarjanStep;

impl<'a, W: Weight> GeneratorStep<SccConfig<'a, W>, TarjanState, StateBlock> for TarjanStep {
    fn step(
        context: &SccConfig<'a, W>,
        state: &mut TarjanState,
    ) -> Completable<Option<StateBlock>> {
        match state.scratch.advance(
            context.system,
            &state.subsystem,
            context.drop_trivial,
            context.only_bottom,
        ) {
            Advance::Component(block) => Ok(Some(block)),
            Advance::Filtered => Err(Incomplete::Working),
            Advance::Done => Ok(None),
        }
    }
}

impl From<&StateSet> for TarjanState {
    fn from(value: &StateSet) -> Self {
        TarjanState::from(value.clone())
    }
}

impl From<StateSet> for TarjanState {
    fn from(value: StateSet) -> Self {
        let scratch = TarjanScratch::new(value.capacity());
        TarjanState {
            subsystem: value,
            scratch,
        }
    }
}

/// The result of advancing the search up to the next component boundary.
pub(crate) enum Advance {
    /// A component closed and survived the configured filters.
    Component(StateBlock),
    /// A component closed but was removed by a filter.
    Filtered,
    /// Every state of the subsystem has been assigned to a component.
    Done,
}

/// One entry of the explicit recursion stack: a state under examination and
/// the cursor into its flattened successor-entry range.
struct Frame {
    state: usize,
    cursor: usize,
    end: usize,
}

/// Boolean marks over `[0, capacity)` with O(1) bulk clearing through a
/// generation counter. The mark arrays of a decomposition run are cleared
/// between runs without touching all `capacity` cells.
struct EpochMarks {
    stamps: Vec<u32>,
    epoch: u32,
}

impl EpochMarks {
    fn new(capacity: usize) -> EpochMarks {
        EpochMarks {
            stamps: vec![0; capacity],
            epoch: 1,
        }
    }

    fn mark(&mut self, index: usize) {
        self.stamps[index] = self.epoch;
    }

    fn unmark(&mut self, index: usize) {
        self.stamps[index] = 0;
    }

    fn is_marked(&self, index: usize) -> bool {
        self.stamps[index] == self.epoch
    }

    fn clear_all(&mut self) {
        if self.epoch == u32::MAX {
            self.stamps.fill(0);
            self.epoch = 1;
        } else {
            self.epoch += 1;
        }
    }
}

/// The reusable buffers of the iterative Tarjan search.
///
/// The maximal end component engine runs many decompositions over shrinking
/// candidate sets; it keeps one `TarjanScratch` alive and calls
/// [`TarjanScratch::reset`] between runs, which costs O(1) instead of a full
/// reinitialization.
pub(crate) struct TarjanScratch {
    capacity: usize,
    index_counter: usize,
    /// Next position of the scan for an unvisited root state.
    next_root: usize,
    /// Discovery index per state; only valid while `visited` is marked.
    index: Vec<usize>,
    /// Smallest reachable discovery index per state; only valid while
    /// `visited` is marked.
    lowlink: Vec<usize>,
    visited: EpochMarks,
    on_stack: EpochMarks,
    has_self_loop: EpochMarks,
    can_leave: EpochMarks,
    /// States of the currently open components, in discovery order.
    open: Vec<usize>,
    /// The explicit recursion stack.
    frames: Vec<Frame>,
}

impl TarjanScratch {
    pub(crate) fn new(capacity: usize) -> TarjanScratch {
        TarjanScratch {
            capacity,
            index_counter: 0,
            next_root: 0,
            index: vec![0; capacity],
            lowlink: vec![0; capacity],
            visited: EpochMarks::new(capacity),
            on_stack: EpochMarks::new(capacity),
            has_self_loop: EpochMarks::new(capacity),
            can_leave: EpochMarks::new(capacity),
            open: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Prepare for a fresh decomposition run over the same state count.
    pub(crate) fn reset(&mut self) {
        self.index_counter = 0;
        self.next_root = 0;
        self.visited.clear_all();
        self.on_stack.clear_all();
        self.has_self_loop.clear_all();
        self.can_leave.clear_all();
        self.open.clear();
        self.frames.clear();
    }

    /// Mark a state discovered and push its recursion frame.
    fn discover<W: Weight>(&mut self, system: TransitionSystem<W>, state: usize) {
        self.visited.mark(state);
        self.index[state] = self.index_counter;
        self.lowlink[state] = self.index_counter;
        self.index_counter += 1;
        self.open.push(state);
        self.on_stack.mark(state);
        let range = system.state_entry_range(state);
        self.frames.push(Frame {
            state,
            cursor: range.start,
            end: range.end,
        });
    }

    /// Advance the search until the next component closes, or until every
    /// state of `subsystem` has been assigned to a component.
    ///
    /// The state graph is the projection of the transition system: state `s`
    /// has an edge to state `t` if any choice of `s` reaches `t` with
    /// positive weight and `t` is part of `subsystem`.
    pub(crate) fn advance<W: Weight>(
        &mut self,
        system: TransitionSystem<W>,
        subsystem: &StateSet,
        drop_trivial: bool,
        only_bottom: bool,
    ) -> Advance {
        assert_eq!(
            subsystem.capacity(),
            system.state_count(),
            "Subsystem capacity does not match the state count of the system."
        );
        assert_eq!(
            self.capacity,
            system.state_count(),
            "Search buffers were allocated for a different state count."
        );

        'search: loop {
            let Some(frame) = self.frames.last_mut() else {
                // No open frame; start the search from the next unvisited
                // subsystem state, in ascending order.
                loop {
                    let Some(root) = subsystem.first_from(self.next_root) else {
                        return Advance::Done;
                    };
                    self.next_root = root + 1;
                    if !self.visited.is_marked(root) {
                        self.discover(system, root);
                        continue 'search;
                    }
                }
            };

            let current = frame.state;

            // Traverse the remaining successors of the current state.
            let mut descend_to = None;
            while frame.cursor < frame.end {
                let entry = frame.cursor;
                frame.cursor += 1;

                let (successor, weight) = system.entry(entry);
                if !weight.is_positive() || !subsystem.contains(successor) {
                    continue;
                }
                if successor == current {
                    self.has_self_loop.mark(current);
                }

                if !self.visited.is_marked(successor) {
                    // Recurse into the unvisited successor; the cursor
                    // already points at the next entry for when we return.
                    descend_to = Some(successor);
                    break;
                } else if self.on_stack.is_marked(successor) {
                    // The successor belongs to a still-open component, which
                    // must be the component of the current state.
                    if self.index[successor] < self.lowlink[current] {
                        self.lowlink[current] = self.index[successor];
                    }
                } else {
                    // The successor's component already closed, so the
                    // current state has an edge out of its own component.
                    self.can_leave.mark(current);
                }
            }

            if let Some(successor) = descend_to {
                self.discover(system, successor);
                continue 'search;
            }

            // All successors handled; close the component if the current
            // state is its root.
            let closes_component = self.lowlink[current] == self.index[current];
            let mut kept = None;
            if closes_component {
                let mut members = Vec::new();
                let mut is_bottom = true;
                loop {
                    let Some(top) = self.open.pop() else {
                        panic!(
                            "Correctness violation: open component stack exhausted before its root."
                        );
                    };
                    self.on_stack.unmark(top);
                    if self.can_leave.is_marked(top) {
                        is_bottom = false;
                    }
                    members.push(top);
                    if top == current {
                        break;
                    }
                }

                let trivial = members.len() == 1 && !self.has_self_loop.is_marked(current);
                if (drop_trivial && trivial) || (only_bottom && !is_bottom) {
                    debug!(
                        "Discarding filtered component of {} state(s).",
                        members.len()
                    );
                } else {
                    kept = Some(StateBlock::from_states(members));
                }
            }

            // Return to the parent state (if any).
            self.frames.pop();
            if let Some(parent) = self.frames.last() {
                let parent = parent.state;
                if self.lowlink[current] < self.lowlink[parent] {
                    self.lowlink[parent] = self.lowlink[current];
                }
                if !self.on_stack.is_marked(current) {
                    // The child closed its own component during the descent,
                    // so the parent has an edge out of its component.
                    self.can_leave.mark(parent);
                }
            }

            if closes_component {
                return match kept {
                    Some(block) => Advance::Component(block),
                    None => Advance::Filtered,
                };
            }
        }
    }
}
