use std::collections::BTreeMap;
use std::fmt;

/// A maximal end component: for every member state, the choices whose
/// successors all stay inside the component.
///
/// The member states together with the retained choices form a sub-system
/// that is closed under transitions and strongly connected, and no further
/// state or choice can be added without breaking one of the two properties.
/// Every member retains at least one choice.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaximalEndComponent {
    choices_per_state: BTreeMap<usize, Vec<usize>>,
}

impl MaximalEndComponent {
    pub fn new() -> MaximalEndComponent {
        MaximalEndComponent {
            choices_per_state: BTreeMap::new(),
        }
    }

    /// Add a member state with its retained choices (ascending row indices).
    pub fn add_state(&mut self, state: usize, choices: Vec<usize>) {
        self.choices_per_state.insert(state, choices);
    }

    pub fn contains_state(&self, state: usize) -> bool {
        self.choices_per_state.contains_key(&state)
    }

    /// The retained choice rows of a member state.
    pub fn choices(&self, state: usize) -> Option<&[usize]> {
        self.choices_per_state
            .get(&state)
            .map(|choices| choices.as_slice())
    }

    /// Iterate over the member states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = usize> + '_ {
        self.choices_per_state.keys().copied()
    }

    /// Iterate over `(state, retained choices)` pairs in ascending state
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.choices_per_state
            .iter()
            .map(|(state, choices)| (*state, choices.as_slice()))
    }

    pub fn state_count(&self) -> usize {
        self.choices_per_state.len()
    }

    /// Total number of retained choices across all member states.
    pub fn choice_count(&self) -> usize {
        self.choices_per_state
            .values()
            .map(|choices| choices.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.choices_per_state.is_empty()
    }
}

impl fmt::Debug for MaximalEndComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.choices_per_state.iter()).finish()
    }
}
