use crate::storage::{ChoiceIndex, SparseMatrix, Weight};

/// The read-only view of a stochastic transition system that the
/// decomposition engines consume: a sparse choice-row matrix together with
/// the [`ChoiceIndex`] that assigns rows to states.
///
/// The view borrows both parts immutably for the duration of a decomposition
/// run and is `Copy`, so it can be freely embedded in configuration objects.
/// Concurrent decompositions may share one system across threads.
pub struct TransitionSystem<'a, W> {
    matrix: &'a SparseMatrix<W>,
    choices: &'a ChoiceIndex,
}

impl<W> Clone for TransitionSystem<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for TransitionSystem<'_, W> {}

impl<'a, W: Weight> TransitionSystem<'a, W> {
    /// Combine a matrix and a choice index, validating that they describe the
    /// same system: the index must cover exactly the matrix rows, and every
    /// successor must be a valid state.
    pub fn new(
        matrix: &'a SparseMatrix<W>,
        choices: &'a ChoiceIndex,
    ) -> Result<TransitionSystem<'a, W>, String> {
        if choices.choice_count() != matrix.row_count() {
            return Err(format!(
                "Choice index covers {} rows, but the matrix has {}.",
                choices.choice_count(),
                matrix.row_count()
            ));
        }
        if matrix.column_count() != choices.state_count() {
            return Err(format!(
                "The matrix has {} successor columns, but the system has {} states.",
                matrix.column_count(),
                choices.state_count()
            ));
        }
        Ok(TransitionSystem { matrix, choices })
    }

    pub fn state_count(&self) -> usize {
        self.choices.state_count()
    }

    pub fn choice_count(&self) -> usize {
        self.matrix.row_count()
    }

    /// The half-open range of choice rows owned by `state`.
    pub fn choice_range(&self, state: usize) -> std::ops::Range<usize> {
        self.choices.range(state)
    }

    /// Iterate over the `(successor, weight)` entries of one choice row.
    pub fn choice_successors(self, choice: usize) -> impl Iterator<Item = (usize, &'a W)> {
        self.matrix.row(choice)
    }

    /// The half-open range of matrix entry indices spanning *all* choices of
    /// `state`. Because a state's rows are contiguous, so are their entries;
    /// this is the successor cursor range of the state-graph projection.
    pub fn state_entry_range(&self, state: usize) -> std::ops::Range<usize> {
        let rows = self.choice_range(state);
        if rows.is_empty() {
            // A state without choices; anchor the empty range at the position
            // its rows would occupy.
            let anchor = if rows.start < self.matrix.row_count() {
                self.matrix.row_range(rows.start).start
            } else {
                self.matrix.entry_count()
            };
            return anchor..anchor;
        }
        self.matrix.row_range(rows.start).start..self.matrix.row_range(rows.end - 1).end
    }

    /// Resolve an entry index from [`TransitionSystem::state_entry_range`].
    pub fn entry(self, entry: usize) -> (usize, &'a W) {
        self.matrix.entry(entry)
    }

    /// Iterate over all positive-weight successors of `state` across all of
    /// its choices, i.e. the outgoing edges of the state-graph projection.
    /// Successors reachable through several choices appear once per choice.
    pub fn state_successors(self, state: usize) -> impl Iterator<Item = usize> + 'a {
        let matrix = self.matrix;
        self.state_entry_range(state).filter_map(move |entry| {
            let (successor, weight) = matrix.entry(entry);
            weight.is_positive().then_some(successor)
        })
    }

    /// Derive the backward transition matrix (predecessor rows per target
    /// state). Not used by the engines themselves; see
    /// [`SparseMatrix::transpose`].
    pub fn backward_transitions(&self) -> SparseMatrix<W>
    where
        W: Clone,
    {
        self.matrix.transpose()
    }
}
