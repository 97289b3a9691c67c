use crate::storage::{ChoiceIndex, SparseMatrix, SparseMatrixBuilder, TransitionSystem};

/// Initialize env_logger for tests. Safe to call multiple times.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Owns the matrix and choice index of a test model, so that tests can lend
/// out [`TransitionSystem`] views of it.
pub struct TestSystem {
    matrix: SparseMatrix<f64>,
    choices: ChoiceIndex,
}

impl TestSystem {
    /// Build a deterministic system from a list of `(from, to)` edges.
    ///
    /// Every state owns exactly one choice row; a state with several edges
    /// gets a uniform distribution over its successors. The successor order
    /// within a row follows the order of the edge list.
    pub fn deterministic(state_count: usize, transitions: &[(usize, usize)]) -> TestSystem {
        let mut out_degree = vec![0usize; state_count];
        for (from, _) in transitions {
            out_degree[*from] += 1;
        }

        let mut sorted = transitions.to_vec();
        sorted.sort_by_key(|(from, _)| *from);

        let mut builder = SparseMatrixBuilder::new(state_count, state_count);
        for (from, to) in sorted {
            let weight = 1.0 / out_degree[from] as f64;
            builder.add_entry(from, to, weight).unwrap();
        }

        TestSystem {
            matrix: builder.build(),
            choices: ChoiceIndex::deterministic(state_count),
        }
    }

    /// Build a nondeterministic system. `choices[s]` lists the distributions
    /// of state `s`, each given as `(successor, weight)` pairs; choice rows
    /// are numbered in declaration order.
    pub fn mdp(state_count: usize, choices: &[&[&[(usize, f64)]]]) -> TestSystem {
        assert_eq!(
            choices.len(),
            state_count,
            "One choice list per state is required."
        );

        let row_count = choices.iter().map(|c| c.len()).sum();
        let mut builder = SparseMatrixBuilder::new(row_count, state_count);
        let mut index = Vec::with_capacity(state_count + 1);
        index.push(0);
        let mut row = 0;
        for state_choices in choices {
            for distribution in *state_choices {
                for (successor, weight) in *distribution {
                    builder.add_entry(row, *successor, *weight).unwrap();
                }
                row += 1;
            }
            index.push(row);
        }

        TestSystem {
            matrix: builder.build(),
            choices: ChoiceIndex::new(index).unwrap(),
        }
    }

    pub fn system(&self) -> TransitionSystem<'_, f64> {
        TransitionSystem::new(&self.matrix, &self.choices).unwrap()
    }
}
