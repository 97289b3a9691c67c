//! Explicit-state storage: the sparse transition structures the engines
//! consume and the block containers they produce.
//!
//! Inputs are borrowed read-only for the duration of a decomposition run
//! ([`TransitionSystem`] is a `Copy` view over a [`SparseMatrix`] and a
//! [`ChoiceIndex`]); outputs are owned ([`Decomposition`] of [`StateBlock`]
//! or [`MaximalEndComponent`] values). All input validation happens at
//! construction of these types and reports `Result<_, String>`; the engines
//! themselves cannot fail on valid inputs.

mod choice_index;
mod decomposition;
mod end_component;
mod sparse_matrix;
mod state_block;
mod state_set;
mod transition_system;

pub use choice_index::ChoiceIndex;
pub use decomposition::Decomposition;
pub use end_component::MaximalEndComponent;
pub use sparse_matrix::{SparseMatrix, SparseMatrixBuilder, Weight};
pub use state_block::StateBlock;
pub use state_set::{StateSet, StateSetIter};
pub use transition_system::TransitionSystem;
