//! Maximal end component decomposition for nondeterministic stochastic
//! transition systems.
//!
//! An *end component* is a set of states together with a selection of their
//! choices such that every selected choice stays inside the set (closure)
//! and the set is strongly connected under the selected choices. A *maximal*
//! end component (MEC) is one that cannot be extended by any further state
//! or choice. MECs are the probabilistic analogue of strongly connected
//! components: inside a MEC, a scheduler can keep the process running
//! forever, visiting every member state infinitely often.
//!
//! # Algorithm
//!
//! The engine maintains a queue of candidate blocks, initialized with the
//! requested subsystem, and refines it to a fixpoint:
//!
//!  - Decompose the candidate into strongly connected components of the
//!    state graph.
//!  - Within each component, repeatedly remove states whose every choice can
//!    leave the component, re-checking the states that lost a successor.
//!  - If anything changed, the nonempty refined components re-enter the
//!    queue; otherwise the candidate is a confirmed MEC and is yielded with
//!    its retained choices.
//!
//! Each generator step performs one refinement pass over one candidate, so
//! cancellation is tested exactly between passes, and component-search
//! scratch is shared across all passes of a run.
//!
//! # Example
//!
//! ```no_run
//! use algo_sparse_mec::mec::MecDecomposition;
//! use algo_sparse_mec::storage::{
//!     ChoiceIndex, Decomposition, MaximalEndComponent, SparseMatrix, StateSet, TransitionSystem,
//! };
//!
//! # fn example(matrix: &SparseMatrix<f64>, choices: &ChoiceIndex) -> Result<(), String> {
//! let system = TransitionSystem::new(matrix, choices)?;
//! let subsystem = StateSet::full(system.state_count());
//!
//! let generator = MecDecomposition::configure(system, &subsystem);
//! let mecs: Decomposition<MaximalEndComponent> = generator
//!     .computation::<Decomposition<_>>()
//!     .compute()
//!     .unwrap();
//! # Ok(())
//! # }
//! ```

mod mec_config;
mod refinement;

#[cfg(test)]
mod tests;

use crate::algorithm::Generator;
use crate::storage::MaximalEndComponent;
pub use mec_config::MecConfig;
pub use refinement::{RefinementState, RefinementStep};

/// Maximal end component decomposition as a generator: configured with a
/// [`MecConfig`] and a [`StateSet`](crate::storage::StateSet) holding the
/// subsystem, it yields one [`MaximalEndComponent`] per confirmed candidate.
/// States of the subsystem that belong to no end component are absent from
/// the output.
pub type MecDecomposition<'a, W> =
    Generator<MecConfig<'a, W>, RefinementState, MaximalEndComponent, RefinementStep>;
