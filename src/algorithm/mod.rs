//! Abstract implementation of stateful "computations" and "generators".
//!
//! Every [`Computation`] has:
//!  - `CONTEXT`; an immutable object that configures the computation.
//!  - `STATE`; a mutable object that is changed by repeatedly invoking a
//!    [`ComputationStep`].
//!  - `OUTPUT`; the type the `STATE` is converted to once the computation is
//!    done.
//!
//! A [`Generator`] is very similar, except that it behaves like an iterator:
//! `OUTPUT` items are produced gradually as a by-product of invoking a
//! [`GeneratorStep`]. A [`Generator`] can also be converted into a
//! [`Computation`] that collects the produced items into a container
//! (similar to `collect` on iterators). The decomposition engines are
//! generators — one yields state blocks, the other end components — and a
//! whole decomposition is the collected result.
//!
//! Splitting an algorithm into explicit steps keeps two properties that a
//! plain function cannot offer:
//!  - The caller decides how far to drive the computation. Dropping the
//!    object abandons the run without ever exposing a partial result.
//!  - The blocking drivers ([`Computation::compute`], iteration over a
//!    [`Generator`]) test ambient cancellation between steps, which for the
//!    engines means between outer passes of the underlying algorithm.
//!
//! ```rust
//! use algo_sparse_mec::algorithm::{Completable, Computation, ComputationStep, Incomplete};
//!
//! /// Counts the state up to the limit given by the context.
//! struct CountUp;
//!
//! impl ComputationStep<usize, usize, usize> for CountUp {
//!     fn step(context: &usize, state: &mut usize) -> Completable<()> {
//!         if *state >= *context {
//!             Ok(())
//!         } else {
//!             *state += 1;
//!             Err(Incomplete::Working)
//!         }
//!     }
//! }
//!
//! type CountUpComputation = Computation<usize, usize, usize, CountUp>;
//!
//! // Run to completion as a cancellable function...
//! assert_eq!(CountUpComputation::run(10usize, 0usize).unwrap(), 10);
//!
//! // ...or poll the computation object until the output is available.
//! let mut computation = CountUpComputation::configure(6usize, 4usize);
//! assert_eq!(computation.try_compute(), Err(Incomplete::Working)); // 5
//! assert_eq!(computation.try_compute(), Err(Incomplete::Working)); // 6
//! assert_eq!(computation.try_compute(), Ok(&6)); // done
//! ```
//!
//! The operation is split into two methods: `step` is called with `CONTEXT`
//! and mutable `STATE` until it returns `Ok(())`; then `output` is called
//! once to convert the owned `STATE` into `OUTPUT`. If the conversion is
//! trivial (`STATE` implements `Into<OUTPUT>`), implementing
//! [`ComputationStep`] derives it; complex conversions implement
//! [`ComputationStepAndConvert`] directly. `step` cannot take ownership of
//! the state because the state would be lost when a run is cancelled and
//! resumed later.

use cancel_this::Cancelled;
use std::fmt::{Display, Formatter};

mod computation;
mod generator;

pub use computation::{Computation, ComputationStep, ComputationStepAndConvert, Derived, Manual};
pub use generator::{CollectorStep, Generator, GeneratorStep};

/// Implemented by computations that can be polled for an eventual output.
pub trait Computable<T> {
    fn try_compute(&mut self) -> Completable<&T>;
    fn compute(self) -> cancel_this::Cancellable<T>;
}

/// Implemented by generators that can be polled for a sequence of outputs.
pub trait Generatable<T>: Iterator<Item = cancel_this::Cancellable<T>> {
    fn try_next(&mut self) -> Option<Completable<T>>;
}

/// A [`Completable`] result is a value that is eventually computed by an
/// algorithm, but the computation can be incomplete when the value is polled.
pub type Completable<T> = Result<T, Incomplete>;

/// The error type returned by an algorithm when the result is not available.
///
/// The result can be unavailable because the computation was cancelled or
/// because the algorithm has not finished yet but reached one of its
/// pre-defined interruption points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incomplete {
    Working,
    Cancelled(Cancelled),
}

impl From<Cancelled> for Incomplete {
    fn from(value: Cancelled) -> Self {
        Incomplete::Cancelled(value)
    }
}

impl Display for Incomplete {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Incomplete::Working => write!(f, "Computation not finished"),
            Incomplete::Cancelled(c) => write!(f, "{}", c),
        }
    }
}

impl std::error::Error for Incomplete {}
