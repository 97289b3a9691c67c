use crate::storage::TransitionSystem;

/// A configuration object for strongly connected component detection.
#[derive(Clone, Copy)]
pub struct SccConfig<'a, W> {
    /// The transition system whose state graph is decomposed. The graph is
    /// always restricted to the subsystem the algorithm was started with;
    /// edges into states outside the subsystem do not exist as far as the
    /// decomposition is concerned.
    pub system: TransitionSystem<'a, W>,
    /// Omit trivial components, i.e. singletons whose only member has no
    /// self-loop (default: off).
    pub drop_trivial: bool,
    /// Retain only bottom components, i.e. components without an edge to any
    /// state outside of them (default: off).
    pub only_bottom: bool,
}

impl<'a, W> From<TransitionSystem<'a, W>> for SccConfig<'a, W> {
    fn from(value: TransitionSystem<'a, W>) -> Self {
        SccConfig::new(value)
    }
}

impl<'a, W> SccConfig<'a, W> {
    /// Create a new instance of [`SccConfig`] with both options disabled.
    pub fn new(system: TransitionSystem<'a, W>) -> SccConfig<'a, W> {
        SccConfig {
            system,
            drop_trivial: false,
            only_bottom: false,
        }
    }

    pub fn drop_trivial(mut self) -> SccConfig<'a, W> {
        self.drop_trivial = true;
        self
    }

    pub fn only_bottom(mut self) -> SccConfig<'a, W> {
        self.only_bottom = true;
        self
    }
}
