use crate::storage::TransitionSystem;

/// A configuration object for maximal end component detection.
#[derive(Clone, Copy)]
pub struct MecConfig<'a, W> {
    /// The transition system that is decomposed. Only the subsystem the
    /// algorithm was started with participates; end components that require
    /// states outside the subsystem are not reported.
    pub system: TransitionSystem<'a, W>,
}

impl<'a, W> From<TransitionSystem<'a, W>> for MecConfig<'a, W> {
    fn from(value: TransitionSystem<'a, W>) -> Self {
        MecConfig::new(value)
    }
}

impl<'a, W> MecConfig<'a, W> {
    /// Create a new instance of [`MecConfig`] for the given system.
    pub fn new(system: TransitionSystem<'a, W>) -> MecConfig<'a, W> {
        MecConfig { system }
    }
}
