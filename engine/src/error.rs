use thiserror::Error;

/// Failures surfaced by the engine.
///
/// `Capacity` is fatal once the shrink-and-retry in [`crate::Game::new`] has
/// been spent. `NoFreeCell` is always recovered from by the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot place {requested} objects: only {available} free cells")]
    Capacity { requested: usize, available: usize },

    #[error("no free cell available")]
    NoFreeCell,

    #[error("invalid map: {0}")]
    InvalidMap(String),

    #[error("unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("roster has no {0} species")]
    EmptyRoster(&'static str),

    #[error("failed to parse content: {0}")]
    Content(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the caller may shrink or skip the placement instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::NoFreeCell | EngineError::Capacity { .. })
    }
}
