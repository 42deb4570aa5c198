use crate::Rank;

/// Errors reported by the engine. None of them are fatal to the caller, and
/// none of them leave partially mutated state behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("No card of rank {0} remains in the shoe")]
    RankExhausted(Rank),

    #[error("Not enough cards to sample: {remaining} remaining, {required} required")]
    InsufficientShoe { remaining: u16, required: u16 },

    #[error("The number of hands to simulate must be positive")]
    NoHands,

    #[error("The computation was cancelled")]
    Cancelled,

    #[error("A worker thread panicked")]
    WorkerPanicked,
}
