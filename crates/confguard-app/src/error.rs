use confguard_engine::EngineError;
use confguard_repo::{DataLoadError, InputError, PolicyLoadError};

/// Why a run could not produce a result. Every variant is fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Policy(#[from] PolicyLoadError),

    /// Only surfaces in combined mode; per-file problems become exceptions.
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("run cancelled")]
    Cancelled,

    #[error("building worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
