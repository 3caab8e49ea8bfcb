use thiserror::Error;
use url_validator_engine::EngineError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("probe engine: {0}")]
    Engine(#[from] EngineError),
    #[error("invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
