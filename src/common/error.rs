use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Anchor mask has {flags} entries but there are {positions} positions")]
    LengthMismatch { positions: usize, flags: usize },

    #[error("Edge endpoint {index} is out of range for {len} positions")]
    EdgeOutOfRange { index: usize, len: usize },

    #[error("Agent {agent} has more than one sample at timestep {timestep}")]
    DuplicateTimestep { agent: u64, timestep: u64 },

    #[error("Unknown scenario: {name}")]
    UnknownScenario { name: String },

    #[error("A path needs at least one point")]
    EmptyPath,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        DomainError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
