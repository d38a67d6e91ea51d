use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] drhub_core::ValidationError),

    #[error("refresh failed: {0}")]
    Refresh(#[from] drhub_core::RefreshError),

    #[error("no record for symbol '{0}'")]
    UnknownSymbol(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::UnknownSymbol(_) => 3,
            Self::Refresh(_) => 6,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
