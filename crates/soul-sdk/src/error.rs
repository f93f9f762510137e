use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("config error: {0}")]
    Config(String),

    #[error("config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid signer key: {0}")]
    Signer(#[from] soul_crypto::SignatureError),

    #[error("badge preset not found: {0}")]
    UnknownBadge(String),

    #[error("telemetry setup failed: {0}")]
    Telemetry(String),

    #[error("identity registry error: {0}")]
    Registry(#[from] soul_registry::RegistryError),

    #[error("badge error: {0}")]
    Badge(#[from] soul_badge::BadgeError),

    #[error("reputation error: {0}")]
    Reputation(#[from] soul_reputation::ReputationError),

    #[error("gating error: {0}")]
    Gating(#[from] soul_gate::GatingError),
}

impl From<toml::de::Error> for SdkError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
