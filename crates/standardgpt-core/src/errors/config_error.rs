/// Configuration and prompt-record errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("prompt for {operation} is missing required field '{field}'")]
    MissingPromptField { operation: String, field: String },

    #[error("unknown operation kind: {name}")]
    UnknownOperation { name: String },
}
