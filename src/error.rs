use alloc::string::String;

/// Result alias for configuration and setup
pub type Result<T> = core::result::Result<T, ConfigError>;

/// Setup time errors; an effect that fails with one of these is never registered
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("'{0}' is not a valid effect layer")]
    UnknownLayer(String),
    #[error("blending mode '{0}' is not a valid blending mode")]
    UnknownBlendMode(String),
    #[error("layer definition is missing its {0}")]
    MissingField(&'static str),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("palette has {0} values, expected a multiple of 3")]
    MalformedPalette(usize),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("layer {0} {1} is not a number within -1000..=1000")]
    ParameterOutOfRange(&'static str, f32),
    #[error("frame rate {0} is outside 1..=60")]
    FrameRateOutOfRange(f32),
    #[error("led index '{0}' is invalid")]
    InvalidLedIndex(String),
    #[error("led chain {0} does not exist")]
    UnknownChain(usize),
    #[error("effect '{0}' does not address any led")]
    NoLeds(String),
    #[error("effect name '{0}' is too long")]
    NameTooLong(String),
    #[error("effect '{0}' is already registered")]
    DuplicateEffect(String),
}
