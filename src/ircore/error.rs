use thiserror::Error;

/// Errors raised while decoding a front-coded dictionary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("entry {entry}: diff entry before any anchor")]
    MissingAnchor { entry: usize },

    #[error("entry {entry}: shared length {shared} exceeds anchor length {anchor}")]
    SharedExceedsAnchor { entry: usize, shared: usize, anchor: usize },

    #[error("entry {entry}: length {len} does not match shared {shared} + suffix {suffix}")]
    LengthMismatch { entry: usize, len: usize, shared: usize, suffix: usize },

    #[error("entry {entry}: shared prefix splits a multi-byte character")]
    SplitCharacter { entry: usize },

    #[error("entry {entry}: input truncated, needed {needed} bytes, {available} available")]
    Truncated { entry: usize, needed: usize, available: usize },

    #[error("entry {entry}: invalid tag {tag}")]
    InvalidTag { entry: usize, tag: u8 },

    #[error("entry {entry}: term is not valid utf-8")]
    InvalidUtf8 { entry: usize },

    #[error("entry {entry}: varint overflow")]
    VarintOverflow { entry: usize },
}

/// Errors raised while building, persisting or loading an index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, IndexError>;
