use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Invalid {level} cache configuration - {source}")]
    CacheConfig {
        level: &'static str,
        #[source]
        source: ConfigError,
    },

    #[error("PREF_M must be positive when PREF_N > 0")]
    PrefetcherDepthMissing,

    #[error("Cannot open trace file '{path}': {source}")]
    TraceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors for a single cache level's geometry.
/// Messages name the first violated rule
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Block size must be positive")]
    BlockSizeNotPositive,

    #[error("Cache size must be positive")]
    SizeNotPositive,

    #[error("Associativity must be positive")]
    AssociativityNotPositive,

    #[error("Block size must be a power of 2")]
    BlockSizeNotPowerOfTwo,

    #[error("Cache size must be divisible by block size")]
    SizeNotMultipleOfBlockSize,

    #[error("Number of blocks must be divisible by associativity")]
    BlocksNotMultipleOfAssociativity,

    #[error("Number of sets must be a power of 2")]
    SetsNotPowerOfTwo,

    #[error("Associativity cannot exceed total number of blocks")]
    AssociativityExceedsBlocks,
}

/// Errors raised while parsing a single trace line.
/// These are recovered from (warn and skip), never fatal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("expected 'op address'")]
    Format,

    #[error("invalid operation '{0}': expected 'r' or 'w'")]
    InvalidOperation(String),

    #[error("invalid hexadecimal address '{0}'")]
    InvalidAddress(String),

    #[error("address '{0}' does not fit in 32 bits")]
    AddressOverflow(String),
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
