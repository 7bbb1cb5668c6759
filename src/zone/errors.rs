use thiserror::Error;

/// Zone-file related errors
#[derive(Debug, Clone, Error)]
pub enum ZoneError {
    /// Zone file parsing error
    #[error("Zone parse error: {0}")]
    ParseError(String),
    /// Invalid record format
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    /// Invalid TTL value
    #[error("Invalid TTL value: {0}")]
    InvalidTTL(String),
    /// No origin in the file, the hint, or an SOA owner
    #[error("Zone file has no discoverable origin ($ORIGIN, an absolute SOA owner, or --origin)")]
    MissingOrigin,
    /// Zone file too large
    #[error("Zone file exceeds maximum size")]
    FileTooLarge,
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),
}

pub type Result<T> = std::result::Result<T, ZoneError>;
