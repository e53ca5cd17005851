//! use rootca::error::RootCaError;

use thiserror::Error;

/// Represents errors that can occur while building a root certificate authority.
///
/// Every failure is returned to the caller; nothing in the crate retries.
#[derive(Debug, Error, Clone)]
pub enum RootCaError {
    /// The key primitive rejected the requested parameters or ran out of entropy.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Encoding or signing the certificate template failed.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A signature did not verify against the supplied public key.
    #[error("Verification error: {0}")]
    VerificationError(String),
}

impl From<der::Error> for RootCaError {
    /// Converts a `der::Error` into a `RootCaError`.
    fn from(err: der::Error) -> Self {
        RootCaError::DecodingError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RootCaError>;
