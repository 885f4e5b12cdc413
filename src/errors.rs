/*!
 * Error types for the translai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The provider rejected the credential
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// No credential was available and none was entered
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

impl ProviderError {
    /// Whether this error means the credential must be (re)entered.
    ///
    /// Every other variant is a transport failure: the current operation aborts
    /// and nothing is retried.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationError(_) | Self::MissingCredential(_)
        )
    }
}

/// Errors raised by the key-value persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store failed to read or write
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be (de)serialized
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Backend(error.to_string())
    }
}

/// Errors that can occur while discovering names in a translated text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The extractor response is not a JSON array
    #[error("Failed to parse extracted names: {0}")]
    Parse(String),

    /// An element of the extracted array is not a valid name pair
    #[error("Invalid extracted name at index {index}: {reason}")]
    InvalidEntry {
        /// Position in the extracted array
        index: usize,
        /// Why the entry was rejected
        reason: String,
    },

    /// The extraction call itself failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ExtractionError {
    /// Whether the error came from a malformed extractor response.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::InvalidEntry { .. })
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// The page could not be read or is not a supported page
    #[error("Page error: {0}")]
    Page(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the persistence layer
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from name extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Short variant name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "FileError",
            Self::Page(_) => "PageError",
            Self::Provider(e) if e.is_auth() => "AuthError",
            Self::Provider(_) => "TransportError",
            Self::Store(_) => "StoreError",
            Self::Extraction(e) if e.is_parse_error() => "ExtractionParseError",
            Self::Extraction(_) => "ExtractionError",
            Self::Unknown(_) => "Error",
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
