/*!
 * Tests for the error taxonomy and the diagnostic block
 */

use translai::app_controller::diagnostic_markup;
use anyhow::Context;
use translai::errors::{AppError, ExtractionError, ProviderError, StoreError};
use translai::Config;

#[test]
fn test_kind_shouldMapTaxonomy() {
    let auth = AppError::from(ProviderError::AuthenticationError("rejected".to_string()));
    let missing = AppError::from(ProviderError::MissingCredential("none".to_string()));
    let transport = AppError::from(ProviderError::ConnectionError("reset".to_string()));
    let parse = AppError::from(ExtractionError::Parse("eof".to_string()));
    let store = AppError::from(StoreError::Backend("disk full".to_string()));

    assert_eq!(auth.kind(), "AuthError");
    assert_eq!(missing.kind(), "AuthError");
    assert_eq!(transport.kind(), "TransportError");
    assert_eq!(parse.kind(), "ExtractionParseError");
    assert_eq!(store.kind(), "StoreError");
}

#[test]
fn test_extractionError_fromProvider_shouldNotBeParseError() {
    let err = ExtractionError::from(ProviderError::RequestFailed("timeout".to_string()));

    assert!(!err.is_parse_error());
    assert!(ExtractionError::InvalidEntry { index: 2, reason: "x".to_string() }.is_parse_error());
}

#[test]
fn test_fromAnyhow_shouldKeepContextChain() {
    let err: AppError = anyhow::anyhow!("inner").context("outer").into();

    assert_eq!(err.to_string(), "Unknown error: outer: inner");
}

#[test]
fn test_invalidConfig_shouldReachHandlerAsContextualError() {
    let mut config = Config::default();
    config.target_language = "  ".to_string();

    let err: AppError = config
        .validate()
        .context("Configuration validation failed")
        .unwrap_err()
        .into();

    assert_eq!(err.kind(), "Error");
    assert_eq!(
        err.to_string(),
        "Unknown error: Configuration validation failed: Target language must not be empty"
    );
}

#[test]
fn test_diagnosticMarkup_shouldListCauses() {
    let err = AppError::from(ProviderError::ApiError {
        status_code: 503,
        message: "overloaded".to_string(),
    });

    let markup = diagnostic_markup(&err);

    assert!(markup.contains("\"name\": \"TransportError\""));
    assert!(markup.contains("\"message\": \"Provider error: API responded with error: 503 - overloaded\""));
    assert!(markup.contains("\"causes\": ["));
    assert!(markup.contains("503 - overloaded"));
}
