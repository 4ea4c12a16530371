/*!
 * Tests for error types and conversions
 */

use changelog_translator::errors::{AppError, ProviderError, TranslationError};
use std::error::Error;

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection reset".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection reset"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_providerError_fromStatus_shouldPickVariant() {
    assert!(matches!(
        ProviderError::from_status(401, "bad key".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(429, "slow down".to_string()),
        ProviderError::RateLimitExceeded(_)
    ));
    assert!(matches!(
        ProviderError::from_status(503, "busy".to_string()),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[test]
fn test_translationError_chunkFailed_shouldNameChunkAndKeepSource() {
    let error = TranslationError::ChunkFailed {
        index: 3,
        total: 7,
        attempts: 5,
        source: ProviderError::EmptyResponse,
    };

    let display = format!("{}", error);
    assert!(display.contains("chunk 3/7"));
    assert!(display.contains("5 attempts"));
    assert_eq!(error.chunk_index(), Some(3));
    assert!(error.source().is_some());
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::ConnectionError("timeout".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(_)));
    assert_eq!(error.chunk_index(), None);
}

#[test]
fn test_appError_conversions_shouldMapToVariants() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.mdx");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
    assert!(app_error.to_string().contains("missing.mdx"));

    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(_)));

    let app_error: AppError = ProviderError::EmptyResponse.into();
    assert!(matches!(app_error, AppError::Provider(_)));

    let translation_error = TranslationError::Provider(ProviderError::EmptyResponse);
    let app_error: AppError = translation_error.into();
    assert!(app_error.to_string().starts_with("Translation error"));
}
