/*!
 * Provider implementations for the external completion capability.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// One completion request, independent of the provider transport
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User message (task framing + chunk + hints)
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

/// Text returned by a provider, with optional token accounting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Generated text
    pub text: String,
    /// Prompt tokens, when reported
    pub prompt_tokens: Option<u64>,
    /// Completion tokens, when reported
    pub completion_tokens: Option<u64>,
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation invoker.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human-readable provider name for logs
    fn name(&self) -> &str;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<CompletionResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}

/// Build the provider selected in the configuration
///
/// Fails when the endpoint is not an absolute http(s) URL.
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let endpoint = config.get_endpoint();
    let parsed = Url::parse(&endpoint).map_err(|e| ProviderError::InvalidEndpoint(format!("{} ({})", endpoint, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ProviderError::InvalidEndpoint(endpoint));
    }

    let timeout_secs = config.get_timeout_secs();
    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::OpenAI => Arc::new(openai::OpenAI::new(
            config.get_api_key(),
            config.get_endpoint(),
            config.get_model(),
            timeout_secs,
        )),
        TranslationProvider::LMStudio => {
            // LM Studio often doesn't require an API key; use a default if empty
            let api_key = {
                let k = config.get_api_key();
                if k.is_empty() { "lm-studio".to_string() } else { k }
            };
            Arc::new(
                openai::OpenAI::new(api_key, config.get_endpoint(), config.get_model(), timeout_secs)
                    .with_name("LM Studio"),
            )
        }
        TranslationProvider::Anthropic => Arc::new(anthropic::Anthropic::new(
            config.get_api_key(),
            config.get_endpoint(),
            config.get_model(),
            timeout_secs,
        )),
    };
    Ok(provider)
}

pub mod anthropic;
pub mod mock;
pub mod openai;
