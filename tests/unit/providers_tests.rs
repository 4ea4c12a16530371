/*!
 * Tests for the provider implementations
 */

use changelog_translator::app_config::{TranslationConfig, TranslationProvider};
use changelog_translator::errors::ProviderError;
use changelog_translator::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use changelog_translator::providers::mock::MockProvider;
use changelog_translator::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use changelog_translator::providers::{create_provider, CompletionRequest, Provider};

fn request(user: &str) -> CompletionRequest {
    CompletionRequest {
        system: "Translate to Korean".to_string(),
        user: user.to_string(),
        temperature: 0.0,
        max_tokens: 256,
    }
}

/// Test the OpenAI provider against the live API
#[tokio::test]
#[ignore]
async fn test_openai_provider_withValidApiKey_shouldComplete() {
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        return;
    }

    let client = OpenAI::new(api_key, "https://api.openai.com/v1", "gpt-4o-mini", 60);
    let response = client.complete(request("## Dec 04, 2025")).await.unwrap();
    assert!(!response.text.is_empty());
}

/// Test the Anthropic provider against the live API
#[tokio::test]
#[ignore]
async fn test_anthropic_provider_withValidApiKey_shouldComplete() {
    let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        return;
    }

    let client = Anthropic::new(api_key, "https://api.anthropic.com", "claude-3-haiku-20240307", 60);
    let response = client.complete(request("## Dec 04, 2025")).await.unwrap();
    assert!(!response.text.is_empty());
}

/// Unreachable servers surface as provider errors, not panics
#[tokio::test]
async fn test_openai_provider_withUnreachableEndpoint_shouldReturnError() {
    let client = OpenAI::new("key", "http://127.0.0.1:9/v1", "model", 2);
    let result = client.complete(request("Hello")).await;
    assert!(result.is_err());
}

#[test]
fn test_createProvider_withEachProvider_shouldReportName() {
    let mut config = TranslationConfig::default();
    assert_eq!(create_provider(&config).unwrap().name(), "OpenAI");

    config.provider = TranslationProvider::Anthropic;
    assert_eq!(create_provider(&config).unwrap().name(), "Anthropic");

    config.provider = TranslationProvider::LMStudio;
    assert_eq!(create_provider(&config).unwrap().name(), "LM Studio");
}

#[test]
fn test_createProvider_withRelativeEndpoint_shouldReturnInvalidEndpoint() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Anthropic;
    config.active_provider_config_mut().endpoint = "/v1/messages".to_string();

    let error = create_provider(&config).unwrap_err();
    assert!(matches!(error, ProviderError::InvalidEndpoint(_)));
    assert!(error.to_string().contains("/v1/messages"));
}

#[test]
fn test_openaiRequest_builder_shouldSerializeMessagesInOrder() {
    let request = OpenAIRequest::new("gpt-4o-mini")
        .add_message("system", "rules")
        .add_message("user", "text")
        .temperature(0.0)
        .max_tokens(512);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["content"], "text");
    assert_eq!(json["max_tokens"], 512);
    assert_eq!(json["stream"], false);
}

#[test]
fn test_openaiResponse_withNullContent_shouldHaveNoText() {
    let response: OpenAIResponse = serde_json::from_str(
        r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"length"}]}"#,
    )
    .unwrap();
    assert_eq!(response.first_content(), None);

    let response: OpenAIResponse =
        serde_json::from_str(r#"{"choices":[{"message":{"content":"안녕"}}],"usage":{"prompt_tokens":3,"completion_tokens":1}}"#)
            .unwrap();
    assert_eq!(response.first_content(), Some("안녕"));
}

#[test]
fn test_anthropicRequest_builder_shouldCarrySystemSeparately() {
    let request = AnthropicRequest::new("claude-3-haiku-20240307", 1024)
        .system("rules")
        .add_message("user", "text")
        .temperature(0.0);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["system"], "rules");
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["max_tokens"], 1024);
}

#[test]
fn test_anthropicResponse_extractText_shouldJoinTextBlocks() {
    let response: AnthropicResponse = serde_json::from_str(
        r###"{"content":[{"type":"text","text":"## 2025년 "},{"type":"text","text":"12월 04일"}]}"###,
    )
    .unwrap();
    assert_eq!(Anthropic::extract_text_from_response(&response), "## 2025년 12월 04일");
}

#[tokio::test]
async fn test_mockProvider_failingFirst_shouldRecoverAfterFailures() {
    let provider = MockProvider::failing_first(2);

    assert!(matches!(
        provider.complete(request("a")).await,
        Err(ProviderError::ConnectionError(_))
    ));
    assert!(provider.complete(request("b")).await.is_err());
    let response = provider.complete(request("c")).await.unwrap();

    assert_eq!(response.text, "[TRANSLATED] c");
    assert_eq!(provider.request_count(), 3);
    assert_eq!(provider.requests()[2].user, "c");
}
