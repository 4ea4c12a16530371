/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use changelog_translator::app_config::Config;
use changelog_translator::app_controller::{Controller, RunOptions};
use changelog_translator::errors::ProviderError;
use changelog_translator::providers::mock::MockProvider;
use changelog_translator::providers::{CompletionRequest, CompletionResponse, Provider};
use crate::common;

/// Answers with a fixed Chinese entry and refuses every Korean request
#[derive(Debug)]
struct NoKoreanProvider;

#[async_trait]
impl Provider for NoKoreanProvider {
    fn name(&self) -> &str {
        "NoKorean"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        if request.system.contains("Korean") {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: "model overloaded".to_string(),
            });
        }
        Ok(CompletionResponse {
            text: chinese_entry(),
            ..Default::default()
        })
    }
}

fn english_entry() -> String {
    common::entry("Dec 04, 2025", "Added the Lineage view.")
}

fn chinese_entry() -> String {
    common::entry("2025 年 12 月 04 日", "新增血缘视图。")
}

/// Source tree with one top-level page and one nested page
fn setup_sources(root: &Path) -> Result<Config> {
    let config = common::test_config(root);
    let document = common::changelog_document(&[english_entry()]);
    common::create_test_file(&config.source_dir, "2025.mdx", &document)?;
    common::create_test_file(&config.source_dir, "archive/2024.md", &document)?;
    common::create_test_file(&config.source_dir, "notes.txt", "not a changelog")?;
    Ok(config)
}

/// Every (document, language) pair is written under its language directory
#[tokio::test]
async fn test_run_withWorkingProvider_shouldWriteEveryPair() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = setup_sources(temp_dir.path())?;
    let reply = chinese_entry();
    let provider = Arc::new(MockProvider::working().with_custom_response(move |_| reply.clone()));
    let controller = Controller::with_provider(config, provider.clone());

    let report = controller.run(RunOptions::default()).await?;

    assert_eq!(report.succeeded.len(), 4);
    assert!(!report.has_failures());
    assert_eq!(provider.request_count(), 4);

    let expected = common::changelog_document(&[chinese_entry()]);
    for code in ["cn", "ko"] {
        let output_dir = temp_dir.path().join(code).join("changelog");
        assert_eq!(fs::read_to_string(output_dir.join("2025.mdx"))?, expected);
        assert_eq!(fs::read_to_string(output_dir.join("archive/2024.md"))?, expected);
        assert!(!output_dir.join("notes.txt").exists());
    }

    assert_eq!(controller.usage().snapshot().requests, 4);
    Ok(())
}

/// A failing pair leaves its previous output alone and does not stop the others
#[tokio::test]
async fn test_run_withFailingLanguage_shouldKeepPreviousOutputAndReportFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = setup_sources(temp_dir.path())?;
    fs::remove_dir_all(config.source_dir.join("archive"))?;
    let korean_output = common::create_test_file(temp_dir.path(), "ko/changelog/2025.mdx", "previous translation")?;
    config.translation.common.max_attempts = 2;

    let controller = Controller::with_provider(config, Arc::new(NoKoreanProvider));
    let report = controller.run(RunOptions::default()).await?;

    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.language, "ko");
    assert!(report.failed[0].1.contains("chunk 1/1 after 2 attempts"));

    assert_eq!(fs::read_to_string(&korean_output)?, "previous translation");
    assert!(temp_dir.path().join("cn/changelog/2025.mdx").exists());
    Ok(())
}

/// Existing outputs are skipped without calling the provider for them
#[tokio::test]
async fn test_run_withSkipExisting_shouldLeaveExistingOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = setup_sources(temp_dir.path())?;
    config.restrict_languages(&["cn".to_string()])?;
    let existing = common::create_test_file(temp_dir.path(), "cn/changelog/2025.mdx", "reviewed by hand")?;
    let provider = Arc::new(MockProvider::working());

    let controller = Controller::with_provider(config, provider.clone());
    let report = controller
        .run(RunOptions {
            skip_existing: true,
            dry_run: false,
        })
        .await?;

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].1, existing);
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(provider.request_count(), 1);
    assert_eq!(fs::read_to_string(&existing)?, "reviewed by hand");
    Ok(())
}

/// A dry run plans every pair but neither calls the provider nor writes
#[tokio::test]
async fn test_run_withDryRun_shouldNotProduceOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = setup_sources(temp_dir.path())?;
    let provider = Arc::new(MockProvider::failing());

    let controller = Controller::with_provider(config, provider.clone());
    let report = controller
        .run(RunOptions {
            skip_existing: false,
            dry_run: true,
        })
        .await?;

    assert_eq!(report.planned.len(), 4);
    assert!(report.planned.iter().all(|(_, chunks)| *chunks == 1));
    assert_eq!(provider.request_count(), 0);
    assert!(!temp_dir.path().join("cn").exists());
    assert!(!temp_dir.path().join("ko").exists());
    Ok(())
}

/// A missing source directory is not an error
#[tokio::test]
async fn test_run_withMissingSourceDir_shouldReturnEmptyReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let provider = Arc::new(MockProvider::working());

    let controller = Controller::with_provider(config, provider.clone());
    let report = controller.run(RunOptions::default()).await?;

    assert_eq!(report.total(), 0);
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

/// Several pairs may run at once without mixing their outputs
#[tokio::test]
async fn test_run_withConcurrentPairs_shouldWriteSameOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = setup_sources(temp_dir.path())?;
    config.translation.common.concurrent_pairs = 4;
    let provider = Arc::new(MockProvider::identity(&config.translation.common.user_prompt_prefix));

    let controller = Controller::with_provider(config, provider);
    let report = controller.run(RunOptions::default()).await?;

    assert_eq!(report.succeeded.len(), 4);
    let document = common::changelog_document(&[english_entry()]);
    assert_eq!(fs::read_to_string(temp_dir.path().join("ko/changelog/archive/2024.md"))?, document);
    assert_eq!(report.succeeded[0].0.language, "cn");
    Ok(())
}
