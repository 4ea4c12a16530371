/*!
 * Chunk-by-chunk calls to the completion provider.
 *
 * Chunks of one document are translated strictly in order, each under a
 * bounded retry policy with exponential backoff.
 */

use log::{debug, error, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationCommonConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{CompletionRequest, Provider};
use crate::segment::{heading_lines, Chunk};
use crate::translation::prompts::{strip_leaked_hints, ContextHint, TranslationPromptBuilder};
use crate::translation::usage::UsageStats;

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per chunk, first one included
    pub max_attempts: u32,
    /// Base delay, doubled on each retry
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base: Duration::from_millis(backoff_base_ms),
        }
    }

    /// Delay after the failed attempt `attempt` (1-based): `base * 2^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl From<&TranslationCommonConfig> for RetryPolicy {
    fn from(common: &TranslationCommonConfig) -> Self {
        Self::new(common.max_attempts, common.retry_backoff_ms)
    }
}

/// Translates the chunks of one document through a provider
#[derive(Debug, Clone)]
pub struct ChunkTranslator {
    provider: Arc<dyn Provider>,
    retry: RetryPolicy,
    temperature: f32,
    max_tokens: u32,
    user_prompt_prefix: String,
    context_hints: bool,
    heading_prefix: String,
    usage: Arc<UsageStats>,
}

impl ChunkTranslator {
    pub fn new(provider: Arc<dyn Provider>, common: &TranslationCommonConfig) -> Self {
        Self {
            provider,
            retry: RetryPolicy::from(common),
            temperature: common.temperature,
            max_tokens: common.max_tokens,
            user_prompt_prefix: common.user_prompt_prefix.clone(),
            context_hints: common.context_hints,
            heading_prefix: "## ".to_string(),
            usage: Arc::new(UsageStats::new()),
        }
    }

    /// Heading prefix used to name neighbouring entries in context hints
    pub fn with_heading_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.heading_prefix = prefix.into();
        self
    }

    /// Share usage counters with other translators
    pub fn with_usage(mut self, usage: Arc<UsageStats>) -> Self {
        self.usage = usage;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn usage(&self) -> &Arc<UsageStats> {
        &self.usage
    }

    /// Translate a single standalone chunk
    pub async fn translate_chunk(&self, chunk_text: &str, system_prompt: &str) -> Result<String, TranslationError> {
        self.translate_with_hint(1, 1, chunk_text, system_prompt, None).await
    }

    /// Translate all chunks in order; the first terminal failure aborts the document
    pub async fn translate_all(&self, chunks: &[Chunk], system_prompt: &str) -> Result<Vec<String>, TranslationError> {
        let total = chunks.len();
        let mut translated = Vec::with_capacity(total);

        for (position, chunk) in chunks.iter().enumerate() {
            debug!("Translating chunk {}/{} ({} characters)", chunk.index, total, chunk.char_len());
            let hint = if self.context_hints && total > 1 {
                Some(self.context_hint(chunks, position))
            } else {
                None
            };
            let text = self
                .translate_with_hint(chunk.index, total, &chunk.text, system_prompt, hint)
                .await?;
            translated.push(text);
        }

        Ok(translated)
    }

    /// Position of a chunk and the nearest entry headings around it
    pub fn context_hint(&self, chunks: &[Chunk], position: usize) -> ContextHint {
        let preceding_entry = chunks[..position].iter().rev().find_map(|chunk| {
            heading_lines(&chunk.text, &self.heading_prefix)
                .last()
                .map(|h| h.title.to_string())
        });
        let following_entry = chunks.iter().skip(position + 1).find_map(|chunk| {
            heading_lines(&chunk.text, &self.heading_prefix)
                .first()
                .map(|h| h.title.to_string())
        });

        ContextHint {
            index: position + 1,
            total: chunks.len(),
            preceding_entry,
            following_entry,
        }
    }

    async fn translate_with_hint(
        &self,
        index: usize,
        total: usize,
        chunk_text: &str,
        system_prompt: &str,
        hint: Option<ContextHint>,
    ) -> Result<String, TranslationError> {
        let request = CompletionRequest {
            system: system_prompt.to_string(),
            user: TranslationPromptBuilder::new(&self.user_prompt_prefix)
                .with_hint(hint)
                .build(chunk_text),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            let started = Instant::now();
            let outcome = self.provider.complete(request.clone()).await.and_then(|response| {
                let text = strip_leaked_hints(&response.text);
                if text.is_empty() {
                    Err(ProviderError::EmptyResponse)
                } else {
                    Ok((text, response))
                }
            });

            match outcome {
                Ok((text, response)) => {
                    self.usage.record(&response, started.elapsed());
                    return Ok(text);
                }
                Err(e) => {
                    self.usage.record_failure(started.elapsed());
                    if attempt >= self.retry.max_attempts {
                        error!(
                            "Chunk {}/{} failed after {} attempts with {}: {}",
                            index,
                            total,
                            attempt,
                            self.provider.name(),
                            e
                        );
                        return Err(TranslationError::ChunkFailed {
                            index,
                            total,
                            attempts: attempt,
                            source: e,
                        });
                    }

                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "Chunk {}/{} request failed, retrying after {}ms (attempt {}/{}): {}",
                        index,
                        total,
                        delay.as_millis(),
                        attempt,
                        self.retry.max_attempts,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
