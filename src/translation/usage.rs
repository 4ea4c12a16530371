/*!
 * Token usage accounting shared by all pairs of a run.
 */

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::providers::CompletionResponse;

/// Totals accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotals {
    /// Successful provider calls
    pub requests: u64,
    /// Failed provider calls (each retry counts)
    pub failed_requests: u64,
    /// Prompt tokens reported by providers
    pub prompt_tokens: u64,
    /// Completion tokens reported by providers
    pub completion_tokens: u64,
    /// Time spent waiting on provider calls
    pub api_duration: Duration,
}

impl UsageTotals {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Thread-safe usage counters
#[derive(Debug)]
pub struct UsageStats {
    /// Provider name
    provider: String,
    /// Model name
    model: String,
    /// Start of the run
    start_time: Instant,
    totals: Mutex<UsageTotals>,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageStats {
    pub fn new() -> Self {
        Self::with_provider_info(String::new(), String::new())
    }

    /// Create new usage stats with provider info
    pub fn with_provider_info(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            start_time: Instant::now(),
            totals: Mutex::new(UsageTotals::default()),
        }
    }

    /// Record a successful call
    pub fn record(&self, response: &CompletionResponse, duration: Duration) {
        let mut totals = self.totals.lock();
        totals.requests += 1;
        totals.prompt_tokens += response.prompt_tokens.unwrap_or(0);
        totals.completion_tokens += response.completion_tokens.unwrap_or(0);
        totals.api_duration += duration;
    }

    /// Record a failed call
    pub fn record_failure(&self, duration: Duration) {
        let mut totals = self.totals.lock();
        totals.failed_requests += 1;
        totals.api_duration += duration;
    }

    pub fn snapshot(&self) -> UsageTotals {
        *self.totals.lock()
    }

    /// Calculate tokens per minute over the time spent in provider calls
    pub fn tokens_per_minute(&self) -> f64 {
        let totals = self.snapshot();
        let minutes = totals.api_duration.as_secs_f64() / 60.0;
        if minutes > 0.0 {
            totals.total_tokens() as f64 / minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        let totals = self.snapshot();
        let mut summary = String::from("Token Usage Summary:");
        if !self.provider.is_empty() {
            summary.push_str(&format!("\n  Provider: {}", self.provider));
        }
        if !self.model.is_empty() {
            summary.push_str(&format!("\n  Model: {}", self.model));
        }
        summary.push_str(&format!(
            "\n  Requests: {} ({} failed)\
             \n  Prompt tokens: {}\
             \n  Completion tokens: {}\
             \n  Total tokens: {}\
             \n  API time: {:.1}s of {:.1}s elapsed\
             \n  Rate: {:.0} tokens/minute",
            totals.requests,
            totals.failed_requests,
            totals.prompt_tokens,
            totals.completion_tokens,
            totals.total_tokens(),
            totals.api_duration.as_secs_f64(),
            self.start_time.elapsed().as_secs_f64(),
            self.tokens_per_minute()
        ));
        summary
    }
}
