use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TargetLanguage};
use crate::file_utils::FileManager;
use crate::providers::{create_provider, Provider};
use crate::translation::{TranslationService, UsageStats};

// @module: Application controller for changelog translation

/// One (document, language) pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PairId {
    /// Source document
    pub source: PathBuf,
    /// Target language code
    pub language: String,
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source.display(), self.language)
    }
}

/// What happened to a pair that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Translated and written to the path
    Translated(PathBuf),
    /// Output already existed and skipping was requested
    Skipped(PathBuf),
    /// Dry run: located and chunked only
    Planned { chunks: usize },
}

/// Options for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave pairs whose output file exists untouched
    pub skip_existing: bool,
    /// Locate and chunk only; no provider calls, no writes
    pub dry_run: bool,
}

/// Result of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Pairs translated and written
    pub succeeded: Vec<(PairId, PathBuf)>,
    /// Pairs skipped because their output existed, with that output
    pub skipped: Vec<(PairId, PathBuf)>,
    /// Pairs planned in a dry run
    pub planned: Vec<(PairId, usize)>,
    /// Pairs that failed, with the reason
    pub failed: Vec<(PairId, String)>,
    /// Wall time of the run
    pub duration: Duration,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.planned.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// One-line summary for the log
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Processing completed: {} translated, {} skipped, {} errors",
            self.succeeded.len(),
            self.skipped.len(),
            self.failed.len()
        );
        if !self.planned.is_empty() {
            summary.push_str(&format!(", {} planned (dry run)", self.planned.len()));
        }
        summary.push_str(&format!(" - Duration: {}", format_duration(self.duration)));
        summary
    }

    fn record(&mut self, id: PairId, outcome: Result<PairOutcome>) {
        match outcome {
            Ok(PairOutcome::Translated(path)) => self.succeeded.push((id, path)),
            Ok(PairOutcome::Skipped(path)) => self.skipped.push((id, path)),
            Ok(PairOutcome::Planned { chunks }) => self.planned.push((id, chunks)),
            Err(e) => self.failed.push((id, format!("{:#}", e))),
        }
    }

    fn sort(&mut self) {
        self.succeeded.sort();
        self.skipped.sort();
        self.planned.sort();
        self.failed.sort();
    }
}

/// A pair ready to run
struct PairJob {
    id: PairId,
    language: TargetLanguage,
    content: Arc<str>,
    output_path: PathBuf,
}

// Format duration in a human-readable format
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}

/// Main application controller for changelog translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Completion provider shared by all pairs
    provider: Arc<dyn Provider>,
    // @field: Usage counters for the run
    usage: Arc<UsageStats>,
}

impl Controller {
    // @method: Create a new controller with the provider named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = create_provider(&config.translation).context("Failed to create translation provider")?;
        Ok(Self::with_provider(config, provider))
    }

    // @method: Create a controller around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        let usage = Arc::new(UsageStats::with_provider_info(
            provider.name(),
            config.translation.get_model(),
        ));
        Self { config, provider, usage }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn usage(&self) -> &Arc<UsageStats> {
        &self.usage
    }

    /// Translate every document of the source directory into every target language
    ///
    /// A failing pair is logged and recorded in the report; the other pairs
    /// still run. Only problems outside a single pair (e.g. an unreadable
    /// source directory) return an error.
    pub async fn run(&self, options: RunOptions) -> Result<RunReport> {
        let start_time = Instant::now();
        let source_dir = &self.config.source_dir;

        if !FileManager::dir_exists(source_dir) {
            warn!("Source directory not found: {:?}, skipping translation", source_dir);
            return Ok(RunReport::default());
        }

        let files = FileManager::find_files(source_dir, &self.config.extensions)
            .with_context(|| format!("Failed to list documents in {:?}", source_dir))?;
        if files.is_empty() {
            warn!("No documents with extensions {:?} found in {:?}", self.config.extensions, source_dir);
            return Ok(RunReport::default());
        }

        let mut report = RunReport::default();
        let jobs = self.build_jobs(&files, &mut report);
        info!(
            "Processing {} documents into {} languages ({} pairs)",
            files.len(),
            self.config.target_languages.len(),
            jobs.len() + report.total()
        );

        let service = TranslationService::new(Arc::clone(&self.provider), &self.config).with_usage(Arc::clone(&self.usage));
        let progress = Self::progress_bar(jobs.len() as u64);
        let concurrency = self.config.translation.common.concurrent_pairs.max(1);

        let results: Vec<(PairId, Result<PairOutcome>)> = stream::iter(jobs)
            .map(|job| {
                let service = &service;
                let progress = &progress;
                async move {
                    progress.set_message(job.id.to_string());
                    let outcome = Self::process_pair(service, &job, options).await;
                    if let Err(e) = &outcome {
                        error!("Failed: {}: {:#}", job.id, e);
                    }
                    progress.inc(1);
                    (job.id, outcome)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        progress.finish_with_message("Translation complete");

        for (id, outcome) in results {
            report.record(id, outcome);
        }
        report.sort();
        report.duration = start_time.elapsed();

        info!("{}", report.summary());
        if !options.dry_run {
            info!("{}", self.usage.summary());
        }
        for (id, reason) in &report.failed {
            warn!("Not written: {} ({})", id, reason);
        }

        Ok(report)
    }

    /// Read each document once and pair it with every language
    fn build_jobs(&self, files: &[PathBuf], report: &mut RunReport) -> Vec<PairJob> {
        let mut jobs = Vec::new();

        for file in files {
            let content: Result<Arc<str>> = FileManager::read_to_string(file).map(Arc::from);
            for language in &self.config.target_languages {
                let id = PairId {
                    source: file.clone(),
                    language: language.code.clone(),
                };
                let output_path = FileManager::mirrored_path(file, &self.config.source_dir, self.config.output_dir_for(language));

                let prepared = match (&content, output_path) {
                    (Ok(content), Ok(output_path)) => Ok((Arc::clone(content), output_path)),
                    (Err(e), _) => Err(format!("{:#}", e)),
                    (_, Err(e)) => Err(format!("{:#}", e)),
                };

                match prepared {
                    Ok((content, output_path)) => jobs.push(PairJob {
                        id,
                        language: language.clone(),
                        content,
                        output_path,
                    }),
                    Err(reason) => {
                        error!("Failed: {}: {}", id, reason);
                        report.failed.push((id, reason));
                    }
                }
            }
        }

        jobs
    }

    async fn process_pair(service: &TranslationService, job: &PairJob, options: RunOptions) -> Result<PairOutcome> {
        if options.skip_existing && FileManager::file_exists(&job.output_path) {
            warn!(
                "Skipping {}, translation already exists at {:?}",
                job.id, job.output_path
            );
            return Ok(PairOutcome::Skipped(job.output_path.clone()));
        }

        if options.dry_run {
            let plan = service.plan(&job.content);
            info!("[dry run] {}: {} → {:?}", job.id, plan.describe(), job.output_path);
            return Ok(PairOutcome::Planned {
                chunks: plan.chunks.len(),
            });
        }

        let translated = service
            .translate_document(&job.content, &job.language)
            .await
            .with_context(|| format!("Translation into {} failed", job.language.display_name()))?;

        Self::write_output(&job.output_path, &translated)?;
        info!("Success: {} → {}", job.id.source.display(), job.output_path.display());

        Ok(PairOutcome::Translated(job.output_path.clone()))
    }

    fn write_output(path: &Path, content: &str) -> Result<()> {
        FileManager::write_atomic(path, content).with_context(|| format!("Failed to write {:?}", path))
    }

    fn progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }
}
