// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use changelog_translator::app_config::{self, Config, TranslationProvider};
use changelog_translator::app_controller::{Controller, RunOptions};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate changelog documents (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for changelog-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Directory holding the English documents (overrides source_dir)
    #[arg(value_name = "SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Root directory for the per-language output directories
    #[arg(short, long)]
    output_root: Option<PathBuf>,

    /// Only translate into these language codes (repeatable)
    #[arg(short = 't', long = "language", value_name = "CODE")]
    languages: Vec<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the selected provider
    #[arg(long)]
    api_key: Option<String>,

    /// OpenAI API key from the environment
    #[arg(long, env = "OPENAI_API_KEY", hide = true, hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Anthropic API key from the environment
    #[arg(long, env = "ANTHROPIC_API_KEY", hide = true, hide_env_values = true)]
    anthropic_api_key: Option<String>,

    /// Maximum characters per chunk
    #[arg(long)]
    max_chars: Option<usize>,

    /// Leave existing output files untouched
    #[arg(short, long)]
    skip_existing: bool,

    /// Locate and chunk only; no provider calls, no writes
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Changelog Translator - LLM-backed translation of Markdown/MDX changelogs
///
/// Translates the prose of changelog documents while keeping markup,
/// components and code byte-for-byte.
#[derive(Parser, Debug)]
#[command(name = "changelog-translator")]
#[command(version)]
#[command(about = "AI-powered changelog translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "changelog-translator translates Markdown/MDX changelogs into other languages using AI providers, keeping markup and code untouched.

EXAMPLES:
    changelog-translator                                  # Translate en/changelog using conf.json
    changelog-translator docs/en/changelog -o docs        # Custom source and output root
    changelog-translator -t cn --skip-existing            # Only Chinese, keep existing outputs
    changelog-translator -p anthropic -m claude-3-haiku-20240307
    changelog-translator --dry-run --log-level debug      # Show the chunk plan only
    changelog-translator completions bash > changelog-translator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key, or OPENAI_API_KEY)
    anthropic - Anthropic Claude API (requires API key, or ANTHROPIC_API_KEY)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger filters through log::max_level, so it accepts everything here
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("changelog_translator")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "changelog-translator", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        // Default behavior - top-level args work like `translate`
        None => run_translate(cli.translate).await,
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &TranslateArgs) -> Result<()> {
    if let Some(source_dir) = &options.source_dir {
        config.source_dir = source_dir.clone();
    }

    if let Some(output_root) = &options.output_root {
        config.output_root = output_root.clone();
    }

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }

    // Explicit flag first, then the provider's environment variable if the config has no key
    let env_key = match config.translation.provider {
        TranslationProvider::OpenAI => options.openai_api_key.as_ref(),
        TranslationProvider::Anthropic => options.anthropic_api_key.as_ref(),
        TranslationProvider::LMStudio => None,
    };
    if let Some(api_key) = options.api_key.as_ref() {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    } else if let Some(api_key) = env_key {
        let provider_config = config.translation.active_provider_config_mut();
        if provider_config.api_key.is_empty() {
            provider_config.api_key = api_key.clone();
        }
    }

    if let Some(max_chars) = options.max_chars {
        config.chunking.max_chars = max_chars;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.restrict_languages(&options.languages)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let mut config = Config::load_or_create(Path::new(&options.config))?;
    apply_overrides(&mut config, &options)?;

    // A dry run never calls the provider, so it does not need credentials
    if !options.dry_run {
        config.validate().context("Configuration validation failed")?;
    }

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    info!(
        "Translating {:?} with {} ({}) into: {}",
        config.source_dir,
        config.translation.provider.display_name(),
        config.translation.get_model(),
        config
            .target_languages
            .iter()
            .map(|l| l.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Create controller
    let controller = Controller::with_config(config)?;
    controller
        .run(RunOptions {
            skip_existing: options.skip_existing,
            dry_run: options.dry_run,
        })
        .await?;

    Ok(())
}
