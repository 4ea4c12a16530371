/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which runs one
 * document through the whole pipeline for one target language:
 * locate → chunk → translate each chunk → reassemble.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::app_config::{Config, TargetLanguage};
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::segment::{locate, Chunk, Chunker, MarkerPair, Partition, PartitionCase};
use crate::translation::invoker::ChunkTranslator;
use crate::translation::prompts::PromptTemplate;
use crate::translation::reassembler::Reassembler;
use crate::translation::usage::UsageStats;

/// What would be sent for one document
#[derive(Debug, Clone)]
pub struct DocumentPlan {
    /// Preserved and translatable regions
    pub partition: Partition,
    /// Chunks of the translatable region
    pub chunks: Vec<Chunk>,
}

impl DocumentPlan {
    /// Human-readable one-line description
    pub fn describe(&self) -> String {
        let case = match self.partition.case {
            PartitionCase::Both => "both markers",
            PartitionCase::BeforeOnly => "leading marker only",
            PartitionCase::AfterOnly => "trailing marker only",
            PartitionCase::NoMarkers => "no markers",
        };
        let largest = self.chunks.iter().map(Chunk::char_len).max().unwrap_or(0);
        format!(
            "{}, {} preserved + {} translatable characters, {} chunks (largest {})",
            case,
            self.partition.keep_before.chars().count() + self.partition.keep_after.chars().count(),
            self.partition.translatable.chars().count(),
            self.chunks.len(),
            largest
        )
    }
}

/// Translation service for changelog documents
#[derive(Debug, Clone)]
pub struct TranslationService {
    translator: ChunkTranslator,
    markers: MarkerPair,
    chunker: Chunker,
    reassembler: Reassembler,
    template: PromptTemplate,
    protected_terms: Vec<String>,
}

impl TranslationService {
    /// Create a service using `provider` for all completions
    pub fn new(provider: Arc<dyn Provider>, config: &Config) -> Self {
        let translator = ChunkTranslator::new(provider, &config.translation.common)
            .with_heading_prefix(config.post_process.heading_prefix.clone());

        Self {
            translator,
            markers: config.markers.marker_pair(),
            chunker: config.chunking.chunker(),
            reassembler: Reassembler::new(config.post_process.repair_options()),
            template: PromptTemplate::default(),
            protected_terms: config.glossary.protected_terms.clone(),
        }
    }

    /// Share usage counters with the rest of the run
    pub fn with_usage(mut self, usage: Arc<UsageStats>) -> Self {
        self.translator = self.translator.with_usage(usage);
        self
    }

    pub fn usage(&self) -> &Arc<UsageStats> {
        self.translator.usage()
    }

    /// The fixed instruction for a language
    pub fn system_prompt(&self, language: &TargetLanguage) -> String {
        self.template.instruction_for(language, &self.protected_terms)
    }

    /// Locate and chunk a document without translating it
    pub fn plan(&self, text: &str) -> DocumentPlan {
        let partition = locate(text, &self.markers);
        let chunks = if partition.has_translatable() {
            self.chunker.split(&partition.translatable)
        } else {
            Vec::new()
        };
        DocumentPlan { partition, chunks }
    }

    /// Translate one document into one language
    ///
    /// Either every chunk succeeds and the full document is returned, or the
    /// first chunk that exhausts its retries fails the whole document.
    pub async fn translate_document(&self, text: &str, language: &TargetLanguage) -> Result<String, TranslationError> {
        let plan = self.plan(text);
        if plan.chunks.is_empty() {
            info!("Nothing to translate for {}, keeping preserved regions only", language.code);
            return Ok(self.reassembler.reassemble::<String>(&plan.partition, &[]));
        }

        debug!("[{}] {}", language.code, plan.describe());
        let system_prompt = self.system_prompt(language);
        let translated = self.translator.translate_all(&plan.chunks, &system_prompt).await?;

        Ok(self.reassembler.reassemble(&plan.partition, &translated))
    }
}
