/*!
 * Translation of changelog documents through a completion provider.
 *
 * - `core`: the per-document pipeline (`TranslationService`)
 * - `invoker`: ordered chunk calls with retry and backoff
 * - `prompts`: system instruction template and user message builder
 * - `reassembler`: joining, artifact repair and reattachment of preserved regions
 * - `usage`: token accounting
 */

// Re-export main types for easier usage
pub use self::core::{DocumentPlan, TranslationService};
pub use self::invoker::{ChunkTranslator, RetryPolicy};
pub use self::prompts::{PromptTemplate, TranslationPromptBuilder};
pub use self::reassembler::{Reassembler, RepairOptions};
pub use self::usage::{UsageStats, UsageTotals};

// Submodules
pub mod core;
pub mod invoker;
pub mod prompts;
pub mod reassembler;
pub mod usage;
