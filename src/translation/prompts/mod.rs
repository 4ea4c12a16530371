/*!
 * Prompt construction for changelog translation.
 *
 * This module provides:
 * - The per-language system instruction template
 * - The user message builder with optional context hints
 */

pub mod templates;

// Re-export main types
pub use templates::{
    strip_leaked_hints, ContextHint, PinnedTerm, PromptTemplate, TranslationPromptBuilder, HINT_CLOSE, HINT_OPEN,
};
