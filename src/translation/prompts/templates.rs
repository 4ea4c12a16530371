/*!
 * Prompt templates for changelog translation.
 *
 * The system instruction is fixed per target language. The user message is
 * the task framing followed by the chunk and, optionally, a delimited block of
 * context hints the model must not echo.
 */

use serde::{Deserialize, Serialize};

use crate::app_config::TargetLanguage;

/// Opening delimiter of the context hint block
pub const HINT_OPEN: &str = "<<CONTEXT>>";

/// Closing delimiter of the context hint block
pub const HINT_CLOSE: &str = "<</CONTEXT>>";

/// A term with a fixed rendering in one target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedTerm {
    /// English term
    pub term: String,
    /// Required rendering
    pub rendering: String,
}

impl PinnedTerm {
    pub fn new(term: impl Into<String>, rendering: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            rendering: rendering.into(),
        }
    }
}

/// System instruction template for changelog translation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default system instruction.
    pub const CHANGELOG_TRANSLATOR: &'static str = r#"You rewrite English product changelogs in natural, idiomatic {target_language}.

## Rules
1. Translate prose only. HTML tags, JSX/MDX components, attributes, code blocks, inline code, tables and anything that looks like code stay exactly as they are.
2. Keep the original markup and structure. Do not add, remove or reorder tags, and do not introduce new markup.
3. Never add or remove code fence markers (```). Do not wrap your answer in a code block.
4. Translate headings and structural labels too.
5. Dates must use one format: {date_format}. Example: {date_example}. Keep any version identifier next to a date unchanged.
6. Do not translate word for word; understand the meaning and express it the way a native {target_language} writer would.
7. Proper nouns (capitalised product, module and feature names) stay in English. These terms must never be translated: {protected_terms}
8. These terms always use the given rendering: {pinned_terms}
9. Translate all remaining prose, even when unsure. Never skip or summarise content.
10. Text between {hint_open} and {hint_close} is background information. Do not translate it and do not include it in your answer.

Return only the translated text."#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default changelog translator template.
    pub fn changelog_translator() -> Self {
        Self::new(Self::CHANGELOG_TRANSLATOR)
    }

    /// Render the template for one language.
    pub fn render(&self, language: &TargetLanguage, protected_terms: &[String]) -> String {
        let date_format = if language.date_format.is_empty() {
            "the conventional long date format of the target language, with zero-padded month and day"
        } else {
            language.date_format.as_str()
        };
        let date_example = if language.date_example.is_empty() {
            "none given"
        } else {
            language.date_example.as_str()
        };

        let pinned: Vec<String> = language
            .pinned_terms
            .iter()
            .map(|p| format!("'{}' → '{}'", p.term, p.rendering))
            .collect();

        self.template
            .replace("{target_language}", &language.display_name())
            .replace("{date_format}", date_format)
            .replace("{date_example}", date_example)
            .replace("{protected_terms}", &quoted_list(protected_terms.iter().map(String::as_str)))
            .replace("{pinned_terms}", &quoted_list(pinned.iter().map(String::as_str)))
            .replace("{hint_open}", HINT_OPEN)
            .replace("{hint_close}", HINT_CLOSE)
    }

    /// The instruction for a language: its explicit prompt, or the rendered template
    pub fn instruction_for(&self, language: &TargetLanguage, protected_terms: &[String]) -> String {
        if language.system_prompt.trim().is_empty() {
            self.render(language, protected_terms)
        } else {
            language.system_prompt.clone()
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::changelog_translator()
    }
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<String> = items
        .map(|item| {
            if item.starts_with('\'') {
                item.to_string()
            } else {
                format!("'{}'", item)
            }
        })
        .collect();
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Position of a chunk and the entries around it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextHint {
    /// 1-based chunk index
    pub index: usize,
    /// Number of chunks in the document
    pub total: usize,
    /// Last entry heading before this chunk
    pub preceding_entry: Option<String>,
    /// First entry heading after this chunk
    pub following_entry: Option<String>,
}

impl ContextHint {
    /// Render the delimited hint block
    pub fn render(&self) -> String {
        let mut lines = vec![format!("This is part {} of {} of one changelog.", self.index, self.total)];
        if let Some(preceding) = &self.preceding_entry {
            lines.push(format!("The previous part ended in the entry: {}", preceding));
        }
        if let Some(following) = &self.following_entry {
            lines.push(format!("The next part starts with the entry: {}", following));
        }
        format!("{}\n{}\n{}", HINT_OPEN, lines.join("\n"), HINT_CLOSE)
    }
}

/// Builds the user message for one chunk.
#[derive(Debug, Clone)]
pub struct TranslationPromptBuilder {
    prefix: String,
    hint: Option<ContextHint>,
}

impl TranslationPromptBuilder {
    /// Create a builder with the task framing prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            hint: None,
        }
    }

    /// Attach context hints
    pub fn with_hint(mut self, hint: Option<ContextHint>) -> Self {
        self.hint = hint;
        self
    }

    /// Build the user message
    pub fn build(&self, chunk_text: &str) -> String {
        let mut message = String::with_capacity(self.prefix.len() + chunk_text.len() + 256);
        message.push_str(&self.prefix);
        message.push_str(chunk_text);
        if let Some(hint) = &self.hint {
            message.push_str("\n\n");
            message.push_str(&hint.render());
        }
        message
    }
}

/// Remove any hint block (or stray delimiter) the model copied into its answer
pub fn strip_leaked_hints(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(HINT_OPEN) {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + HINT_OPEN.len()..];
        rest = match after_open.find(HINT_CLOSE) {
            Some(close) => &after_open[close + HINT_CLOSE.len()..],
            None => "",
        };
    }
    result.push_str(rest);

    result.replace(HINT_CLOSE, "").trim().to_string()
}
