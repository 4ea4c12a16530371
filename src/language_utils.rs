use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Output directories use short codes that are not always ISO 639-1
/// (`cn` for Chinese, `kr` for Korean, `jp` for Japanese), so those
/// conventional aliases are accepted next to ISO 639-1 and ISO 639-2 codes.
///
/// ISO 639-2/B codes that differ from ISO 639-2/T, and common non-ISO aliases
const CODE_ALIASES: &[(&str, &str)] = &[
    ("cn", "zho"),
    ("kr", "kor"),
    ("jp", "jpn"),
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();
    // Region subtags (zh-CN, pt_BR) do not change the language
    let primary = normalized_code
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    if let Some((_, part2t)) = CODE_ALIASES.iter().find(|(alias, _)| *alias == primary) {
        return Ok(part2t.to_string());
    }

    match primary.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(primary) {
                return Ok(lang.to_639_3().to_string());
            }
        }
        3 => {
            if Language::from_639_3(primary).is_some() {
                return Ok(primary.to_string());
            }
        }
        _ => {}
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => code1.trim().eq_ignore_ascii_case(code2.trim()),
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
