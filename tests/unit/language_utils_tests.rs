/*!
 * Tests for language utility functions
 */

use anyhow::Result;
use changelog_translator::language_utils::{get_language_name, language_codes_match, normalize_to_part2t};

/// Test normalization of ISO codes and directory aliases
#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldReturnPart2T() -> Result<()> {
    assert_eq!(normalize_to_part2t("en")?, "eng");
    assert_eq!(normalize_to_part2t(" KO ")?, "kor");
    assert_eq!(normalize_to_part2t("jp")?, "jpn");
    assert_eq!(normalize_to_part2t("pt_BR")?, "por");
    assert_eq!(normalize_to_part2t("fre")?, "fra");
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("zz").is_err());
    Ok(())
}

/// Test language code matching across spellings
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("cn", "zh"));
    assert!(language_codes_match("zh-CN", "zho"));
    assert!(language_codes_match("kr", "ko"));
    assert!(!language_codes_match("cn", "ko"));
}

/// Test getting language names
#[test]
fn test_get_language_name_withValidCodes_shouldReturnName() -> Result<()> {
    assert_eq!(get_language_name("en")?, "English");
    assert_eq!(get_language_name("kr")?, "Korean");
    assert!(get_language_name("invalid").is_err());
    Ok(())
}
