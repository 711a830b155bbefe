use std::collections::HashSet;

use heck::ToPascalCase;

/// Characters that separate words when turning an API identifier into a
/// camelCase name. Underscores and dots are kept as part of the name.
pub const NON_NAME_ELEMENTS: [char; 4] = ['-', ':', ';', '#'];

/// JavaScript reserved words, plus the strict-mode and module-scope ones.
const JAVASCRIPT_RESERVED_WORDS: &[&str] = &[
    "abstract", "arguments", "await", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "debugger", "default", "delete", "do", "double", "else",
    "enum", "eval", "export", "extends", "false", "final", "finally", "float", "for",
    "function", "goto", "if", "implements", "import", "in", "instanceof", "int", "interface",
    "let", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "typeof", "var", "void", "volatile", "while", "with", "yield",
];

/// Identifiers that collide with implementation-language keywords.
///
/// Membership is case-insensitive.
#[derive(Debug, Clone)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn javascript() -> Self {
        Self::new(JAVASCRIPT_RESERVED_WORDS)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Turns API identifiers into names that are safe to emit as JavaScript.
#[derive(Debug, Clone)]
pub struct NameSanitizer {
    reserved: ReservedWords,
}

impl NameSanitizer {
    pub fn new(reserved: ReservedWords) -> Self {
        Self { reserved }
    }

    pub fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    pub fn is_reserved_word(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Prefix reserved words with an underscore.
    ///
    /// Non-reserved names pass through unchanged. `_` followed by a word is
    /// never itself reserved, so applying this twice equals applying it once.
    pub fn escape_reserved_word(&self, name: &str) -> String {
        if self.is_reserved_word(name) {
            format!("_{name}")
        } else {
            name.to_string()
        }
    }

    /// camelCase the identifier, then escape it if it is reserved.
    pub fn sanitize(&self, name: &str) -> String {
        let camel = remove_non_name_element_to_camel_case(name);
        self.escape_reserved_word(&camel)
    }
}

impl Default for NameSanitizer {
    fn default() -> Self {
        Self::new(ReservedWords::javascript())
    }
}

/// Split at [`NON_NAME_ELEMENTS`], capitalize each part and lowercase the first letter.
///
/// - `pet-store` → `petStore`
/// - `x-rate:limit` → `xRateLimit`
/// - `find_by_id` → `find_by_id`
pub fn remove_non_name_element_to_camel_case(name: &str) -> String {
    let joined: String = name
        .split(NON_NAME_ELEMENTS)
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect();

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Base name for a per-tag API file: `pet` → `PetApi`, empty → `DefaultApi`.
pub fn to_api_filename(tag: &str) -> String {
    let base = tag.to_pascal_case();
    if base.is_empty() {
        "DefaultApi".to_string()
    } else {
        format!("{base}Api")
    }
}

/// Backslash-escape double quotes. Nothing else is touched.
pub fn escape_quotation_mark(input: &str) -> String {
    input.replace('"', "\\\"")
}

/// Escape text for use inside a double-quoted JavaScript or JSON string literal.
///
/// Backslashes, double quotes, control characters and the U+2028/U+2029 line
/// separators are escaped, so the literal cannot be closed early.
pub fn escape_string_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Neutralize sequences that would open or close a block comment in generated
/// JavaScript, so API text placed in doc comments cannot escape them.
pub fn escape_unsafe_characters(input: &str) -> String {
    input.replace("*/", "*_/").replace("/*", "/_*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_separators() {
        assert_eq!(remove_non_name_element_to_camel_case("pet-store"), "petStore");
        assert_eq!(remove_non_name_element_to_camel_case("x-rate:limit"), "xRateLimit");
        assert_eq!(remove_non_name_element_to_camel_case("a;b#c"), "aBC");
    }

    #[test]
    fn test_camel_case_keeps_other_punctuation() {
        assert_eq!(remove_non_name_element_to_camel_case("find_by_id"), "find_by_id");
        assert_eq!(remove_non_name_element_to_camel_case("Pet.name"), "pet.name");
    }

    #[test]
    fn test_camel_case_leading_and_repeated_separators() {
        assert_eq!(remove_non_name_element_to_camel_case("-pet--store-"), "petStore");
        assert_eq!(remove_non_name_element_to_camel_case("::"), "");
    }

    #[test]
    fn test_escape_reserved_word() {
        let sanitizer = NameSanitizer::default();
        assert_eq!(sanitizer.escape_reserved_word("class"), "_class");
        assert_eq!(sanitizer.escape_reserved_word("pet"), "pet");
    }

    #[test]
    fn test_escape_reserved_word_case_insensitive() {
        let sanitizer = NameSanitizer::default();
        assert_eq!(sanitizer.escape_reserved_word("Delete"), "_Delete");
    }

    #[test]
    fn test_escape_reserved_word_idempotent() {
        let sanitizer = NameSanitizer::default();
        let once = sanitizer.escape_reserved_word("new");
        assert_eq!(sanitizer.escape_reserved_word(&once), once);
    }

    #[test]
    fn test_sanitize_combines_both() {
        let sanitizer = NameSanitizer::default();
        assert_eq!(sanitizer.sanitize("delete"), "_delete");
        assert_eq!(sanitizer.sanitize("get-pet#by:id"), "getPetById");
    }

    #[test]
    fn test_custom_reserved_words() {
        let sanitizer = NameSanitizer::new(ReservedWords::new(["Sample1"]));
        assert!(sanitizer.is_reserved_word("sample1"));
        assert!(!sanitizer.is_reserved_word("class"));
        assert_eq!(sanitizer.reserved_words().len(), 1);
    }

    #[test]
    fn test_to_api_filename() {
        assert_eq!(to_api_filename("pet"), "PetApi");
        assert_eq!(to_api_filename("pet-store"), "PetStoreApi");
        assert_eq!(to_api_filename(""), "DefaultApi");
    }

    #[test]
    fn test_escape_quotation_mark() {
        assert_eq!(escape_quotation_mark(r#"He said "hi""#), r#"He said \"hi\""#);
        assert_eq!(escape_quotation_mark("it's <b>&"), "it's <b>&");
    }

    #[test]
    fn test_escape_unsafe_characters() {
        assert_eq!(
            escape_unsafe_characters("ends */ here /* starts"),
            "ends *_/ here /_* starts"
        );
        assert_eq!(escape_unsafe_characters("plain text"), "plain text");
    }

    #[test]
    fn test_escape_string_literal() {
        assert_eq!(
            escape_string_literal(r#"bad\"); process.exit(1); //"#),
            r#"bad\\\"); process.exit(1); //"#
        );
        assert_eq!(
            escape_string_literal("a\nb\u{2028}c\u{1}"),
            r"a\nb\u2028c\u0001"
        );
        assert_eq!(escape_string_literal("it's fine"), "it's fine");
    }
}
