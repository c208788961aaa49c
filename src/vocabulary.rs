use std::fs;
use std::path::Path;

use rust_embed::Embed;
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/vocab/"]
struct VocabularyAssets;

pub const DEFAULT_VOCABULARY: &str = "common";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VocabularyError {
    #[error("unknown bundled vocabulary '{0}'")]
    Unknown(String),
    #[error("vocabulary contains no words")]
    Empty,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// Names of the word lists compiled into the binary.
pub fn bundled_names() -> Vec<String> {
    let mut names: Vec<String> = VocabularyAssets::iter()
        .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

pub fn load_bundled(name: &str) -> Result<Vec<String>, VocabularyError> {
    let file = VocabularyAssets::get(&format!("{name}.json"))
        .ok_or_else(|| VocabularyError::Unknown(name.to_string()))?;
    let words: Vec<String> = serde_json::from_slice(file.data.as_ref())?;
    clean(words)
}

/// Load a user word file: a JSON array of strings, or one word per line.
pub fn load_file(path: &Path) -> Result<Vec<String>, VocabularyError> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<Vec<String>, VocabularyError> {
    let words = if content.trim_start().starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content.lines().map(str::to_string).collect()
    };
    clean(words)
}

// Space submits a word and the judge compares targets untrimmed, so entries are split on
// whitespace at load time.
fn clean(words: Vec<String>) -> Result<Vec<String>, VocabularyError> {
    let words: Vec<String> = words
        .iter()
        .flat_map(|w| w.split_whitespace())
        .map(str::to_string)
        .collect();
    if words.is_empty() {
        return Err(VocabularyError::Empty);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_is_bundled() {
        assert!(bundled_names().contains(&DEFAULT_VOCABULARY.to_string()));
        let words = load_bundled(DEFAULT_VOCABULARY).unwrap();
        assert!(words.len() >= 200);
        assert!(words.contains(&"the".to_string()));
        assert!(words.contains(&"America".to_string()));
        assert!(words.iter().all(|w| !w.trim().is_empty() && w.trim() == w));
    }

    #[test]
    fn unknown_bundled_name() {
        assert!(matches!(
            load_bundled("klingon"),
            Err(VocabularyError::Unknown(name)) if name == "klingon"
        ));
    }

    #[test]
    fn parses_json_arrays() {
        let words = parse(r#"["cat", "dog"]"#).unwrap();
        assert_eq!(words, vec!["cat", "dog"]);
    }

    #[test]
    fn parses_line_lists_and_drops_blanks() {
        let words = parse("cat\n\n  dog  \r\nsun\n").unwrap();
        assert_eq!(words, vec!["cat", "dog", "sun"]);
    }

    #[test]
    fn multi_word_entries_are_split() {
        assert_eq!(
            parse("ice cream\nsun").unwrap(),
            vec!["ice", "cream", "sun"]
        );
        assert_eq!(
            parse(r#"["hot\tdog", " cat "]"#).unwrap(),
            vec!["hot", "dog", "cat"]
        );
    }

    #[test]
    fn empty_lists_are_rejected() {
        assert!(matches!(parse("\n \n"), Err(VocabularyError::Empty)));
        assert!(matches!(parse("[]"), Err(VocabularyError::Empty)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse("[\"cat\""), Err(VocabularyError::Parse(_))));
    }

    #[test]
    fn loads_word_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        fs::write(&path, "alpha\nbeta\n").unwrap();
        assert_eq!(load_file(&path).unwrap(), vec!["alpha", "beta"]);
        assert!(matches!(
            load_file(&dir.path().join("missing.txt")),
            Err(VocabularyError::Io(_))
        ));
    }
}
