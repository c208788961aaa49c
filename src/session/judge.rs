use serde::{Deserialize, Serialize};

/// Per-word record appended when the user submits a word.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStat {
    pub word: String,
    pub time_to_type_ms: u64,
    pub correct: bool,
    pub backspaces: u32,
}

impl WordStat {
    pub fn char_count(&self) -> usize {
        self.word.chars().count()
    }
}

/// Judge a submitted word. Only the typed input is trimmed; the target is compared as-is.
pub fn finalize(target: &str, typed: &str, elapsed_ms: u64, backspaces: u32) -> WordStat {
    WordStat {
        word: target.to_string(),
        time_to_type_ms: elapsed_ms,
        correct: typed.trim() == target,
        backspaces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_correct() {
        let stat = finalize("cat", "cat", 420, 0);
        assert!(stat.correct);
        assert_eq!(stat.word, "cat");
        assert_eq!(stat.time_to_type_ms, 420);
        assert_eq!(stat.backspaces, 0);
    }

    #[test]
    fn transposed_letters_are_incorrect() {
        let stat = finalize("cat", "cta", 300, 0);
        assert!(!stat.correct);
        assert_eq!(stat.word, "cat");
    }

    #[test]
    fn surrounding_whitespace_in_input_is_ignored() {
        assert!(finalize("dog", "  dog ", 0, 0).correct);
        assert!(finalize("dog", "dog\t", 0, 0).correct);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!finalize("America", "america", 0, 0).correct);
        assert!(finalize("I", "I", 0, 0).correct);
        assert!(!finalize("I", "i", 0, 0).correct);
    }

    #[test]
    fn target_is_not_trimmed() {
        // A padded vocabulary entry can never be matched.
        assert!(!finalize(" cat", "cat", 0, 0).correct);
        assert!(!finalize(" cat", " cat", 0, 0).correct);
    }

    #[test]
    fn backspaces_are_carried_through() {
        let stat = finalize("word", "word", 900, 3);
        assert!(stat.correct);
        assert_eq!(stat.backspaces, 3);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let stat = finalize("cat", "cat", 250, 1);
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json["word"], "cat");
        assert_eq!(json["timeToTypeMs"], 250);
        assert_eq!(json["correct"], true);
        assert_eq!(json["backspaces"], 1);
    }

    #[test]
    fn char_count_uses_chars_not_bytes() {
        let stat = finalize("café", "café", 0, 0);
        assert_eq!(stat.char_count(), 4);
    }
}
