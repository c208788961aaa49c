use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::judge::WordStat;

/// Characters per "word" in the WPM convention.
const CHARS_PER_WORD: f64 = 5.0;

/// Correct characters / 5 per minute of the configured session length, rounded half away
/// from zero. The denominator is the fixed duration, not the elapsed wall time.
pub fn words_per_minute(stats: &[WordStat], duration_secs: u32) -> u32 {
    if duration_secs == 0 {
        return 0;
    }
    let correct_chars: usize = stats
        .iter()
        .filter(|s| s.correct)
        .map(WordStat::char_count)
        .sum();
    let minutes = duration_secs as f64 / 60.0;
    ((correct_chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Percentage of submitted words that were correct. `None` when nothing was submitted.
pub fn accuracy_percent(stats: &[WordStat]) -> Option<u32> {
    if stats.is_empty() {
        return None;
    }
    let correct = stats.iter().filter(|s| s.correct).count();
    Some((100.0 * correct as f64 / stats.len() as f64).round() as u32)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub words_per_minute: u32,
    pub accuracy_percent: u32,
    pub words_submitted: usize,
    pub words_correct: usize,
    pub total_backspaces: u32,
    pub duration_secs: u32,
    pub finished_at: DateTime<Utc>,
}

impl SessionReport {
    pub fn from_stats(
        stats: &[WordStat],
        duration_secs: u32,
        finished_at: DateTime<Utc>,
    ) -> Option<Self> {
        let accuracy_percent = accuracy_percent(stats)?;
        Some(Self {
            words_per_minute: words_per_minute(stats, duration_secs),
            accuracy_percent,
            words_submitted: stats.len(),
            words_correct: stats.iter().filter(|s| s.correct).count(),
            total_backspaces: stats.iter().map(|s| s.backspaces).sum(),
            duration_secs,
            finished_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(word: &str, correct: bool) -> WordStat {
        WordStat {
            word: word.to_string(),
            time_to_type_ms: 400,
            correct,
            backspaces: 0,
        }
    }

    #[test]
    fn wpm_uses_fixed_duration() {
        // 6 chars / 5 = 1.2 words over half a minute
        let stats = vec![stat("cat", true), stat("dog", true)];
        assert_eq!(words_per_minute(&stats, 30), 2);
        assert_eq!(words_per_minute(&stats, 60), 1);
    }

    #[test]
    fn wpm_ignores_incorrect_words() {
        let stats = vec![stat("cat", false), stat("elephant", false), stat("dog", true)];
        // 3 chars / 5 / 0.5 = 1.2
        assert_eq!(words_per_minute(&stats, 30), 1);
    }

    #[test]
    fn wpm_rounds_half_away_from_zero() {
        // 5 chars over 2 minutes: 1 word / 2 min = 0.5
        let stats = vec![stat("hello", true)];
        assert_eq!(words_per_minute(&stats, 120), 1);
        // 15 chars over 2 minutes: 3 words / 2 min = 1.5
        let stats = vec![stat("hello", true), stat("world", true), stat("again", true)];
        assert_eq!(words_per_minute(&stats, 120), 2);
    }

    #[test]
    fn wpm_zero_duration_is_zero() {
        let stats = vec![stat("cat", true)];
        assert_eq!(words_per_minute(&stats, 0), 0);
    }

    #[test]
    fn wpm_empty_is_zero() {
        assert_eq!(words_per_minute(&[], 30), 0);
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        let stats = vec![stat("a", true), stat("b", true), stat("c", false)];
        assert_eq!(accuracy_percent(&stats), Some(67));
        assert_eq!(accuracy_percent(&[stat("a", true)]), Some(100));
        assert_eq!(accuracy_percent(&[stat("a", false)]), Some(0));
    }

    #[test]
    fn accuracy_of_nothing_is_none() {
        assert_eq!(accuracy_percent(&[]), None);
    }

    #[test]
    fn report_requires_stats() {
        assert!(SessionReport::from_stats(&[], 30, Utc::now()).is_none());
    }

    #[test]
    fn report_totals() {
        let mut stats = vec![stat("cat", true), stat("dog", false)];
        stats[1].backspaces = 2;
        let finished_at = Utc::now();
        let report = SessionReport::from_stats(&stats, 30, finished_at).unwrap();
        assert_eq!(report.finished_at, finished_at);
        assert_eq!(report.words_per_minute, 1);
        assert_eq!(report.accuracy_percent, 50);
        assert_eq!(report.words_submitted, 2);
        assert_eq!(report.words_correct, 1);
        assert_eq!(report.total_backspaces, 2);
        assert_eq!(report.duration_secs, 30);
    }
}
