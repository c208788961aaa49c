use std::collections::HashSet;

use crate::coach::{FeedbackError, FeedbackProvider};
use crate::session::judge::WordStat;
use crate::session::metrics;

const MIN_FOCUS_WORDS: usize = 3;
const MAX_FOCUS_WORDS: usize = 5;
const TIPS: usize = 3;

/// A word is "slow" when its per-character time exceeds the session median by this factor.
const SLOW_FACTOR: f64 = 1.5;

/// Offline coach: ranks the words the user struggled with and picks tips from what went wrong.
pub struct LocalCoach {
    slow_factor: f64,
}

impl Default for LocalCoach {
    fn default() -> Self {
        Self {
            slow_factor: SLOW_FACTOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Struggle {
    pub word: String,
    pub score: f64,
    pub ms_per_char: f64,
}

fn ms_per_char(stat: &WordStat) -> f64 {
    stat.time_to_type_ms as f64 / stat.char_count().max(1) as f64
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

impl LocalCoach {
    /// Words ranked by how much trouble they caused, 3 to 5 of them when enough exist.
    pub fn struggles(&self, stats: &[WordStat]) -> Vec<Struggle> {
        let mut speeds: Vec<f64> = stats.iter().map(ms_per_char).collect();
        let median_speed = median(&mut speeds);

        let mut ranked: Vec<Struggle> = stats
            .iter()
            .map(|s| {
                let speed = ms_per_char(s);
                let mut score = s.backspaces as f64;
                if !s.correct {
                    score += 3.0;
                }
                if median_speed > 0.0 && speed > median_speed * self.slow_factor {
                    score += speed / median_speed - 1.0;
                }
                Struggle {
                    word: s.word.clone(),
                    score,
                    ms_per_char: speed,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(b.ms_per_char.total_cmp(&a.ms_per_char))
        });

        let mut seen = HashSet::new();
        let mut picked: Vec<Struggle> = Vec::new();
        for s in ranked {
            if picked.len() >= MAX_FOCUS_WORDS {
                break;
            }
            // Below the minimum, slow-but-clean words still make the list.
            if s.score <= 0.0 && picked.len() >= MIN_FOCUS_WORDS {
                break;
            }
            if seen.insert(s.word.clone()) {
                picked.push(s);
            }
        }
        picked
    }

    fn tips(&self, stats: &[WordStat]) -> Vec<&'static str> {
        let total = stats.len() as f64;
        let accuracy = metrics::accuracy_percent(stats).unwrap_or(100);
        let backspaces_per_word = stats.iter().map(|s| s.backspaces).sum::<u32>() as f64 / total;

        let mut tips = Vec::with_capacity(TIPS);
        if accuracy < 90 {
            tips.push(
                "Slow down a little. Read each word fully before you start it; accuracy builds speed, not the other way round.",
            );
        }
        if backspaces_per_word > 0.3 {
            tips.push(
                "You reach for backspace often. Keep your eyes on the next word instead of your fingers, and trust the motion.",
            );
        }
        tips.push(
            "Rest your fingers on the home row (ASDF and JKL;) and return there after every word.",
        );
        tips.push(
            "Let each finger own its column: the left index covers R, T, F, G, V and B, the right index covers Y, U, H, J, N and M.",
        );
        tips.push(
            "Practice your focus words in short bursts, aiming for an even rhythm rather than quick spurts.",
        );
        tips.truncate(TIPS);
        tips
    }
}

impl FeedbackProvider for LocalCoach {
    fn name(&self) -> &str {
        "local"
    }

    fn feedback(&self, stats: &[WordStat]) -> Result<String, FeedbackError> {
        if stats.is_empty() {
            return Err(FeedbackError::EmptyStats);
        }
        let correct = stats.iter().filter(|s| s.correct).count();
        let accuracy = metrics::accuracy_percent(stats).unwrap_or(0);

        let mut out = format!(
            "You finished {} words and got {} right ({}% accuracy). Nice work getting through it!\n\n",
            stats.len(),
            correct,
            accuracy
        );

        let focus: Vec<String> = self
            .struggles(stats)
            .into_iter()
            .map(|s| s.word)
            .collect();
        if !focus.is_empty() {
            out.push_str(&format!("Words to practice: {}.\n\n", focus.join(", ")));
        }

        for (i, tip) in self.tips(stats).iter().enumerate() {
            out.push_str(&format!("{}. {tip}\n", i + 1));
        }
        Ok(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(word: &str, ms: u64, correct: bool, backspaces: u32) -> WordStat {
        WordStat {
            word: word.to_string(),
            time_to_type_ms: ms,
            correct,
            backspaces,
        }
    }

    #[test]
    fn incorrect_and_corrected_words_rank_first() {
        let stats = vec![
            stat("the", 300, true, 0),
            stat("because", 700, false, 0),
            stat("people", 600, true, 4),
            stat("and", 300, true, 0),
            stat("of", 200, true, 0),
        ];
        let picked = LocalCoach::default().struggles(&stats);
        assert_eq!(picked[0].word, "people");
        assert_eq!(picked[1].word, "because");
        assert!(picked.len() >= MIN_FOCUS_WORDS);
        assert!(picked.len() <= MAX_FOCUS_WORDS);
    }

    #[test]
    fn slow_words_are_flagged() {
        let stats = vec![
            stat("cat", 300, true, 0),
            stat("dog", 300, true, 0),
            stat("sun", 300, true, 0),
            stat("map", 1500, true, 0),
        ];
        let picked = LocalCoach::default().struggles(&stats);
        assert_eq!(picked[0].word, "map");
        assert!(picked[0].score > 0.0);
    }

    #[test]
    fn at_most_five_unique_words() {
        let stats: Vec<WordStat> = (0..20)
            .map(|i| stat(if i % 2 == 0 { "hard" } else { "tough" }, 900, false, 2))
            .chain((0..10).map(|i| stat(&format!("w{i}"), 800, false, 1)))
            .collect();
        let picked = LocalCoach::default().struggles(&stats);
        assert_eq!(picked.len(), MAX_FOCUS_WORDS);
        let unique: HashSet<&str> = picked.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(unique.len(), picked.len());
    }

    #[test]
    fn short_sessions_list_what_exists() {
        let stats = vec![stat("cat", 300, true, 0)];
        let picked = LocalCoach::default().struggles(&stats);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn feedback_has_three_numbered_tips() {
        let stats = vec![
            stat("cat", 300, false, 2),
            stat("dog", 300, true, 1),
            stat("sun", 400, false, 0),
        ];
        let text = LocalCoach::default().feedback(&stats).unwrap();
        assert!(text.starts_with("You finished 3 words"));
        assert!(text.contains("1. "));
        assert!(text.contains("2. "));
        assert!(text.contains("3. "));
        assert!(!text.contains("4. "));
        assert!(text.contains("Slow down"));
        assert!(text.contains("backspace"));
        assert!(text.split_whitespace().count() < 150);
    }

    #[test]
    fn clean_session_gets_technique_tips() {
        let stats = vec![stat("cat", 300, true, 0), stat("dog", 300, true, 0)];
        let text = LocalCoach::default().feedback(&stats).unwrap();
        assert!(text.contains("100% accuracy"));
        assert!(text.contains("home row"));
        assert!(!text.contains("Slow down"));
    }

    #[test]
    fn empty_stats_are_rejected() {
        assert_eq!(
            LocalCoach::default().feedback(&[]),
            Err(FeedbackError::EmptyStats)
        );
    }
}
