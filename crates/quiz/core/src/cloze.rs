//! Fill-in-the-blank questions built from example sentences.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::RegexBuilder;

use crate::question::{Question, QuestionKind};

/// Text substituted for the answer in the example sentence.
pub const GENERATED_BLANK: &str = "_____";

/// Words that fit the same sentences too easily to be fair distractors for each other.
const SEMANTIC_CLUSTERS: &[&[&str]] = &[
    &[
        "articulate",
        "incoherent",
        "unintelligible",
        "eloquent",
        "mute",
        "verbose",
        "taciturn",
        "loquacious",
    ],
    &["large", "huge", "enormous", "tiny", "small", "minuscule", "gigantic", "massive"],
    &["fast", "quick", "rapid", "slow", "sluggish", "swift", "gradual", "hasty"],
    &["happy", "sad", "joyful", "melancholy", "ecstatic", "depressed", "elated", "gloomy"],
    &[
        "easy",
        "hard",
        "simple",
        "complex",
        "difficult",
        "straightforward",
        "arduous",
        "effortless",
    ],
];

/// Difficulty assumed for distance scoring when a question has none.
const NEUTRAL_DIFFICULTY: i32 = 5;
const THEME_MISMATCH_SCORE: i32 = 10;

#[derive(Clone, Debug)]
pub struct ClozeGenerator {
    distractor_count: usize,
}

impl Default for ClozeGenerator {
    fn default() -> Self {
        Self {
            distractor_count: 3,
        }
    }
}

impl ClozeGenerator {
    pub fn new(distractor_count: usize) -> Self {
        Self { distractor_count }
    }

    /// Builds a cloze question from `target`'s example sentence.
    ///
    /// Returns `None` when the target has no example or the example does not
    /// contain the answer as a whole word.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        target: &Question,
        pool: &[Question],
        rng: &mut R,
    ) -> Option<Question> {
        let example = target.example.as_deref()?;
        if target.answer.is_empty() {
            return None;
        }

        let pattern = format!(r"\b{}\b", regex::escape(&target.answer));
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .ok()?;

        if !re.is_match(example) {
            tracing::warn!(
                answer = %target.answer,
                example,
                "Answer not found in example sentence"
            );
            return None;
        }
        let formatted_text = re.replace_all(example, GENERATED_BLANK).into_owned();

        let mut word_bank = self.distractors(target, pool, rng);
        word_bank.push(target.answer.clone());
        word_bank.shuffle(rng);

        Some(Question {
            id: format!("cloze_{}", target.id).into(),
            theme: target.theme.clone(),
            subunit: target.subunit.clone(),
            difficulty: target.difficulty,
            prompt: formatted_text.clone(),
            answer: target.answer.clone(),
            example: target.example.clone(),
            definition: target.definition.clone(),
            kind: QuestionKind::Cloze {
                formatted_text,
                word_bank,
                target: Some(target.id.clone()),
            },
        })
    }

    /// Picks distractors that are clearly wrong in context.
    ///
    /// Candidates sharing the answer's semantic cluster are always excluded.
    /// Same-suffix words of equal length and same-initial words of similar
    /// length are excluded too, unless that leaves too few candidates.
    pub fn distractors<R: Rng + ?Sized>(
        &self,
        target: &Question,
        pool: &[Question],
        rng: &mut R,
    ) -> Vec<String> {
        let count = self.distractor_count;
        let answer = target.answer.to_lowercase();
        let answer_len = answer.chars().count();
        let answer_suffix = suffix(&answer, 3);
        let answer_initial = answer.chars().next();
        let cluster = SEMANTIC_CLUSTERS
            .iter()
            .find(|words| words.contains(&answer.as_str()))
            .copied()
            .unwrap_or(&[]);

        let eligible = |q: &&Question| {
            !q.answer.is_empty()
                && q.answer != target.answer
                && !cluster.contains(&q.answer.to_lowercase().as_str())
        };

        let mut candidates: Vec<&Question> = pool
            .iter()
            .filter(eligible)
            .filter(|q| {
                let word = q.answer.to_lowercase();
                let len = word.chars().count();
                let same_suffix = suffix(&word, 3) == answer_suffix && len == answer_len;
                let same_initial =
                    word.chars().next() == answer_initial && len.abs_diff(answer_len) <= 1;
                !same_suffix && !same_initial
            })
            .collect();

        if candidates.len() < count {
            candidates = pool.iter().filter(eligible).collect();
        }

        let target_difficulty = scoring_difficulty(target);
        candidates.sort_by_key(|q| {
            let theme_score = if q.theme != target.theme {
                THEME_MISMATCH_SCORE
            } else {
                0
            };
            std::cmp::Reverse(theme_score + (scoring_difficulty(q) - target_difficulty).abs())
        });

        let mut seen = HashSet::new();
        let mut top: Vec<String> = candidates
            .into_iter()
            .filter(|q| seen.insert(q.answer.to_lowercase()))
            .take(count * 3)
            .map(|q| q.answer.clone())
            .collect();

        top.shuffle(rng);
        top.truncate(count);
        top
    }
}

fn suffix(word: &str, n: usize) -> &str {
    let start = word
        .char_indices()
        .rev()
        .nth(n.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    &word[start..]
}

fn scoring_difficulty(q: &Question) -> i32 {
    match q.difficulty {
        Some(d) if d > 0 => i32::from(d),
        _ => NEUTRAL_DIFFICULTY,
    }
}
