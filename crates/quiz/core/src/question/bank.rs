use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use super::{Question, QuestionId};

/// Theme selection for a new game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ThemeFilter {
    #[default]
    All,
    Themes(BTreeSet<String>),
}

impl ThemeFilter {
    pub fn single(theme: impl Into<String>) -> Self {
        let theme = theme.into();
        if theme == "All" {
            Self::All
        } else {
            Self::Themes(BTreeSet::from([theme]))
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        match self {
            ThemeFilter::All => true,
            ThemeFilter::Themes(themes) => question
                .theme
                .as_ref()
                .is_some_and(|theme| themes.contains(theme)),
        }
    }
}

impl FromStr for ThemeFilter {
    type Err = std::convert::Infallible;

    /// Parses `"All"`, an empty string, or a comma-separated theme list.
    /// A list naming `All` anywhere selects every theme.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let themes: BTreeSet<String> = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect();

        if themes.is_empty() || themes.contains("All") {
            Ok(Self::All)
        } else {
            Ok(Self::Themes(themes))
        }
    }
}

/// Difficulty selection for a new game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DifficultyFilter {
    #[default]
    All,
    Exact(u8),
    /// Inclusive range.
    Range(u8, u8),
}

impl DifficultyFilter {
    pub fn matches(&self, question: &Question) -> bool {
        let difficulty = question.difficulty_or_zero();
        match *self {
            DifficultyFilter::All => true,
            DifficultyFilter::Exact(n) => difficulty == n,
            DifficultyFilter::Range(min, max) => (min..=max).contains(&difficulty),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid difficulty filter `{0}`, expected `All`, `N` or `MIN-MAX`")]
pub struct ParseDifficultyError(String);

impl FromStr for DifficultyFilter {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "All" {
            return Ok(Self::All);
        }

        let invalid = || ParseDifficultyError(s.to_owned());
        match s.split_once('-') {
            Some((min, max)) => {
                let min = min.trim().parse().map_err(|_| invalid())?;
                let max = max.trim().parse().map_err(|_| invalid())?;
                Ok(Self::Range(min, max))
            }
            None => s.parse().map(Self::Exact).map_err(|_| invalid()),
        }
    }
}

/// The immutable pool of questions a game draws from.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Questions matching both filters, in source order.
    ///
    /// When nothing matches the whole pool is returned so a game can still start.
    pub fn filter(&self, theme: &ThemeFilter, difficulty: &DifficultyFilter) -> Vec<Question> {
        let filtered: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| theme.matches(q) && difficulty.matches(q))
            .cloned()
            .collect();

        if filtered.is_empty() {
            tracing::warn!(
                ?theme,
                ?difficulty,
                "No questions match filter, using the whole pool"
            );
            return self.questions.clone();
        }

        filtered
    }

    /// Questions tagged with exactly this theme.
    pub fn by_theme<'a>(&'a self, theme: &'a str) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |q| q.theme.as_deref() == Some(theme))
    }

    /// `"All"` followed by the distinct themes in sorted order.
    pub fn themes(&self) -> Vec<String> {
        let themes: BTreeSet<&str> = self
            .questions
            .iter()
            .filter_map(|q| q.theme.as_deref())
            .filter(|t| !t.is_empty())
            .collect();

        std::iter::once("All")
            .chain(themes)
            .map(str::to_owned)
            .collect()
    }

    /// Distinct lowercase answers made of exactly `len` ASCII letters, in first-seen order.
    pub fn word_pool(&self, len: usize) -> Vec<String> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .map(|q| q.answer.to_lowercase())
            .filter(|w| w.len() == len && w.bytes().all(|b| b.is_ascii_lowercase()))
            .filter(|w| seen.insert(w.clone()))
            .collect()
    }

    /// Case-insensitive membership among canonical answers.
    pub fn is_valid_word(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.questions
            .iter()
            .any(|q| q.answer.to_lowercase() == word)
    }
}

impl From<Vec<Question>> for QuestionBank {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}
