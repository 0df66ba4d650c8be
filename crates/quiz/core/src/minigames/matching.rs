use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::question::{Question, QuestionId};

/// Word/definition pairs shown per round.
pub const PAIRS_PER_ROUND: usize = 4;

/// A definition card, identified by the question it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    pub id: QuestionId,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Matched,
    Mismatch,
    /// One of the cards is already matched, or the ids are unknown.
    Ignored,
}

/// Pair each word with its definition.
#[derive(Clone, Debug)]
pub struct DefinitionMatch {
    words: Vec<Question>,
    definitions: Vec<Definition>,
    matched: BTreeSet<QuestionId>,
    mistakes: u32,
}

impl DefinitionMatch {
    /// Uses the first four questions. Definitions come from each question's
    /// definition, or its prompt when it has none, in shuffled order.
    pub fn new<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Self {
        let words: Vec<Question> = questions.iter().take(PAIRS_PER_ROUND).cloned().collect();
        let mut definitions: Vec<Definition> = words
            .iter()
            .map(|q| Definition {
                id: q.id.clone(),
                text: q.definition.clone().unwrap_or_else(|| q.prompt.clone()),
            })
            .collect();
        definitions.shuffle(rng);

        Self {
            words,
            definitions,
            matched: BTreeSet::new(),
            mistakes: 0,
        }
    }

    pub fn words(&self) -> &[Question] {
        &self.words
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn try_match(&mut self, word_id: &QuestionId, definition_id: &QuestionId) -> MatchResult {
        let known = |id: &QuestionId| self.words.iter().any(|q| &q.id == id);
        if !known(word_id)
            || !known(definition_id)
            || self.matched.contains(word_id)
            || self.matched.contains(definition_id)
        {
            return MatchResult::Ignored;
        }

        if word_id == definition_id {
            self.matched.insert(word_id.clone());
            MatchResult::Matched
        } else {
            self.mistakes += 1;
            MatchResult::Mismatch
        }
    }

    pub fn is_matched(&self, id: &QuestionId) -> bool {
        self.matched.contains(id)
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn is_won(&self) -> bool {
        !self.words.is_empty() && self.matched.len() == self.words.len()
    }
}
