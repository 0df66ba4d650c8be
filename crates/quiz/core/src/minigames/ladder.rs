use std::collections::{HashSet, VecDeque};

use rand::Rng;
use rand::seq::SliceRandom;

/// Fewest distinct words needed to attempt a challenge.
pub const MIN_POOL_SIZE: usize = 10;
const START_ATTEMPTS: usize = 20;

/// `true` when the words have equal length and differ in exactly one position.
pub fn is_adjacent(a: &str, b: &str) -> bool {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    a.len() == b.len() && a.iter().zip(&b).filter(|(x, y)| x != y).count() == 1
}

/// A start word, a target word and one shortest chain between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordLadder {
    pub start: String,
    pub end: String,
    pub path: Vec<String>,
}

impl WordLadder {
    /// Finds a ladder of at least `min_steps` one-letter edits within `pool`.
    ///
    /// Tries up to 20 random start words, searching breadth-first from each, so
    /// the returned path is a shortest chain to its end word.
    pub fn challenge<R: Rng + ?Sized>(
        pool: &[String],
        min_steps: usize,
        rng: &mut R,
    ) -> Option<Self> {
        if pool.len() < MIN_POOL_SIZE {
            return None;
        }

        for _ in 0..START_ATTEMPTS {
            let start = pool.choose(rng)?;
            if let Some(path) = search_from(start, pool, min_steps) {
                return Some(Self {
                    start: start.clone(),
                    end: path.last()?.clone(),
                    path,
                });
            }
        }

        None
    }

    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Checks that `chain` runs from start to end through adjacent words.
    pub fn accepts(&self, chain: &[String]) -> bool {
        chain.first() == Some(&self.start)
            && chain.last() == Some(&self.end)
            && chain.windows(2).all(|w| is_adjacent(&w[0], &w[1]))
    }
}

fn search_from(start: &str, pool: &[String], min_steps: usize) -> Option<Vec<String>> {
    let mut queue = VecDeque::from([vec![start.to_owned()]]);
    let mut visited: HashSet<&str> = HashSet::from([start]);

    while let Some(path) = queue.pop_front() {
        if path.len() - 1 >= min_steps {
            return Some(path);
        }

        let current = path.last()?.clone();
        for word in pool {
            if !visited.contains(word.as_str()) && is_adjacent(&current, word) {
                visited.insert(word.as_str());
                let mut next = path.clone();
                next.push(word.clone());
                queue.push_back(next);
            }
        }
    }

    None
}
