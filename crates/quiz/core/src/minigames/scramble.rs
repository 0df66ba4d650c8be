use rand::Rng;
use rand::seq::SliceRandom;

const RESHUFFLE_ATTEMPTS: usize = 10;

/// A word with its letters shuffled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scramble {
    answer: String,
    letters: Vec<char>,
    solved: bool,
}

impl Scramble {
    /// Shuffles the uppercase letters of `word`, avoiding the original order
    /// when the letters allow it.
    pub fn new<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Self {
        let answer = word.to_uppercase();
        let original: Vec<char> = answer.chars().collect();
        let mut letters = original.clone();

        for _ in 0..RESHUFFLE_ATTEMPTS {
            letters.shuffle(rng);
            if letters != original {
                break;
            }
        }

        Self {
            answer,
            letters,
            solved: false,
        }
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn scrambled(&self) -> String {
        self.letters.iter().collect()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Case-insensitive check. A correct guess solves the puzzle.
    pub fn check(&mut self, guess: &str) -> bool {
        let correct = guess.trim().to_uppercase() == self.answer;
        if correct {
            self.solved = true;
        }
        correct
    }
}
