use std::collections::BTreeSet;

pub const MAX_LIVES: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessResult {
    Hit,
    Miss,
    /// Repeated letter, non-letter input, or a finished game.
    Ignored,
}

/// Guess-the-word game with a fixed number of lives.
///
/// Non-letter characters of the answer (spaces, hyphens) are shown from the
/// start and need no guess.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterDeduction {
    answer: String,
    guessed: BTreeSet<char>,
    wrong_guesses: u8,
    status: GameStatus,
}

impl LetterDeduction {
    pub fn new(word: &str) -> Self {
        Self {
            answer: word.to_uppercase(),
            guessed: BTreeSet::new(),
            wrong_guesses: 0,
            status: GameStatus::Playing,
        }
    }

    pub fn guess(&mut self, letter: char) -> GuessResult {
        if self.status != GameStatus::Playing || !letter.is_alphabetic() {
            return GuessResult::Ignored;
        }

        let Some(letter) = letter.to_uppercase().next() else {
            return GuessResult::Ignored;
        };
        if !self.guessed.insert(letter) {
            return GuessResult::Ignored;
        }

        if self.answer.contains(letter) {
            if self.is_revealed() {
                self.status = GameStatus::Won;
            }
            GuessResult::Hit
        } else {
            self.wrong_guesses += 1;
            if self.wrong_guesses >= MAX_LIVES {
                self.status = GameStatus::Lost;
            }
            GuessResult::Miss
        }
    }

    fn is_revealed(&self) -> bool {
        self.answer
            .chars()
            .all(|c| !c.is_alphabetic() || self.guessed.contains(&c))
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn lives_left(&self) -> u8 {
        MAX_LIVES - self.wrong_guesses
    }

    pub fn guessed(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// The answer with unguessed letters as `_`; fully shown once the game is lost.
    pub fn masked(&self) -> String {
        self.answer
            .chars()
            .map(|c| {
                if !c.is_alphabetic() || self.guessed.contains(&c) || self.status == GameStatus::Lost
                {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_by_revealing_every_letter() {
        let mut game = LetterDeduction::new("noon");
        assert_eq!(game.guess('n'), GuessResult::Hit);
        assert_eq!(game.masked(), "N__N");
        assert_eq!(game.guess('N'), GuessResult::Ignored);
        assert_eq!(game.guess('o'), GuessResult::Hit);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.guess('z'), GuessResult::Ignored);
    }

    #[test]
    fn six_misses_lose() {
        let mut game = LetterDeduction::new("cat");
        for (i, letter) in ['b', 'd', 'e', 'f', 'g'].into_iter().enumerate() {
            assert_eq!(game.guess(letter), GuessResult::Miss);
            assert_eq!(game.lives_left(), MAX_LIVES - (i as u8 + 1));
            assert_eq!(game.status(), GameStatus::Playing);
        }
        assert_eq!(game.guess('h'), GuessResult::Miss);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.lives_left(), 0);
        assert_eq!(game.masked(), "CAT");
    }

    #[test]
    fn repeated_misses_cost_one_life() {
        let mut game = LetterDeduction::new("cat");
        game.guess('x');
        assert_eq!(game.guess('x'), GuessResult::Ignored);
        assert_eq!(game.lives_left(), 5);
    }

    #[test]
    fn separators_are_pre_revealed() {
        let mut game = LetterDeduction::new("ice-cream");
        assert_eq!(game.masked(), "___-_____");
        assert_eq!(game.guess('-'), GuessResult::Ignored);
        for letter in "icream".chars() {
            game.guess(letter);
        }
        assert_eq!(game.status(), GameStatus::Won);
    }
}
