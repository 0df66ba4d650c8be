use rand::Rng;
use rand::seq::SliceRandom;

pub const DEFAULT_GRID_SIZE: usize = 10;
const PLACEMENT_ATTEMPTS: usize = 100;
const FILL_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Reading direction of a placed word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Down and to the right.
    DiagonalDown,
    /// Up and to the right.
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// `(row, col)` step.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (-1, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

impl Placement {
    /// Grid cells covered by the word, first letter first.
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let (dr, dc) = self.direction.delta();
        (0..self.word.chars().count() as isize)
            .map(|i| {
                (
                    (self.row as isize + i * dr) as usize,
                    (self.col as isize + i * dc) as usize,
                )
            })
            .collect()
    }
}

/// Square letter grid with hidden words.
#[derive(Clone, Debug)]
pub struct WordSearchGrid {
    size: usize,
    cells: Vec<Vec<char>>,
    placements: Vec<Placement>,
    unplaced: Vec<String>,
}

impl WordSearchGrid {
    /// Places each word (uppercased) and fills the remaining cells with random letters.
    ///
    /// Words may share matching letters. A word that finds no spot within the
    /// attempt budget is left out and listed in [`unplaced`](Self::unplaced).
    pub fn generate<R: Rng + ?Sized>(words: &[&str], size: usize, rng: &mut R) -> Self {
        let mut grid: Vec<Vec<Option<char>>> = vec![vec![None; size]; size];
        let mut placements = Vec::new();
        let mut unplaced = Vec::new();

        for word in words {
            let letters: Vec<char> = word.to_uppercase().chars().collect();
            match place_word(&mut grid, &letters, size, rng) {
                Some((row, col, direction)) => placements.push(Placement {
                    word: letters.iter().collect(),
                    row,
                    col,
                    direction,
                }),
                None => {
                    tracing::debug!(word, "Could not place word in grid");
                    unplaced.push(word.to_uppercase());
                }
            }
        }

        let cells = grid
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        cell.unwrap_or_else(|| {
                            char::from(FILL_LETTERS[rng.gen_range(0..FILL_LETTERS.len())])
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            size,
            cells,
            placements,
            unplaced,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.cells
    }

    pub fn letter_at(&self, row: usize, col: usize) -> Option<char> {
        self.cells.get(row)?.get(col).copied()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn unplaced(&self) -> &[String] {
        &self.unplaced
    }

    /// Case-insensitive lookup of a placed word.
    pub fn find(&self, word: &str) -> Option<&Placement> {
        let word = word.to_uppercase();
        self.placements.iter().find(|p| p.word == word)
    }

    /// Returns the placed word that exactly covers `cells`, in either reading order.
    pub fn word_at(&self, cells: &[(usize, usize)]) -> Option<&Placement> {
        self.placements.iter().find(|p| {
            let covered = p.cells();
            covered == cells || covered.iter().rev().eq(cells.iter())
        })
    }
}

fn place_word<R: Rng + ?Sized>(
    grid: &mut [Vec<Option<char>>],
    letters: &[char],
    size: usize,
    rng: &mut R,
) -> Option<(usize, usize, Direction)> {
    if letters.is_empty() || size == 0 {
        return None;
    }

    for _ in 0..PLACEMENT_ATTEMPTS {
        let direction = *Direction::ALL.choose(rng)?;
        let row = rng.gen_range(0..size);
        let col = rng.gen_range(0..size);

        if fits(grid, letters, row, col, direction, size) {
            let (dr, dc) = direction.delta();
            for (i, &letter) in letters.iter().enumerate() {
                let r = (row as isize + i as isize * dr) as usize;
                let c = (col as isize + i as isize * dc) as usize;
                grid[r][c] = Some(letter);
            }
            return Some((row, col, direction));
        }
    }

    None
}

fn fits(
    grid: &[Vec<Option<char>>],
    letters: &[char],
    row: usize,
    col: usize,
    direction: Direction,
    size: usize,
) -> bool {
    let (dr, dc) = direction.delta();
    letters.iter().enumerate().all(|(i, &letter)| {
        let r = row as isize + i as isize * dr;
        let c = col as isize + i as isize * dc;
        if r < 0 || c < 0 || r >= size as isize || c >= size as isize {
            return false;
        }
        match grid[r as usize][c as usize] {
            None => true,
            Some(existing) => existing == letter,
        }
    })
}
