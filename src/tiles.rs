//! Letter tile racks.

use alloc::vec::Vec;
use core::fmt;
use rand::seq::SliceRandom;
use rand::Rng;

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];
pub const CONSONANTS: [char; 21] = [
    'B', 'C', 'D', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'X',
    'Y', 'Z',
];

/// Draw `vowels` letters from [`VOWELS`] and `consonants` letters from
/// [`CONSONANTS`], each independently and with replacement, then shuffle.
pub fn generate_tiles<R: Rng + ?Sized>(rng: &mut R, vowels: usize, consonants: usize) -> Vec<char> {
    let mut tiles = Vec::with_capacity(vowels + consonants);
    for _ in 0..vowels {
        tiles.push(VOWELS[rng.random_range(0..VOWELS.len())]);
    }
    for _ in 0..consonants {
        tiles.push(CONSONANTS[rng.random_range(0..CONSONANTS.len())]);
    }
    tiles.shuffle(rng);
    tiles
}

pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter)
}

/// A side's letter inventory. Immutable once dealt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRack {
    letters: Vec<char>,
}

impl TileRack {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, vowels: usize, consonants: usize) -> Self {
        Self {
            letters: generate_tiles(rng, vowels, consonants),
        }
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn vowel_count(&self) -> usize {
        self.letters.iter().filter(|c| is_vowel(**c)).count()
    }
}

impl From<Vec<char>> for TileRack {
    fn from(letters: Vec<char>) -> Self {
        let letters = letters.into_iter().map(|c| c.to_ascii_uppercase()).collect();
        Self { letters }
    }
}

impl fmt::Display for TileRack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, letter) in self.letters.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}
