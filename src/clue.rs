//! Purchasable clue cards.

use alloc::format;
use alloc::string::String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClueKind {
    FirstLetter,
    LastLetter,
    WordLength,
    /// Reserved; not offered in [`CATALOG`].
    ContainsLetter,
}

/// A clue that can be bought about the opponent's secret word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClueCard {
    pub id: &'static str,
    pub kind: ClueKind,
    /// Berries credited to the buyer's opponent.
    pub cost: u32,
    pub title: &'static str,
    pub description: &'static str,
}

pub static CATALOG: [ClueCard; 3] = [
    ClueCard {
        id: "c1",
        kind: ClueKind::FirstLetter,
        cost: 4,
        title: "First Letter",
        description: "Reveal the first letter",
    },
    ClueCard {
        id: "c2",
        kind: ClueKind::LastLetter,
        cost: 3,
        title: "Last Letter",
        description: "Reveal the last letter",
    },
    ClueCard {
        id: "c3",
        kind: ClueKind::WordLength,
        cost: 1,
        title: "Word Length",
        description: "Know how long the word is",
    },
];

/// Look up a catalog card by id.
pub fn find(id: &str) -> Option<&'static ClueCard> {
    CATALOG.iter().find(|card| card.id == id)
}

/// Text revealed by `kind` about `secret`.
pub fn resolve(kind: ClueKind, secret: &str) -> String {
    match kind {
        ClueKind::FirstLetter => match secret.chars().next() {
            Some(c) => format!("Starts with {}", c),
            None => String::from("Unknown clue"),
        },
        ClueKind::LastLetter => match secret.chars().last() {
            Some(c) => format!("Ends with {}", c),
            None => String::from("Unknown clue"),
        },
        ClueKind::WordLength => format!("Length is {}", secret.chars().count()),
        ClueKind::ContainsLetter => String::from("Unknown clue"),
    }
}
