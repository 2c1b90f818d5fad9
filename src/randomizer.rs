use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::piece::Tetromino;

#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
pub enum RandomizerKind {
    SevenBag,
    SinglePiece { piece: Tetromino },
}

impl Default for RandomizerKind {
    fn default() -> Self {
        RandomizerKind::SevenBag
    }
}

pub trait Randomizer {
    fn next(&mut self) -> Tetromino;
    /// Identifiers left in the current bag, in draw order.
    fn pending(&self) -> Vec<Tetromino> {
        Vec::new()
    }
    /// Drops whatever is left of the current bag.
    fn reset(&mut self) {}
}

/// Seven-bag sequencer: each bag is a shuffled permutation of all seven
/// kinds, drawn from the end until empty.
pub struct SevenBag {
    bag: Vec<Tetromino>,
    rng: StdRng,
}

impl SevenBag {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            bag: Vec::with_capacity(7),
            rng,
        }
    }

    fn refill(&mut self) {
        self.bag = Tetromino::all().to_vec();
        self.bag.shuffle(&mut self.rng);
    }
}

impl Randomizer for SevenBag {
    fn next(&mut self) -> Tetromino {
        if self.bag.is_empty() {
            self.refill();
        }
        match self.bag.pop() {
            Some(piece) => piece,
            None => unreachable!("bag refilled with seven pieces"),
        }
    }

    fn pending(&self) -> Vec<Tetromino> {
        self.bag.iter().rev().copied().collect()
    }

    fn reset(&mut self) {
        self.bag.clear();
    }
}

pub struct SinglePiece {
    piece: Tetromino,
}

impl Randomizer for SinglePiece {
    fn next(&mut self) -> Tetromino {
        self.piece
    }
}

pub fn randomizer_from_kind(kind: &RandomizerKind, seed: Option<u64>) -> Box<dyn Randomizer> {
    match kind {
        RandomizerKind::SevenBag => match seed {
            Some(seed) => Box::new(SevenBag::seeded(seed)),
            None => Box::new(SevenBag::from_entropy()),
        },
        RandomizerKind::SinglePiece { piece } => Box::new(SinglePiece { piece: *piece }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn full_bag_yields_each_kind_once() {
        let mut bag = SevenBag::seeded(7);
        let drawn: Vec<_> = (0..7).map(|_| bag.next()).collect();
        let unique: HashSet<_> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 7);
        assert!(bag.pending().is_empty());
    }

    #[test]
    fn eighth_draw_starts_new_bag() {
        let mut bag = SevenBag::seeded(99);
        for _ in 0..7 {
            bag.next();
        }
        let eighth = bag.next();
        let rest = bag.pending();
        assert_eq!(rest.len(), 6);
        assert!(!rest.contains(&eighth));
    }

    #[test]
    fn pending_lists_draw_order() {
        let mut bag = SevenBag::seeded(3);
        let first = bag.next();
        let pending = bag.pending();
        assert!(!pending.contains(&first));
        for expected in pending {
            assert_eq!(bag.next(), expected);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SevenBag::seeded(42);
        let mut b = SevenBag::seeded(42);
        for _ in 0..21 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn reset_empties_bag() {
        let mut bag = SevenBag::seeded(5);
        bag.next();
        assert_eq!(bag.pending().len(), 6);
        bag.reset();
        assert!(bag.pending().is_empty());
        bag.next();
        assert_eq!(bag.pending().len(), 6);
    }

    #[test]
    fn single_piece_repeats() {
        let mut r = randomizer_from_kind(
            &RandomizerKind::SinglePiece {
                piece: Tetromino::O,
            },
            None,
        );
        assert!((0..10).all(|_| r.next() == Tetromino::O));
        assert!(r.pending().is_empty());
    }
}
