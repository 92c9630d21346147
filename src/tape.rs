//! A two-way infinite binary tape.

use bit_set::BitSet;

use crate::types::Symbol;

/// A tape that is blank (`0`) everywhere except the cells holding a `1`.
///
/// Each half is a bit set of the cells that hold a `1`: non-negative positions index `right`,
/// negative positions index `left` (position `-1` is bit `0` of `left`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    left: BitSet,
    right: BitSet,
}

impl Tape {
    /// Creates a blank tape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol at `position`, `0` if the cell was never written.
    pub fn get(&self, position: i64) -> Symbol {
        let (half, index) = self.locate(position);
        Symbol::from(half.contains(index))
    }

    /// Writes `symbol` at `position`. Any non-zero symbol is stored as a `1`.
    pub fn set(&mut self, position: i64, symbol: Symbol) {
        let (index, half) = if position >= 0 {
            (position as usize, &mut self.right)
        } else {
            ((-position - 1) as usize, &mut self.left)
        };
        if symbol == 0 {
            half.remove(index);
        } else {
            half.insert(index);
        }
    }

    fn locate(&self, position: i64) -> (&BitSet, usize) {
        if position >= 0 {
            (&self.right, position as usize)
        } else {
            (&self.left, (-position - 1) as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_tape_reads_zero() {
        let tape = Tape::new();
        assert_eq!(tape.get(0), 0);
        assert_eq!(tape.get(-17), 0);
        assert_eq!(tape.get(42), 0);
    }

    #[test]
    fn test_set_both_directions() {
        let mut tape = Tape::new();
        tape.set(2, 1);
        tape.set(-3, 1);

        let cells: Vec<Symbol> = (-4..=3).map(|position| tape.get(position)).collect();
        assert_eq!(cells, vec![0, 1, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_writing_blank_does_not_grow() {
        let mut tape = Tape::new();
        tape.set(100, 0);
        tape.set(-100, 0);
        assert_eq!(tape, Tape::new());
    }

    #[test]
    fn test_overwrite() {
        let mut tape = Tape::new();
        tape.set(0, 1);
        tape.set(0, 0);
        assert_eq!(tape.get(0), 0);
        assert_eq!(tape, Tape::new());
    }

    #[test]
    fn test_far_cells() {
        let mut tape = Tape::new();
        tape.set(10_000, 1);
        tape.set(-10_000, 1);

        assert_eq!(tape.get(10_000), 1);
        assert_eq!(tape.get(-10_000), 1);
        assert_eq!(tape.get(9_999), 0);
        assert_eq!(tape.get(-9_999), 0);
    }
}
