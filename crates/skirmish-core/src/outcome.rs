//! Collision outcome table.
//!
//! The [`OutcomeTable`] is a plain lookup matrix: `cells[a][b]` is `1` when
//! kind `a` defeats kind `b`, `-1` when `a` loses to `b`, and `0` when neither
//! is removed. Resolution never branches per pair, so adding a kind only
//! means growing the matrix.

use serde::{Deserialize, Serialize};

use crate::kind::{CharacterKind, KIND_COUNT};
use crate::{InvalidTypeError, TableError};

/// Result of resolving a collision between character A and character B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A defeats B; B is removed.
    AWins,
    /// B defeats A; A is removed.
    BWins,
    /// Neither is removed.
    Neutral,
}

impl Outcome {
    /// The outcome seen from the other participant.
    pub const fn inverse(self) -> Self {
        match self {
            Outcome::AWins => Outcome::BWins,
            Outcome::BWins => Outcome::AWins,
            Outcome::Neutral => Outcome::Neutral,
        }
    }

    const fn from_cell(cell: i8) -> Self {
        match cell {
            1 => Outcome::AWins,
            -1 => Outcome::BWins,
            _ => Outcome::Neutral,
        }
    }
}

/// The RPSKL relation in cycle order: row `i` beats columns `i + 1` and
/// `i + 2` (mod 5).
const RPSKL_MATRIX: [[i8; KIND_COUNT]; KIND_COUNT] = [
    [0, 1, 1, -1, -1],
    [-1, 0, 1, 1, -1],
    [-1, -1, 0, 1, 1],
    [1, -1, -1, 0, 1],
    [1, 1, -1, -1, 0],
];

/// Immutable win/lose/neutral matrix over [`CharacterKind`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTable {
    cells: [[i8; KIND_COUNT]; KIND_COUNT],
}

impl OutcomeTable {
    /// The standard RPSKL table.
    pub const fn rpskl() -> Self {
        Self {
            cells: RPSKL_MATRIX,
        }
    }

    /// Build a table from a raw matrix.
    ///
    /// # Errors
    ///
    /// Rejects matrices with values outside `{-1, 0, 1}`, a non-zero
    /// diagonal, or a pair where `m[a][b] != -m[b][a]`.
    pub fn from_matrix(cells: [[i8; KIND_COUNT]; KIND_COUNT]) -> Result<Self, TableError> {
        for (row, values) in cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !(-1..=1).contains(&value) {
                    return Err(TableError::OutOfRange { row, col, value });
                }
            }
        }
        for (index, values) in cells.iter().enumerate() {
            if values[index] != 0 {
                return Err(TableError::NonZeroDiagonal {
                    index,
                    value: values[index],
                });
            }
        }
        for a in 0..KIND_COUNT {
            for b in (a + 1)..KIND_COUNT {
                if cells[a][b] != -cells[b][a] {
                    return Err(TableError::NotAntisymmetric {
                        a,
                        b,
                        forward: cells[a][b],
                        backward: cells[b][a],
                    });
                }
            }
        }
        Ok(Self { cells })
    }

    /// Raw cell value for `(a, b)`.
    #[inline]
    pub fn cell(&self, a: CharacterKind, b: CharacterKind) -> i8 {
        self.cells[a.index()][b.index()]
    }

    /// Resolve a collision between a character of kind `a` and one of kind
    /// `b`.
    #[inline]
    pub fn resolve(&self, a: CharacterKind, b: CharacterKind) -> Outcome {
        Outcome::from_cell(self.cell(a, b))
    }

    /// Resolve by raw numeric tags.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTypeError::UnknownTag`] for the first tag outside the
    /// known kinds.
    pub fn resolve_tags(&self, a: u8, b: u8) -> Result<Outcome, InvalidTypeError> {
        let a = CharacterKind::from_tag(a)?;
        let b = CharacterKind::from_tag(b)?;
        Ok(self.resolve(a, b))
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &[[i8; KIND_COUNT]; KIND_COUNT] {
        &self.cells
    }
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self::rpskl()
    }
}
