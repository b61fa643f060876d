//! Rung layout generation and validation.
//!
//! A layout is the immutable set of horizontal rungs for one round. Within a
//! row no two rungs may touch (their `from_col` values differ by at least 2),
//! so any path makes at most one sideways move per row. The first and last
//! internal rows stay empty, which gives every path a straight start and
//! finish.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::config::LayoutConfig;
use crate::constants::{MAX_ROW_COUNT, MIN_ROW_COUNT};
use crate::error::LadderError;
use crate::rng::layout_rng;

/// Horizontal connector between `from_col` and `from_col + 1` at `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rung {
    pub row: u16,
    pub from_col: usize,
}

impl Rung {
    #[must_use]
    pub const fn new(row: u16, from_col: usize) -> Self {
        Self { row, from_col }
    }

    /// Column on the right-hand end of the rung.
    #[must_use]
    pub const fn to_col(self) -> usize {
        self.from_col + 1
    }
}

/// Validated rung set for a board of `columns` x `rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    columns: usize,
    rows: u16,
    /// Sorted by `(row, from_col)`.
    rungs: Vec<Rung>,
}

impl Layout {
    /// Generate a random layout.
    ///
    /// Rows are scanned top to bottom and column pairs left to right. Each
    /// slot draws once; a hit is dropped when the slot to its left already
    /// holds a rung from this pass.
    ///
    /// # Errors
    ///
    /// Returns `LadderError::DegenerateLadder` when `columns < 2` and
    /// `LadderError::RowCount` when `cfg.rows` is out of bounds.
    pub fn generate<R: Rng + ?Sized>(
        columns: usize,
        cfg: &LayoutConfig,
        rng: &mut R,
    ) -> Result<Self, LadderError> {
        ensure_columns(columns)?;
        ensure_rows(cfg.rows)?;
        let mut rungs = Vec::new();
        for row in 1..cfg.rows.saturating_sub(1) {
            let mut placed_left = false;
            for col in 0..columns - 1 {
                let hit = rng.r#gen::<f64>() < cfg.rung_probability;
                placed_left = hit && !placed_left;
                if placed_left {
                    rungs.push(Rung::new(row, col));
                }
            }
        }
        log::debug!(
            "generated ladder layout: {columns} columns, {} rows, {} rungs",
            cfg.rows,
            rungs.len()
        );
        Ok(Self {
            columns,
            rows: cfg.rows,
            rungs,
        })
    }

    /// Generate a layout that is fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`].
    pub fn generate_seeded(
        columns: usize,
        cfg: &LayoutConfig,
        seed: u64,
    ) -> Result<Self, LadderError> {
        let mut rng = layout_rng(seed);
        Self::generate(columns, cfg, &mut rng)
    }

    /// Build a layout from explicit rungs, enforcing bounds and the
    /// no-touching invariant.
    ///
    /// # Errors
    ///
    /// Returns `LadderError` when the board is degenerate or out of row
    /// bounds, when a rung falls off the board, or when two rungs in a row touch.
    pub fn from_rungs(
        columns: usize,
        rows: u16,
        rungs: impl IntoIterator<Item = Rung>,
    ) -> Result<Self, LadderError> {
        ensure_columns(columns)?;
        ensure_rows(rows)?;
        let mut rungs: Vec<Rung> = rungs.into_iter().collect();
        for rung in &rungs {
            let row_ok = rung.row >= 1 && rung.row <= rows.saturating_sub(2);
            if !row_ok || rung.from_col + 1 >= columns {
                return Err(LadderError::RungOutOfBounds {
                    row: rung.row,
                    from_col: rung.from_col,
                    rows,
                    columns,
                });
            }
        }
        rungs.sort_unstable();
        for pair in rungs.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            if left.row == right.row && right.from_col - left.from_col <= 1 {
                return Err(LadderError::RungConflict {
                    row: left.row,
                    left: left.from_col,
                    right: right.from_col,
                });
            }
        }
        Ok(Self {
            columns,
            rows,
            rungs,
        })
    }

    /// A ladder with no rungs: every participant falls straight down.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_rungs`].
    pub fn empty(columns: usize, rows: u16) -> Result<Self, LadderError> {
        Self::from_rungs(columns, rows, [])
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn rungs(&self) -> &[Rung] {
        &self.rungs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, rung: Rung) -> bool {
        self.rungs.binary_search(&rung).is_ok()
    }

    /// Column a path at `(col, row)` moves to, if a rung touches it.
    #[must_use]
    pub fn crossing(&self, row: u16, col: usize) -> Option<usize> {
        if self.contains(Rung::new(row, col)) {
            return Some(col + 1);
        }
        let left = col.checked_sub(1)?;
        self.contains(Rung::new(row, left)).then_some(left)
    }

    /// Stable 64-bit digest of the board, used to compare replays.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write_u64(self.columns as u64);
        hasher.write_u16(self.rows);
        for rung in &self.rungs {
            hasher.write_u16(rung.row);
            hasher.write_u64(rung.from_col as u64);
        }
        hasher.finish()
    }
}

const fn ensure_columns(columns: usize) -> Result<(), LadderError> {
    if columns < 2 {
        return Err(LadderError::DegenerateLadder { columns });
    }
    Ok(())
}

const fn ensure_rows(rows: u16) -> Result<(), LadderError> {
    if rows < MIN_ROW_COUNT || rows > MAX_ROW_COUNT {
        return Err(LadderError::RowCount {
            rows,
            min: MIN_ROW_COUNT,
            max: MAX_ROW_COUNT,
        });
    }
    Ok(())
}
