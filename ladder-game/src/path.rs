//! Path resolution through a rung layout.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::LadderError;
use crate::layout::Layout;

/// Grid coordinate on the ladder. Row `0` is the top; the settle point sits
/// one row below the last internal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub col: usize,
    pub row: u16,
}

impl Point {
    #[must_use]
    pub const fn new(col: usize, row: u16) -> Self {
        Self { col, row }
    }
}

/// Inline capacity covers the default 12-row board with a jog on every
/// eligible row.
pub type PathPoints = SmallVec<[Point; 32]>;

/// Kind of a single step between two consecutive path points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Straight descent to the next row.
    Vertical,
    /// Sideways jog across a rung; both endpoints share a row.
    Horizontal,
}

/// Full descent from a starting column to its settle point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    start_col: usize,
    points: PathPoints,
}

impl Path {
    #[must_use]
    pub const fn start_col(&self) -> usize {
        self.start_col
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Column of the settle point.
    #[must_use]
    pub fn final_col(&self) -> usize {
        self.points.last().map_or(self.start_col, |p| p.col)
    }

    /// Kind of the step from `index` to `index + 1`, or `None` at the end.
    #[must_use]
    pub fn step_kind(&self, index: usize) -> Option<StepKind> {
        let from = self.points.get(index)?;
        let to = self.points.get(index + 1)?;
        Some(if from.row == to.row {
            StepKind::Horizontal
        } else {
            StepKind::Vertical
        })
    }

    /// Number of rungs crossed.
    #[must_use]
    pub fn crossings(&self) -> usize {
        (0..self.last_index())
            .filter(|&i| self.step_kind(i) == Some(StepKind::Horizontal))
            .count()
    }
}

/// Trace a descent from `start_col`.
///
/// Every row from `0` through `rows` contributes its point; a rung touching
/// the current column adds a second point on the same row at the new column.
/// The settle point at `rows + 1` closes the path. The result depends only on
/// the inputs, so callers may resolve as often as they like.
///
/// # Errors
///
/// Returns `LadderError::ColumnOutOfRange` when `start_col` is not a column of
/// the layout.
pub fn resolve(start_col: usize, layout: &Layout) -> Result<Path, LadderError> {
    if start_col >= layout.columns() {
        return Err(LadderError::ColumnOutOfRange {
            col: start_col,
            columns: layout.columns(),
        });
    }
    let rows = layout.rows();
    let mut points = PathPoints::new();
    let mut col = start_col;
    for row in 0..=rows {
        points.push(Point::new(col, row));
        if let Some(next) = layout.crossing(row, col) {
            col = next;
            points.push(Point::new(col, row));
        }
    }
    points.push(Point::new(col, rows.saturating_add(1)));
    Ok(Path { start_col, points })
}

/// Final column for every starting column, in column order.
#[must_use]
pub fn resolve_all(layout: &Layout) -> Vec<usize> {
    (0..layout.columns())
        .filter_map(|col| resolve(col, layout).ok())
        .map(|path| path.final_col())
        .collect()
}
