//! Grid to normalized layout coordinates.
//!
//! Everything here is a pure function producing fractions in `[0, 1]`;
//! scaling to pixels or percentages happens at the rendering boundary.
use serde::{Deserialize, Serialize};

use crate::layout::{Layout, Rung};
use crate::numbers::{clamp_unit, u16_to_f64, usize_to_f64};
use crate::path::Point;

/// Normalized 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Horizontal center of column `col` among `total_cols` equal lanes.
#[must_use]
pub fn col_to_x(col: usize, total_cols: usize) -> f64 {
    if total_cols == 0 {
        return 0.0;
    }
    (usize_to_f64(col) + 0.5) / usize_to_f64(total_cols)
}

/// Vertical offset of `row` when `total_rows` rows share the height.
#[must_use]
pub fn row_to_y(row: u16, total_rows: u16) -> f64 {
    u16_to_f64(row) / (u16_to_f64(total_rows) + 1.0)
}

/// Position of a path point on a board with `columns` lanes and `rows`
/// internal rows. The settle point at `rows + 1` sits on the bottom edge.
#[must_use]
pub fn point_position(point: Point, columns: usize, rows: u16) -> Position {
    Position {
        x: clamp_unit(col_to_x(point.col, columns)),
        y: clamp_unit(row_to_y(point.row, rows)),
    }
}

/// Endpoints of a rung for drawing.
#[must_use]
pub fn rung_segment(rung: Rung, layout: &Layout) -> (Position, Position) {
    let from = Point::new(rung.from_col, rung.row);
    let to = Point::new(rung.to_col(), rung.row);
    (
        point_position(from, layout.columns(), layout.rows()),
        point_position(to, layout.columns(), layout.rows()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn column_centers() {
        assert!(close(col_to_x(0, 2), 0.25));
        assert!(close(col_to_x(1, 2), 0.75));
        assert!(close(col_to_x(3, 8), 3.5 / 8.0));
        assert!(close(col_to_x(0, 0), 0.0));
    }

    #[test]
    fn row_offsets() {
        assert!(close(row_to_y(0, 12), 0.0));
        assert!(close(row_to_y(13, 12), 1.0));
        assert!(close(row_to_y(6, 12), 6.0 / 13.0));
    }

    #[test]
    fn point_rows_follow_row_to_y() {
        let mid = point_position(Point::new(2, 6), 4, 12);
        assert!(close(mid.y, 6.0 / 13.0));
        assert!(close(mid.x, 2.5 / 4.0));

        let last_row = point_position(Point::new(7, 12), 8, 12);
        assert!(close(last_row.y, 12.0 / 13.0));

        let settle = point_position(Point::new(7, 13), 8, 12);
        assert!(close(settle.y, 1.0));
    }

    #[test]
    fn rung_segment_is_level() {
        let layout = Layout::from_rungs(3, 12, [Rung::new(4, 1)]).unwrap();
        let (a, b) = rung_segment(layout.rungs()[0], &layout);
        assert!(close(a.y, b.y));
        assert!(close(a.y, 4.0 / 13.0));
        assert!(a.x < b.x);
    }
}
