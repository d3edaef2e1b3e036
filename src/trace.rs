//! Contour tracing: boolean module grid to one compound outline path.
//!
//! The tracer walks the boundaries of every dark region and emits a single
//! path string whose closed subpaths, filled with the evenodd rule, exactly
//! reproduce the dark area with corners swapped for the configured rounding.
//!
//! Geometry lives on a doubled grid: each module spans two path units, so a
//! corner arc of radius up to 1 fits inside one module and straight runs
//! advance in steps of 2. Rows are doubled as well; even `y` values carry
//! horizontal edges, odd values vertical ones. A walk starts at the
//! upper-left boundary corner of a dark region (edge unvisited, module above
//! light, module below dark) heading right, and ends when it steps onto an
//! edge it has already visited, which by construction is the starting edge.
//! Light islands fully enclosed by dark trace their own subpaths; the
//! evenodd fill turns them into holes with no special-casing.
//!
//! Cost is linear in the number of boundary edges, O(n^2) for an n-module
//! symbol.

use crate::matrix::Matrix;
use crate::moves::{Heading, MoveTable, Turn};

/// Walk state: position on the doubled grid plus current heading.
struct Walker {
    x: i32,
    y: i32,
    heading: Heading,
}

/// What a single step appended: a straight run or a corner transition.
#[derive(Debug, PartialEq, Eq)]
enum Move {
    Straight(Heading),
    Turn(Turn),
}

/// Module lookup in bordered coordinates: row and column are offset by one
/// so that index 0 and n+1 address the implicit all-light border.
fn filled(matrix: &Matrix, row: i32, col: i32) -> bool {
    matrix.is_dark(row - 1, col - 1)
}

/// Traces every dark-region boundary in `matrix` and returns the combined
/// path data. Identical matrix and move table always produce byte-identical
/// output.
pub(crate) fn trace_path(matrix: &Matrix, moves: &MoveTable) -> String {
    let n = matrix.size() as i32;
    let mut visited = vec![vec![false; matrix.size() + 1]; matrix.size() * 2 + 3];
    let mut path = String::new();

    for x in 0..n {
        for y in (0..n * 2).step_by(2) {
            let start = !visited[y as usize][x as usize]
                && !filled(matrix, y / 2, 1 + x)
                && filled(matrix, y / 2 + 1, 1 + x);
            if start {
                trace_contour(matrix, moves, &mut visited, x, y, &mut path);
            }
        }
    }
    path
}

/// Walks one closed boundary starting from the upper-left corner `(x, y)`.
fn trace_contour(
    matrix: &Matrix,
    moves: &MoveTable,
    visited: &mut [Vec<bool>],
    x: i32,
    y: i32,
    out: &mut String,
) {
    let mut walker = Walker { x, y, heading: Heading::Right };
    out.push_str(&format!("M{} {}", x * 2 + 1, y));

    while !visited[walker.y as usize][walker.x as usize] {
        visited[walker.y as usize][walker.x as usize] = true;
        let step = match walker.heading {
            Heading::Right => step_right(&mut walker, matrix),
            Heading::Left => step_left(&mut walker, matrix),
            Heading::Up => step_up(&mut walker, matrix),
            Heading::Down => step_down(&mut walker, matrix),
        };
        match step {
            Move::Straight(heading) => out.push_str(moves.straight(heading)),
            Move::Turn(turn) => out.push_str(moves.turn(turn)),
        }
    }
}

/// Heading right along a horizontal edge (`y` even). Advances one module,
/// then continues, turns up, or turns down depending on the two modules
/// ahead.
fn step_right(w: &mut Walker, matrix: &Matrix) -> Move {
    w.x += 1;
    if filled(matrix, w.y / 2 + 1, 1 + w.x) {
        if filled(matrix, w.y / 2, 1 + w.x) {
            w.heading = Heading::Up;
            w.y -= 1;
            Move::Turn(Turn::RightUp)
        } else {
            Move::Straight(Heading::Right)
        }
    } else {
        w.heading = Heading::Down;
        w.y += 1;
        Move::Turn(Turn::RightDown)
    }
}

/// Heading left along a horizontal edge (`y` even).
fn step_left(w: &mut Walker, matrix: &Matrix) -> Move {
    if filled(matrix, w.y / 2, w.x) {
        if filled(matrix, w.y / 2 + 1, w.x) {
            w.heading = Heading::Down;
            w.y += 1;
            Move::Turn(Turn::LeftDown)
        } else {
            w.x -= 1;
            Move::Straight(Heading::Left)
        }
    } else {
        w.heading = Heading::Up;
        w.y -= 1;
        Move::Turn(Turn::LeftUp)
    }
}

/// Heading up along a vertical edge (`y` odd).
fn step_up(w: &mut Walker, matrix: &Matrix) -> Move {
    let row = (w.y - 1) / 2;
    let step = if filled(matrix, row, 1 + w.x) {
        if filled(matrix, row, w.x) {
            w.heading = Heading::Left;
            w.x -= 1;
            Move::Turn(Turn::UpLeft)
        } else {
            w.y -= 1;
            Move::Straight(Heading::Up)
        }
    } else {
        w.heading = Heading::Right;
        Move::Turn(Turn::UpRight)
    };
    w.y -= 1;
    step
}

/// Heading down along a vertical edge (`y` odd).
fn step_down(w: &mut Walker, matrix: &Matrix) -> Move {
    let row = (w.y + 3) / 2;
    let step = if filled(matrix, row, w.x) {
        if filled(matrix, row, 1 + w.x) {
            w.heading = Heading::Right;
            Move::Turn(Turn::DownRight)
        } else {
            w.y += 1;
            Move::Straight(Heading::Down)
        }
    } else {
        w.heading = Heading::Left;
        w.x -= 1;
        Move::Turn(Turn::DownLeft)
    };
    w.y += 1;
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::ModuleSource;
    use crate::moves::MoveTable;

    struct Grid(Vec<Vec<bool>>);

    impl ModuleSource for Grid {
        fn module_count(&self) -> usize {
            self.0.len()
        }

        fn is_dark(&self, row: usize, col: usize) -> bool {
            self.0[row][col]
        }
    }

    fn matrix_of(rows: &[&str]) -> Matrix {
        let grid =
            Grid(rows.iter().map(|r| r.chars().map(|c| c == '#').collect()).collect());
        Matrix::from_modules(&grid)
    }

    #[test]
    fn single_module_at_full_radius_is_a_circle() {
        let matrix = matrix_of(&[
            "...",
            ".#.",
            "...",
        ]);
        let path = trace_path(&matrix, &MoveTable::new(1.0));
        assert_eq!(path, "M3 2a1,1 0 0,1 1,1a1,1 0 0,1 -1,1a1,1 0 0,1 -1,-1a1,1 0 0,1 1,-1");
    }

    #[test]
    fn single_module_at_zero_radius_is_a_square() {
        let matrix = matrix_of(&[
            "...",
            ".#.",
            "...",
        ]);
        let path = trace_path(&matrix, &MoveTable::new(0.0));
        assert_eq!(
            path,
            "M3 2h1a0,0 0 0,1 0,0v1v1a0,0 0 0,1 0,0h-1h-1a0,0 0 0,1 0,0v-1v-1a0,0 0 0,1 0,0h1"
        );
    }

    #[test]
    fn horizontal_domino_uses_straight_runs() {
        let matrix = matrix_of(&[
            "....",
            ".##.",
            "....",
        ]);
        let path = trace_path(&matrix, &MoveTable::new(1.0));
        assert_eq!(
            path,
            "M3 2h2a1,1 0 0,1 1,1a1,1 0 0,1 -1,1h-2a1,1 0 0,1 -1,-1a1,1 0 0,1 1,-1"
        );
    }

    #[test]
    fn enclosed_light_island_traces_its_own_subpath() {
        let matrix = matrix_of(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        let path = trace_path(&matrix, &MoveTable::new(1.0));
        assert_eq!(path.matches('M').count(), 2);
    }

    #[test]
    fn disjoint_regions_produce_disjoint_subpaths() {
        let matrix = matrix_of(&[
            "#..",
            "...",
            "..#",
        ]);
        let path = trace_path(&matrix, &MoveTable::new(0.5));
        assert_eq!(path.matches('M').count(), 2);
        assert!(path.starts_with("M1 0"));
    }

    #[test]
    fn output_is_deterministic() {
        let matrix = matrix_of(&[
            "#.#.",
            ".##.",
            "#..#",
            "..##",
        ]);
        let table = MoveTable::new(0.5);
        assert_eq!(trace_path(&matrix, &table), trace_path(&matrix, &table));
    }

    #[test]
    fn step_right_continues_over_a_flat_top() {
        let matrix = matrix_of(&[
            "....",
            ".##.",
            "....",
        ]);
        let mut walker = Walker { x: 1, y: 2, heading: Heading::Right };
        assert_eq!(step_right(&mut walker, &matrix), Move::Straight(Heading::Right));
        assert_eq!((walker.x, walker.y), (2, 2));
    }

    #[test]
    fn step_right_turns_down_at_a_right_edge() {
        let matrix = matrix_of(&[
            "...",
            ".#.",
            "...",
        ]);
        let mut walker = Walker { x: 1, y: 2, heading: Heading::Right };
        assert_eq!(step_right(&mut walker, &matrix), Move::Turn(Turn::RightDown));
        assert_eq!((walker.x, walker.y), (2, 3));
        assert_eq!(walker.heading, Heading::Down);
    }

    #[test]
    fn step_right_turns_up_at_an_inside_corner() {
        let matrix = matrix_of(&[
            "..#",
            ".##",
            "...",
        ]);
        let mut walker = Walker { x: 1, y: 2, heading: Heading::Right };
        assert_eq!(step_right(&mut walker, &matrix), Move::Turn(Turn::RightUp));
        assert_eq!((walker.x, walker.y), (2, 1));
        assert_eq!(walker.heading, Heading::Up);
    }

    #[test]
    fn step_down_turns_left_under_a_lone_module() {
        let matrix = matrix_of(&[
            "...",
            ".#.",
            "...",
        ]);
        let mut walker = Walker { x: 2, y: 3, heading: Heading::Down };
        assert_eq!(step_down(&mut walker, &matrix), Move::Turn(Turn::DownLeft));
        assert_eq!((walker.x, walker.y), (1, 4));
        assert_eq!(walker.heading, Heading::Left);
    }

    #[test]
    fn step_up_exits_at_the_region_top() {
        let matrix = matrix_of(&[
            "...",
            ".#.",
            "...",
        ]);
        let mut walker = Walker { x: 1, y: 3, heading: Heading::Up };
        assert_eq!(step_up(&mut walker, &matrix), Move::Turn(Turn::UpRight));
        assert_eq!((walker.x, walker.y), (1, 2));
        assert_eq!(walker.heading, Heading::Right);
    }

    #[test]
    fn step_left_turns_up_past_the_region_start() {
        let matrix = matrix_of(&[
            "...",
            ".#.",
            "...",
        ]);
        let mut walker = Walker { x: 1, y: 4, heading: Heading::Left };
        assert_eq!(step_left(&mut walker, &matrix), Move::Turn(Turn::LeftUp));
        assert_eq!((walker.x, walker.y), (1, 3));
        assert_eq!(walker.heading, Heading::Up);
    }
}
