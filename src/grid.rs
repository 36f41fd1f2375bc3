//! Grid, cell and wall representation.
//!
//! This module holds the pure data side of a maze: cardinal directions, cell coordinates, the
//! per-cell wall state and the rectangular grid owning every cell. The only way to remove walls is
//! through [`Grid::open_passage`] and [`Grid::open_boundary`], which keep the wall state of
//! neighbouring cells in agreement.

use std::fmt;

use color_eyre::eyre::{bail, ensure, OptionExt as _, Result};

/// Cardinal direction on the grid.
///
/// Rows grow southwards and columns grow eastwards, so the origin `(0, 0)` sits in the north-west
/// corner of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Towards row zero.
    North,
    /// Towards the last column.
    East,
    /// Towards the last row.
    South,
    /// Towards column zero.
    West,
}

impl Direction {
    /// Every direction, in the order used when enumerating the neighbours of a cell.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Returns the row delta of a single step in this direction.
    #[must_use]
    pub const fn row_offset(self) -> isize {
        match self {
            Self::North => -1,
            Self::South => 1,
            Self::East | Self::West => 0,
        }
    }

    /// Returns the column delta of a single step in this direction.
    #[must_use]
    pub const fn col_offset(self) -> isize {
        match self {
            Self::East => 1,
            Self::West => -1,
            Self::North | Self::South => 0,
        }
    }

    /// Returns the direction of the single cardinal step leading from `from` to `to`.
    ///
    /// Yields [`None`] when both coordinates are equal or further apart than one step.
    #[must_use]
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        Self::ALL.into_iter().find(|&direction| from.step(direction) == Some(to))
    }

    /// Bit used for this direction in a cell's wall mask.
    const fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::East => 0b0010,
            Self::South => 0b0100,
            Self::West => 0b1000,
        }
    }
}

/// Position of a cell on the grid.
///
/// Coordinates order row-major, which is also the order in which [`Grid::coords`] yields them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Row index, growing southwards.
    pub row: usize,
    /// Column index, growing eastwards.
    pub col: usize,
}

impl Coord {
    /// Builds a coordinate from its row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the Manhattan distance between two coordinates.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns the coordinate one step away in `direction`, if it does not underflow.
    ///
    /// The result is not checked against any grid bounds.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let Some(row) = self.row.checked_add_signed(direction.row_offset()) else {
            return None;
        };
        let Some(col) = self.col.checked_add_signed(direction.col_offset()) else {
            return None;
        };

        Some(Self { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.col)
    }
}

/// Mask with every wall present.
const ALL_WALLS: u8 = 0b1111;

/// A single grid position and its four walls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Where the cell lives on its grid.
    position: Coord,
    /// Bit mask of the walls still standing, one bit per [`Direction`].
    walls: u8,
}

impl Cell {
    /// Creates a fully walled cell.
    const fn new(position: Coord) -> Self {
        Self {
            position,
            walls: ALL_WALLS,
        }
    }

    /// Returns the coordinate identifying this cell.
    #[must_use]
    pub const fn position(&self) -> Coord {
        self.position
    }

    /// Returns whether the wall on the `direction` side is still standing.
    #[must_use]
    pub const fn has_wall(&self, direction: Direction) -> bool {
        self.walls & direction.bit() != 0
    }

    /// Returns the sides of this cell without a wall.
    pub fn open_sides(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|&direction| !self.has_wall(direction))
    }

    /// Knocks down the wall on one side.
    ///
    /// Kept private to this module so that only [`Grid`] decides when a wall goes, keeping both
    /// sides of a passage in agreement.
    fn remove_wall(&mut self, direction: Direction) {
        self.walls &= !direction.bit();
    }
}

/// Rectangular array of cells.
///
/// Cells are stored row-major. Dimensions are fixed at construction and always at least one in
/// both axes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row-major cell storage of length `rows * cols`.
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a `rows` by `cols` grid with every wall present.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension is zero or if the number of cells does
    /// not fit in memory addressing.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        ensure!(
            rows >= 1 && cols >= 1,
            "grid dimensions must be positive, got {rows}x{cols}"
        );
        let Some(count) = rows.checked_mul(cols) else {
            bail!("grid of {rows}x{cols} cells is too large");
        };

        let mut cells = Vec::with_capacity(count);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(Coord::new(row, col)));
            }
        }

        Ok(Self { rows, cols, cells })
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether `coord` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Returns the coordinate of the cell stored at a row-major `index`.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<Coord> {
        self.cells.get(index).map(Cell::position)
    }

    /// Returns every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().map(Cell::position)
    }

    /// Returns the cell at `coord`.
    ///
    /// # Errors
    ///
    /// This function returns an error if `coord` lies outside the grid.
    pub fn cell(&self, coord: Coord) -> Result<&Cell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index))
            .ok_or_eyre(format!(
                "cell {coord} lies outside the {}x{} grid",
                self.rows, self.cols
            ))
    }

    /// Returns whether the cell at `coord` has a wall on its `direction` side.
    ///
    /// # Errors
    ///
    /// This function returns an error if `coord` lies outside the grid.
    pub fn has_wall(&self, coord: Coord, direction: Direction) -> Result<bool> {
        Ok(self.cell(coord)?.has_wall(direction))
    }

    /// Returns the in-bounds neighbour of `coord` in `direction`.
    #[must_use]
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        coord
            .step(direction)
            .filter(|&neighbor| self.contains(neighbor))
    }

    /// Returns the neighbours reachable from `coord` through open passages.
    ///
    /// Neighbours come in the order of [`Direction::ALL`]. An out-of-bounds `coord` has no
    /// neighbours.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        let cell = self.index(coord).and_then(|index| self.cells.get(index));
        Direction::ALL.into_iter().filter_map(move |direction| {
            cell.filter(|cell| !cell.has_wall(direction))
                .and_then(|_| self.neighbor(coord, direction))
        })
    }

    /// Removes the wall between two adjacent cells, on both sides at once.
    ///
    /// Opening an already open passage is a no-op.
    ///
    /// # Errors
    ///
    /// This function returns an error if either coordinate lies outside the grid or if the cells
    /// are not exactly one cardinal step apart.
    pub fn open_passage(&mut self, from: Coord, to: Coord) -> Result<()> {
        let direction = Direction::between(from, to)
            .ok_or_eyre(format!("cells {from} and {to} are not adjacent"))?;
        let from_index = self.checked_index(from)?;
        let to_index = self.checked_index(to)?;

        self.cell_mut(from_index)?.remove_wall(direction);
        self.cell_mut(to_index)?.remove_wall(direction.opposite());

        Ok(())
    }

    /// Removes a wall facing outside the grid.
    ///
    /// This only marks entrances and exits; it never changes which cells are connected.
    ///
    /// # Errors
    ///
    /// This function returns an error if `coord` lies outside the grid or if the `direction` side
    /// faces another cell, since that wall is shared and must go through
    /// [`open_passage`](Self::open_passage).
    pub fn open_boundary(&mut self, coord: Coord, direction: Direction) -> Result<()> {
        ensure!(
            self.neighbor(coord, direction).is_none(),
            "the {direction:?} side of {coord} faces another cell"
        );
        let index = self.checked_index(coord)?;
        self.cell_mut(index)?.remove_wall(direction);

        Ok(())
    }

    /// Counts the open interior passages, each shared wall counted once.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|&direction| {
                        !cell.has_wall(direction)
                            && self.neighbor(cell.position(), direction).is_some()
                    })
                    .count()
            })
            .sum()
    }

    /// Maps a coordinate to its row-major storage index.
    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row * self.cols + coord.col)
    }

    /// Same as [`index`](Self::index) but reporting out-of-bounds coordinates as errors.
    fn checked_index(&self, coord: Coord) -> Result<usize> {
        self.index(coord).ok_or_eyre(format!(
            "cell {coord} lies outside the {}x{} grid",
            self.rows, self.cols
        ))
    }

    /// Returns a mutable reference to the cell at a storage index.
    fn cell_mut(&mut self, index: usize) -> Result<&mut Cell> {
        self.cells
            .get_mut(index)
            .ok_or_eyre("cell index out of storage range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite_pairs() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    #[test]
    fn test_direction_offsets() {
        assert_eq!(
            (Direction::North.row_offset(), Direction::North.col_offset()),
            (-1, 0)
        );
        assert_eq!(
            (Direction::South.row_offset(), Direction::South.col_offset()),
            (1, 0)
        );
        assert_eq!(
            (Direction::East.row_offset(), Direction::East.col_offset()),
            (0, 1)
        );
        assert_eq!(
            (Direction::West.row_offset(), Direction::West.col_offset()),
            (0, -1)
        );
    }

    #[test]
    fn test_direction_between() {
        let origin = Coord::new(1, 1);

        assert_eq!(
            Direction::between(origin, Coord::new(0, 1)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(origin, Coord::new(1, 2)),
            Some(Direction::East)
        );
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, Coord::new(2, 2)), None);
        assert_eq!(Direction::between(origin, Coord::new(1, 3)), None);
    }

    #[test]
    fn test_coord_step_underflow() {
        assert_eq!(Coord::new(0, 0).step(Direction::North), None);
        assert_eq!(Coord::new(0, 0).step(Direction::West), None);
        assert_eq!(
            Coord::new(0, 0).step(Direction::South),
            Some(Coord::new(1, 0))
        );
    }

    #[test]
    fn test_coord_manhattan_and_display() {
        assert_eq!(Coord::new(0, 0).manhattan(Coord::new(2, 3)), 5);
        assert_eq!(Coord::new(4, 1).manhattan(Coord::new(1, 4)), 6);
        assert_eq!(Coord::new(2, 7).to_string(), "(2, 7)");
    }

    #[test]
    fn test_grid_new_fully_walled() {
        let grid = Grid::new(3, 4).expect("valid dimensions");

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.cell_count(), 12);
        assert_eq!(grid.passage_count(), 0);
        for coord in grid.coords() {
            for direction in Direction::ALL {
                assert!(grid.has_wall(coord, direction).expect("in bounds"));
            }
        }
    }

    #[test]
    fn test_grid_new_rejects_zero_dimensions() {
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_grid_coords_row_major() {
        let grid = Grid::new(2, 2).expect("valid dimensions");
        let coords: Vec<Coord> = grid.coords().collect();

        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 1)
            ]
        );
        assert_eq!(grid.coord_at(3), Some(Coord::new(1, 1)));
        assert_eq!(grid.coord_at(4), None);
    }

    #[test]
    fn test_grid_out_of_bounds_queries() {
        let grid = Grid::new(2, 3).expect("valid dimensions");

        assert!(grid.cell(Coord::new(2, 0)).is_err());
        assert!(grid.has_wall(Coord::new(0, 3), Direction::North).is_err());
        assert_eq!(grid.neighbor(Coord::new(1, 2), Direction::East), None);
        assert_eq!(grid.open_neighbors(Coord::new(9, 9)).count(), 0);
    }

    #[test]
    fn test_open_passage_mirrors_walls() {
        let mut grid = Grid::new(2, 2).expect("valid dimensions");
        let origin = Coord::new(0, 0);
        let east = Coord::new(0, 1);

        grid.open_passage(origin, east).expect("adjacent cells");

        assert!(!grid.has_wall(origin, Direction::East).expect("in bounds"));
        assert!(!grid.has_wall(east, Direction::West).expect("in bounds"));
        assert!(grid.has_wall(origin, Direction::South).expect("in bounds"));
        assert_eq!(grid.passage_count(), 1);
        assert_eq!(grid.open_neighbors(origin).collect::<Vec<_>>(), vec![east]);
        assert_eq!(grid.open_neighbors(east).collect::<Vec<_>>(), vec![origin]);
    }

    #[test]
    fn test_open_passage_is_idempotent() {
        let mut grid = Grid::new(2, 1).expect("valid dimensions");

        grid.open_passage(Coord::new(1, 0), Coord::new(0, 0))
            .expect("adjacent cells");
        grid.open_passage(Coord::new(0, 0), Coord::new(1, 0))
            .expect("adjacent cells");

        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn test_open_passage_rejects_invalid_pairs() {
        let mut grid = Grid::new(3, 3).expect("valid dimensions");

        assert!(grid
            .open_passage(Coord::new(0, 0), Coord::new(1, 1))
            .is_err());
        assert!(grid
            .open_passage(Coord::new(0, 0), Coord::new(0, 2))
            .is_err());
        assert!(grid
            .open_passage(Coord::new(2, 2), Coord::new(2, 3))
            .is_err());
        assert!(grid
            .open_passage(Coord::new(1, 1), Coord::new(1, 1))
            .is_err());
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn test_open_boundary_only_outward() {
        let mut grid = Grid::new(2, 2).expect("valid dimensions");

        grid.open_boundary(Coord::new(0, 0), Direction::North)
            .expect("north side of the origin faces outside");
        assert!(!grid
            .has_wall(Coord::new(0, 0), Direction::North)
            .expect("in bounds"));
        assert!(grid
            .open_boundary(Coord::new(0, 0), Direction::South)
            .is_err());
        assert!(grid
            .open_boundary(Coord::new(5, 5), Direction::South)
            .is_err());
        assert_eq!(grid.passage_count(), 0);
        assert_eq!(grid.open_neighbors(Coord::new(0, 0)).count(), 0);
    }

    #[test]
    fn test_cell_open_sides() {
        let mut grid = Grid::new(1, 3).expect("valid dimensions");
        grid.open_passage(Coord::new(0, 1), Coord::new(0, 0))
            .expect("adjacent cells");
        grid.open_passage(Coord::new(0, 1), Coord::new(0, 2))
            .expect("adjacent cells");

        let middle = grid.cell(Coord::new(0, 1)).expect("in bounds");
        assert_eq!(middle.position(), Coord::new(0, 1));
        assert_eq!(
            middle.open_sides().collect::<Vec<_>>(),
            vec![Direction::East, Direction::West]
        );
    }
}
