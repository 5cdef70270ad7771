use ndarray::Array2;

/// Single grid axis, used for board width, height, rows and columns.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid position as `(row, col)`, or a board shape as `(height, width)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Shape of a grid as `(rows, cols)`, saturating at `Coord::MAX` per axis.
pub fn grid_shape<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, cols) = grid.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        cols.try_into().unwrap_or(Coord::MAX),
    )
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Coord2) -> NeighborIter {
        NeighborIter::new(center, grid_shape(self))
    }
}

/// Row/column offsets of the eight surrounding cells.
const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Shifts `pos` by `offset`, dropping anything that leaves the `shape`.
fn offset_within(pos: Coord2, offset: (i8, i8), shape: Coord2) -> Option<Coord2> {
    let row = pos.0.checked_add_signed(offset.0)?;
    let col = pos.1.checked_add_signed(offset.1)?;
    (row < shape.0 && col < shape.1).then_some((row, col))
}

/// Iterates the in-bounds Chebyshev neighbors of a cell.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    shape: Coord2,
    next_offset: usize,
}

impl NeighborIter {
    pub fn new(center: Coord2, shape: Coord2) -> Self {
        Self {
            center,
            shape,
            next_offset: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&offset) = OFFSETS.get(self.next_offset) {
            self.next_offset += 1;
            if let Some(pos) = offset_within(self.center, offset, self.shape) {
                return Some(pos);
            }
        }
        None
    }
}
