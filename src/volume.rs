use crate::error::{CaveGenError, Result};

use ilattice3::{Extent, Point};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CellState {
    Solid,
    Empty,
}

impl CellState {
    pub fn is_solid(self) -> bool {
        self == CellState::Solid
    }

    /// 1 for solid, 0 for empty. This is the value neighbor counting sums over.
    pub fn as_u8(self) -> u8 {
        match self {
            CellState::Solid => 1,
            CellState::Empty => 0,
        }
    }
}

/// Checks that every dimension is positive and that the cell count fits in a `usize`. Done
/// before anything gets allocated. Returns the cell count.
pub fn validate_dimensions(width: i32, height: i32, depth: i32) -> Result<usize> {
    let invalid = CaveGenError::InvalidDimensions {
        width,
        height,
        depth,
    };
    if width <= 0 || height <= 0 || depth <= 0 {
        return Err(invalid);
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(depth as usize))
        .ok_or(invalid)
}

/// A dense `width x height x depth` grid of cell states.
///
/// Cells are stored in one flat buffer, x outermost and z innermost, which is also the order
/// every generation stage walks the grid in. All access by `Point` is bounds checked against
/// the volume's extent.
#[derive(Clone, Debug)]
pub struct Volume {
    extent: Extent,
    dims: [i32; 3],
    cells: Vec<CellState>,
}

impl Volume {
    pub fn new_filled(width: i32, height: i32, depth: i32, state: CellState) -> Result<Self> {
        let num_cells = validate_dimensions(width, height, depth)?;

        Ok(Volume {
            extent: Extent::from_min_and_local_supremum(
                [0, 0, 0].into(),
                [width, height, depth].into(),
            ),
            dims: [width, height, depth],
            cells: vec![state; num_cells],
        })
    }

    /// Rebuilds a volume from a flat `0 = empty, 1 = solid` map in x -> y -> z order.
    pub fn from_cell_map(width: i32, height: i32, depth: i32, cell_map: &[u8]) -> Result<Self> {
        let mut volume = Self::new_filled(width, height, depth, CellState::Solid)?;
        if cell_map.len() != volume.cells.len() {
            return Err(CaveGenError::CellMapLength {
                expected: volume.cells.len(),
                actual: cell_map.len(),
            });
        }

        for (index, (cell, value)) in volume.cells.iter_mut().zip(cell_map).enumerate() {
            *cell = match *value {
                0 => CellState::Empty,
                1 => CellState::Solid,
                _ => {
                    return Err(CaveGenError::InvalidCellValue {
                        index,
                        value: *value,
                    })
                }
            };
        }

        Ok(volume)
    }

    pub fn to_cell_map(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.as_u8()).collect()
    }

    pub fn width(&self) -> i32 {
        self.dims[0]
    }

    pub fn height(&self) -> i32 {
        self.dims[1]
    }

    pub fn depth(&self) -> i32 {
        self.dims[2]
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.extent.contains_world(p)
    }

    /// True iff `p` lies on one of the six faces of the grid.
    pub fn is_boundary(&self, p: &Point) -> bool {
        let [w, h, d] = self.dims;

        p.x == 0 || p.x == w - 1 || p.y == 0 || p.y == h - 1 || p.z == 0 || p.z == d - 1
    }

    /// Flat buffer index of `p`, or `None` outside the grid. Computed in `usize` since the cell
    /// count may exceed `i32::MAX`.
    pub(crate) fn index(&self, p: &Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let [_, h, d] = self.dims;
        let (x, y, z) = (p.x as usize, p.y as usize, p.z as usize);

        Some((x * h as usize + y) * d as usize + z)
    }

    pub fn get(&self, p: &Point) -> Result<CellState> {
        self.index(p)
            .map(|i| self.cells[i])
            .ok_or(CaveGenError::OutOfBounds { point: *p })
    }

    pub fn set(&mut self, p: &Point, state: CellState) -> Result<()> {
        let i = self
            .index(p)
            .ok_or(CaveGenError::OutOfBounds { point: *p })?;
        self.cells[i] = state;

        Ok(())
    }

    /// Same as `get`, but anything outside the grid reads as `None` instead of an error.
    pub fn try_get(&self, p: &Point) -> Option<CellState> {
        self.index(p).map(|i| self.cells[i])
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }

    /// Every point of the grid, x outer, y middle, z inner.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let [w, h, d] = self.dims;

        (0..w).flat_map(move |x| {
            (0..h).flat_map(move |y| (0..d).map(move |z| Point::from([x, y, z])))
        })
    }

    /// Points paired with their state, in the same order as `points`.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        self.points().zip(self.cells.iter().cloned())
    }
}

impl PartialEq for Volume {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.cells == other.cells
    }
}

impl Eq for Volume {}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
