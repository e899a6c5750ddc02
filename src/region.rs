use crate::{
    error::{CaveGenError, Result},
    volume::{CellState, Volume},
};

use ilattice3::Point;
use std::collections::VecDeque;

/// A maximal connected set of cells that all have the same state.
#[derive(Clone, Debug)]
pub struct Region {
    pub state: CellState,
    pub tiles: Vec<Point>,
}

impl Region {
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// Two cells are directly connected if they lie in the same 3x3x3 block and agree on at least
/// one coordinate. That admits face and edge neighbors, but not corner diagonals.
pub fn are_adjacent(p1: &Point, p2: &Point) -> bool {
    let (dx, dy, dz) = ((p1.x - p2.x).abs(), (p1.y - p2.y).abs(), (p1.z - p2.z).abs());
    let same_cell = dx == 0 && dy == 0 && dz == 0;
    let in_block = dx <= 1 && dy <= 1 && dz <= 1;

    !same_cell && in_block && (dx == 0 || dy == 0 || dz == 0)
}

/// Per-call scratch marking cells already claimed by a region. Indexed like the volume.
struct VisitedGrid {
    flags: Vec<bool>,
}

impl VisitedGrid {
    fn new(volume: &Volume) -> Self {
        VisitedGrid {
            flags: vec![false; volume.num_cells()],
        }
    }

    /// Anything outside the grid counts as visited so the flood never leaves it.
    fn is_visited(&self, volume: &Volume, p: &Point) -> bool {
        volume.index(p).map_or(true, |i| self.flags[i])
    }

    fn visit(&mut self, volume: &Volume, p: &Point) -> Result<()> {
        let i = volume
            .index(p)
            .ok_or(CaveGenError::OutOfBounds { point: *p })?;
        self.flags[i] = true;

        Ok(())
    }
}

/// Breadth first flood fill from `start` over cells sharing its state. Neighbors are tried in
/// x -> y -> z order so the tile order is deterministic.
fn flood_fill(volume: &Volume, start: &Point, visited: &mut VisitedGrid) -> Result<Region> {
    let state = volume.get(start)?;
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();
    visited.visit(volume, start)?;
    queue.push_back(*start);

    while let Some(tile) = queue.pop_front() {
        tiles.push(tile);
        for x in tile.x - 1..=tile.x + 1 {
            for y in tile.y - 1..=tile.y + 1 {
                for z in tile.z - 1..=tile.z + 1 {
                    let n = Point::from([x, y, z]);
                    if !are_adjacent(&tile, &n) || visited.is_visited(volume, &n) {
                        continue;
                    }
                    if volume.try_get(&n) == Some(state) {
                        visited.visit(volume, &n)?;
                        queue.push_back(n);
                    }
                }
            }
        }
    }

    Ok(Region { state, tiles })
}

/// The region containing `start`.
pub fn region_tiles(volume: &Volume, start: &Point) -> Result<Region> {
    if !volume.contains(start) {
        return Err(CaveGenError::OutOfBounds { point: *start });
    }
    let mut visited = VisitedGrid::new(volume);

    flood_fill(volume, start, &mut visited)
}

/// Partitions every cell in state `target` into regions, ordered by their first cell in
/// x -> y -> z order.
pub fn find_regions(volume: &Volume, target: CellState) -> Result<Vec<Region>> {
    let mut visited = VisitedGrid::new(volume);
    let mut regions = Vec::new();
    for (p, state) in volume.iter() {
        if state == target && !visited.is_visited(volume, &p) {
            regions.push(flood_fill(volume, &p, &mut visited)?);
        }
    }
    log::debug!("Found {} {:?} regions", regions.len(), target);

    Ok(regions)
}
