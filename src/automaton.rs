use crate::{
    error::{CaveGenError, Result},
    volume::{CellState, Volume},
};

use ilattice3::Point;

/// A cell with at least this many solid neighbors becomes solid.
pub const BIRTH_THRESHOLD: u32 = 15;
/// A cell with fewer than this many solid neighbors becomes empty. Counts in between keep
/// their state, which stops cells from flipping back and forth between passes.
pub const DEATH_THRESHOLD: u32 = 13;

/// Number of solid cells in the 3x3x3 block around `p`, not counting `p` itself. Anything
/// outside the grid counts as solid.
pub fn count_solid_neighbors(volume: &Volume, p: &Point) -> u32 {
    let mut count = 0;
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                let n = Point::from([p.x + dx, p.y + dy, p.z + dz]);
                count += volume
                    .try_get(&n)
                    .map_or(1, |state| u32::from(state.as_u8()));
            }
        }
    }

    count
}

pub fn next_state(current: CellState, solid_neighbors: u32) -> CellState {
    if solid_neighbors >= BIRTH_THRESHOLD {
        CellState::Solid
    } else if solid_neighbors < DEATH_THRESHOLD {
        CellState::Empty
    } else {
        current
    }
}

/// One smoothing pass. Every neighbor count is read from `volume` as it was before the pass;
/// the result goes into a fresh buffer.
pub fn smooth_pass(volume: &Volume) -> Result<Volume> {
    let mut next = volume.clone();
    for (p, state) in volume.iter() {
        next.set(&p, next_state(state, count_solid_neighbors(volume, &p)))?;
    }

    Ok(next)
}

pub fn smooth(mut volume: Volume, iterations: i32) -> Result<Volume> {
    if iterations < 0 {
        return Err(CaveGenError::InvalidIterationCount(iterations));
    }

    for i in 0..iterations {
        volume = smooth_pass(&volume)?;
        log::debug!(
            "Smoothing pass {} left {} solid cells",
            i + 1,
            volume.count(CellState::Solid)
        );
    }

    Ok(volume)
}
