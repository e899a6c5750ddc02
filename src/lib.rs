pub mod automaton;
pub mod error;
pub mod map_types;
pub mod region;
pub mod room;
pub mod sampling;
pub mod volume;

pub use error::{CaveGenError, Result};
pub use map_types::cave::{CaveMapSpec, CaveMeta};
pub use volume::{CellState, Volume};

use ilattice3::{Extent, Point};
use serde::{Deserialize, Serialize};

/// Implement this to allow the procedural generation algorithms to write into your voxel map.
pub trait VoxelEncoder {
    /// `data` is the voxel data to write into `point`.
    fn encode_voxel(&mut self, point: &Point, data: &Voxel);
}

/// Selects interior cells that must be open before smoothing, e.g. a starting chamber.
pub trait ExclusionMask {
    fn excludes(&self, point: &Point) -> bool;
}

impl<F> ExclusionMask for F
where
    F: Fn(&Point) -> bool,
{
    fn excludes(&self, point: &Point) -> bool {
        self(point)
    }
}

/// Carves out every cell inside the extent.
impl ExclusionMask for Extent {
    fn excludes(&self, point: &Point) -> bool {
        self.contains_world(point)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SpawnArea {
    pub valid_spawn_points: Vec<Point>,
}

pub struct Voxel {
    pub distance: f32,
    pub voxel_type: u8,
}
