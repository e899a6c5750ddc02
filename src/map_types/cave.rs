use crate::{
    automaton::smooth,
    error::{CaveGenError, Result},
    room::{curate, fill_map_with_volume, spawn_in_room, RegionSizeStats},
    sampling::{random_fill, validate_fill_percent},
    volume::{validate_dimensions, CellState, Volume},
    ExclusionMask, SpawnArea, VoxelEncoder,
};

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct CaveMeta {
    pub spawn_area: SpawnArea,
    pub main_room_size: usize,
    pub pockets_sealed: usize,
    pub rooms_merged: usize,
    pub region_sizes: RegionSizeStats,
}

/// Everything needed to reproduce a cave. Fields are signed so that bad values survive
/// deserialization and get reported by `validate`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CaveMapSpec {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub fill_percent: i32,
    pub seed: String,
    pub smoothing_iterations: i32,
    pub room_threshold_size: i32,
}

impl CaveMapSpec {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::de::from_str(s)?)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.width, self.height, self.depth)?;
        validate_fill_percent(self.fill_percent)?;
        if self.smoothing_iterations < 0 {
            return Err(CaveGenError::InvalidIterationCount(
                self.smoothing_iterations,
            ));
        }
        if self.room_threshold_size < 0 {
            return Err(CaveGenError::InvalidThreshold(self.room_threshold_size));
        }

        Ok(())
    }

    pub fn generate(&self, mask: Option<&dyn ExclusionMask>) -> Result<Volume> {
        self.generate_with_meta(mask).map(|(volume, _)| volume)
    }

    /// Fill, carve, smooth, then keep only the main cavern.
    pub fn generate_with_meta(
        &self,
        mask: Option<&dyn ExclusionMask>,
    ) -> Result<(Volume, CaveMeta)> {
        self.validate()?;
        log::debug!("Generating cave map {:?}", self);

        let mut volume = random_fill(
            self.width,
            self.height,
            self.depth,
            self.fill_percent,
            &self.seed,
        )?;

        if let Some(mask) = mask {
            let carved = apply_exclusion_mask(&mut volume, mask)?;
            log::debug!("Exclusion mask carved {} cells", carved);
        }

        let volume = smooth(volume, self.smoothing_iterations)?;
        let (volume, summary) = curate(volume, self.room_threshold_size)?;

        let (spawn_area, main_room_size) = match summary.main_room.as_ref() {
            Some(room) => (spawn_in_room(room, &volume), room.size()),
            None => (
                SpawnArea {
                    valid_spawn_points: Vec::new(),
                },
                0,
            ),
        };
        log::debug!(
            "{} spawn points in main room",
            spawn_area.valid_spawn_points.len()
        );

        Ok((
            volume,
            CaveMeta {
                spawn_area,
                main_room_size,
                pockets_sealed: summary.pockets_sealed,
                rooms_merged: summary.rooms_merged,
                region_sizes: summary.region_sizes,
            },
        ))
    }

    /// On success, writes the generated voxels into `encoder`. Leaves the encoder untouched on
    /// failure.
    pub fn generate_into(
        &self,
        mask: Option<&dyn ExclusionMask>,
        encoder: &mut impl VoxelEncoder,
    ) -> Result<CaveMeta> {
        let (volume, meta) = self.generate_with_meta(mask)?;
        fill_map_with_volume(&volume, encoder);

        Ok(meta)
    }
}

/// Forces every interior cell selected by `mask` to be empty. The boundary is never carved.
/// Returns the number of cells the mask selected.
pub fn apply_exclusion_mask(volume: &mut Volume, mask: &dyn ExclusionMask) -> Result<usize> {
    let mut carved = 0;
    for p in volume.points() {
        if volume.is_boundary(&p) {
            continue;
        }
        if mask.excludes(&p) {
            volume.set(&p, CellState::Empty)?;
            carved += 1;
        }
    }

    Ok(carved)
}
