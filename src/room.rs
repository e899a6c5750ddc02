use crate::{
    error::{CaveGenError, Result},
    region::{find_regions, Region},
    volume::{CellState, Volume},
    SpawnArea, Voxel, VoxelEncoder,
};

use ilattice3::Point;
use serde::{Deserialize, Serialize};
use stats::OnlineStats;

pub const EMPTY_VOXEL: Voxel = Voxel {
    distance: std::f32::MAX,
    voxel_type: 0,
};

pub const SOLID_VOXEL: Voxel = Voxel {
    distance: -1.0,
    voxel_type: 1,
};

/// Writes every cell of the finished volume into `encoder`, in x -> y -> z order.
pub fn fill_map_with_volume(volume: &Volume, encoder: &mut impl VoxelEncoder) {
    for (p, state) in volume.iter() {
        let voxel = match state {
            CellState::Solid => &SOLID_VOXEL,
            CellState::Empty => &EMPTY_VOXEL,
        };
        encoder.encode_voxel(&p, voxel);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RegionSizeStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub largest: usize,
}

impl RegionSizeStats {
    pub fn from_regions(regions: &[Region]) -> Self {
        let mut online = OnlineStats::new();
        for r in regions.iter() {
            online.add(r.size());
        }

        if regions.is_empty() {
            RegionSizeStats::default()
        } else {
            RegionSizeStats {
                count: regions.len(),
                mean: online.mean(),
                std_dev: online.stddev(),
                largest: regions.iter().map(Region::size).max().unwrap_or(0),
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct CurationSummary {
    /// The one open region left in the volume, if any was big enough.
    pub main_room: Option<Region>,
    /// Regions smaller than the threshold.
    pub pockets_sealed: usize,
    /// Regions that met the threshold but lost to the main room.
    pub rooms_merged: usize,
    /// Sizes of all open regions before curation.
    pub region_sizes: RegionSizeStats,
}

fn seal(volume: &mut Volume, region: &Region) -> Result<()> {
    for t in region.tiles.iter() {
        volume.set(t, CellState::Solid)?;
    }

    Ok(())
}

/// Seals every open region smaller than `room_threshold_size`, then seals all surviving rooms
/// except the largest. Ties go to the room found first.
pub fn curate(mut volume: Volume, room_threshold_size: i32) -> Result<(Volume, CurationSummary)> {
    if room_threshold_size < 0 {
        return Err(CaveGenError::InvalidThreshold(room_threshold_size));
    }
    let threshold = room_threshold_size as usize;

    let regions = find_regions(&volume, CellState::Empty)?;
    let region_sizes = RegionSizeStats::from_regions(&regions);

    let mut rooms = Vec::new();
    let mut pockets_sealed = 0;
    for r in regions.into_iter() {
        if r.size() < threshold {
            seal(&mut volume, &r)?;
            pockets_sealed += 1;
        } else {
            rooms.push(r);
        }
    }

    // Stable, so equal sizes keep discovery order.
    rooms.sort_by(|r1, r2| r2.size().cmp(&r1.size()));
    let mut rooms = rooms.into_iter();
    let main_room = rooms.next();
    let mut rooms_merged = 0;
    for r in rooms {
        seal(&mut volume, &r)?;
        rooms_merged += 1;
    }

    log::debug!(
        "Curated {} open regions (mean size {:.1}): sealed {} pockets and {} extra rooms",
        region_sizes.count,
        region_sizes.mean,
        pockets_sealed,
        rooms_merged
    );
    if let Some(room) = main_room.as_ref() {
        log::debug!("Main room has {} cells", room.size());
    }

    Ok((
        volume,
        CurationSummary {
            main_room,
            pockets_sealed,
            rooms_merged,
            region_sizes,
        },
    ))
}

/// The cells of `room` that stand directly on top of a solid cell.
pub fn spawn_in_room(room: &Region, volume: &Volume) -> SpawnArea {
    let valid_spawn_points = room
        .tiles
        .iter()
        .filter(|t| {
            let below = Point::from([t.x, t.y - 1, t.z]);
            volume.try_get(&below) == Some(CellState::Solid)
        })
        .cloned()
        .collect();

    SpawnArea { valid_spawn_points }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{automaton::smooth, sampling::random_fill};

    fn solid_block(w: i32, h: i32, d: i32) -> Volume {
        Volume::new_filled(w, h, d, CellState::Solid).unwrap()
    }

    fn carve_box(volume: &mut Volume, min: [i32; 3], max: [i32; 3]) {
        for x in min[0]..=max[0] {
            for y in min[1]..=max[1] {
                for z in min[2]..=max[2] {
                    volume.set(&[x, y, z].into(), CellState::Empty).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_undersized_region_is_sealed() {
        let volume = random_fill(5, 5, 5, 0, "test").unwrap();
        let (curated, summary) = curate(volume, 30).unwrap();

        assert_eq!(curated.count(CellState::Solid), 125);
        assert!(summary.main_room.is_none());
        assert_eq!(summary.pockets_sealed, 1);
        assert_eq!(summary.rooms_merged, 0);
        assert_eq!(summary.region_sizes.largest, 27);
    }

    #[test]
    fn test_only_largest_room_survives() {
        let mut volume = solid_block(12, 6, 6);
        // 2x2x2 = 8 cells
        carve_box(&mut volume, [1, 1, 1], [2, 2, 2]);
        // 3x3x3 = 27 cells
        carve_box(&mut volume, [5, 1, 1], [7, 3, 3]);
        // 1 cell pocket
        carve_box(&mut volume, [10, 4, 4], [10, 4, 4]);

        let (curated, summary) = curate(volume, 4).unwrap();
        assert_eq!(curated.count(CellState::Empty), 27);
        assert_eq!(summary.pockets_sealed, 1);
        assert_eq!(summary.rooms_merged, 1);
        assert_eq!(summary.main_room.unwrap().size(), 27);
        assert_eq!(curated.get(&[6, 2, 2].into()).unwrap(), CellState::Empty);
        assert_eq!(curated.get(&[1, 1, 1].into()).unwrap(), CellState::Solid);
    }

    #[test]
    fn test_tie_goes_to_first_discovered_room() {
        let mut volume = solid_block(9, 5, 5);
        carve_box(&mut volume, [1, 1, 1], [2, 2, 2]);
        carve_box(&mut volume, [5, 1, 1], [6, 2, 2]);

        let (curated, summary) = curate(volume, 0).unwrap();
        assert_eq!(curated.count(CellState::Empty), 8);
        assert_eq!(curated.get(&[1, 1, 1].into()).unwrap(), CellState::Empty);
        assert_eq!(curated.get(&[5, 1, 1].into()).unwrap(), CellState::Solid);
        assert_eq!(summary.rooms_merged, 1);
    }

    #[test]
    fn test_single_region_with_zero_threshold_is_untouched() {
        let volume = random_fill(6, 6, 6, 0, "single").unwrap();
        let (curated, summary) = curate(volume.clone(), 0).unwrap();

        assert_eq!(curated, volume);
        assert_eq!(summary.pockets_sealed, 0);
        assert_eq!(summary.rooms_merged, 0);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let volume = solid_block(3, 3, 3);

        assert!(matches!(
            curate(volume, -1),
            Err(CaveGenError::InvalidThreshold(-1))
        ));
    }

    #[test]
    fn test_at_most_one_open_region_after_curation() {
        let volume = smooth(random_fill(16, 16, 16, 45, "survivor").unwrap(), 3).unwrap();
        let (curated, summary) = curate(volume, 10).unwrap();

        let open = find_regions(&curated, CellState::Empty).unwrap();
        assert!(open.len() <= 1);
        if let Some(room) = open.first() {
            assert!(room.size() >= 10);
            assert_eq!(room.size(), summary.main_room.unwrap().size());
        } else {
            assert_eq!(curated.count(CellState::Solid), curated.num_cells());
        }
    }

    #[test]
    fn test_region_size_stats() {
        let mut volume = solid_block(12, 6, 6);
        carve_box(&mut volume, [1, 1, 1], [2, 2, 2]);
        carve_box(&mut volume, [5, 1, 1], [5, 1, 4]);

        let regions = find_regions(&volume, CellState::Empty).unwrap();
        let stats = RegionSizeStats::from_regions(&regions);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.largest, 8);
        assert!((stats.mean - 6.0).abs() < 1e-9);
        assert!(stats.std_dev > 0.0);

        let none = RegionSizeStats::from_regions(&[]);
        assert_eq!(none.count, 0);
    }

    #[test]
    fn test_spawn_points_stand_on_solid_ground() {
        let mut volume = solid_block(6, 6, 6);
        carve_box(&mut volume, [1, 1, 1], [3, 3, 2]);
        let (volume, summary) = curate(volume, 1).unwrap();
        let room = summary.main_room.unwrap();

        let spawn = spawn_in_room(&room, &volume);
        // Only the y = 1 layer of the room has a floor under it.
        assert_eq!(spawn.valid_spawn_points.len(), 3 * 2);
        assert!(spawn.valid_spawn_points.iter().all(|p| p.y == 1));
    }

    struct RecordingEncoder {
        solid: usize,
        empty: usize,
        last: Option<Point>,
    }

    impl VoxelEncoder for RecordingEncoder {
        fn encode_voxel(&mut self, point: &Point, data: &Voxel) {
            if data.voxel_type == SOLID_VOXEL.voxel_type {
                self.solid += 1;
            } else {
                self.empty += 1;
            }
            self.last = Some(*point);
        }
    }

    #[test]
    fn test_fill_map_with_volume_visits_every_cell() {
        let volume = random_fill(5, 5, 5, 0, "test").unwrap();
        let mut encoder = RecordingEncoder {
            solid: 0,
            empty: 0,
            last: None,
        };
        fill_map_with_volume(&volume, &mut encoder);

        assert_eq!(encoder.solid, 98);
        assert_eq!(encoder.empty, 27);
        let last = encoder.last.unwrap();
        assert_eq!((last.x, last.y, last.z), (4, 4, 4));
    }
}
