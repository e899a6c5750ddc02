use crate::{
    error::{CaveGenError, Result},
    volume::{validate_dimensions, CellState, Volume},
};

use fnv::FnvHasher;
use rand::{rngs::SmallRng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use std::hash::Hasher;

/// FNV-1a over the UTF-8 bytes of `seed`. Unlike `std`'s default hasher this is stable across
/// runs, builds, and platforms, so a seed string always names the same cave.
pub fn hash_seed(seed: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(seed.as_bytes());

    hasher.finish()
}

pub fn seeded_rng(seed: &str) -> SmallRng {
    SmallRng::seed_from_u64(hash_seed(seed))
}

pub fn validate_fill_percent(fill_percent: i32) -> Result<()> {
    if !(0..=100).contains(&fill_percent) {
        return Err(CaveGenError::InvalidFillPercent(fill_percent));
    }

    Ok(())
}

/// Boundary cells are always solid. Interior cells are solid with probability
/// `fill_percent / 100`, one draw per interior cell in x -> y -> z order.
pub fn random_fill(
    width: i32,
    height: i32,
    depth: i32,
    fill_percent: i32,
    seed: &str,
) -> Result<Volume> {
    validate_dimensions(width, height, depth)?;
    validate_fill_percent(fill_percent)?;

    let mut rng = seeded_rng(seed);
    let dist = Uniform::new(0, 100);
    let mut volume = Volume::new_filled(width, height, depth, CellState::Solid)?;
    for p in volume.points() {
        if volume.is_boundary(&p) {
            // Boundary is already solid and doesn't consume a draw.
            continue;
        }
        let state = if dist.sample(&mut rng) < fill_percent {
            CellState::Solid
        } else {
            CellState::Empty
        };
        volume.set(&p, state)?;
    }
    log::debug!(
        "Random fill left {} of {} cells solid",
        volume.count(CellState::Solid),
        volume.num_cells()
    );

    Ok(volume)
}
