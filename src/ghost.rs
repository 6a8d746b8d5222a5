use crate::components::{Dir, Pos};
use crate::level::Grid;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

/// One random-walk step: shuffle the four directions and take the first one
/// that isn't blocked. A ghost boxed in on all sides stays put.
pub fn ghost_step(grid: &Grid, pos: Pos, rng: &mut impl Rng) -> Pos {
    let mut dirs = Dir::ALL;
    dirs.shuffle(rng);
    let next = dirs
        .iter()
        .filter_map(|&dir| grid.neighbor(pos, dir))
        .find(|&next| !grid.is_wall(next))
        .unwrap_or(pos);
    trace!("ghost ({}, {}) -> ({}, {})", pos.x, pos.y, next.x, next.y);
    next
}
