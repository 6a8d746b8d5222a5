use crate::components::{step, Dir, Pos, Tile};
use log::{debug, info};
use rand::Rng;
use std::collections::VecDeque;

/// Wall placements tried per map, skipped picks included.
pub const WALL_ATTEMPTS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// Border ring of walls around an interior full of pellets.
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut grid = Self {
            width,
            height,
            tiles: vec![vec![Tile::Pellet; width]; height],
        };
        for y in 0..height {
            for x in 0..width {
                let pos = Pos { x, y };
                if grid.is_border(pos) {
                    grid.set(pos, Tile::Wall);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.tiles[pos.y][pos.x]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        self.tiles[pos.y][pos.x] = tile;
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.tile(pos) == Tile::Wall
    }

    /// In-bounds neighbour of `pos` in `dir`.
    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        step(pos, dir).filter(|next| self.in_bounds(*next))
    }

    /// True when a walker at `pos` may enter the cell in `dir`.
    pub fn can_move(&self, pos: Pos, dir: Dir) -> bool {
        self.neighbor(pos, dir).is_some_and(|next| !self.is_wall(next))
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.iter().map(Vec::as_slice)
    }
}

/// Tally of what happened to each wall candidate during generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub attempts: usize,
    pub skipped: usize,
    pub redundant: usize,
    pub rejected: usize,
    pub placed: usize,
}

/// Scatters up to `attempts` interior walls over a bordered pellet grid,
/// keeping each one only if every pellet is still reachable from `player`.
///
/// A pick that lands on a spawn is skipped but still uses up an attempt, so
/// the loop always runs exactly `attempts` times.
pub fn generate_map(
    rng: &mut impl Rng,
    width: usize,
    height: usize,
    player: Pos,
    ghosts: &[Pos],
    attempts: usize,
) -> (Grid, GenerationReport) {
    let mut grid = Grid::bordered(width, height);
    let mut report = GenerationReport::default();
    let has_interior = width >= 3 && height >= 3;

    for _ in 0..attempts {
        report.attempts += 1;
        if !has_interior {
            continue;
        }

        let x = rng.gen_range(1..width - 1);
        let y = rng.gen_range(1..height - 1);
        let pos = Pos { x, y };

        if pos == player || ghosts.contains(&pos) {
            report.skipped += 1;
            continue;
        }

        let previous = grid.tile(pos);
        if previous == Tile::Wall {
            report.redundant += 1;
            continue;
        }

        grid.set(pos, Tile::Wall);
        if is_progressable(&grid, player) {
            debug!("wall kept at ({x}, {y})");
            report.placed += 1;
        } else {
            debug!("wall at ({x}, {y}) would strand pellets, reverting");
            grid.set(pos, previous);
            report.rejected += 1;
        }
    }

    (grid, report)
}

/// Flood from `start` over in-bounds, non-wall cells.
pub fn reachable_cells(grid: &Grid, start: Pos) -> Vec<Vec<bool>> {
    let mut seen = vec![vec![false; grid.width()]; grid.height()];
    if !grid.in_bounds(start) {
        return seen;
    }

    let mut q = VecDeque::new();
    seen[start.y][start.x] = true;
    q.push_back(start);

    while let Some(pos) = q.pop_front() {
        for dir in Dir::ALL {
            let Some(next) = grid.neighbor(pos, dir) else {
                continue;
            };
            if seen[next.y][next.x] || grid.is_wall(next) {
                continue;
            }
            seen[next.y][next.x] = true;
            q.push_back(next);
        }
    }
    seen
}

/// True iff no pellet is cut off from `start`.
pub fn is_progressable(grid: &Grid, start: Pos) -> bool {
    let seen = reachable_cells(grid, start);
    grid.rows().zip(&seen).all(|(row, seen_row)| {
        row.iter()
            .zip(seen_row)
            .all(|(&tile, &reached)| tile != Tile::Pellet || reached)
    })
}

#[derive(Debug, Clone)]
pub struct LevelData {
    pub grid: Grid,
    pub player_start: Pos,
    pub ghost_starts: Vec<Pos>,
    pub report: GenerationReport,
}

/// Player in the top-left corner, one ghost in each of the other three.
pub fn create_level(rng: &mut impl Rng, width: usize, height: usize) -> LevelData {
    let player_start = Pos::new(1, 1);
    let ghost_starts = vec![
        Pos::new(width - 2, height - 2),
        Pos::new(1, height - 2),
        Pos::new(width - 2, 1),
    ];

    let (grid, report) = generate_map(
        rng,
        width,
        height,
        player_start,
        &ghost_starts,
        WALL_ATTEMPTS,
    );
    info!(
        "generated {}x{} map: {} pellets, {} rejected, {} skipped, {} redundant",
        width,
        height,
        grid.count(Tile::Pellet),
        report.rejected,
        report.skipped,
        report.redundant
    );

    LevelData {
        grid,
        player_start,
        ghost_starts,
        report,
    }
}
