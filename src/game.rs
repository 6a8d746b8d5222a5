use crate::components::{Dir, Pos, Tile};
use crate::ghost::ghost_step;
use crate::level::{Grid, LevelData};
use crate::player::{consume_pellet, player_step};
use rand::Rng;

pub struct Game {
    pub grid: Grid,
    pub player: Pos,
    pub ghosts: Vec<Pos>,
    pub score: u32,
    pub pellets_left: usize,
    pub dir: Option<Dir>,
}

impl Game {
    pub fn new(level: LevelData) -> Self {
        let pellets_left = level.grid.count(Tile::Pellet);
        Self {
            grid: level.grid,
            player: level.player_start,
            ghosts: level.ghost_starts,
            score: 0,
            pellets_left,
            dir: None,
        }
    }

    /// The last direction pressed sticks until another one replaces it.
    pub fn apply_input(&mut self, dir: Dir) {
        self.dir = Some(dir);
    }

    /// False only when the intent points into a wall. Standing still with no
    /// intent counts as an allowed step onto the player's own cell.
    fn move_player(&mut self) -> bool {
        match self.dir {
            Some(dir) if !self.grid.can_move(self.player, dir) => false,
            _ => {
                self.player = player_step(&self.grid, self.player, self.dir);
                true
            }
        }
    }

    fn consume_tile(&mut self) {
        if consume_pellet(&mut self.grid, self.player) {
            self.score += 1;
            self.pellets_left = self.pellets_left.saturating_sub(1);
        }
    }

    fn update_ghosts(&mut self, rng: &mut impl Rng) {
        for ghost in self.ghosts.iter_mut() {
            *ghost = ghost_step(&self.grid, *ghost, rng);
        }
    }

    /// Player first, then every ghost. Collisions are checked separately so
    /// the caller can draw the frame before ending the session.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        if self.move_player() {
            self.consume_tile();
        }
        self.update_ghosts(rng);
    }

    pub fn is_caught(&self) -> bool {
        self.ghosts.iter().any(|g| *g == self.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{create_level, GenerationReport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_level(width: usize, height: usize, ghosts: Vec<Pos>) -> LevelData {
        LevelData {
            grid: Grid::bordered(width, height),
            player_start: Pos::new(1, 1),
            ghost_starts: ghosts,
            report: GenerationReport::default(),
        }
    }

    #[test]
    fn idle_first_tick_eats_spawn_pellet() {
        let mut game = Game::new(open_level(5, 5, vec![]));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(game.pellets_left, 9);

        game.tick(&mut rng);
        assert_eq!(game.player, Pos::new(1, 1));
        assert_eq!(game.score, 1);
        assert_eq!(game.grid.tile(Pos::new(1, 1)), Tile::Empty);

        game.apply_input(Dir::Right);
        game.tick(&mut rng);
        assert_eq!(game.player, Pos::new(2, 1));
        assert_eq!(game.score, 2);

        game.apply_input(Dir::Left);
        game.tick(&mut rng);
        assert_eq!(game.score, 2);
        assert_eq!(game.pellets_left, 7);
    }

    #[test]
    fn blocked_first_step_leaves_spawn_pellet() {
        let mut game = Game::new(open_level(5, 5, vec![]));
        let mut rng = StdRng::seed_from_u64(0);
        game.apply_input(Dir::Up);
        game.tick(&mut rng);
        assert_eq!(game.player, Pos::new(1, 1));
        assert_eq!(game.score, 0);
        assert_eq!(game.grid.tile(Pos::new(1, 1)), Tile::Pellet);
    }

    #[test]
    fn direction_persists_against_a_wall() {
        let mut game = Game::new(open_level(5, 5, vec![]));
        let mut rng = StdRng::seed_from_u64(0);
        game.apply_input(Dir::Down);
        for _ in 0..5 {
            game.tick(&mut rng);
        }
        assert_eq!(game.player, Pos::new(1, 3));
        assert_eq!(game.dir, Some(Dir::Down));
        assert_eq!(game.score, 2);
    }

    #[test]
    fn ghost_on_player_is_caught() {
        let mut game = Game::new(open_level(5, 5, vec![Pos::new(3, 3)]));
        assert!(!game.is_caught());
        game.ghosts[0] = game.player;
        assert!(game.is_caught());
    }

    #[test]
    fn boxed_in_ghost_catches_player_who_walks_in() {
        // Ghost at (3, 1) can only move to (2, 1); the player walks right into it.
        let mut level = open_level(5, 5, vec![Pos::new(3, 1)]);
        level.grid.set(Pos::new(3, 2), Tile::Wall);
        level.grid.set(Pos::new(1, 2), Tile::Wall);
        let mut game = Game::new(level);
        let mut rng = StdRng::seed_from_u64(8);
        game.apply_input(Dir::Right);
        game.tick(&mut rng);
        assert_eq!(game.player, Pos::new(2, 1));
        assert_eq!(game.ghosts[0], Pos::new(2, 1));
        assert!(game.is_caught());
    }

    #[test]
    fn swapping_cells_is_not_a_catch() {
        // Ghost at (2, 1) can only step to (1, 1) while the player steps to (2, 1).
        let mut level = open_level(5, 5, vec![Pos::new(2, 1)]);
        level.grid.set(Pos::new(2, 2), Tile::Wall);
        level.grid.set(Pos::new(3, 1), Tile::Wall);
        let mut game = Game::new(level);
        let mut rng = StdRng::seed_from_u64(4);
        game.apply_input(Dir::Right);
        game.tick(&mut rng);
        assert_eq!(game.player, Pos::new(2, 1));
        assert_eq!(game.ghosts[0], Pos::new(1, 1));
        assert!(!game.is_caught());
    }

    #[test]
    fn ghosts_never_enter_walls() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut game = Game::new(create_level(&mut rng, 20, 20));
        for _ in 0..300 {
            game.tick(&mut rng);
            for ghost in &game.ghosts {
                assert!(!game.grid.is_wall(*ghost));
            }
        }
    }
}
