use crate::components::{Dir, Pos, Tile};
use crate::level::Grid;
use crossterm::event::KeyCode;

/// Arrow keys plus vi-style h/j/k/l.
pub fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}

/// Where the player ends up after trying to move one cell in `dir`.
pub fn player_step(grid: &Grid, pos: Pos, dir: Option<Dir>) -> Pos {
    match dir {
        Some(dir) if grid.can_move(pos, dir) => grid.neighbor(pos, dir).unwrap_or(pos),
        _ => pos,
    }
}

/// Eats the pellet at `pos`, if any.
pub fn consume_pellet(grid: &mut Grid, pos: Pos) -> bool {
    if grid.tile(pos) == Tile::Pellet {
        grid.set(pos, Tile::Empty);
        true
    } else {
        false
    }
}
