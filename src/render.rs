use crate::components::{Pos, Tile};
use crate::game::Game;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const GHOST_COLORS: [Color; 3] = [Color::Red, Color::Magenta, Color::Cyan];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Wall,
    Pellet,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Remembers what is on screen so only changed cells get redrawn. `None`
/// entries are unknown and always repainted.
pub struct Renderer {
    drawn: Vec<Option<Cell>>,
    hud: Option<String>,
    origin: Option<(u16, u16)>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            drawn: vec![None; width * height],
            hud: None,
            origin: None,
        }
    }

    fn invalidate(&mut self) {
        self.drawn.fill(None);
        self.hud = None;
    }
}

/// Where the board sits in the terminal, HUD above and footer below.
enum Layout {
    Fits { x: u16, y: u16 },
    TooSmall { need: (u16, u16), have: (u16, u16) },
}

fn layout(game: &Game, term: (u16, u16)) -> Layout {
    let need = (
        (game.grid.width() * CELL_W) as u16,
        (game.grid.height() + 2) as u16,
    );
    if term.0 < need.0 || term.1 < need.1 {
        Layout::TooSmall { need, have: term }
    } else {
        Layout::Fits {
            x: (term.0 - need.0) / 2,
            y: (term.1 - need.1) / 2 + 1,
        }
    }
}

/// Redraws whatever changed since the previous frame.
pub fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let (x0, y0) = match layout(game, terminal::size()?) {
        Layout::Fits { x, y } => (x, y),
        Layout::TooSmall { need, have } => {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                need.0, need.1, have.0, have.1
            )))?;
            stdout.flush()?;
            renderer.origin = None;
            return Ok(());
        }
    };

    if renderer.origin != Some((x0, y0)) {
        renderer.origin = Some((x0, y0));
        renderer.invalidate();
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(game);
    if renderer.hud.as_deref() != Some(hud.as_str()) {
        stdout.queue(MoveTo(x0, y0 - 1))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.hud = Some(hud);
    }

    let width = game.grid.width();
    for y in 0..game.grid.height() {
        for x in 0..width {
            let cell = cell_for(game, Pos { x, y });
            let slot = &mut renderer.drawn[y * width + x];
            if *slot != Some(cell) {
                *slot = Some(cell);
                let col = x0 + (x * CELL_W) as u16;
                draw_cell(stdout, col, y0 + y as u16, cell)?;
            }
        }
    }

    stdout.flush()
}

fn hud_line(game: &Game) -> String {
    format!(
        "Score: {}  Pellets: {}  (q to quit)",
        game.score, game.pellets_left
    )
}

/// Actors are drawn over the tile underneath; the player wins over ghosts.
fn cell_for(game: &Game, pos: Pos) -> Cell {
    if pos == game.player {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if let Some(idx) = game.ghosts.iter().position(|g| *g == pos) {
        return Cell {
            glyph: Glyph::Ghost,
            color: GHOST_COLORS[idx % GHOST_COLORS.len()],
        };
    }
    match game.grid.tile(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Pellet => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        Tile::Empty => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, col: u16, row: u16, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player | Glyph::Ghost => "●",
        Glyph::Wall => "██",
        Glyph::Pellet => "·",
        Glyph::Empty => "",
    };
    let pad = CELL_W.saturating_sub(UnicodeWidthStr::width(text));
    stdout.queue(MoveTo(col, row))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(format!("{text}{}", " ".repeat(pad))))?;
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Shows the final score under the board and waits for `q` or `Esc`.
pub fn render_game_over(stdout: &mut Stdout, game: &Game) -> io::Result<()> {
    let banner_at = match layout(game, terminal::size()?) {
        Layout::Fits { x, y } => MoveTo(x, y + game.grid.height() as u16),
        Layout::TooSmall { .. } => MoveTo(0, 1),
    };
    stdout.queue(banner_at)?;
    stdout.queue(SetForegroundColor(Color::Red))?;
    stdout.queue(Print(format!(
        "GAME OVER - Final Score: {} (press q to quit)",
        game.score
    )))?;
    stdout.queue(ResetColor)?;
    stdout.flush()?;

    loop {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Grid, GenerationReport, LevelData};

    fn game() -> Game {
        let mut grid = Grid::bordered(6, 6);
        grid.set(Pos::new(3, 3), Tile::Empty);
        Game::new(LevelData {
            grid,
            player_start: Pos::new(1, 1),
            ghost_starts: vec![Pos::new(4, 4), Pos::new(1, 4), Pos::new(4, 1)],
            report: GenerationReport::default(),
        })
    }

    #[test]
    fn tiles_pick_their_glyphs() {
        let game = game();
        assert_eq!(cell_for(&game, Pos::new(0, 0)).glyph, Glyph::Wall);
        assert_eq!(cell_for(&game, Pos::new(2, 2)).glyph, Glyph::Pellet);
        assert_eq!(cell_for(&game, Pos::new(3, 3)).glyph, Glyph::Empty);
    }

    #[test]
    fn actors_are_drawn_over_tiles() {
        let mut game = game();
        assert_eq!(cell_for(&game, Pos::new(1, 1)).color, Color::Yellow);
        assert_eq!(cell_for(&game, Pos::new(4, 4)).color, Color::Red);
        assert_eq!(cell_for(&game, Pos::new(1, 4)).color, Color::Magenta);
        assert_eq!(cell_for(&game, Pos::new(4, 1)).color, Color::Cyan);

        game.ghosts[0] = game.player;
        assert_eq!(cell_for(&game, Pos::new(1, 1)).glyph, Glyph::Player);
    }

    #[test]
    fn board_is_centred_below_the_hud() {
        // 6x6 board needs 12 columns and 8 rows.
        match layout(&game(), (40, 20)) {
            Layout::Fits { x, y } => assert_eq!((x, y), (14, 7)),
            Layout::TooSmall { .. } => panic!("40x20 should fit"),
        }
        match layout(&game(), (12, 8)) {
            Layout::Fits { x, y } => assert_eq!((x, y), (0, 1)),
            Layout::TooSmall { .. } => panic!("exact size should fit"),
        }
    }

    #[test]
    fn small_terminal_reports_needed_size() {
        match layout(&game(), (11, 30)) {
            Layout::TooSmall { need, have } => {
                assert_eq!(need, (12, 8));
                assert_eq!(have, (11, 30));
            }
            Layout::Fits { .. } => panic!("11 columns cannot hold the board"),
        }
    }

    #[test]
    fn invalidate_forgets_everything_drawn() {
        let mut renderer = Renderer::new(2, 2);
        renderer.drawn[0] = Some(Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        });
        renderer.hud = Some("Score: 0".to_string());
        renderer.invalidate();
        assert!(renderer.drawn.iter().all(Option::is_none));
        assert_eq!(renderer.hud, None);
    }

    #[test]
    fn hud_reports_score_and_pellets() {
        let mut game = game();
        game.score = 7;
        assert_eq!(hud_line(&game), "Score: 7  Pellets: 15  (q to quit)");
    }
}
