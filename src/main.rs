mod components;
mod config;
mod game;
mod ghost;
mod level;
mod player;
mod render;

use crate::config::{read_settings, Settings};
use crate::game::Game;
use crate::level::create_level;
use crate::player::dir_for_key;
use crate::render::{render, render_game_over, Renderer};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

const WINDOW_W: usize = 600;
const WINDOW_H: usize = 600;
const CELL_SIZE: usize = 30;
const GRID_W: usize = WINDOW_W / CELL_SIZE;
const GRID_H: usize = WINDOW_H / CELL_SIZE;

fn main() -> io::Result<()> {
    let settings = read_settings();
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);
    let restored = restore_terminal(&mut stdout, terminal::disable_raw_mode);

    if let Some(score) = result.and_then(|score| restored.map(|()| score))? {
        println!("Game Over! Score: {score}");
    }
    Ok(())
}

/// Undoes the terminal setup. Every step runs even if an earlier one fails;
/// the first failure is returned.
fn restore_terminal(
    out: &mut impl Write,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let shown = out.execute(Show).map(|_| ());
    let left = out.execute(LeaveAlternateScreen).map(|_| ());
    let raw = disable_raw_mode();
    shown.and(left).and(raw)
}

/// The game owns the terminal, so logs only go to a file named by `PACMAN_LOG`.
fn init_logging(settings: &Settings) -> io::Result<()> {
    if let Some(path) = &settings.log_file {
        let file = File::create(path)?;
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

/// Returns the final score when a ghost catches the player, `None` on quit.
fn run(stdout: &mut Stdout, settings: &Settings) -> io::Result<Option<u32>> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        "starting {}x{} game (seed {:?}, tick {} ms)",
        GRID_W, GRID_H, settings.seed, settings.tick_ms
    );

    let level = create_level(&mut rng, GRID_W, GRID_H);
    info!(
        "kept {} of {} wall attempts",
        level.report.placed, level.report.attempts
    );
    let mut game = Game::new(level);
    let mut renderer = Renderer::new(GRID_W, GRID_H);
    let tick_time = Duration::from_millis(settings.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut last_tick = Instant::now();

    render(stdout, &game, &mut renderer)?;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        info!("quit with score {}", game.score);
                        return Ok(None);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        info!("interrupted with score {}", game.score);
                        return Ok(None);
                    }
                    code => {
                        if let Some(dir) = dir_for_key(code) {
                            game.apply_input(dir);
                        }
                    }
                },
                Event::Resize(..) => render(stdout, &game, &mut renderer)?,
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_time {
            last_tick = Instant::now();
            game.tick(&mut rng);
            render(stdout, &game, &mut renderer)?;
            if game.is_caught() {
                info!(
                    "caught at ({}, {}), final score {}",
                    game.player.x, game.player.y, game.score
                );
                render_game_over(stdout, &game)?;
                return Ok(Some(game.score));
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
