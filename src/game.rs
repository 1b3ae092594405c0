use crate::app::Screen;
use crate::command::Command;
use crate::config::{Config, DeviceClass};
use crate::consts;
use crate::engine::{Direction, Engine, Phase, Tick};
use crate::render::{self, Scene, SpriteAssets, TermSurface};
use crate::scores::Store;
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Widget,
    Frame,
};
use std::io;
use std::time::{Duration, Instant};

/// The game screen: one engine, the score store, and the timers that drive
/// them.
///
/// Exactly one of these exists at a time, owned by the [`App`](crate::app::App);
/// restarting reuses the instance and the shared sprite assets.
#[derive(Debug)]
pub(crate) struct Game<'a, R = rand::rngs::ThreadRng> {
    engine: Engine<R>,
    assets: &'a SpriteAssets,
    store: Store,
    config: Config,
    best: u32,
    device: DeviceClass,
    tick_period: Duration,
    next_tick: Option<Instant>,
    pending_resize: Option<PendingResize>,
    save_failed: bool,
}

/// A parked resize waiting out the debounce window.  Only the newest one is
/// kept; bursts collapse into a single grid recomputation.
#[derive(Clone, Copy, Debug)]
struct PendingResize {
    deadline: Instant,
    size: (f64, f64),
}

impl<'a> Game<'a> {
    pub(crate) fn new(
        config: Config,
        store: Store,
        assets: &'a SpriteAssets,
        terminal_size: (u16, u16),
    ) -> Game<'a> {
        Game::new_with_rng(config, store, assets, terminal_size, rand::rng())
    }
}

impl<'a, R: Rng> Game<'a, R> {
    pub(crate) fn new_with_rng(
        config: Config,
        store: Store,
        assets: &'a SpriteAssets,
        terminal_size: (u16, u16),
        rng: R,
    ) -> Game<'a, R> {
        let best = store.load();
        let mut game = Game {
            engine: Engine::new_with_rng(rng),
            assets,
            store,
            best,
            device: DeviceClass::Regular,
            tick_period: config.tick_period(DeviceClass::Regular),
            config,
            next_tick: None,
            pending_resize: None,
            save_failed: false,
        };
        let (columns, rows) = terminal_size;
        game.apply_resize(playfield_px(columns, rows));
        game
    }

    pub(crate) fn process_input(&mut self) -> io::Result<Option<Screen>> {
        if let Some(pending) = self.pending_resize {
            if Instant::now() >= pending.deadline {
                self.pending_resize = None;
                self.apply_resize(pending.size);
            }
        }
        if self.engine.phase() == Phase::Running {
            if self.next_tick.is_none() {
                self.next_tick = Some(Instant::now() + self.tick_period);
            }
        } else {
            self.next_tick = None;
        }
        let resize_deadline = self.pending_resize.map(|p| p.deadline);
        let deadline = match (self.next_tick, resize_deadline) {
            (Some(tick), Some(resize)) => Some(tick.min(resize)),
            (tick, resize) => tick.or(resize),
        };
        let Some(when) = deadline else {
            return Ok(self.handle_event(read()?));
        };
        let wait = when.saturating_duration_since(Instant::now());
        if wait.is_zero() || !poll(wait)? {
            if self.next_tick.is_some_and(|tick| Instant::now() >= tick) {
                self.step();
                self.next_tick = None;
            }
            // an elapsed resize debounce is picked up at the top of the
            // next call
            Ok(None)
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Advance the engine one tick and fold any score change into the
    /// persisted best.
    fn step(&mut self) {
        match self.engine.tick() {
            Tick::Ate => {
                if self.engine.score() > self.best {
                    self.best = self.engine.score();
                    self.save_failed = self.store.save(self.best).is_err();
                }
            }
            Tick::Idle | Tick::Moved | Tick::GameOver => (),
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        if let Event::Resize(columns, rows) = event {
            self.pending_resize = Some(PendingResize {
                deadline: Instant::now() + consts::RESIZE_DEBOUNCE,
                size: playfield_px(columns, rows),
            });
            return None;
        }
        let command = Command::from_key_event(event.as_key_press_event()?)?;
        match (self.engine.phase(), command) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (Phase::Running, Command::Up) => self.engine.enqueue_direction(Direction::Up),
            (Phase::Running, Command::Down) => self.engine.enqueue_direction(Direction::Down),
            (Phase::Running, Command::Left) => self.engine.enqueue_direction(Direction::Left),
            (Phase::Running, Command::Right) => self.engine.enqueue_direction(Direction::Right),
            (Phase::GameOver, Command::R) => {
                self.engine.start();
                self.next_tick = None;
            }
            (Phase::GameOver | Phase::Idle, Command::Q) => return Some(Screen::Quit),
            _ => (),
        }
        None
    }

    fn apply_resize(&mut self, (width, height): (f64, f64)) {
        self.device = DeviceClass::of(width, self.config.game.compact_width);
        self.tick_period = self.config.tick_period(self.device);
        self.engine.resize(width, height, self.config.game.min_cell_size);
        self.next_tick = None;
    }
}

impl<R> Game<'_, R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}

/// The pixel dimensions of the playfield inside a terminal of the given
/// size, leaving one row for the score bar and one for messages.
fn playfield_px(columns: u16, rows: u16) -> (f64, f64) {
    TermSurface::pixel_size(Rect::new(0, 0, columns, rows.saturating_sub(2)))
}

impl<R> Widget for &Game<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [score_area, field_area, msg_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let mut score = format!(" Score: {}  Best: {}", self.engine.score(), self.best);
        if self.save_failed {
            score.push_str("  (best score not saved)");
        }
        buf.set_style(score_area, consts::SCORE_BAR_STYLE);
        Line::from(score).render(score_area, buf);

        match self.engine.phase() {
            Phase::Idle => {
                Line::from("Terminal too small for the snake")
                    .centered()
                    .render(field_area, buf);
            }
            Phase::Running | Phase::GameOver => {
                if let Some(grid) = self.engine.grid() {
                    let scene = Scene {
                        grid,
                        snake: self.engine.snake(),
                        direction: self.engine.direction(),
                        food: self.engine.food(),
                    };
                    let mut surface = TermSurface::new(field_area, buf);
                    render::draw(&mut surface, self.assets, &scene);
                }
                if self.engine.phase() == Phase::GameOver {
                    Line::from_iter([
                        Span::raw(" — GAME OVER — Restart ("),
                        Span::styled("r", consts::KEY_STYLE),
                        Span::raw(") — Quit ("),
                        Span::styled("q", consts::KEY_STYLE),
                        Span::raw(")"),
                    ])
                    .render(msg_area, buf);
                }
            }
        }
    }
}
