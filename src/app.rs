use crate::game::Game;
use ratatui::{backend::Backend, Terminal};
use std::io;

/// Top-level application state: the single game screen and the quit latch.
///
/// The game instance is constructed by `main` and owned here for the whole
/// process lifetime; nothing reaches for it through globals.
#[derive(Debug)]
pub(crate) struct App<'a, R = rand::rngs::ThreadRng> {
    game: Game<'a, R>,
    quitting: bool,
}

/// Screen transitions a screen's input handler may request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Screen {
    Quit,
}

impl<'a, R: rand::Rng> App<'a, R> {
    pub(crate) fn new(game: Game<'a, R>) -> App<'a, R> {
        App {
            game,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            terminal.draw(|frame| self.game.draw(frame))?;
            if let Some(Screen::Quit) = self.game.process_input()? {
                self.quitting = true;
            }
        }
        Ok(())
    }
}
