mod app;
mod command;
mod config;
mod consts;
mod engine;
mod game;
mod render;
mod scores;
use crate::app::App;
use crate::config::Config;
use crate::game::Game;
use crate::render::SpriteAssets;
use crate::scores::Store;
use anyhow::Context;
use lexopt::prelude::*;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("serpent: {e}");
            return ExitCode::from(2);
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(ioe) = e.downcast_ref::<std::io::Error>() {
                if ioe.kind() == ErrorKind::BrokenPipe {
                    return ExitCode::SUCCESS;
                }
            }
            eprintln!("serpent: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match args.config {
        Some(ref path) => Config::load(path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let path = Config::default_path().context("failed to locate configuration")?;
            Config::load(&path, true)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
    };
    let store = Store::new(config.score_file());
    let assets = SpriteAssets::load();
    let size = crossterm::terminal::size().context("failed to query terminal size")?;
    let game = Game::new(config, store, &assets, size);
    let terminal = ratatui::init();
    let r = App::new(game).run(terminal);
    ratatui::restore();
    r.map_err(Into::into)
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Args {
    config: Option<PathBuf>,
}

impl Args {
    /// Parse the command line.  Returns `Ok(None)` when `--help` or
    /// `--version` already did all the work.
    fn parse() -> Result<Option<Args>, lexopt::Error> {
        let mut config = None;
        let mut parser = lexopt::Parser::from_env();
        while let Some(arg) = parser.next()? {
            match arg {
                Short('c') | Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Short('h') | Long("help") => {
                    println!("Usage: serpent [-c|--config <file>]");
                    println!();
                    println!("Wrap-around snake in the terminal");
                    println!();
                    println!("Options:");
                    println!("  -c, --config <file>  Read configuration from <file>");
                    println!("  -h, --help           Show this message and exit");
                    println!("  -V, --version        Show the program version and exit");
                    return Ok(None);
                }
                Short('V') | Long("version") => {
                    println!("serpent {}", env!("CARGO_PKG_VERSION"));
                    return Ok(None);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Some(Args { config }))
    }
}
