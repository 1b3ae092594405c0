//! Assorted constants & hard-coded configuration
use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Number of cells the snake occupies at spawn
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// How many random cells to try when placing food before giving up and
/// leaving it absent ("board nearly full")
pub(crate) const FOOD_PLACEMENT_ATTEMPTS: usize = 100;

/// A persisted best score older than this is discarded on load
pub(crate) const BEST_SCORE_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Resize bursts are coalesced; the grid is recomputed this long after the
/// last resize event
pub(crate) const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Glyph for the parts of the snake's body between head and tail
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Oriented head glyphs, one per clockwise quarter turn starting at
/// "moving up"
pub(crate) const SNAKE_HEAD_SYMBOLS: [char; 4] = ['v', '<', '^', '>'];

/// Oriented tail glyphs, one per clockwise quarter turn starting at
/// "moving up"
pub(crate) const SNAKE_TAIL_SYMBOLS: [char; 4] = ['╵', '╶', '╷', '╴'];

/// Glyph drawn for the food marker
pub(crate) const FOOD_TEXT: &str = "$";

/// Style for the snake's head, body, and tail
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Style for the food marker
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::Red);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);
