//! The snake engine proper: grid sizing, movement, collisions, food, score.
//!
//! The engine works entirely in abstract pixel and cell-index space and does
//! no IO of its own; the shell owns the tick timer, the score store, and the
//! drawing surface.
mod direction;
mod grid;
use self::direction::{applicable, DirectionQueue};
pub(crate) use self::direction::Direction;
pub(crate) use self::grid::{Cell, Grid};

use crate::consts;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// No playable geometry yet; waiting for a usable resize
    Idle,
    Running,
    GameOver,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tick {
    /// Not running; the call was a no-op
    Idle,
    Moved,
    Ate,
    GameOver,
}

#[derive(Clone, Debug)]
pub(crate) struct Engine<R = rand::rngs::ThreadRng> {
    rng: R,
    grid: Option<Grid>,
    /// Cell indices, head first, tail last; no index repeats
    snake: VecDeque<usize>,
    direction: Direction,
    queue: DirectionQueue,
    food: Option<usize>,
    score: u32,
    phase: Phase,
}

impl<R: Rng> Engine<R> {
    pub(crate) fn new_with_rng(rng: R) -> Engine<R> {
        Engine {
            rng,
            grid: None,
            snake: VecDeque::new(),
            direction: Direction::Right,
            queue: DirectionQueue::default(),
            food: None,
            score: 0,
            phase: Phase::Idle,
        }
    }

    /// Begin a fresh game: score to zero, a three-cell snake centered on the
    /// grid and facing right, an empty input queue, and freshly placed food.
    ///
    /// When there is no grid, or the grid is too small to host the spawn,
    /// the board is cleared and the engine idles until `resize` supplies a
    /// usable one.
    pub(crate) fn start(&mut self) {
        let Some(grid) = self.grid else {
            self.clear_board();
            return;
        };
        let middle = (grid.rows / 2) * grid.columns + grid.columns / 2;
        if middle < consts::INITIAL_SNAKE_LENGTH - 1 {
            self.clear_board();
            return;
        }
        self.snake = (0..consts::INITIAL_SNAKE_LENGTH)
            .map(|i| middle - i)
            .collect();
        self.direction = Direction::Right;
        self.queue.clear();
        self.score = 0;
        self.food = None;
        self.place_food();
        self.phase = Phase::Running;
    }

    /// Drop every board-dependent piece of state; indices from a previous
    /// grid must never survive into a game they cannot address.
    fn clear_board(&mut self) {
        self.snake.clear();
        self.queue.clear();
        self.food = None;
        self.phase = Phase::Idle;
    }

    /// Queue a direction change for an upcoming tick.  Ignored unless the
    /// game is running.
    pub(crate) fn enqueue_direction(&mut self, direction: Direction) {
        if self.phase == Phase::Running {
            self.queue.push(direction, self.direction);
        }
    }

    /// Advance the game by one step.
    pub(crate) fn tick(&mut self) -> Tick {
        if self.phase != Phase::Running {
            return Tick::Idle;
        }
        let Some(grid) = self.grid else {
            return Tick::Idle;
        };
        let Some(&head) = self.snake.front() else {
            return Tick::Idle;
        };
        if let Some(next) = self.queue.pop() {
            if applicable(next, self.direction) {
                self.direction = next;
            }
        }
        let next = wrap_step(grid, head, self.direction);
        if self.snake.contains(&next) {
            self.phase = Phase::GameOver;
            return Tick::GameOver;
        }
        self.snake.push_front(next);
        if self.food == Some(next) {
            self.score += 1;
            self.place_food();
            Tick::Ate
        } else {
            let _ = self.snake.pop_back();
            Tick::Moved
        }
    }

    /// Adopt a new container size.
    ///
    /// Existing snake segments are re-read through the *old* grid (a flat
    /// index is only meaningful against the column count it was built with)
    /// and re-encoded against the new one.  If any segment no longer fits,
    /// a full restart is forced; otherwise the snake survives the resize and
    /// only out-of-bounds food is replaced.
    pub(crate) fn resize(&mut self, width: f64, height: f64, min_cell: f64) {
        let Some(new) = Grid::compute(width, height, min_cell) else {
            self.grid = None;
            self.clear_board();
            return;
        };
        let old = self.grid.replace(new);
        match old {
            Some(old) if self.phase != Phase::Idle && !self.snake.is_empty() => {
                let cells: Vec<Cell> = self.snake.iter().map(|&i| old.cell_of(i)).collect();
                if cells.iter().all(|&cell| new.contains(cell)) {
                    self.snake = cells.into_iter().map(|cell| new.index_of(cell)).collect();
                    match self.food.map(|f| old.cell_of(f)).filter(|&c| new.contains(c)) {
                        Some(cell) => self.food = Some(new.index_of(cell)),
                        None => self.place_food(),
                    }
                } else {
                    self.start();
                }
            }
            _ => self.start(),
        }
    }

    /// Move the food to a uniformly random free cell, trying at most
    /// [`consts::FOOD_PLACEMENT_ATTEMPTS`] candidates.  When every try lands
    /// on the snake the board is nearly full and the food stays absent until
    /// the next placement.
    fn place_food(&mut self) {
        self.food = None;
        let Some(grid) = self.grid else {
            return;
        };
        for _ in 0..consts::FOOD_PLACEMENT_ATTEMPTS {
            let candidate = self.rng.random_range(0..grid.cell_count());
            if !self.snake.contains(&candidate) {
                self.food = Some(candidate);
                return;
            }
        }
    }
}

impl<R> Engine<R> {
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn grid(&self) -> Option<Grid> {
        self.grid
    }

    pub(crate) fn snake(&self) -> &VecDeque<usize> {
        &self.snake
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn food(&self) -> Option<usize> {
        self.food
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Option<usize>) {
        self.food = food;
    }
}

/// The cell one step from `head` in `direction`, wrapping across the grid's
/// edges.
///
/// Each wrap case is matched explicitly: naive `head + delta` would slide to
/// the wrong row when wrapping horizontally, or out of range when wrapping
/// vertically.
fn wrap_step(grid: Grid, head: usize, direction: Direction) -> usize {
    let columns = grid.columns;
    let last_row_start = columns * (grid.rows - 1);
    match direction {
        Direction::Right if head % columns == columns - 1 => head - (columns - 1),
        Direction::Left if head % columns == 0 => head + (columns - 1),
        Direction::Up if head < columns => head + last_row_start,
        Direction::Down if head >= last_row_start => head - last_row_start,
        d => (head as isize + d.delta(columns)) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;
    use std::collections::HashSet;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    /// A 10×10 grid of 2.0 px cells in a 20×20 px container, running.
    fn engine_10x10() -> Engine<ChaCha12Rng> {
        let mut engine = Engine::new_with_rng(ChaCha12Rng::seed_from_u64(RNG_SEED));
        engine.resize(20.0, 20.0, 2.0);
        assert_eq!(engine.phase(), Phase::Running);
        engine
    }

    fn assert_no_duplicates(engine: &Engine<ChaCha12Rng>) {
        let unique = engine.snake().iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), engine.snake().len());
    }

    #[test]
    fn start_spawns_centered_snake() {
        let engine = engine_10x10();
        assert_eq!(engine.snake(), &VecDeque::from([55, 54, 53]));
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.score(), 0);
        let food = engine.food().unwrap();
        assert!(food < 100);
        assert!(!engine.snake().contains(&food));
    }

    #[rstest]
    #[case(Direction::Right, 39, 30)] // col 9 of row 3 -> col 0 of row 3
    #[case(Direction::Left, 30, 39)] // col 0 of row 3 -> col 9 of row 3
    #[case(Direction::Up, 4, 94)] // row 0 of col 4 -> row 9 of col 4
    #[case(Direction::Down, 94, 4)] // row 9 of col 4 -> row 0 of col 4
    #[case(Direction::Right, 34, 35)]
    #[case(Direction::Left, 34, 33)]
    #[case(Direction::Up, 34, 24)]
    #[case(Direction::Down, 34, 44)]
    fn wrap_step_cases(#[case] direction: Direction, #[case] head: usize, #[case] next: usize) {
        let grid = Grid::compute(20.0, 20.0, 2.0).unwrap();
        assert_eq!(wrap_step(grid, head, direction), next);
    }

    #[test]
    fn ticks_without_food_keep_length() {
        let mut engine = engine_10x10();
        engine.set_food(Some(0)); // off the snake's path
        for expected_head in [56, 57, 58, 59] {
            assert_eq!(engine.tick(), Tick::Moved);
            assert_eq!(engine.snake().front(), Some(&expected_head));
            assert_eq!(engine.snake().len(), 3);
            assert_no_duplicates(&engine);
        }
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
        // one more step wraps from col 9 back to col 0 of the same row
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.snake().front(), Some(&50));
    }

    #[test]
    fn reversal_is_rejected_at_apply_time() {
        let mut engine = engine_10x10();
        engine.set_food(Some(0));
        engine.enqueue_direction(Direction::Left);
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.snake().front(), Some(&56));
    }

    #[test]
    fn perpendicular_turn_applies() {
        let mut engine = engine_10x10();
        engine.set_food(Some(0));
        engine.enqueue_direction(Direction::Down);
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.direction(), Direction::Down);
        assert_eq!(engine.snake().front(), Some(&65));
    }

    #[test]
    fn queued_turns_apply_one_per_tick() {
        let mut engine = engine_10x10();
        engine.set_food(Some(0));
        engine.enqueue_direction(Direction::Down);
        engine.enqueue_direction(Direction::Left);
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.snake().front(), Some(&65));
        assert_eq!(engine.tick(), Tick::Moved);
        assert_eq!(engine.snake().front(), Some(&64));
    }

    #[test]
    fn eating_grows_and_relocates_food() {
        let mut engine = engine_10x10();
        engine.set_food(Some(56));
        assert_eq!(engine.tick(), Tick::Ate);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.snake(), &VecDeque::from([56, 55, 54, 53]));
        let food = engine.food().unwrap();
        assert!(!engine.snake().contains(&food));
    }

    #[test]
    fn collision_ends_the_game() {
        let mut engine = engine_10x10();
        // grow to length 4 first; a 3-cell snake vacates every cell it
        // could turn back into
        engine.set_food(Some(56));
        assert_eq!(engine.tick(), Tick::Ate); // snake [56, 55, 54, 53]
        engine.set_food(Some(0));
        // a U-turn around the neck: Down then Left then Up collides at 55
        engine.enqueue_direction(Direction::Down);
        assert_eq!(engine.tick(), Tick::Moved); // head 66
        engine.enqueue_direction(Direction::Left);
        assert_eq!(engine.tick(), Tick::Moved); // head 65
        engine.enqueue_direction(Direction::Up);
        assert_eq!(engine.tick(), Tick::GameOver);
        assert_eq!(engine.phase(), Phase::GameOver);
        let snake = engine.snake().clone();
        // halted: further ticks and inputs are no-ops until start()
        assert_eq!(engine.tick(), Tick::Idle);
        engine.enqueue_direction(Direction::Right);
        assert_eq!(engine.tick(), Tick::Idle);
        assert_eq!(engine.snake(), &snake);
        engine.start();
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn resize_keeps_a_snake_that_still_fits() {
        let mut engine = engine_10x10();
        engine.set_food(Some(95)); // row 9, gone after shrinking
        engine.resize(20.0, 12.0, 2.0); // 10×6 grid
        let grid = engine.grid().unwrap();
        assert_eq!((grid.columns, grid.rows), (10, 6));
        assert_eq!(engine.snake(), &VecDeque::from([55, 54, 53]));
        assert_eq!(engine.phase(), Phase::Running);
        let food = engine.food().unwrap();
        assert!(food < 60);
        assert!(!engine.snake().contains(&food));
    }

    #[test]
    fn resize_forces_restart_when_snake_falls_off() {
        let mut engine = engine_10x10();
        engine.resize(20.0, 8.0, 2.0); // 10×4 grid; row 5 no longer exists
        let grid = engine.grid().unwrap();
        assert_eq!((grid.columns, grid.rows), (10, 4));
        // restarted: re-centered on the new grid
        assert_eq!(engine.snake(), &VecDeque::from([25, 24, 23]));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn resize_recomputes_indices_when_columns_change() {
        let mut engine = engine_10x10();
        engine.set_food(Some(0));
        // 12 columns × 10 rows of 2.0 px cells
        engine.resize(24.0, 20.0, 2.0);
        let grid = engine.grid().unwrap();
        assert_eq!((grid.columns, grid.rows), (12, 10));
        // still row 5, columns 5..=3, but encoded against 12 columns now
        assert_eq!(engine.snake(), &VecDeque::from([65, 64, 63]));
    }

    #[test]
    fn degenerate_container_defers_start() {
        let mut engine = Engine::new_with_rng(ChaCha12Rng::seed_from_u64(RNG_SEED));
        engine.resize(1.0, 20.0, 2.0);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.grid(), None);
        engine.start();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.tick(), Tick::Idle);
        engine.enqueue_direction(Direction::Up);
        // a real size arrives later and the game begins
        engine.resize(20.0, 20.0, 2.0);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.snake().len(), 3);
    }

    #[test]
    fn resize_to_a_grid_too_small_to_spawn_goes_idle() {
        let mut engine = engine_10x10();
        // a 3×1 grid exists but cannot host the three-cell spawn
        engine.resize(6.0, 2.0, 2.0);
        let grid = engine.grid().unwrap();
        assert_eq!((grid.columns, grid.rows), (3, 1));
        assert_eq!(engine.phase(), Phase::Idle);
        // nothing from the old board survives; every live index must be
        // addressable on the current grid
        assert!(engine.snake().is_empty());
        assert_eq!(engine.food(), None);
        assert_eq!(engine.tick(), Tick::Idle);
        // a usable size arrives later and the game starts afresh
        engine.resize(20.0, 20.0, 2.0);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.snake(), &VecDeque::from([55, 54, 53]));
    }

    #[test]
    fn food_unplaceable_on_a_full_board_is_absent() {
        let mut engine = engine_10x10();
        engine.snake = (0..100).collect();
        engine.place_food();
        assert_eq!(engine.food(), None);
    }
}
