//! Painting game state onto a drawing surface.
//!
//! The renderer is a pure function of the scene it is handed: it owns no
//! state beyond the sprite assets passed in by reference.  [`Surface`] is
//! the minimal drawing contract in abstract pixel coordinates, with
//! [`TermSurface`] mapping pixels onto terminal character cells.
use crate::consts;
use crate::engine::{Direction, Grid};
use ratatui::{buffer::Buffer, layout::Rect, style::Style};
use std::collections::VecDeque;

/// Clockwise quarter-turns from "pointing up".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Rotation {
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    fn index(self) -> usize {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 1,
            Rotation::Half => 2,
            Rotation::ThreeQuarter => 3,
        }
    }
}

/// Sprite orientation for travel in `direction`; used for the head as-is
/// and for the tail via [`tail_step`].
pub(crate) fn rotation_of(direction: Direction) -> Rotation {
    match direction {
        Direction::Up => Rotation::None,
        Direction::Right => Rotation::Quarter,
        Direction::Down => Rotation::Half,
        Direction::Left => Rotation::ThreeQuarter,
    }
}

/// The direction the tail end is travelling, read off the last two
/// segments.
///
/// When the step between them wrapped across an edge, the naive index
/// difference has the wrong sign, so the four wrap cases are matched first;
/// only then is the in-grid difference consulted.  Returns `None` for
/// segment pairs that are not one step apart.
pub(crate) fn tail_step(grid: Grid, tail: usize, before_tail: usize) -> Option<Direction> {
    let t = grid.cell_of(tail);
    let b = grid.cell_of(before_tail);
    if t.row == b.row && t.column == grid.columns - 1 && b.column == 0 {
        return Some(Direction::Right);
    }
    if t.row == b.row && t.column == 0 && b.column == grid.columns - 1 {
        return Some(Direction::Left);
    }
    if t.column == b.column && t.row == grid.rows - 1 && b.row == 0 {
        return Some(Direction::Down);
    }
    if t.column == b.column && t.row == 0 && b.row == grid.rows - 1 {
        return Some(Direction::Up);
    }
    let diff = before_tail as isize - tail as isize;
    let columns = grid.columns as isize;
    if diff == 1 && b.row == t.row {
        Some(Direction::Right)
    } else if diff == -1 && b.row == t.row {
        Some(Direction::Left)
    } else if diff == columns {
        Some(Direction::Down)
    } else if diff == -columns {
        Some(Direction::Up)
    } else {
        None
    }
}

/// A rectangle in surface pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PxRect {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl PxRect {
    fn center(self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SpriteId {
    Head,
    Tail,
}

/// Oriented renditions of the head and tail sprites.
///
/// Built once at startup and passed by reference wherever drawing happens;
/// re-initialization of the game reuses the same assets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SpriteAssets {
    head: [char; 4],
    tail: [char; 4],
}

impl SpriteAssets {
    pub(crate) fn load() -> SpriteAssets {
        SpriteAssets {
            head: consts::SNAKE_HEAD_SYMBOLS,
            tail: consts::SNAKE_TAIL_SYMBOLS,
        }
    }

    pub(crate) fn glyph(&self, sprite: SpriteId, rotation: Rotation) -> char {
        let table = match sprite {
            SpriteId::Head => &self.head,
            SpriteId::Tail => &self.tail,
        };
        table[rotation.index()]
    }
}

/// What a display surface must be able to do for the renderer: rectangle
/// fills, oriented sprite blits, and a centered text glyph.
pub(crate) trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: PxRect);
    fn blit_sprite(
        &mut self,
        assets: &SpriteAssets,
        sprite: SpriteId,
        rotation: Rotation,
        rect: PxRect,
    );
    fn draw_text(&mut self, text: &str, center_x: f64, center_y: f64);
}

/// One frame's worth of game state, borrowed from the engine.
#[derive(Clone, Debug)]
pub(crate) struct Scene<'a> {
    pub(crate) grid: Grid,
    pub(crate) snake: &'a VecDeque<usize>,
    pub(crate) direction: Direction,
    pub(crate) food: Option<usize>,
}

fn cell_rect(grid: Grid, index: usize) -> PxRect {
    let cell = grid.cell_of(index);
    PxRect {
        x: cell.column as f64 * grid.cell_width,
        y: cell.row as f64 * grid.cell_height,
        width: grid.cell_width,
        height: grid.cell_height,
    }
}

/// Paint the scene: body segments as filled rectangles, head and tail as
/// oriented sprites, and the food marker if present and in bounds.
pub(crate) fn draw<S: Surface>(surface: &mut S, assets: &SpriteAssets, scene: &Scene<'_>) {
    surface.clear();
    let grid = scene.grid;
    let last = scene.snake.len().saturating_sub(1);
    for (i, &index) in scene.snake.iter().enumerate() {
        let rect = cell_rect(grid, index);
        if i == 0 {
            surface.blit_sprite(assets, SpriteId::Head, rotation_of(scene.direction), rect);
        } else if i == last {
            let rotation = scene
                .snake
                .get(last - 1)
                .and_then(|&before| tail_step(grid, index, before))
                .map_or(Rotation::None, rotation_of);
            surface.blit_sprite(assets, SpriteId::Tail, rotation, rect);
        } else {
            surface.fill_rect(rect);
        }
    }
    if let Some(food) = scene.food {
        let cell = grid.cell_of(food);
        if grid.contains(cell) {
            let (cx, cy) = cell_rect(grid, food).center();
            surface.draw_text(consts::FOOD_TEXT, cx, cy);
        }
    }
}

/// Horizontal pixels per terminal column.
pub(crate) const PX_PER_COLUMN: f64 = 1.0;
/// Vertical pixels per terminal row.  A monospace character cell is about
/// twice as tall as it is wide, so square pixel cells render square.
pub(crate) const PX_PER_ROW: f64 = 2.0;

/// Terminal implementation of [`Surface`] over a region of a ratatui
/// buffer.
#[derive(Debug)]
pub(crate) struct TermSurface<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> TermSurface<'a> {
    pub(crate) fn new(area: Rect, buf: &'a mut Buffer) -> TermSurface<'a> {
        TermSurface { area, buf }
    }

    /// The pixel dimensions an `area`-sized surface presents to the engine.
    pub(crate) fn pixel_size(area: Rect) -> (f64, f64) {
        (
            f64::from(area.width) * PX_PER_COLUMN,
            f64::from(area.height) * PX_PER_ROW,
        )
    }

    fn put(&mut self, x: u16, y: u16, symbol: char, style: Style) {
        if x >= self.area.width || y >= self.area.height {
            return;
        }
        let Some(x) = self.area.x.checked_add(x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }

    fn col_span(&self, x: f64, width: f64) -> (u16, u16) {
        let start = (x / PX_PER_COLUMN).round().clamp(0.0, f64::from(self.area.width));
        let end = ((x + width) / PX_PER_COLUMN)
            .round()
            .clamp(0.0, f64::from(self.area.width));
        (start as u16, end as u16)
    }

    fn row_span(&self, y: f64, height: f64) -> (u16, u16) {
        let start = (y / PX_PER_ROW).round().clamp(0.0, f64::from(self.area.height));
        let end = ((y + height) / PX_PER_ROW)
            .round()
            .clamp(0.0, f64::from(self.area.height));
        (start as u16, end as u16)
    }

    /// The character cell containing the pixel point.
    fn cell_at(x: f64, y: f64) -> (u16, u16) {
        (
            (x / PX_PER_COLUMN).max(0.0).floor() as u16,
            (y / PX_PER_ROW).max(0.0).floor() as u16,
        )
    }
}

impl Surface for TermSurface<'_> {
    fn clear(&mut self) {
        for y in 0..self.area.height {
            for x in 0..self.area.width {
                self.put(x, y, ' ', Style::new());
            }
        }
    }

    fn fill_rect(&mut self, rect: PxRect) {
        let (c0, c1) = self.col_span(rect.x, rect.width);
        let (r0, r1) = self.row_span(rect.y, rect.height);
        for y in r0..r1 {
            for x in c0..c1 {
                self.put(x, y, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
            }
        }
    }

    fn blit_sprite(
        &mut self,
        assets: &SpriteAssets,
        sprite: SpriteId,
        rotation: Rotation,
        rect: PxRect,
    ) {
        let (cx, cy) = rect.center();
        let (x, y) = Self::cell_at(cx, cy);
        self.put(x, y, assets.glyph(sprite, rotation), consts::SNAKE_STYLE);
    }

    fn draw_text(&mut self, text: &str, center_x: f64, center_y: f64) {
        let (cx, cy) = Self::cell_at(center_x, center_y);
        let width = text.chars().count() as u16;
        let start = cx.saturating_sub(width / 2);
        for (i, symbol) in text.chars().enumerate() {
            self.put(start + i as u16, cy, symbol, consts::FOOD_STYLE);
        }
    }
}
