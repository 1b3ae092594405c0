use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The signed cell-index delta for one step in this direction on a grid
    /// `columns` cells wide.
    ///
    /// The delta is always computed against the *current* column count
    /// rather than stored, so it can never go stale across a resize.
    pub(crate) fn delta(self, columns: usize) -> isize {
        let columns = columns as isize;
        match self {
            Direction::Right => 1,
            Direction::Left => -1,
            Direction::Down => columns,
            Direction::Up => -columns,
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Key-repeat suppression: an input that matches the latest effective
/// direction carries no information and is dropped at enqueue time.
/// Reversals are *not* handled here; they stay in the queue and are
/// rejected when applied (see [`applicable`]).
pub(crate) fn redundant_with(new: Direction, latest: Direction) -> bool {
    new == latest
}

/// Apply-time check: a direction that exactly reverses the current one
/// would fold the snake onto its own neck, so the tick discards it.
pub(crate) fn applicable(new: Direction, current: Direction) -> bool {
    new != current.reverse()
}

/// Pending direction inputs awaiting application, newest at the back.
///
/// Input events may arrive at any point between ticks; they only ever touch
/// this queue, never the game geometry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct DirectionQueue(VecDeque<Direction>);

impl DirectionQueue {
    /// At most this many inputs may be pending; older entries are dropped
    /// first when the cap is exceeded.
    const CAP: usize = 2;

    /// Append `new`, unless it repeats the most recently queued direction
    /// (or `current` when nothing is queued).
    pub(crate) fn push(&mut self, new: Direction, current: Direction) {
        let latest = self.0.back().copied().unwrap_or(current);
        if redundant_with(new, latest) {
            return;
        }
        self.0.push_back(new);
        while self.0.len() > Self::CAP {
            let _ = self.0.pop_front();
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Direction> {
        self.0.pop_front()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Right, 10, 1)]
    #[case(Direction::Left, 10, -1)]
    #[case(Direction::Down, 10, 10)]
    #[case(Direction::Up, 10, -10)]
    #[case(Direction::Down, 7, 7)]
    #[case(Direction::Up, 7, -7)]
    fn delta(#[case] d: Direction, #[case] columns: usize, #[case] expected: isize) {
        assert_eq!(d.delta(columns), expected);
    }

    #[rstest]
    #[case(Direction::Up, Direction::Down)]
    #[case(Direction::Down, Direction::Up)]
    #[case(Direction::Left, Direction::Right)]
    #[case(Direction::Right, Direction::Left)]
    fn reverse(#[case] d: Direction, #[case] expected: Direction) {
        assert_eq!(d.reverse(), expected);
        assert!(!applicable(expected, d));
        assert!(applicable(d, d));
    }

    #[test]
    fn duplicate_pushes_collapse() {
        let mut queue = DirectionQueue::default();
        queue.push(Direction::Up, Direction::Right);
        queue.push(Direction::Up, Direction::Right);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(), Some(Direction::Up));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn push_matching_current_is_dropped() {
        let mut queue = DirectionQueue::default();
        queue.push(Direction::Right, Direction::Right);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut queue = DirectionQueue::default();
        queue.push(Direction::Up, Direction::Right);
        queue.push(Direction::Down, Direction::Right);
        queue.push(Direction::Left, Direction::Right);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(Direction::Down));
        assert_eq!(queue.pop(), Some(Direction::Left));
    }

    #[test]
    fn reversal_is_queued_but_not_applicable() {
        let mut queue = DirectionQueue::default();
        queue.push(Direction::Left, Direction::Right);
        assert_eq!(queue.len(), 1);
        assert!(!applicable(Direction::Left, Direction::Right));
    }
}
