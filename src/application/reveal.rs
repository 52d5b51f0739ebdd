//! Incremental "load more" over an already fetched list.

/// Number of items shown before the first reveal.
pub const DEFAULT_INITIAL_VISIBLE: usize = 4;
/// Items added per reveal.
pub const DEFAULT_REVEAL_STEP: usize = 3;

/// Holds how many items of the current list are on screen.
///
/// The count is not reset when the underlying list is replaced; the visible
/// window is recomputed against whatever list is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRevealer {
    visible: usize,
    step: usize,
}

impl Default for ListRevealer {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_VISIBLE, DEFAULT_REVEAL_STEP)
    }
}

impl ListRevealer {
    pub fn new(initial: usize, step: usize) -> Self {
        Self {
            visible: initial,
            step: step.max(1),
        }
    }

    /// Raw count, which may exceed a list that shrank since the last reveal.
    pub fn requested(&self) -> usize {
        self.visible
    }

    /// Items on screen for a list of `total` items.
    pub fn visible(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// Whether a "load more" control should be offered.
    pub fn can_reveal_more(&self, total: usize) -> bool {
        self.visible < total
    }

    /// Grow by one step, clamped to `total`. Returns the new visible count.
    pub fn reveal_more(&mut self, total: usize) -> usize {
        if self.visible < total {
            self.visible = (self.visible + self.step).min(total);
        }
        self.visible(total)
    }

    /// The visible prefix of `items`.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible(items.len())]
    }
}
