use tracing::trace;

/// Host hook suppressing page scrolling while the pointer is over the chart,
/// so wheel events drive the chart instead of the surrounding page.
pub trait ScrollBlocker {
    fn block_page_scroll(&mut self);
    fn unblock_page_scroll(&mut self);
}

/// Headless blocker that only records calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullScrollBlocker {
    pub blocked: bool,
    pub block_calls: usize,
    pub unblock_calls: usize,
}

impl ScrollBlocker for NullScrollBlocker {
    fn block_page_scroll(&mut self) {
        self.blocked = true;
        self.block_calls += 1;
    }

    fn unblock_page_scroll(&mut self) {
        self.blocked = false;
        self.unblock_calls += 1;
    }
}

/// Scoped scroll suppression.
///
/// `acquire` and `release` are idempotent, so the blocker sees exactly one
/// block per unblock. A held lock is released when the guard is dropped.
#[derive(Debug)]
pub struct ScrollLock<B: ScrollBlocker> {
    blocker: B,
    held: bool,
}

impl<B: ScrollBlocker> ScrollLock<B> {
    #[must_use]
    pub fn new(blocker: B) -> Self {
        Self {
            blocker,
            held: false,
        }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Returns `true` when this call blocked page scrolling.
    pub fn acquire(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.blocker.block_page_scroll();
        self.held = true;
        trace!("page scroll blocked");
        true
    }

    /// Returns `true` when this call restored page scrolling.
    pub fn release(&mut self) -> bool {
        if !self.held {
            return false;
        }
        self.blocker.unblock_page_scroll();
        self.held = false;
        trace!("page scroll restored");
        true
    }

    #[must_use]
    pub fn blocker(&self) -> &B {
        &self.blocker
    }
}

impl<B: ScrollBlocker> Drop for ScrollLock<B> {
    fn drop(&mut self) {
        self.release();
    }
}
