//! Keeping the view pinned to the newest message.
//!
//! The scroller tracks whether the user wants to follow the bottom of the
//! transcript. Content changes call [`Scroller::invalidate`]; the host then
//! drives [`Scroller::next_step`] from its timer until it returns `None`.
//! A scroll the user makes away from the bottom disengages pinning until
//! they return to it.

/// Largest animated step, in pixels.
pub const MAX_STEP: u32 = 200;
/// Below this distance an animated scroll finishes in one step.
pub const SNAP_DISTANCE: u32 = 8;
/// Delay between animation steps the host should use.
pub const STEP_INTERVAL_MS: u64 = 70;

/// Geometry of the scrollable view, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub content_height: u32,
    pub view_height: u32,
    /// Scroll position of the top edge.
    pub offset: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(content_height: u32, view_height: u32, offset: u32) -> Self {
        Self {
            content_height,
            view_height,
            offset,
        }
    }

    #[must_use]
    pub fn max_offset(&self) -> u32 {
        self.content_height.saturating_sub(self.view_height)
    }

    #[must_use]
    pub fn distance_to_bottom(&self) -> u32 {
        self.max_offset().saturating_sub(self.offset)
    }

    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.distance_to_bottom() == 0
    }

    /// Whether there is anything to scroll.
    #[must_use]
    pub fn scrollable(&self) -> bool {
        self.content_height > self.view_height
    }
}

#[derive(Debug, Clone)]
pub struct Scroller {
    at_bottom: bool,
    animate: bool,
    animating: bool,
    ignore_next_scroll: bool,
}

impl Scroller {
    #[must_use]
    pub fn new(animate: bool) -> Self {
        Self {
            at_bottom: true,
            animate,
            animating: false,
            ignore_next_scroll: false,
        }
    }

    /// Whether the view should follow the bottom.
    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Content changed: start scrolling if pinned.
    pub fn invalidate(&mut self) {
        if self.at_bottom {
            self.animating = true;
        }
    }

    /// Pin to the bottom and scroll there.
    pub fn force(&mut self) {
        self.at_bottom = true;
        self.invalidate();
    }

    /// Stop a running animation.
    pub fn cancel(&mut self) {
        self.animating = false;
    }

    /// Advance the scroll animation, returning the offset to scroll to.
    pub fn next_step(&mut self, view: &Viewport) -> Option<u32> {
        if !self.animating {
            return None;
        }
        let before = view.distance_to_bottom();
        if !view.scrollable() || before == 0 {
            self.animating = false;
            return None;
        }
        let step = if self.animate {
            if before > MAX_STEP {
                MAX_STEP
            } else if before < SNAP_DISTANCE {
                before
            } else {
                before * 10 / 17
            }
        } else {
            before
        };
        if step == before {
            self.animating = false;
        }
        self.ignore_next_scroll = true;
        Some(view.offset + step)
    }

    /// A scroll event happened; the view is now `view`.
    ///
    /// The event following a step this scroller made is its own and ignored;
    /// any other is the user's.
    pub fn on_scroll(&mut self, view: &Viewport) {
        if self.ignore_next_scroll {
            self.ignore_next_scroll = false;
            return;
        }
        self.cancel();
        self.at_bottom = view.at_bottom();
    }

    /// The view was resized; returns the offset to jump to when pinned.
    #[must_use]
    pub fn on_resize(&self, view: &Viewport) -> Option<u32> {
        (self.at_bottom && !view.at_bottom()).then(|| view.max_offset())
    }
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new(false)
    }
}
