//! Profile records produced by tracing an outline

/// Vertical direction of a profile.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Flow {
    Up,
    Down,
}

impl Flow {
    /// Step, in pool slots, between two scanlines of the x-run.
    pub fn step(self) -> i64 {
        match self {
            Flow::Up => 1,
            Flow::Down => -1,
        }
    }
}

/// One monotone section of a contour: x-coordinates for `height`
/// consecutive scanlines, stored in the render pool.
#[derive(Debug,Copy,Clone)]
pub struct Profile {
    pub flow: Flow,
    /// First scanline of the section.
    pub start: i64,
    /// Scanlines covered; zero while the record is still being filled.
    pub height: i64,
    /// Pool slot holding the x-coordinate for the current scanline.
    /// Steps by `flow.step()` as the sweep advances, so it may point one
    /// slot outside the run once the profile is spent.
    pub offset: i64,
    /// X coordinate on the current scanline of the sweep.
    pub x: i64,
    /// Scanlines left before the profile joins the sweep. Reused as a
    /// marker for deferred dropout handling once it is active.
    pub count_l: i64,
    /// Index of the following profile along the same contour; the last
    /// profile of a contour points back at the first.
    pub next: usize,
}

impl Profile {
    pub fn new(flow: Flow, offset: usize) -> Self {
        Profile {
            flow,
            start: 0,
            height: 0,
            offset: offset as i64,
            x: 0,
            count_l: 0,
            next: 0,
        }
    }

    /// Top scanline of the section.
    pub fn top(&self) -> i64 {
        self.start + self.height - 1
    }
}
