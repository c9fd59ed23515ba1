//! Shared working memory for profile traces and scanline turns

use crate::{Error, Result};

/// Slots charged against the pool for each profile header. The record
/// lives outside the arena, but the charge keeps exhaustion behavior
/// independent of the record layout.
pub const PROFILE_COST: usize = 8;

/// Arena shared by two growing regions: profile x-runs fill it from the
/// bottom while the sorted y-turn list fills it from the top. When the
/// two meet the current band is too tall and must be split.
#[derive(Debug)]
pub struct RenderPool {
    pub buff: Vec<i64>,
    /// Next free slot for profile data.
    pub top: usize,
    /// First slot profile data may no longer reach; shrinks as turns arrive.
    pub max_buff: usize,
    /// Number of y-turn entries stored at the top of `buff`.
    pub num_turns: usize,
}

impl RenderPool {
    pub fn new(slots: usize) -> Self {
        RenderPool {
            buff: vec![0; slots],
            top: 0,
            max_buff: 0,
            num_turns: 0,
        }
    }

    pub fn resize(&mut self, slots: usize) {
        self.buff = vec![0; slots];
    }

    /// Ready the pool for one banding pass.
    pub fn reset(&mut self) {
        self.top = 0;
        self.max_buff = self.buff.len() - PROFILE_COST;
        self.num_turns = 0;
    }

    /// Charge one profile header against the pool.
    pub fn charge_header(&mut self) -> Result<()> {
        self.top += PROFILE_COST;
        self.check_space()
    }

    pub fn check_space(&self) -> Result<()> {
        if self.top >= self.max_buff {
            return Err(Error::Overflow);
        }
        Ok(())
    }

    /// Record a scanline at which some profile starts or stops. The list
    /// at the top of the pool stays sorted ascending and holds no
    /// duplicates.
    pub fn insert_y_turn(&mut self, y: i64) -> Result<()> {
        let base = self.buff.len() - self.num_turns;
        let mut y = y;
        let mut n = self.num_turns as isize - 1;
        while n >= 0 && y < self.buff[base + n as usize] {
            n -= 1;
        }
        if n >= 0 && y > self.buff[base + n as usize] {
            while n >= 0 {
                let y2 = self.buff[base + n as usize];
                self.buff[base + n as usize] = y;
                y = y2;
                n -= 1;
            }
        }
        if n < 0 {
            if self.max_buff <= self.top {
                return Err(Error::Overflow);
            }
            self.max_buff -= 1;
            self.num_turns += 1;
            let slot = self.buff.len() - self.num_turns;
            self.buff[slot] = y;
        }
        Ok(())
    }

    /// Smallest turn not yet consumed by the sweep.
    pub fn next_turn(&self) -> i64 {
        self.buff[self.buff.len() - self.num_turns]
    }

    /// Consume and return the smallest remaining turn.
    pub fn pop_turn(&mut self) -> i64 {
        let y = self.next_turn();
        self.num_turns -= 1;
        y
    }
}
